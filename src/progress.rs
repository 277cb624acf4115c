//! Transfer progress computation, independent of any terminal.

/// Glyph for a completed bar cell.
pub const FILLED: char = '█';
/// Glyph for a pending bar cell.
pub const EMPTY: char = '-';

/// Colour band a percentage falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Below 33%.
    Low,
    /// From 33% up to 65%.
    Mid,
    /// 66% and above.
    High,
}

impl Tier {
    /// Band for a whole, truncated percentage.
    #[must_use]
    pub const fn of(percent: u8) -> Self {
        if percent < 33 {
            Self::Low
        } else if percent < 66 {
            Self::Mid
        } else {
            Self::High
        }
    }
}

/// One redraw of the progress line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressFrame {
    /// Percent transferred rounded to nearest, 0 to 100.
    pub percent: u8,
    /// Colour band of the exact fraction transferred.
    pub tier: Tier,
    /// Number of filled cells.
    pub filled: usize,
    /// Total number of cells.
    pub width: usize,
}

impl ProgressFrame {
    /// Computes the frame for `remaining` bytes left out of `total`.
    ///
    /// Returns `None` when `total` is zero, since no fraction exists yet.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(total: u64, remaining: u64, width: usize) -> Option<Self> {
        if total == 0 {
            return None;
        }
        let done = u128::from(total - remaining.min(total));
        let total = u128::from(total);

        Some(Self {
            percent: ((done * 200 / total + 1) / 2) as u8,
            tier: Tier::of((done * 100 / total) as u8),
            filled: (done * width as u128 / total) as usize,
            width,
        })
    }

    /// Colour band of this frame.
    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.tier
    }

    /// Renders the bar between pipes, e.g. `|█████-----|`.
    #[must_use]
    pub fn bar(&self) -> String {
        let mut bar = String::with_capacity(self.width * FILLED.len_utf8() + 2);
        bar.push('|');
        bar.extend(std::iter::repeat_n(FILLED, self.filled));
        bar.extend(std::iter::repeat_n(EMPTY, self.width - self.filled));
        bar.push('|');
        bar
    }
}
