//! Interactive CLI mode: prompt for a URL, then download it.

mod progress;

use console::{Term, style};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use crate::download::{DownloadProgress, Downloader};
use crate::source::VideoSource;
use crate::url::{Target, validate_url};
use crate::ytdlp::YtDlp;
use crate::{AppConfig, Error, Result};

pub use progress::{TerminalProgress, print_summary, render_frame, tier_color};

const PROMPT: &str = "Please enter an url: ";

/// Runs one session until the download finishes or `cancel` fires.
///
/// `cancel` is normally `tokio::signal::ctrl_c()`. Download failures are
/// already printed when this returns their error.
///
/// # Errors
///
/// Returns [`Error::Cancelled`] on abort, or the error that ended the
/// download.
pub async fn run<C>(config: AppConfig, cancel: C) -> Result<()>
where
    C: Future<Output = std::io::Result<()>>,
{
    let term = Term::stdout();
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let downloader = Downloader::new(YtDlp::new(config.ytdlp_path.clone()), config);

    until_cancelled(session(&downloader, &term, &mut input), cancel).await
}

/// Races `work` against `cancel`.
///
/// A `cancel` that fails to listen is logged and `work` runs on unguarded.
async fn until_cancelled<T, W, C>(work: W, cancel: C) -> Result<T>
where
    W: Future<Output = Result<T>>,
    C: Future<Output = std::io::Result<()>>,
{
    tokio::pin!(work);
    tokio::select! {
        result = &mut work => result,
        signal = cancel => match signal {
            Ok(()) => Err(Error::Cancelled),
            Err(e) => {
                log::warn!("cannot listen for Ctrl-C: {e}");
                work.await
            }
        },
    }
}

async fn session<S, R>(
    downloader: &Downloader<S>,
    term: &Term,
    input: &mut Lines<R>,
) -> Result<()>
where
    S: VideoSource,
    R: AsyncBufRead + Unpin,
{
    let url = prompt_url(term, input).await?;
    let target = Target::classify(&url);
    log::info!("downloading {target:?}");

    let progress = TerminalProgress::new(term.clone(), downloader.config().progress_bar_width);
    match downloader.run(&target, &progress).await {
        Ok(_) => Ok(()),
        Err(e) => {
            progress.on_error(&e);
            Err(e)
        }
    }
}

/// Prompts until a valid YouTube URL is entered.
///
/// End of input counts as the user aborting.
async fn prompt_url<R>(term: &Term, input: &mut Lines<R>) -> Result<String>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        term.clear_screen()?;
        term.write_str(PROMPT)?;
        term.flush()?;

        let line = input.next_line().await?.ok_or(Error::Cancelled)?;
        match validate_url(&line) {
            Ok(url) => return Ok(url.to_string()),
            Err(e) => pause(term, input, &e).await?,
        }
    }
}

async fn pause<R>(term: &Term, input: &mut Lines<R>, error: &Error) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    report_error(error);
    term.write_str("Press Enter to continue...")?;
    term.flush()?;
    input.next_line().await?.ok_or(Error::Cancelled)?;
    Ok(())
}

/// Prints an error in bold red on stderr.
pub fn report_error(error: &Error) {
    let _ = Term::stderr().write_line(&style(error).bold().red().to_string());
}

/// Clears the screen and says goodbye after the user aborted.
pub fn aborting() {
    let term = Term::stdout();
    let _ = term.clear_screen();
    let _ = term.write_line(&style("Aborting").bold().green().to_string());
}
