use indicatif::ProgressBar;
use parking_lot::RwLock;
use std::io::{self, Write};

/// Progress bar currently drawn on stderr, if any.
static ACTIVE_BAR: RwLock<Option<ProgressBar>> = parking_lot::const_rwlock(None);

pub const DEFAULT_FILTER: &str = "audio_batch_downloader=info";
pub const VERBOSE_FILTER: &str = "audio_batch_downloader=debug";

/// Route log output above the given progress bar until [`detach_progress_bar`].
pub fn attach_progress_bar(bar: &ProgressBar) {
    *ACTIVE_BAR.write() = Some(bar.clone());
}

pub fn detach_progress_bar() {
    ACTIVE_BAR.write().take();
}

/// stderr writer that hides the active progress bar while a log line is printed
pub struct ProgressAwareWriter;

impl Write for ProgressAwareWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let bar = ACTIVE_BAR.read();
        match bar.as_ref() {
            Some(bar) if !bar.is_hidden() => bar.suspend(|| io::stderr().write(buf)),
            _ => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new(VERBOSE_FILTER)
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| DEFAULT_FILTER.into())
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(|| ProgressAwareWriter)
        .try_init();
}
