use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_FILTER_ENV: &str = "QUIZ_LOG";

/// Routes `tracing` output to an append-only file. The terminal is owned by
/// the UI, so nothing may be logged to stdout or stderr.
///
/// Returns `Ok(false)` when a global subscriber was already installed.
pub fn init(path: &Path) -> io::Result<bool> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .is_ok();
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_init_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("quiz.log");
        init(&path).unwrap();
        tracing::info!("Test log message");
        assert!(path.exists());

        // a second init keeps the first subscriber
        assert!(!init(&path).unwrap());
    }
}
