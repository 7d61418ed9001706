//! Download command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{Orchestrator, Origin};
use anyhow::Result;

/// Run the download command.
pub async fn run_download(input: &str, output: Option<String>, settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(&settings).await?;

    let spinner = Output::spinner(&format!("Fetching transcript for {}...", input));
    let result = orchestrator.fetch_transcript(input).await;
    spinner.finish_and_clear();

    // Reported once, by main.
    let fetched = result?;

    if fetched.origin == Origin::Cached {
        Output::info(&format!("Using cached transcript for {}", fetched.video_id));
    }

    match output {
        Some(path) if path != "-" => {
            std::fs::write(&path, &fetched.text)?;
            Output::success(&format!("Saved transcript for {} to {}", fetched.video_id, path));
        }
        _ => print!("{}", fetched.text),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TubecacheError;

    #[tokio::test]
    async fn test_invalid_reference_is_returned_to_caller() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.general.cache_dir = dir.path().to_string_lossy().into_owned();

        let err = run_download("not a url", None, settings).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TubecacheError>(),
            Some(TubecacheError::InvalidReference(_))
        ));
        assert_eq!(err.chain().count(), 1);
    }
}
