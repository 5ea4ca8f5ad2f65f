//! Non-interactive wizard run for the `generate` subcommand

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::wizard::{Completion, SelectedFile, Wizard, WizardView};

/// Inputs taken from the command line
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub file: PathBuf,
    pub year: Option<String>,
    pub accept_disclaimer: bool,
    /// Where a successful archive is saved
    pub output_dir: PathBuf,
}

/// State of the wizard once the run finished, captured before closing it
#[derive(Debug)]
pub struct GenerateOutcome {
    pub view: WizardView,
    pub saved: Option<PathBuf>,
}

/// Drive `wizard` through every step with the given inputs.
///
/// The session is closed before returning on every path past the upload
/// step, so a failed download still releases the archive.
pub async fn generate_report(
    wizard: &mut Wizard,
    options: &GenerateOptions,
) -> Result<GenerateOutcome> {
    wizard.set_acknowledged(options.accept_disclaimer);
    if !wizard.go_next() {
        bail!("The disclaimer must be accepted first (pass --accept-disclaimer)");
    }
    wizard.go_next();

    let selected = read_export(&options.file)?;
    wizard.select_file(Some(selected));
    wizard.set_year(options.year.clone().unwrap_or_default());

    // A validation rejection already left the session in Failed
    let completion = wizard.submit().await.ok();

    let saved = match completion {
        Some(Completion::Succeeded(_)) => Some(wizard.download_result(&options.output_dir)),
        _ => None,
    };
    let view = wizard.view();
    wizard.close_session();

    let saved = saved.transpose().with_context(|| {
        format!("Failed to save report into {}", options.output_dir.display())
    })?;
    if let Some(path) = &saved {
        tracing::info!(path = %path.display(), "Report archive saved");
    }

    Ok(GenerateOutcome { view, saved })
}

fn read_export(path: &Path) -> Result<SelectedFile> {
    SelectedFile::read(path).with_context(|| format!("Failed to read {}", path.display()))
}
