//! GitHub Actions plumbing: the job summary file, action inputs and
//! workflow commands.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::PathBuf;

use crate::error::{Result, SummaryError};
use crate::summary::{Markup, SummarySink};

const SUMMARY_ENV_VAR: &str = "GITHUB_STEP_SUMMARY";

/// Name of the action input holding the report path.
pub const COVERAGE_FILE_INPUT: &str = "coverage-file";

/// Job summary for the current step. Markup is buffered and appended to the
/// file named by `GITHUB_STEP_SUMMARY` on [`SummarySink::write`].
pub struct JobSummary {
    path: PathBuf,
    buffer: Markup,
}

impl JobSummary {
    /// Resolve the summary file from the environment.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var_os(SUMMARY_ENV_VAR)
            .filter(|p| !p.is_empty())
            .ok_or(SummaryError::MissingSummaryPath)?;
        Ok(Self::new(PathBuf::from(path)))
    }

    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            buffer: Markup::new(),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SummarySink for JobSummary {
    fn add_heading(&mut self, text: &str, level: u8) -> &mut Self {
        self.buffer.add_heading(text, level);
        self
    }

    fn add_raw(&mut self, markup: &str) -> &mut Self {
        self.buffer.add_raw(markup);
        self
    }

    fn write(&mut self) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(self.buffer.as_str().as_bytes())?;
        self.buffer.clear();
        Ok(())
    }
}

/// Environment variable GitHub uses to pass an action input.
fn input_env_var(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Read an action input. Blank values count as not supplied.
pub fn get_input(name: &str) -> Option<String> {
    std::env::var(input_env_var(name))
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The `coverage-file` action input.
pub fn coverage_file_input() -> Result<PathBuf> {
    get_input(COVERAGE_FILE_INPUT)
        .map(PathBuf::from)
        .ok_or_else(|| SummaryError::MissingInput(COVERAGE_FILE_INPUT.to_string()))
}

/// Workflow command that marks the step as failed with `message`.
pub fn error_command(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{escaped}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coverage;
    use crate::summary::add_job_summary;

    #[test]
    fn test_input_env_var() {
        assert_eq!(input_env_var("coverage-file"), "INPUT_COVERAGE-FILE");
        assert_eq!(input_env_var("my input"), "INPUT_MY_INPUT");
    }

    #[test]
    fn test_error_command_escapes() {
        assert_eq!(error_command("boom"), "::error::boom");
        assert_eq!(
            error_command("50% done\nthen failed"),
            "::error::50%25 done%0Athen failed"
        );
    }

    #[test]
    fn test_job_summary_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.md");
        std::fs::write(&path, "existing\n").unwrap();

        let mut summary = JobSummary::new(path.clone());
        add_job_summary(&Coverage::default(), &mut summary).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("existing\n<h3>Code coverage</h3>\n"));
        assert!(written.ends_with("</details>"));
    }

    #[test]
    fn test_job_summary_write_flushes_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.md");

        let mut summary = JobSummary::new(path.clone());
        summary.add_raw("one");
        summary.write().unwrap();
        summary.add_raw("two");
        summary.write().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "onetwo");
    }
}
