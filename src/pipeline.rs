//! @ai:module:intent Run parse, validate and score stages for one invocation
//! @ai:module:layer application
//! @ai:module:public_api run, Invocation, RunReport, ExitStatus, Failure, Stage
//! @ai:module:depends_on parser, validator, task, scorer
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::parser;
use crate::scorer::{self, MetricResult};
use crate::submission::Submission;
use crate::task;
use crate::validator::{self, DiagnosticKind, Validation};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// @ai:intent Process exit status, one value per failure category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitStatus {
    Success,
    FormatError,
    InvalidInput,
    ValidationFailed,
    ScoringFailed,
}

impl ExitStatus {
    /// @ai:intent Numeric exit code; 2 matches clap's usage errors
    /// @ai:effects pure
    pub fn code(&self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::FormatError => 1,
            ExitStatus::InvalidInput => 2,
            ExitStatus::ValidationFailed => 3,
            ExitStatus::ScoringFailed => 4,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// @ai:intent Pipeline stage at which a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Setup,
    Parse,
    Score,
}

/// @ai:intent Fatal error that stopped a run
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub stage: Stage,
    pub message: String,
}

/// @ai:intent What to check and score
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub submission: PathBuf,
    pub task: Option<String>,
    pub gold: Option<PathBuf>,
}

/// @ai:intent Everything a run produced, for the report formatter
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub submission: PathBuf,
    pub gold: Option<PathBuf>,
    pub validation: Option<Validation>,
    pub scores: Option<MetricResult>,
    pub failure: Option<Failure>,
    pub status: ExitStatus,
}

impl RunReport {
    fn new(invocation: &Invocation) -> Self {
        Self {
            submission: invocation.submission.clone(),
            gold: invocation.gold.clone(),
            validation: None,
            scores: None,
            failure: None,
            status: ExitStatus::Success,
        }
    }

    fn fail(mut self, stage: Stage, error: Error, status: ExitStatus) -> Self {
        tracing::info!("Run stopped at {:?}: {}", stage, error);

        self.failure = Some(Failure {
            stage,
            message: error.to_string(),
        });
        self.status = status;
        self
    }

    pub fn passed(&self) -> bool {
        self.status == ExitStatus::Success
    }
}

/// @ai:intent Validate the submission and, when gold is given, score it
/// @ai:post scoring only runs on a submission that passed validation
/// @ai:effects fs:read
pub fn run(invocation: &Invocation) -> RunReport {
    let report = RunReport::new(invocation);

    let task = match invocation.task.as_deref().map(task::lookup).transpose() {
        Ok(task) => task,
        Err(e) => return report.fail(Stage::Setup, e, ExitStatus::InvalidInput),
    };

    let records = match parser::parse_file(&invocation.submission) {
        Ok(records) => records,
        Err(e @ Error::Format { .. }) => {
            return report.fail(Stage::Parse, e, ExitStatus::FormatError)
        }
        Err(e) => return report.fail(Stage::Parse, e, ExitStatus::InvalidInput),
    };

    let validation = validator::validate(&records, task);
    let mut report = RunReport {
        status: if validation.passed() {
            ExitStatus::Success
        } else {
            ExitStatus::ValidationFailed
        },
        ..report
    };

    if !validation.passed() {
        report.validation = Some(validation);
        return report;
    }

    tracing::info!(
        "{} validates ({} records)",
        invocation.submission.display(),
        validation.records
    );

    let Some(gold_path) = invocation.gold.as_deref() else {
        report.validation = Some(validation);
        return report;
    };

    let gold = match load_gold(gold_path) {
        Ok(gold) => gold,
        Err(e @ Error::FileRead { .. }) => {
            report.validation = Some(validation);
            return report.fail(Stage::Setup, e, ExitStatus::InvalidInput);
        }
        Err(e) => {
            report.validation = Some(validation);
            return report.fail(Stage::Score, e, ExitStatus::ScoringFailed);
        }
    };

    tracing::info!(
        "Gold label counts (crisis, red, amber, green): {:?}",
        gold.label_counts()
    );

    let scores = scorer::score(&validation.submission, &gold);
    report.validation = Some(validation);

    match scores {
        Ok(scores) => {
            report.scores = Some(scores);
            report
        }
        Err(e) => report.fail(Stage::Score, e, ExitStatus::ScoringFailed),
    }
}

/// @ai:intent Parse the gold file and reject duplicated identifiers
/// @ai:effects fs:read
fn load_gold(path: &Path) -> Result<Submission> {
    let records = parser::parse_file(path)?;
    let validation = validator::validate(&records, None);

    if let Some(DiagnosticKind::DuplicateIdentifier { id, lines }) =
        validation.diagnostics.into_iter().map(|d| d.kind).next()
    {
        return Err(Error::DuplicateGold {
            path: path.to_path_buf(),
            id,
            lines,
        });
    }

    Ok(validation.submission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Label;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    fn invocation(submission: &NamedTempFile, gold: Option<&NamedTempFile>) -> Invocation {
        Invocation {
            submission: submission.path().to_path_buf(),
            task: None,
            gold: gold.map(|g| g.path().to_path_buf()),
        }
    }

    #[test]
    fn test_validation_only_success() {
        let submission = file("1\tgreen\n2\tRED\n");
        let report = run(&invocation(&submission, None));

        assert!(report.passed());
        assert_eq!(report.status.code(), 0);
        assert_eq!(report.validation.unwrap().records, 2);
        assert!(report.scores.is_none());
    }

    #[test]
    fn test_format_error_status() {
        let submission = file("1\tgreen\n2\tpurple\n");
        let report = run(&invocation(&submission, None));

        assert_eq!(report.status, ExitStatus::FormatError);
        assert_eq!(report.status.code(), 1);
        let failure = report.failure.unwrap();
        assert_eq!(failure.stage, Stage::Parse);
        assert!(failure.message.contains("line 2"));
        assert!(report.validation.is_none());
    }

    #[test]
    fn test_duplicate_stops_before_scoring() {
        let submission = file("42\tgreen\n42\tred\n");
        let gold = file("42\tgreen\n");
        let report = run(&invocation(&submission, Some(&gold)));

        assert_eq!(report.status, ExitStatus::ValidationFailed);
        assert_eq!(report.status.code(), 3);
        assert!(report.scores.is_none());
        assert!(report.failure.is_none());
    }

    #[test]
    fn test_unknown_task_is_invalid_input() {
        let submission = file("1\tgreen\n");
        let mut invocation = invocation(&submission, None);
        invocation.task = Some("nope".to_string());

        let report = run(&invocation);
        assert_eq!(report.status, ExitStatus::InvalidInput);
        assert_eq!(report.failure.unwrap().stage, Stage::Setup);
    }

    #[test]
    fn test_bundled_task_mismatch() {
        let submission = file("1\tgreen\n");
        let mut invocation = invocation(&submission, None);
        invocation.task = Some("clpsych16".to_string());

        let report = run(&invocation);
        assert_eq!(report.status, ExitStatus::ValidationFailed);

        let codes: Vec<_> = report
            .validation
            .unwrap()
            .diagnostics
            .iter()
            .map(|d| d.code)
            .collect();
        assert_eq!(codes, vec!["E102", "E103"]);
    }

    #[test]
    fn test_scores_against_gold() {
        let submission = file("1\tcrisis\n2\tgreen\n3\tgreen\n");
        let gold = file("1\tcrisis\n2\tgreen\n3\tamber\n");
        let report = run(&invocation(&submission, Some(&gold)));

        assert!(report.passed());
        let scores = report.scores.unwrap();
        assert_eq!(scores.total, 3);
        assert_eq!(scores.class(Label::Green).predicted, 2);
    }

    #[test]
    fn test_empty_gold_is_scoring_failure() {
        let submission = file("1\tcrisis\n");
        let gold = file("\n\n");
        let report = run(&invocation(&submission, Some(&gold)));

        assert_eq!(report.status, ExitStatus::ScoringFailed);
        assert_eq!(report.status.code(), 4);
        assert!(report.scores.is_none());
        assert!(report.validation.unwrap().passed());
    }

    #[test]
    fn test_malformed_gold_is_scoring_failure() {
        let submission = file("1\tcrisis\n");
        let gold = file("1 crisis\n");
        let report = run(&invocation(&submission, Some(&gold)));

        assert_eq!(report.status, ExitStatus::ScoringFailed);
        assert_eq!(report.failure.unwrap().stage, Stage::Score);
    }

    #[test]
    fn test_duplicate_gold_is_scoring_failure() {
        let submission = file("1\tcrisis\n");
        let gold = file("1\tcrisis\n1\tred\n");
        let report = run(&invocation(&submission, Some(&gold)));

        assert_eq!(report.status, ExitStatus::ScoringFailed);
        assert!(report.failure.unwrap().message.contains("repeats identifier `1`"));
    }

    fn bytes(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_invalid_utf8_submission_is_format_error() {
        let submission = bytes(b"1\tgreen\n2\tr\xe9d\n");
        let report = run(&invocation(&submission, None));

        assert_eq!(report.status, ExitStatus::FormatError);
        assert_eq!(report.status.code(), 1);
        let failure = report.failure.unwrap();
        assert_eq!(failure.stage, Stage::Parse);
        assert!(failure.message.contains("line 2"));
        assert!(failure.message.contains("invalid UTF-8"));
    }

    #[test]
    fn test_invalid_utf8_gold_is_scoring_failure() {
        let submission = file("1\tgreen\n");
        let gold = bytes(b"1\tgr\xffen\n");
        let report = run(&invocation(&submission, Some(&gold)));

        assert_eq!(report.status, ExitStatus::ScoringFailed);
        assert_eq!(report.status.code(), 4);
        assert_eq!(report.failure.unwrap().stage, Stage::Score);
    }

    #[test]
    fn test_task_and_gold_together() {
        let ids: Vec<&str> = task::lookup("clpsych16")
            .unwrap()
            .ids()
            .iter()
            .map(String::as_str)
            .collect();
        let run_lines: String = ids.iter().map(|id| format!("{}\tgreen\n", id)).collect();
        let gold_lines: String = ids
            .iter()
            .enumerate()
            .map(|(i, id)| format!("{}\t{}\n", id, if i % 2 == 0 { "green" } else { "red" }))
            .collect();
        let submission = file(&run_lines);
        let gold = file(&gold_lines);

        let mut invocation = invocation(&submission, Some(&gold));
        invocation.task = Some("clpsych16".to_string());
        let report = run(&invocation);

        assert!(report.passed());
        let validation = report.validation.unwrap();
        assert_eq!(validation.task.as_deref(), Some("clpsych16"));
        assert_eq!(validation.records, ids.len());

        let scores = report.scores.unwrap();
        assert_eq!(scores.total, ids.len());
        assert_eq!(scores.correct, ids.len().div_ceil(2));
        assert!(scores.unscored.is_empty());
    }

    #[test]
    fn test_missing_gold_file_is_invalid_input() {
        let submission = file("1\tcrisis\n");
        let report = run(&Invocation {
            submission: submission.path().to_path_buf(),
            task: None,
            gold: Some(PathBuf::from("/nonexistent/gold.tsv")),
        });

        assert_eq!(report.status, ExitStatus::InvalidInput);
    }
}
