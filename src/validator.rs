//! @ai:module:intent Validate parsed records for duplicates and task identifier coverage
//! @ai:module:layer application
//! @ai:module:public_api validate, Validation, Diagnostic, DiagnosticKind
//! @ai:module:depends_on parser, submission, task
//! @ai:module:stateless true

use crate::parser::Record;
use crate::submission::Submission;
use crate::task::TaskDefinition;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// @ai:intent What a validation diagnostic found
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticKind {
    DuplicateIdentifier { id: String, lines: Vec<usize> },
    MissingEntries { ids: Vec<String> },
    ExtraEntries { ids: Vec<String> },
}

/// @ai:intent A single validation finding; every diagnostic fails validation
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: &'static str,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// @ai:intent Create a diagnostic with the stable code for its kind
    /// @ai:effects pure
    pub fn new(kind: DiagnosticKind) -> Self {
        let code = match kind {
            DiagnosticKind::DuplicateIdentifier { .. } => "E101",
            DiagnosticKind::MissingEntries { .. } => "E102",
            DiagnosticKind::ExtraEntries { .. } => "E103",
        };

        Self { code, kind }
    }
}

/// @ai:intent Outcome of validating one submission file
#[derive(Debug, Clone, Serialize)]
pub struct Validation {
    #[serde(skip)]
    pub submission: Submission,
    pub records: usize,
    pub task: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Validation {
    /// @ai:intent Check if validation passed (no diagnostics)
    pub fn passed(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// @ai:intent Validate records, optionally against a task's expected identifiers
/// @ai:post every duplicated id yields one diagnostic; missing and extra are both reported
/// @ai:effects pure
pub fn validate(records: &[Record], task: Option<&TaskDefinition>) -> Validation {
    let mut diagnostics = find_duplicates(records);

    let submission: Submission = records
        .iter()
        .map(|record| (record.id.clone(), record.label))
        .collect();

    if let Some(task) = task {
        diagnostics.extend(compare_with_task(&submission, task));
    }

    let validation = Validation {
        submission,
        records: records.len(),
        task: task.map(|t| t.name.clone()),
        diagnostics,
    };

    tracing::debug!(
        "Validated {} records ({} unique), {} diagnostics",
        validation.records,
        validation.submission.len(),
        validation.diagnostics.len()
    );

    validation
}

/// @ai:intent Report every identifier that occurs on more than one line
/// @ai:effects pure
fn find_duplicates(records: &[Record]) -> Vec<Diagnostic> {
    let mut lines_by_id: BTreeMap<&str, Vec<usize>> = BTreeMap::new();

    for record in records {
        lines_by_id
            .entry(record.id.as_str())
            .or_default()
            .push(record.line);
    }

    let mut duplicates: Vec<_> = lines_by_id
        .into_iter()
        .filter(|(_, lines)| lines.len() > 1)
        .collect();

    // Report in the order the duplicates first appear in the file
    duplicates.sort_by_key(|(_, lines)| lines[0]);

    duplicates
        .into_iter()
        .map(|(id, lines)| {
            Diagnostic::new(DiagnosticKind::DuplicateIdentifier {
                id: id.to_string(),
                lines,
            })
        })
        .collect()
}

/// @ai:intent Compare submission identifiers with the task's expected set
/// @ai:effects pure
fn compare_with_task(submission: &Submission, task: &TaskDefinition) -> Vec<Diagnostic> {
    let submitted: BTreeSet<&str> = submission.ids().collect();

    let missing: Vec<String> = task
        .ids()
        .iter()
        .filter(|id| !submitted.contains(id.as_str()))
        .cloned()
        .collect();

    let extra: Vec<String> = submitted
        .iter()
        .filter(|id| !task.contains(id))
        .map(|id| id.to_string())
        .collect();

    let mut diagnostics = Vec::new();

    if !missing.is_empty() {
        tracing::debug!("{} ids missing for task {}", missing.len(), task.name);
        diagnostics.push(Diagnostic::new(DiagnosticKind::MissingEntries { ids: missing }));
    }

    if !extra.is_empty() {
        tracing::debug!("{} unexpected ids for task {}", extra.len(), task.name);
        diagnostics.push(Diagnostic::new(DiagnosticKind::ExtraEntries { ids: extra }));
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Label;
    use crate::parser::parse_records;
    use pretty_assertions::assert_eq;

    fn records(ids: &[&str]) -> Vec<Record> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| Record {
                id: id.to_string(),
                label: Label::Green,
                line: i + 1,
            })
            .collect()
    }

    #[test]
    fn test_duplicate_identifier_fails() {
        let parsed = parse_records("42\tred\n7\tgreen\n42\tamber\n").unwrap();
        let validation = validate(&parsed, None);

        assert!(!validation.passed());
        assert_eq!(
            validation.diagnostics,
            vec![Diagnostic::new(DiagnosticKind::DuplicateIdentifier {
                id: "42".to_string(),
                lines: vec![1, 3],
            })]
        );
        assert_eq!(validation.diagnostics[0].code, "E101");
        assert_eq!(validation.submission.get("42"), Some(Label::Red));
    }

    #[test]
    fn test_each_duplicate_reported_once_in_file_order() {
        let validation = validate(&records(&["9", "5", "9", "5", "9"]), None);
        let ids: Vec<_> = validation
            .diagnostics
            .iter()
            .map(|d| match &d.kind {
                DiagnosticKind::DuplicateIdentifier { id, lines } => (id.clone(), lines.clone()),
                other => panic!("unexpected diagnostic {:?}", other),
            })
            .collect();

        assert_eq!(
            ids,
            vec![
                ("9".to_string(), vec![1, 3, 5]),
                ("5".to_string(), vec![2, 4]),
            ]
        );
    }

    #[test]
    fn test_unique_ids_pass_without_task() {
        let validation = validate(&records(&["1", "2", "3"]), None);
        assert!(validation.passed());
        assert_eq!(validation.records, 3);
        assert_eq!(validation.submission.len(), 3);
        assert!(validation.task.is_none());
    }

    #[test]
    fn test_missing_entries_against_task() {
        let task = TaskDefinition::new("t", ["67", "68", "76"]);
        let validation = validate(&records(&["67", "68"]), Some(&task));

        assert!(!validation.passed());
        assert_eq!(
            validation.diagnostics,
            vec![Diagnostic::new(DiagnosticKind::MissingEntries {
                ids: vec!["76".to_string()],
            })]
        );
    }

    #[test]
    fn test_extra_entries_against_task() {
        let task = TaskDefinition::new("t", ["67", "68", "76"]);
        let validation = validate(&records(&["67", "68", "76", "99"]), Some(&task));

        assert_eq!(
            validation.diagnostics,
            vec![Diagnostic::new(DiagnosticKind::ExtraEntries {
                ids: vec!["99".to_string()],
            })]
        );
    }

    #[test]
    fn test_missing_and_extra_reported_together() {
        let task = TaskDefinition::new("t", ["67", "68", "76"]);
        let validation = validate(&records(&["67", "99", "68", "67"]), Some(&task));

        let codes: Vec<_> = validation.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec!["E101", "E102", "E103"]);
        assert_eq!(validation.diagnostics.len(), 3);
    }

    #[test]
    fn test_exact_match_passes() {
        let task = TaskDefinition::new("t", ["67", "68", "76"]);
        let validation = validate(&records(&["76", "67", "68"]), Some(&task));

        assert!(validation.passed());
        assert_eq!(validation.task.as_deref(), Some("t"));
    }
}
