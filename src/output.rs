//! @ai:module:intent Render run reports as human-readable text or JSON
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, Rendered, render, format_diagnostic, format_scores, to_json
//! @ai:module:depends_on pipeline, validator, scorer, config
//! @ai:module:stateless true

use crate::config::ReportConfig;
use crate::label::Label;
use crate::pipeline::RunReport;
use crate::scorer::MetricResult;
use crate::validator::{Diagnostic, DiagnosticKind, Validation};
use colored::Colorize;
use serde::Serialize;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// @ai:intent Text destined for stdout and stderr
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub stdout: String,
    pub stderr: String,
}

/// @ai:intent Render a run report in the requested format
/// @ai:effects pure
pub fn render(report: &RunReport, format: OutputFormat, config: &ReportConfig) -> Rendered {
    match format {
        OutputFormat::Json => Rendered {
            stdout: to_json(report, false),
            stderr: String::new(),
        },
        OutputFormat::JsonPretty => Rendered {
            stdout: to_json(report, true),
            stderr: String::new(),
        },
        OutputFormat::Text => render_text(report, config),
    }
}

/// @ai:intent Render a run report as human-readable text
/// @ai:effects pure
fn render_text(report: &RunReport, config: &ReportConfig) -> Rendered {
    let mut rendered = Rendered::default();
    let path = report.submission.display().to_string();

    if let Some(validation) = &report.validation {
        if validation.passed() {
            rendered.stdout.push_str(&format_validation_success(&path, validation));
        } else {
            rendered
                .stderr
                .push_str(&format_validation_failure(&path, validation, config));
        }
    }

    if let Some(scores) = &report.scores {
        if let Some(gold) = &report.gold {
            rendered.stdout.push_str(&format!(
                "\n{} {}\n",
                "Scores against".bold(),
                gold.display().to_string().bold()
            ));
        }
        rendered.stdout.push_str(&format_scores(scores, config));
    }

    if let Some(failure) = &report.failure {
        rendered
            .stderr
            .push_str(&format!("{} {}\n", "Error:".red().bold(), failure.message));
    }

    rendered
}

/// @ai:intent Format the success line for a validated submission
/// @ai:effects pure
fn format_validation_success(path: &str, validation: &Validation) -> String {
    let task = validation
        .task
        .as_ref()
        .map(|t| format!(", task {}", t))
        .unwrap_or_default();

    format!(
        "{} {} validates ({} records{})\n",
        "OK".green().bold(),
        path,
        validation.records,
        task
    )
}

/// @ai:intent Format every diagnostic of a failed validation
/// @ai:effects pure
fn format_validation_failure(path: &str, validation: &Validation, config: &ReportConfig) -> String {
    let mut output = String::new();

    for diagnostic in &validation.diagnostics {
        output.push_str(&format!(
            "{} {} - {} ({})\n",
            "ERROR".red().bold(),
            path.dimmed(),
            format_diagnostic(diagnostic, validation.task.as_deref(), config.max_listed),
            diagnostic.code.dimmed()
        ));
    }

    output.push_str(&format!(
        "{} does not validate: {} problem(s) in {} records\n",
        path,
        validation.diagnostics.len().to_string().red().bold(),
        validation.records
    ));

    output
}

/// @ai:intent Describe a diagnostic in one line, capping identifier lists
/// @ai:effects pure
pub fn format_diagnostic(diagnostic: &Diagnostic, task: Option<&str>, max_listed: usize) -> String {
    let task = task.unwrap_or("the task");

    match &diagnostic.kind {
        DiagnosticKind::DuplicateIdentifier { id, lines } => {
            let lines: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
            format!("identifier `{}` appears on lines {}", id, lines.join(", "))
        }
        DiagnosticKind::MissingEntries { ids } => format!(
            "{} identifier(s) expected by {} are missing: {}",
            ids.len(),
            task,
            list_ids(ids, max_listed)
        ),
        DiagnosticKind::ExtraEntries { ids } => format!(
            "{} identifier(s) are not part of {}: {}",
            ids.len(),
            task,
            list_ids(ids, max_listed)
        ),
    }
}

/// @ai:intent Join identifiers, summarizing the tail past `max_listed`
/// @ai:effects pure
fn list_ids(ids: &[String], max_listed: usize) -> String {
    if ids.len() <= max_listed {
        return ids.join(", ");
    }

    let shown = ids[..max_listed].join(", ");
    let hidden = ids.len() - max_listed;

    if shown.is_empty() {
        format!("{} not listed", hidden)
    } else {
        format!("{} ... and {} more", shown, hidden)
    }
}

/// @ai:intent Format the per-class metric table and aggregates
/// @ai:effects pure
pub fn format_scores(scores: &MetricResult, config: &ReportConfig) -> String {
    let d = config.decimals;
    let mut output = String::new();

    output.push_str(&format!(
        "{:<10}{:<20}{:<20}{:<10}{:<10}{}\n",
        "label", "precision", "recall", "f1", "support", "unanswered"
    ));

    for label in Label::ALL {
        let class = scores.class(label);
        let precision = format!(
            "{:.*} ({}/{})",
            d, class.precision, class.true_positives, class.predicted
        );
        let recall = format!(
            "{:.*} ({}/{})",
            d, class.recall, class.true_positives, class.support
        );

        output.push_str(&format!(
            "{:<10}{:<20}{:<20}{:<10}{:<10}{}\n",
            label.as_str(),
            precision,
            recall,
            format!("{:.*}", d, class.f1),
            class.support,
            class.unanswered
        ));
    }

    output.push_str(&format!(
        "{:<10}{:<20}{:<20}{:<10}\n",
        "macro",
        format!("{:.*}", d, scores.macro_precision),
        format!("{:.*}", d, scores.macro_recall),
        format!("{:.*}", d, scores.macro_f1)
    ));

    output.push('\n');
    output.push_str(&format!(
        "accuracy: {:.*} ({}/{})\n",
        d, scores.accuracy, scores.correct, scores.total
    ));
    output.push_str(&format!(
        "unanswered: {} of {} gold items\n",
        scores.unanswered, scores.total
    ));

    if config.show_unscored && !scores.unscored.is_empty() {
        output.push_str(&format!(
            "unscored: {} system identifier(s) have no gold label: {}\n",
            scores.unscored.len(),
            list_ids(&scores.unscored, config.max_listed)
        ));
    }

    output.push_str(&format!(
        "{} {:.*}\n",
        "macro-averaged F-score:".bold(),
        d,
        scores.macro_f1
    ));

    output
}

/// @ai:intent Format any serializable value as JSON
/// @ai:effects pure
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_default()
    } else {
        serde_json::to_string(value).unwrap_or_default()
    }
}
