//! @ai:module:intent Validation and scoring library for four-class triage shared-task submissions
//! @ai:module:layer infrastructure
//! @ai:module:public_api label, parser, submission, task, validator, scorer, pipeline, output, config, error
//! @ai:module:stateless true
//!
//! # triage-eval
//!
//! Checks that a tab-separated submission (`<id><TAB><label>`, labels
//! `crisis`, `red`, `amber`, `green`) is well formed, optionally covers
//! exactly the identifiers of a bundled task, and scores it against gold
//! labels with per-class and macro-averaged precision, recall and F1.
//!
//! ## Example
//!
//! ```rust,no_run
//! use triage_eval::{output, pipeline, Config, Invocation, OutputFormat};
//! use std::path::PathBuf;
//!
//! let invocation = Invocation {
//!     submission: PathBuf::from("run1.tsv"),
//!     task: Some("clpsych16".to_string()),
//!     gold: Some(PathBuf::from("gold.tsv")),
//! };
//!
//! let report = pipeline::run(&invocation);
//! let rendered = output::render(&report, OutputFormat::Text, &Config::default().report);
//! print!("{}", rendered.stdout);
//! ```

pub mod config;
pub mod error;
pub mod label;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod scorer;
pub mod submission;
pub mod task;
pub mod validator;

pub use config::{Config, ReportConfig};
pub use error::{Error, FormatError, FormatErrorKind, Result};
pub use label::Label;
pub use output::{format_scores, render, to_json, OutputFormat, Rendered};
pub use parser::{parse_file, parse_records, Record};
pub use pipeline::{run, ExitStatus, Invocation, RunReport};
pub use scorer::{score, ClassMetrics, ConfusionTally, MetricResult};
pub use submission::Submission;
pub use task::{lookup, registry, TaskDefinition, TaskRegistry};
pub use validator::{validate, Diagnostic, DiagnosticKind, Validation};
