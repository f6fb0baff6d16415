//! @ai:module:intent Score a system submission against gold labels with per-class and macro metrics
//! @ai:module:layer application
//! @ai:module:public_api score, ConfusionTally, ClassMetrics, MetricResult
//! @ai:module:depends_on label, submission, error
//! @ai:module:stateless true
//!
//! Classes are nominal: the severity order of the labels plays no part in
//! scoring. Every ratio with a zero denominator is defined as 0, so a class
//! the system never predicts has precision 0 and a class absent from gold has
//! recall 0.

use crate::error::{Error, Result};
use crate::label::Label;
use crate::submission::Submission;
use serde::Serialize;

const CLASSES: usize = Label::ALL.len();

/// @ai:intent Co-occurrence counts of predicted and actual labels, plus unanswered gold items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionTally {
    /// `counts[predicted][actual]`, indexed by `Label::index`.
    counts: [[usize; CLASSES]; CLASSES],
    /// Gold items with no system prediction, by actual label.
    unanswered: [usize; CLASSES],
}

impl ConfusionTally {
    /// @ai:intent Record an answered gold item
    pub fn record(&mut self, predicted: Label, actual: Label) {
        self.counts[predicted.index()][actual.index()] += 1;
    }

    /// @ai:intent Record a gold item the system did not answer
    pub fn record_unanswered(&mut self, actual: Label) {
        self.unanswered[actual.index()] += 1;
    }

    pub fn count(&self, predicted: Label, actual: Label) -> usize {
        self.counts[predicted.index()][actual.index()]
    }

    pub fn true_positives(&self, label: Label) -> usize {
        self.count(label, label)
    }

    /// @ai:intent How often the system predicted `label`, over gold items only
    /// @ai:effects pure
    pub fn predicted(&self, label: Label) -> usize {
        self.counts[label.index()].iter().sum()
    }

    pub fn unanswered(&self, label: Label) -> usize {
        self.unanswered[label.index()]
    }

    /// @ai:intent Gold items whose true label is `label`, answered or not
    /// @ai:effects pure
    pub fn support(&self, label: Label) -> usize {
        let answered: usize = self.counts.iter().map(|row| row[label.index()]).sum();
        answered + self.unanswered(label)
    }

    pub fn total_unanswered(&self) -> usize {
        self.unanswered.iter().sum()
    }

    /// @ai:intent Number of gold items tallied
    /// @ai:effects pure
    pub fn total(&self) -> usize {
        let answered: usize = self.counts.iter().flatten().sum();
        answered + self.total_unanswered()
    }

    pub fn correct(&self) -> usize {
        Label::ALL.iter().map(|&l| self.true_positives(l)).sum()
    }
}

/// @ai:intent Precision, recall and F1 for one class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: Label,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
    pub true_positives: usize,
    pub predicted: usize,
    pub unanswered: usize,
}

impl ClassMetrics {
    /// @ai:intent Derive per-class metrics from the tally
    /// @ai:effects pure
    /// @ai:edge_cases zero predictions gives precision 0, zero support gives recall 0
    fn from_tally(tally: &ConfusionTally, label: Label) -> Self {
        let true_positives = tally.true_positives(label);
        let predicted = tally.predicted(label);
        let support = tally.support(label);

        let precision = ratio(true_positives, predicted);
        let recall = ratio(true_positives, support);

        Self {
            label,
            precision,
            recall,
            f1: f1(precision, recall),
            support,
            true_positives,
            predicted,
            unanswered: tally.unanswered(label),
        }
    }
}

/// @ai:intent Full result of one scoring run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricResult {
    /// One entry per label, in `Label::ALL` order.
    pub classes: Vec<ClassMetrics>,
    pub macro_precision: f64,
    pub macro_recall: f64,
    pub macro_f1: f64,
    pub accuracy: f64,
    pub correct: usize,
    pub total: usize,
    pub unanswered: usize,
    /// System identifiers with no gold label, sorted. Not scored.
    pub unscored: Vec<String>,
    pub tally: ConfusionTally,
}

impl MetricResult {
    pub fn class(&self, label: Label) -> &ClassMetrics {
        &self.classes[label.index()]
    }
}

/// @ai:intent Score system predictions against gold labels
/// @ai:pre system submission passed validation
/// @ai:post result depends only on the two mappings, never on iteration order
/// @ai:effects pure
/// @ai:edge_cases empty gold fails; disjoint ids give recall 0 and a full unanswered count
pub fn score(system: &Submission, gold: &Submission) -> Result<MetricResult> {
    if gold.is_empty() {
        return Err(Error::EmptyGold);
    }

    let mut tally = ConfusionTally::default();

    for (id, actual) in gold.iter() {
        match system.get(id) {
            Some(predicted) => tally.record(predicted, actual),
            None => tally.record_unanswered(actual),
        }
    }

    let unscored: Vec<String> = system
        .ids()
        .filter(|id| !gold.contains(id))
        .map(str::to_string)
        .collect();

    let classes: Vec<ClassMetrics> = Label::ALL
        .iter()
        .map(|&label| ClassMetrics::from_tally(&tally, label))
        .collect();

    let macro_precision = mean(classes.iter().map(|c| c.precision));
    let macro_recall = mean(classes.iter().map(|c| c.recall));
    let macro_f1 = mean(classes.iter().map(|c| c.f1));

    let correct = tally.correct();
    let total = tally.total();

    tracing::debug!(
        "Scored {} gold items: {} correct, {} unanswered, {} unscored",
        total,
        correct,
        tally.total_unanswered(),
        unscored.len()
    );

    Ok(MetricResult {
        classes,
        macro_precision,
        macro_recall,
        macro_f1,
        accuracy: ratio(correct, total),
        correct,
        total,
        unanswered: tally.total_unanswered(),
        unscored,
        tally,
    })
}

/// @ai:intent Divide counts, defining x/0 as 0
/// @ai:effects pure
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// @ai:intent Harmonic mean of precision and recall, 0 when both are 0
/// @ai:effects pure
fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// @ai:intent Unweighted mean, 0 for an empty iterator
/// @ai:effects pure
fn mean<I: Iterator<Item = f64>>(iter: I) -> f64 {
    let (sum, count) = iter.fold((0.0, 0u32), |(s, c), v| (s + v, c + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
