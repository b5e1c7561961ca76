//! Classification report with per-class metrics.
//!
//! Provides precision, recall and F1-score for each observed class, a
//! macro-averaged row and the overall accuracy.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::confusion::unique_labels;
use crate::error::{AnalysisError, Result};
use crate::metrics::{precision_recall_fscore_support, DEFAULT_BETA};

/// Row name of the macro-averaged scores.
pub const MACRO_AVG: &str = "macro avg";
/// Row name of the accuracy scalar.
pub const ACCURACY: &str = "accuracy";

/// Metrics reported for every class row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportMetric {
    /// Precision.
    Precision,
    /// Recall.
    Recall,
    /// F1-score.
    F1Score,
}

impl ReportMetric {
    /// All ratio metrics in report column order.
    pub const ALL: [ReportMetric; 3] = [Self::Precision, Self::Recall, Self::F1Score];

    /// Column header used in reports.
    pub fn header(&self) -> &'static str {
        match self {
            Self::Precision => "precision",
            Self::Recall => "recall",
            Self::F1Score => "f1-score",
        }
    }
}

/// Scores of one report row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Precision in [0, 1].
    pub precision: f64,
    /// Recall in [0, 1].
    pub recall: f64,
    /// F1-score in [0, 1].
    #[serde(rename = "f1-score")]
    pub f1_score: f64,
    /// Number of true instances.
    pub support: usize,
}

impl ScoreRecord {
    /// Value of a ratio metric.
    pub fn get(&self, metric: ReportMetric) -> f64 {
        match metric {
            ReportMetric::Precision => self.precision,
            ReportMetric::Recall => self.recall,
            ReportMetric::F1Score => self.f1_score,
        }
    }
}

/// Scores of a named class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScores {
    /// Class name.
    pub name: String,
    /// Class index.
    pub label: usize,
    /// Scores for this class.
    pub scores: ScoreRecord,
}

/// Classification report with per-class and aggregate metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Per-class rows in observed (sorted label) order.
    pub classes: Vec<ClassScores>,
    /// Unweighted mean over the class rows.
    pub macro_avg: ScoreRecord,
    /// Fraction of frames predicted correctly.
    pub accuracy: f64,
    /// Number of frames.
    pub total_samples: usize,
}

impl ScoreReport {
    /// Scores of a class by name.
    pub fn get(&self, name: &str) -> Option<&ScoreRecord> {
        self.classes
            .iter()
            .find(|class| class.name == name)
            .map(|class| &class.scores)
    }

    /// Whether a class row exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of class rows.
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Number of rows including the `macro avg` and `accuracy` entries.
    pub fn len(&self) -> usize {
        self.classes.len() + 2
    }

    /// Always false: the synthetic rows are present even without classes.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Display the report as a formatted string.
    pub fn to_string_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{:>14}{:>11}{:>11}{:>11}{:>10}\n\n",
            "", "precision", "recall", "f1-score", "support"
        ));

        for class in &self.classes {
            let s = &class.scores;
            output.push_str(&format!(
                "{:>14}{:>11.2}{:>11.2}{:>11.2}{:>10}\n",
                class.name, s.precision, s.recall, s.f1_score, s.support
            ));
        }

        output.push('\n');
        output.push_str(&format!(
            "{:>14}{:>11}{:>11}{:>11.2}{:>10}\n",
            ACCURACY, "", "", self.accuracy, self.total_samples
        ));
        output.push_str(&format!(
            "{:>14}{:>11.2}{:>11.2}{:>11.2}{:>10}\n",
            MACRO_AVG,
            self.macro_avg.precision,
            self.macro_avg.recall,
            self.macro_avg.f1_score,
            self.macro_avg.support
        ));

        output
    }
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_table())
    }
}

/// Fraction of frames where the prediction equals the truth.
///
/// Returns NaN for empty input.
pub fn accuracy_score(y_true: &[usize], y_pred: &[usize]) -> f64 {
    assert_eq!(
        y_true.len(),
        y_pred.len(),
        "y_true and y_pred must have same length"
    );
    if y_true.is_empty() {
        return f64::NAN;
    }
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    correct as f64 / y_true.len() as f64
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        f64::NAN
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Build a classification report from true and predicted class indices.
///
/// `target_names` names the observed classes in ascending label order.
/// When it is empty, class rows are named after their label index.
///
/// # Arguments
///
/// * `y_true` - True class indices
/// * `y_pred` - Predicted class indices
/// * `target_names` - One name per observed class
///
/// # Errors
///
/// [`AnalysisError::ClassCountMismatch`] if `target_names` is non-empty
/// and its length differs from the number of observed classes.
///
/// # Example
///
/// ```rust
/// use tagscore_analysis::compute_scores;
///
/// let report = compute_scores(&[0, 0, 1, 1], &[0, 1, 1, 1], &["cat", "dog"]).unwrap();
/// assert_eq!(report.get("cat").unwrap().precision, 1.0);
/// assert_eq!(report.accuracy, 0.75);
/// ```
pub fn compute_scores<S: AsRef<str>>(
    y_true: &[usize],
    y_pred: &[usize],
    target_names: &[S],
) -> Result<ScoreReport> {
    let labels = unique_labels(y_true, y_pred);

    if !target_names.is_empty() && labels.len() != target_names.len() {
        return Err(AnalysisError::ClassCountMismatch {
            n_labels: labels.len(),
            n_names: target_names.len(),
        });
    }

    let prf = precision_recall_fscore_support(y_true, y_pred, &labels, DEFAULT_BETA);

    let classes: Vec<ClassScores> = (0..prf.len())
        .map(|i| ClassScores {
            name: target_names
                .get(i)
                .map(|name| name.as_ref().to_string())
                .unwrap_or_else(|| prf.labels[i].to_string()),
            label: prf.labels[i],
            scores: ScoreRecord {
                precision: prf.precision[i],
                recall: prf.recall[i],
                f1_score: prf.f_score[i],
                support: prf.support[i],
            },
        })
        .collect();

    let macro_avg = ScoreRecord {
        precision: mean(&prf.precision),
        recall: mean(&prf.recall),
        f1_score: mean(&prf.f_score),
        support: prf.support.iter().sum(),
    };

    tracing::trace!(
        n_classes = classes.len(),
        n_samples = y_true.len(),
        "computed classification report"
    );

    Ok(ScoreReport {
        classes,
        macro_avg,
        accuracy: accuracy_score(y_true, y_pred),
        total_samples: y_true.len(),
    })
}
