//! Per-class confusion counts for multi-class label arrays.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One-vs-rest confusion counts for a single class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassConfusion {
    /// Class index.
    pub label: usize,
    /// Frames where neither the truth nor the prediction is this class.
    pub tn: usize,
    /// Frames predicted as this class that are something else.
    pub fp: usize,
    /// Frames of this class predicted as something else.
    pub fn_: usize,
    /// Frames of this class predicted as this class.
    pub tp: usize,
}

impl ClassConfusion {
    /// Total number of frames covered by the counts.
    pub fn total(&self) -> usize {
        self.tn + self.fp + self.fn_ + self.tp
    }

    /// Number of frames predicted as this class.
    pub fn predicted(&self) -> usize {
        self.tp + self.fp
    }

    /// Number of frames that truly are this class (the support).
    pub fn actual(&self) -> usize {
        self.tp + self.fn_
    }

    /// The 2x2 table `[[tn, fp], [fn, tp]]`.
    pub fn as_matrix(&self) -> [[usize; 2]; 2] {
        [[self.tn, self.fp], [self.fn_, self.tp]]
    }
}

/// Confusion counts for every class of a label set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MultilabelConfusion {
    /// Per-class counts, requested classes first.
    pub classes: Vec<ClassConfusion>,
    /// Number of frames the counts were computed from.
    pub n_samples: usize,
}

impl MultilabelConfusion {
    /// Class indices in row order.
    pub fn labels(&self) -> Vec<usize> {
        self.classes.iter().map(|c| c.label).collect()
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether no class is present.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Counts for a class index, if it is part of the table.
    pub fn get(&self, label: usize) -> Option<&ClassConfusion> {
        self.classes.iter().find(|c| c.label == label)
    }

    /// Iterate over per-class counts.
    pub fn iter(&self) -> std::slice::Iter<'_, ClassConfusion> {
        self.classes.iter()
    }

    /// True positives per class.
    pub fn tp_sum(&self) -> Vec<usize> {
        self.classes.iter().map(|c| c.tp).collect()
    }

    /// Predicted counts (TP + FP) per class.
    pub fn pred_sum(&self) -> Vec<usize> {
        self.classes.iter().map(ClassConfusion::predicted).collect()
    }

    /// True counts (TP + FN) per class.
    pub fn true_sum(&self) -> Vec<usize> {
        self.classes.iter().map(ClassConfusion::actual).collect()
    }

    /// Get a text representation.
    pub fn to_string_table(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("{:>8}{:>8}{:>8}{:>8}{:>8}\n", "class", "tn", "fp", "fn", "tp"));
        for c in &self.classes {
            s.push_str(&format!(
                "{:>8}{:>8}{:>8}{:>8}{:>8}\n",
                c.label, c.tn, c.fp, c.fn_, c.tp
            ));
        }
        s
    }
}

impl fmt::Display for MultilabelConfusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_table())
    }
}

/// Sorted set of class indices appearing in either array.
pub fn unique_labels(y_true: &[usize], y_pred: &[usize]) -> Vec<usize> {
    y_true
        .iter()
        .chain(y_pred)
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Compute one-vs-rest confusion counts for each class.
///
/// Rows follow `labels`; classes observed in the data but missing from
/// `labels` are appended in ascending order.
///
/// # Arguments
///
/// * `y_true` - True class indices
/// * `y_pred` - Predicted class indices
/// * `labels` - Classes to report, in order
///
/// # Panics
///
/// Panics if `y_true` and `y_pred` differ in length.
pub fn multilabel_confusion_matrix(
    y_true: &[usize],
    y_pred: &[usize],
    labels: &[usize],
) -> MultilabelConfusion {
    assert_eq!(
        y_true.len(),
        y_pred.len(),
        "y_true and y_pred must have same length"
    );

    let requested: BTreeSet<usize> = labels.iter().copied().collect();
    let extra = unique_labels(y_true, y_pred)
        .into_iter()
        .filter(|label| !requested.contains(label));
    let all_labels: Vec<usize> = labels.iter().copied().chain(extra).collect();

    let n_samples = y_true.len();
    let classes = all_labels
        .into_iter()
        .map(|label| {
            let true_sum = y_true.iter().filter(|&&t| t == label).count();
            let pred_sum = y_pred.iter().filter(|&&p| p == label).count();
            let tp = y_true
                .iter()
                .zip(y_pred)
                .filter(|&(&t, &p)| t == label && p == label)
                .count();
            let fp = pred_sum - tp;
            let fn_ = true_sum - tp;

            ClassConfusion {
                label,
                tn: n_samples - tp - fp - fn_,
                fp,
                fn_,
                tp,
            }
        })
        .collect();

    MultilabelConfusion { classes, n_samples }
}
