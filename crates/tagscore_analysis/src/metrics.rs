//! Precision, recall, F-score and support derived from confusion counts.
//!
//! Divisions by zero never produce NaN or infinity. A class with no
//! predicted instances has precision 1.0 and a class with no true
//! instances has recall 1.0.

use serde::{Deserialize, Serialize};

use crate::confusion::{multilabel_confusion_matrix, MultilabelConfusion};

/// Default F-score beta (the harmonic mean of precision and recall).
pub const DEFAULT_BETA: f64 = 1.0;

/// Divide, substituting 1.0 when the denominator is zero.
pub fn safe_divide(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        1.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Element-wise [`safe_divide`].
pub fn prf_divide(numerator: &[usize], denominator: &[usize]) -> Vec<f64> {
    numerator
        .iter()
        .zip(denominator)
        .map(|(&n, &d)| safe_divide(n, d))
        .collect()
}

/// F-beta score of a single precision/recall pair.
///
/// With `beta == +inf` this is the recall. A zero denominator is replaced
/// by 1.0, so the score is 0.0 when both precision and recall are zero.
pub fn f_beta(precision: f64, recall: f64, beta: f64) -> f64 {
    if beta == f64::INFINITY {
        return recall;
    }
    let beta2 = beta * beta;
    let denom = beta2 * precision + recall;
    let denom = if denom == 0.0 { 1.0 } else { denom };
    (1.0 + beta2) * precision * recall / denom
}

/// Per-class precision, recall, F-score and support.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PrfSupport {
    /// Class index of each entry.
    pub labels: Vec<usize>,
    /// TP / (TP + FP).
    pub precision: Vec<f64>,
    /// TP / (TP + FN).
    pub recall: Vec<f64>,
    /// F-beta score.
    pub f_score: Vec<f64>,
    /// Number of true instances (TP + FN).
    pub support: Vec<usize>,
}

impl PrfSupport {
    /// Derive scores from confusion counts.
    pub fn from_confusion(mcm: &MultilabelConfusion, beta: f64) -> Self {
        let tp_sum = mcm.tp_sum();
        let true_sum = mcm.true_sum();

        let precision = prf_divide(&tp_sum, &mcm.pred_sum());
        let recall = prf_divide(&tp_sum, &true_sum);
        let f_score = if beta == f64::INFINITY {
            recall.clone()
        } else {
            precision
                .iter()
                .zip(&recall)
                .map(|(&p, &r)| f_beta(p, r, beta))
                .collect()
        };

        Self {
            labels: mcm.labels(),
            precision,
            recall,
            f_score,
            support: true_sum,
        }
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether there are no classes.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Compute precision, recall, F-measure and support for each class.
///
/// # Arguments
///
/// * `y_true` - True class indices
/// * `y_pred` - Predicted class indices
/// * `labels` - Classes to report; unseen observed classes are appended
/// * `beta` - Weight of recall in the F-score
pub fn precision_recall_fscore_support(
    y_true: &[usize],
    y_pred: &[usize],
    labels: &[usize],
    beta: f64,
) -> PrfSupport {
    let mcm = multilabel_confusion_matrix(y_true, y_pred, labels);
    PrfSupport::from_confusion(&mcm, beta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_divide() {
        assert_eq!(safe_divide(1, 2), 0.5);
        assert_eq!(safe_divide(0, 0), 1.0);
        assert_eq!(safe_divide(0, 3), 0.0);
    }

    #[test]
    fn test_two_class_scores() {
        let prf = precision_recall_fscore_support(&[0, 0, 1, 1], &[0, 1, 1, 1], &[0, 1], DEFAULT_BETA);

        assert!((prf.precision[0] - 1.0).abs() < 1e-6);
        assert!((prf.precision[1] - 2.0 / 3.0).abs() < 1e-6);
        assert!((prf.recall[0] - 0.5).abs() < 1e-6);
        assert!((prf.recall[1] - 1.0).abs() < 1e-6);
        assert!((prf.f_score[0] - 2.0 / 3.0).abs() < 1e-6);
        assert!((prf.f_score[1] - 0.8).abs() < 1e-6);
        assert_eq!(prf.support, vec![2, 2]);
    }

    #[test]
    fn test_never_predicted_class_has_precision_one() {
        // Class 1 is in the truth but never predicted.
        let prf = precision_recall_fscore_support(&[0, 1, 1], &[0, 0, 0], &[0, 1], DEFAULT_BETA);

        assert_eq!(prf.precision[1], 1.0);
        assert_eq!(prf.recall[1], 0.0);
        assert_eq!(prf.f_score[1], 0.0);
    }

    #[test]
    fn test_never_true_class_has_recall_one() {
        let prf = precision_recall_fscore_support(&[0, 0], &[0, 1], &[0, 1], DEFAULT_BETA);

        assert_eq!(prf.precision[1], 0.0);
        assert_eq!(prf.recall[1], 1.0);
        assert_eq!(prf.support[1], 0);
    }

    #[test]
    fn test_infinite_beta_is_recall() {
        let y_true = [0, 1, 2, 2, 1, 0];
        let y_pred = [0, 2, 2, 1, 1, 1];

        let prf = precision_recall_fscore_support(&y_true, &y_pred, &[], f64::INFINITY);

        assert_eq!(prf.f_score, prf.recall);
    }

    #[test]
    fn test_beta_weights_recall() {
        // precision = 1.0, recall = 0.5
        let f2 = f_beta(1.0, 0.5, 2.0);
        let f_half = f_beta(1.0, 0.5, 0.5);

        assert!((f2 - 5.0 * 0.5 / (4.0 + 0.5)).abs() < 1e-9);
        assert!(f_half > f2);
    }

    #[test]
    fn test_zero_precision_and_recall() {
        assert_eq!(f_beta(0.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_empty() {
        let prf = precision_recall_fscore_support(&[], &[], &[], DEFAULT_BETA);
        assert!(prf.is_empty());
    }

    // ============ Property-Based Tests ============

    use proptest::prelude::*;

    fn label_pairs() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
        (0usize..40).prop_flat_map(|n| {
            (
                prop::collection::vec(0usize..6, n),
                prop::collection::vec(0usize..6, n),
            )
        })
    }

    proptest! {
        #[test]
        fn prop_scores_bounded((y_true, y_pred) in label_pairs(), beta in 0.1f64..4.0) {
            let prf = precision_recall_fscore_support(&y_true, &y_pred, &[], beta);

            for values in [&prf.precision, &prf.recall, &prf.f_score] {
                for &v in values.iter() {
                    prop_assert!(!v.is_nan());
                    prop_assert!((0.0..=1.0).contains(&v));
                }
            }
        }

        #[test]
        fn prop_counts_complete((y_true, y_pred) in label_pairs()) {
            let mcm = multilabel_confusion_matrix(&y_true, &y_pred, &[0, 1, 2]);

            for class in mcm.iter() {
                prop_assert_eq!(class.total(), y_true.len());
            }
        }

        #[test]
        fn prop_support_counts_truth((y_true, y_pred) in label_pairs()) {
            let prf = precision_recall_fscore_support(&y_true, &y_pred, &[], DEFAULT_BETA);

            prop_assert_eq!(prf.support.iter().sum::<usize>(), y_true.len());
        }
    }
}
