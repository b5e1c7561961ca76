//! Image tagging evaluation.
//!
//! Every parent category of the label config is a tag; its leaf categories
//! are the classes. Each labeled frame contributes one true and one
//! predicted class per tag.

use rayon::prelude::*;
use tagscore_analysis::{compute_scores, ReportMetric, ScoreReport};
use tagscore_core::{Config, Frame, TagGroup};
use tagscore_data::reorder_preds;

use crate::error::{EvalError, Result};
use crate::result::{nanmean, MetricKind, Scores, ScoresList, TaggingResult, AVERAGE};

/// Upper bound on the default number of worker threads.
pub const MAX_DEFAULT_NPROC: usize = 4;

/// Default worker count: the CPU count, capped at [`MAX_DEFAULT_NPROC`].
pub fn default_nproc() -> usize {
    num_cpus::get().min(MAX_DEFAULT_NPROC)
}

/// Finished scores of one tag, indexed like [`MetricKind::ALL`].
#[derive(Debug)]
struct TagOutput {
    name: String,
    scores: [Scores; 4],
    averages: [f64; 4],
}

/// Aligned class indices of one tag.
#[derive(Debug, Default)]
struct TagLabels {
    y_true: Vec<usize>,
    y_pred: Vec<usize>,
    skipped: usize,
}

fn class_index(tag: &TagGroup, frame: &Frame, side: &'static str, frame_name: &str) -> Result<usize> {
    let value = frame.attribute(&tag.name).ok_or_else(|| EvalError::MissingAttribute {
        tag: tag.name.clone(),
        frame: frame_name.to_string(),
        side,
    })?;
    let class = value.as_category().ok_or_else(|| EvalError::NonCategoricalAttribute {
        tag: tag.name.clone(),
        frame: frame_name.to_string(),
        kind: value.kind(),
    })?;
    tag.classes
        .iter()
        .position(|c| c == class)
        .ok_or_else(|| EvalError::UnknownClass {
            tag: tag.name.clone(),
            class: class.to_string(),
            frame: frame_name.to_string(),
        })
}

fn extract_labels(tag: &TagGroup, ann_frames: &[Frame], pred_frames: &[Frame]) -> Result<TagLabels> {
    let mut labels = TagLabels::default();

    for (pred, gt) in pred_frames.iter().zip(ann_frames) {
        if gt.attributes.is_none() {
            labels.skipped += 1;
            continue;
        }
        if pred.attributes.is_none() {
            return Err(EvalError::MissingPredictionAttributes {
                frame: gt.name.clone(),
            });
        }
        labels.y_pred.push(class_index(tag, pred, "prediction", &gt.name)?);
        labels.y_true.push(class_index(tag, gt, "ground truth", &gt.name)?);
    }

    Ok(labels)
}

fn format_scores(tag: &TagGroup, report: &ScoreReport) -> TagOutput {
    let mut scores: [Scores; 4] = Default::default();
    let mut averages = [f64::NAN; 4];
    // Fewer than two observed classes leaves the macro average undefined.
    let has_macro = report.len() > 3;

    for (i, metric) in ReportMetric::ALL.into_iter().enumerate() {
        scores[i] = tag
            .classes
            .iter()
            .map(|class| {
                let value = report
                    .get(class)
                    .map_or(f64::NAN, |record| record.get(metric) * 100.0);
                (format!("{}.{}", tag.name, class), value)
            })
            .collect();
        if has_macro {
            averages[i] = report.macro_avg.get(metric) * 100.0;
        }
    }

    scores[3] = tag
        .classes
        .iter()
        .map(|class| (format!("{}.{}", tag.name, class), f64::NAN))
        .collect();
    averages[3] = report.accuracy * 100.0;

    TagOutput {
        name: tag.name.clone(),
        scores,
        averages,
    }
}

fn evaluate_tag(tag: &TagGroup, ann_frames: &[Frame], pred_frames: &[Frame]) -> Result<TagOutput> {
    let labels = extract_labels(tag, ann_frames, pred_frames)?;

    let observed = tagscore_analysis::unique_labels(&labels.y_true, &labels.y_pred);
    let names: Vec<&str> = observed.iter().map(|&id| tag.classes[id].as_str()).collect();
    let report = compute_scores(&labels.y_true, &labels.y_pred, &names)?;

    tracing::debug!(
        tag = %tag.name,
        n_frames = labels.y_true.len(),
        skipped = labels.skipped,
        n_classes = report.n_classes(),
        "evaluated tag"
    );

    Ok(format_scores(tag, &report))
}

fn finalize(outputs: Vec<TagOutput>) -> TaggingResult {
    let mut lists: [ScoresList; 4] = Default::default();
    let mut averages: [Scores; 4] = Default::default();

    for output in outputs {
        let tag = output.name.to_uppercase();
        for (i, scores) in output.scores.into_iter().enumerate() {
            lists[i].push(scores);
            averages[i].insert(tag.clone(), output.averages[i]);
        }
    }

    for (list, avgs) in lists.iter_mut().zip(averages) {
        let grand = nanmean(avgs.values());
        list.push(avgs);
        list.push(std::iter::once((AVERAGE, grand)).collect());
    }

    let [precision, recall, f1_score, accuracy] = lists;
    TaggingResult {
        precision,
        recall,
        f1_score,
        accuracy,
    }
}

/// Evaluate image tagging predictions against ground truth.
///
/// Predictions are matched to the ground truth by frame key first. Ground
/// truth frames without attributes are skipped. Per-class scores are scaled
/// to percentages; classes not observed in a tag are NaN.
///
/// # Arguments
///
/// * `ann_frames` - Ground-truth frames
/// * `pred_frames` - Predicted frames, in any order
/// * `config` - Label config; every parent category is a tag
/// * `nproc` - Number of worker threads; tags run sequentially when `<= 1`
///
/// # Errors
///
/// Fails when the config has no parent category or when a frame violates
/// the tagging data contract (see [`EvalError`]).
pub fn evaluate_tagging(
    ann_frames: &[Frame],
    pred_frames: &[Frame],
    config: &Config,
    nproc: usize,
) -> Result<TaggingResult> {
    let pred_frames = reorder_preds(ann_frames, pred_frames);
    let tags = config.parent_categories();
    if tags.is_empty() {
        return Err(EvalError::NoTagCategories);
    }

    tracing::info!(
        n_tags = tags.len(),
        n_frames = ann_frames.len(),
        nproc,
        "evaluating tagging"
    );

    let outputs: Vec<TagOutput> = if nproc > 1 {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(nproc).build()?;
        pool.install(|| {
            tags.par_iter()
                .map(|tag| evaluate_tag(tag, ann_frames, &pred_frames))
                .collect::<Result<Vec<_>>>()
        })?
    } else {
        tags.iter()
            .map(|tag| evaluate_tag(tag, ann_frames, &pred_frames))
            .collect::<Result<Vec<_>>>()?
    };

    let result = finalize(outputs);
    for kind in MetricKind::ALL {
        let average = result
            .metric(kind)
            .last()
            .and_then(|scores| scores.get(AVERAGE))
            .unwrap_or(f64::NAN);
        tracing::debug!(metric = kind.name(), average, "tagging average");
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagscore_core::Category;

    fn weather_config() -> Config {
        Config::new(vec![Category::with_children(
            "weather",
            ["rainy", "clear", "snowy"],
        )])
    }

    fn frame(name: &str, weather: &str) -> Frame {
        Frame::new(name).with_attribute("weather", weather)
    }

    fn frames(values: &[&str]) -> Vec<Frame> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| frame(&format!("{i}.jpg"), v))
            .collect()
    }

    #[test]
    fn test_two_class_tag() {
        // Scenario: true=[0,0,1,1], pred=[0,1,1,1]
        let gts = frames(&["rainy", "rainy", "clear", "clear"]);
        let preds = frames(&["rainy", "clear", "clear", "clear"]);

        let result = evaluate_tagging(&gts, &preds, &weather_config(), 1).unwrap();

        let precision = &result.precision[0];
        assert!((precision.get("weather.rainy").unwrap() - 100.0).abs() < 1e-6);
        assert!((precision.get("weather.clear").unwrap() - 66.666_666).abs() < 1e-3);
        assert!(precision.get("weather.snowy").unwrap().is_nan());

        let recall = &result.recall[0];
        assert!((recall.get("weather.rainy").unwrap() - 50.0).abs() < 1e-6);
        assert!((recall.get("weather.clear").unwrap() - 100.0).abs() < 1e-6);

        let f1_avg = result.f1_score[1].get("WEATHER").unwrap();
        assert!((f1_avg - (200.0 / 3.0 + 80.0) / 2.0).abs() < 1e-6);

        assert!(result.accuracy[0].values().all(f64::is_nan));
        assert!((result.accuracy[1].get("WEATHER").unwrap() - 75.0).abs() < 1e-6);
        assert!((result.accuracy[2].get(AVERAGE).unwrap() - 75.0).abs() < 1e-6);
    }

    #[test]
    fn test_list_shape() {
        let gts = frames(&["rainy", "clear"]);
        let result = evaluate_tagging(&gts, &gts, &weather_config(), 1).unwrap();

        for kind in MetricKind::ALL {
            let list = result.metric(kind);
            assert_eq!(list.len(), 3);
            assert_eq!(
                list[0].keys().collect::<Vec<_>>(),
                vec!["weather.rainy", "weather.clear", "weather.snowy"]
            );
            assert_eq!(list[1].keys().collect::<Vec<_>>(), vec!["WEATHER"]);
            assert_eq!(list[2].keys().collect::<Vec<_>>(), vec![AVERAGE]);
        }
    }

    #[test]
    fn test_unpredicted_class_has_full_precision() {
        let gts = frames(&["rainy", "clear"]);
        let preds = frames(&["rainy", "rainy"]);

        let result = evaluate_tagging(&gts, &preds, &weather_config(), 1).unwrap();

        assert_eq!(result.precision[0].get("weather.clear"), Some(100.0));
        assert_eq!(result.recall[0].get("weather.clear"), Some(0.0));
    }

    #[test]
    fn test_unlabeled_frames_are_skipped() {
        let mut gts = frames(&["rainy", "clear", "clear"]);
        gts.push(Frame::new("3.jpg"));
        gts.push(Frame::new("4.jpg"));
        // Predictions for unlabeled frames are never looked at.
        let mut preds = frames(&["rainy", "rainy", "clear"]);
        preds.push(Frame::new("3.jpg").with_attribute("weather", "snowy"));
        preds.push(Frame::new("4.jpg"));

        let tags = weather_config().parent_categories();
        let labels = extract_labels(&tags[0], &gts, &preds).unwrap();
        assert_eq!(labels.y_true.len(), 3);
        assert_eq!(labels.y_pred.len(), 3);
        assert_eq!(labels.skipped, 2);

        let result = evaluate_tagging(&gts, &preds, &weather_config(), 1).unwrap();

        // 2 of the 3 labeled frames are correct.
        let accuracy = result.accuracy[1].get("WEATHER").unwrap();
        assert!((accuracy - 200.0 / 3.0).abs() < 1e-6);
        assert!(result.precision[0].get("weather.snowy").unwrap().is_nan());
    }

    #[test]
    fn test_single_class_macro_is_nan() {
        let config = Config::new(vec![
            Category::with_children("weather", ["rainy", "clear"]),
            Category::with_children("timeofday", ["day", "night"]),
        ]);
        let gts = vec![
            Frame::new("0.jpg")
                .with_attribute("weather", "rainy")
                .with_attribute("timeofday", "day"),
            Frame::new("1.jpg")
                .with_attribute("weather", "rainy")
                .with_attribute("timeofday", "night"),
        ];

        let result = evaluate_tagging(&gts, &gts, &config, 1).unwrap();

        assert!(result.precision[2].get("WEATHER").unwrap().is_nan());
        assert_eq!(result.precision[2].get("TIMEOFDAY"), Some(100.0));
        assert_eq!(result.precision[3].get(AVERAGE), Some(100.0));
        // Accuracy is defined even with a single class.
        assert_eq!(result.accuracy[2].get("WEATHER"), Some(100.0));
    }

    #[test]
    fn test_missing_prediction_frame() {
        let gts = frames(&["rainy", "clear"]);
        let preds = vec![frame("0.jpg", "rainy")];

        let err = evaluate_tagging(&gts, &preds, &weather_config(), 1).unwrap_err();

        assert!(matches!(err, EvalError::MissingPredictionAttributes { ref frame } if frame == "1.jpg"));
    }

    #[test]
    fn test_missing_tag_in_prediction() {
        let gts = frames(&["rainy"]);
        let preds = vec![Frame::new("0.jpg").with_attribute("other", "x")];

        let err = evaluate_tagging(&gts, &preds, &weather_config(), 1).unwrap_err();

        assert!(matches!(err, EvalError::MissingAttribute { side: "prediction", .. }));
    }

    #[test]
    fn test_missing_tag_in_ground_truth() {
        let gts = vec![Frame::new("0.jpg").with_attribute("scene", "highway")];
        let preds = frames(&["rainy"]);

        let err = evaluate_tagging(&gts, &preds, &weather_config(), 1).unwrap_err();

        assert!(matches!(
            err,
            EvalError::MissingAttribute { side: "ground truth", ref tag, ref frame }
                if tag == "weather" && frame == "0.jpg"
        ));
    }

    #[test]
    fn test_non_categorical_value() {
        let gts = vec![Frame::new("0.jpg").with_attribute("weather", true)];

        let err = evaluate_tagging(&gts, &gts, &weather_config(), 1).unwrap_err();

        assert!(matches!(err, EvalError::NonCategoricalAttribute { kind: "switch", .. }));
    }

    #[test]
    fn test_numeric_tag_value() {
        let gts = frames(&["rainy"]);
        let preds = vec![Frame::new("0.jpg").with_attribute("weather", 0.5)];

        let err = evaluate_tagging(&gts, &preds, &weather_config(), 1).unwrap_err();

        assert!(matches!(err, EvalError::NonCategoricalAttribute { kind: "number", .. }));
    }

    #[test]
    fn test_untagged_numeric_attributes_are_ignored() {
        let gts: Vec<Frame> = frames(&["rainy", "clear"])
            .into_iter()
            .map(|f| f.with_attribute("brightness", 0.5))
            .collect();

        let result = evaluate_tagging(&gts, &gts, &weather_config(), 1).unwrap();

        assert_eq!(result.accuracy[1].get("WEATHER"), Some(100.0));
    }

    #[test]
    fn test_unknown_class() {
        let gts = frames(&["rainy"]);
        let preds = frames(&["foggy"]);

        let err = evaluate_tagging(&gts, &preds, &weather_config(), 1).unwrap_err();

        assert!(matches!(err, EvalError::UnknownClass { ref class, .. } if class == "foggy"));
    }

    #[test]
    fn test_no_tag_categories() {
        let config = Config::new(vec![Category::new("car")]);
        let err = evaluate_tagging(&[], &[], &config, 1).unwrap_err();
        assert!(matches!(err, EvalError::NoTagCategories));
    }

    #[test]
    fn test_empty_tag() {
        let gts = vec![Frame::new("0.jpg")];
        let result = evaluate_tagging(&gts, &gts, &weather_config(), 1).unwrap();

        assert!(result.precision[0].values().all(f64::is_nan));
        assert!(result.accuracy[1].get("WEATHER").unwrap().is_nan());
        assert!(result.accuracy[2].get(AVERAGE).unwrap().is_nan());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = Config::new(vec![
            Category::with_children("weather", ["rainy", "clear", "snowy"]),
            Category::with_children("scene", ["city", "highway"]),
            Category::with_children("timeofday", ["day", "night"]),
        ]);
        let gts: Vec<Frame> = (0..30)
            .map(|i| {
                Frame::new(format!("{i}.jpg"))
                    .with_attribute("weather", ["rainy", "clear", "snowy"][i % 3])
                    .with_attribute("scene", ["city", "highway"][i % 2])
                    .with_attribute("timeofday", ["day", "night"][(i / 4) % 2])
            })
            .collect();
        let preds: Vec<Frame> = (0..30)
            .map(|i| {
                Frame::new(format!("{i}.jpg"))
                    .with_attribute("weather", ["rainy", "clear", "snowy"][(i + i / 5) % 3])
                    .with_attribute("scene", ["city", "highway"][(i / 3) % 2])
                    .with_attribute("timeofday", ["day", "night"][(i / 4) % 2])
            })
            .rev()
            .collect();

        let sequential = evaluate_tagging(&gts, &preds, &config, 1).unwrap();
        let parallel = evaluate_tagging(&gts, &preds, &config, 3).unwrap();

        assert_eq!(sequential, parallel);
        assert_eq!(
            parallel.precision[3].keys().collect::<Vec<_>>(),
            vec!["WEATHER", "SCENE", "TIMEOFDAY"]
        );
    }

    #[test]
    fn test_default_nproc() {
        let n = default_nproc();
        assert!((1..=MAX_DEFAULT_NPROC).contains(&n));
    }
}
