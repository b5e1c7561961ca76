//! Aligning predictions with ground-truth frames.

use std::collections::HashMap;

use tagscore_core::Frame;

/// Reorder predictions to follow the ground-truth frame order.
///
/// Predictions are matched on `(video_name, name)`. A ground-truth frame
/// without a prediction gets an empty frame carrying the same name and
/// video but no attributes. When several predictions share a key, the last
/// one wins.
pub fn reorder_preds(gts: &[Frame], preds: &[Frame]) -> Vec<Frame> {
    let by_key: HashMap<(Option<&str>, &str), &Frame> =
        preds.iter().map(|frame| (frame.key(), frame)).collect();

    let mut missing = 0usize;
    let ordered: Vec<Frame> = gts
        .iter()
        .map(|gt| match by_key.get(&gt.key()) {
            Some(&pred) => pred.clone(),
            None => {
                missing += 1;
                Frame {
                    name: gt.name.clone(),
                    video_name: gt.video_name.clone(),
                    ..Default::default()
                }
            }
        })
        .collect();

    if missing > 0 {
        tracing::error!(
            missing,
            total = gts.len(),
            "{} frames are missing in the predictions",
            missing
        );
    }

    ordered
}
