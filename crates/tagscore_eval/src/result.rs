//! Tagging evaluation results.
//!
//! A [`TaggingResult`] holds one [`ScoresList`] per [`MetricKind`]. Each list
//! has one dictionary per tag (keyed `"{tag}.{class}"`), then a dictionary
//! of per-tag averages (keyed by the uppercased tag) and finally a single
//! [`AVERAGE`] entry.

use std::fmt;
use std::str::FromStr;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Result;

/// Key of the grand average entry.
pub const AVERAGE: &str = "AVERAGE";

const EPSILON: f64 = 1e-6;

/// Metrics reported by a tagging evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Precision.
    Precision,
    /// Recall.
    Recall,
    /// F1-score.
    F1Score,
    /// Accuracy.
    Accuracy,
}

impl MetricKind {
    /// All metrics in report order.
    pub const ALL: [MetricKind; 4] = [
        Self::Precision,
        Self::Recall,
        Self::F1Score,
        Self::Accuracy,
    ];

    /// Field name used in summaries and JSON.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Precision => "precision",
            Self::Recall => "recall",
            Self::F1Score => "f1_score",
            Self::Accuracy => "accuracy",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| format!("unknown metric '{}'", s))
    }
}

/// Mean of the non-NaN values, NaN if there are none.
pub fn nanmean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (sum, count) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

fn approx_eq(a: f64, b: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    a == b || (a - b).abs() <= EPSILON * a.abs().max(b.abs()).max(1.0)
}

/// Score dictionary that keeps insertion order.
///
/// Serialized as a JSON object; NaN values become `null` and read back as NaN.
#[derive(Debug, Clone, Default)]
pub struct Scores(Vec<(String, f64)>);

impl Scores {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, keeping the position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Value of a key.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.iter().find(|(k, _)| k == key).map(|&(_, v)| v)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(|&(_, v)| v)
    }
}

impl PartialEq for Scores {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|((ka, va), (kb, vb))| ka == kb && approx_eq(*va, *vb))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Scores {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut scores = Scores::new();
        for (key, value) in iter {
            scores.insert(key, value);
        }
        scores
    }
}

impl Serialize for Scores {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            let value = if value.is_nan() { None } else { Some(*value) };
            map.serialize_entry(key, &value)?;
        }
        map.end()
    }
}

struct ScoresVisitor;

impl<'de> Visitor<'de> for ScoresVisitor {
    type Value = Scores;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of score names to numbers or null")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Scores, A::Error> {
        let mut scores = Scores::new();
        while let Some((key, value)) = access.next_entry::<String, Option<f64>>()? {
            scores.insert(key, value.unwrap_or(f64::NAN));
        }
        Ok(scores)
    }
}

impl<'de> Deserialize<'de> for Scores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(ScoresVisitor)
    }
}

/// Score dictionaries of one metric.
pub type ScoresList = Vec<Scores>;

/// Result of a tagging evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaggingResult {
    /// Precision per tag class, x100.
    pub precision: ScoresList,
    /// Recall per tag class, x100.
    pub recall: ScoresList,
    /// F1-score per tag class, x100.
    pub f1_score: ScoresList,
    /// Accuracy; class cells are NaN, tag averages carry the accuracy.
    pub accuracy: ScoresList,
}

impl TaggingResult {
    /// Scores list of a metric.
    pub fn metric(&self, kind: MetricKind) -> &ScoresList {
        match kind {
            MetricKind::Precision => &self.precision,
            MetricKind::Recall => &self.recall,
            MetricKind::F1Score => &self.f1_score,
            MetricKind::Accuracy => &self.accuracy,
        }
    }

    /// Flatten the per-tag averages and grand averages of every metric.
    ///
    /// Emits `"{metric}/{TAG}"` for each per-tag average, then `"{metric}"`
    /// for the grand average.
    pub fn summary(&self) -> Scores {
        self.summary_filtered(None, None)
    }

    /// Like [`summary`](Self::summary), restricted to `include` (all if
    /// `None`) minus `exclude`.
    pub fn summary_filtered(
        &self,
        include: Option<&[MetricKind]>,
        exclude: Option<&[MetricKind]>,
    ) -> Scores {
        let mut summary = Scores::new();
        let selected = MetricKind::ALL.into_iter().filter(|m| {
            include.map_or(true, |inc| inc.contains(m)) && !exclude.map_or(false, |exc| exc.contains(m))
        });

        for kind in selected {
            let list = self.metric(kind);
            if list.len() < 2 {
                continue;
            }
            for (tag, score) in list[list.len() - 2].iter() {
                summary.insert(format!("{}/{}", kind.name(), tag), score);
            }
            let average = list[list.len() - 1].get(AVERAGE).unwrap_or(f64::NAN);
            summary.insert(kind.name(), average);
        }
        summary
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Display the result as a formatted string.
    pub fn to_string_table(&self) -> String {
        let width = MetricKind::ALL
            .iter()
            .flat_map(|&kind| self.metric(kind).iter())
            .flat_map(Scores::keys)
            .map(str::len)
            .max()
            .unwrap_or(0)
            .max(AVERAGE.len());

        let mut output = String::new();
        for kind in MetricKind::ALL {
            let list = self.metric(kind);
            output.push_str(&format!("[{}]\n", kind.name()));
            for (i, scores) in list.iter().enumerate() {
                // Separate per-tag rows from the trailing averages.
                if i > 0 && i + 2 >= list.len() {
                    output.push_str(&format!("{}\n", "-".repeat(width + 10)));
                }
                for (key, value) in scores.iter() {
                    output.push_str(&format!("{:<width$}{:>10}\n", key, format_score(value)));
                }
            }
            output.push('\n');
        }
        output
    }
}

fn format_score(value: f64) -> String {
    if value.is_nan() {
        "-".to_string()
    } else {
        format!("{:.2}", value)
    }
}

impl PartialEq for TaggingResult {
    fn eq(&self, other: &Self) -> bool {
        MetricKind::ALL
            .into_iter()
            .all(|kind| self.metric(kind) == other.metric(kind))
    }
}

impl fmt::Display for TaggingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_table())
    }
}
