//! Reading frames and label configs, writing results.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tagscore_core::{Config, Frame};

use crate::error::{DataError, Result};

/// Frames loaded from disk, with the label config if the file embeds one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Frames in file order.
    pub frames: Vec<Frame>,
    /// Embedded label config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Config>,
}

impl Dataset {
    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether there are no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Accepted shapes of a dataset file.
#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Frames(Vec<Frame>),
    Dataset(Dataset),
}

impl From<DatasetFile> for Dataset {
    fn from(file: DatasetFile) -> Self {
        match file {
            DatasetFile::Frames(frames) => Dataset { frames, config: None },
            DatasetFile::Dataset(dataset) => dataset,
        }
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .map_or(false, |e| e.eq_ignore_ascii_case(ext))
}

fn read_dataset_file(path: &Path) -> Result<Dataset> {
    let content = fs::read_to_string(path)?;
    let file: DatasetFile = serde_json::from_str(&content).map_err(|e| {
        DataError::FormatError(format!("Failed to parse {}: {}", path.display(), e))
    })?;
    Ok(file.into())
}

/// Load frames from a JSON file or a directory of JSON files.
///
/// A file holds either a list of frames or an object with `frames` and an
/// optional `config`. Directory entries are read in sorted file-name order
/// and concatenated; the first embedded config wins.
///
/// # Arguments
///
/// * `path` - Path to a `.json` file or a directory
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DataError::NotFound(path.to_path_buf()));
    }

    if path.is_file() {
        let dataset = read_dataset_file(path)?;
        tracing::debug!(path = %path.display(), n_frames = dataset.len(), "loaded dataset");
        return Ok(dataset);
    }

    let mut files: Vec<_> = fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && has_extension(p, "json"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(DataError::EmptyDataset(path.to_path_buf()));
    }

    let mut dataset = Dataset::default();
    for file in &files {
        let part = read_dataset_file(file)?;
        dataset.frames.extend(part.frames);
        if dataset.config.is_none() {
            dataset.config = part.config;
        }
    }

    tracing::debug!(
        path = %path.display(),
        n_files = files.len(),
        n_frames = dataset.len(),
        "loaded dataset directory"
    );
    Ok(dataset)
}

/// Load a label config from a `.toml` or `.json` file.
pub fn load_label_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(DataError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let config = if has_extension(path, "toml") {
        Config::from_toml_str(&content)?
    } else if has_extension(path, "json") {
        serde_json::from_str(&content)?
    } else {
        return Err(DataError::UnsupportedFormat(path.to_path_buf()));
    };

    tracing::debug!(
        path = %path.display(),
        n_categories = config.categories.len(),
        "loaded label config"
    );
    Ok(config)
}

/// Write a value as pretty-printed JSON, creating parent directories.
pub fn write_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
