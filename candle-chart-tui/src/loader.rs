//! Series files: a JSON document holding either six columns
//! `[time, open, high, low, close, volume]` or an array of `{time, open, ...}` rows.

use candle_chart::Series;
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("series file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read series file {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid series file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl LoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. })
    }

    pub fn path(&self) -> &Path {
        match self {
            LoadError::NotFound { path }
            | LoadError::Io { path, .. }
            | LoadError::Parse { path, .. } => path,
        }
    }
}

/// Read and validate the series stored at `path`.
pub fn load_series(path: impl AsRef<Path>) -> Result<Series, LoadError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let series: Series = serde_json::from_str(&contents).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), bars = series.len(), "series loaded");
    Ok(series)
}

/// Chart title for a series file: its file stem, upper-cased.
pub fn series_title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_uppercase())
        .unwrap_or_default()
}
