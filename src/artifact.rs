//! JSON artifacts handed to later pipeline stages

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Outcome of the tag job as recorded for downstream stages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagArtifact {
    pub status: TagStatus,
    pub base_tag: String,
    pub tag: Option<String>,
    pub version: Option<String>,
    pub target: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagStatus {
    Created,
    Planned,
    UpToDate,
    Malformed,
}

/// Write `value` as pretty-printed JSON, replacing any existing file.
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json + "\n")?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
