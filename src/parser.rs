//! Decoding upstream provider payloads into [`UpstreamData`].
//!
//! Two layouts are understood:
//!
//! - a JSON bundle (optionally gzip-compressed, `.gz`) with one key per stream;
//! - a directory of CSV files, `pti.csv`, `vedic.csv` and `personal.csv`
//!   (`date,label`) plus `bird_batch.csv`, `yogi_point.csv` and
//!   `part_of_fortune.csv` (`start,end,tag`).
//!
//! A missing key or file means the provider supplied nothing for that stream.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::calendar::UpstreamData;

/// Decodes a JSON upstream bundle from raw bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not a valid bundle.
pub fn parse_upstream(bytes: &[u8]) -> Result<UpstreamData> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Loads upstream data from a JSON bundle, a `.gz` bundle, or a CSV directory.
pub fn load_upstream(path: &Path) -> Result<UpstreamData> {
    if path.is_dir() {
        return load_upstream_dir(path);
    }

    let mut bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read upstream bundle {}", path.display()))?;

    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        let mut decoded = Vec::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_end(&mut decoded)
            .with_context(|| format!("Failed to decompress {}", path.display()))?;
        bytes = decoded;
    }

    parse_upstream(&bytes).with_context(|| format!("Invalid upstream bundle {}", path.display()))
}

/// Loads one CSV file per stream from `dir`.
pub fn load_upstream_dir(dir: &Path) -> Result<UpstreamData> {
    Ok(UpstreamData {
        pti: load_csv(&dir.join("pti.csv"))?,
        vedic: load_csv(&dir.join("vedic.csv"))?,
        personal: load_csv(&dir.join("personal.csv"))?,
        bird_batch: load_csv(&dir.join("bird_batch.csv"))?,
        yogi_point: load_csv(&dir.join("yogi_point.csv"))?,
        part_of_fortune: load_csv(&dir.join("part_of_fortune.csv"))?,
    })
}

fn load_csv<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>> {
    if !path.exists() {
        debug!(path = %path.display(), "Stream file absent");
        return Ok(None);
    }

    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let record: T = result.with_context(|| format!("Bad row in {}", path.display()))?;
        rows.push(record);
    }

    debug!(path = %path.display(), rows = rows.len(), "Stream file loaded");
    Ok(Some(rows))
}
