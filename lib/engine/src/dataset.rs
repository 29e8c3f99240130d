//! Reading raw observation records from disk
//!
//! Accepts a JSON array of records or JSON lines (one record per line),
//! optionally gzip-compressed when the file name ends in `.gz`.

use anyhow::{anyhow, Context, Result};
use flate2::read::GzDecoder;
use modelmatch_schema::RawRecord;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub fn read_records(path: &Path) -> Result<Vec<RawRecord>> {
    let file = File::open(path).with_context(|| format!("Failed to open dataset {}", path.display()))?;

    let mut data = Vec::new();
    if path.extension().is_some_and(|ext| ext == "gz") {
        let mut decoder = GzDecoder::new(BufReader::new(file));
        decoder
            .read_to_end(&mut data)
            .with_context(|| format!("Failed to decompress {}", path.display()))?;
    } else {
        BufReader::new(file).read_to_end(&mut data)?;
    }

    let records = parse_records(&data).with_context(|| format!("Invalid dataset {}", path.display()))?;
    tracing::debug!(path = %path.display(), records = records.len(), "dataset read");
    Ok(records)
}

pub fn parse_records(data: &[u8]) -> Result<Vec<RawRecord>> {
    let text = std::str::from_utf8(data).context("Dataset is not valid UTF-8")?;
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();

    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(|e| anyhow!("JSON array: {}", e));
    }

    let mut records = Vec::new();
    for (line_no, line) in trimmed.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: RawRecord =
            serde_json::from_str(line).map_err(|e| anyhow!("line {}: {}", line_no + 1, e))?;
        records.push(record);
    }
    Ok(records)
}
