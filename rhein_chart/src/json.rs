use std::{fs, path::Path};

use anyhow::Context;
use rhein_schema::Chart;

pub fn load_json_from_path(path: impl AsRef<Path>) -> anyhow::Result<Chart> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("failed to read chart: {}", path.display()))?;
    let chart: Chart = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse chart json: {}", path.display()))?;
    Ok(chart)
}

pub fn load_json_from_str(json: &str) -> anyhow::Result<Chart> {
    let chart: Chart = serde_json::from_str(json).context("failed to parse chart json")?;
    Ok(chart)
}

/// Loads either format, picking by extension (`.json` vs anything else).
pub fn load_any(path: impl AsRef<Path>) -> anyhow::Result<Chart> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        load_json_from_path(path)
    } else {
        crate::parse_file(path).with_context(|| format!("failed to parse chart: {}", path.display()))
    }
}
