use std::{collections::HashMap, fmt::Write as _, fs, path::Path};

use rhein_schema::{Chart, EventValue, MANIA_CHART_TYPE};

mod error;
pub mod json;
mod parser;

pub use error::{ParseError, ParseErrorKind};
pub use parser::{HEADER, VERSION, VERSION_PREFIX};

use parser::parse_rch;

/// Conventional extension for text charts.
pub const EXTENSION: &str = "rch";

pub fn parse_file(path: impl AsRef<Path>) -> Result<Chart, ParseError> {
    let path = path.as_ref();
    let src = fs::read_to_string(path).map_err(|e| {
        ParseError::new("E2001", format!("failed to read chart: {e}"), 0)
            .with_file(path.display().to_string())
    })?;
    parse_str(&src).map_err(|e| e.with_file(path.display().to_string()))
}

pub fn parse_str(src: &str) -> Result<Chart, ParseError> {
    let parsed = parse_rch(src)?;

    let bpm = parsed.properties.bpm.ok_or_else(|| {
        ParseError::new("E3001", "missing Bpm property", parsed.properties_line)
    })?;
    if !(bpm.is_finite() && bpm > 0.0) {
        return Err(ParseError::new(
            "E3001",
            format!("Bpm must be > 0 (got {bpm})"),
            parsed.properties_line,
        ));
    }

    check_lane_order(&parsed.notes)?;

    let mut events: Vec<_> = parsed.events.into_iter().map(|(_, e)| e).collect();
    events.sort_by(|a, b| a.beat.total_cmp(&b.beat));

    Ok(Chart {
        kind: parsed.properties.kind.unwrap_or(MANIA_CHART_TYPE),
        name: parsed.properties.name,
        bpm,
        offset_ms: parsed.properties.offset_ms.unwrap_or(0),
        notes: parsed.notes.into_iter().map(|(_, n)| n).collect(),
        events,
    })
}

/// Lanes are consumed head-first, so each lane must be authored in beat order.
fn check_lane_order(notes: &[(usize, rhein_schema::ChartNote)]) -> Result<(), ParseError> {
    let mut last: HashMap<u32, f64> = HashMap::new();
    for (line, note) in notes {
        if let Some(prev) = last.insert(note.lane, note.beat) {
            if note.beat < prev {
                return Err(ParseError::new(
                    "E3002",
                    format!(
                        "lane {} goes backwards (beat {} after {})",
                        note.lane, note.beat, prev
                    ),
                    *line,
                ));
            }
        }
    }
    Ok(())
}

/// Fields are trimmed and end at the line break when read back.
fn fits_on_a_line(text: &str) -> bool {
    !text.contains(['\n', '\r']) && text.trim() == text
}

/// Writes `chart` in the text format accepted by [`parse_str`].
///
/// Fails with E3003 for a name or text event value the parser would read
/// back differently, such as `"12"` which comes back as a number.
pub fn to_chart_string(chart: &Chart) -> Result<String, ParseError> {
    if let Some(name) = chart.name.as_deref().filter(|n| !fits_on_a_line(n)) {
        return Err(ParseError::new("E3003", "name cannot be written as text", 0)
            .with_section("Properties")
            .with_context(name.to_string()));
    }
    for event in &chart.events {
        if let EventValue::Text(text) = &event.value {
            if !fits_on_a_line(text) || EventValue::parse(text) != event.value {
                return Err(ParseError::new(
                    "E3003",
                    format!("event value at beat {} cannot be written as text", event.beat),
                    0,
                )
                .with_section("Events")
                .with_context(text.clone()));
            }
        }
    }

    let mut out = String::new();
    // writing into a String cannot fail
    let _ = writeln!(out, "{HEADER}");
    let _ = writeln!(out, "{VERSION_PREFIX}{VERSION}");
    let _ = writeln!(out);
    let _ = writeln!(out, "[Properties]");
    let _ = writeln!(out, "Type: {}", chart.kind);
    if let Some(name) = &chart.name {
        let _ = writeln!(out, "Name: {name}");
    }
    let _ = writeln!(out, "Bpm: {}", chart.bpm);
    let _ = writeln!(out, "Offset: {}", chart.offset_ms);

    let _ = writeln!(out);
    let _ = writeln!(out, "[Notes]");
    for note in &chart.notes {
        if note.length > 0.0 {
            let _ = writeln!(out, "{}:{}:{}", note.lane, note.beat, note.length);
        } else {
            let _ = writeln!(out, "{}:{}", note.lane, note.beat);
        }
    }

    if !chart.events.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "[Events]");
        for event in &chart.events {
            let _ = writeln!(out, "{}:{}:{}", event.kind, event.beat, event.value);
        }
    }
    Ok(out)
}
