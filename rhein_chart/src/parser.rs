use rhein_schema::{ChartEvent, ChartNote, EventValue};

use crate::ParseError;

pub const HEADER: &str = "RHEIN CHART";
pub const VERSION_PREFIX: &str = "VERSION ";
pub const VERSION: u32 = 1;

#[derive(Debug, Default, Clone)]
pub(crate) struct ParsedProperties {
    pub(crate) kind: Option<i32>,
    pub(crate) name: Option<String>,
    pub(crate) bpm: Option<f64>,
    pub(crate) offset_ms: Option<i32>,
}

#[derive(Debug, Clone)]
pub(crate) struct ParsedChart {
    pub(crate) properties: ParsedProperties,
    pub(crate) properties_line: usize,
    pub(crate) notes: Vec<(usize, ChartNote)>,
    pub(crate) events: Vec<(usize, ChartEvent)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Properties,
    Notes,
    Events,
}

impl Section {
    fn name(self) -> &'static str {
        match self {
            Section::None => "",
            Section::Properties => "Properties",
            Section::Notes => "Notes",
            Section::Events => "Events",
        }
    }
}

pub(crate) fn parse_rch(src: &str) -> Result<ParsedChart, ParseError> {
    let mut lines = src
        .lines()
        .enumerate()
        .map(|(i, raw)| (i + 1, raw.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

    match lines.next() {
        Some((_, HEADER)) => {}
        Some((line_no, other)) => {
            return Err(
                ParseError::new("E1001", format!("expected `{HEADER}` header"), line_no)
                    .with_context(other.to_string()),
            );
        }
        None => return Err(ParseError::new("E1001", "empty chart", 0)),
    }

    let (version_line, version_str) = lines
        .next()
        .ok_or_else(|| ParseError::new("E1002", "missing version line", 0))?;
    parse_version(version_str, version_line)?;

    let mut properties = ParsedProperties::default();
    let mut properties_line = 0;
    let mut notes = Vec::new();
    let mut events = Vec::new();
    let mut section = Section::None;

    for (line_no, line) in lines {
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = match name.trim() {
                "Properties" => {
                    properties_line = line_no;
                    Section::Properties
                }
                "Notes" => Section::Notes,
                "Events" => Section::Events,
                other => {
                    return Err(ParseError::new(
                        "E1102",
                        format!("unknown section: [{other}]"),
                        line_no,
                    ));
                }
            };
            continue;
        }

        match section {
            Section::None => {
                return Err(ParseError::new(
                    "E1101",
                    "content outside of a section",
                    line_no,
                )
                .with_context(line.to_string()));
            }
            Section::Properties => parse_property(&mut properties, line, line_no)?,
            Section::Notes => notes.push((line_no, parse_note(line, line_no)?)),
            Section::Events => events.push((line_no, parse_event(line, line_no)?)),
        }
    }

    Ok(ParsedChart {
        properties,
        properties_line,
        notes,
        events,
    })
}

fn parse_version(line: &str, line_no: usize) -> Result<u32, ParseError> {
    let number = line.strip_prefix(VERSION_PREFIX).ok_or_else(|| {
        ParseError::new("E1002", format!("expected `{VERSION_PREFIX}<n>`"), line_no)
            .with_context(line.to_string())
    })?;
    let version: u32 = number.trim().parse().map_err(|_| {
        ParseError::new("E1002", "version is not a number", line_no).with_context(line.to_string())
    })?;
    if version != VERSION {
        return Err(ParseError::new(
            "E1003",
            format!("unsupported chart version {version}"),
            line_no,
        ));
    }
    Ok(version)
}

fn parse_property(
    props: &mut ParsedProperties,
    line: &str,
    line_no: usize,
) -> Result<(), ParseError> {
    let err = |msg: String| {
        ParseError::new("E1201", msg, line_no)
            .with_section(Section::Properties.name())
            .with_context(line.to_string())
    };

    let (key, value) = line
        .split_once(':')
        .ok_or_else(|| err("property must be `Key: value`".to_string()))?;
    let (key, value) = (key.trim(), value.trim());

    match key {
        "Type" => {
            props.kind = Some(value.parse().map_err(|_| err(format!("invalid Type: {value}")))?);
        }
        "Name" => props.name = Some(value.to_string()),
        "Bpm" => {
            props.bpm = Some(value.parse().map_err(|_| err(format!("invalid Bpm: {value}")))?);
        }
        "Offset" => {
            props.offset_ms =
                Some(value.parse().map_err(|_| err(format!("invalid Offset: {value}")))?);
        }
        other => return Err(err(format!("unknown property: {other}"))),
    }
    Ok(())
}

fn parse_note(line: &str, line_no: usize) -> Result<ChartNote, ParseError> {
    let err = |msg: String| {
        ParseError::new("E1301", msg, line_no)
            .with_section(Section::Notes.name())
            .with_context(line.to_string())
    };

    let fields: Vec<&str> = line.split(':').map(str::trim).collect();
    if !(2..=3).contains(&fields.len()) {
        return Err(err("note must be `lane:beat[:length]`".to_string()));
    }

    let lane: u32 = fields[0]
        .parse()
        .map_err(|_| err(format!("invalid lane: {}", fields[0])))?;
    let beat = parse_finite(fields[1]).ok_or_else(|| err(format!("invalid beat: {}", fields[1])))?;
    let length = match fields.get(2) {
        Some(raw) => parse_finite(raw)
            .filter(|l| *l >= 0.0)
            .ok_or_else(|| err(format!("invalid length: {raw}")))?,
        None => 0.0,
    };

    Ok(ChartNote { lane, beat, length })
}

fn parse_event(line: &str, line_no: usize) -> Result<ChartEvent, ParseError> {
    let err = |msg: String| {
        ParseError::new("E1401", msg, line_no)
            .with_section(Section::Events.name())
            .with_context(line.to_string())
    };

    // the value may itself contain ':'
    let mut fields = line.splitn(3, ':').map(str::trim);
    let (Some(kind), Some(beat), Some(value)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(err("event must be `type:beat:value`".to_string()));
    };

    let kind: i32 = kind.parse().map_err(|_| err(format!("invalid type: {kind}")))?;
    let beat = parse_finite(beat).ok_or_else(|| err(format!("invalid beat: {beat}")))?;

    Ok(ChartEvent {
        kind,
        beat,
        value: EventValue::parse(value),
    })
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
