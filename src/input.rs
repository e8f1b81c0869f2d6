//! Decides which pipeline a piece of input goes through: JSON observations,
//! arbitrary JSON (pretty-printed), or a raw METAR line.

use crate::decode::render_raw_text;
use crate::error::MetarError;
use crate::observation::Observation;
use crate::render::{write_reports, ReportLine};
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::io::{self, Write};

/// Result of decoding one piece of input.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedOutput {
    /// One entry per observation, each an ordered list of lines.
    Reports(Vec<Vec<ReportLine>>),
    /// JSON that did not hold observations, re-indented.
    PrettyJson(String),
}

impl DecodedOutput {
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self {
            DecodedOutput::Reports(reports) => write_reports(out, reports),
            DecodedOutput::PrettyJson(json) => writeln!(out, "{}", json),
        }
    }
}

/// Decodes input that is either a raw METAR line or JSON from the
/// aviation-weather API.
///
/// Input starting with `{` or `[` is treated as JSON: an array of
/// observations renders each one, an object with a `rawOb` renders that
/// observation, and anything else is pretty-printed. Other input goes through
/// the raw-text decoder.
///
/// # Errors
///
/// Returns [`MetarError::InvalidJson`] when the input looks like JSON but does
/// not parse, and [`MetarError::Decode`] when raw input has no content.
///
/// # Examples
///
/// ```
/// use metar_decoder::{decode_input, DecodedOutput};
///
/// let output = decode_input(r#"[{"icaoId": "KRDU", "wspd": 0, "wdir": 0}]"#).unwrap();
/// let DecodedOutput::Reports(reports) = output else { panic!("expected reports") };
/// assert_eq!(reports[0][0].to_string(), "Station: KRDU");
/// ```
pub fn decode_input(input: &str) -> Result<DecodedOutput, MetarError> {
    let trimmed = input.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return Ok(DecodedOutput::Reports(vec![render_raw_text(trimmed)?]));
    }

    let value: Value = serde_json::from_str(trimmed).map_err(MetarError::InvalidJson)?;
    if let Some(reports) = observations_in(&value) {
        info!("Decoded {} JSON observation(s)", reports.len());
        return Ok(DecodedOutput::Reports(reports));
    }
    let pretty = serde_json::to_string_pretty(&value).map_err(MetarError::InvalidJson)?;
    Ok(DecodedOutput::PrettyJson(pretty))
}

fn observations_in(value: &Value) -> Option<Vec<Vec<ReportLine>>> {
    match value {
        Value::Array(items) => {
            // Each element stands alone; a bad one is skipped, not fatal.
            let reports: Vec<Vec<ReportLine>> = items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| match Observation::deserialize(item) {
                    Ok(obs) => Some(obs.lines()),
                    Err(e) => {
                        warn!("Skipping array element {} that is not an observation: {}", i, e);
                        None
                    }
                })
                .collect();
            (!reports.is_empty()).then_some(reports)
        }
        Value::Object(_) => Observation::deserialize(value)
            .ok()
            .filter(Observation::has_raw_report)
            .map(|obs| vec![obs.lines()]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::error::DecodeError;
    use crate::render::Label;

    #[test]
    fn test_raw_line() {
        let DecodedOutput::Reports(reports) = decode_input("KRDU 211251Z 00000KT\n").unwrap()
        else {
            panic!("expected reports");
        };
        assert_eq!(reports.len(), 1);
        assert!(reports[0].contains(&ReportLine::new(Label::Wind, "Calm")));
    }

    #[test]
    fn test_array_skips_bad_elements() {
        let input = r#"[{"icaoId": "KRDU", "wspd": 4}, 42, {"icaoId": "KTYS"}]"#;
        let DecodedOutput::Reports(reports) = decode_input(input).unwrap() else {
            panic!("expected reports");
        };
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1][0], ReportLine::new(Label::Station, "KTYS"));
    }

    #[test]
    fn test_object_needs_raw_report() {
        let with_raw = r#"{"rawOb": "KRDU 211251Z AUTO", "icaoId": "KRDU"}"#;
        assert!(matches!(
            decode_input(with_raw).unwrap(),
            DecodedOutput::Reports(_)
        ));

        let without_raw = r#"{"status": "ok", "count": 2}"#;
        let DecodedOutput::PrettyJson(json) = decode_input(without_raw).unwrap() else {
            panic!("expected pretty JSON");
        };
        // Keys come back sorted.
        assert_eq!(json, "{\n  \"count\": 2,\n  \"status\": \"ok\"\n}");
    }

    #[test]
    fn test_empty_array_is_pretty_printed() {
        assert_eq!(
            decode_input("[]").unwrap(),
            DecodedOutput::PrettyJson("[]".to_string())
        );
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            decode_input("{not json"),
            Err(MetarError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_blank_input() {
        assert!(matches!(
            decode_input("   "),
            Err(MetarError::Decode(DecodeError::NoContent))
        ));
    }

    #[test]
    fn test_write_pretty_json_adds_newline() {
        let mut out = Vec::new();
        DecodedOutput::PrettyJson("{}".to_string())
            .write_to(&mut out)
            .unwrap();
        assert_eq!(out, b"{}\n");
    }
}
