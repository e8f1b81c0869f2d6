//! Raw-text METAR decoding: tokenizer, per-field decoders and the grammar
//! walker that ties them together.

pub mod error;
pub mod fields;
pub mod phenomena;
pub mod report;
pub mod sky;
pub mod tokens;
pub mod walker;

use crate::decode::error::DecodeError;
use crate::render::{Label, ReportLine};
use log::warn;

/// Runs the raw-text pipeline over free-form input.
///
/// Only the first non-blank line is decoded. A line too short to hold a
/// station and time is not an error here: the output is just its `Raw` line.
///
/// ```
/// use metar_decoder::{render_raw_text, Label};
///
/// let lines = render_raw_text("\n  KRDU 211251Z\n").unwrap();
/// assert_eq!(lines.len(), 1);
/// assert_eq!(lines[0].label, Label::Raw);
/// assert_eq!(lines[0].value, "KRDU 211251Z");
/// ```
pub fn render_raw_text(input: &str) -> Result<Vec<ReportLine>, DecodeError> {
    let line = first_report_line(input).ok_or(DecodeError::NoContent)?;
    match walker::decode_report(line) {
        Ok(report) => Ok(report.lines()),
        Err(e @ DecodeError::MalformedReport { .. }) => {
            warn!("{}; echoing raw line only", e);
            Ok(vec![ReportLine::new(Label::Raw, line)])
        }
        Err(e) => Err(e),
    }
}

fn first_report_line(input: &str) -> Option<&str> {
    input.lines().map(str::trim).find(|line| !line.is_empty())
}
