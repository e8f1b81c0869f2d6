//! The shared output contract of both pipelines: an ordered list of labelled
//! lines such as `Wind: 190° at 04 kt`.

use std::fmt;
use std::io::{self, Write};

/// Line labels, declared in the order lines are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    Station,
    Report,
    Observed,
    Modifier,
    Wind,
    WindVariation,
    Visibility,
    Weather,
    Sky,
    TempDew,
    Altimeter,
    Remarks,
    Raw,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Station => "Station",
            Label::Report => "Report",
            Label::Observed => "Observed",
            Label::Modifier => "Modifier",
            Label::Wind => "Wind",
            Label::WindVariation => "Wind variation",
            Label::Visibility => "Visibility",
            Label::Weather => "Weather",
            Label::Sky => "Sky",
            Label::TempDew => "Temp/Dew",
            Label::Altimeter => "Altimeter",
            Label::Remarks => "Remarks",
            Label::Raw => "Raw",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One human-readable output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub label: Label,
    pub value: String,
}

impl ReportLine {
    pub fn new(label: Label, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Formats as `Label: value`.
impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

/// Writes one report's lines, one per line.
pub fn write_lines<W: Write>(out: &mut W, lines: &[ReportLine]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Writes several reports with a blank line between consecutive ones.
pub fn write_reports<W: Write>(out: &mut W, reports: &[Vec<ReportLine>]) -> io::Result<()> {
    for (i, lines) in reports.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        write_lines(out, lines)?;
    }
    Ok(())
}
