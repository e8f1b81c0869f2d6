//! Decoded view of one METAR/SPECI line.

use crate::decode::fields::{Altimeter, TempDew, Visibility, Wind, WindVariation};
use crate::decode::phenomena::WeatherToken;
use crate::decode::sky::SkyLayer;
use crate::render::{Label, ReportLine};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    Metar,
    Speci,
}

impl ReportType {
    pub fn from_token(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("METAR") {
            Some(ReportType::Metar)
        } else if token.eq_ignore_ascii_case("SPECI") {
            Some(ReportType::Speci)
        } else {
            None
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportType::Metar => f.write_str("METAR"),
            ReportType::Speci => f.write_str("SPECI"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Automated,
    Corrected,
}

impl Modifier {
    pub fn from_token(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("AUTO") {
            Some(Modifier::Automated)
        } else if token.eq_ignore_ascii_case("COR") {
            Some(Modifier::Corrected)
        } else {
            None
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Automated => f.write_str("Automated"),
            Modifier::Corrected => f.write_str("Corrected"),
        }
    }
}

/// Identification block at the start of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportHeader {
    pub report_type: Option<ReportType>,
    pub station: String,
    /// Observation time as written, in `DDHHMMZ` form.
    pub observed: String,
    pub modifier: Option<Modifier>,
}

/// Every field recognised in one report, in report order.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedReport {
    pub header: ReportHeader,
    pub wind: Option<Wind>,
    pub wind_variation: Option<WindVariation>,
    pub visibility: Option<Visibility>,
    pub weather: Vec<WeatherToken>,
    pub sky: Vec<SkyLayer>,
    pub temp_dew: Option<TempDew>,
    pub altimeter: Option<Altimeter>,
    /// Everything after `RMK`, joined with single spaces.
    pub remarks: Option<String>,
    /// Tokens between the last decoded field and `RMK` that matched nothing.
    pub unrecognized: Vec<String>,
    /// The line the report was decoded from.
    pub raw: String,
}

impl DecodedReport {
    pub(crate) fn new(raw: &str, header: ReportHeader) -> Self {
        DecodedReport {
            header,
            wind: None,
            wind_variation: None,
            visibility: None,
            weather: Vec::new(),
            sky: Vec::new(),
            temp_dew: None,
            altimeter: None,
            remarks: None,
            unrecognized: Vec::new(),
            raw: raw.to_string(),
        }
    }

    /// Renders the report as labelled lines, ending with the raw line.
    pub fn lines(&self) -> Vec<ReportLine> {
        let mut lines = vec![ReportLine::new(Label::Station, &self.header.station)];
        if let Some(report_type) = self.header.report_type {
            lines.push(ReportLine::new(Label::Report, report_type.to_string()));
        }
        lines.push(ReportLine::new(
            Label::Observed,
            format!("{} (DDHHMMZ)", self.header.observed),
        ));
        if let Some(modifier) = self.header.modifier {
            lines.push(ReportLine::new(Label::Modifier, modifier.to_string()));
        }
        if let Some(wind) = &self.wind {
            lines.push(ReportLine::new(Label::Wind, wind.to_string()));
        }
        if let Some(variation) = &self.wind_variation {
            lines.push(ReportLine::new(Label::WindVariation, variation.to_string()));
        }
        if let Some(visibility) = &self.visibility {
            lines.push(ReportLine::new(Label::Visibility, visibility.to_string()));
        }
        if !self.weather.is_empty() {
            lines.push(ReportLine::new(Label::Weather, join(&self.weather)));
        }
        if !self.sky.is_empty() {
            lines.push(ReportLine::new(Label::Sky, join(&self.sky)));
        }
        if let Some(temp_dew) = &self.temp_dew {
            lines.push(ReportLine::new(Label::TempDew, temp_dew.to_string()));
        }
        if let Some(altimeter) = &self.altimeter {
            lines.push(ReportLine::new(Label::Altimeter, altimeter.to_string()));
        }
        if let Some(remarks) = self.remarks.as_deref().filter(|r| !r.is_empty()) {
            lines.push(ReportLine::new(Label::Remarks, remarks));
        }
        lines.push(ReportLine::new(Label::Raw, &self.raw));
        lines
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
