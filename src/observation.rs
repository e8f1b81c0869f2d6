//! Structured observations as published by the aviation-weather JSON API, and
//! their rendering through the same labelled lines as raw reports.
//!
//! The API is loose about value types (numbers sometimes arrive as strings and
//! vice versa), so the numeric and textual fields are deserialized leniently.

use crate::decode::fields::format_celsius;
use crate::decode::phenomena::decode_weather_tokens;
use crate::decode::sky::{describe_cover, SkyCover, SkyLayer};
use crate::render::{Label, ReportLine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// One cloud layer as reported in the JSON `clouds` array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CloudLayer {
    /// Cover code: `FEW`, `SCT`, `BKN`, `OVC`, `VV`, `CLR`, ...
    #[serde(default, deserialize_with = "text_or_empty")]
    pub cover: String,
    /// Base in feet above ground level.
    #[serde(default, deserialize_with = "lenient_int")]
    pub base: Option<i64>,
}

/// Observation time, parsed when possible and kept as text otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservationTime {
    At(DateTime<Utc>),
    Text(String),
}

/// An already-parsed observation record. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    #[serde(default)]
    pub raw_ob: Option<String>,
    #[serde(default)]
    pub icao_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_time")]
    pub obs_time: Option<ObservationTime>,
    /// Wind direction in degrees; `None` covers both "missing" and `VRB`.
    #[serde(default, deserialize_with = "lenient_int")]
    pub wdir: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub wspd: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub wgst: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub visib: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub altim: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub temp: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub dewp: Option<String>,
    #[serde(default)]
    pub wx_string: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub clouds: Vec<CloudLayer>,
}

impl Observation {
    /// Renders the observation as labelled lines.
    ///
    /// `Station` and `Wind` are always present; the other lines appear only
    /// when their field carries a value.
    pub fn lines(&self) -> Vec<ReportLine> {
        let mut lines = Vec::new();

        let station = non_blank(&self.icao_id).unwrap_or("(unknown station)");
        lines.push(ReportLine::new(Label::Station, station));

        match &self.obs_time {
            Some(ObservationTime::At(t)) => lines.push(ReportLine::new(
                Label::Observed,
                t.format("%Y-%m-%d %H:%M UTC").to_string(),
            )),
            Some(ObservationTime::Text(text)) if !text.trim().is_empty() => {
                lines.push(ReportLine::new(Label::Observed, text.trim()))
            }
            _ => {}
        }

        lines.push(ReportLine::new(
            Label::Wind,
            describe_wind(self.wdir, self.wspd, self.wgst),
        ));

        if let Some(visib) = non_blank(&self.visib) {
            lines.push(ReportLine::new(Label::Visibility, format!("{} SM", visib)));
        }
        if let Some(wx) = non_blank(&self.wx_string) {
            lines.push(ReportLine::new(Label::Weather, decode_weather_tokens(wx)));
        }
        if !self.clouds.is_empty() {
            let sky: Vec<String> = self.clouds.iter().map(describe_cloud).collect();
            lines.push(ReportLine::new(Label::Sky, sky.join(", ")));
        }

        let temp = non_blank(&self.temp);
        let dewp = non_blank(&self.dewp);
        if temp.is_some() || dewp.is_some() {
            lines.push(ReportLine::new(
                Label::TempDew,
                format!("{} / {}", format_celsius(temp), format_celsius(dewp)),
            ));
        }

        if let Some(altim) = non_blank(&self.altim) {
            lines.push(ReportLine::new(Label::Altimeter, format!("{} inHg", altim)));
        }
        if let Some(raw) = non_blank(&self.raw_ob) {
            lines.push(ReportLine::new(Label::Raw, raw));
        }
        lines
    }

    /// Whether the record carries a raw report line.
    pub fn has_raw_report(&self) -> bool {
        non_blank(&self.raw_ob).is_some()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// `unknown` without a speed; `VRB` when no valid direction goes with it.
pub fn describe_wind(wdir: Option<i64>, wspd: Option<i64>, wgst: Option<i64>) -> String {
    let Some(speed) = wspd else {
        return "unknown".to_string();
    };
    let direction = match wdir {
        Some(d) if d >= 0 => format!("{:03}°", d),
        _ => "VRB".to_string(),
    };
    match wgst {
        Some(gust) if gust > 0 => format!("{} {} kt gusting {} kt", direction, speed, gust),
        _ => format!("{} {} kt", direction, speed),
    }
}

fn describe_cloud(cloud: &CloudLayer) -> String {
    match SkyCover::from_code(&cloud.cover) {
        Some(cover) => SkyLayer::from_parts(cover, cloud.base).to_string(),
        None => match cloud.base {
            Some(base) if base > 0 => {
                format!("{} at {} ft AGL", describe_cover(&cloud.cover), base)
            }
            _ => describe_cover(&cloud.cover),
        },
    }
}

// --- Lenient field deserializers ---

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(d)?.map(|value| match value {
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Text(s) => s,
    }))
}

fn text_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient_text(d)?.unwrap_or_default())
}

fn lenient_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(Option::<Scalar>::deserialize(d)?.and_then(|value| match value {
        Scalar::Int(i) => Some(i),
        Scalar::Float(f) if f.is_finite() => Some(f.round() as i64),
        Scalar::Float(_) => None,
        Scalar::Text(s) => s.trim().parse().ok(),
    }))
}

fn lenient_time<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ObservationTime>, D::Error> {
    Ok(Option::<Scalar>::deserialize(d)?.and_then(|value| match value {
        Scalar::Int(secs) => DateTime::from_timestamp(secs, 0).map(ObservationTime::At),
        Scalar::Float(secs) if secs.is_finite() => {
            DateTime::from_timestamp(secs as i64, 0).map(ObservationTime::At)
        }
        Scalar::Float(_) => None,
        Scalar::Text(s) => Some(match DateTime::parse_from_rfc3339(s.trim()) {
            Ok(t) => ObservationTime::At(t.with_timezone(&Utc)),
            Err(_) => ObservationTime::Text(s),
        }),
    }))
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<CloudLayer>, D::Error> {
    Ok(Option::<Vec<CloudLayer>>::deserialize(d)?.unwrap_or_default())
}
