//! Present-weather tokens such as `+TSRA`, `-SHRASN` or `VCFG`.
//!
//! A token is read as: optional intensity sign, optional `VC`, at most one
//! descriptor, then a two-letter phenomenon code (or two of them fused, like
//! `RASN`). Decoding never fails; unknown remainders are echoed verbatim after
//! the prefixes that did decode.

use crate::decode::tokens::strip_prefix_ignore_case;
use log::debug;
use std::fmt;

/// A two-letter present-weather phenomenon code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phenomenon {
    // Precipitation
    Drizzle,
    Rain,
    Snow,
    SnowGrains,
    IceCrystals,
    IcePellets,
    Hail,
    SmallHail,
    UnknownPrecipitation,
    // Obscuration
    Mist,
    Fog,
    Smoke,
    VolcanicAsh,
    WidespreadDust,
    Sand,
    Haze,
    Spray,
    // Other
    DustWhirls,
    Squalls,
    FunnelCloud,
    Sandstorm,
    Duststorm,
}

impl Phenomenon {
    /// Code table in lookup order.
    pub const CODES: [(&'static str, Phenomenon); 22] = [
        ("DZ", Phenomenon::Drizzle),
        ("RA", Phenomenon::Rain),
        ("SN", Phenomenon::Snow),
        ("SG", Phenomenon::SnowGrains),
        ("IC", Phenomenon::IceCrystals),
        ("PL", Phenomenon::IcePellets),
        ("GR", Phenomenon::Hail),
        ("GS", Phenomenon::SmallHail),
        ("UP", Phenomenon::UnknownPrecipitation),
        ("BR", Phenomenon::Mist),
        ("FG", Phenomenon::Fog),
        ("FU", Phenomenon::Smoke),
        ("VA", Phenomenon::VolcanicAsh),
        ("DU", Phenomenon::WidespreadDust),
        ("SA", Phenomenon::Sand),
        ("HZ", Phenomenon::Haze),
        ("PY", Phenomenon::Spray),
        ("PO", Phenomenon::DustWhirls),
        ("SQ", Phenomenon::Squalls),
        ("FC", Phenomenon::FunnelCloud),
        ("SS", Phenomenon::Sandstorm),
        ("DS", Phenomenon::Duststorm),
    ];

    /// Looks up a two-letter code (case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        Self::CODES
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(code))
            .map(|&(_, phenomenon)| phenomenon)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Phenomenon::Drizzle => "drizzle",
            Phenomenon::Rain => "rain",
            Phenomenon::Snow => "snow",
            Phenomenon::SnowGrains => "snow grains",
            Phenomenon::IceCrystals => "ice crystals",
            Phenomenon::IcePellets => "ice pellets",
            Phenomenon::Hail => "hail",
            Phenomenon::SmallHail => "small hail / snow pellets",
            Phenomenon::UnknownPrecipitation => "unknown precipitation",
            Phenomenon::Mist => "mist",
            Phenomenon::Fog => "fog",
            Phenomenon::Smoke => "smoke",
            Phenomenon::VolcanicAsh => "volcanic ash",
            Phenomenon::WidespreadDust => "widespread dust",
            Phenomenon::Sand => "sand",
            Phenomenon::Haze => "haze",
            Phenomenon::Spray => "spray",
            Phenomenon::DustWhirls => "dust/sand whirls",
            Phenomenon::Squalls => "squalls",
            Phenomenon::FunnelCloud => "funnel cloud / tornado / waterspout",
            Phenomenon::Sandstorm => "sandstorm",
            Phenomenon::Duststorm => "duststorm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intensity {
    #[default]
    Unspecified,
    Light,
    Heavy,
}

impl Intensity {
    fn prefix(&self) -> &'static str {
        match self {
            Intensity::Unspecified => "",
            Intensity::Light => "Light ",
            Intensity::Heavy => "Heavy ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Proximity {
    #[default]
    Unspecified,
    Vicinity,
}

impl Proximity {
    fn prefix(&self) -> &'static str {
        match self {
            Proximity::Unspecified => "",
            Proximity::Vicinity => "In the vicinity: ",
        }
    }
}

/// Qualifier written between the intensity/proximity markers and the
/// phenomenon code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descriptor {
    Shallow,
    Partial,
    Patches,
    LowDrifting,
    Blowing,
    Showers,
    Thunderstorm,
    Freezing,
}

impl Descriptor {
    /// Match order; the first code that prefixes the remaining text wins.
    const PRIORITY: [(&'static str, Descriptor); 8] = [
        ("MI", Descriptor::Shallow),
        ("PR", Descriptor::Partial),
        ("BC", Descriptor::Patches),
        ("DR", Descriptor::LowDrifting),
        ("BL", Descriptor::Blowing),
        ("SH", Descriptor::Showers),
        ("TS", Descriptor::Thunderstorm),
        ("FZ", Descriptor::Freezing),
    ];

    fn prefix(&self) -> &'static str {
        match self {
            Descriptor::Shallow => "Shallow ",
            Descriptor::Partial => "Partial ",
            Descriptor::Patches => "Patches of ",
            Descriptor::LowDrifting => "Low drifting ",
            Descriptor::Blowing => "Blowing ",
            Descriptor::Showers => "Showers of ",
            Descriptor::Thunderstorm => "Thunderstorm with ",
            Descriptor::Freezing => "Freezing ",
        }
    }

    /// Wording when the descriptor is the whole token body (`TS`, `VCSH`).
    fn standalone(&self) -> &'static str {
        match self {
            Descriptor::Shallow => "Shallow",
            Descriptor::Partial => "Partial",
            Descriptor::Patches => "Patches",
            Descriptor::LowDrifting => "Low drifting",
            Descriptor::Blowing => "Blowing",
            Descriptor::Showers => "Showers",
            Descriptor::Thunderstorm => "Thunderstorm",
            Descriptor::Freezing => "Freezing",
        }
    }
}

/// What the text after the prefixes turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhenomenonCode {
    Single(Phenomenon),
    /// Two codes written back to back, e.g. `RASN`.
    Pair(Phenomenon, Phenomenon),
    /// Nothing followed the prefixes.
    Empty,
    /// Text that is not a known code, kept with its original casing.
    Unknown(String),
}

/// A decoded present-weather token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherToken {
    pub intensity: Intensity,
    pub proximity: Proximity,
    pub descriptor: Option<Descriptor>,
    pub code: PhenomenonCode,
    /// The token as it appeared in the input.
    pub raw: String,
}

impl WeatherToken {
    /// Decodes one present-weather token. Always succeeds.
    ///
    /// ```
    /// use metar_decoder::WeatherToken;
    ///
    /// assert_eq!(WeatherToken::decode("+TSRA").to_string(), "Heavy Thunderstorm with rain");
    /// assert_eq!(WeatherToken::decode("RASN").to_string(), "rain and snow");
    /// assert_eq!(WeatherToken::decode("+XXYY").to_string(), "Heavy XXYY");
    /// ```
    pub fn decode(token: &str) -> Self {
        let raw = token.trim();
        let mut rest = raw;

        let intensity = if let Some(r) = rest.strip_prefix('+') {
            rest = r;
            Intensity::Heavy
        } else if let Some(r) = rest.strip_prefix('-') {
            rest = r;
            Intensity::Light
        } else {
            Intensity::Unspecified
        };

        let proximity = match strip_prefix_ignore_case(rest, "VC") {
            Some(r) => {
                rest = r;
                Proximity::Vicinity
            }
            None => Proximity::Unspecified,
        };

        let descriptor = Descriptor::PRIORITY
            .iter()
            .find_map(|(code, descriptor)| {
                strip_prefix_ignore_case(rest, code).map(|r| (r, *descriptor))
            })
            .map(|(r, descriptor)| {
                rest = r;
                descriptor
            });

        let code = decode_code(rest);
        if let PhenomenonCode::Unknown(ref text) = code {
            debug!("Unrecognised present-weather code '{}' in token '{}'", text, raw);
        }

        WeatherToken {
            intensity,
            proximity,
            descriptor,
            code,
            raw: raw.to_string(),
        }
    }
}

fn decode_code(code: &str) -> PhenomenonCode {
    if code.is_empty() {
        return PhenomenonCode::Empty;
    }
    if let Some(phenomenon) = Phenomenon::from_code(code) {
        return PhenomenonCode::Single(phenomenon);
    }
    if code.len() == 4 && code.is_char_boundary(2) {
        let (first, second) = code.split_at(2);
        if let (Some(a), Some(b)) = (Phenomenon::from_code(first), Phenomenon::from_code(second)) {
            return PhenomenonCode::Pair(a, b);
        }
    }
    PhenomenonCode::Unknown(code.to_string())
}

impl fmt::Display for WeatherToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lead = format!("{}{}", self.proximity.prefix(), self.intensity.prefix());
        let text = match (&self.code, self.descriptor) {
            (PhenomenonCode::Single(p), d) => {
                format!("{}{}{}", lead, d.map_or("", |d| d.prefix()), p.description())
            }
            (PhenomenonCode::Pair(a, b), d) => format!(
                "{}{}{} and {}",
                lead,
                d.map_or("", |d| d.prefix()),
                a.description(),
                b.description()
            ),
            (PhenomenonCode::Unknown(text), d) => {
                format!("{}{}{}", lead, d.map_or("", |d| d.prefix()), text)
            }
            (PhenomenonCode::Empty, Some(d)) => format!("{}{}", lead, d.standalone()),
            (PhenomenonCode::Empty, None) => self.raw.clone(),
        };
        f.write_str(text.trim())
    }
}

/// Decodes a whitespace-separated run of present-weather tokens and joins the
/// results with commas.
///
/// ```
/// use metar_decoder::decode_weather_tokens;
///
/// assert_eq!(decode_weather_tokens("-RA BR"), "Light rain, mist");
/// ```
pub fn decode_weather_tokens(s: &str) -> String {
    s.split_whitespace()
        .map(|token| WeatherToken::decode(token).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
