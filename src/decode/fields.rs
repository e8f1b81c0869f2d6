//! Decoders for the single-valued report fields: wind, wind variation,
//! visibility, temperature/dewpoint and altimeter.
//!
//! Each field has a classifier (`parse`) that returns `None` when the token is
//! not that field, leaving it for the next grammar rule.

use crate::decode::tokens::{
    looks_numeric, looks_signed_int, strip_prefix_ignore_case, strip_suffix_ignore_case, Token,
};
use log::debug;
use std::fmt;

// --- Wind ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindDirection {
    Degrees(u16),
    Variable,
}

/// Surface wind in knots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wind {
    /// `00000KT`.
    Calm,
    Reported {
        direction: WindDirection,
        speed_kt: u16,
        gust_kt: Option<u16>,
    },
    /// A `KT` token whose body could not be read; echoed as written.
    Unparsed(String),
}

impl Wind {
    /// Recognises any token ending in `KT`. Malformed bodies still count as a
    /// wind field and come back as [`Wind::Unparsed`].
    pub fn parse(token: &str) -> Option<Self> {
        let body = strip_suffix_ignore_case(token, "KT")?;
        Some(Self::decode_body(body).unwrap_or_else(|| {
            debug!("Wind token '{}' has an unexpected shape, echoing it", token);
            Wind::Unparsed(token.to_string())
        }))
    }

    fn decode_body(body: &str) -> Option<Self> {
        let (sustained, gust) = match body.find(|c: char| c.eq_ignore_ascii_case(&'G')) {
            Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
            None => (body, None),
        };
        let gust_kt = match gust {
            Some(g) if looks_numeric(g) => Some(g.parse().ok()?),
            Some(_) => return None,
            None => None,
        };

        let (direction, speed) = match strip_prefix_ignore_case(sustained, "VRB") {
            Some(speed) => (WindDirection::Variable, speed),
            None => {
                if sustained.len() < 5 || !sustained.is_char_boundary(3) {
                    return None;
                }
                let (dir, speed) = sustained.split_at(3);
                if !looks_numeric(dir) {
                    return None;
                }
                (WindDirection::Degrees(dir.parse().ok()?), speed)
            }
        };
        if speed.len() < 2 || !looks_numeric(speed) {
            return None;
        }
        let speed_kt: u16 = speed.parse().ok()?;

        if direction == WindDirection::Degrees(0) && speed_kt == 0 && gust_kt.is_none() {
            return Some(Wind::Calm);
        }
        Some(Wind::Reported {
            direction,
            speed_kt,
            gust_kt,
        })
    }
}

impl fmt::Display for Wind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wind::Calm => f.write_str("Calm"),
            Wind::Unparsed(raw) => f.write_str(raw),
            Wind::Reported {
                direction,
                speed_kt,
                gust_kt,
            } => {
                match direction {
                    WindDirection::Variable => write!(f, "Variable at {:02} kt", speed_kt)?,
                    WindDirection::Degrees(d) => write!(f, "{:03}° at {:02} kt", d, speed_kt)?,
                }
                if let Some(gust) = gust_kt {
                    write!(f, " gusting {:02} kt", gust)?;
                }
                Ok(())
            }
        }
    }
}

/// Range a variable wind swings through, from a `dddVddd` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindVariation {
    pub from_deg: u16,
    pub to_deg: u16,
}

impl WindVariation {
    pub fn parse(token: &str) -> Option<Self> {
        if token.len() != 7 || !token.is_char_boundary(3) || !token.is_char_boundary(4) {
            return None;
        }
        let (from, rest) = token.split_at(3);
        let (v, to) = rest.split_at(1);
        if !v.eq_ignore_ascii_case("V") || !looks_numeric(from) || !looks_numeric(to) {
            return None;
        }
        Some(WindVariation {
            from_deg: from.parse().ok()?,
            to_deg: to.parse().ok()?,
        })
    }
}

impl fmt::Display for WindVariation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Varying between {:03}° and {:03}°",
            self.from_deg, self.to_deg
        )
    }
}

// --- Visibility ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityBound {
    Exactly,
    GreaterThan,
    LessThan,
}

/// Prevailing visibility in statute miles.
///
/// `miles` is kept as text because it is commonly a fraction (`1/2`) or a
/// whole-plus-fraction pair (`1 1/2`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visibility {
    pub bound: VisibilityBound,
    pub miles: String,
}

impl Visibility {
    /// Tries to read visibility at the front of `tokens`.
    ///
    /// Returns the value and the number of tokens it used (1 or 2); `None`
    /// consumes nothing.
    ///
    /// ```
    /// use metar_decoder::{tokenize, Visibility};
    ///
    /// let tokens = tokenize("1 1/2SM BR");
    /// let (vis, used) = Visibility::parse(&tokens).unwrap();
    /// assert_eq!(used, 2);
    /// assert_eq!(vis.to_string(), "1 1/2 statute miles");
    /// ```
    pub fn parse(tokens: &[Token<'_>]) -> Option<(Self, usize)> {
        let first = tokens.first()?;
        if let Some(body) = strip_suffix_ignore_case(first.text, "SM") {
            return Some((Self::from_body(body), 1));
        }
        let second = tokens.get(1)?;
        if looks_numeric(first.text) {
            if let Some(body) = strip_suffix_ignore_case(second.text, "SM") {
                let mut vis = Self::from_body(body);
                vis.miles = format!("{} {}", first.text, vis.miles);
                return Some((vis, 2));
            }
        }
        None
    }

    fn from_body(body: &str) -> Self {
        let (bound, miles) = if let Some(rest) = strip_prefix_ignore_case(body, "P") {
            (VisibilityBound::GreaterThan, rest)
        } else if let Some(rest) = strip_prefix_ignore_case(body, "M") {
            (VisibilityBound::LessThan, rest)
        } else {
            (VisibilityBound::Exactly, body)
        };
        Visibility {
            bound,
            miles: miles.to_string(),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bound {
            VisibilityBound::Exactly => write!(f, "{} statute miles", self.miles),
            VisibilityBound::GreaterThan => write!(f, "Greater than {} statute miles", self.miles),
            VisibilityBound::LessThan => write!(f, "Less than {} statute miles", self.miles),
        }
    }
}

// --- Temperature / dewpoint ---

/// Temperature and dewpoint in whole degrees Celsius; `None` is a missing half.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempDew {
    pub temperature_c: Option<i32>,
    pub dewpoint_c: Option<i32>,
}

impl TempDew {
    /// Reads `TT/DD` where either half may carry an `M` (minus) prefix or be
    /// empty. A bare `/` is not a temperature group.
    pub fn parse(token: &str) -> Option<Self> {
        let (temp, dew) = token.split_once('/')?;
        if dew.contains('/') || (temp.is_empty() && dew.is_empty()) {
            return None;
        }
        if !looks_signed_int(temp) || !looks_signed_int(dew) {
            return None;
        }
        Some(TempDew {
            temperature_c: parse_m_int(temp),
            dewpoint_c: parse_m_int(dew),
        })
    }
}

fn parse_m_int(s: &str) -> Option<i32> {
    let (negative, digits) = match strip_prefix_ignore_case(s, "M") {
        Some(digits) => (true, digits),
        None => (false, s),
    };
    let value: i32 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// `5°C`, or `unknown` for a missing value.
pub(crate) fn format_celsius<T: fmt::Display>(value: Option<T>) -> String {
    match value {
        Some(v) => format!("{}°C", v),
        None => "unknown".to_string(),
    }
}

impl fmt::Display for TempDew {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {}",
            format_celsius(self.temperature_c),
            format_celsius(self.dewpoint_c)
        )
    }
}

// --- Altimeter ---

/// Altimeter setting in hundredths of an inch of mercury, from `A2969`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Altimeter {
    pub hundredths_inhg: u16,
}

impl Altimeter {
    pub fn parse(token: &str) -> Option<Self> {
        if token.len() != 5 {
            return None;
        }
        let digits = strip_prefix_ignore_case(token, "A")?;
        if !looks_numeric(digits) {
            return None;
        }
        Some(Altimeter {
            hundredths_inhg: digits.parse().ok()?,
        })
    }
}

impl fmt::Display for Altimeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}.{:02} inHg",
            self.hundredths_inhg / 100,
            self.hundredths_inhg % 100
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::tokens::tokenize;

    #[test]
    fn test_calm_wind() {
        assert_eq!(Wind::parse("00000KT"), Some(Wind::Calm));
        assert_eq!(Wind::parse("00000KT").unwrap().to_string(), "Calm");
    }

    #[test]
    fn test_only_zero_zero_is_calm() {
        for token in ["00001KT", "01000KT", "00000G05KT", "VRB00KT", "36000KT"] {
            assert_ne!(Wind::parse(token), Some(Wind::Calm), "{} rendered calm", token);
        }
    }

    #[test]
    fn test_directional_wind() {
        assert_eq!(Wind::parse("19004KT").unwrap().to_string(), "190° at 04 kt");
        assert_eq!(
            Wind::parse("19012G18KT").unwrap(),
            Wind::Reported {
                direction: WindDirection::Degrees(190),
                speed_kt: 12,
                gust_kt: Some(18),
            }
        );
        assert_eq!(
            Wind::parse("19012G18KT").unwrap().to_string(),
            "190° at 12 kt gusting 18 kt"
        );
        assert_eq!(Wind::parse("270105KT").unwrap().to_string(), "270° at 105 kt");
    }

    #[test]
    fn test_variable_wind() {
        assert_eq!(Wind::parse("VRB03KT").unwrap().to_string(), "Variable at 03 kt");
        assert_eq!(
            Wind::parse("VRB03G10KT").unwrap().to_string(),
            "Variable at 03 kt gusting 10 kt"
        );
    }

    #[test]
    fn test_malformed_wind_is_echoed() {
        assert_eq!(Wind::parse("0000KT"), Some(Wind::Unparsed("0000KT".into())));
        assert_eq!(Wind::parse("ABCDEKT").unwrap().to_string(), "ABCDEKT");
        assert_eq!(Wind::parse("19004"), None);
    }

    #[test]
    fn test_wind_variation() {
        let variation = WindVariation::parse("180V240").unwrap();
        assert_eq!(variation.from_deg, 180);
        assert_eq!(variation.to_deg, 240);
        assert_eq!(variation.to_string(), "Varying between 180° and 240°");
        assert!(WindVariation::parse("180V24").is_none());
        assert!(WindVariation::parse("18XV240").is_none());
        assert!(WindVariation::parse("1800240").is_none());
    }

    #[test]
    fn test_visibility_single_token() {
        let tokens = tokenize("10SM");
        let (vis, used) = Visibility::parse(&tokens).unwrap();
        assert_eq!(used, 1);
        assert_eq!(vis.to_string(), "10 statute miles");

        let tokens = tokenize("P6SM");
        assert_eq!(
            Visibility::parse(&tokens).unwrap().0.to_string(),
            "Greater than 6 statute miles"
        );
        let tokens = tokenize("M1/4SM");
        assert_eq!(
            Visibility::parse(&tokens).unwrap().0.to_string(),
            "Less than 1/4 statute miles"
        );
        let tokens = tokenize("1/2SM");
        assert_eq!(
            Visibility::parse(&tokens).unwrap().0.to_string(),
            "1/2 statute miles"
        );
    }

    #[test]
    fn test_visibility_two_tokens() {
        let tokens = tokenize("2 1/4SM");
        let (vis, used) = Visibility::parse(&tokens).unwrap();
        assert_eq!(used, 2);
        assert_eq!(vis.miles, "2 1/4");
    }

    #[test]
    fn test_visibility_absent() {
        assert!(Visibility::parse(&tokenize("-RA BR")).is_none());
        assert!(Visibility::parse(&tokenize("1")).is_none());
        assert!(Visibility::parse(&tokenize("1A 1/2SM")).is_none());
        assert!(Visibility::parse(&[]).is_none());
    }

    #[test]
    fn test_temp_dew_signs() {
        assert_eq!(TempDew::parse("M05/M10").unwrap().to_string(), "-5°C / -10°C");
        assert_eq!(TempDew::parse("05/M03").unwrap().to_string(), "5°C / -3°C");
        assert_eq!(
            TempDew::parse("22/18").unwrap(),
            TempDew {
                temperature_c: Some(22),
                dewpoint_c: Some(18),
            }
        );
    }

    #[test]
    fn test_temp_dew_missing_half() {
        assert_eq!(TempDew::parse("M05/").unwrap().to_string(), "-5°C / unknown");
        assert_eq!(TempDew::parse("M/12").unwrap().to_string(), "unknown / 12°C");
        assert!(TempDew::parse("/").is_none());
        assert!(TempDew::parse("1/2SM").is_none());
        assert!(TempDew::parse("05/03/01").is_none());
        assert!(TempDew::parse("0503").is_none());
    }

    #[test]
    fn test_altimeter() {
        let altimeter = Altimeter::parse("A2969").unwrap();
        assert_eq!(altimeter.to_string(), "29.69 inHg");
        assert_eq!(altimeter.hundredths_inhg, 2969);
        assert_eq!(Altimeter::parse("a3002").unwrap().to_string(), "30.02 inHg");
        assert!(Altimeter::parse("A296").is_none());
        assert!(Altimeter::parse("A29690").is_none());
        assert!(Altimeter::parse("Q1013").is_none());
        assert!(Altimeter::parse("A29X9").is_none());
    }
}
