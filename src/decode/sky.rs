//! Sky condition: the no-cloud keywords and coded layers like `BKN025`.

use crate::decode::tokens::looks_numeric;
use std::fmt;

/// Reported cloud amount for one sky layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkyCover {
    /// `SKC`: sky clear (manual station).
    SkyClear,
    /// `CLR`: no clouds below 12,000 ft (automated station).
    ClearBelowLimit,
    /// `NSC`: no significant clouds.
    NoSignificantClouds,
    /// `NCD`: no clouds detected.
    NoCloudsDetected,
    /// `FEW`: 1-2 oktas.
    Few,
    /// `SCT`: 3-4 oktas.
    Scattered,
    /// `BKN`: 5-7 oktas.
    Broken,
    /// `OVC`: 8 oktas.
    Overcast,
    /// `VV`: sky obscured, vertical visibility reported instead.
    VerticalVisibility,
}

impl SkyCover {
    pub const CODES: [(&'static str, SkyCover); 9] = [
        ("SKC", SkyCover::SkyClear),
        ("CLR", SkyCover::ClearBelowLimit),
        ("NSC", SkyCover::NoSignificantClouds),
        ("NCD", SkyCover::NoCloudsDetected),
        ("FEW", SkyCover::Few),
        ("SCT", SkyCover::Scattered),
        ("BKN", SkyCover::Broken),
        ("OVC", SkyCover::Overcast),
        ("VV", SkyCover::VerticalVisibility),
    ];

    /// Looks up a cover code (case-insensitive, surrounding whitespace ignored).
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::CODES
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(code))
            .map(|&(_, cover)| cover)
    }

    /// Whether this cover is a stand-alone keyword that never carries a height.
    pub fn is_cloud_free(&self) -> bool {
        matches!(
            self,
            SkyCover::SkyClear
                | SkyCover::ClearBelowLimit
                | SkyCover::NoSignificantClouds
                | SkyCover::NoCloudsDetected
        )
    }

    pub fn description(&self) -> &'static str {
        match self {
            SkyCover::SkyClear => "Sky clear",
            SkyCover::ClearBelowLimit => "Clear below 12,000 ft",
            SkyCover::NoSignificantClouds => "No significant clouds",
            SkyCover::NoCloudsDetected => "No clouds detected",
            SkyCover::Few => "Few clouds",
            SkyCover::Scattered => "Scattered clouds",
            SkyCover::Broken => "Broken clouds",
            SkyCover::Overcast => "Overcast",
            SkyCover::VerticalVisibility => "Vertical visibility",
        }
    }
}

/// Human-readable text for a cover code that may not be one we know.
///
/// Blank input reads as "Sky condition unknown"; an unknown code is labelled
/// `Clouds (<code>)`.
pub fn describe_cover(code: &str) -> String {
    match SkyCover::from_code(code) {
        Some(cover) => cover.description().to_string(),
        None if code.trim().is_empty() => "Sky condition unknown".to_string(),
        None => format!("Clouds ({})", code.trim()),
    }
}

/// One reported sky layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyLayer {
    pub cover: SkyCover,
    /// Cloud base in feet above ground level, for coded layers.
    pub base_ft: Option<u32>,
}

impl SkyLayer {
    /// Classifies a report token as a sky layer.
    ///
    /// Coded layers need both a known cover prefix and a three-digit height in
    /// hundreds of feet (`FEW`, `SCT`, `BKN`, `OVC` make six characters, `VV`
    /// five). Anything else returns `None` so the token can be tried as another
    /// field.
    ///
    /// ```
    /// use metar_decoder::{SkyCover, SkyLayer};
    ///
    /// let layer = SkyLayer::parse("BKN025").unwrap();
    /// assert_eq!(layer.cover, SkyCover::Broken);
    /// assert_eq!(layer.base_ft, Some(2500));
    /// assert!(SkyLayer::parse("BKNXYZ").is_none());
    /// ```
    pub fn parse(token: &str) -> Option<Self> {
        if let Some(cover) = SkyCover::from_code(token).filter(SkyCover::is_cloud_free) {
            return Some(SkyLayer {
                cover,
                base_ft: None,
            });
        }

        let prefix_len = match token.len() {
            6 => 3,
            5 => 2,
            _ => return None,
        };
        if !token.is_char_boundary(prefix_len) {
            return None;
        }
        let (prefix, height) = token.split_at(prefix_len);
        let cover = SkyCover::from_code(prefix).filter(|c| !c.is_cloud_free())?;
        if cover == SkyCover::VerticalVisibility && prefix_len != 2 {
            return None;
        }
        if cover != SkyCover::VerticalVisibility && prefix_len != 3 {
            return None;
        }
        if !looks_numeric(height) {
            return None;
        }
        let hundreds: u32 = height.parse().ok()?;
        Some(SkyLayer {
            cover,
            base_ft: Some(hundreds * 100),
        })
    }

    /// A layer from an already-parsed cover code and base height.
    pub fn from_parts(cover: SkyCover, base_ft: Option<i64>) -> Self {
        SkyLayer {
            cover,
            base_ft: base_ft.and_then(|b| u32::try_from(b).ok()),
        }
    }
}

impl fmt::Display for SkyLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cover.description())?;
        match self.base_ft {
            Some(base) if base > 0 => write!(f, " at {} ft AGL", base),
            _ => Ok(()),
        }
    }
}
