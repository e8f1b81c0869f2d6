//! Left-to-right walk over a tokenized report.
//!
//! The walker holds one read cursor and never backtracks. Each state tries a
//! single field class at the cursor; a miss means the field is absent and the
//! next state is tried at the same position.

use crate::decode::error::DecodeError;
use crate::decode::fields::{Altimeter, TempDew, Visibility, Wind, WindVariation};
use crate::decode::phenomena::WeatherToken;
use crate::decode::report::{DecodedReport, Modifier, ReportHeader, ReportType};
use crate::decode::sky::SkyLayer;
use crate::decode::tokens::{tokenize, Token};
use log::debug;

/// Station and observation time are mandatory; the report type is not.
pub const MIN_TOKENS: usize = 3;

const REMARKS_MARKER: &str = "RMK";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Header,
    Modifier,
    Wind,
    WindVariation,
    Visibility,
    Weather,
    Sky,
    TempDew,
    Altimeter,
    Remarks,
    Done,
}

struct Walker<'t, 'a> {
    tokens: &'t [Token<'a>],
    cursor: usize,
    report: DecodedReport,
}

impl<'t, 'a> Walker<'t, 'a> {
    fn peek(&self) -> Option<&'t Token<'a>> {
        self.tokens.get(self.cursor)
    }

    fn advance(&mut self, count: usize) {
        self.cursor = (self.cursor + count).min(self.tokens.len());
    }

    /// Takes the token at the cursor if `classify` accepts it.
    fn take<T>(&mut self, classify: impl FnOnce(&str) -> Option<T>) -> Option<T> {
        let value = self.peek().and_then(|t| classify(t.text))?;
        self.advance(1);
        Some(value)
    }

    fn step(&mut self, state: State) -> State {
        match state {
            // The header is read before the walk starts.
            State::Header => State::Modifier,
            State::Modifier => {
                self.report.header.modifier = self.take(Modifier::from_token);
                State::Wind
            }
            State::Wind => match self.take(Wind::parse) {
                Some(wind) => {
                    self.report.wind = Some(wind);
                    State::WindVariation
                }
                None => State::Visibility,
            },
            State::WindVariation => {
                self.report.wind_variation = self.take(WindVariation::parse);
                State::Visibility
            }
            State::Visibility => {
                if let Some((visibility, used)) = Visibility::parse(&self.tokens[self.cursor..]) {
                    self.report.visibility = Some(visibility);
                    self.advance(used);
                }
                State::Weather
            }
            State::Weather => {
                while let Some(token) = self.peek() {
                    if starts_after_weather(token) {
                        break;
                    }
                    self.report.weather.push(WeatherToken::decode(token.text));
                    self.advance(1);
                }
                State::Sky
            }
            State::Sky => {
                while let Some(layer) = self.take(SkyLayer::parse) {
                    self.report.sky.push(layer);
                }
                State::TempDew
            }
            State::TempDew => {
                self.report.temp_dew = self.take(TempDew::parse);
                State::Altimeter
            }
            State::Altimeter => {
                self.report.altimeter = self.take(Altimeter::parse);
                State::Remarks
            }
            State::Remarks => {
                while let Some(token) = self.peek() {
                    self.advance(1);
                    if token.is(REMARKS_MARKER) {
                        let rest = &self.tokens[self.cursor..];
                        let remarks: Vec<&str> = rest.iter().map(|t| t.text).collect();
                        self.report.remarks = Some(remarks.join(" "));
                        self.cursor = self.tokens.len();
                        break;
                    }
                    debug!(
                        "Skipping unrecognised token '{}' at position {}",
                        token.text, token.position
                    );
                    self.report.unrecognized.push(token.text.to_string());
                }
                State::Done
            }
            State::Done => State::Done,
        }
    }
}

/// Whether a token belongs to a field that follows present weather.
fn starts_after_weather(token: &Token<'_>) -> bool {
    token.is(REMARKS_MARKER)
        || SkyLayer::parse(token.text).is_some()
        || TempDew::parse(token.text).is_some()
        || Altimeter::parse(token.text).is_some()
}

fn read_header(tokens: &[Token<'_>]) -> (ReportHeader, usize) {
    let report_type = ReportType::from_token(tokens[0].text);
    let at = usize::from(report_type.is_some());
    let header = ReportHeader {
        report_type,
        station: tokens[at].text.to_string(),
        observed: tokens[at + 1].text.to_string(),
        modifier: None,
    };
    (header, at + 2)
}

/// Decodes one report line.
///
/// Fails only when the line has fewer than three tokens; every field after the
/// header is optional and decoded best-effort.
///
/// ```
/// use metar_decoder::{decode_report, DecodeError};
///
/// let report = decode_report("KRDU 211251Z 00000KT 10SM CLR M05/M10 A2969").unwrap();
/// assert_eq!(report.header.station, "KRDU");
/// assert_eq!(report.wind.unwrap().to_string(), "Calm");
///
/// assert_eq!(
///     decode_report("KRDU 211251Z"),
///     Err(DecodeError::MalformedReport { token_count: 2 })
/// );
/// ```
pub fn decode_report(line: &str) -> Result<DecodedReport, DecodeError> {
    let tokens = tokenize(line);
    if tokens.len() < MIN_TOKENS {
        return Err(DecodeError::MalformedReport {
            token_count: tokens.len(),
        });
    }

    let (header, cursor) = read_header(&tokens);
    let mut walker = Walker {
        tokens: &tokens,
        cursor: cursor.min(tokens.len()),
        report: DecodedReport::new(line, header),
    };
    let mut state = State::Header;
    while state != State::Done {
        state = walker.step(state);
    }
    Ok(walker.report)
}
