//! Whitespace tokenization of a report line and the small character-level
//! predicates shared by the field classifiers.

/// One whitespace-delimited piece of a report line.
///
/// A token has no type of its own: the grammar walker decides what it is from
/// its text and where it sits. The text is borrowed from the line unchanged, so
/// the original casing survives for echoing, while every classifier compares
/// case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Zero-based position in the token sequence.
    pub position: usize,
    /// The token text exactly as it appeared in the line.
    pub text: &'a str,
}

impl<'a> Token<'a> {
    /// Case-insensitive comparison against an upper-case keyword.
    pub fn is(&self, keyword: &str) -> bool {
        self.text.eq_ignore_ascii_case(keyword)
    }
}

/// Splits a line on runs of whitespace.
///
/// Never yields empty tokens and preserves order.
///
/// ```
/// use metar_decoder::tokenize;
///
/// let tokens = tokenize("  KRDU   211251Z\tAUTO ");
/// let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
/// assert_eq!(texts, ["KRDU", "211251Z", "AUTO"]);
/// assert_eq!(tokens[2].position, 2);
/// ```
pub fn tokenize(line: &str) -> Vec<Token<'_>> {
    line.split_whitespace()
        .enumerate()
        .map(|(position, text)| Token { position, text })
        .collect()
}

/// True for a non-empty run of ASCII digits.
pub(crate) fn looks_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// True for an optionally `M`-prefixed run of digits, or an empty/`M`-only
/// half which stands for a missing value.
pub(crate) fn looks_signed_int(s: &str) -> bool {
    let digits = strip_prefix_ignore_case(s, "M").unwrap_or(s);
    digits.bytes().all(|b| b.is_ascii_digit())
}

/// Case-insensitive `str::strip_suffix` for ASCII suffixes.
pub(crate) fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let split = s.len().checked_sub(suffix.len())?;
    if !s.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = s.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

/// Case-insensitive `str::strip_prefix` for ASCII prefixes.
pub(crate) fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if !s.is_char_boundary(prefix.len().min(s.len())) || s.len() < prefix.len() {
        return None;
    }
    let (head, tail) = s.split_at(prefix.len());
    head.eq_ignore_ascii_case(prefix).then_some(tail)
}
