//! Case-folding of user-supplied station and forecast-office identifiers.

/// `krdu` → `KRDU`.
pub fn normalize_station(s: &str) -> String {
    s.trim().to_ascii_uppercase()
}

/// Accepts `mrx`, `MRX` or `kmrx` and returns `MRX`.
///
/// The NWS files forecast products under the three-letter office id, so a
/// four-letter `K` form is shortened.
pub fn normalize_wfo(s: &str) -> String {
    let upper = s.trim().to_ascii_uppercase();
    match upper.strip_prefix('K') {
        Some(office) if upper.len() == 4 => office.to_string(),
        _ => upper,
    }
}
