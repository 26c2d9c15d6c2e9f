//! US zip code normalization.
//!
//! Inputs arrive from spreadsheets and free-text forms: ZIP+4 suffixes,
//! stray whitespace, dropped leading zeros from numeric columns. All of
//! that funnels through [`normalize_zip`] before any cache or database
//! lookup so the same zip never appears under two spellings.

/// Canonical zip length.
const ZIP_LEN: usize = 5;

/// Minimum digits required to identify a postal region (3-digit prefix).
const MIN_DIGITS: usize = 3;

/// Normalize free-form input to a canonical 5-digit zip string.
///
/// Digits are extracted in order and truncated to the first five, so
/// `"44256-1234"` and `" 44256 "` both normalize to `"44256"`. A 3- or
/// 4-digit remainder is left-padded with zeros — numeric spreadsheet
/// columns drop the leading zero from New England zips like `01234`.
///
/// Returns `None` when fewer than three digits remain; such input cannot
/// even be mapped to a prefix region and is unresolvable.
#[must_use]
pub fn normalize_zip(input: &str) -> Option<String> {
    let digits: String = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(ZIP_LEN)
        .collect();

    if digits.len() < MIN_DIGITS {
        return None;
    }

    Some(format!("{digits:0>5}"))
}

/// The 3-digit prefix of a normalized zip, as an integer in `0..=999`.
///
/// Returns `None` for input that does not normalize.
#[must_use]
pub fn zip_prefix(input: &str) -> Option<u16> {
    let zip = normalize_zip(input)?;
    zip[..MIN_DIGITS].parse::<u16>().ok()
}
