//! Pre-detection quote filters.

use super::types::Quote;

/// Whether a quote's outcome matches `excluded`, ignoring ASCII case.
///
/// Used to drop outcomes such as "Draw" for sports where they are not part of
/// the market being covered.
pub fn is_excluded(quote: &Quote, excluded: Option<&str>) -> bool {
    match excluded {
        Some(name) => quote.outcome.trim().eq_ignore_ascii_case(name.trim()),
        None => false,
    }
}
