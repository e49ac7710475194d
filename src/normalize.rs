use crate::model::Identifier;

/// Cleans raw EAN text of the shape "EAN 5702016668247" down to the bare
/// identifier. Splits on the first space only and keeps the remainder, so a
/// value containing further spaces survives intact. Total: any input without
/// a separator degrades to the fallback identifier instead of failing.
pub fn normalize_ean(raw: &str) -> Identifier {
    match raw.split_once(' ') {
        Some((_label, value)) => Identifier(value.to_string()),
        None => Identifier::fallback(),
    }
}
