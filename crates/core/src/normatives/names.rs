//! Name and RUT normalization for registry files.

use unicode_normalization::UnicodeNormalization;

use super::error::NormativeError;

/// Placeholder for a missing second last name.
pub const NO_SECOND_LAST_NAME: &str = "XNOSLNX";

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Uppercase ASCII name: diacritics removed, anything else non-alphanumeric
/// turned into single spaces, trimmed.
pub fn clean_name(name: &str) -> String {
    let spaced: String = name
        .to_uppercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { ' ' })
        .collect();

    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turns `LAST|SECOND|FIRST` into `LAST/SECOND/FIRST`, erasing the missing
/// second last name placeholder. Empty input stays empty.
pub fn format_name(name: &str) -> Result<String, NormativeError> {
    if name.is_empty() {
        return Ok(String::new());
    }
    if !name.contains('|') {
        return Err(NormativeError::MalformedName(name.to_string()));
    }

    Ok(name
        .replacen('|', "/", 2)
        .replacen(NO_SECOND_LAST_NAME, "", 1))
}

/// RUT without dots or dash, uppercased (`12.345.678-k` -> `12345678K`).
pub fn clear_rut(rut: &str) -> String {
    rut.chars()
        .filter(|c| !matches!(c, '.' | '-'))
        .flat_map(char::to_uppercase)
        .collect()
}
