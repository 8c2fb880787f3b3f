//! Fixed-width field helpers.
//!
//! Widths count characters, not bytes.

use std::fmt::Display;

/// Side the value is aligned to inside its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Filler goes on the left; overflow drops the leftmost characters.
    Right,
    /// Filler goes on the right; overflow drops the rightmost characters.
    Left,
}

/// Fit `value` into exactly `width` characters using `filler`.
pub fn shift(value: impl Display, width: usize, filler: char, align: Align) -> String {
    let value = value.to_string();
    let padding = std::iter::repeat_n(filler, width);
    match align {
        Align::Right => {
            let chars: Vec<char> = padding.chain(value.chars()).collect();
            chars[chars.len() - width..].iter().collect()
        }
        Align::Left => value.chars().chain(padding).take(width).collect(),
    }
}

/// Right-aligned, zero-filled field.
pub fn zero_shift(value: impl Display, width: usize) -> String {
    shift(value, width, '0', Align::Right)
}

/// `width` spaces.
pub fn white_space_fill(width: usize) -> String {
    " ".repeat(width)
}
