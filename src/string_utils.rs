//! UTF-8 Safe String Utilities
//!
//! Selections coming out of egui are character offsets, while Rust strings are
//! sliced by byte. Characters like `é`, `ع`, `中` or `🎉` are multi-byte in
//! UTF-8, so every offset has to be converted before slicing.
//!
//! # Example
//! ```ignore
//! use crate::string_utils::char_to_byte_index;
//!
//! let text = "مرحبا world";
//! let byte = char_to_byte_index(text, 5); // start of " world"
//! assert_eq!(&text[byte..], " world");
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Character Offset Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Number of characters (Unicode scalar values) in `s`.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Convert a character offset into the byte offset of that character.
///
/// Offsets past the end of the string map to `s.len()`.
pub fn char_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(s.len())
}

/// Clamp a character range to the string and put it in ascending order.
///
/// Returns `(start, end)` with `0 <= start <= end <= char_len(s)`.
pub fn clamp_char_range(s: &str, start: usize, end: usize) -> (usize, usize) {
    let len = char_len(s);
    let (start, end) = (start.min(len), end.min(len));
    if start > end {
        (end, start)
    } else {
        (start, end)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_len_ascii_and_multibyte() {
        assert_eq!(char_len(""), 0);
        assert_eq!(char_len("hello"), 5);
        assert_eq!(char_len("مرحبا"), 5);
        assert_eq!(char_len("Party 🎉"), 7);
    }

    #[test]
    fn test_char_to_byte_index_ascii() {
        assert_eq!(char_to_byte_index("hello", 0), 0);
        assert_eq!(char_to_byte_index("hello", 3), 3);
        assert_eq!(char_to_byte_index("hello", 5), 5);
    }

    #[test]
    fn test_char_to_byte_index_arabic() {
        // Each Arabic letter is 2 bytes
        let text = "مرحبا world";
        assert_eq!(char_to_byte_index(text, 1), 2);
        assert_eq!(char_to_byte_index(text, 5), 10);
        assert_eq!(&text[char_to_byte_index(text, 5)..], " world");
    }

    #[test]
    fn test_char_to_byte_index_past_end() {
        assert_eq!(char_to_byte_index("abc", 10), 3);
        assert_eq!(char_to_byte_index("", 1), 0);
    }

    #[test]
    fn test_clamp_char_range_orders_and_clamps() {
        assert_eq!(clamp_char_range("hello", 1, 3), (1, 3));
        assert_eq!(clamp_char_range("hello", 3, 1), (1, 3));
        assert_eq!(clamp_char_range("hello", 2, 99), (2, 5));
        assert_eq!(clamp_char_range("hi", 7, 9), (2, 2));
    }
}
