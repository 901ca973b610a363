//! Code-page text utilities for thermal printers
//!
//! Receipt printers count columns in encoded bytes, not chars. This module
//! provides width, truncation and padding helpers for an arbitrary
//! `encoding_rs` code page, plus the lossy encode used on the wire.

use encoding_rs::Encoding;

/// Get the encoded byte width of a string
///
/// One column per byte on the paper; double-byte characters take two.
pub fn text_width(encoding: &'static Encoding, s: &str) -> usize {
    let (cow, _, _) = encoding.encode(s);
    cow.len()
}

/// Truncate a string to fit within an encoded byte width
pub fn truncate_text(encoding: &'static Encoding, s: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut result = String::new();
    for c in s.chars() {
        let s_char = c.to_string();
        let (cow, _, _) = encoding.encode(&s_char);
        let char_len = cow.len();

        if width + char_len > max_width {
            break;
        }
        result.push(c);
        width += char_len;
    }
    result
}

/// Pad a string to a specific encoded byte width
///
/// If the string is longer than the width, it will be truncated.
pub fn pad_text(encoding: &'static Encoding, s: &str, width: usize, align_right: bool) -> String {
    let current_width = text_width(encoding, s);
    if current_width >= width {
        return truncate_text(encoding, s, width);
    }
    let spaces = width - current_width;
    if align_right {
        format!("{}{}", " ".repeat(spaces), s)
    } else {
        format!("{}{}", s, " ".repeat(spaces))
    }
}

/// Encode a string for the wire
///
/// Unmappable characters are substituted rather than erroring; a bad glyph
/// on paper beats a lost ticket.
pub fn encode_text(encoding: &'static Encoding, s: &str) -> Vec<u8> {
    let (cow, _, _) = encoding.encode(s);
    cow.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{GBK, WINDOWS_1252};

    #[test]
    fn test_text_width() {
        assert_eq!(text_width(WINDOWS_1252, "hello"), 5);
        assert_eq!(text_width(GBK, "你好"), 4); // 2 Chinese chars = 4 bytes
        assert_eq!(text_width(GBK, "AB中文CD"), 8); // 4 ASCII + 2 Chinese
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text(WINDOWS_1252, "hello world", 5), "hello");
        assert_eq!(truncate_text(GBK, "你好世界", 4), "你好");
        assert_eq!(truncate_text(GBK, "AB中文", 4), "AB中");
    }

    #[test]
    fn test_pad_text() {
        assert_eq!(pad_text(WINDOWS_1252, "hi", 5, false), "hi   ");
        assert_eq!(pad_text(WINDOWS_1252, "hi", 5, true), "   hi");
        assert_eq!(pad_text(WINDOWS_1252, "hello world", 5, false), "hello");
    }

    #[test]
    fn test_encode_text_latin() {
        assert_eq!(encode_text(WINDOWS_1252, "total"), b"total".to_vec());
        // The pound sign is a single byte in Windows-1252
        assert_eq!(encode_text(WINDOWS_1252, "£1.50"), vec![0xA3, b'1', b'.', b'5', b'0']);
    }
}
