//! Printer capability profile

use encoding_rs::{Encoding, WINDOWS_1252};

/// Immutable per-printer layout parameters, fixed at construction
///
/// Common widths:
/// - 58mm paper: 32 characters
/// - 80mm paper: 48 characters
#[derive(Debug, Clone, Copy)]
pub struct PrinterCapabilities {
    /// Characters per line on the paper
    pub chars_per_line: usize,
    /// Code page used for all text sent to the device
    pub encoding: &'static Encoding,
}

impl PrinterCapabilities {
    pub fn new(chars_per_line: usize, encoding: &'static Encoding) -> Self {
        Self {
            chars_per_line,
            encoding,
        }
    }
}

impl Default for PrinterCapabilities {
    fn default() -> Self {
        Self::new(48, WINDOWS_1252)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let caps = PrinterCapabilities::default();
        assert_eq!(caps.chars_per_line, 48);
        assert_eq!(caps.encoding, WINDOWS_1252);
    }
}
