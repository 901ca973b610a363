//! Money display formatting

use rust_decimal::Decimal;

/// Currency glyph printed before every amount
pub const CURRENCY: &str = "£";

/// Format an amount with the currency glyph and fixed two decimals
///
/// Display-only: the stored decimal keeps its full precision, formatting
/// rounds the shown value to two places. Never fails.
pub fn format_money(amount: Decimal) -> String {
    format!("{CURRENCY}{amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec!(0)), "£0.00");
        assert_eq!(format_money(dec!(1234.5)), "£1234.50");
        assert_eq!(format_money(dec!(16.00)), "£16.00");
        assert_eq!(format_money(dec!(99999999.99)), "£99999999.99");
    }

    #[test]
    fn test_format_money_is_stable() {
        let v = dec!(4.00);
        assert_eq!(format_money(v), format_money(v));
    }
}
