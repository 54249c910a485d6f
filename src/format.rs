use rust_decimal::{Decimal, RoundingStrategy};

/// Rupee amount with thousands separators and two decimals, e.g. `₹1,234.50`, `₹-521.03`
pub fn format_inr(amount: Decimal) -> String {
    format!("₹{}", with_separators(amount, 2))
}

/// Rupee amount rounded to whole rupees with separators, e.g. `₹1,235`
pub fn format_whole_inr(amount: Decimal) -> String {
    format!("₹{}", with_separators(amount, 0))
}

/// Rupee amount with two decimals and no separators, e.g. `₹1234.50`
pub fn format_plain_inr(amount: Decimal) -> String {
    format!("₹{}", format_dp(amount, 2))
}

/// Two decimals, no symbol or separators (CSV/JSON output)
pub fn format_amount(amount: Decimal) -> String {
    format_dp(amount, 2)
}

/// Percentage with one decimal, e.g. `12.3%`
pub fn format_pct(pct: Decimal) -> String {
    format!("{}%", format_dp(pct, 1))
}

fn format_dp(amount: Decimal, dp: u32) -> String {
    let digits = round_abs(amount, dp);
    if amount < Decimal::ZERO {
        format!("-{}", digits)
    } else {
        digits
    }
}

fn with_separators(amount: Decimal, dp: u32) -> String {
    let digits = round_abs(amount, dp);
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount < Decimal::ZERO { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

// Sign is handled by the callers so that a small negative amount still shows as "-0.00".
fn round_abs(amount: Decimal, dp: u32) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);
    format!("{:.*}", dp as usize, rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn inr_with_separators() {
        assert_eq!(format_inr(dec!(478.44975)), "₹478.45");
        assert_eq!(format_inr(dec!(108888.382)), "₹108,888.38");
        assert_eq!(format_inr(dec!(1234567.891)), "₹1,234,567.89");
        assert_eq!(format_inr(dec!(100)), "₹100.00");
        assert_eq!(format_inr(Decimal::ZERO), "₹0.00");
    }

    #[test]
    fn inr_negative() {
        assert_eq!(format_inr(dec!(-521.0335)), "₹-521.03");
        assert_eq!(format_inr(dec!(-1521.0335)), "₹-1,521.03");
        assert_eq!(format_inr(dec!(-0.001)), "₹-0.00");
    }

    #[test]
    fn rounds_half_to_even() {
        assert_eq!(format_inr(dec!(0.125)), "₹0.12");
        assert_eq!(format_inr(dec!(0.135)), "₹0.14");
        assert_eq!(format_whole_inr(dec!(2.5)), "₹2");
    }

    #[test]
    fn whole_rupees() {
        assert_eq!(format_whole_inr(dec!(406.6822875)), "₹407");
        assert_eq!(format_whole_inr(dec!(-78.155025)), "₹-78");
        assert_eq!(format_whole_inr(dec!(108888.382)), "₹108,888");
    }

    #[test]
    fn plain_has_no_separators() {
        assert_eq!(format_plain_inr(dec!(1234.5)), "₹1234.50");
        assert_eq!(format_plain_inr(dec!(1.55025)), "₹1.55");
        assert_eq!(format_amount(dec!(-442.878475)), "-442.88");
    }

    #[test]
    fn percentages() {
        assert_eq!(format_pct(dec!(60)), "60.0%");
        assert_eq!(format_pct(dec!(12.345)), "12.3%");
    }
}
