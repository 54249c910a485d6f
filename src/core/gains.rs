use super::error::GainError;
use super::india::{GainType, StatutoryCharges, LTCG_EXEMPTION, LTCG_RATE, STCG_RATE};
use super::trade::TradeInput;
use rust_decimal::Decimal;
use serde::Serialize;

/// Breakdown of a single trade's gain and tax
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GainResult {
    pub quantity_bought: u64,
    pub quantity_sold: u64,
    /// Days between buy and sell date; negative if the dates are inverted
    pub holding_days: i64,
    pub gross_gain: Decimal,
    pub brokerage: Decimal,
    pub charges: StatutoryCharges,
    pub statutory_charges: Decimal,
    pub total_gain_after_charges: Decimal,
    pub gain_type: GainType,
    /// Amount the tax rate was applied to
    pub taxable_gain: Decimal,
    pub tax: Decimal,
    pub net_gain: Decimal,
}

/// Calculate gain, charges and tax for one trade.
///
/// 1. Holding period: sell date minus buy date, in days
/// 2. Gross gain: (sell price - buy price) x quantity sold
/// 3. Statutory charges: STT, exchange and SEBI fees on the sell notional
/// 4. Gain after charges: gross gain - brokerage - statutory charges
/// 5. Tax: STCG at 15% of the whole gain, or LTCG at 10% above the exemption
///
/// Short-term tax is not floored at zero, so a short-term loss produces a
/// negative tax. Preconditions are not re-checked here.
pub fn calculate_gain(trade: &TradeInput) -> Result<GainResult, GainError> {
    let holding_days = trade
        .sell_date()
        .signed_duration_since(trade.buy_date())
        .num_days();

    let quantity_sold = Decimal::from(trade.quantity_sold());
    let gross_gain = checked(
        trade
            .sell_price()
            .checked_sub(trade.buy_price())
            .and_then(|diff| diff.checked_mul(quantity_sold)),
        "gross gain",
    )?;

    let notional = checked(trade.sell_price().checked_mul(quantity_sold), "notional")?;
    let charges = checked(StatutoryCharges::on_notional(notional), "statutory charges")?;
    let statutory_charges = checked(charges.total(), "statutory charges")?;

    let total_gain_after_charges = checked(
        gross_gain
            .checked_sub(trade.brokerage())
            .and_then(|g| g.checked_sub(statutory_charges)),
        "gain after charges",
    )?;

    let gain_type = GainType::from_holding_days(holding_days);
    let (taxable_gain, rate) = match gain_type {
        GainType::ShortTerm => (total_gain_after_charges, STCG_RATE),
        GainType::LongTerm => {
            let taxable = if total_gain_after_charges > LTCG_EXEMPTION {
                total_gain_after_charges - LTCG_EXEMPTION
            } else {
                Decimal::ZERO
            };
            (taxable, LTCG_RATE)
        }
    };
    let tax = checked(taxable_gain.checked_mul(rate), "tax")?;
    let net_gain = checked(total_gain_after_charges.checked_sub(tax), "net gain")?;

    log::debug!(
        "{} days held ({}): gross={}, charges={}, after charges={}, taxable={}, tax={}, net={}",
        holding_days,
        gain_type.code(),
        gross_gain,
        statutory_charges,
        total_gain_after_charges,
        taxable_gain,
        tax,
        net_gain
    );

    Ok(GainResult {
        quantity_bought: trade.quantity_bought(),
        quantity_sold: trade.quantity_sold(),
        holding_days,
        gross_gain,
        brokerage: trade.brokerage(),
        charges,
        statutory_charges,
        total_gain_after_charges,
        gain_type,
        taxable_gain,
        tax,
        net_gain,
    })
}

fn checked<T>(value: Option<T>, step: &str) -> Result<T, GainError> {
    value.ok_or_else(|| GainError::Computation(format!("{} out of range", step)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::trade::tests::{date, record};
    use crate::core::trade::TradeRecord;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn trade(
        buy: Decimal,
        sell: Decimal,
        qty: u64,
        brokerage: Decimal,
        holding_days: i64,
    ) -> TradeInput {
        let buy_date = date("2023-01-01");
        TradeInput::try_from(TradeRecord {
            brokerage: Some(brokerage),
            buy_date,
            sell_date: buy_date + Duration::days(holding_days),
            ..record(buy, sell, qty, qty)
        })
        .unwrap()
    }

    #[test]
    fn long_term_gain_within_exemption() {
        let result = calculate_gain(&trade(dec!(100), dec!(150), 10, dec!(20), 400)).unwrap();

        assert_eq!(result.holding_days, 400);
        assert_eq!(result.gain_type, GainType::LongTerm);
        assert_eq!(result.gross_gain, dec!(500));
        assert_eq!(result.charges.stt, dec!(1.5));
        assert_eq!(result.charges.exchange_fee, dec!(0.04875));
        assert_eq!(result.charges.sebi_fee, dec!(0.0015));
        assert_eq!(result.statutory_charges, dec!(1.55025));
        assert_eq!(result.total_gain_after_charges, dec!(478.44975));
        assert_eq!(result.taxable_gain, Decimal::ZERO);
        assert_eq!(result.tax, Decimal::ZERO);
        assert_eq!(result.net_gain, dec!(478.44975));
    }

    #[test]
    fn short_term_gain_taxed_at_flat_rate() {
        let result = calculate_gain(&trade(dec!(100), dec!(150), 10, dec!(20), 200)).unwrap();

        assert_eq!(result.gain_type, GainType::ShortTerm);
        assert_eq!(result.total_gain_after_charges, dec!(478.44975));
        assert_eq!(result.taxable_gain, dec!(478.44975));
        assert_eq!(result.tax, dec!(71.7674625));
        assert_eq!(result.net_gain, dec!(406.6822875));
        assert_eq!(result.net_gain.round_dp(2), dec!(406.68));
    }

    #[test]
    fn long_term_loss_passes_through_untaxed() {
        let result = calculate_gain(&trade(dec!(150), dec!(100), 10, dec!(20), 400)).unwrap();

        assert_eq!(result.gross_gain, dec!(-500));
        assert_eq!(result.statutory_charges, dec!(1.0335));
        assert_eq!(result.total_gain_after_charges, dec!(-521.0335));
        assert_eq!(result.tax, Decimal::ZERO);
        assert_eq!(result.net_gain, dec!(-521.0335));
    }

    #[test]
    fn short_term_loss_gives_negative_tax() {
        let result = calculate_gain(&trade(dec!(150), dec!(100), 10, dec!(20), 100)).unwrap();

        assert_eq!(result.gain_type, GainType::ShortTerm);
        assert_eq!(result.total_gain_after_charges, dec!(-521.0335));
        assert_eq!(result.tax, dec!(-78.155025));
        assert_eq!(result.net_gain, dec!(-442.878475));
        assert!(result.net_gain > result.total_gain_after_charges);
    }

    #[test]
    fn long_term_gain_above_exemption() {
        let result = calculate_gain(&trade(dec!(100), dec!(1200), 100, dec!(0), 400)).unwrap();

        assert_eq!(result.gross_gain, dec!(110000));
        assert_eq!(result.statutory_charges, dec!(124.02));
        assert_eq!(result.total_gain_after_charges, dec!(109875.98));
        assert_eq!(result.taxable_gain, dec!(9875.98));
        assert_eq!(result.tax, dec!(987.598));
        assert_eq!(result.net_gain, dec!(108888.382));
    }

    #[test]
    fn long_term_net_gain_identity() {
        for (buy, sell, qty) in [
            (dec!(0), dec!(10), 1),
            (dec!(100), dec!(100), 50),
            (dec!(12.5), dec!(2500), 80),
            (dec!(1), dec!(99999.99), 3),
        ] {
            let result = calculate_gain(&trade(buy, sell, qty, dec!(0), 365)).unwrap();
            let gross = (sell - buy) * Decimal::from(qty);
            let expected_tax =
                (gross - result.statutory_charges - dec!(100000)).max(Decimal::ZERO) * dec!(0.10);
            assert_eq!(result.tax, expected_tax);
            assert_eq!(result.net_gain, gross - result.statutory_charges - result.tax);
        }
    }

    #[test]
    fn classification_boundary() {
        let day_364 = calculate_gain(&trade(dec!(100), dec!(150), 10, dec!(0), 364)).unwrap();
        let day_365 = calculate_gain(&trade(dec!(100), dec!(150), 10, dec!(0), 365)).unwrap();
        assert_eq!(day_364.gain_type, GainType::ShortTerm);
        assert_eq!(day_365.gain_type, GainType::LongTerm);
    }

    #[test]
    fn negative_holding_period_is_short_term() {
        let result = calculate_gain(&trade(dec!(100), dec!(150), 10, dec!(0), -10)).unwrap();
        assert_eq!(result.holding_days, -10);
        assert_eq!(result.gain_type, GainType::ShortTerm);
    }

    #[test]
    fn partial_sale_uses_quantity_sold() {
        let input = TradeInput::try_from(TradeRecord {
            brokerage: Some(dec!(0)),
            ..record(dec!(100), dec!(150), 10, 4)
        })
        .unwrap();
        let result = calculate_gain(&input).unwrap();
        assert_eq!(result.quantity_bought, 10);
        assert_eq!(result.quantity_sold, 4);
        assert_eq!(result.gross_gain, dec!(200));
        assert_eq!(result.charges.stt, dec!(0.6));
    }

    #[test]
    fn repeated_calculation_is_identical() {
        let input = trade(dec!(123.45), dec!(678.9), 37, dec!(15.5), 250);
        assert_eq!(calculate_gain(&input).unwrap(), calculate_gain(&input).unwrap());
    }

    #[test]
    fn short_term_net_gain_increases_with_sell_price() {
        let mut previous: Option<GainResult> = None;
        for sell in [dec!(50), dec!(99.99), dec!(100), dec!(150), dec!(1000)] {
            let result = calculate_gain(&trade(dec!(100), sell, 10, dec!(20), 30)).unwrap();
            if let Some(prev) = previous {
                assert!(result.gross_gain > prev.gross_gain);
                assert!(result.total_gain_after_charges > prev.total_gain_after_charges);
                assert!(result.net_gain > prev.net_gain);
            }
            previous = Some(result);
        }
    }

    #[test]
    fn statutory_charges_are_itemised() {
        let result = calculate_gain(&trade(dec!(100), dec!(1200), 100, dec!(0), 30)).unwrap();
        assert_eq!(result.charges.stt, dec!(120));
        assert_eq!(result.charges.exchange_fee, dec!(3.9));
        assert_eq!(result.charges.sebi_fee, dec!(0.12));
        assert_eq!(result.charges.total(), Some(result.statutory_charges));
    }

    #[test]
    fn huge_long_term_loss_is_untaxed() {
        let result = calculate_gain(&trade(dec!(0), dec!(1000), 1, Decimal::MAX, 1096)).unwrap();

        assert_eq!(result.gain_type, GainType::LongTerm);
        assert!(result.total_gain_after_charges < Decimal::ZERO);
        assert_eq!(result.taxable_gain, Decimal::ZERO);
        assert_eq!(result.tax, Decimal::ZERO);
        assert_eq!(result.net_gain, result.total_gain_after_charges);
    }

    #[test]
    fn overflow_is_a_computation_error() {
        let input = trade(dec!(0), Decimal::MAX, 1000, dec!(0), 10);
        assert!(matches!(
            calculate_gain(&input),
            Err(GainError::Computation(_))
        ));
    }
}
