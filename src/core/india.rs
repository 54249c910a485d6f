use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Holding period (in days) at which a gain becomes long-term
pub const LONG_TERM_THRESHOLD_DAYS: i64 = 365;

/// Flat rate applied to the whole short-term gain after charges
pub const STCG_RATE: Decimal = dec!(0.15);

/// Rate applied to the long-term gain above the exemption
pub const LTCG_RATE: Decimal = dec!(0.10);

/// Long-term gain exempt from tax (₹)
pub const LTCG_EXEMPTION: Decimal = dec!(100000);

/// Securities Transaction Tax, on sell-side notional
pub const STT_RATE: Decimal = dec!(0.001);

/// Exchange transaction charge, on sell-side notional
pub const EXCHANGE_FEE_RATE: Decimal = dec!(0.0000325);

/// SEBI turnover fee, on sell-side notional
pub const SEBI_FEE_RATE: Decimal = dec!(0.000001);

/// Capital gain classification by holding period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GainType {
    ShortTerm,
    LongTerm,
}

impl GainType {
    /// Anything held less than a year (including a negative holding period) is short-term.
    pub fn from_holding_days(days: i64) -> Self {
        if days < LONG_TERM_THRESHOLD_DAYS {
            GainType::ShortTerm
        } else {
            GainType::LongTerm
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GainType::ShortTerm => "Short-Term Capital Gain (STCG)",
            GainType::LongTerm => "Long-Term Capital Gain (LTCG)",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GainType::ShortTerm => "STCG",
            GainType::LongTerm => "LTCG",
        }
    }
}

impl std::fmt::Display for GainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Regulatory charges levied on a sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatutoryCharges {
    pub stt: Decimal,
    pub exchange_fee: Decimal,
    pub sebi_fee: Decimal,
}

impl StatutoryCharges {
    /// Compute each charge against the sell-side notional (sell price x quantity sold).
    /// Returns `None` if the decimal range is exceeded.
    pub fn on_notional(notional: Decimal) -> Option<Self> {
        Some(StatutoryCharges {
            stt: STT_RATE.checked_mul(notional)?,
            exchange_fee: EXCHANGE_FEE_RATE.checked_mul(notional)?,
            sebi_fee: SEBI_FEE_RATE.checked_mul(notional)?,
        })
    }

    /// Sum of all charges ("Other Charges" in reports)
    pub fn total(&self) -> Option<Decimal> {
        self.stt
            .checked_add(self.exchange_fee)?
            .checked_add(self.sebi_fee)
    }
}
