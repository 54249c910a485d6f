use super::gains::GainResult;
use super::trade::ChartKind;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// One labelled amount in the breakdown chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub label: &'static str,
    pub value: Decimal,
    pub color: &'static str,
}

/// The four amounts charted for a trade: Net Profit, Tax, Brokerage, Other Charges.
///
/// These are independent amounts rather than a partition of anything; tax and
/// net profit may be negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub points: [ChartPoint; 4],
}

impl From<&GainResult> for ChartSeries {
    fn from(result: &GainResult) -> Self {
        ChartSeries {
            points: [
                ChartPoint {
                    label: "Net Profit",
                    value: result.net_gain,
                    color: "#4caf50",
                },
                ChartPoint {
                    label: "Tax",
                    value: result.tax,
                    color: "#f44336",
                },
                ChartPoint {
                    label: "Brokerage",
                    value: result.brokerage,
                    color: "#ff9800",
                },
                ChartPoint {
                    label: "Other Charges",
                    value: result.statutory_charges,
                    color: "#2196f3",
                },
            ],
        }
    }
}

impl ChartSeries {
    /// Sum of all points, `None` if it leaves the decimal range
    pub fn total(&self) -> Option<Decimal> {
        self.points
            .iter()
            .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.value))
    }

    /// A pie needs non-negative slices and something to divide up.
    pub fn pie_drawable(&self) -> bool {
        self.points.iter().all(|p| !p.value.is_sign_negative() || p.value.is_zero())
            && self.total().is_some_and(|total| total > Decimal::ZERO)
    }

    /// Chart actually drawn for a requested kind: pie falls back to bar when
    /// the series can't be shown as slices.
    pub fn resolve(&self, requested: ChartKind) -> ChartKind {
        match requested {
            ChartKind::Pie if !self.pie_drawable() => {
                log::warn!("Series has negative values or a zero total, drawing a bar chart instead of a pie");
                ChartKind::Bar
            }
            kind => kind,
        }
    }

    /// Percentage share of each point in the total. Only meaningful when
    /// `pie_drawable`, where no slice exceeds the total; anything out of
    /// range comes back as zero.
    pub fn shares(&self) -> [Decimal; 4] {
        let total = self.total().unwrap_or(Decimal::ZERO);
        self.points.clone().map(|p| {
            p.value
                .checked_div(total)
                .and_then(|fraction| fraction.checked_mul(dec!(100)))
                .unwrap_or(Decimal::ZERO)
        })
    }

    /// Largest absolute value, used to scale bars
    pub fn max_abs(&self) -> Decimal {
        self.points
            .iter()
            .map(|p| p.value.abs())
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}
