pub mod chart;
pub mod error;
pub mod gains;
pub mod india;
pub mod trade;

// Flat public surface for domain types and functions.
pub use chart::ChartSeries;
#[allow(unused_imports)]
pub use error::{GainError, InputError, GENERIC_ERROR_MESSAGE};
pub use gains::{calculate_gain, GainResult};
#[allow(unused_imports)]
pub use india::{GainType, StatutoryCharges};
pub use trade::{ChartKind, ParsedTrade, SchemaField, TradeBatch, TradeInput, TradeRecord};
