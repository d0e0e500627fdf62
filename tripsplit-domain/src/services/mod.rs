pub mod currency_partition;
pub mod ledger_aggregator;
pub mod settlement_planner;
pub mod settlement_rounding;

pub use currency_partition::partition_by_currency;
pub use ledger_aggregator::LedgerAggregator;
pub use settlement_planner::{SettlementError, SettlementPlanner, apply_transfers};
pub use settlement_rounding::{
    MAX_SETTLEMENT_SCALE, RoundingMode, SettlementContext, UnsupportedScale,
};
