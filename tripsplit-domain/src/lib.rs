#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{
    BalanceAccumulator, Beneficiaries, Currency, EntryId, EntryKind, LedgerEntry, MemberBalances,
    MemberName, Money, Settlement, Transfer, UnknownEntryKind, debit_shares,
};
pub use services::{
    LedgerAggregator, RoundingMode, SettlementContext, SettlementError,
    SettlementPlanner, partition_by_currency,
};
