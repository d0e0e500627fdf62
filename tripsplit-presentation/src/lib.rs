#![warn(clippy::uninlined_format_args)]

pub mod entries_presenter;
pub mod money_format;
pub mod settlement_presenter;
pub mod text_table;

pub use entries_presenter::EntriesPresenter;
pub use money_format::{format_money, format_signed};
pub use settlement_presenter::{
    CurrencyView, SettlementPresenter, SettlementView, format_settlement_error,
};
