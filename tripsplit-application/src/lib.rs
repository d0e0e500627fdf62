#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod ledger_processor;
pub mod ledger_service;
pub mod member_service;
pub mod model;
pub mod ports;
pub mod validation;

pub use error::{
    EntryValidationError, LedgerError, MemberError, RegistryError, ReportError, StoreError,
};
pub use ledger_processor::LedgerProcessor;
pub use ledger_service::LedgerService;
pub use member_service::{MemberService, NAME_SEPARATOR};
pub use model::{CurrencyReport, LedgerReport, NewEntry};
pub use ports::{EntryStore, MemberRegistry};
pub use validation::EntryValidator;
