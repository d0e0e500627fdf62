use tripsplit_domain::{Currency, EntryId, LedgerEntry, MemberName, Money};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Rejections raised before an entry reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryValidationError {
    #[error("amount must be positive (got {0})")]
    NonPositiveAmount(Money),
    #[error("amount {0} exceeds the per-entry limit of {max}", max = LedgerEntry::MAX_AMOUNT)]
    AmountTooLarge(Money),
    #[error("payer must not be blank")]
    BlankPayer,
    #[error("currency must not be blank")]
    BlankCurrency,
    #[error("currency '{0}' is not configured")]
    UnsupportedCurrency(Currency),
    #[error("at least one beneficiary is required")]
    NoBeneficiaries,
    #[error("beneficiary names must not be blank")]
    BlankBeneficiary,
    #[error("'{0}' is not a registered member")]
    UnknownMember(MemberName),
    #[error("a reimbursement needs exactly one receiver (got {0})")]
    ReimbursementReceiverCount(usize),
    #[error("'{0}' cannot reimburse themselves")]
    SelfReimbursement(MemberName),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("entry {0} not found")]
    NotFound(EntryId),
    #[error(transparent)]
    Backend(BoxError),
}

impl StoreError {
    pub fn backend(err: impl Into<BoxError>) -> Self {
        Self::Backend(err.into())
    }
}

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct RegistryError(BoxError);

impl RegistryError {
    pub fn backend(err: impl Into<BoxError>) -> Self {
        Self(err.into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MemberError {
    #[error("member name must not be blank")]
    BlankName,
    #[error("member name must not contain '{0}'")]
    ReservedCharacter(char),
    #[error("'{0}' is already a member")]
    AlreadyMember(MemberName),
    #[error("'{0}' is not a member")]
    NotAMember(MemberName),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Invalid(#[from] EntryValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
