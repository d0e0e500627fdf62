use crate::{error::EntryValidationError, model::NewEntry};
use tripsplit_domain::{Currency, EntryKind, LedgerEntry, MemberName, Money};

/// Shape checks applied to entries before they are stored.
///
/// The balance engine itself tolerates stale names and zero amounts; these rules
/// only guard what new input may look like.
#[derive(Debug, Clone, Default)]
pub struct EntryValidator {
    currencies: Vec<Currency>,
}

impl EntryValidator {
    /// Accepts only the given currency codes. An empty list accepts any code.
    pub fn with_currencies(currencies: impl IntoIterator<Item = Currency>) -> Self {
        Self {
            currencies: currencies.into_iter().collect(),
        }
    }

    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    pub fn validate(
        &self,
        entry: &NewEntry,
        members: &[MemberName],
    ) -> Result<(), EntryValidationError> {
        if entry.amount <= Money::ZERO {
            return Err(EntryValidationError::NonPositiveAmount(entry.amount));
        }
        if entry.amount > LedgerEntry::MAX_AMOUNT {
            return Err(EntryValidationError::AmountTooLarge(entry.amount));
        }
        if entry.payer.as_str().trim().is_empty() {
            return Err(EntryValidationError::BlankPayer);
        }
        if entry.currency.as_str().trim().is_empty() {
            return Err(EntryValidationError::BlankCurrency);
        }
        if !self.currencies.is_empty() && !self.currencies.contains(&entry.currency) {
            return Err(EntryValidationError::UnsupportedCurrency(
                entry.currency.clone(),
            ));
        }
        if entry.beneficiaries.is_empty() {
            return Err(EntryValidationError::NoBeneficiaries);
        }
        if entry
            .beneficiaries
            .iter()
            .any(|name| name.as_str().trim().is_empty())
        {
            return Err(EntryValidationError::BlankBeneficiary);
        }

        if let Some(unknown) = entry
            .participants()
            .find(|name| !members.contains(name))
        {
            return Err(EntryValidationError::UnknownMember(unknown.clone()));
        }

        if entry.kind == EntryKind::Reimbursement {
            if entry.beneficiaries.len() != 1 {
                return Err(EntryValidationError::ReimbursementReceiverCount(
                    entry.beneficiaries.len(),
                ));
            }
            if entry.beneficiaries.contains(entry.payer.as_str()) {
                return Err(EntryValidationError::SelfReimbursement(entry.payer.clone()));
            }
        }

        Ok(())
    }
}
