use crate::{
    error::{LedgerError, StoreError},
    model::NewEntry,
    ports::{EntryStore, MemberRegistry},
    validation::EntryValidator,
};
use tripsplit_domain::{EntryId, LedgerEntry};

/// Validated writes to the entry store.
///
/// New and amended entries must only name registered members. Entries that
/// already reference removed members stay readable and deletable.
pub struct LedgerService<'a> {
    store: &'a dyn EntryStore,
    registry: &'a dyn MemberRegistry,
    validator: EntryValidator,
}

impl<'a> LedgerService<'a> {
    pub fn new(
        store: &'a dyn EntryStore,
        registry: &'a dyn MemberRegistry,
        validator: EntryValidator,
    ) -> Self {
        Self {
            store,
            registry,
            validator,
        }
    }

    pub fn entries(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        Ok(self.store.list()?)
    }

    pub fn entry(&self, id: EntryId) -> Result<LedgerEntry, LedgerError> {
        self.store
            .list()?
            .into_iter()
            .find(|entry| entry.id == id)
            .ok_or(LedgerError::Store(StoreError::NotFound(id)))
    }

    pub fn record(&self, entry: NewEntry) -> Result<LedgerEntry, LedgerError> {
        self.check(&entry)?;
        let stored = self.store.insert(entry)?;
        tracing::info!(
            entry_id = %stored.id,
            kind = stored.kind.as_str(),
            currency = %stored.currency,
            amount = %stored.amount,
            "Recorded ledger entry"
        );
        Ok(stored)
    }

    pub fn amend(&self, id: EntryId, entry: NewEntry) -> Result<LedgerEntry, LedgerError> {
        self.check(&entry)?;
        let stored = self.store.update(id, entry)?;
        tracing::info!(entry_id = %id, "Amended ledger entry");
        Ok(stored)
    }

    pub fn remove(&self, id: EntryId) -> Result<LedgerEntry, LedgerError> {
        let removed = self.store.delete(id)?;
        tracing::info!(entry_id = %id, "Removed ledger entry");
        Ok(removed)
    }

    fn check(&self, entry: &NewEntry) -> Result<(), LedgerError> {
        let members = self.registry.members()?;
        if let Err(err) = self.validator.validate(entry, &members) {
            tracing::debug!(reject_reason = %err, payer = %entry.payer, "Entry rejected");
            return Err(err.into());
        }
        Ok(())
    }
}
