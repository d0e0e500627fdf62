use crate::{
    error::{RegistryError, StoreError},
    model::NewEntry,
};
use tripsplit_domain::{EntryId, LedgerEntry, MemberName};

/// Durable ledger entry storage.
pub trait EntryStore: Send + Sync {
    fn list(&self) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Persists a new entry and returns it with its assigned id.
    fn insert(&self, entry: NewEntry) -> Result<LedgerEntry, StoreError>;

    fn update(&self, id: EntryId, entry: NewEntry) -> Result<LedgerEntry, StoreError>;

    fn delete(&self, id: EntryId) -> Result<LedgerEntry, StoreError>;

    fn replace_all(&self, entries: Vec<LedgerEntry>) -> Result<(), StoreError>;
}

/// Durable list of active member names, in display order.
pub trait MemberRegistry: Send + Sync {
    fn members(&self) -> Result<Vec<MemberName>, RegistryError>;

    fn save_members(&self, members: &[MemberName]) -> Result<(), RegistryError>;
}
