use crate::model::{Currency, LedgerEntry};
use std::collections::BTreeMap;

/// Groups entries by currency. Currencies iterate in sorted order; entries keep
/// their input order within a group.
pub fn partition_by_currency<'e, I>(entries: I) -> BTreeMap<&'e Currency, Vec<&'e LedgerEntry>>
where
    I: IntoIterator<Item = &'e LedgerEntry>,
{
    let mut groups: BTreeMap<&'e Currency, Vec<&'e LedgerEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(&entry.currency).or_default().push(entry);
    }
    groups
}
