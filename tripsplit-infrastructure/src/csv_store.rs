use crate::{error::FileError, fs::write_atomically};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    io::{self, Read},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};
use tripsplit_application::{EntryStore, NAME_SEPARATOR, NewEntry, StoreError};
use tripsplit_domain::{Beneficiaries, EntryId, EntryKind, LedgerEntry, Money};


/// One CSV row. `Id` and `Kind` may be absent in files written before they existed.
#[derive(Debug, Serialize, Deserialize)]
struct EntryRecord {
    #[serde(rename = "Id", default)]
    id: Option<u64>,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Item", default)]
    item: String,
    #[serde(rename = "Payer")]
    payer: String,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "Beneficiaries", default)]
    beneficiaries: String,
    #[serde(rename = "Kind", default)]
    kind: String,
}

impl From<&LedgerEntry> for EntryRecord {
    fn from(entry: &LedgerEntry) -> Self {
        let separator = NAME_SEPARATOR.to_string();
        Self {
            id: Some(entry.id.0),
            date: entry.timestamp.format(LedgerEntry::DATE_FORMAT).to_string(),
            item: entry.description.clone(),
            payer: entry.payer.to_string(),
            amount: entry.amount.to_string(),
            currency: entry.currency.to_string(),
            beneficiaries: entry
                .beneficiaries
                .iter()
                .map(|name| name.as_str())
                .collect::<Vec<_>>()
                .join(&separator),
            kind: entry.kind.as_str().to_string(),
        }
    }
}

/// Ledger entries kept in a single CSV file.
///
/// Every mutation rewrites the whole file through a temporary sibling, so a
/// crash mid-write leaves the previous ledger intact.
#[derive(Debug)]
pub struct CsvEntryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvEntryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the current ledger to `dest` in the same format.
    pub fn backup_to(&self, dest: &Path) -> Result<usize, FileError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let entries = self.load()?;
        write_entries(dest, &entries)?;
        tracing::info!(path = %dest.display(), entry_count = entries.len(), "Wrote ledger backup");
        Ok(entries.len())
    }

    /// Replaces the ledger with the contents of `src`.
    ///
    /// The whole file is parsed first; a malformed backup leaves the live
    /// ledger untouched.
    pub fn restore_from(&self, src: &Path) -> Result<usize, FileError> {
        let entries = read_entries(src)?;
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        write_entries(&self.path, &entries)?;
        tracing::info!(
            path = %src.display(),
            entry_count = entries.len(),
            "Restored ledger backup"
        );
        Ok(entries.len())
    }

    fn load(&self) -> Result<Vec<LedgerEntry>, FileError> {
        match std::fs::metadata(&self.path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(FileError::io(&self.path, err)),
            Ok(_) => read_entries(&self.path),
        }
    }

    fn mutate<T>(
        &self,
        edit: impl FnOnce(&mut Vec<LedgerEntry>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        let result = edit(&mut entries)?;
        write_entries(&self.path, &entries)?;
        Ok(result)
    }
}

impl EntryStore for CsvEntryStore {
    fn list(&self) -> Result<Vec<LedgerEntry>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load()?)
    }

    fn insert(&self, entry: NewEntry) -> Result<LedgerEntry, StoreError> {
        self.mutate(|entries| {
            let id = next_id(entries);
            let stored = entry.into_entry(id);
            entries.push(stored.clone());
            Ok(stored)
        })
    }

    fn update(&self, id: EntryId, entry: NewEntry) -> Result<LedgerEntry, StoreError> {
        self.mutate(|entries| {
            let slot = entries
                .iter_mut()
                .find(|stored| stored.id == id)
                .ok_or(StoreError::NotFound(id))?;
            *slot = entry.into_entry(id);
            Ok(slot.clone())
        })
    }

    fn delete(&self, id: EntryId) -> Result<LedgerEntry, StoreError> {
        self.mutate(|entries| {
            let index = entries
                .iter()
                .position(|stored| stored.id == id)
                .ok_or(StoreError::NotFound(id))?;
            Ok(entries.remove(index))
        })
    }

    fn replace_all(&self, entries: Vec<LedgerEntry>) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        write_entries(&self.path, &entries)?;
        Ok(())
    }
}

fn next_id(entries: &[LedgerEntry]) -> EntryId {
    EntryId(entries.iter().map(|entry| entry.id.0).max().unwrap_or(0) + 1)
}

fn read_entries(path: &Path) -> Result<Vec<LedgerEntry>, FileError> {
    let file = std::fs::File::open(path).map_err(|err| FileError::io(path, err))?;
    parse_entries(path, file)
}

fn parse_entries(path: &Path, reader: impl Read) -> Result<Vec<LedgerEntry>, FileError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut rows = Vec::new();
    for (index, result) in rdr.deserialize::<EntryRecord>().enumerate() {
        let record = result.map_err(|source| FileError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        // Header is row 1.
        rows.push((index + 2, record));
    }

    let mut seen = HashSet::new();
    for (_, record) in &rows {
        if let Some(id) = record.id
            && !seen.insert(id)
        {
            return Err(FileError::DuplicateId {
                path: path.to_path_buf(),
                id,
            });
        }
    }

    let mut next_free = seen.iter().copied().max().unwrap_or(0) + 1;
    let mut entries = Vec::with_capacity(rows.len());
    for (row, record) in rows {
        let id = match record.id {
            Some(id) => id,
            None => {
                let id = next_free;
                next_free += 1;
                id
            }
        };
        entries.push(into_entry(path, row, EntryId(id), record)?);
    }

    tracing::debug!(path = %path.display(), entry_count = entries.len(), "Loaded ledger entries");
    Ok(entries)
}

fn into_entry(
    path: &Path,
    row: usize,
    id: EntryId,
    record: EntryRecord,
) -> Result<LedgerEntry, FileError> {
    let invalid = |field: &'static str, value: &str| FileError::InvalidField {
        path: path.to_path_buf(),
        row,
        field,
        value: value.to_string(),
    };

    let timestamp = parse_timestamp(&record.date).ok_or_else(|| invalid("Date", &record.date))?;
    let amount = record
        .amount
        .parse::<Money>()
        .ok()
        .filter(|amount| LedgerEntry::accepts_amount(*amount))
        .ok_or_else(|| invalid("Amount", &record.amount))?;
    let kind: EntryKind = record
        .kind
        .parse()
        .map_err(|_| invalid("Kind", &record.kind))?;
    if record.payer.is_empty() {
        return Err(invalid("Payer", &record.payer));
    }
    let beneficiaries: Beneficiaries = record
        .beneficiaries
        .split(NAME_SEPARATOR)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();

    Ok(LedgerEntry {
        id,
        timestamp,
        description: record.item,
        payer: record.payer.into(),
        amount,
        currency: record.currency.as_str().into(),
        beneficiaries,
        kind,
    })
}

/// Accepts the stored minute format, plus bare dates from hand-edited files.
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, LedgerEntry::DATE_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(Default::default()))
        })
}

fn write_entries(path: &Path, entries: &[LedgerEntry]) -> Result<(), FileError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for entry in entries {
        wtr.serialize(EntryRecord::from(entry))
            .map_err(|source| FileError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|err| FileError::io(path, err.into_error()))?;
    write_atomically(path, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;
    use tripsplit_domain::MemberName;

    struct Fixture {
        _dir: TempDir,
        store: CsvEntryStore,
    }

    #[fixture]
    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let store = CsvEntryStore::new(dir.path().join("ledger.csv"));
        Fixture { _dir: dir, store }
    }

    fn new_entry(payer: &str, amount: Money, beneficiaries: &[&str]) -> NewEntry {
        NewEntry {
            timestamp: NaiveDateTime::parse_from_str("2024-05-01 12:30", LedgerEntry::DATE_FORMAT)
                .unwrap(),
            description: "Dinner, with \"quotes\"".to_string(),
            payer: payer.into(),
            amount,
            currency: "TWD".into(),
            beneficiaries: beneficiaries.iter().copied().collect(),
            kind: EntryKind::Expense,
        }
    }

    #[rstest]
    fn missing_file_is_an_empty_ledger(fixture: Fixture) {
        assert!(fixture.store.list().unwrap().is_empty());
    }

    #[rstest]
    fn entries_survive_a_reload(fixture: Fixture) {
        let stored = fixture
            .store
            .insert(new_entry("Alice", Money::new(12050, 2), &["Alice", "Bob"]))
            .unwrap();
        let reloaded = CsvEntryStore::new(fixture.store.path()).list().unwrap();
        assert_eq!(reloaded, vec![stored]);
    }

    #[rstest]
    fn ids_increase_after_deletes(fixture: Fixture) {
        let first = fixture
            .store
            .insert(new_entry("Alice", Money::from_i64(1), &["Bob"]))
            .unwrap();
        let second = fixture
            .store
            .insert(new_entry("Alice", Money::from_i64(2), &["Bob"]))
            .unwrap();
        fixture.store.delete(first.id).unwrap();
        let third = fixture
            .store
            .insert(new_entry("Alice", Money::from_i64(3), &["Bob"]))
            .unwrap();
        assert_eq!(second.id, EntryId(2));
        assert_eq!(third.id, EntryId(3));
    }

    #[rstest]
    fn unknown_ids_are_reported(fixture: Fixture) {
        let err = fixture.store.delete(EntryId(9)).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(EntryId(9))));
        let err = fixture
            .store
            .update(EntryId(9), new_entry("Alice", Money::from_i64(1), &["Bob"]))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(EntryId(9))));
    }

    #[test]
    fn legacy_rows_get_sequential_ids() {
        let csv = "\
Date,Item,Payer,Amount,Currency,Beneficiaries
2024-05-01 09:00,Taxi,Alice,300.0,JPY,\"Alice, Bob\"
2024-05-01 12:00,Lunch,Bob,90,TWD,\"Alice, Bob, , Carol\"
";
        let entries = parse_entries(Path::new("legacy.csv"), csv.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, EntryId(1));
        assert_eq!(entries[1].id, EntryId(2));
        assert_eq!(entries[0].kind, EntryKind::Expense);
        assert_eq!(entries[0].amount, Money::from_i64(300));
        let names: Vec<&str> = entries[1]
            .beneficiaries
            .iter()
            .map(MemberName::as_str)
            .collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn missing_ids_continue_after_explicit_ones() {
        let csv = "\
Id,Date,Item,Payer,Amount,Currency,Beneficiaries,Kind
7,2024-05-01 09:00,Taxi,Alice,10,JPY,Bob,expense
,2024-05-02,Refund,Bob,5,JPY,Alice,reimbursement
";
        let entries = parse_entries(Path::new("mixed.csv"), csv.as_bytes()).unwrap();
        assert_eq!(entries[1].id, EntryId(8));
        assert_eq!(entries[1].kind, EntryKind::Reimbursement);
        assert_eq!(
            entries[1].timestamp.format(LedgerEntry::DATE_FORMAT).to_string(),
            "2024-05-02 00:00"
        );
    }

    #[rstest]
    #[case::bad_amount("1,2024-05-01 09:00,Taxi,Alice,ten,JPY,Bob,expense", "Amount")]
    #[case::zero_amount("1,2024-05-01 09:00,Taxi,Alice,0,JPY,Bob,expense", "Amount")]
    #[case::negative_amount("1,2024-05-01 09:00,Taxi,Alice,-10,JPY,Bob,expense", "Amount")]
    #[case::amount_above_limit(
        "1,2024-05-01 09:00,Taxi,Alice,79228162514264337593543950335,JPY,Bob,expense",
        "Amount"
    )]
    #[case::bad_date("1,yesterday,Taxi,Alice,10,JPY,Bob,expense", "Date")]
    #[case::bad_kind("1,2024-05-01 09:00,Taxi,Alice,10,JPY,Bob,gift", "Kind")]
    #[case::blank_payer("1,2024-05-01 09:00,Taxi,,10,JPY,Bob,expense", "Payer")]
    fn malformed_rows_are_rejected(#[case] row: &str, #[case] expected_field: &str) {
        let csv = format!("Id,Date,Item,Payer,Amount,Currency,Beneficiaries,Kind\n{row}\n");
        let err = parse_entries(Path::new("bad.csv"), csv.as_bytes()).unwrap_err();
        match err {
            FileError::InvalidField { row, field, .. } => {
                assert_eq!(row, 2);
                assert_eq!(field, expected_field);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let csv = "\
Id,Date,Item,Payer,Amount,Currency,Beneficiaries,Kind
1,2024-05-01 09:00,Taxi,Alice,10,JPY,Bob,expense
1,2024-05-01 09:00,Taxi,Alice,10,JPY,Bob,expense
";
        let err = parse_entries(Path::new("dup.csv"), csv.as_bytes()).unwrap_err();
        assert!(matches!(err, FileError::DuplicateId { id: 1, .. }));
    }

    #[rstest]
    fn backup_then_restore_round_trips(fixture: Fixture) {
        fixture
            .store
            .insert(new_entry("Alice", Money::from_i64(30), &["Bob"]))
            .unwrap();
        let backup = fixture.store.path().with_file_name("backup.csv");
        assert_eq!(fixture.store.backup_to(&backup).unwrap(), 1);

        fixture.store.replace_all(Vec::new()).unwrap();
        assert!(fixture.store.list().unwrap().is_empty());

        assert_eq!(fixture.store.restore_from(&backup).unwrap(), 1);
        assert_eq!(fixture.store.list().unwrap()[0].payer.as_str(), "Alice");
    }

    #[rstest]
    fn broken_backup_leaves_ledger_untouched(fixture: Fixture) {
        fixture
            .store
            .insert(new_entry("Alice", Money::from_i64(30), &["Bob"]))
            .unwrap();
        let backup = fixture.store.path().with_file_name("broken.csv");
        std::fs::write(
            &backup,
            "Date,Item,Payer,Amount,Currency,Beneficiaries\nnot-a-date,x,Bob,1,JPY,Alice\n",
        )
        .unwrap();

        assert!(fixture.store.restore_from(&backup).is_err());
        assert_eq!(fixture.store.list().unwrap().len(), 1);
    }
}
