use chrono::NaiveDateTime;
use rstest::{fixture, rstest};
use std::sync::Mutex;
use tripsplit_application::{
    EntryStore, EntryValidationError, EntryValidator, LedgerError, LedgerProcessor, LedgerService,
    MemberError, MemberRegistry, MemberService, NewEntry, RegistryError, StoreError,
};
use tripsplit_domain::{Currency, EntryId, EntryKind, LedgerEntry, MemberName, Money, Transfer};

#[derive(Default)]
struct InMemoryStore {
    entries: Mutex<Vec<LedgerEntry>>,
}

impl InMemoryStore {
    fn next_id(entries: &[LedgerEntry]) -> EntryId {
        EntryId(entries.iter().map(|entry| entry.id.0).max().unwrap_or(0) + 1)
    }
}

impl EntryStore for InMemoryStore {
    fn list(&self) -> Result<Vec<LedgerEntry>, StoreError> {
        Ok(self.entries.lock().unwrap().clone())
    }

    fn insert(&self, entry: NewEntry) -> Result<LedgerEntry, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        let stored = entry.into_entry(Self::next_id(&entries));
        entries.push(stored.clone());
        Ok(stored)
    }

    fn update(&self, id: EntryId, entry: NewEntry) -> Result<LedgerEntry, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        let slot = entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(StoreError::NotFound(id))?;
        *slot = entry.into_entry(id);
        Ok(slot.clone())
    }

    fn delete(&self, id: EntryId) -> Result<LedgerEntry, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        let index = entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(StoreError::NotFound(id))?;
        Ok(entries.remove(index))
    }

    fn replace_all(&self, entries: Vec<LedgerEntry>) -> Result<(), StoreError> {
        *self.entries.lock().unwrap() = entries;
        Ok(())
    }
}

#[derive(Default)]
struct InMemoryRegistry {
    members: Mutex<Vec<MemberName>>,
    read_only: bool,
}

impl InMemoryRegistry {
    fn with(names: &[&str]) -> Self {
        Self {
            members: Mutex::new(names.iter().copied().map(MemberName::from).collect()),
            read_only: false,
        }
    }

    fn read_only(names: &[&str]) -> Self {
        Self {
            read_only: true,
            ..Self::with(names)
        }
    }
}

impl MemberRegistry for InMemoryRegistry {
    fn members(&self) -> Result<Vec<MemberName>, RegistryError> {
        Ok(self.members.lock().unwrap().clone())
    }

    fn save_members(&self, members: &[MemberName]) -> Result<(), RegistryError> {
        if self.read_only {
            return Err(RegistryError::backend("registry is read-only"));
        }
        *self.members.lock().unwrap() = members.to_vec();
        Ok(())
    }
}

struct Trip {
    store: InMemoryStore,
    registry: InMemoryRegistry,
}

impl Trip {
    fn ledger(&self) -> LedgerService<'_> {
        LedgerService::new(
            &self.store,
            &self.registry,
            EntryValidator::with_currencies(["JPY", "TWD", "USD", "EUR"].map(Currency::from)),
        )
    }

    fn members(&self) -> MemberService<'_> {
        MemberService::new(&self.registry, &self.store)
    }

    fn member_names(&self) -> Vec<String> {
        self.registry
            .members()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

#[fixture]
fn trip() -> Trip {
    Trip {
        store: InMemoryStore::default(),
        registry: InMemoryRegistry::with(&["Alice", "Bob", "Carol"]),
    }
}

fn expense(payer: &str, amount: i64, currency: &str, beneficiaries: &[&str]) -> NewEntry {
    NewEntry {
        timestamp: NaiveDateTime::default(),
        description: "meal".to_string(),
        payer: payer.into(),
        amount: Money::from_i64(amount),
        currency: currency.into(),
        beneficiaries: beneficiaries.iter().copied().collect(),
        kind: EntryKind::Expense,
    }
}

fn transfer(from: &str, to: &str, amount: i64) -> Transfer {
    Transfer {
        from: from.into(),
        to: to.into(),
        amount: Money::from_i64(amount),
    }
}

#[rstest]
fn recorded_entries_get_sequential_ids(trip: Trip) {
    let first = trip
        .ledger()
        .record(expense("Alice", 90, "TWD", &["Alice", "Bob", "Carol"]))
        .unwrap();
    let second = trip
        .ledger()
        .record(expense("Bob", 30, "TWD", &["Bob", "Carol"]))
        .unwrap();
    assert_eq!(first.id, EntryId(1));
    assert_eq!(second.id, EntryId(2));
    assert_eq!(trip.ledger().entries().unwrap().len(), 2);
}

#[rstest]
fn invalid_entries_never_reach_the_store(trip: Trip) {
    let err = trip
        .ledger()
        .record(expense("Alice", 10, "TWD", &["Mallory"]))
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Invalid(EntryValidationError::UnknownMember(name))
            if name.as_str() == "Mallory"
    ));
    assert!(trip.ledger().entries().unwrap().is_empty());
}

#[rstest]
fn amend_and_remove_address_entries_by_id(trip: Trip) {
    let stored = trip
        .ledger()
        .record(expense("Alice", 10, "TWD", &["Bob"]))
        .unwrap();

    let amended = trip
        .ledger()
        .amend(stored.id, expense("Alice", 40, "TWD", &["Bob"]))
        .unwrap();
    assert_eq!(amended.id, stored.id);
    assert_eq!(amended.amount, Money::from_i64(40));

    assert_eq!(trip.ledger().entry(stored.id).unwrap(), amended);

    trip.ledger().remove(stored.id).unwrap();
    let err = trip.ledger().remove(stored.id).unwrap_err();
    assert!(matches!(err, LedgerError::Store(StoreError::NotFound(id)) if id == stored.id));
    let err = trip.ledger().entry(stored.id).unwrap_err();
    assert!(matches!(err, LedgerError::Store(StoreError::NotFound(id)) if id == stored.id));
}

#[rstest]
fn removed_members_keep_their_balance(trip: Trip) {
    trip.ledger()
        .record(expense("Alice", 90, "TWD", &["Alice", "Bob", "Carol"]))
        .unwrap();
    trip.members().remove("Carol").unwrap();
    assert_eq!(trip.member_names(), vec!["Alice", "Bob"]);

    let report = LedgerProcessor::default()
        .report_from(&trip.store, &trip.registry)
        .unwrap();
    let twd = report.currency("TWD").unwrap();
    assert_eq!(twd.balances.get("Carol"), Some(&Money::from_i64(-30)));
    assert_eq!(
        twd.settlement,
        Ok(vec![
            transfer("Bob", "Alice", 30),
            transfer("Carol", "Alice", 30)
        ])
    );
}

#[rstest]
fn stale_names_block_new_entries_only(trip: Trip) {
    trip.ledger()
        .record(expense("Carol", 20, "USD", &["Alice"]))
        .unwrap();
    trip.members().remove("Carol").unwrap();

    let err = trip
        .ledger()
        .record(expense("Carol", 20, "USD", &["Alice"]))
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Invalid(EntryValidationError::UnknownMember(_))
    ));
    assert_eq!(trip.ledger().entries().unwrap().len(), 1);
}

#[rstest]
#[case::blank("  ", "BlankName")]
#[case::duplicate("Bob", "AlreadyMember")]
#[case::separator("Bob, Jr", "ReservedCharacter")]
fn add_rejects_bad_names(trip: Trip, #[case] name: &str, #[case] expected: &str) {
    let err = trip.members().add(name).unwrap_err();
    let actual = match err {
        MemberError::BlankName => "BlankName",
        MemberError::AlreadyMember(_) => "AlreadyMember",
        MemberError::ReservedCharacter(_) => "ReservedCharacter",
        other => panic!("unexpected error: {other}"),
    };
    assert_eq!(actual, expected);
}

#[rstest]
fn add_trims_and_appends(trip: Trip) {
    let added = trip.members().add("  Dave ").unwrap();
    assert_eq!(added.as_str(), "Dave");
    assert_eq!(trip.member_names(), vec!["Alice", "Bob", "Carol", "Dave"]);
}

#[rstest]
fn clear_leaves_entries_alone(trip: Trip) {
    trip.ledger()
        .record(expense("Alice", 10, "EUR", &["Bob"]))
        .unwrap();
    assert_eq!(trip.members().clear().unwrap(), 3);
    assert!(trip.member_names().is_empty());
    assert_eq!(trip.ledger().entries().unwrap().len(), 1);
}

#[rstest]
fn rename_rewrites_history(trip: Trip) {
    trip.ledger()
        .record(expense("Alice", 90, "TWD", &["Alice", "Bob", "Carol"]))
        .unwrap();
    trip.ledger()
        .record(expense("Carol", 30, "TWD", &["Bob"]))
        .unwrap();
    trip.ledger()
        .record(expense("Alice", 10, "JPY", &["Alice"]))
        .unwrap();

    let rewritten = trip.members().rename("Carol", "Caroline").unwrap();
    assert_eq!(rewritten, 2);
    assert_eq!(trip.member_names(), vec!["Alice", "Bob", "Caroline"]);

    let entries = trip.ledger().entries().unwrap();
    assert!(entries[0].beneficiaries.contains("Caroline"));
    assert!(!entries[0].beneficiaries.contains("Carol"));
    assert_eq!(entries[1].payer.as_str(), "Caroline");

    let report = LedgerProcessor::default()
        .report_from(&trip.store, &trip.registry)
        .unwrap();
    let twd = report.currency("TWD").unwrap();
    assert_eq!(twd.balances.get("Carol"), None);
    assert_eq!(twd.balances.get("Caroline"), Some(&Money::ZERO));
}

#[test]
fn failed_registry_write_restores_renamed_entries() {
    let trip = Trip {
        store: InMemoryStore::default(),
        registry: InMemoryRegistry::read_only(&["Alice", "Bob", "Carol"]),
    };
    trip.ledger()
        .record(expense("Carol", 30, "TWD", &["Alice", "Carol"]))
        .unwrap();

    let err = trip.members().rename("Carol", "Caroline").unwrap_err();
    assert!(matches!(err, MemberError::Registry(_)));
    assert_eq!(trip.member_names(), vec!["Alice", "Bob", "Carol"]);

    let entries = trip.ledger().entries().unwrap();
    assert_eq!(entries[0].payer.as_str(), "Carol");
    assert!(entries[0].beneficiaries.contains("Carol"));
    assert!(!entries[0].beneficiaries.contains("Caroline"));
}

#[rstest]
#[case::unknown_source("Dave", "Erin")]
#[case::taken_target("Carol", "Bob")]
#[case::blank_target("Carol", " ")]
fn rename_rejects_conflicts(trip: Trip, #[case] from: &str, #[case] to: &str) {
    assert!(trip.members().rename(from, to).is_err());
    assert_eq!(trip.member_names(), vec!["Alice", "Bob", "Carol"]);
}

#[rstest]
fn report_groups_currencies_in_code_order(trip: Trip) {
    trip.ledger()
        .record(expense("Alice", 50, "USD", &["Bob"]))
        .unwrap();
    trip.ledger()
        .record(expense("Bob", 300, "JPY", &["Alice", "Bob", "Carol"]))
        .unwrap();

    let report = LedgerProcessor::default()
        .report_from(&trip.store, &trip.registry)
        .unwrap();
    let codes: Vec<&str> = report
        .currencies
        .iter()
        .map(|r| r.currency.as_str())
        .collect();
    assert_eq!(codes, vec!["JPY", "USD"]);
    assert_eq!(
        report.currency("JPY").unwrap().settlement,
        Ok(vec![
            transfer("Alice", "Bob", 100),
            transfer("Carol", "Bob", 100)
        ])
    );
    assert_eq!(
        report.currency("USD").unwrap().settlement,
        Ok(vec![transfer("Bob", "Alice", 50)])
    );
    assert_eq!(report.failures().count(), 0);
}
