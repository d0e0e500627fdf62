use crate::{
    cli::{Command, EntryCommand, ExpenseArgs, MemberCommand, ReimburseArgs},
    config::AppConfig,
};
use anyhow::{Context, anyhow};
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::path::Path;
use tripsplit_application::{
    EntryValidator, LedgerProcessor, LedgerService, MemberService, NewEntry,
};
use tripsplit_domain::{Beneficiaries, Currency, EntryId, EntryKind, LedgerEntry, MemberName};
use tripsplit_infrastructure::{CsvEntryStore, JsonMemberRegistry};
use tripsplit_presentation::{EntriesPresenter, SettlementPresenter, format_money};

/// File-backed collaborators for one trip directory.
pub struct Trip {
    config: AppConfig,
    store: CsvEntryStore,
    registry: JsonMemberRegistry,
}

impl Trip {
    pub fn open(config: AppConfig) -> Self {
        let store = CsvEntryStore::new(config.ledger_path());
        let registry = JsonMemberRegistry::new(config.members_path());
        Self {
            config,
            store,
            registry,
        }
    }

    fn ledger(&self) -> LedgerService<'_> {
        LedgerService::new(
            &self.store,
            &self.registry,
            EntryValidator::with_currencies(self.config.currencies.iter().cloned()),
        )
    }

    fn members(&self) -> MemberService<'_> {
        MemberService::new(&self.registry, &self.store)
    }

    /// Runs one command and returns what should be printed.
    pub fn run(&self, command: Command) -> anyhow::Result<String> {
        match command {
            Command::Report => self.report(),
            Command::Member(command) => self.run_member(command),
            Command::Entry(command) => self.run_entry(command),
            Command::Backup { path } => {
                let count = self
                    .store
                    .backup_to(&path)
                    .with_context(|| format!("failed to back up to {}", path.display()))?;
                Ok(format!("Saved {count} entries to {}\n", path.display()))
            }
            Command::Restore { path } => {
                let count = self
                    .store
                    .restore_from(&path)
                    .with_context(|| format!("failed to restore from {}", path.display()))?;
                Ok(format!("Restored {count} entries from {}\n", path.display()))
            }
        }
    }

    fn report(&self) -> anyhow::Result<String> {
        let members = self.members().members()?;
        let report = LedgerProcessor::new(self.config.context)
            .report_from(&self.store, &self.registry)
            .context("failed to load the ledger")?;
        for (currency, err) in report.failures() {
            tracing::warn!(%currency, error = %err, "Currency could not be settled");
        }
        Ok(SettlementPresenter::render(&report, &members).to_text())
    }

    fn run_member(&self, command: MemberCommand) -> anyhow::Result<String> {
        let service = self.members();
        match command {
            MemberCommand::List => Ok(EntriesPresenter::render_members(&service.members()?)),
            MemberCommand::Add { names } => {
                let mut out = String::new();
                for name in names {
                    let added = service.add(&name)?;
                    out.push_str(&format!("Added {added}\n"));
                }
                Ok(out)
            }
            MemberCommand::Remove { name } => {
                let removed = service.remove(&name)?;
                Ok(format!("Removed {removed}\n"))
            }
            MemberCommand::Rename { from, to } => {
                let rewritten = service.rename(&from, &to)?;
                Ok(format!(
                    "Renamed {from} to {} ({rewritten} entries updated)\n",
                    to.trim()
                ))
            }
            MemberCommand::Clear => {
                let count = service.clear()?;
                Ok(format!("Removed {count} members\n"))
            }
        }
    }

    fn run_entry(&self, command: EntryCommand) -> anyhow::Result<String> {
        let ledger = self.ledger();
        match command {
            EntryCommand::List => Ok(EntriesPresenter::render_entries(&ledger.entries()?)),
            EntryCommand::Add(args) => {
                let stored = ledger.record(self.expense(args)?)?;
                Ok(format!(
                    "Recorded entry {}: {} {} {}\n",
                    stored.id,
                    stored.payer,
                    format_money(stored.amount),
                    stored.currency
                ))
            }
            EntryCommand::Reimburse(args) => {
                let stored = ledger.record(self.reimbursement(args)?)?;
                Ok(format!("Recorded entry {}\n", stored.id))
            }
            EntryCommand::Edit { id, expense } => {
                let id = EntryId(id);
                let kind = ledger.entry(id)?.kind;
                let stored = ledger.amend(
                    id,
                    NewEntry {
                        kind,
                        ..self.expense(expense)?
                    },
                )?;
                Ok(format!("Updated entry {}\n", stored.id))
            }
            EntryCommand::Delete { id } => {
                let removed = ledger.remove(EntryId(id))?;
                Ok(format!("Deleted entry {}\n", removed.id))
            }
        }
    }

    fn expense(&self, args: ExpenseArgs) -> anyhow::Result<NewEntry> {
        Ok(NewEntry {
            timestamp: parse_date(args.date.as_deref())?,
            description: args.item,
            payer: MemberName::from(args.payer.trim()),
            amount: args.amount,
            currency: self.currency(args.currency.as_deref())?,
            beneficiaries: args
                .beneficiaries
                .iter()
                .map(|name| name.trim())
                .collect::<Beneficiaries>(),
            kind: EntryKind::Expense,
        })
    }

    fn reimbursement(&self, args: ReimburseArgs) -> anyhow::Result<NewEntry> {
        Ok(NewEntry {
            timestamp: parse_date(args.date.as_deref())?,
            description: args.item,
            payer: MemberName::from(args.from.trim()),
            amount: args.amount,
            currency: self.currency(args.currency.as_deref())?,
            beneficiaries: Beneficiaries::from_iter([args.to.trim()]),
            kind: EntryKind::Reimbursement,
        })
    }

    fn currency(&self, requested: Option<&str>) -> anyhow::Result<Currency> {
        match requested {
            Some(code) => Ok(Currency::from(code.trim())),
            None => self
                .config
                .default_currency()
                .cloned()
                .ok_or_else(|| anyhow!("no currency configured")),
        }
    }

    pub fn home(&self) -> &Path {
        &self.config.home
    }
}

fn parse_date(raw: Option<&str>) -> anyhow::Result<NaiveDateTime> {
    let Some(raw) = raw else {
        return Ok(Local::now().naive_local());
    };
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, LedgerEntry::DATE_FORMAT)
        .or_else(|_| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(|date| date.and_time(Default::default()))
        })
        .with_context(|| format!("'{raw}' is not a date (expected YYYY-MM-DD [HH:MM])"))
}
