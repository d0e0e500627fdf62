use chrono::NaiveDateTime;
use tripsplit_domain::{
    Beneficiaries, Currency, EntryId, EntryKind, LedgerEntry, MemberBalances, MemberName, Money,
    SettlementError, Transfer,
};

/// An entry as submitted, before the store assigns it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub timestamp: NaiveDateTime,
    pub description: String,
    pub payer: MemberName,
    pub amount: Money,
    pub currency: Currency,
    pub beneficiaries: Beneficiaries,
    pub kind: EntryKind,
}

impl NewEntry {
    pub fn into_entry(self, id: EntryId) -> LedgerEntry {
        LedgerEntry {
            id,
            timestamp: self.timestamp,
            description: self.description,
            payer: self.payer,
            amount: self.amount,
            currency: self.currency,
            beneficiaries: self.beneficiaries,
            kind: self.kind,
        }
    }

    /// Names this entry touches, payer first.
    pub fn participants(&self) -> impl Iterator<Item = &MemberName> + '_ {
        std::iter::once(&self.payer).chain(self.beneficiaries.iter())
    }
}

impl From<LedgerEntry> for NewEntry {
    fn from(entry: LedgerEntry) -> Self {
        Self {
            timestamp: entry.timestamp,
            description: entry.description,
            payer: entry.payer,
            amount: entry.amount,
            currency: entry.currency,
            beneficiaries: entry.beneficiaries,
            kind: entry.kind,
        }
    }
}

/// Balances and settlement plan for one currency.
#[derive(Debug)]
pub struct CurrencyReport {
    pub currency: Currency,
    pub balances: MemberBalances,
    pub settlement: Result<Vec<Transfer>, SettlementError>,
}

#[derive(Debug, Default)]
pub struct LedgerReport {
    pub currencies: Vec<CurrencyReport>,
}

impl LedgerReport {
    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    pub fn currency(&self, code: &str) -> Option<&CurrencyReport> {
        self.currencies
            .iter()
            .find(|report| report.currency.as_str() == code)
    }

    /// Currencies whose settlement failed a conservation check.
    pub fn failures(&self) -> impl Iterator<Item = (&Currency, &SettlementError)> + '_ {
        self.currencies
            .iter()
            .filter_map(|report| match &report.settlement {
                Ok(_) => None,
                Err(err) => Some((&report.currency, err)),
            })
    }
}
