use chrono::NaiveDateTime;
use indexmap::{IndexMap, IndexSet};
use rust_decimal::Decimal;
use smol_str::SmolStr;
use std::{
    borrow::Borrow,
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

/// Display name of a trip member. Compared verbatim, no normalization.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberName(SmolStr);

impl MemberName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(SmolStr::new(name))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MemberName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for MemberName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for MemberName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for MemberName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for MemberName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

/// Opaque currency code. Entries are grouped by it and never converted.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Currency(SmolStr);

impl Currency {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(SmolStr::new(code))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Currency {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl Borrow<str> for Currency {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Even share of this amount across `parts` people, unrounded.
    pub fn split(self, parts: usize) -> Self {
        if parts == 0 {
            return self;
        }
        Self(self.0 / Decimal::from(parts))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Store-assigned identifier of a ledger entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EntryKind {
    #[default]
    Expense,
    /// Repayment from `payer` to the single beneficiary.
    Reimbursement,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Reimbursement => "reimbursement",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown entry kind '{0}'")]
pub struct UnknownEntryKind(pub String);

impl FromStr for EntryKind {
    type Err = UnknownEntryKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "expense" => Ok(Self::Expense),
            "reimbursement" => Ok(Self::Reimbursement),
            other => Err(UnknownEntryKind(other.to_string())),
        }
    }
}

/// Members sharing the cost of an entry. Duplicates collapse; equality ignores order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Beneficiaries(IndexSet<MemberName>);

impl Beneficiaries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemberName> + '_ {
        self.0.iter()
    }

    /// Replaces `from` with `to` in place. Returns whether anything changed.
    pub fn rename(&mut self, from: &str, to: &MemberName) -> bool {
        let Some(index) = self.0.get_index_of(from) else {
            return false;
        };
        self.0.shift_remove_index(index);
        if !self.0.contains(to.as_str()) {
            let (inserted_at, _) = self.0.insert_full(to.clone());
            self.0.move_index(inserted_at, index);
        }
        true
    }
}

impl FromIterator<MemberName> for Beneficiaries {
    fn from_iter<I: IntoIterator<Item = MemberName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for Beneficiaries {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(MemberName::from).collect()
    }
}

/// One recorded transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerEntry {
    pub id: EntryId,
    /// Advisory only; never read by the balance computation.
    pub timestamp: NaiveDateTime,
    pub description: String,
    pub payer: MemberName,
    pub amount: Money,
    pub currency: Currency,
    pub beneficiaries: Beneficiaries,
    pub kind: EntryKind,
}

impl LedgerEntry {
    /// Minute-precision layout used wherever a timestamp is written or shown.
    pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

    /// Largest amount one entry may carry: 10^15 in any currency.
    ///
    /// Balances are plain `Decimal` sums, so bounding each entry keeps a ledger of
    /// any realistic length far from `Decimal::MAX`.
    pub const MAX_AMOUNT: Money =
        Money(Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0));

    /// Whether `amount` is positive and no larger than [`Self::MAX_AMOUNT`].
    pub fn accepts_amount(amount: Money) -> bool {
        amount > Money::ZERO && amount <= Self::MAX_AMOUNT
    }

    pub fn expense(
        payer: impl Into<MemberName>,
        amount: Money,
        currency: impl Into<Currency>,
        beneficiaries: Beneficiaries,
    ) -> Self {
        Self {
            id: EntryId(0),
            timestamp: NaiveDateTime::default(),
            description: String::new(),
            payer: payer.into(),
            amount,
            currency: currency.into(),
            beneficiaries,
            kind: EntryKind::Expense,
        }
    }

    pub fn reimbursement(
        payer: impl Into<MemberName>,
        receiver: impl Into<MemberName>,
        amount: Money,
        currency: impl Into<Currency>,
    ) -> Self {
        let receiver: MemberName = receiver.into();
        Self {
            beneficiaries: Beneficiaries::from_iter([receiver]),
            kind: EntryKind::Reimbursement,
            ..Self::expense(payer, amount, currency, Beneficiaries::new())
        }
    }

    pub fn with_id(mut self, id: EntryId) -> Self {
        self.id = id;
        self
    }

    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Names this entry touches, payer first.
    pub fn participants(&self) -> impl Iterator<Item = &MemberName> + '_ {
        std::iter::once(&self.payer).chain(self.beneficiaries.iter())
    }
}

/// Net position per member in one currency. Positive means the member is owed.
pub type MemberBalances = IndexMap<MemberName, Money>;

/// Folds ledger entries into unrounded member balances.
pub struct BalanceAccumulator {
    balances: MemberBalances,
}

impl BalanceAccumulator {
    pub fn new_with_members<'m, I>(members: I) -> Self
    where
        I: IntoIterator<Item = &'m MemberName>,
    {
        let balances = members
            .into_iter()
            .map(|member| (member.clone(), Money::ZERO))
            .collect();
        Self { balances }
    }

    pub fn apply(&mut self, entry: &LedgerEntry) {
        let credit = if entry.beneficiaries.is_empty() {
            Money::ZERO
        } else {
            entry.amount
        };
        *self
            .balances
            .entry(entry.payer.clone())
            .or_insert(Money::ZERO) += credit;
        debit_shares(&mut self.balances, &entry.beneficiaries, entry.amount);
    }

    pub fn balances(&self) -> &MemberBalances {
        &self.balances
    }

    pub fn into_balances(self) -> MemberBalances {
        self.balances
    }
}

/// Subtracts an even share of `amount` from every beneficiary.
pub fn debit_shares(balances: &mut MemberBalances, beneficiaries: &Beneficiaries, amount: Money) {
    if beneficiaries.is_empty() {
        return;
    }

    let share = amount.split(beneficiaries.len());
    for member in beneficiaries.iter() {
        *balances.entry(member.clone()).or_insert(Money::ZERO) -= share;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: MemberName,
    pub to: MemberName,
    pub amount: Money,
}

#[derive(Debug, PartialEq)]
pub struct Settlement {
    pub new_balances: MemberBalances,
    pub transfers: Vec<Transfer>,
}
