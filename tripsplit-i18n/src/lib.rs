#[cfg(all(feature = "zh-tw", feature = "en"))]
compile_error!("Cannot enable both 'zh-tw' and 'en' features at the same time");

#[cfg(feature = "zh-tw")]
pub mod strings {
    pub const ID: &str = "編號";
    pub const DATE: &str = "日期";
    pub const ITEM: &str = "項目";
    pub const PAYER: &str = "付款人";
    pub const BENEFICIARIES: &str = "分攤者";
    pub const KIND: &str = "類型";
    pub const EXPENSE: &str = "支出";
    pub const REIMBURSEMENT: &str = "還款";
    pub const MEMBER: &str = "成員";
    pub const BALANCE: &str = "餘額";
    pub const STATUS: &str = "狀態";
    pub const OWED: &str = "應收";
    pub const OWES: &str = "應付";
    pub const SETTLED: &str = "平帳";
    pub const FROM: &str = "付款人";
    pub const TO: &str = "收款人";
    pub const AMOUNT: &str = "金額";
    pub const CURRENCY: &str = "幣別";
    pub const NO_TRANSFERS: &str = "目前大家都平帳，不需要轉帳";
    pub const NO_ENTRIES: &str = "尚無任何紀錄";
    pub const NO_MEMBERS: &str = "尚未新增成員";
    pub const SETTLEMENT_CALCULATION_FAILED: &str = "結算計算失敗";
}

#[cfg(feature = "en")]
pub mod strings {
    pub const ID: &str = "ID";
    pub const DATE: &str = "Date";
    pub const ITEM: &str = "Item";
    pub const PAYER: &str = "Payer";
    pub const BENEFICIARIES: &str = "Beneficiaries";
    pub const KIND: &str = "Kind";
    pub const EXPENSE: &str = "Expense";
    pub const REIMBURSEMENT: &str = "Reimbursement";
    pub const MEMBER: &str = "Member";
    pub const BALANCE: &str = "Balance";
    pub const STATUS: &str = "Status";
    pub const OWED: &str = "Owed";
    pub const OWES: &str = "Owes";
    pub const SETTLED: &str = "Settled";
    pub const FROM: &str = "From";
    pub const TO: &str = "To";
    pub const AMOUNT: &str = "Amount";
    pub const CURRENCY: &str = "Currency";
    pub const NO_TRANSFERS: &str = "Everyone is settled up; no transfers needed";
    pub const NO_ENTRIES: &str = "No entries recorded yet";
    pub const NO_MEMBERS: &str = "No members registered yet";
    pub const SETTLEMENT_CALCULATION_FAILED: &str = "Settlement calculation failed";
}

#[cfg(not(any(feature = "zh-tw", feature = "en")))]
pub mod strings {
    pub const ID: &str = "ID";
    pub const DATE: &str = "Date";
    pub const ITEM: &str = "Item";
    pub const PAYER: &str = "Payer";
    pub const BENEFICIARIES: &str = "Beneficiaries";
    pub const KIND: &str = "Kind";
    pub const EXPENSE: &str = "Expense";
    pub const REIMBURSEMENT: &str = "Reimbursement";
    pub const MEMBER: &str = "Member";
    pub const BALANCE: &str = "Balance";
    pub const STATUS: &str = "Status";
    pub const OWED: &str = "Owed";
    pub const OWES: &str = "Owes";
    pub const SETTLED: &str = "Settled";
    pub const FROM: &str = "From";
    pub const TO: &str = "To";
    pub const AMOUNT: &str = "Amount";
    pub const CURRENCY: &str = "Currency";
    pub const NO_TRANSFERS: &str = "Everyone is settled up; no transfers needed";
    pub const NO_ENTRIES: &str = "No entries recorded yet";
    pub const NO_MEMBERS: &str = "No members registered yet";
    pub const SETTLEMENT_CALCULATION_FAILED: &str = "Settlement calculation failed";
}

pub use strings::*;

#[cfg(feature = "zh-tw")]
pub fn currency_heading(currency: impl std::fmt::Display) -> String {
    format!("幣別：{currency}")
}

#[cfg(feature = "zh-tw")]
pub fn stale_member_note(names: impl std::fmt::Display) -> String {
    format!("已移除但仍有紀錄的成員：{names}")
}

#[cfg(feature = "en")]
pub fn currency_heading(currency: impl std::fmt::Display) -> String {
    format!("Currency: {currency}")
}

#[cfg(feature = "en")]
pub fn stale_member_note(names: impl std::fmt::Display) -> String {
    format!("Removed members still referenced by entries: {names}")
}

#[cfg(not(any(feature = "zh-tw", feature = "en")))]
pub fn currency_heading(currency: impl std::fmt::Display) -> String {
    format!("Currency: {currency}")
}

#[cfg(not(any(feature = "zh-tw", feature = "en")))]
pub fn stale_member_note(names: impl std::fmt::Display) -> String {
    format!("Removed members still referenced by entries: {names}")
}

pub struct ImbalanceMessage {
    total: String,
    tolerance: String,
}

pub fn imbalance(total: impl ToString, tolerance: impl ToString) -> ImbalanceMessage {
    ImbalanceMessage {
        total: total.to_string(),
        tolerance: tolerance.to_string(),
    }
}

#[cfg(feature = "zh-tw")]
impl std::fmt::Display for ImbalanceMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "餘額總和不為零（{}，容許誤差 {}），請檢查紀錄",
            self.total, self.tolerance
        )
    }
}

#[cfg(feature = "en")]
impl std::fmt::Display for ImbalanceMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Balances do not sum to zero ({}, tolerance {}); check the entries",
            self.total, self.tolerance
        )
    }
}

#[cfg(not(any(feature = "zh-tw", feature = "en")))]
impl std::fmt::Display for ImbalanceMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Balances do not sum to zero ({}, tolerance {}); check the entries",
            self.total, self.tolerance
        )
    }
}
