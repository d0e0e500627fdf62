use crate::{
    money_format::{format_money, format_signed},
    text_table::{Alignment, TextTableBuilder},
};
use std::borrow::Cow;
use tripsplit_application::{CurrencyReport, LedgerReport};
use tripsplit_domain::{MemberBalances, MemberName, Money, SettlementError, Transfer};
use tripsplit_i18n as i18n;

pub struct SettlementPresenter;

pub struct CurrencyView {
    pub heading: String,
    pub balance_table: String,
    pub transfer_table: Option<String>,
    /// Shown under the tables: "nobody owes anything" or a settlement failure.
    pub notice: Option<String>,
}

pub struct SettlementView {
    pub sections: Vec<CurrencyView>,
}

impl SettlementView {
    pub fn to_text(&self) -> String {
        if self.sections.is_empty() {
            return format!("{}\n", i18n::NO_ENTRIES);
        }

        let mut out = String::new();
        for (idx, section) in self.sections.iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            out.push_str(&section.heading);
            out.push_str("\n\n");
            out.push_str(&section.balance_table);
            if let Some(transfers) = &section.transfer_table {
                out.push('\n');
                out.push_str(transfers);
            }
            if let Some(notice) = &section.notice {
                out.push('\n');
                out.push_str(notice);
                out.push('\n');
            }
        }
        out
    }
}

impl SettlementPresenter {
    pub fn render(report: &LedgerReport, members: &[MemberName]) -> SettlementView {
        let sections = report
            .currencies
            .iter()
            .map(|currency| Self::render_currency(currency, members))
            .collect();
        SettlementView { sections }
    }

    fn render_currency(report: &CurrencyReport, members: &[MemberName]) -> CurrencyView {
        let balance_table = Self::build_balance_table(&report.balances);

        let stale: Vec<&str> = report
            .balances
            .keys()
            .filter(|name| !members.contains(name))
            .map(MemberName::as_str)
            .collect();
        let stale_note =
            (!stale.is_empty()).then(|| i18n::stale_member_note(stale.join(", ")));

        let (transfer_table, outcome) = match &report.settlement {
            Ok(transfers) if transfers.is_empty() => (None, i18n::NO_TRANSFERS.to_string()),
            Ok(transfers) => (Some(Self::build_transfer_table(transfers)), String::new()),
            Err(err) => (
                None,
                format!(
                    "{}: {}",
                    i18n::SETTLEMENT_CALCULATION_FAILED,
                    format_settlement_error(err)
                ),
            ),
        };

        let notice = [stale_note, (!outcome.is_empty()).then_some(outcome)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        CurrencyView {
            heading: i18n::currency_heading(&report.currency),
            balance_table,
            transfer_table,
            notice: (!notice.is_empty()).then(|| notice.join("\n")),
        }
    }

    pub fn build_balance_table(balances: &MemberBalances) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right, Alignment::Left])
            .headers(&[
                Cow::Borrowed(i18n::MEMBER),
                Cow::Borrowed(i18n::BALANCE),
                Cow::Borrowed(i18n::STATUS),
            ]);

        for (name, balance) in balances {
            builder = builder.row([
                Cow::Borrowed(name.as_str()),
                Cow::Owned(format_signed(*balance)),
                Cow::Owned(balance_status(*balance)),
            ]);
        }

        builder.build()
    }

    pub fn build_transfer_table(transfers: &[Transfer]) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Left, Alignment::Right])
            .headers(&[
                Cow::Borrowed(i18n::FROM),
                Cow::Borrowed(i18n::TO),
                Cow::Borrowed(i18n::AMOUNT),
            ]);

        for transfer in transfers {
            builder = builder.row([
                Cow::Borrowed(transfer.from.as_str()),
                Cow::Borrowed(transfer.to.as_str()),
                Cow::Owned(format_money(transfer.amount)),
            ]);
        }

        builder.build()
    }
}

fn balance_status(balance: Money) -> String {
    if balance > Money::ZERO {
        format!("{} {}", i18n::OWED, format_money(balance))
    } else if balance.is_negative() {
        format!("{} {}", i18n::OWES, format_money(balance.abs()))
    } else {
        i18n::SETTLED.to_string()
    }
}

pub fn format_settlement_error(err: &SettlementError) -> String {
    match err {
        SettlementError::ImbalancedTotal { total, tolerance } => {
            i18n::imbalance(format_signed(*total), format_money(*tolerance)).to_string()
        }
    }
}
