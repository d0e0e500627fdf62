use crate::{
    money_format::format_money,
    text_table::{Alignment, TextTableBuilder},
};
use std::borrow::Cow;
use tripsplit_application::NAME_SEPARATOR;
use tripsplit_domain::{EntryKind, LedgerEntry, MemberName};
use tripsplit_i18n as i18n;

pub struct EntriesPresenter;

impl EntriesPresenter {
    pub fn render_entries(entries: &[LedgerEntry]) -> String {
        if entries.is_empty() {
            return format!("{}\n", i18n::NO_ENTRIES);
        }

        let separator = format!("{NAME_SEPARATOR} ");
        let mut builder = TextTableBuilder::new()
            .alignments(&[
                Alignment::Right,
                Alignment::Left,
                Alignment::Left,
                Alignment::Left,
                Alignment::Right,
                Alignment::Left,
                Alignment::Left,
                Alignment::Left,
            ])
            .headers(&[
                Cow::Borrowed(i18n::ID),
                Cow::Borrowed(i18n::DATE),
                Cow::Borrowed(i18n::ITEM),
                Cow::Borrowed(i18n::PAYER),
                Cow::Borrowed(i18n::AMOUNT),
                Cow::Borrowed(i18n::CURRENCY),
                Cow::Borrowed(i18n::BENEFICIARIES),
                Cow::Borrowed(i18n::KIND),
            ]);

        for entry in entries {
            let beneficiaries = entry
                .beneficiaries
                .iter()
                .map(MemberName::as_str)
                .collect::<Vec<_>>()
                .join(&separator);
            builder = builder.row([
                Cow::Owned(entry.id.to_string()),
                Cow::Owned(entry.timestamp.format(LedgerEntry::DATE_FORMAT).to_string()),
                Cow::Borrowed(entry.description.as_str()),
                Cow::Borrowed(entry.payer.as_str()),
                Cow::Owned(format_money(entry.amount)),
                Cow::Borrowed(entry.currency.as_str()),
                Cow::Owned(beneficiaries),
                Cow::Borrowed(kind_label(entry.kind)),
            ]);
        }

        builder.build()
    }

    pub fn render_members(members: &[MemberName]) -> String {
        if members.is_empty() {
            return format!("{}\n", i18n::NO_MEMBERS);
        }
        let mut out = String::new();
        for member in members {
            out.push_str(member.as_str());
            out.push('\n');
        }
        out
    }
}

fn kind_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Expense => i18n::EXPENSE,
        EntryKind::Reimbursement => i18n::REIMBURSEMENT,
    }
}
