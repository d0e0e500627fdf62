use crate::{
    model::{BalanceAccumulator, LedgerEntry, MemberBalances, MemberName},
    services::SettlementContext,
};

/// Folds one currency's entries into a rounded balance table.
#[derive(Clone, Copy, Debug, Default)]
pub struct LedgerAggregator {
    context: SettlementContext,
}

impl LedgerAggregator {
    pub fn new(context: SettlementContext) -> Self {
        Self { context }
    }

    /// Computes every member's net balance.
    ///
    /// Every registered member gets a row, even without activity. Names that only
    /// appear in entries (members removed since) are added after them in the
    /// order they are first seen. Entries must all share one currency; the
    /// currency field itself is never inspected.
    ///
    /// Rounding happens once per balance after all entries are applied. Amounts are
    /// expected within [`LedgerEntry::MAX_AMOUNT`]; stores and validators reject
    /// anything larger.
    pub fn aggregate<'e, I>(&self, entries: I, members: &[MemberName]) -> MemberBalances
    where
        I: IntoIterator<Item = &'e LedgerEntry>,
    {
        let mut accumulator = BalanceAccumulator::new_with_members(members);
        let mut entry_count = 0usize;
        for entry in entries {
            accumulator.apply(entry);
            entry_count += 1;
        }

        let mut balances = accumulator.into_balances();
        for balance in balances.values_mut() {
            *balance = self.context.round(*balance);
        }

        tracing::debug!(
            entry_count,
            member_count = members.len(),
            stale_member_count = balances.len().saturating_sub(members.len()),
            scale = self.context.scale(),
            "Aggregated ledger balances"
        );

        balances
    }
}
