use crate::{
    error::ReportError,
    model::{CurrencyReport, LedgerReport},
    ports::{EntryStore, MemberRegistry},
};
use tripsplit_domain::{
    LedgerAggregator, LedgerEntry, MemberName, SettlementContext, SettlementPlanner,
    partition_by_currency,
};

/// Runs the aggregate-then-plan pipeline for every currency in a ledger snapshot.
///
/// Holds no state between calls; every report is recomputed from its inputs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LedgerProcessor {
    aggregator: LedgerAggregator,
    planner: SettlementPlanner,
}

impl LedgerProcessor {
    pub fn new(context: SettlementContext) -> Self {
        Self {
            aggregator: LedgerAggregator::new(context),
            planner: SettlementPlanner::new(context),
        }
    }

    pub fn build_report(&self, entries: &[LedgerEntry], members: &[MemberName]) -> LedgerReport {
        let currencies = partition_by_currency(entries)
            .into_iter()
            .map(|(currency, group)| {
                let span = tracing::debug_span!("currency", %currency, entries = group.len());
                let _guard = span.enter();

                let balances = self.aggregator.aggregate(group, members);
                let settlement = self.planner.plan(&balances);
                if let Err(err) = &settlement {
                    tracing::warn!(%currency, error = %err, "Settlement failed conservation check");
                }

                CurrencyReport {
                    currency: currency.clone(),
                    balances,
                    settlement,
                }
            })
            .collect();

        LedgerReport { currencies }
    }

    /// Takes one snapshot from each collaborator and builds the report from it.
    pub fn report_from(
        &self,
        store: &dyn EntryStore,
        registry: &dyn MemberRegistry,
    ) -> Result<LedgerReport, ReportError> {
        let members = registry.members()?;
        let entries = store.list()?;
        Ok(self.build_report(&entries, &members))
    }
}
