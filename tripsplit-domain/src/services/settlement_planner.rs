use crate::{
    model::{MemberBalances, MemberName, Money, Settlement, Transfer},
    services::SettlementContext,
};

/// Conservation violations detected while planning transfers.
///
/// The walk itself cannot strand a residual larger than what the sum check
/// already admits, so an imbalanced total is the only failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SettlementError {
    /// Balances do not sum to zero within rounding tolerance.
    #[error("sum of balances must be zero (found {total}, tolerance {tolerance})")]
    ImbalancedTotal { total: Money, tolerance: Money },
}

struct Account<'a> {
    name: &'a MemberName,
    balance: Money,
}

/// Greedy largest-debtor/largest-creditor transfer planner.
#[derive(Clone, Copy, Debug, Default)]
pub struct SettlementPlanner {
    context: SettlementContext,
}

impl SettlementPlanner {
    pub fn new(context: SettlementContext) -> Self {
        Self { context }
    }

    /// Plans transfers that bring every balance to (near-)zero.
    ///
    /// Debtors are visited most negative first and creditors most positive first;
    /// equal balances keep their order in `balances`. A pointer moves on once its
    /// residual drops below one atomic unit, so a residual of exactly one unit is
    /// absorbed by the next pairing. Pairings of one unit or less move no money.
    /// Each step settles at least one side, so the plan never exceeds
    /// `debtors + creditors - 1` transfers.
    pub fn plan(&self, balances: &MemberBalances) -> Result<Vec<Transfer>, SettlementError> {
        let epsilon = self.context.atomic_unit();
        let tolerance = self.context.rounding_tolerance(balances.len());
        let total: Money = balances.values().sum();
        if total.abs() > tolerance {
            tracing::error!(
                reject_reason = "input_imbalance",
                member_count = balances.len(),
                total = %total,
                tolerance = %tolerance,
                "Settlement rejected due to input imbalance"
            );
            return Err(SettlementError::ImbalancedTotal { total, tolerance });
        }

        let mut debtors: Vec<Account<'_>> = Vec::new();
        let mut creditors: Vec<Account<'_>> = Vec::new();
        for (name, &balance) in balances {
            if balance < -epsilon {
                debtors.push(Account { name, balance });
            } else if balance > epsilon {
                creditors.push(Account { name, balance });
            }
        }
        debtors.sort_by(|a, b| a.balance.cmp(&b.balance));
        creditors.sort_by(|a, b| b.balance.cmp(&a.balance));

        let mut transfers = Vec::with_capacity(debtors.len() + creditors.len());
        let (mut i, mut j) = (0, 0);
        while i < debtors.len() && j < creditors.len() {
            let debtor = &mut debtors[i];
            let creditor = &mut creditors[j];

            let amount = debtor.balance.abs().min(creditor.balance);
            if amount > epsilon {
                transfers.push(Transfer {
                    from: debtor.name.clone(),
                    to: creditor.name.clone(),
                    amount,
                });
            }

            debtor.balance += amount;
            creditor.balance -= amount;

            if debtor.balance.abs() < epsilon {
                i += 1;
            }
            if creditor.balance.abs() < epsilon {
                j += 1;
            }
        }

        let residual: Money = debtors[i..]
            .iter()
            .chain(&creditors[j..])
            .map(|account| account.balance.abs())
            .sum();
        if !residual.is_zero() {
            tracing::debug!(
                residual = %residual,
                tolerance = %tolerance,
                "Rounding drift left after settlement"
            );
        }

        tracing::debug!(
            debtor_count = debtors.len(),
            creditor_count = creditors.len(),
            transfer_count = transfers.len(),
            "Planned settlement transfers"
        );

        Ok(transfers)
    }

    /// Plans transfers and applies them, returning the post-settlement balances.
    pub fn settle(&self, balances: MemberBalances) -> Result<Settlement, SettlementError> {
        let transfers = self.plan(&balances)?;
        let new_balances = apply_transfers(balances, &transfers);
        Ok(Settlement {
            new_balances,
            transfers,
        })
    }
}

/// Moves each transfer's amount from payer to payee.
pub fn apply_transfers(mut balances: MemberBalances, transfers: &[Transfer]) -> MemberBalances {
    for transfer in transfers {
        if let Some(balance) = balances.get_mut(&transfer.from) {
            *balance += transfer.amount;
        }
        if let Some(balance) = balances.get_mut(&transfer.to) {
            *balance -= transfer.amount;
        }
    }
    balances
}
