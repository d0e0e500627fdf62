//! Rounding context shared by balance aggregation and settlement planning.
//!
//! Balances are carried at full decimal precision while entries are folded and
//! rounded exactly once, when the balance table is finalized. The same atomic
//! unit doubles as the settlement epsilon: balances within one unit of zero
//! are treated as settled.

use crate::model::Money;
use rust_decimal::{Decimal, RoundingStrategy};

/// Largest scale a `rust_decimal::Decimal` can represent.
pub const MAX_SETTLEMENT_SCALE: u32 = 28;

/// Rounding mode for finalized balances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoundingMode {
    /// Round half away from zero (e.g., 0.005 -> 0.01, -0.005 -> -0.01).
    #[default]
    HalfUp,
    /// Round half to nearest even number (banker's rounding).
    HalfEven,
}

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            Self::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Self::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("settlement scale {scale} is not supported (max {max_supported})")]
pub struct UnsupportedScale {
    pub scale: u32,
    pub max_supported: u32,
}

/// Scale and rounding policy for one currency's computation.
///
/// # Example
/// ```
/// use tripsplit_domain::{Money, services::{RoundingMode, SettlementContext}};
///
/// let ctx = SettlementContext::try_new(2, RoundingMode::HalfUp).unwrap();
/// assert_eq!(ctx.round(Money::new(33_335, 3)), Money::new(3334, 2));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettlementContext {
    scale: u32,
    rounding_mode: RoundingMode,
}

impl SettlementContext {
    pub fn try_new(scale: u32, rounding_mode: RoundingMode) -> Result<Self, UnsupportedScale> {
        if scale > MAX_SETTLEMENT_SCALE {
            return Err(UnsupportedScale {
                scale,
                max_supported: MAX_SETTLEMENT_SCALE,
            });
        }
        Ok(Self {
            scale,
            rounding_mode,
        })
    }

    /// Two decimal places, half-up. The minimum unit tracked for every currency.
    pub fn cents() -> Self {
        Self {
            scale: 2,
            rounding_mode: RoundingMode::HalfUp,
        }
    }

    pub fn scale(self) -> u32 {
        self.scale
    }

    pub fn rounding_mode(self) -> RoundingMode {
        self.rounding_mode
    }

    /// Smallest amount the context tracks; also the settlement epsilon.
    pub fn atomic_unit(self) -> Money {
        Money::new(1, self.scale)
    }

    pub fn round(self, amount: Money) -> Money {
        Money::from_decimal(
            amount
                .as_decimal()
                .round_dp_with_strategy(self.scale, self.rounding_mode.strategy()),
        )
    }

    /// Largest total drift that rounding `accounts` balances independently can produce:
    /// half an atomic unit per account.
    pub fn rounding_tolerance(self, accounts: usize) -> Money {
        let half_unit = self.atomic_unit().as_decimal() / Decimal::TWO;
        Money::from_decimal(half_unit * Decimal::from(accounts.max(1)))
    }
}

impl Default for SettlementContext {
    fn default() -> Self {
        Self::cents()
    }
}
