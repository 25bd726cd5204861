use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::amount::lamports_to_sol;

/// How far the raise is towards its goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaiseProgress {
    pub raised_lamports: u64,
    pub goal_lamports: u64,
}

impl RaiseProgress {
    pub fn new(raised_lamports: u64, goal_lamports: u64) -> Self {
        Self { raised_lamports, goal_lamports }
    }

    pub fn sol_raised(&self) -> Decimal {
        lamports_to_sol(self.raised_lamports)
    }

    pub fn sol_goal(&self) -> Decimal {
        lamports_to_sol(self.goal_lamports)
    }

    /// Percentage of the goal raised; exceeds 100 once the goal is passed.
    /// A zero goal counts as already reached.
    pub fn percent(&self) -> Decimal {
        if self.goal_lamports == 0 {
            return Decimal::ONE_HUNDRED;
        }
        (Decimal::from(self.raised_lamports) * Decimal::ONE_HUNDRED
            / Decimal::from(self.goal_lamports))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
    }

    /// [`Self::percent`] clamped to 0..=100 for drawing a bar
    pub fn bar_percent(&self) -> Decimal {
        self.percent().min(Decimal::ONE_HUNDRED)
    }

    pub fn is_goal_reached(&self) -> bool {
        self.raised_lamports >= self.goal_lamports
    }
}

impl std::fmt::Display for RaiseProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} SOL raised of {} SOL goal ({}%)",
            self.sol_raised(),
            self.sol_goal(),
            self.percent()
        )
    }
}
