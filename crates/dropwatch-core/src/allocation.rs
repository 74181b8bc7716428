// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DROPWATCH - AIRDROP ALLOCATION
//
// The two distribution totals the snapshot is measured against.
// Total allocated: 35,921,361.0640907 tokens over every tranche.
// Claimable in the active phases: 18,180,720.53204535 tokens.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::TokenAmount;
use serde::{Deserialize, Serialize};

/// Grand total ever to be distributed, in base units.
pub const TOTAL_ALLOCATED_UNITS: u128 = 35_921_361_064_090_700_000_000_000;

/// Portion of the total unlocked in the currently active phases, in base units.
pub const CLAIMABLE_FIRST_PHASES_UNITS: u128 = 18_180_720_532_045_350_000_000_000;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub total_allocated: TokenAmount,
    pub claimable_first_phases: TokenAmount,
}

impl Default for Allocation {
    fn default() -> Self {
        Self::new()
    }
}

impl Allocation {
    pub const fn new() -> Self {
        Self {
            total_allocated: TokenAmount::from_units(TOTAL_ALLOCATED_UNITS),
            claimable_first_phases: TokenAmount::from_units(CLAIMABLE_FIRST_PHASES_UNITS),
        }
    }

    /// Portion reserved for tranches that are not active yet.
    pub fn locked_future_phases(&self) -> TokenAmount {
        self.total_allocated
            .saturating_sub(self.claimable_first_phases)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.claimable_first_phases > self.total_allocated {
            return Err(format!(
                "claimable_first_phases ({}) exceeds total_allocated ({})",
                self.claimable_first_phases, self.total_allocated
            ));
        }
        Ok(())
    }
}
