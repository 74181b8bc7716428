//! Pure derivation from the settled inputs to the snapshot statistics.
//!
//! Amount fields substitute zero for an unsettled balance so a partial
//! snapshot is always renderable. Ratio fields are `None` ("undefined")
//! when their denominator is zero, when the quotient is not finite, or when
//! a balance they depend on has not settled successfully.

use crate::{Allocation, TokenAmount};
use serde::Serialize;

/// `(numerator, denominator)` of the projection multiples shown next to
/// the projected extra liquidity: 1.5× and 2×.
pub const PROJECTION_MULTIPLES: [(u128, u128, &str); 2] = [(3, 2, "1.5x"), (2, 1, "2x")];

/// Successfully settled inputs. `None` means pending or failed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SnapshotInputs {
    pub hub: Option<TokenAmount>,
    pub bonded: Option<TokenAmount>,
    pub vault: Option<TokenAmount>,
    pub locker: Option<TokenAmount>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedSnapshot {
    pub allocation: Allocation,
    pub total_claimed: TokenAmount,
    pub bridged_to_destination: TokenAmount,
    pub claimed_in_first_phases: TokenAmount,
    pub left_in_first_phases: TokenAmount,
    pub left_total: TokenAmount,
    pub percent_claimed_first_phases: Option<f64>,
    pub percent_claimed_all: Option<f64>,
    pub bonded_over_claimed: Option<f64>,
    /// Unclamped bridged / claimed-in-first-phases heuristic.
    pub bridge_ratio: Option<f64>,
    pub projected_extra_liquidity: TokenAmount,
    pub price: Option<f64>,
}

/// Map any float into `[0, 1]`: NaN to 0, everything else to the nearest bound.
pub fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    x.clamp(0.0, 1.0)
}

pub fn derive(inputs: &SnapshotInputs, allocation: &Allocation) -> DerivedSnapshot {
    let zero = TokenAmount::ZERO;
    let hub = inputs.hub.unwrap_or(zero);
    let vault = inputs.vault.unwrap_or(zero);
    let locker = inputs.locker.unwrap_or(zero);

    let total = allocation.total_allocated;
    let claimable = allocation.claimable_first_phases;

    let total_claimed = total.saturating_sub(vault.saturating_add(locker));
    let bridged_to_destination = total.saturating_sub(hub);
    let claimed_in_first_phases = total_claimed.min(claimable);
    let left_in_first_phases = claimable.saturating_sub(total_claimed);
    let left_total = total.saturating_sub(total_claimed);

    let claimed_known = inputs.vault.is_some() && inputs.locker.is_some();

    let percent_claimed_first_phases = claimed_known
        .then(|| claimed_in_first_phases.ratio_to(claimable))
        .flatten();
    let percent_claimed_all = claimed_known
        .then(|| total_claimed.ratio_to(total))
        .flatten();
    let bonded_over_claimed = match inputs.bonded {
        Some(bonded) if claimed_known => bonded.ratio_to(total_claimed),
        _ => None,
    };
    let bridge_ratio = (claimed_known && inputs.hub.is_some())
        .then(|| bridged_to_destination.ratio_to(claimed_in_first_phases))
        .flatten();

    let projected_extra_liquidity =
        left_in_first_phases.mul_ratio(bridge_ratio.map_or(0.0, clamp01));

    DerivedSnapshot {
        allocation: *allocation,
        total_claimed,
        bridged_to_destination,
        claimed_in_first_phases,
        left_in_first_phases,
        left_total,
        percent_claimed_first_phases,
        percent_claimed_all,
        bonded_over_claimed,
        bridge_ratio,
        projected_extra_liquidity,
        price: inputs.price.filter(|p| p.is_finite()),
    }
}

impl DerivedSnapshot {
    /// Projected extra liquidity at each of [`PROJECTION_MULTIPLES`].
    pub fn projection_multiples(&self) -> [(&'static str, TokenAmount); 2] {
        PROJECTION_MULTIPLES
            .map(|(num, den, label)| (label, self.projected_extra_liquidity.scale(num, den)))
    }

    /// `amount × price`, undefined without a price.
    pub fn fiat_value(&self, amount: TokenAmount) -> Option<f64> {
        self.price
            .map(|p| amount.to_f64_tokens() * p)
            .filter(|v| v.is_finite())
    }
}
