// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PROPERTY-BASED TESTS: dropwatch-core
//
// Invariants of the snapshot arithmetic that must hold for ALL inputs.
// proptest generates thousands of random balances per property.
//
// Run: cargo test -p dropwatch-core --test prop_core
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use dropwatch_core::allocation::TOTAL_ALLOCATED_UNITS;
use dropwatch_core::{clamp01, derive, Allocation, SnapshotInputs, TokenAmount};
use proptest::prelude::*;

/// Balances up to twice the allocation, so over-funded contracts are covered.
fn arb_amount() -> impl Strategy<Value = TokenAmount> {
    (0u128..=TOTAL_ALLOCATED_UNITS * 2).prop_map(TokenAmount::from_units)
}

fn arb_settled() -> impl Strategy<Value = Option<TokenAmount>> {
    prop_oneof![
        4 => arb_amount().prop_map(Some),
        1 => Just(None),
    ]
}

fn arb_inputs() -> impl Strategy<Value = SnapshotInputs> {
    (
        arb_settled(),
        arb_settled(),
        arb_settled(),
        arb_settled(),
        prop::option::of(0.0f64..10_000.0),
    )
        .prop_map(|(hub, bonded, vault, locker, price)| SnapshotInputs {
            hub,
            bonded,
            vault,
            locker,
            price,
        })
}

fn arb_allocation() -> impl Strategy<Value = Allocation> {
    (0u128..=TOTAL_ALLOCATED_UNITS * 2)
        .prop_flat_map(|total| (Just(total), 0u128..=total))
        .prop_map(|(total, claimable)| Allocation {
            total_allocated: TokenAmount::from_units(total),
            claimable_first_phases: TokenAmount::from_units(claimable),
        })
}

// ─────────────────────────────────────────────────────────────────
// TOKEN AMOUNT PROPERTIES
// ─────────────────────────────────────────────────────────────────

proptest! {
    /// PROPERTY: clamped subtraction never goes below zero and is exact otherwise
    #[test]
    fn prop_saturating_sub_never_negative(a in any::<u128>(), b in any::<u128>()) {
        let diff = TokenAmount::from_units(a).saturating_sub(TokenAmount::from_units(b));
        if a >= b {
            prop_assert_eq!(diff.units(), a - b);
        } else {
            prop_assert_eq!(diff, TokenAmount::ZERO);
        }
    }

    /// PROPERTY: Display output parses back to the same amount
    #[test]
    fn prop_display_parses_back(units in any::<u128>()) {
        let a = TokenAmount::from_units(units);
        let parsed = TokenAmount::parse_decimal(&a.to_string());
        prop_assert_eq!(parsed, Ok(a));
    }

    /// PROPERTY: mul_ratio never exceeds the original amount
    #[test]
    fn prop_mul_ratio_bounded(a in arb_amount(), f in any::<f64>()) {
        prop_assert!(a.mul_ratio(f) <= a);
    }
}

// ─────────────────────────────────────────────────────────────────
// CLAMP PROPERTIES
// ─────────────────────────────────────────────────────────────────

proptest! {
    /// PROPERTY: clamp01 output always lies in [0, 1]
    #[test]
    fn prop_clamp01_in_unit_interval(x in any::<f64>()) {
        let c = clamp01(x);
        prop_assert!((0.0..=1.0).contains(&c), "clamp01({}) = {}", x, c);
        if x.is_nan() {
            prop_assert_eq!(c, 0.0);
        }
        if (0.0..=1.0).contains(&x) {
            prop_assert_eq!(c, x);
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// DERIVATION PROPERTIES
// ─────────────────────────────────────────────────────────────────

proptest! {
    /// PROPERTY: claimed in first phases never exceeds what those phases unlock
    #[test]
    fn prop_claimed_first_phases_bounded(inputs in arb_inputs(), allocation in arb_allocation()) {
        let s = derive(&inputs, &allocation);
        prop_assert!(s.claimed_in_first_phases <= allocation.claimable_first_phases);
        prop_assert!(s.claimed_in_first_phases <= s.total_claimed);
    }

    /// PROPERTY: claimed + left always adds back up to the allocation
    #[test]
    fn prop_claimed_plus_left_is_total(inputs in arb_inputs(), allocation in arb_allocation()) {
        let s = derive(&inputs, &allocation);
        prop_assert!(s.total_claimed <= allocation.total_allocated);
        prop_assert_eq!(
            s.total_claimed.saturating_add(s.left_total),
            allocation.total_allocated
        );
        prop_assert_eq!(
            s.claimed_in_first_phases.saturating_add(s.left_in_first_phases),
            allocation.claimable_first_phases
        );
    }

    /// PROPERTY: percentages are undefined or within [0, 1]
    #[test]
    fn prop_percentages_in_range(inputs in arb_inputs(), allocation in arb_allocation()) {
        let s = derive(&inputs, &allocation);
        for pct in [s.percent_claimed_all, s.percent_claimed_first_phases].into_iter().flatten() {
            prop_assert!((0.0..=1.0).contains(&pct), "percentage {} out of range", pct);
        }
        prop_assert!(s.projected_extra_liquidity <= s.left_in_first_phases);
    }

    /// PROPERTY: derivation is a pure function: identical inputs, bit-identical output
    #[test]
    fn prop_derive_idempotent(inputs in arb_inputs(), allocation in arb_allocation()) {
        let a = derive(&inputs, &allocation);
        let b = derive(&inputs, &allocation);
        prop_assert_eq!(&a, &b);
        let bits = |r: Option<f64>| r.map(f64::to_bits);
        prop_assert_eq!(bits(a.percent_claimed_all), bits(b.percent_claimed_all));
        prop_assert_eq!(bits(a.bonded_over_claimed), bits(b.bonded_over_claimed));
        prop_assert_eq!(bits(a.bridge_ratio), bits(b.bridge_ratio));
    }

    /// PROPERTY: a ratio is never defined while one of its balances is unsettled
    #[test]
    fn prop_unsettled_inputs_leave_ratios_undefined(
        inputs in arb_inputs(),
        allocation in arb_allocation(),
    ) {
        let s = derive(&inputs, &allocation);
        if inputs.vault.is_none() || inputs.locker.is_none() {
            prop_assert_eq!(s.percent_claimed_all, None);
            prop_assert_eq!(s.percent_claimed_first_phases, None);
            prop_assert_eq!(s.bonded_over_claimed, None);
        }
        if inputs.bonded.is_none() {
            prop_assert_eq!(s.bonded_over_claimed, None);
        }
        if inputs.hub.is_none() {
            prop_assert_eq!(s.bridge_ratio, None);
        }
    }
}
