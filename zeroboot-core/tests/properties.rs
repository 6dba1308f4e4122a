//! Property tests for configuration resolution

use proptest::prelude::*;

use zeroboot_core::clock::{XOSC_MAX_HZ, XOSC_MIN_HZ};
use zeroboot_core::error::DependentValue;
use zeroboot_core::{
    resolve, ChipFamily, ClockPlan, ClockSelectors, ClockSource, ConfigError,
    InexactMultiplierPolicy, ResolutionPolicy, SelectorSet, TARGET_MCK_HZ,
};

fn crystal_board(hz: Option<i64>, fast_startup: bool, fractional: bool) -> SelectorSet {
    let mut sel = SelectorSet::for_chip(ChipFamily::SamD21);
    sel.clock = ClockSelectors {
        crystal_hz: hz,
        ..ClockSelectors::new(ClockSource::CrystalHs)
    }
    .with_fast_startup(fast_startup)
    .with_fractional(fractional);
    sel
}

fn inexact_policy() -> impl Strategy<Value = InexactMultiplierPolicy> {
    prop_oneof![
        Just(InexactMultiplierPolicy::Warn),
        Just(InexactMultiplierPolicy::AutoFractional),
    ]
}

proptest! {
    #[test]
    fn crystal_hs_non_positive_always_fails(hz in i64::MIN..=0, fast in any::<bool>()) {
        let result = resolve(&crystal_board(Some(hz), fast, false), &ResolutionPolicy::default());
        prop_assert_eq!(
            result,
            Err(ConfigError::MissingDependentValue(DependentValue::CrystalFrequency))
        );
    }

    #[test]
    fn crystal_hs_in_range_always_resolves(
        hz in XOSC_MIN_HZ..=XOSC_MAX_HZ,
        fast in any::<bool>(),
        fractional in any::<bool>(),
        policy in inexact_policy(),
    ) {
        let policy = ResolutionPolicy::new().with_inexact_multiplier(policy);
        let result = resolve(&crystal_board(Some(hz as i64), fast, fractional), &policy);
        prop_assert!(result.is_ok(), "{} Hz failed: {:?}", hz, result);
    }

    #[test]
    fn pll_output_is_close_to_target(
        hz in XOSC_MIN_HZ..=XOSC_MAX_HZ,
        fast in any::<bool>(),
    ) {
        let resolution = resolve(&crystal_board(Some(hz as i64), fast, false), &ResolutionPolicy::default())
            .unwrap();
        let ClockPlan::Pll(derivation) = resolution.config.clock else {
            panic!("crystal must resolve to a PLL plan");
        };
        let error = (derivation.output_hz() as i64 - TARGET_MCK_HZ as i64).unsigned_abs();
        prop_assert!(error <= derivation.reference_hz as u64 / 2 + 2);
        prop_assert!((1..=4096).contains(&(derivation.ldr() as u32 + 1)));
        if !fast {
            // Without fast startup an inexact fit always uses the fine band
            prop_assert!(error * 1_000 <= TARGET_MCK_HZ as u64);
        }
    }

    #[test]
    fn resolution_is_deterministic(
        hz in XOSC_MIN_HZ..=XOSC_MAX_HZ,
        fast in any::<bool>(),
        fractional in any::<bool>(),
    ) {
        let sel = crystal_board(Some(hz as i64), fast, fractional);
        let policy = ResolutionPolicy::default();
        prop_assert_eq!(resolve(&sel, &policy), resolve(&sel, &policy));
    }
}

#[test]
fn crystal_hs_absent_fails() {
    assert_eq!(
        resolve(&crystal_board(None, false, false), &ResolutionPolicy::default()),
        Err(ConfigError::MissingDependentValue(
            DependentValue::CrystalFrequency
        ))
    );
}
