//! 질량 → 에너지 → 비용 → TPE 환산 테스트.
use approx::assert_relative_eq;
use steam_leak_impact::leak::{compute_impact, ImpactResult, LeakConstants};

#[test]
fn zero_flow_gives_all_zero() {
    let c = LeakConstants::default();
    for hours in [0.0, 1.0, 720.0, 1e6] {
        assert_eq!(compute_impact(0.0, hours, &c).unwrap(), ImpactResult::default());
    }
}

#[test]
fn zero_duration_gives_all_zero() {
    let c = LeakConstants::default();
    for flow in [0.0, 12.5, 5_000.0] {
        assert_eq!(compute_impact(flow, 0.0, &c).unwrap(), ImpactResult::default());
    }
}

#[test]
fn outputs_scale_linearly_with_flow() {
    let c = LeakConstants::default();
    let base = compute_impact(37.0, 48.0, &c).unwrap();
    for k in [2.0, 0.5, 10.0] {
        let scaled = compute_impact(37.0 * k, 48.0, &c).unwrap();
        assert_relative_eq!(scaled.total_mass_kg, k * base.total_mass_kg, max_relative = 1e-12);
        assert_relative_eq!(scaled.energy_mj, k * base.energy_mj, max_relative = 1e-12);
        assert_relative_eq!(scaled.cost, k * base.cost, max_relative = 1e-12);
        assert_relative_eq!(
            scaled.intensity_day_mj_per_hl,
            k * base.intensity_day_mj_per_hl,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            scaled.intensity_month_mj_per_hl,
            k * base.intensity_month_mj_per_hl,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            scaled.intensity_year_mj_per_hl,
            k * base.intensity_year_mj_per_hl,
            max_relative = 1e-12
        );
    }
}

#[test]
fn reference_scenario_values() {
    // 12.5 kg/h × 10 h, 2.409 MJ/kg, 0.089 $/MJ
    let r = compute_impact(12.5, 10.0, &LeakConstants::default()).unwrap();
    assert_relative_eq!(r.total_mass_kg, 125.0);
    assert_relative_eq!(r.energy_mj, 301.125, max_relative = 1e-12);
    assert_relative_eq!(r.cost, 26.800_125, max_relative = 1e-12);
    assert_relative_eq!(r.intensity_day_mj_per_hl, 301.125 / 58_333.33, max_relative = 1e-12);
    assert_relative_eq!(r.intensity_day_mj_per_hl, 0.005162, epsilon = 1e-6);
    assert_relative_eq!(r.intensity_month_mj_per_hl, 301.125 / 1_750_000.0, max_relative = 1e-12);
    assert_relative_eq!(r.intensity_year_mj_per_hl, 301.125 / 21_000_000.0, max_relative = 1e-12);
}

#[test]
fn alternative_constants_are_honoured() {
    let c = LeakConstants {
        enthalpy_mj_per_kg: 2.0,
        cost_per_mj: 1.0,
        reference_volume_day_hl: 10.0,
        reference_volume_month_hl: 100.0,
        reference_volume_year_hl: 1000.0,
    };
    let r = compute_impact(5.0, 2.0, &c).unwrap();
    assert_eq!(r.energy_mj, 20.0);
    assert_eq!(r.cost, 20.0);
    assert_eq!(r.intensity_day_mj_per_hl, 2.0);
    assert_eq!(r.intensity_month_mj_per_hl, 0.2);
    assert_eq!(r.intensity_year_mj_per_hl, 0.02);
}
