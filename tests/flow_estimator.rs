//! 유량표 보간/외삽 회귀 테스트.
use approx::assert_relative_eq;
use steam_leak_impact::leak::{estimate_flow, FlowTable, FlowTableRow};

fn table(points: &[(f64, f64)]) -> FlowTable {
    FlowTable::from_rows(
        points
            .iter()
            .map(|&(diameter_mm, mass_flow_kg_h)| FlowTableRow {
                diameter_mm,
                mass_flow_kg_h,
            })
            .collect(),
    )
    .expect("valid table")
}

fn bundled_table() -> FlowTable {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/fugas_vapor.csv");
    FlowTable::load(std::path::Path::new(path)).expect("bundled table")
}

#[test]
fn midpoint_of_two_row_table() {
    let t = table(&[(10.0, 5.0), (20.0, 20.0)]);
    assert_relative_eq!(estimate_flow(&t, 15.0).unwrap(), 12.5);
}

#[test]
fn tabulated_diameters_return_exact_values() {
    let t = bundled_table();
    for row in t.rows() {
        assert_eq!(t.estimate_flow(row.diameter_mm).unwrap(), row.mass_flow_kg_h);
    }
}

#[test]
fn values_between_rows_lie_strictly_between() {
    let t = bundled_table();
    for pair in t.rows().windows(2) {
        let (a, b) = (pair[0], pair[1]);
        for frac in [0.1, 0.25, 0.5, 0.9] {
            let d = a.diameter_mm + frac * (b.diameter_mm - a.diameter_mm);
            let q = t.estimate_flow(d).unwrap();
            assert!(
                q > a.mass_flow_kg_h && q < b.mass_flow_kg_h,
                "d={d} q={q} between {a:?} and {b:?}"
            );
        }
    }
}

#[test]
fn extrapolation_follows_boundary_segment_slope() {
    // q = 3d + 1 구간 두 개, 끝 구간은 기울기가 다르다
    let t = table(&[(2.0, 7.0), (4.0, 13.0), (8.0, 33.0)]);
    // 아래쪽: 첫 구간 기울기 3
    assert_relative_eq!(t.estimate_flow(1.0).unwrap(), 4.0, epsilon = 1e-12);
    // 위쪽: 마지막 구간 기울기 5
    assert_relative_eq!(t.estimate_flow(10.0).unwrap(), 43.0, epsilon = 1e-12);
}

#[test]
fn linear_table_extends_analytically() {
    let t = table(&[(5.0, 10.0), (10.0, 20.0), (15.0, 30.0)]);
    for d in [0.5, 2.0, 17.5, 40.0] {
        assert_relative_eq!(t.estimate_flow(d).unwrap(), 2.0 * d, epsilon = 1e-9);
    }
}

#[test]
fn far_extrapolation_may_go_negative() {
    let t = table(&[(10.0, 5.0), (20.0, 20.0)]);
    assert_relative_eq!(t.estimate_flow(5.0).unwrap(), -2.5);
}

#[test]
fn unsorted_rows_give_same_estimates() {
    let sorted = table(&[(1.0, 2.0), (3.0, 18.0), (5.0, 49.0)]);
    let shuffled = table(&[(5.0, 49.0), (1.0, 2.0), (3.0, 18.0)]);
    assert_eq!(sorted, shuffled);
    assert_eq!(
        sorted.estimate_flow(2.2).unwrap(),
        shuffled.estimate_flow(2.2).unwrap()
    );
}
