mod common;

use approx::assert_abs_diff_eq;

use regenerax::model::BuildingCategory;
use regenerax::proposal::{InterventionKind, generate_proposal};

#[test]
fn green_roof_example() {
    let b = common::building("roof", 4000.0, 8, 0.5);
    let p = generate_proposal(&b, "c");
    let roof = p
        .interventions
        .iter()
        .find(|i| i.kind == InterventionKind::GreenRoof)
        .expect("green roof should be proposed");
    assert_abs_diff_eq!(roof.cost_estimate, 42500.0, epsilon = 1e-9);
    assert_eq!(roof.energy_reduction, Some(60.0));
    assert_eq!(roof.temperature_drop, Some(2.5));
    assert_abs_diff_eq!(roof.roi, 8.0, epsilon = 1e-9);
}

#[test]
fn fully_retrofitted_building_gets_nothing() {
    let p = generate_proposal(&common::fully_retrofitted(), "c");
    assert!(p.interventions.is_empty());
    assert_eq!(p.total_investment, 0.0);
    assert_eq!(p.total_savings, 0.0);
    assert_eq!(p.payback_period, None);
}

#[test]
fn residential_never_gets_passive_cooling() {
    let mut b = common::tech_park();
    b.category = BuildingCategory::Residential;
    let p = generate_proposal(&b, "c");
    assert!(
        p.interventions
            .iter()
            .all(|i| i.kind != InterventionKind::PassiveCooling)
    );
    assert_eq!(p.interventions.len(), 3);
}

#[test]
fn tall_buildings_never_get_solar() {
    let p = generate_proposal(&common::building("tower", 9000.0, 11, 0.7), "c");
    assert!(
        p.interventions
            .iter()
            .all(|i| i.kind != InterventionKind::SolarPanels)
    );

    let p = generate_proposal(&common::building("ten", 9000.0, 10, 0.7), "c");
    assert!(
        p.interventions
            .iter()
            .any(|i| i.kind == InterventionKind::SolarPanels)
    );
}

#[test]
fn existing_flags_suppress_matching_interventions() {
    let ds = common::bengaluru();
    let green_tower = ds
        .buildings
        .iter()
        .find(|b| b.id == "building-4")
        .expect("seeded");
    let p = generate_proposal(green_tower, "bengaluru-1");
    let kinds: Vec<InterventionKind> = p.interventions.iter().map(|i| i.kind).collect();
    // 15 floors rules out solar even without the flag.
    assert_eq!(
        kinds,
        [InterventionKind::GreenRoof, InterventionKind::PassiveCooling]
    );
}

#[test]
fn totals_are_consistent() {
    let p = generate_proposal(&common::tech_park(), "c");
    let investment: f64 = p.interventions.iter().map(|i| i.cost_estimate).sum();
    assert_abs_diff_eq!(p.total_investment, investment, epsilon = 1e-9);
    let savings: f64 = p.interventions.iter().map(|i| i.valued_savings()).sum();
    assert_abs_diff_eq!(p.total_savings, savings.round(), epsilon = 1e-9);
    assert!(p.payback_period.expect("savings are positive") > 0.0);
}
