//! Integration tests for the generation pipeline
//!
//! These tests run the full stage chain over realistic plots and verify the
//! layout invariants:
//! - Footprints stay inside the setback boundary
//! - Accepted footprints never pairwise-overlap
//! - FAR stays within the ceiling plus tolerance
//! - Collapsed envelopes degrade to an empty layout, never a panic
//! - Peripheral rings and vastu bias land where requested

use geo::{Area, BooleanOps, Contains, Intersects, MultiPolygon};

use siteplan::core::config::EngineConfig;
use siteplan::core::types::{ParkingKind, Provenance, Typology, UtilityKind};
use siteplan::geometry::{inset_largest, polygon_from_vertices};
use siteplan::pipeline::{run_pipeline, GenerationParams};
use siteplan::plot::model::Plot;
use siteplan::plot::regulation::Regulation;

fn square_plot(side: f64, setback: f64) -> Plot {
    Plot::rectangular("test-plot", side, side, setback)
}

fn residential_regulation() -> Regulation {
    Regulation {
        floor_area_ratio: Some(2.0),
        max_ground_coverage: Some(0.5),
        max_height: Some(36.0),
        ..Default::default()
    }
}

// ============================================================================
// Core Layout Invariants
// ============================================================================

#[test]
fn basic_run_places_buildings_inside_the_setback() {
    let plot = square_plot(100.0, 4.0);
    let params = GenerationParams {
        typologies: vec![Typology::Point, Typology::Slab],
        min_floors: Some(5),
        max_floors: Some(12),
        seed: 7,
        ..Default::default()
    };
    let output = run_pipeline(
        &plot,
        Some(residential_regulation()),
        &params,
        &EngineConfig::default(),
    )
    .expect("pipeline run");

    assert!(!output.plot.buildings.is_empty(), "expected placements");

    let envelope = inset_largest(&plot.boundary, 4.0).unwrap();
    for building in &output.plot.buildings {
        assert!(
            envelope.contains(&building.footprint),
            "footprint escaped the setback boundary"
        );
        assert!(building.footprint_area() > 0.0);
        assert!(building.counted_floors() >= 1);
    }
}

#[test]
fn footprints_never_pairwise_overlap() {
    let plot = square_plot(140.0, 5.0);
    let params = GenerationParams {
        typologies: vec![
            Typology::HShaped,
            Typology::LShaped,
            Typology::Slab,
            Typology::Point,
        ],
        seed: 21,
        ..Default::default()
    };
    let output = run_pipeline(
        &plot,
        Some(residential_regulation()),
        &params,
        &EngineConfig::default(),
    )
    .expect("pipeline run");

    let footprints: Vec<_> = output
        .plot
        .buildings
        .iter()
        .map(|b| b.footprint.clone())
        .collect();
    for i in 0..footprints.len() {
        for j in (i + 1)..footprints.len() {
            let a = MultiPolygon(vec![footprints[i].clone()]);
            let b = MultiPolygon(vec![footprints[j].clone()]);
            let overlap: f64 = a.intersection(&b).0.iter().map(|p| p.unsigned_area()).sum();
            assert!(
                overlap < 1e-3,
                "footprints {i} and {j} overlap by {overlap} m2"
            );
        }
    }
}

#[test]
fn far_stays_within_the_ceiling_plus_tolerance() {
    let plot = square_plot(100.0, 4.0);
    let plot_area = plot.area();
    let params = GenerationParams {
        typologies: vec![Typology::Slab, Typology::Point],
        min_floors: Some(5),
        max_floors: Some(12),
        seed: 3,
        ..Default::default()
    };
    let output = run_pipeline(
        &plot,
        Some(residential_regulation()),
        &params,
        &EngineConfig::default(),
    )
    .expect("pipeline run");

    let gfa: f64 = output.plot.buildings.iter().map(|b| b.gross_floor_area()).sum();
    let far = gfa / plot_area;
    assert!(far <= 2.0 * 1.05 + 1e-9, "FAR {far} exceeds ceiling");
}

#[test]
fn service_floors_do_not_push_far_past_the_ceiling() {
    // Tight FAR with a tall floor request forces massing truncation; the
    // service floors attached afterwards must not re-inflate the ratio
    let plot = square_plot(100.0, 4.0);
    let plot_area = plot.area();
    let regulation = Regulation {
        floor_area_ratio: Some(0.5),
        max_ground_coverage: Some(0.5),
        max_height: Some(36.0),
        ..Default::default()
    };
    let params = GenerationParams {
        typologies: vec![Typology::Point],
        utilities: vec![UtilityKind::Hvac, UtilityKind::Electrical],
        min_floors: Some(10),
        seed: 19,
        ..Default::default()
    };
    let output = run_pipeline(&plot, Some(regulation), &params, &EngineConfig::default())
        .expect("pipeline run");

    assert!(!output.plot.buildings.is_empty());
    let gfa: f64 = output.plot.buildings.iter().map(|b| b.gross_floor_area()).sum();
    let far = gfa / plot_area;
    assert!(far <= 0.5 * 1.05 + 1e-9, "FAR {far} exceeds ceiling");
    for building in &output.plot.buildings {
        assert!(building
            .floors
            .iter()
            .any(|f| f.utility == Some(UtilityKind::Hvac)));
        assert!(building
            .floors
            .iter()
            .any(|f| f.utility == Some(UtilityKind::Electrical)));
    }
}

#[test]
fn thousand_square_metre_reference_plot_generates_cleanly() {
    // 1000 m2 square plot, 4 m setback, point typology, FAR 2.0 at 50%
    // coverage, floors between 5 and 12
    let plot = square_plot(31.6228, 4.0);
    let plot_area = plot.area();
    let params = GenerationParams {
        typologies: vec![Typology::Point],
        min_floors: Some(5),
        max_floors: Some(12),
        seed: 23,
        ..Default::default()
    };
    let output = run_pipeline(
        &plot,
        Some(residential_regulation()),
        &params,
        &EngineConfig::default(),
    )
    .expect("pipeline run");

    assert!(!output.plot.buildings.is_empty(), "expected placements");
    let envelope = inset_largest(&plot.boundary, 4.0).unwrap();
    for building in &output.plot.buildings {
        assert!(
            envelope.contains(&building.footprint),
            "footprint escaped the setback boundary"
        );
        let floors = building.counted_floors();
        assert!((1..=12).contains(&floors), "floor count {floors} out of range");
    }
    let gfa: f64 = output.plot.buildings.iter().map(|b| b.gross_floor_area()).sum();
    let far = gfa / plot_area;
    assert!(far <= 2.0 * 1.05 + 1e-9, "FAR {far} exceeds ceiling");
}

// ============================================================================
// Degradation Paths
// ============================================================================

#[test]
fn collapsed_setback_degrades_to_an_empty_layout() {
    // Setback wider than the half-extent: the inward buffer vanishes
    let plot = square_plot(20.0, 15.0);
    let params = GenerationParams {
        typologies: vec![Typology::Point],
        seed: 1,
        ..Default::default()
    };
    let output = run_pipeline(&plot, None, &params, &EngineConfig::default())
        .expect("collapse is not an error");
    assert!(output.plot.buildings.is_empty());
    assert!(output.plot.green_areas.is_empty());
    assert!(!output.notices.is_empty());
}

#[test]
fn boundaryless_plot_is_the_single_hard_failure() {
    let mut plot = square_plot(100.0, 4.0);
    plot.boundary = geo::Polygon::new(geo::LineString::new(vec![]), vec![]);
    let result = run_pipeline(
        &plot,
        None,
        &GenerationParams::default(),
        &EngineConfig::default(),
    );
    assert!(result.is_err());
}

#[test]
fn degenerate_boundary_never_panics() {
    // Thin triangular plot; buffering and booleans get ugly inputs
    let boundary =
        polygon_from_vertices(&[[0.0, 0.0], [60.0, 0.3], [30.0, 0.6]]).unwrap();
    let plot = Plot::new("sliver", boundary, 2.0);
    let params = GenerationParams {
        typologies: vec![Typology::Slab],
        seed: 9,
        ..Default::default()
    };
    let output = run_pipeline(&plot, None, &params, &EngineConfig::default())
        .expect("degenerate input degrades, never errors");
    assert!(output.plot.buildings.is_empty());
}

// ============================================================================
// Peripheral Zones
// ============================================================================

#[test]
fn peripheral_parking_and_road_rings_are_carved() {
    let plot = square_plot(120.0, 4.0);
    let params = GenerationParams {
        typologies: vec![Typology::Point],
        utilities: vec![UtilityKind::Roads],
        parking: vec![ParkingKind::Surface],
        seed: 11,
        ..Default::default()
    };
    let output = run_pipeline(
        &plot,
        Some(residential_regulation()),
        &params,
        &EngineConfig::default(),
    )
    .expect("pipeline run");

    let parking = output
        .plot
        .parking_areas
        .iter()
        .find(|p| p.peripheral)
        .expect("peripheral parking ring");
    assert!(parking.geometry.unsigned_area() > 0.0);
    assert!(parking.capacity > 0);

    let road = output
        .plot
        .utility_areas
        .iter()
        .find(|u| u.kind == UtilityKind::Roads && u.peripheral)
        .expect("peripheral road ring");
    assert!(road.geometry.unsigned_area() > 0.0);

    for building in &output.plot.buildings {
        assert!(
            !building.footprint.intersects(&parking.geometry),
            "building stands in the parking ring"
        );
        assert!(
            !building.footprint.intersects(&road.geometry),
            "building stands in the road ring"
        );
    }
}

// ============================================================================
// Open Space
// ============================================================================

#[test]
fn green_areas_avoid_buildings_and_carry_no_slivers() {
    let plot = square_plot(100.0, 4.0);
    let config = EngineConfig::default();
    let params = GenerationParams {
        typologies: vec![Typology::Slab, Typology::Point],
        seed: 5,
        ..Default::default()
    };
    let output = run_pipeline(&plot, Some(residential_regulation()), &params, &config)
        .expect("pipeline run");

    assert!(!output.plot.green_areas.is_empty());
    for green in &output.plot.green_areas {
        assert_eq!(green.provenance, Provenance::Generated);
        assert!(green.area >= config.sliver_min_area);
        for building in &output.plot.buildings {
            let a = MultiPolygon(vec![green.geometry.clone()]);
            let b = MultiPolygon(vec![building.footprint.clone()]);
            let overlap: f64 =
                a.intersection(&b).0.iter().map(|p| p.unsigned_area()).sum();
            assert!(overlap < 1e-3, "green area overlaps a footprint");
        }
    }
}

// ============================================================================
// Utilities and Parking Attachment
// ============================================================================

#[test]
fn internal_utilities_and_basements_attach_to_buildings() {
    let plot = square_plot(100.0, 4.0);
    let params = GenerationParams {
        typologies: vec![Typology::Point],
        utilities: vec![UtilityKind::Hvac, UtilityKind::Electrical],
        parking: vec![ParkingKind::Underground],
        seed: 13,
        ..Default::default()
    };
    let output = run_pipeline(
        &plot,
        Some(residential_regulation()),
        &params,
        &EngineConfig::default(),
    )
    .expect("pipeline run");

    assert!(!output.plot.buildings.is_empty());
    for building in &output.plot.buildings {
        assert!(building
            .floors
            .iter()
            .any(|f| f.utility == Some(UtilityKind::Hvac)));
        assert!(building
            .floors
            .iter()
            .any(|f| f.utility == Some(UtilityKind::Electrical)));
        assert_eq!(
            building
                .floors
                .iter()
                .filter(|f| f.parking == Some(ParkingKind::Underground))
                .count(),
            2
        );
    }
}

#[test]
fn external_utility_squares_avoid_buildings() {
    let plot = square_plot(120.0, 4.0);
    let params = GenerationParams {
        typologies: vec![Typology::Point],
        utilities: vec![
            UtilityKind::Stp,
            UtilityKind::Wtp,
            UtilityKind::WaterTank,
            UtilityKind::FireTank,
        ],
        seed: 17,
        ..Default::default()
    };
    let output = run_pipeline(
        &plot,
        Some(residential_regulation()),
        &params,
        &EngineConfig::default(),
    )
    .expect("pipeline run");

    for zone in output.plot.utility_areas.iter().filter(|u| !u.peripheral) {
        for building in &output.plot.buildings {
            let a = MultiPolygon(vec![zone.geometry.clone()]);
            let b = MultiPolygon(vec![building.footprint.clone()]);
            let overlap: f64 =
                a.intersection(&b).0.iter().map(|p| p.unsigned_area()).sum();
            assert!(overlap < 1e-3, "utility zone overlaps a building");
        }
    }
}

// ============================================================================
// Vastu Bias
// ============================================================================

#[test]
fn vastu_keeps_the_heaviest_typology_southwest_and_the_center_open() {
    let plot = square_plot(100.0, 4.0);
    let params = GenerationParams {
        typologies: vec![Typology::HShaped, Typology::Point],
        vastu: true,
        seed: 2,
        ..Default::default()
    };
    let output = run_pipeline(
        &plot,
        Some(residential_regulation()),
        &params,
        &EngineConfig::default(),
    )
    .expect("pipeline run");

    // Center ninth of the buildable bbox must stay clear of footprints
    let center = polygon_from_vertices(&[
        [34.6667, 34.6667],
        [65.3333, 34.6667],
        [65.3333, 65.3333],
        [34.6667, 65.3333],
    ])
    .unwrap();
    for building in &output.plot.buildings {
        let a = MultiPolygon(vec![building.footprint.clone()]);
        let b = MultiPolygon(vec![center.clone()]);
        let overlap: f64 = a.intersection(&b).0.iter().map(|p| p.unsigned_area()).sum();
        assert!(overlap < 1e-3, "footprint intrudes on the center sector");
    }

    // The heaviest typology leans into the southwest half
    if let Some(h) = output
        .plot
        .buildings
        .iter()
        .find(|b| b.typology == Typology::HShaped)
    {
        let c = h.centroid().expect("centroid");
        assert!(c.x() < 50.0 && c.y() < 50.0, "H building not southwest");
    }
}
