// src/scenarios.rs
//! End-to-end Abläufe: Aufbau, Prüfung, Reparatur und Rekonstruktion.

use crate::error::PartitionError;
use crate::partition::{BuildConfig, Dataset, LabelSet, Partition, PartitionBuilder, PolygonId};
use crate::repair::{PriorityRanking, RepairConfig, RepairMethod};
use crate::validator::RegionKind;
use approx::assert_relative_eq;
use geo::{Polygon, polygon};

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
    polygon![(x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1)]
}

fn build(datasets: Vec<Dataset>, extent: Option<Polygon<f64>>) -> Partition {
    let mut builder = PartitionBuilder::new(BuildConfig::default());
    for dataset in datasets {
        builder = builder.add_dataset(dataset);
    }
    if let Some(extent) = extent {
        builder = builder.with_extent(extent);
    }
    builder.build().unwrap()
}

fn labels(partition: &Partition) -> Vec<LabelSet> {
    partition
        .mesh()
        .triangles()
        .iter()
        .map(|t| t.labels.clone())
        .collect()
}

fn area_of(partition: &Partition, id: PolygonId) -> f64 {
    partition.reconstruct().unwrap().get(id).unwrap().area()
}

/// Drei Datensätze mit Überlappungen und Lücken in einem gemeinsamen Extent
fn messy_partition() -> Partition {
    build(
        vec![
            Dataset::new("a").with_polygon(rect(0.0, 0.0, 1.0, 1.0)),
            Dataset::new("b").with_polygon(rect(0.95, 0.0, 2.0, 1.05)),
            Dataset::new("c").with_polygon(rect(0.0, 1.02, 2.0, 2.0)),
        ],
        Some(rect(0.0, 0.0, 2.0, 2.0)),
    )
}

fn all_methods() -> Vec<RepairConfig> {
    let ranking = PriorityRanking::new(["a", "b", "c"]);
    vec![
        RepairConfig::new(RepairMethod::RandomNeighbour),
        RepairConfig::new(RepairMethod::RandomNeighbour).with_seed(42),
        RepairConfig::new(RepairMethod::LongestBoundary),
        RepairConfig::new(RepairMethod::PriorityList).with_priority(ranking.clone()),
        RepairConfig::new(RepairMethod::EdgeMatching).with_priority(ranking.clone()),
        RepairConfig::new(RepairMethod::EdgeMatching)
            .with_priority(ranking)
            .with_max_split_distance(0.1),
    ]
}

#[test]
fn shared_edge_squares_are_valid_and_reconstruct_unchanged() {
    let partition = build(
        vec![
            Dataset::new("a").with_polygon(rect(0.0, 0.0, 1.0, 1.0)),
            Dataset::new("b").with_polygon(rect(1.0, 0.0, 2.0, 1.0)),
        ],
        None,
    );
    let classification = partition.classify();
    assert!(classification.is_valid);
    assert!(classification.regions.is_empty());

    let result = partition.reconstruct().unwrap();
    for (id, x0) in [(PolygonId::new(0, 0), 0.0), (PolygonId::new(1, 0), 1.0)] {
        let polygon = result.get(id).unwrap();
        assert_eq!(polygon.geometry.0.len(), 1);
        let part = &polygon.geometry.0[0];
        assert!(part.interiors().is_empty());
        assert_eq!(part.exterior().0.len(), 5);
        for corner in rect(x0, 0.0, x0 + 1.0, 1.0).exterior().coords() {
            assert!(part.exterior().coords().any(|c| c == corner));
        }
        assert_relative_eq!(polygon.area(), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn overlap_strip_forms_one_region() {
    let partition = build(
        vec![
            Dataset::new("a").with_polygon(rect(0.0, 0.0, 1.0, 1.0)),
            Dataset::new("b").with_polygon(rect(0.9, 0.0, 1.9, 1.0)),
        ],
        None,
    );
    let classification = partition.classify();
    assert!(!classification.is_valid);
    assert_eq!(classification.regions.len(), 1);
    assert_eq!(classification.regions[0].kind, RegionKind::Overlap);
    assert_relative_eq!(classification.regions[0].area, 0.1, epsilon = 1e-9);
}

#[test]
fn longest_boundary_prefers_longer_shared_edge() {
    // Der Streifen grenzt an A über 0.5 + 0.1, an B nur über 0.5
    let mut partition = build(
        vec![
            Dataset::new("a").with_polygon(rect(0.0, 0.0, 1.0, 1.0)),
            Dataset::new("b").with_polygon(rect(0.9, 0.0, 1.9, 0.5)),
        ],
        None,
    );
    let summary = partition
        .repair(&RepairConfig::new(RepairMethod::LongestBoundary))
        .unwrap();
    assert!(partition.is_valid());
    assert_eq!(summary.resolved_by_method, 1);
    assert_eq!(summary.fallback_passes, 0);
    assert_relative_eq!(area_of(&partition, PolygonId::new(0, 0)), 1.0, epsilon = 1e-9);
    assert_relative_eq!(area_of(&partition, PolygonId::new(1, 0)), 0.45, epsilon = 1e-9);
}

#[test]
fn longest_boundary_tie_falls_back_to_random_neighbour() {
    let mut partition = build(
        vec![
            Dataset::new("a").with_polygon(rect(0.0, 0.0, 1.0, 1.0)),
            Dataset::new("b").with_polygon(rect(0.9, 0.0, 1.9, 1.0)),
        ],
        None,
    );
    let summary = partition
        .repair(&RepairConfig::new(RepairMethod::LongestBoundary))
        .unwrap();
    assert!(partition.is_valid());
    assert_eq!(summary.resolved_by_method, 0);
    assert!(summary.resolved_by_fallback >= 1);
}

#[test]
fn priority_list_assigns_strip_regardless_of_geometry() {
    let mut partition = build(
        vec![
            Dataset::new("a").with_polygon(rect(0.0, 0.0, 1.0, 1.0)),
            Dataset::new("b").with_polygon(rect(0.9, 0.0, 1.9, 1.0)),
        ],
        None,
    );
    let config = RepairConfig::new(RepairMethod::PriorityList)
        .with_priority(PriorityRanking::new(["b", "a"]));
    partition.repair(&config).unwrap();
    assert!(partition.is_valid());
    assert_relative_eq!(area_of(&partition, PolygonId::new(0, 0)), 0.9, epsilon = 1e-9);
    assert_relative_eq!(area_of(&partition, PolygonId::new(1, 0)), 1.0, epsilon = 1e-9);
}

#[test]
fn priority_list_without_ranking_aborts_before_mutation() {
    let mut partition = build(
        vec![
            Dataset::new("a").with_polygon(rect(0.0, 0.0, 1.0, 1.0)),
            Dataset::new("b").with_polygon(rect(0.9, 0.0, 1.9, 1.0)),
        ],
        None,
    );
    let before = labels(&partition);
    let result = partition.repair(&RepairConfig::new(RepairMethod::PriorityList));
    assert!(matches!(
        result,
        Err(PartitionError::MissingPriorityInput { .. })
    ));
    assert_eq!(labels(&partition), before);
}

#[test]
fn unranked_candidate_falls_back_for_that_region_only() {
    let mut partition = build(
        vec![
            Dataset::new("a").with_polygon(rect(0.0, 0.0, 1.0, 1.0)),
            Dataset::new("b").with_polygon(rect(0.9, 0.0, 2.0, 1.0)),
            Dataset::new("c").with_polygon(rect(1.9, 0.0, 3.0, 1.0)),
        ],
        None,
    );
    assert_eq!(partition.classify().regions.len(), 2);
    let config = RepairConfig::new(RepairMethod::PriorityList)
        .with_priority(PriorityRanking::new(["a", "b"]));
    let summary = partition.repair(&config).unwrap();
    assert!(partition.is_valid());
    assert_eq!(summary.resolved_by_method, 1);
    assert_eq!(summary.resolved_by_fallback, 1);
    // Der gerankte Streifen geht vollständig an A
    assert_relative_eq!(area_of(&partition, PolygonId::new(0, 0)), 1.0, epsilon = 1e-9);
}

#[test]
fn gap_inside_extent_is_filled_by_random_neighbour() {
    let mut partition = build(
        vec![
            Dataset::new("a").with_polygon(rect(0.0, 0.0, 1.0, 1.0)),
            Dataset::new("b").with_polygon(rect(1.1, 0.0, 2.1, 1.0)),
        ],
        Some(rect(0.0, 0.0, 2.1, 1.0)),
    );
    let classification = partition.classify();
    assert_eq!(classification.regions.len(), 1);
    assert_eq!(classification.regions[0].kind, RegionKind::Gap);
    assert_relative_eq!(classification.regions[0].area, 0.1, epsilon = 1e-9);

    partition
        .repair(&RepairConfig::new(RepairMethod::RandomNeighbour))
        .unwrap();
    assert!(partition.is_valid());
    let result = partition.reconstruct().unwrap();
    assert_relative_eq!(result.total_area(), 2.1, epsilon = 1e-9);
}

#[test]
fn gap_without_extent_touching_hull_is_exterior() {
    let partition = build(
        vec![
            Dataset::new("a").with_polygon(rect(0.0, 0.0, 1.0, 1.0)),
            Dataset::new("b").with_polygon(rect(1.1, 0.0, 2.1, 1.0)),
        ],
        None,
    );
    assert!(partition.is_valid());
}

#[test]
fn edge_matching_splits_thin_overlap_along_midline() {
    let mut partition = build(
        vec![
            Dataset::new("a").with_polygon(rect(0.0, 0.0, 1.0, 1.0)),
            Dataset::new("b").with_polygon(rect(0.9, 0.0, 1.9, 1.0)),
        ],
        None,
    );
    let config = RepairConfig::new(RepairMethod::EdgeMatching)
        .with_priority(PriorityRanking::new(["a", "b"]))
        .with_max_split_distance(0.2);
    let summary = partition.repair(&config).unwrap();
    assert!(partition.is_valid());
    assert!(summary.split_edges > 0);
    assert_relative_eq!(area_of(&partition, PolygonId::new(0, 0)), 0.95, epsilon = 1e-9);
    assert_relative_eq!(area_of(&partition, PolygonId::new(1, 0)), 0.95, epsilon = 1e-9);
}

#[test]
fn edge_matching_without_split_uses_priority() {
    let mut partition = build(
        vec![
            Dataset::new("a").with_polygon(rect(0.0, 0.0, 1.0, 1.0)),
            Dataset::new("b").with_polygon(rect(0.9, 0.0, 1.9, 1.0)),
        ],
        None,
    );
    let config = RepairConfig::new(RepairMethod::EdgeMatching)
        .with_priority(PriorityRanking::new(["a", "b"]))
        .with_max_split_distance(-1.0);
    let summary = partition.repair(&config).unwrap();
    assert_eq!(summary.split_edges, 0);
    assert_relative_eq!(area_of(&partition, PolygonId::new(0, 0)), 1.0, epsilon = 1e-9);
}

#[test]
fn attribute_ranks_before_dataset_name() {
    let mut partition = build(
        vec![
            Dataset::new("a").with_attributed_polygon(rect(0.0, 0.0, 1.0, 1.0), "road"),
            Dataset::new("b").with_attributed_polygon(rect(0.9, 0.0, 1.9, 1.0), "parcel"),
        ],
        None,
    );
    let config = RepairConfig::new(RepairMethod::PriorityList)
        .with_priority(PriorityRanking::new(["a", "parcel", "road"]));
    partition.repair(&config).unwrap();
    assert_relative_eq!(area_of(&partition, PolygonId::new(1, 0)), 1.0, epsilon = 1e-9);
}

#[test]
fn mixed_region_falls_back_to_random_neighbour() {
    let mut partition = build(
        vec![
            Dataset::new("a").with_polygon(rect(0.0, 0.0, 1.0, 1.0)),
            Dataset::new("b").with_polygon(rect(1.0, 0.0, 2.0, 1.0)),
        ],
        None,
    );
    // Die beiden Dreiecke von B künstlich in Lücke und Überlappung verwandeln
    let a = PolygonId::new(0, 0);
    let b = PolygonId::new(1, 0);
    let owned_by_b = partition.mesh().triangles_of(b);
    assert_eq!(owned_by_b.len(), 2);
    partition.mesh_mut().triangle_mut(owned_by_b[0]).labels = LabelSet::new();
    partition.mesh_mut().triangle_mut(owned_by_b[1]).labels = [a, b].into_iter().collect();

    let classification = partition.classify();
    assert_eq!(classification.regions.len(), 1);
    assert_eq!(classification.regions[0].kind, RegionKind::Mixed);

    let summary = partition
        .repair(&RepairConfig::new(RepairMethod::LongestBoundary))
        .unwrap();
    assert!(partition.is_valid());
    assert_eq!(summary.resolved_by_method, 0);
    assert_eq!(summary.resolved_by_fallback, 1);
}

#[test]
fn every_method_yields_a_valid_partition() {
    for config in all_methods() {
        let mut partition = messy_partition();
        assert!(!partition.is_valid());
        partition.repair(&config).unwrap();
        assert!(partition.is_valid(), "{} left conflicts", config.method);
    }
}

#[test]
fn repair_is_idempotent() {
    for config in all_methods() {
        let mut partition = messy_partition();
        partition.repair(&config).unwrap();
        let repaired = labels(&partition);
        let summary = partition.repair(&config).unwrap();
        assert_eq!(summary.changed_triangles, 0);
        assert_eq!(labels(&partition), repaired);
    }
}

#[test]
fn repair_never_strips_unambiguous_owners() {
    for config in all_methods() {
        let mut partition = messy_partition();
        partition.repair(&config).unwrap();
        for triangle in partition.mesh().triangles() {
            if triangle.exterior {
                continue;
            }
            if let Some(owner) = triangle.original.sole() {
                assert_eq!(triangle.labels.sole(), Some(owner));
            }
        }
    }
}

#[test]
fn reconstruction_round_trips_to_a_valid_partition() {
    for config in all_methods() {
        let mut partition = messy_partition();
        partition.repair(&config).unwrap();
        let result = partition.reconstruct().unwrap();

        let mut dataset = Dataset::new("repaired");
        for polygon in result.polygons() {
            for part in &polygon.geometry {
                dataset = dataset.with_polygon(part.clone());
            }
        }
        let rebuilt = PartitionBuilder::new(BuildConfig::default())
            .add_dataset(dataset)
            .with_extent(rect(0.0, 0.0, 2.0, 2.0))
            .build()
            .unwrap();
        assert!(rebuilt.is_valid(), "{} does not round-trip", config.method);
    }
}

#[test]
fn parallel_and_sequential_repair_agree() {
    for config in all_methods() {
        let mut sequential = messy_partition();
        sequential.repair(&config.clone().with_parallel(false)).unwrap();
        let mut parallel = messy_partition();
        parallel.repair(&config.with_parallel(true)).unwrap();
        assert_eq!(labels(&sequential), labels(&parallel));
    }
}

#[test]
fn rounding_closes_digitizing_gap() {
    let datasets = || {
        vec![
            Dataset::new("a").with_polygon(rect(0.0, 0.0, 1.0, 1.0)),
            Dataset::new("b").with_polygon(rect(1.004, 0.0, 2.0, 1.0)),
        ]
    };
    let unrounded = build(datasets(), Some(rect(0.0, 0.0, 2.0, 1.0)));
    assert!(!unrounded.is_valid());

    let mut builder = PartitionBuilder::new(BuildConfig::new().with_rounding(-2))
        .with_extent(rect(0.0, 0.0, 2.0, 1.0));
    for dataset in datasets() {
        builder = builder.add_dataset(dataset);
    }
    assert!(builder.build().unwrap().is_valid());
}

#[test]
fn hole_touching_outer_ring_reconstructs_as_valid_polygon() {
    let triangle = polygon![(x: 1.5, y: 0.0), (x: 2.0, y: 1.0), (x: 1.0, y: 1.0)];
    let mut partition = build(
        vec![
            Dataset::new("a").with_polygon(rect(0.0, 0.0, 3.0, 3.0)),
            Dataset::new("b").with_polygon(triangle),
        ],
        None,
    );
    let config = RepairConfig::new(RepairMethod::PriorityList)
        .with_priority(PriorityRanking::new(["b", "a"]));
    partition.repair(&config).unwrap();

    let result = partition.reconstruct().unwrap();
    let shell = result.get(PolygonId::new(0, 0)).unwrap();
    assert_eq!(shell.geometry.0.len(), 1);
    assert_eq!(shell.geometry.0[0].interiors().len(), 1);
    assert_relative_eq!(shell.area(), 8.5, epsilon = 1e-9);

    let mut dataset = Dataset::new("repaired");
    for polygon in result.polygons() {
        for part in &polygon.geometry {
            dataset = dataset.with_polygon(part.clone());
        }
    }
    let rebuilt = PartitionBuilder::new(BuildConfig::default())
        .add_dataset(dataset)
        .build()
        .unwrap();
    assert!(rebuilt.is_valid());
}

#[test]
fn gap_without_owned_neighbour_is_incomplete() {
    // Der Extent liegt vollständig außerhalb aller Polygone
    let mut partition = build(
        vec![Dataset::new("a").with_polygon(rect(0.0, 0.0, 1.0, 1.0))],
        Some(rect(5.0, 5.0, 6.0, 6.0)),
    );
    let classification = partition.classify();
    assert_eq!(classification.regions.len(), 1);
    assert_eq!(classification.regions[0].kind, RegionKind::Gap);

    let result = partition.repair(&RepairConfig::new(RepairMethod::RandomNeighbour));
    assert!(matches!(
        result,
        Err(PartitionError::RepairIncomplete {
            remaining_regions: 1
        })
    ));
}

#[test]
fn unknown_label_fails_reconstruction() {
    let mut partition = build(
        vec![Dataset::new("a").with_polygon(rect(0.0, 0.0, 1.0, 1.0))],
        None,
    );
    let stray = PolygonId::new(7, 0);
    partition.mesh_mut().triangle_mut(0).labels = LabelSet::single(stray);

    match partition.reconstruct() {
        Err(PartitionError::DegenerateReconstruction { polygon, .. }) => {
            assert_eq!(polygon, stray);
        }
        Err(other) => panic!("expected DegenerateReconstruction, got {other}"),
        Ok(_) => panic!("expected DegenerateReconstruction, reconstruction succeeded"),
    }
}
