//! Integration tests for PSM histograms and peptide rows

use ferro_proteoform::config::ProteoviewConfig;
use ferro_proteoform::graph::{hydrate_proteoform, ProteoformSubgraph, SerializedRecord};
use ferro_proteoform::psm::{pack_rows, psm_histogram, row_count, CategoryConfig, OTHER_GROUP};
use serde_json::{json, Value};

fn maps_to(id: &str, sequence: &str, class: &str, position: i64) -> Value {
    json!({"start": {"id": id, "sequence": sequence, "pep_class_2": class},
           "end": {"id": "P1"}, "label": "MAPS_TO", "properties": {"position": position}})
}

fn matched(peptide: &str, spectrum: &str, pep: f64, sample: &str, tissue: &str) -> [Value; 2] {
    [
        json!({"start": {"id": peptide}, "end": {"id": spectrum, "title": spectrum},
               "label": "MATCHED_TO", "properties": {"posterior_error_prob": pep}}),
        json!({"start": {"id": spectrum}, "end": {"id": sample, "tissue_name": tissue},
               "label": "MEASURED_FROM"}),
    ]
}

/// Peptide A (0..4) seen in brain twice, liver and kidney; peptide B (2..6)
/// seen once in liver.
fn tissue_subgraph() -> ProteoformSubgraph {
    let mut relationships = vec![
        maps_to("A", "MAKT", "protein-specific", 0),
        maps_to("B", "KTEP", "proteoform-specific", 2),
    ];
    for (peptide, spectrum, pep, sample, tissue) in [
        ("A", "S1", 0.01, "X1", "brain"),
        ("A", "S2", 0.02, "X2", "liver"),
        ("A", "S3", 0.03, "X3", "brain"),
        ("A", "S4", 0.04, "X4", "kidney"),
        ("B", "S5", 0.01, "X2", "liver"),
    ] {
        relationships.extend(matched(peptide, spectrum, pep, sample, tissue));
    }
    let record: SerializedRecord = serde_json::from_value(json!({
        "root": {"id": "P1", "sequence": "MAKTEPLGWQRST"},
        "relationships": relationships,
    }))
    .unwrap();
    hydrate_proteoform(&record).unwrap()
}

fn tissue_categories() -> CategoryConfig {
    ProteoviewConfig::parse(
        r##"
[psm]
categories = ["liver", "brain"]
colours = ["#1b9e77", "#d95f02"]
other_colour = "#999999"
highlight = "tissue"
"##,
    )
    .unwrap()
    .category_config()
}

// =============================================================================
// Histogram
// =============================================================================

#[test]
fn test_histogram_by_tissue() {
    let sub = tissue_subgraph();
    let matches = &sub.graph[sub.root].matching_peptides;
    let histogram = psm_histogram(&sub.graph, matches, &tissue_categories());

    assert_eq!(histogram.group_names, vec![OTHER_GROUP, "liver", "brain"]);
    assert_eq!(histogram.positions, vec![0, 0, 0, 2, 4, 4, 4, 6]);
    assert_eq!(histogram.counts[0], vec![1, 1, 1, 1, 0, 0, 0, 0]);
    assert_eq!(histogram.counts[1], vec![0, 1, 1, 2, 2, 1, 1, 0]);
    assert_eq!(histogram.counts[2], vec![0, 0, 2, 2, 2, 2, 0, 0]);
    assert_eq!(histogram.totals, vec![1, 1, 2, 2, 2, 2, 1, 0]);
    assert_eq!(histogram.max_count(), 2);
}

#[test]
fn test_histogram_ends_at_zero() {
    let sub = tissue_subgraph();
    let matches = &sub.graph[sub.root].matching_peptides;
    for config in [CategoryConfig::default(), tissue_categories()] {
        let histogram = psm_histogram(&sub.graph, matches, &config);
        assert_eq!(histogram.totals.last(), Some(&0));
        assert!(histogram.positions.windows(2).all(|w| w[0] <= w[1]));
    }
}

// =============================================================================
// Rows
// =============================================================================

#[test]
fn test_rows_by_tissue() {
    let sub = tissue_subgraph();
    let matches = &sub.graph[sub.root].matching_peptides;
    let config = ProteoviewConfig::default();
    let placed = pack_rows(
        &sub.graph,
        matches,
        &tissue_categories(),
        config.peptide_margin(),
    );

    let summary: Vec<(&str, &str, usize)> = placed
        .iter()
        .map(|p| (sub.graph[p.peptide].id.as_str(), p.colour.as_str(), p.row))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("A", "#d95f02", 0),
            ("A", "#1b9e77", 1),
            ("A", "#999999", 2),
            ("B", "#1b9e77", 3),
        ]
    );
    assert_eq!(row_count(&placed), 4);
}

#[test]
fn test_rows_never_overlap() {
    let sub = tissue_subgraph();
    let matches = &sub.graph[sub.root].matching_peptides;
    let margin = 2;
    let placed = pack_rows(&sub.graph, matches, &CategoryConfig::default(), margin);

    for (i, a) in placed.iter().enumerate() {
        for b in &placed[i + 1..] {
            if a.row == b.row {
                assert!(a.end() + margin < b.position || b.end() + margin < a.position);
            }
        }
    }
}
