//! Integration tests for change descriptors and sequence alignment

use ferro_proteoform::cli::{alignment_input, require_proteoform};
use ferro_proteoform::graph::{hydrate_gene, GeneSubgraph, TripleRecord};
use ferro_proteoform::sequence::{
    align_sequences, classify_changes, parse_cdna_changes, parse_protein_changes,
    split_at_changes, AlleleSide, SegmentKind,
};
use ferro_proteoform::{ErrorCode, FerroError};
use rstest::rstest;
use serde_json::json;

// 5' UTR GCCAT | ATG GCT AAA TGG TAA | 3' UTR CCGT
const REF_CDNA: &str = "GCCATATGGCTAAATGGTAACCGT";

fn gene_with_haplotype_proteoform() -> GeneSubgraph {
    let record: TripleRecord = serde_json::from_value(json!({
        "nodes": [{"id": "G1", "bp_from": 1, "bp_to": 24, "strand": "+"}],
        "relationships": [
            [{"id": "T1", "cDNA_sequence": REF_CDNA}, "TRANSCRIPT_OF", {"id": "G1"}],
            [{"id": "P0", "sequence": "MAKW*"}, "ENCODED_BY_TRANSCRIPT", {"id": "T1"}],
            [{"id": "P1", "sequence": "HMAEW*P", "cDNA_changes": "11:A>G",
              "protein_changes": "2:K>2:E", "reading_frame": 2, "start_aa": 1},
             "ENCODED_BY_TRANSCRIPT", {"id": "T1"}],
            [{"id": "P1"}, "ENCODED_BY_HAPLOTYPE", {"id": "H1"}],
        ]
    }))
    .unwrap();
    hydrate_gene(&record).unwrap()
}

// =============================================================================
// Descriptor parsing
// =============================================================================

#[rstest]
#[case::empty("", 0)]
#[case::dash("-", 0)]
#[case::single("312:G>A", 1)]
#[case::deletion("5:ACG>", 1)]
#[case::insertion("5:>TT", 1)]
#[case::several("12:A>G;40:CT>C;41:G>GA", 3)]
fn test_parse_cdna_lists(#[case] input: &str, #[case] count: usize) {
    assert_eq!(parse_cdna_changes(input).unwrap().len(), count);
}

#[rstest]
#[case::negative_position("-3:M>-3:L", -3, false)]
#[case::stop_gain("7:Q>7:*", 7, false)]
#[case::frameshift("45:K>46:R(+fs)", 45, true)]
fn test_parse_protein_entries(
    #[case] input: &str,
    #[case] ref_position: i64,
    #[case] frameshift: bool,
) {
    let changes = parse_protein_changes(input).unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].ref_position, ref_position);
    assert_eq!(changes[0].frameshift, frameshift);
    assert_eq!(changes[0].to_string(), input);
}

#[rstest]
#[case::missing_separator("12A>G", ErrorCode::UnexpectedChar)]
#[case::truncated("12:A", ErrorCode::UnexpectedEnd)]
#[case::bad_second_entry("12:A>G;x:C>T", ErrorCode::UnexpectedChar)]
fn test_parse_cdna_errors(#[case] input: &str, #[case] code: ErrorCode) {
    let err = parse_cdna_changes(input).unwrap_err();
    assert_eq!(err.code(), Some(code));
}

// =============================================================================
// Alignment from a hydrated graph
// =============================================================================

#[test]
fn test_align_haplotype_proteoform() {
    let sub = gene_with_haplotype_proteoform();
    let p1 = require_proteoform(&sub.graph, "P1").unwrap();
    let input = alignment_input(&sub.graph, p1).unwrap();
    let alignment = align_sequences(&input).unwrap();

    assert_eq!(alignment.mutated_cdna, "GCCATATGGCTGAATGGTAACCGT");
    assert_eq!(alignment.ref_cdna.len(), alignment.alt_cdna.len());

    let kinds: Vec<SegmentKind> = alignment.segments.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![SegmentKind::Utr5, SegmentKind::Morf, SegmentKind::Utr3]
    );
    let morf = &alignment.segments[1];
    assert_eq!((morf.ref_protein.as_str(), morf.alt_protein.as_str()), ("K", "E"));
    assert!(alignment
        .segments
        .windows(2)
        .all(|w| w[0].bp_to <= w[1].bp_to));
}

#[test]
fn test_align_canonical_proteoform_unchanged() {
    let sub = gene_with_haplotype_proteoform();
    let p0 = require_proteoform(&sub.graph, "P0").unwrap();
    let input = alignment_input(&sub.graph, p0).unwrap();
    let alignment = align_sequences(&input).unwrap();
    assert_eq!(alignment.mutated_cdna, REF_CDNA);
    assert!(alignment
        .segments
        .iter()
        .all(|s| s.kind != SegmentKind::Morf));
}

#[test]
fn test_align_rejects_non_ascii() {
    let sub = gene_with_haplotype_proteoform();
    let p1 = require_proteoform(&sub.graph, "P1").unwrap();
    let mut input = alignment_input(&sub.graph, p1).unwrap();
    input.alt_protein = "HMAÉW*P";
    assert!(matches!(
        align_sequences(&input),
        Err(FerroError::InvalidSequence { .. })
    ));
}

// =============================================================================
// Classification and splitting
// =============================================================================

#[test]
fn test_classify_hydrated_proteoform() {
    let sub = gene_with_haplotype_proteoform();
    let p1 = &sub.graph[require_proteoform(&sub.graph, "P1").unwrap()];
    let groups = classify_changes(
        &p1.cdna_changes,
        &p1.protein_changes,
        &p1.sequence,
        p1.start_aa as usize,
    )
    .unwrap();
    assert_eq!(groups.coding.len(), 1);
    assert!(groups.utr5.is_empty() && groups.utr3.is_empty() && groups.synonymous.is_empty());
    assert_eq!(groups.coding[0].cdna.location, 11);
}

#[test]
fn test_split_both_alleles() {
    let sub = gene_with_haplotype_proteoform();
    let p0 = &sub.graph[require_proteoform(&sub.graph, "P0").unwrap()];
    let p1 = &sub.graph[require_proteoform(&sub.graph, "P1").unwrap()];
    let changes = parse_protein_changes(&p1.protein_changes).unwrap();

    let reference = split_at_changes(&changes, AlleleSide::Reference, 0, &p0.sequence, 0);
    assert_eq!(reference, vec!["MA", "K", "W*"]);

    let alternate =
        split_at_changes(&changes, AlleleSide::Alternate, 0, &p1.sequence, p1.start_aa);
    assert_eq!(alternate, vec!["HMA", "E", "W*P"]);
    assert_eq!(alternate.concat(), p1.sequence);
}
