//! Carrying reference peptide evidence over to haplotype proteoforms.
//!
//! Reference peptides are only linked to canonical proteoforms in the
//! database. A haplotype proteoform shares every stretch of sequence that
//! its changes leave untouched, so reference peptides falling entirely into
//! such stretches are evidence for it too.

use super::model::{EntityGraph, PeptideMatch, ProteoformIdx};
use crate::error::FerroError;
use crate::sequence::parse_protein_changes;

/// A residue range `[from, to)` touched by a change.
#[derive(Debug, Clone, Copy)]
struct ChangedSpan {
    from: i64,
    to: i64,
    frameshift: bool,
}

impl ChangedSpan {
    fn overlaps(&self, pep_from: i64, pep_to: i64) -> bool {
        if self.frameshift {
            return self.from <= pep_to;
        }
        self.from < pep_to && pep_from < self.to.max(self.from + 1)
    }
}

/// Canonical peptides of `reference` that no non-synonymous change of
/// `alternate` overlaps, with positions moved into `alternate`'s frame.
///
/// A frameshift at or after the alternate's `start_aa` overlaps every
/// peptide from its position onwards.
pub fn reference_peptides_outside_changes(
    alternate: ProteoformIdx,
    reference: ProteoformIdx,
    graph: &EntityGraph,
) -> Result<Vec<PeptideMatch>, FerroError> {
    let alt = &graph[alternate];
    let changes: Vec<ChangedSpan> = parse_protein_changes(&alt.protein_changes)?
        .into_iter()
        .filter(|change| !change.is_synonymous() || change.frameshift)
        .map(|change| {
            let from = change.ref_position;
            let to = from + change.alternate.len() as i64;
            ChangedSpan {
                from,
                to,
                frameshift: change.frameshift && to >= alt.start_aa,
            }
        })
        .collect();

    Ok(graph[reference]
        .matching_peptides
        .iter()
        .filter(|m| {
            let pep_to = m.position + graph[m.peptide].length as i64;
            !changes.iter().any(|c| c.overlaps(m.position, pep_to))
        })
        .map(|m| PeptideMatch {
            peptide: m.peptide,
            position: m.position + alt.start_aa,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::hydrate::hydrate_gene;
    use crate::graph::record::TripleRecord;
    use serde_json::json;

    /// Canonical P0 with peptides at 0 (len 4), 10 (len 4) and 20 (len 5),
    /// plus haplotype proteoform P1 carrying `changes`.
    fn graph_with(changes: &str, start_aa: i64) -> (EntityGraph, ProteoformIdx, ProteoformIdx) {
        let record: TripleRecord = serde_json::from_value(json!({
            "nodes": [{"id": "G1", "bp_from": 1, "bp_to": 100, "strand": "+"}],
            "relationships": [
                [{"id": "A", "sequence": "MAKT"}, "MAPS_TO", {"id": "P0"}],
                [{"id": "B", "sequence": "EPLG"}, "MAPS_TO", {"id": "P0"}],
                [{"id": "C", "sequence": "WQRST"}, "MAPS_TO", {"id": "P0"}],
                [{"id": "P1", "protein_changes": changes, "start_aa": start_aa}, "ENCODED_BY_HAPLOTYPE", {"id": "H1"}],
            ],
            "rel_props": [{"position": 0}, {"position": 10}, {"position": 20}, {}]
        }))
        .unwrap();
        let sub = hydrate_gene(&record).unwrap();
        let p0 = sub.graph.find_proteoform("P0").unwrap();
        let p1 = sub.graph.find_proteoform("P1").unwrap();
        (sub.graph, p1, p0)
    }

    fn ids(graph: &EntityGraph, matches: &[PeptideMatch]) -> Vec<(String, i64)> {
        matches
            .iter()
            .map(|m| (graph[m.peptide].id.clone(), m.position))
            .collect()
    }

    #[test]
    fn test_change_inside_peptide_excludes_it() {
        let (graph, alt, reference) = graph_with("12:L>12:P", 0);
        let kept = reference_peptides_outside_changes(alt, reference, &graph).unwrap();
        assert_eq!(ids(&graph, &kept), vec![("A".into(), 0), ("C".into(), 20)]);
    }

    #[test]
    fn test_synonymous_ignored() {
        let (graph, alt, reference) = graph_with("12:L>12:L", 0);
        let kept = reference_peptides_outside_changes(alt, reference, &graph).unwrap();
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_frameshift_excludes_downstream() {
        let (graph, alt, reference) = graph_with("8:K>8:KX(+fs)", 0);
        let kept = reference_peptides_outside_changes(alt, reference, &graph).unwrap();
        assert_eq!(ids(&graph, &kept), vec![("A".into(), 0)]);
    }

    #[test]
    fn test_positions_shifted_by_start() {
        let (graph, alt, reference) = graph_with("-", 3);
        let kept = reference_peptides_outside_changes(alt, reference, &graph).unwrap();
        let positions: Vec<i64> = kept.iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![3, 13, 23]);
    }

    #[test]
    fn test_malformed_changes() {
        let (graph, alt, reference) = graph_with("12:L", 0);
        assert!(reference_peptides_outside_changes(alt, reference, &graph).is_err());
    }
}
