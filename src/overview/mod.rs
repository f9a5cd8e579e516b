//! Gene overview binning
//!
//! The overview plot places every gene on a grid by how many peptides were
//! found for it and how many of those are variant peptides. Each cell
//! collects the genes that fall into it.

use serde::Serialize;
use std::collections::HashSet;

use crate::graph::GeneSubgraph;
use crate::search::bin_index;

/// Peptide counts of one gene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneSummary {
    pub id: String,
    pub name: String,
    pub total_peptides: usize,
    pub variant_peptides: usize,
}

impl GeneSummary {
    /// Count the distinct peptides of a hydrated gene.
    ///
    /// A peptide is a variant peptide when it maps to a proteoform encoded
    /// by a haplotype.
    pub fn from_subgraph(subgraph: &GeneSubgraph) -> Self {
        let graph = &subgraph.graph;
        let gene = &graph[subgraph.root];

        let mut total = HashSet::new();
        let mut variant = HashSet::new();
        let proteoforms = gene
            .transcripts
            .iter()
            .flat_map(|&t| graph[t].proteoforms.iter().copied());
        for p in proteoforms {
            let proteoform = &graph[p];
            for m in &proteoform.matching_peptides {
                total.insert(m.peptide);
                if !proteoform.is_canonical() {
                    variant.insert(m.peptide);
                }
            }
        }

        Self {
            id: gene.id.clone(),
            name: gene.name.clone(),
            total_peptides: total.len(),
            variant_peptides: variant.len(),
        }
    }
}

/// One grid cell: `[x_from, x_to) × [y_from, y_to)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneBin {
    pub x_from: f64,
    pub x_to: f64,
    pub y_from: f64,
    pub y_to: f64,
    pub genes: Vec<GeneSummary>,
}

fn breaks(lim: (f64, f64), bins: usize) -> Vec<f64> {
    let step = (lim.1 - lim.0) / bins as f64;
    (0..=bins).map(|i| lim.0 + i as f64 * step).collect()
}

/// Bin genes by total (x) and variant (y) peptide counts.
///
/// Cells are returned row by row: the cell of x bin `i` and y bin `j` is at
/// `i + j * x_bins`. Counts outside the limits are clamped to the border
/// cells. Non-finite limits, or zero bins in either direction, give no
/// cells at all.
///
/// ```
/// use ferro_proteoform::overview::{bin_genes, GeneSummary};
///
/// let gene = GeneSummary {
///     id: "G1".to_string(),
///     name: "ABC".to_string(),
///     total_peptides: 7,
///     variant_peptides: 1,
/// };
/// let bins = bin_genes(&[gene], 2, 2, (0.0, 10.0), (0.0, 4.0));
/// assert_eq!(bins.len(), 4);
/// assert_eq!(bins[1].genes.len(), 1);
/// ```
pub fn bin_genes(
    genes: &[GeneSummary],
    x_bins: usize,
    y_bins: usize,
    x_lim: (f64, f64),
    y_lim: (f64, f64),
) -> Vec<GeneBin> {
    if x_bins == 0 || y_bins == 0 {
        return Vec::new();
    }
    let x_breaks = breaks(x_lim, x_bins);
    let y_breaks = breaks(y_lim, y_bins);
    if x_breaks.iter().chain(&y_breaks).any(|b| !b.is_finite()) {
        log::debug!("Non-finite overview limits {:?} x {:?}", x_lim, y_lim);
        return Vec::new();
    }

    let mut bins: Vec<GeneBin> = (0..x_bins * y_bins)
        .map(|idx| {
            let (x, y) = (idx % x_bins, idx / x_bins);
            GeneBin {
                x_from: x_breaks[x],
                x_to: x_breaks[x + 1],
                y_from: y_breaks[y],
                y_to: y_breaks[y + 1],
                genes: Vec::new(),
            }
        })
        .collect();

    for gene in genes {
        let (Some(x), Some(y)) = (
            bin_index(&x_breaks, &(gene.total_peptides as f64)),
            bin_index(&y_breaks, &(gene.variant_peptides as f64)),
        ) else {
            continue;
        };
        bins[x + y * x_bins].genes.push(gene.clone());
    }
    bins
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{hydrate_gene, TripleRecord};
    use serde_json::json;

    fn summary(id: &str, total: usize, variant: usize) -> GeneSummary {
        GeneSummary {
            id: id.to_string(),
            name: id.to_string(),
            total_peptides: total,
            variant_peptides: variant,
        }
    }

    #[test]
    fn test_cell_layout() {
        let bins = bin_genes(&[], 3, 2, (0.0, 30.0), (0.0, 10.0));
        assert_eq!(bins.len(), 6);
        assert_eq!((bins[4].x_from, bins[4].x_to), (10.0, 20.0));
        assert_eq!((bins[4].y_from, bins[4].y_to), (5.0, 10.0));
    }

    #[test]
    fn test_placement_and_clamping() {
        let genes = [
            summary("low", 0, 0),
            summary("edge", 10, 5),
            summary("high", 500, 50),
        ];
        let bins = bin_genes(&genes, 3, 2, (0.0, 30.0), (0.0, 10.0));
        let ids = |i: usize| -> Vec<&str> { bins[i].genes.iter().map(|g| g.id.as_str()).collect() };
        assert_eq!(ids(0), vec!["low"]);
        // a count on a break goes to the bin on its right
        assert_eq!(ids(4), vec!["edge"]);
        assert_eq!(ids(5), vec!["high"]);
    }

    #[test]
    fn test_non_finite_limits() {
        assert!(bin_genes(&[summary("g", 1, 1)], 2, 2, (0.0, f64::NAN), (0.0, 1.0)).is_empty());
        assert!(bin_genes(&[summary("g", 1, 1)], 2, 2, (0.0, f64::INFINITY), (0.0, 1.0)).is_empty());
        assert!(bin_genes(&[summary("g", 1, 1)], 0, 2, (0.0, 1.0), (0.0, 1.0)).is_empty());
    }

    #[test]
    fn test_summary_counts_distinct_peptides() {
        let record: TripleRecord = serde_json::from_value(json!({
            "nodes": [{"id": "G1", "name": "ABC", "bp_from": 1, "bp_to": 100, "strand": "+"}],
            "relationships": [
                [{"id": "T1"}, "TRANSCRIPT_OF", {"id": "G1"}],
                [{"id": "P0"}, "ENCODED_BY_TRANSCRIPT", {"id": "T1"}],
                [{"id": "P1"}, "ENCODED_BY_TRANSCRIPT", {"id": "T1"}],
                [{"id": "P1"}, "ENCODED_BY_HAPLOTYPE", {"id": "H1"}],
                [{"id": "A", "sequence": "MAK"}, "MAPS_TO", {"id": "P0"}],
                [{"id": "A"}, "MAPS_TO", {"id": "P1"}],
                [{"id": "B", "sequence": "TEP"}, "MAPS_TO", {"id": "P1"}],
            ],
            "rel_props": [{}, {}, {}, {}, {"position": 0}, {"position": 0}, {"position": 3}]
        }))
        .unwrap();
        let sub = hydrate_gene(&record).unwrap();
        let summary = GeneSummary::from_subgraph(&sub);
        assert_eq!(summary.name, "ABC");
        assert_eq!(summary.total_peptides, 2);
        assert_eq!(summary.variant_peptides, 2);
    }
}
