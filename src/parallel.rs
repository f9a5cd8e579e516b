//! Parallel processing support for ferro-proteoform
//!
//! This module hydrates batches of independent query records across threads
//! using rayon. Enable with the `parallel` feature. Every record still owns
//! its own hydration state, so results equal those of the sequential
//! functions and keep input order.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "parallel")]
//! # fn main() {
//! use ferro_proteoform::graph::WireRecord;
//! use ferro_proteoform::parallel::hydrate_genes_parallel;
//!
//! let records: Vec<WireRecord> = serde_json::from_str("[]").unwrap();
//! let results = hydrate_genes_parallel(&records);
//! assert!(results.is_empty());
//! # }
//! # #[cfg(not(feature = "parallel"))]
//! # fn main() {}
//! ```

use rayon::prelude::*;

use crate::error::FerroError;
use crate::graph::{hydrate_gene, hydrate_proteoform, GeneSubgraph, ProteoformSubgraph, QueryRecord};
use crate::overview::GeneSummary;

/// Hydrate gene records in parallel
///
/// Returns a vector of results, one for each input record.
/// Order is preserved.
pub fn hydrate_genes_parallel<R: QueryRecord + Sync>(
    records: &[R],
) -> Vec<Result<GeneSubgraph, FerroError>> {
    records.par_iter().map(hydrate_gene).collect()
}

/// Hydrate proteoform records in parallel
///
/// Returns a vector of results, one for each input record.
/// Order is preserved.
pub fn hydrate_proteoforms_parallel<R: QueryRecord + Sync>(
    records: &[R],
) -> Vec<Result<ProteoformSubgraph, FerroError>> {
    records.par_iter().map(hydrate_proteoform).collect()
}

/// Hydrate gene records in parallel and summarise their peptide counts
///
/// Records that fail to hydrate are logged and skipped.
pub fn gene_summaries_parallel<R: QueryRecord + Sync>(records: &[R]) -> Vec<GeneSummary> {
    records
        .par_iter()
        .enumerate()
        .filter_map(|(idx, record)| match hydrate_gene(record) {
            Ok(subgraph) => Some(GeneSummary::from_subgraph(&subgraph)),
            Err(e) => {
                log::warn!("Skipping gene record {}: {}", idx, e);
                None
            }
        })
        .collect()
}

/// Statistics from parallel processing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParallelStats {
    /// Total records processed
    pub total: usize,
    /// Records hydrated
    pub success: usize,
    /// Records whose root could not be read
    pub errors: usize,
    /// Relationships dropped across all hydrated records
    pub dropped_relationships: usize,
}

impl ParallelStats {
    /// Tally the outcome of [`hydrate_genes_parallel`].
    pub fn from_results(results: &[Result<GeneSubgraph, FerroError>]) -> Self {
        results.iter().fold(Self::default(), |mut stats, result| {
            stats.total += 1;
            match result {
                Ok(subgraph) => {
                    stats.success += 1;
                    stats.dropped_relationships += subgraph.dropped_relationships;
                }
                Err(_) => stats.errors += 1,
            }
            stats
        })
    }

    /// Calculate success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{hydrate_genes, TripleRecord};
    use serde_json::json;

    fn gene_record(i: usize) -> TripleRecord {
        serde_json::from_value(json!({
            "nodes": [{"id": format!("G{}", i), "bp_from": 1, "bp_to": 1000, "strand": "+"}],
            "relationships": [
                [{"id": format!("T{}", i)}, "TRANSCRIPT_OF", {"id": format!("G{}", i)}],
                [{"id": format!("T{}", i)}, "INCLUDES_EXON", {"id": format!("E{}", i), "bp_from": 10, "bp_to": 90}],
                [{"id": format!("P{}", i)}, "ENCODED_BY_TRANSCRIPT", {"id": format!("T{}", i)}],
                [{"id": format!("A{}", i), "sequence": "MAK"}, "MAPS_TO", {"id": format!("P{}", i)}],
            ],
            "rel_props": [{}, {}, {}, {"position": 0}]
        }))
        .unwrap()
    }

    fn bad_record() -> TripleRecord {
        serde_json::from_value(json!({"nodes": [], "relationships": []})).unwrap()
    }

    #[test]
    fn test_matches_sequential() {
        let records: Vec<TripleRecord> = (0..50).map(gene_record).collect();
        let parallel: Vec<GeneSubgraph> = hydrate_genes_parallel(&records)
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(parallel, hydrate_genes(&records));
    }

    #[test]
    fn test_order_preserved() {
        let records: Vec<TripleRecord> = (0..100).map(gene_record).collect();
        let results = hydrate_genes_parallel(&records);
        for (i, result) in results.iter().enumerate() {
            let subgraph = result.as_ref().unwrap();
            assert_eq!(subgraph.graph[subgraph.root].id, format!("G{}", i));
        }
    }

    #[test]
    fn test_stats_and_summaries() {
        let records = vec![gene_record(0), bad_record(), gene_record(1)];
        let stats = ParallelStats::from_results(&hydrate_genes_parallel(&records));
        assert_eq!(stats.total, 3);
        assert_eq!(stats.success, 2);
        assert_eq!(stats.errors, 1);
        assert!((stats.success_rate() - 66.67).abs() < 0.01);

        let summaries = gene_summaries_parallel(&records);
        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.total_peptides == 1));
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<TripleRecord> = Vec::new();
        assert!(hydrate_genes_parallel(&records).is_empty());
        assert!(hydrate_proteoforms_parallel(&records).is_empty());
        assert_eq!(ParallelStats::from_results(&[]).success_rate(), 0.0);
    }
}
