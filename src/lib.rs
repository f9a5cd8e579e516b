// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-proteoform: proteogenomic graph hydration and browser layout
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`graph`] | typed entity graph from flattened query records |
//! | [`splicing`] | exon layout with abbreviated introns, RNA/genome/screen mapping |
//! | [`sequence`] | change descriptors and reference/alternate sequence alignment |
//! | [`psm`] | PSM histogram and peptide row packing |
//! | [`overview`] | gene binning by peptide counts |
//!
//! # Example
//!
//! ```
//! use ferro_proteoform::{hydrate_gene, SplicingAlignment, WireRecord};
//!
//! let record: WireRecord = serde_json::from_str(r#"{
//!     "nodes": [{"id": "G1", "bp_from": 100, "bp_to": 9050, "strand": "+"}],
//!     "relationships": [
//!         [{"id": "T1"}, "TRANSCRIPT_OF", {"id": "G1"}],
//!         [{"id": "T1"}, "INCLUDES_EXON", {"id": "E1", "bp_from": 100, "bp_to": 200}],
//!         [{"id": "T1"}, "INCLUDES_EXON", {"id": "E2", "bp_from": 5000, "bp_to": 5100}],
//!         [{"id": "T1"}, "INCLUDES_EXON", {"id": "E3", "bp_from": 9000, "bp_to": 9050}]
//!     ]
//! }"#).unwrap();
//!
//! let subgraph = hydrate_gene(&record).unwrap();
//! let gene = &subgraph.graph[subgraph.root];
//! let exons = subgraph.graph.gene_exon_spans(subgraph.root);
//!
//! let alignment = SplicingAlignment::new(&exons, gene.strand).unwrap();
//! assert_eq!(alignment.exon_bp(), 253);
//!
//! let x = alignment.genome_to_screen(150, 1000.0).unwrap();
//! assert_eq!(alignment.screen_to_genome(x, 1000.0), Some(150));
//! ```

pub mod cli;
pub mod config;
pub mod coords;
pub mod error;
pub mod graph;
pub mod intervals;
pub mod overview;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod psm;
pub mod search;
pub mod sequence;
pub mod splicing;
pub mod translate;

// Re-export commonly used types
pub use coords::Strand;
pub use error::{ErrorCode, FerroError};
pub use graph::{
    hydrate_gene, hydrate_proteoform, EntityGraph, GeneSubgraph, ProteoformSubgraph, QueryRecord,
    WireRecord,
};
pub use intervals::merge_overlapping_regions;
pub use psm::{pack_rows, psm_histogram, CategoryConfig};
pub use sequence::{align_sequences, AlignmentInput};
pub use splicing::{SplicedTranscript, SplicingAlignment};
pub use translate::translate;

/// Result type alias for ferro-proteoform operations
pub type Result<T> = std::result::Result<T, FerroError>;
