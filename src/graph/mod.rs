//! Graph hydration
//!
//! Graph queries return each subgraph flattened into a list of nodes and
//! relationships. This module turns one such record into an
//! [`EntityGraph`]: a set of typed tables whose entities refer to each
//! other through index handles.
//!
//! | Relationship | Start → End | Edge properties |
//! |--------------|-------------|-----------------|
//! | `TRANSCRIPT_OF` | Transcript → Gene | |
//! | `VARIANT_MAPS_TO` | Variant → Gene | |
//! | `INCLUDES_EXON` | Transcript → Exon | |
//! | `INCLUDES_ALT_ALLELE` | Haplotype → Variant | `var_order` |
//! | `HAPLO_FORM_OF` | Haplotype → Transcript | `frequency` |
//! | `ENCODED_BY_HAPLOTYPE` | Proteoform → Haplotype | |
//! | `ENCODED_BY_TRANSCRIPT` | Proteoform → Transcript | |
//! | `MAPS_TO` | Peptide → Proteoform | `position` |
//! | `MATCHED_TO` | Peptide → Spectrum | `posterior_error_prob`, `q_value`, `rt_abs_error`, `spectra_angular_similarity`, `USI` |
//! | `MEASURED_FROM` | Spectrum → Sample | |
//!
//! # Example
//!
//! ```
//! use ferro_proteoform::graph::{hydrate_gene, WireRecord};
//!
//! let record: WireRecord = serde_json::from_str(r#"{
//!     "nodes": [{"id": "G1", "bp_from": 100, "bp_to": 900, "strand": "+"}],
//!     "relationships": [[{"id": "T1"}, "TRANSCRIPT_OF", {"id": "G1"}]]
//! }"#).unwrap();
//!
//! let subgraph = hydrate_gene(&record).unwrap();
//! let gene = &subgraph.graph[subgraph.root];
//! assert_eq!(gene.transcripts.len(), 1);
//! ```

pub mod evidence;
pub mod hydrate;
pub mod model;
pub mod node;
pub mod record;

pub use evidence::reference_peptides_outside_changes;
pub use hydrate::{
    hydrate_gene, hydrate_genes, hydrate_proteoform, hydrate_proteoforms, GeneSubgraph,
    ProteoformSubgraph,
};
pub use model::{
    EntityGraph, Exon, ExonIdx, Gene, GeneIdx, Haplotype, HaplotypeIdx, Peptide, PeptideIdx,
    PeptideMatch, Proteoform, ProteoformIdx, Psm, Sample, SampleIdx, Spectrum, SpectrumIdx,
    Transcript, TranscriptIdx, Variant, VariantIdx, VariantType,
};
pub use node::FromNode;
pub use record::{
    QueryRecord, Relationship, SerializedRecord, SerializedRelationship, TripleRecord, WireRecord,
};
