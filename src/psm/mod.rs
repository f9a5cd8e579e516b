//! PSM aggregation
//!
//! Summarises the peptide evidence of one proteoform for display:
//!
//! | Output | Function | Shape |
//! |--------|----------|-------|
//! | Coverage histogram | [`psm_histogram`] | step function of PSM counts per group |
//! | Peptide layout | [`pack_rows`] | footprints packed into non-overlapping rows |
//!
//! Evidence is grouped either by peptide class or by an attribute of the
//! sample each spectrum came from, as set in [`CategoryConfig`].

pub mod category;
pub mod histogram;
pub mod rows;

pub use category::{Category, CategoryConfig, HighlightVariable, SampleAttribute, OTHER_GROUP};
pub use histogram::{psm_histogram, PsmHistogram};
pub use rows::{pack_rows, row_count, PlacedPeptide};
