//! Variant-aware sequence handling
//!
//! - [`change`]: parsing of the `cDNA_changes` / `protein_changes` descriptor lists
//! - [`align`]: reconstruction and display alignment of alternate sequences
//! - [`classify`]: grouping changes into UTR, coding and synonymous
//! - [`split`]: splitting displayed residues around variant alleles

pub mod align;
pub mod change;
pub mod classify;
pub mod split;

pub use align::{align_sequences, AlignedSegment, Alignment, AlignmentInput, SegmentKind};
pub use change::{parse_cdna_changes, parse_protein_changes, CdnaChange, ProteinChange};
pub use classify::{classify_changes, ChangeClassification, PairedChange};
pub use split::{split_at_changes, AlleleSide};

/// Slice `seq[from..to]` with both bounds clamped into the string.
///
/// Returns an empty slice when the clamped range is empty or does not fall
/// on character boundaries.
pub(crate) fn clamped_slice(seq: &str, from: i64, to: i64) -> &str {
    let len = seq.len() as i64;
    let from = from.clamp(0, len);
    let to = to.clamp(from, len);
    seq.get(from as usize..to as usize).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_slice() {
        assert_eq!(clamped_slice("ACGT", 1, 3), "CG");
        assert_eq!(clamped_slice("ACGT", -5, 2), "AC");
        assert_eq!(clamped_slice("ACGT", 2, 99), "GT");
        assert_eq!(clamped_slice("ACGT", 3, 1), "");
        assert_eq!(clamped_slice("ACGT", 9, 12), "");
    }
}
