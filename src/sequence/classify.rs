//! Classification of a proteoform's changes by transcript region.

use serde::Serialize;

use super::change::{parse_cdna_changes, parse_protein_changes, CdnaChange, ProteinChange};
use crate::error::FerroError;
use crate::translate::STOP;

/// A cDNA change together with its protein consequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairedChange {
    pub cdna: CdnaChange,
    pub protein: ProteinChange,
}

/// Changes of one proteoform split by where they act.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeClassification {
    pub utr5: Vec<PairedChange>,
    pub utr3: Vec<PairedChange>,
    pub coding: Vec<PairedChange>,
    pub synonymous: Vec<PairedChange>,
}

/// Number of coding residues in `sequence` after `start_aa`: up to the
/// first stop, or to the end when there is none.
pub fn coding_length(sequence: &str, start_aa: usize) -> usize {
    let tail = sequence.get(start_aa..).unwrap_or("");
    tail.find(STOP).unwrap_or(tail.len())
}

/// Split the changes of a proteoform into 5' UTR, 3' UTR, coding and
/// synonymous groups.
///
/// Protein positions below zero lie in the 5' UTR and positions past the
/// coding length in the 3' UTR. The remaining changes are coding when
/// they alter the residues or shift the frame, synonymous otherwise.
pub fn classify_changes(
    cdna_changes: &str,
    protein_changes: &str,
    sequence: &str,
    start_aa: usize,
) -> Result<ChangeClassification, FerroError> {
    let cdna = parse_cdna_changes(cdna_changes)?;
    let protein = parse_protein_changes(protein_changes)?;
    if cdna.len() != protein.len() {
        return Err(FerroError::ChangeCountMismatch {
            cdna: cdna.len(),
            protein: protein.len(),
        });
    }

    let protein_length = coding_length(sequence, start_aa) as i64;
    let mut result = ChangeClassification::default();
    for (cdna, protein) in cdna.into_iter().zip(protein) {
        let group = if protein.ref_position < 0 {
            &mut result.utr5
        } else if protein.ref_position > protein_length {
            &mut result.utr3
        } else if !protein.is_synonymous() || protein.frameshift {
            &mut result.coding
        } else {
            &mut result.synonymous
        };
        group.push(PairedChange { cdna, protein });
    }
    Ok(result)
}
