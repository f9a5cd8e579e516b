//! Translation of cDNA into one-letter protein sequence.
//!
//! Aligned cDNA strings carry `x` filler where the other sequence has an
//! insertion. Translation drops the filler and any trailing partial codon
//! before reading codons, so a segment cut from an aligned string translates
//! to the protein of the underlying sequence.
//!
//! # Example
//!
//! ```
//! use ferro_proteoform::translate::translate;
//!
//! assert_eq!(translate("ATGxxxGCTTAAG"), "MA*");
//! ```

pub mod codon;

pub use codon::{Base, Codon, CodonTable, STOP, UNKNOWN};

use std::sync::OnceLock;

/// Filler character used to pad aligned sequences.
pub const PADDING: char = 'x';

/// Codon table lookup over cDNA strings.
#[derive(Debug, Clone)]
pub struct Translator {
    table: CodonTable,
}

impl Translator {
    /// Create a translator over the given codon table.
    pub fn new(table: CodonTable) -> Self {
        Self { table }
    }

    /// Create a translator with the standard genetic code.
    pub fn standard() -> Self {
        Self::new(CodonTable::standard())
    }

    /// Translate a cDNA string from its first base.
    ///
    /// Padding is removed first; a trailing partial codon is ignored.
    /// Stop codons become `*` and unreadable codons become `X`.
    pub fn translate(&self, cdna: &str) -> String {
        let bases: Vec<u8> = cdna.bytes().filter(|&b| b != PADDING as u8).collect();
        bases
            .chunks_exact(3)
            .map(|chunk| self.translate_codon(chunk))
            .collect()
    }

    fn translate_codon(&self, bytes: &[u8]) -> char {
        Codon::from_bytes(bytes)
            .and_then(|codon| self.table.amino_acid_for(&codon))
            .unwrap_or(UNKNOWN)
    }

    /// Find the reading frame in which `cdna` encodes `protein`.
    ///
    /// Starting `prefix_codons` codons into the sequence, all three frames
    /// are compared residue by residue against `protein` until at most one
    /// frame still agrees. Returns `None` with a warning when no frame, or
    /// more than one frame, survives.
    pub fn detect_reading_frame(
        &self,
        cdna: &str,
        protein: &str,
        prefix_codons: usize,
    ) -> Option<u8> {
        let bases = cdna.as_bytes();
        let mut candidates = [true; 3];
        let mut start = prefix_codons * 3;

        for residue in protein.chars() {
            if candidates.iter().filter(|&&c| c).count() <= 1 {
                break;
            }
            for (frame, candidate) in candidates.iter_mut().enumerate() {
                let from = start + frame;
                let matches = bases
                    .get(from..from + 3)
                    .map(|codon| self.translate_codon(codon) == residue)
                    .unwrap_or(false);
                if !matches {
                    *candidate = false;
                }
            }
            start += 3;
        }

        let mut surviving = candidates.iter().enumerate().filter(|(_, c)| **c);
        match (surviving.next(), surviving.next()) {
            (Some((frame, _)), None) => Some(frame as u8),
            _ => {
                log::warn!(
                    "Reading frame could not be determined ({} candidate frames)",
                    candidates.iter().filter(|&&c| c).count()
                );
                None
            }
        }
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::standard()
    }
}

/// Translate with the standard genetic code.
pub fn translate(cdna: &str) -> String {
    static STANDARD: OnceLock<Translator> = OnceLock::new();
    STANDARD.get_or_init(Translator::standard).translate(cdna)
}
