//! Reference/alternate sequence alignment
//!
//! Reconstructs the alternate cDNA of a proteoform from its change lists and
//! lines it up against the reference for display.
//!
//! Coordinates:
//!
//! | Value           | Coordinate system                                      |
//! |-----------------|--------------------------------------------------------|
//! | change location | alternate cDNA, after all earlier changes are applied  |
//! | `ref_loc`       | reference cDNA                                         |
//! | `bp_from/bp_to` | alternate cDNA, half-open                              |
//! | alignment column| index into the `x`-padded strings, shared by both      |
//!
//! The alternate start codon sits at `utr_codons * 3 + reading_frame`.
//! Every indel shifts the reference coordinate of later changes by its
//! length difference; indels upstream of the start codon also shift the
//! reference reading frame.

use serde::Serialize;

use super::change::{parse_cdna_changes, parse_protein_changes};
use super::clamped_slice;
use crate::error::FerroError;
use crate::translate::{translate, PADDING};

/// Region of the transcript a segment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SegmentKind {
    #[serde(rename = "UTR_5")]
    Utr5,
    #[serde(rename = "mORF")]
    Morf,
    #[serde(rename = "UTR_3")]
    Utr3,
}

/// Matched reference/alternate stretch with its translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignedSegment {
    pub kind: SegmentKind,
    pub ref_cdna: String,
    pub alt_cdna: String,
    pub ref_protein: String,
    pub alt_protein: String,
    /// Start of the segment in reference cDNA coordinates
    pub ref_loc: usize,
    /// Start of the segment in alternate cDNA coordinates
    pub bp_from: usize,
    /// End (exclusive) of the segment in alternate cDNA coordinates
    pub bp_to: usize,
}

/// Everything needed to align one proteoform against its transcript.
#[derive(Debug, Clone, Copy)]
pub struct AlignmentInput<'a> {
    pub ref_cdna: &'a str,
    pub ref_protein: &'a str,
    pub alt_protein: &'a str,
    pub cdna_changes: &'a str,
    pub protein_changes: &'a str,
    pub reading_frame: usize,
    pub utr_codons: usize,
}

/// Result of [`align_sequences`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alignment {
    /// Alternate cDNA with every change applied
    pub mutated_cdna: String,
    /// Reference cDNA padded with `x` opposite insertions
    pub ref_cdna: String,
    /// Alternate cDNA padded with `x` opposite deletions
    pub alt_cdna: String,
    pub ref_protein: String,
    pub alt_protein: String,
    /// Segments sorted by `bp_to`
    pub segments: Vec<AlignedSegment>,
}

/// Codon-aligned window `[from, to)` covering `len` bases at `loc`.
fn codon_window(loc: i64, len: i64, frame: i64) -> (i64, i64) {
    let from = (loc - frame).div_euclid(3) * 3 + frame;
    let to = -(-(loc + len - frame)).div_euclid(3) * 3 + frame;
    (from, to)
}

fn to_index(value: i64) -> usize {
    value.max(0) as usize
}

fn padding(n: usize) -> String {
    std::iter::repeat(PADDING).take(n).collect()
}

fn morf_segment(
    ref_cdna: &str,
    alt_cdna: &str,
    (ref_from, ref_to): (i64, i64),
    (alt_from, alt_to): (i64, i64),
    ref_exhausted: bool,
) -> AlignedSegment {
    let ref_window = clamped_slice(ref_cdna, ref_from, ref_to);
    let alt_window = clamped_slice(alt_cdna, alt_from, alt_to);
    AlignedSegment {
        kind: SegmentKind::Morf,
        ref_cdna: ref_window.to_string(),
        alt_cdna: alt_window.to_string(),
        ref_protein: if ref_exhausted {
            "-".to_string()
        } else {
            translate(ref_window)
        },
        alt_protein: translate(alt_window),
        ref_loc: to_index(ref_from),
        bp_from: to_index(alt_from),
        bp_to: to_index(alt_to),
    }
}

/// Align a proteoform's alternate sequence against the reference.
///
/// Fails as a whole on malformed descriptors, mismatched change lists,
/// non-ASCII input, or a change that runs past the end of the sequence.
///
/// # Example
///
/// ```
/// use ferro_proteoform::sequence::{align_sequences, AlignmentInput};
///
/// let input = AlignmentInput {
///     ref_cdna: "GCCATATGGCTAAATGGTAACCGT",
///     ref_protein: "MAKW*",
///     alt_protein: "HMAEW*P",
///     cdna_changes: "11:A>G",
///     protein_changes: "2:K>2:E",
///     reading_frame: 2,
///     utr_codons: 1,
/// };
/// let alignment = align_sequences(&input).unwrap();
/// assert_eq!(alignment.mutated_cdna, "GCCATATGGCTGAATGGTAACCGT");
/// assert_eq!(alignment.segments[1].alt_protein, "E");
/// ```
pub fn align_sequences(input: &AlignmentInput<'_>) -> Result<Alignment, FerroError> {
    for (name, seq) in [
        ("reference cDNA", input.ref_cdna),
        ("reference protein", input.ref_protein),
        ("alternate protein", input.alt_protein),
    ] {
        if !seq.is_ascii() {
            return Err(FerroError::InvalidSequence {
                msg: format!("{} contains non-ASCII characters", name),
            });
        }
    }

    let cdna_changes = parse_cdna_changes(input.cdna_changes)?;
    let protein_changes = parse_protein_changes(input.protein_changes)?;
    if cdna_changes.len() != protein_changes.len() {
        return Err(FerroError::ChangeCountMismatch {
            cdna: cdna_changes.len(),
            protein: protein_changes.len(),
        });
    }

    let frame = input.reading_frame as i64;
    let utr_codons = input.utr_codons as i64;
    let alt_start = utr_codons * 3 + frame;
    let ref_protein_len = input.ref_protein.len() as i64;

    let mut mutated = input.ref_cdna.to_string();
    let mut aligned_ref = input.ref_cdna.to_string();
    let mut aligned_alt = input.ref_cdna.to_string();
    let mut utr_shift = 0i64;
    let mut morf_shift = 0i64;
    // x characters written into aligned_alt so far
    let mut alt_padding = 0usize;
    let mut segments: Vec<AlignedSegment> = Vec::new();

    for (change, protein) in cdna_changes.iter().zip(&protein_changes) {
        let loc = change.location;
        let ref_len = change.reference.len();
        if loc + ref_len > mutated.len() {
            return Err(FerroError::InvalidCoordinates {
                msg: format!(
                    "change {} runs past the end of a {} bp sequence",
                    change,
                    mutated.len()
                ),
            });
        }
        let delta = change.length_delta();

        mutated.replace_range(loc..loc + ref_len, &change.alternate);

        let column = loc + alt_padding;
        let mut replacement = change.alternate.clone();
        if delta < 0 {
            replacement.push_str(&padding(delta.unsigned_abs() as usize));
            alt_padding += delta.unsigned_abs() as usize;
        } else if delta > 0 {
            aligned_ref.insert_str(column + ref_len, &padding(delta as usize));
        }
        aligned_alt.replace_range(column..column + ref_len, &replacement);

        let loc = loc as i64;
        if loc < alt_start {
            utr_shift += delta;
            continue;
        }

        let loc_ref = loc - utr_shift - morf_shift;
        let ref_frame = (frame - utr_shift).rem_euclid(3);
        let span = change.span() as i64;
        let ref_window = codon_window(loc_ref, span, ref_frame);
        let alt_window = codon_window(loc, span, frame);

        match segments.last_mut() {
            Some(last) if alt_window.0 <= last.bp_to as i64 => {
                let ref_exhausted = last.ref_protein == "-";
                // union with the previous reference window
                let ref_to = (last.ref_loc + last.ref_cdna.len()) as i64;
                *last = morf_segment(
                    input.ref_cdna,
                    &mutated,
                    (last.ref_loc as i64, ref_window.1.max(ref_to)),
                    (last.bp_from as i64, alt_window.1.max(last.bp_to as i64)),
                    ref_exhausted,
                );
            }
            _ => {
                let ref_exhausted = protein.ref_position >= ref_protein_len + utr_codons;
                segments.push(morf_segment(
                    input.ref_cdna,
                    &mutated,
                    ref_window,
                    alt_window,
                    ref_exhausted,
                ));
            }
        }

        morf_shift += delta;
    }

    let ref_start = alt_start - utr_shift;
    segments.push(AlignedSegment {
        kind: SegmentKind::Utr5,
        ref_cdna: clamped_slice(input.ref_cdna, 0, ref_start).to_string(),
        alt_cdna: clamped_slice(&mutated, 0, alt_start).to_string(),
        ref_protein: "-".to_string(),
        alt_protein: clamped_slice(input.alt_protein, 0, utr_codons).to_string(),
        ref_loc: 0,
        bp_from: 0,
        bp_to: to_index(alt_start.max(ref_start)),
    });

    let ref_cds_end = ref_start + 3 * ref_protein_len;
    let alt_cds_end = alt_start + 3 * ref_protein_len + morf_shift;
    let alt_utr3_residue = utr_codons + ref_protein_len + morf_shift.div_euclid(3);
    segments.push(AlignedSegment {
        kind: SegmentKind::Utr3,
        ref_cdna: clamped_slice(input.ref_cdna, ref_cds_end, i64::MAX).to_string(),
        alt_cdna: clamped_slice(&mutated, alt_cds_end, i64::MAX).to_string(),
        ref_protein: "-".to_string(),
        alt_protein: clamped_slice(input.alt_protein, alt_utr3_residue, i64::MAX).to_string(),
        ref_loc: to_index(ref_cds_end),
        bp_from: to_index(alt_cds_end),
        bp_to: mutated.len(),
    });

    segments.sort_by_key(|segment| segment.bp_to);

    Ok(Alignment {
        mutated_cdna: mutated,
        ref_cdna: aligned_ref,
        alt_cdna: aligned_alt,
        ref_protein: input.ref_protein.to_string(),
        alt_protein: input.alt_protein.to_string(),
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 5' UTR GCCAT | ATG GCT AAA TGG TAA | 3' UTR CCGT
    const REF_CDNA: &str = "GCCATATGGCTAAATGGTAACCGT";
    const REF_PROTEIN: &str = "MAKW*";

    fn input<'a>(
        cdna_changes: &'a str,
        protein_changes: &'a str,
        alt_protein: &'a str,
    ) -> AlignmentInput<'a> {
        AlignmentInput {
            ref_cdna: REF_CDNA,
            ref_protein: REF_PROTEIN,
            alt_protein,
            cdna_changes,
            protein_changes,
            reading_frame: 2,
            utr_codons: 1,
        }
    }

    fn strip(s: &str) -> String {
        s.chars().filter(|&c| c != PADDING).collect()
    }

    #[test]
    fn test_codon_window() {
        assert_eq!(codon_window(11, 1, 2), (11, 14));
        assert_eq!(codon_window(12, 1, 2), (11, 14));
        assert_eq!(codon_window(13, 2, 2), (11, 17));
        assert_eq!(codon_window(3, 1, 0), (3, 6));
    }

    #[test]
    fn test_align_snp() {
        let alignment = align_sequences(&input("11:A>G", "2:K>2:E", "HMAEW*P")).unwrap();

        assert_eq!(alignment.mutated_cdna, "GCCATATGGCTGAATGGTAACCGT");
        assert_eq!(alignment.ref_cdna, REF_CDNA);
        assert_eq!(alignment.alt_cdna, alignment.mutated_cdna);

        let kinds: Vec<_> = alignment.segments.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![SegmentKind::Utr5, SegmentKind::Morf, SegmentKind::Utr3]
        );

        let utr5 = &alignment.segments[0];
        assert_eq!(utr5.ref_cdna, "GCCAT");
        assert_eq!(utr5.alt_protein, "H");
        assert_eq!(utr5.ref_protein, "-");
        assert_eq!(utr5.bp_to, 5);

        let morf = &alignment.segments[1];
        assert_eq!(morf.ref_cdna, "AAA");
        assert_eq!(morf.alt_cdna, "GAA");
        assert_eq!(morf.ref_protein, "K");
        assert_eq!(morf.alt_protein, "E");
        assert_eq!((morf.ref_loc, morf.bp_from, morf.bp_to), (11, 11, 14));

        let utr3 = &alignment.segments[2];
        assert_eq!(utr3.ref_cdna, "CCGT");
        assert_eq!(utr3.alt_cdna, "CCGT");
        assert_eq!(utr3.alt_protein, "P");
        assert_eq!(utr3.bp_to, 24);
    }

    #[test]
    fn test_align_deletion_pads_alternate() {
        let alignment = align_sequences(&input("11:AA>A", "2:K>2:N(+fs)", "HMANGNR")).unwrap();

        assert_eq!(alignment.mutated_cdna, "GCCATATGGCTAATGGTAACCGT");
        assert_eq!(alignment.alt_cdna, "GCCATATGGCTAxATGGTAACCGT");
        assert_eq!(alignment.ref_cdna.len(), alignment.alt_cdna.len());
        assert_eq!(strip(&alignment.alt_cdna), alignment.mutated_cdna);

        let morf = &alignment.segments[1];
        assert_eq!(morf.ref_protein, "K");
        assert_eq!(morf.alt_cdna, "AAT");
        assert_eq!(morf.alt_protein, "N");
    }

    #[test]
    fn test_align_insertion_pads_reference() {
        let alignment = align_sequences(&input("8:G>GCCC", "1:A>1:AP", "HMAPKW*P")).unwrap();

        assert_eq!(alignment.mutated_cdna, "GCCATATGGCCCCTAAATGGTAACCGT");
        assert_eq!(alignment.ref_cdna, "GCCATATGGxxxCTAAATGGTAACCGT");
        assert_eq!(alignment.ref_cdna.len(), alignment.alt_cdna.len());
        assert_eq!(strip(&alignment.ref_cdna), REF_CDNA);

        let morf = &alignment.segments[1];
        assert_eq!(morf.alt_cdna, "GCCCCT");
        assert_eq!(morf.alt_protein, "AP");
        assert_eq!(morf.ref_cdna, "GCTAAA");
    }

    #[test]
    fn test_align_merges_overlapping_windows() {
        let alignment = align_sequences(&input(
            "11:A>G;13:A>C",
            "2:K>2:E;2:K>2:D",
            "HMADW*P",
        ))
        .unwrap();

        let morfs: Vec<_> = alignment
            .segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Morf)
            .collect();
        assert_eq!(morfs.len(), 1);
        assert_eq!(morfs[0].alt_cdna, "GAC");
        assert_eq!(morfs[0].alt_protein, "D");
    }

    #[test]
    fn test_align_merge_keeps_reference_after_insertion() {
        let alignment = align_sequences(&input(
            "11:A>ACCCC;16:A>T",
            "2:K>2:T(+fs);3:W>3:P",
            "HMATP",
        ))
        .unwrap();

        let morfs: Vec<_> = alignment
            .segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Morf)
            .collect();
        assert_eq!(morfs.len(), 1);
        let morf = morfs[0];
        assert_eq!(morf.ref_cdna, "AAATGG");
        assert_eq!(morf.ref_protein, "KW");
        assert_eq!(morf.alt_cdna, "ACCCCT");
        assert_eq!(morf.alt_protein, "TP");
        assert_eq!((morf.ref_loc, morf.bp_from, morf.bp_to), (11, 11, 17));
    }

    #[test]
    fn test_align_separate_windows() {
        let alignment = align_sequences(&input(
            "5:A>C;14:T>C",
            "0:M>0:L;3:W>3:R",
            "HLAKR*P",
        ))
        .unwrap();

        let morfs: Vec<_> = alignment
            .segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Morf)
            .map(|s| (s.alt_protein.as_str(), s.bp_from, s.bp_to))
            .collect();
        assert_eq!(morfs, vec![("L", 5, 8), ("R", 14, 17)]);
    }

    #[test]
    fn test_align_utr_insertion_shifts_reference_frame() {
        let input = AlignmentInput {
            ref_cdna: REF_CDNA,
            ref_protein: REF_PROTEIN,
            alt_protein: "RHMAKW*P",
            cdna_changes: "1:C>CGG;13:A>A",
            protein_changes: "-1:H>-1:R;2:K>2:K",
            reading_frame: 1,
            utr_codons: 2,
        };
        let alignment = align_sequences(&input).unwrap();

        let utr5 = &alignment.segments[0];
        assert_eq!(utr5.ref_cdna, "GCCAT");
        assert_eq!(utr5.alt_cdna, "GCGGCAT");
        assert_eq!(utr5.bp_to, 7);
        assert_eq!(utr5.alt_protein, "RH");

        let morf = &alignment.segments[1];
        assert_eq!(morf.ref_loc, 11);
        assert_eq!(morf.ref_cdna, "AAA");
        assert_eq!(morf.alt_cdna, "AAA");
        assert_eq!(morf.bp_from, 13);
    }

    #[test]
    fn test_align_exhausted_reference_protein() {
        let alignment = align_sequences(&input("21:C>T", "6:P>6:S", "HMAKW*S")).unwrap();
        let morf = alignment
            .segments
            .iter()
            .find(|s| s.kind == SegmentKind::Morf)
            .unwrap();
        assert_eq!(morf.ref_protein, "-");
    }

    #[test]
    fn test_align_no_changes() {
        let alignment = align_sequences(&input("", "", "HMAKW*P")).unwrap();
        assert_eq!(alignment.segments.len(), 2);
        assert_eq!(alignment.mutated_cdna, REF_CDNA);
    }

    #[test]
    fn test_align_count_mismatch() {
        let err = align_sequences(&input("11:A>G", "", "H")).unwrap_err();
        assert_eq!(err, FerroError::ChangeCountMismatch { cdna: 1, protein: 0 });
    }

    #[test]
    fn test_align_change_past_end() {
        let err = align_sequences(&input("23:GT>G", "9:V>9:V", "H")).unwrap_err();
        assert!(matches!(err, FerroError::InvalidCoordinates { .. }));
    }

    #[test]
    fn test_align_malformed_descriptor() {
        let err = align_sequences(&input("11-A>G", "2:K>2:E", "H")).unwrap_err();
        assert!(matches!(err, FerroError::Parse { .. }));
    }
}
