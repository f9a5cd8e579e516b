//! Drawing primitives for one transcript on the gene layout.

use serde::Serialize;

use super::alignment::{RegionType, SplicingAlignment, DEFAULT_SKIP_GAP};
use super::overlay::{overlay_regions, ColouredRect, OverlayLayer};
use super::rna::SplicedTranscript;

/// Colours and spacing of a transcript track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackStyle {
    pub exon_colour: String,
    pub coding_colour: String,
    pub peptide_colour: String,
    pub skip_gap: f64,
}

impl Default for TrackStyle {
    fn default() -> Self {
        Self {
            exon_colour: "#e0e0e0".to_string(),
            coding_colour: "#c9c9c9".to_string(),
            peptide_colour: "#00589c".to_string(),
            skip_gap: DEFAULT_SKIP_GAP,
        }
    }
}

/// Where the protein is encoded and which parts of it were observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodingFootprint {
    /// Inclusive genomic span from the start codon to the stop codon.
    pub coding_span: Option<(i64, i64)>,
    /// Genomic position of the first coding base.
    pub cds_start: Option<i64>,
    /// Observed peptides as `(first residue, residue count)`.
    pub peptides: Vec<(i64, i64)>,
}

/// Exon rectangles and intron connector lines of a transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptTrack {
    pub exons: Vec<ColouredRect>,
    /// Line coordinates read as `[x1, x2, x1, x2, ...]`.
    pub introns: Vec<f64>,
}

/// Lay out `transcript` on the gene-wide `alignment`.
pub fn transcript_track(
    alignment: &SplicingAlignment,
    transcript: &SplicedTranscript,
    footprint: &CodingFootprint,
    style: &TrackStyle,
    width: f64,
) -> TranscriptTrack {
    let exon_rects: Vec<(f64, f64)> = transcript
        .exons()
        .iter()
        .filter_map(|exon| alignment.span_to_screen(exon.bp_from, exon.bp_to, width))
        .collect();

    let mut layers = Vec::with_capacity(2);
    if let Some((from, to)) = footprint.coding_span {
        if let Some(span) = alignment.span_to_screen(from, to, width) {
            layers.push(OverlayLayer::new(vec![span], style.coding_colour.clone()));
        }
    }
    if let Some(cds_start) = footprint.cds_start {
        let xs: Vec<f64> = footprint
            .peptides
            .iter()
            .filter_map(|&(aa_from, aa_len)| {
                transcript.peptide_to_screen(aa_from, aa_len, cds_start, alignment, width)
            })
            .flatten()
            .collect();
        layers.push(OverlayLayer::from_pairs(&xs, style.peptide_colour.clone()));
    }

    TranscriptTrack {
        exons: overlay_regions(&exon_rects, &layers, &style.exon_colour),
        introns: intron_connectors(alignment, transcript, width, style.skip_gap),
    }
}

/// Connector lines between consecutive exons plus the two flanks.
fn intron_connectors(
    alignment: &SplicingAlignment,
    transcript: &SplicedTranscript,
    width: f64,
    gap: f64,
) -> Vec<f64> {
    let strand = alignment.strand();
    let mut bounds: Vec<(i64, i64)> = transcript
        .exons()
        .iter()
        .map(|exon| strand.oriented_span(exon.bp_from, exon.bp_to))
        .collect();
    bounds.sort_unstable();

    let shown = alignment.regions().iter().filter(|r| r.is_shown());
    let (Some(start), Some(end)) = (
        shown.clone().next().map(|r| r.from),
        shown.last().map(|r| r.to),
    ) else {
        return Vec::new();
    };

    let mut gaps = Vec::with_capacity(bounds.len() + 1);
    let mut cursor = start;
    for &(from, to) in &bounds {
        if from > cursor {
            gaps.push((cursor, from));
        }
        cursor = cursor.max(to);
    }
    if end > cursor {
        gaps.push((cursor, end));
    }

    let half_gap = (gap / 2.0).floor();
    let mut lines = Vec::new();
    for (from, to) in gaps {
        let (Some(left), Some(right)) = (
            alignment.oriented_to_screen(from, width),
            alignment.oriented_to_screen(to, width),
        ) else {
            continue;
        };
        lines.push(left);
        for skip in alignment
            .regions()
            .iter()
            .filter(|r| r.region_type == RegionType::IntronSkip && r.from >= from && r.to <= to)
        {
            if let Some(x) = alignment.oriented_to_screen(skip.from, width) {
                lines.push(x - half_gap);
                lines.push(x + half_gap);
            }
        }
        lines.push(right);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Strand;

    const EXONS: [(i64, i64); 3] = [(100, 200), (5000, 5100), (9000, 9050)];

    fn fixture() -> (SplicingAlignment, SplicedTranscript) {
        (
            SplicingAlignment::new(&EXONS, Strand::Plus).unwrap(),
            SplicedTranscript::new(&EXONS, Strand::Plus),
        )
    }

    #[test]
    fn test_track_without_protein() {
        let (alignment, transcript) = fixture();
        let track = transcript_track(
            &alignment,
            &transcript,
            &CodingFootprint::default(),
            &TrackStyle::default(),
            1000.0,
        );
        assert_eq!(track.exons.len(), 3);
        assert!(track.exons.iter().all(|r| r.colour == "#e0e0e0"));
        // flank, two abbreviated introns, flank
        assert_eq!(track.introns.len(), 12);
    }

    #[test]
    fn test_track_with_coding_and_peptide() {
        let (alignment, transcript) = fixture();
        let footprint = CodingFootprint {
            coding_span: Some((150, 5050)),
            cds_start: Some(150),
            peptides: vec![(2, 4)],
        };
        let style = TrackStyle::default();
        let track = transcript_track(&alignment, &transcript, &footprint, &style, 1000.0);

        let colours: Vec<&str> = track.exons.iter().map(|r| r.colour.as_str()).collect();
        assert_eq!(
            colours,
            vec!["#e0e0e0", "#c9c9c9", "#00589c", "#c9c9c9", "#c9c9c9", "#e0e0e0", "#e0e0e0"]
        );
        let total: f64 = track.exons.iter().map(|r| r.width).sum();
        let scale = alignment.scale(1000.0);
        assert!((total - 253.0 * scale).abs() < 1e-6);
    }

    #[test]
    fn test_connectors_skip_merged_neighbour_exons() {
        let alignment = SplicingAlignment::new(&EXONS, Strand::Plus).unwrap();
        let transcript = SplicedTranscript::new(&[(100, 200), (9000, 9050)], Strand::Plus);
        let lines = intron_connectors(&alignment, &transcript, 1000.0, 6.0);
        // the middle connector crosses an exon of another transcript and both
        // abbreviated introns
        assert_eq!(lines.len(), 2 + 6 + 2);
    }
}
