//! Walking a single transcript's exons in transcription order.

use serde::Serialize;

use super::alignment::SplicingAlignment;
use crate::coords::Strand;

/// One exon of a spliced transcript, inclusive genomic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExonSpan {
    pub bp_from: i64,
    pub bp_to: i64,
}

impl ExonSpan {
    pub fn new(bp_from: i64, bp_to: i64) -> Self {
        Self {
            bp_from: bp_from.min(bp_to),
            bp_to: bp_from.max(bp_to),
        }
    }

    /// Number of bases, both ends included.
    pub fn length(&self) -> i64 {
        self.bp_to - self.bp_from + 1
    }

    pub fn contains(&self, loc: i64) -> bool {
        (self.bp_from..=self.bp_to).contains(&loc)
    }
}

/// The exons of one transcript, ordered 5' to 3'.
///
/// RNA coordinates are 0-based offsets into the spliced sequence. On the
/// plus strand exons are walked by ascending `bp_from`; on the minus strand
/// by descending `bp_to`, reading each exon from its high end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplicedTranscript {
    strand: Strand,
    exons: Vec<ExonSpan>,
}

impl SplicedTranscript {
    pub fn new(exons: &[(i64, i64)], strand: Strand) -> Self {
        let mut exons: Vec<ExonSpan> = exons
            .iter()
            .map(|&(from, to)| ExonSpan::new(from, to))
            .collect();
        match strand {
            Strand::Plus => exons.sort_by_key(|e| e.bp_from),
            Strand::Minus => exons.sort_by_key(|e| std::cmp::Reverse(e.bp_to)),
        }
        Self { strand, exons }
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Exons in transcription order.
    pub fn exons(&self) -> &[ExonSpan] {
        &self.exons
    }

    /// Length of the spliced sequence.
    pub fn spliced_len(&self) -> i64 {
        self.exons.iter().map(ExonSpan::length).sum()
    }

    /// Whether the exon lies wholly upstream of `loc` in transcription
    /// order.
    fn passed(&self, exon: &ExonSpan, loc: i64) -> bool {
        match self.strand {
            Strand::Plus => exon.bp_to < loc,
            Strand::Minus => exon.bp_from > loc,
        }
    }

    /// Offset of `loc` inside `exon`, counted from its 5' end.
    fn offset_in(&self, exon: &ExonSpan, loc: i64) -> i64 {
        match self.strand {
            Strand::Plus => loc - exon.bp_from,
            Strand::Minus => exon.bp_to - loc,
        }
    }

    /// Genomic position at `offset` from the 5' end of `exon`.
    fn position_in(&self, exon: &ExonSpan, offset: i64) -> i64 {
        match self.strand {
            Strand::Plus => exon.bp_from + offset,
            Strand::Minus => exon.bp_to - offset,
        }
    }

    /// RNA coordinate of genomic location `loc`.
    ///
    /// `None` when `loc` is intronic or outside the transcript.
    pub fn genome_to_rna(&self, loc: i64) -> Option<i64> {
        let mut rna = 0;
        for exon in &self.exons {
            if exon.contains(loc) {
                return Some(rna + self.offset_in(exon, loc));
            }
            if !self.passed(exon, loc) {
                break;
            }
            rna += exon.length();
        }
        log::debug!("Location {} is not exonic in this transcript", loc);
        None
    }

    /// Genomic location of RNA coordinate `rna`.
    pub fn rna_to_genome(&self, rna: i64) -> Option<i64> {
        if rna < 0 {
            log::debug!("RNA coordinate {} is negative", rna);
            return None;
        }
        let mut acc = 0;
        for exon in &self.exons {
            if rna < acc + exon.length() {
                return Some(self.position_in(exon, rna - acc));
            }
            acc += exon.length();
        }
        log::debug!("RNA coordinate {} is past the transcript end", rna);
        None
    }

    /// Genomic pieces covered by the RNA span `[from, to]`.
    ///
    /// One inclusive `(start, end)` pair per exon touched, in transcription
    /// order. On the minus strand `start > end`.
    pub fn rna_span_to_genome(&self, from: i64, to: i64) -> Vec<(i64, i64)> {
        let (from, to) = (from.max(0), to.min(self.spliced_len() - 1));
        let mut pieces = Vec::new();
        let mut acc = 0;
        for exon in &self.exons {
            let exon_end = acc + exon.length() - 1;
            if from <= exon_end && to >= acc {
                let start = from.max(acc) - acc;
                let end = to.min(exon_end) - acc;
                pieces.push((self.position_in(exon, start), self.position_in(exon, end)));
            }
            if exon_end >= to {
                break;
            }
            acc += exon.length();
        }
        pieces
    }

    /// Screen footprint of a peptide on the abbreviated layout.
    ///
    /// `aa_from` and `aa_len` are in residues relative to the coding start
    /// at genomic `cds_start`. Returns an even-length list with one
    /// `(start, end)` pair per exon touched, or `None` if any edge cannot be
    /// placed.
    pub fn peptide_to_screen(
        &self,
        aa_from: i64,
        aa_len: i64,
        cds_start: i64,
        alignment: &SplicingAlignment,
        width: f64,
    ) -> Option<Vec<f64>> {
        let rna_start = self.genome_to_rna(cds_start)?;
        let rna_from = rna_start + 3 * aa_from;
        let rna_to = rna_start + 3 * (aa_from + aa_len) - 1;
        if rna_to < rna_from || rna_from >= self.spliced_len() {
            log::debug!(
                "Peptide at residue {} (+{}) lies outside the transcript",
                aa_from,
                aa_len
            );
            return None;
        }

        let mut xs = Vec::new();
        for (start, end) in self.rna_span_to_genome(rna_from, rna_to) {
            let (left, right) = alignment.span_to_screen(start, end, width)?;
            xs.push(left);
            xs.push(right);
        }
        Some(xs)
    }

    /// Screen x of `loc` with introns completely hidden.
    pub fn simple_screen_x(&self, loc: i64, width: f64) -> Option<f64> {
        let total = self.spliced_len();
        if total == 0 {
            return None;
        }
        self.genome_to_rna(loc)
            .map(|rna| rna as f64 * width / total as f64)
    }
}
