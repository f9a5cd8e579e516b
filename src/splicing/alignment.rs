//! Abbreviated exon/intron screen layout.

use serde::Serialize;

use crate::coords::Strand;
use crate::error::FerroError;
use crate::intervals::merge_overlapping_regions;

/// Share of the screen width given to exons.
pub const DEFAULT_EXON_FRACTION: f64 = 0.8;

/// Width in pixels of the hole drawn where an intron is abbreviated.
pub const DEFAULT_SKIP_GAP: f64 = 6.0;

/// How a region of the layout is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionType {
    Exon,
    IntronShow,
    IntronSkip,
}

/// One half-open `[from, to)` region in oriented coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SplicingRegion {
    pub from: i64,
    pub to: i64,
    pub region_type: RegionType,
}

impl SplicingRegion {
    fn new(from: i64, to: i64, region_type: RegionType) -> Self {
        Self {
            from,
            to,
            region_type,
        }
    }

    /// Width in bases.
    pub fn len(&self) -> i64 {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.to <= self.from
    }

    /// Occupies screen space.
    pub fn is_shown(&self) -> bool {
        self.region_type != RegionType::IntronSkip
    }
}

/// Screen layout of a gene's exons with introns shortened.
///
/// Exons of all transcripts are merged and laid out left to right in the
/// direction of transcription. Exons receive `fraction` of the screen width;
/// the remainder is shared among the introns plus two half-width flanks.
/// Introns longer than their share keep `half` bases at each end and the
/// middle is skipped.
///
/// # Example
///
/// ```
/// use ferro_proteoform::coords::Strand;
/// use ferro_proteoform::splicing::SplicingAlignment;
///
/// let exons = [(100, 200), (5000, 5100), (9000, 9050)];
/// let alignment = SplicingAlignment::new(&exons, Strand::Plus).unwrap();
/// assert_eq!(alignment.exon_bp(), 253);
///
/// let left = alignment.genome_to_screen(100, 1000.0).unwrap();
/// let mid = alignment.genome_to_screen(150, 1000.0).unwrap();
/// let right = alignment.genome_to_screen(200, 1000.0).unwrap();
/// assert!(left < mid && mid < right);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplicingAlignment {
    strand: Strand,
    fraction: f64,
    exon_bp: i64,
    regions: Vec<SplicingRegion>,
}

impl SplicingAlignment {
    /// Lay out inclusive genomic exon spans with the default exon fraction.
    pub fn new(exons: &[(i64, i64)], strand: Strand) -> Result<Self, FerroError> {
        Self::with_fraction(exons, strand, DEFAULT_EXON_FRACTION)
    }

    /// Lay out inclusive genomic exon spans giving `fraction` of the width to
    /// exons.
    pub fn with_fraction(
        exons: &[(i64, i64)],
        strand: Strand,
        fraction: f64,
    ) -> Result<Self, FerroError> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(FerroError::InvalidCoordinates {
                msg: format!("exon screen fraction {} not in (0, 1]", fraction),
            });
        }

        let oriented: Vec<(i64, i64)> = exons
            .iter()
            .map(|&(from, to)| strand.oriented_span(from.min(to), from.max(to)))
            .collect();
        let merged = merge_overlapping_regions(&oriented);
        let (Some(&(first, _)), Some(&(_, last))) = (merged.first(), merged.last()) else {
            return Err(FerroError::InvalidCoordinates {
                msg: "cannot align an empty exon list".to_string(),
            });
        };

        let exon_bp: i64 = merged.iter().map(|(from, to)| to - from).sum();
        let introns = merged.len() - 1;
        let share = exon_bp as f64 / fraction * (1.0 - fraction) / (introns + 1) as f64;
        let half = (share / 2.0).floor() as i64;

        let mut regions = Vec::with_capacity(merged.len() * 4 + 1);
        let mut push = |from: i64, to: i64, region_type| {
            if from < to {
                regions.push(SplicingRegion::new(from, to, region_type));
            }
        };

        push(first - half, first, RegionType::IntronShow);
        for (idx, &(from, to)) in merged.iter().enumerate() {
            push(from, to, RegionType::Exon);
            let Some(&(next, _)) = merged.get(idx + 1) else {
                break;
            };
            if (next - to) as f64 > share {
                push(to, to + half, RegionType::IntronShow);
                push(to + half, next - half, RegionType::IntronSkip);
                push(next - half, next, RegionType::IntronShow);
            } else {
                push(to, next, RegionType::IntronShow);
            }
        }
        push(last, last + half, RegionType::IntronShow);

        Ok(Self {
            strand,
            fraction,
            exon_bp,
            regions,
        })
    }

    /// Extend the layout with skipped regions so it spans the whole gene.
    pub fn covering(mut self, gene_from: i64, gene_to: i64) -> Self {
        let (lo, hi) = self
            .strand
            .oriented_span(gene_from.min(gene_to), gene_from.max(gene_to));
        if let Some(first) = self.regions.first().map(|r| r.from) {
            if lo < first {
                self.regions
                    .insert(0, SplicingRegion::new(lo, first, RegionType::IntronSkip));
            }
        }
        if let Some(last) = self.regions.last().map(|r| r.to) {
            if hi > last {
                self.regions
                    .push(SplicingRegion::new(last, hi, RegionType::IntronSkip));
            }
        }
        self
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Total merged exon length in bases.
    pub fn exon_bp(&self) -> i64 {
        self.exon_bp
    }

    pub fn regions(&self) -> &[SplicingRegion] {
        &self.regions
    }

    /// Screen pixels per base for a component `width` pixels wide.
    pub fn scale(&self, width: f64) -> f64 {
        width * self.fraction / self.exon_bp as f64
    }

    /// Bases of shown regions in the whole layout.
    pub fn shown_bp(&self) -> i64 {
        self.regions
            .iter()
            .filter(|r| r.is_shown())
            .map(SplicingRegion::len)
            .sum()
    }

    /// Shown bases before the oriented coordinate `oriented`.
    fn shown_units_before(&self, oriented: i64) -> Option<i64> {
        let mut acc = 0;
        for region in &self.regions {
            if region.is_shown() {
                if region.from <= oriented && oriented <= region.to {
                    return Some(acc + oriented - region.from);
                }
                acc += region.len();
            } else if region.from <= oriented && oriented < region.to {
                log::debug!(
                    "Location {} falls into an abbreviated intron",
                    self.strand.deorient(oriented)
                );
                return None;
            }
        }
        log::debug!(
            "Location {} does not fit into the alignment",
            self.strand.deorient(oriented)
        );
        None
    }

    pub(crate) fn oriented_to_screen(&self, oriented: i64, width: f64) -> Option<f64> {
        self.shown_units_before(oriented)
            .map(|units| units as f64 * self.scale(width))
    }

    /// Screen x of genomic location `loc` in a component `width` pixels wide.
    ///
    /// `None` when `loc` is in a skipped part of an intron or outside the
    /// layout.
    pub fn genome_to_screen(&self, loc: i64, width: f64) -> Option<f64> {
        self.oriented_to_screen(self.strand.orient(loc), width)
    }

    /// Genomic location shown at screen x, rounded to the nearest base.
    pub fn screen_to_genome(&self, x: f64, width: f64) -> Option<i64> {
        let scale = self.scale(width);
        if !x.is_finite() || !scale.is_finite() || scale <= 0.0 {
            log::debug!("Cannot map screen x {} at width {}", x, width);
            return None;
        }
        let units = (x / scale).round() as i64;
        if units < 0 {
            log::debug!("Screen x {} lies left of the alignment", x);
            return None;
        }

        let mut acc = 0;
        let mut last_end = None;
        for region in self.regions.iter().filter(|r| r.is_shown()) {
            if units < acc + region.len() {
                return Some(self.strand.deorient(region.from + units - acc));
            }
            acc += region.len();
            last_end = Some(region.to);
        }
        match last_end {
            Some(to) if units == acc => Some(self.strand.deorient(to)),
            _ => {
                log::debug!("Screen x {} lies right of the alignment", x);
                None
            }
        }
    }

    /// Left and right screen edges of the inclusive genomic span.
    pub fn span_to_screen(&self, bp_from: i64, bp_to: i64, width: f64) -> Option<(f64, f64)> {
        let (lo, hi) = self
            .strand
            .oriented_span(bp_from.min(bp_to), bp_from.max(bp_to));
        Some((
            self.oriented_to_screen(lo, width)?,
            self.oriented_to_screen(hi, width)?,
        ))
    }

    /// Connector line coordinates for every intron, including the flanks.
    ///
    /// The result has even length and reads `[x1, x2, x1, x2, ...]`. Each
    /// skipped region splits its connector with a `gap`-pixel hole.
    pub fn intron_segments(&self, width: f64, gap: f64) -> Vec<f64> {
        let scale = self.scale(width);
        let half_gap = (gap / 2.0).floor();
        let mut lines = Vec::new();
        let mut acc = 0.0;
        let mut in_intron = false;

        for region in &self.regions {
            let x = acc * scale;
            match region.region_type {
                RegionType::Exon => {
                    if in_intron {
                        lines.push(x);
                        in_intron = false;
                    }
                }
                RegionType::IntronShow | RegionType::IntronSkip => {
                    if !in_intron {
                        lines.push(x);
                        in_intron = true;
                    }
                    if region.region_type == RegionType::IntronSkip {
                        lines.push(x - half_gap);
                        lines.push(x + half_gap);
                    }
                }
            }
            if region.is_shown() {
                acc += region.len() as f64;
            }
        }
        if in_intron {
            lines.push(acc * scale);
        }
        lines
    }
}
