//! Genome, RNA and screen coordinate mapping
//!
//! A gene is drawn with its exons at true relative scale and its introns
//! abbreviated so that exon structure stays readable however long the
//! introns are.
//!
//! | Type | Maps between |
//! |------|--------------|
//! | [`SplicingAlignment`] | genomic position and screen x (abbreviated introns) |
//! | [`SplicedTranscript`] | genomic position and RNA offset; peptide residues and screen x |
//! | [`overlay_regions`] | coloured overlays onto exon rectangles |
//! | [`transcript_track`] | everything needed to draw one transcript |

pub mod alignment;
pub mod overlay;
pub mod rna;
pub mod track;

pub use alignment::{
    RegionType, SplicingAlignment, SplicingRegion, DEFAULT_EXON_FRACTION, DEFAULT_SKIP_GAP,
};
pub use overlay::{overlay_regions, ColouredRect, OverlayLayer};
pub use rna::{ExonSpan, SplicedTranscript};
pub use track::{transcript_track, CodingFootprint, TrackStyle, TranscriptTrack};
