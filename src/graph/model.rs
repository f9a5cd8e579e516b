//! Typed entities of a hydrated graph and the handles that link them.

use serde::Serialize;
use std::ops::Index;

use crate::coords::Strand;
use crate::search::insertion_index_by_key;

macro_rules! entity_index {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
            #[serde(transparent)]
            pub struct $name(pub(crate) usize);

            impl $name {
                /// Position of the entity in its table.
                pub fn index(self) -> usize {
                    self.0
                }
            }
        )*
    };
}

entity_index!(
    /// Handle to a [`Gene`].
    GeneIdx,
    /// Handle to a [`Transcript`].
    TranscriptIdx,
    /// Handle to an [`Exon`].
    ExonIdx,
    /// Handle to a [`Variant`].
    VariantIdx,
    /// Handle to a [`Haplotype`].
    HaplotypeIdx,
    /// Handle to a [`Proteoform`].
    ProteoformIdx,
    /// Handle to a [`Peptide`].
    PeptideIdx,
    /// Handle to a [`Spectrum`].
    SpectrumIdx,
    /// Handle to a [`Sample`].
    SampleIdx,
);

/// Effect of a variant on the reading frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantType {
    Snp,
    InframeIndel,
    Frameshift,
}

impl VariantType {
    /// Classify by allele lengths.
    ///
    /// ```
    /// use ferro_proteoform::graph::VariantType;
    ///
    /// assert_eq!(VariantType::classify("A", "G"), VariantType::Snp);
    /// assert_eq!(VariantType::classify("ACGT", "A"), VariantType::InframeIndel);
    /// assert_eq!(VariantType::classify("AC", "A"), VariantType::Frameshift);
    /// ```
    pub fn classify(reference: &str, alternate: &str) -> Self {
        let diff = reference.len() as i64 - alternate.len() as i64;
        if diff == 0 {
            VariantType::Snp
        } else if diff % 3 != 0 {
            VariantType::Frameshift
        } else {
            VariantType::InframeIndel
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gene {
    pub id: String,
    pub name: String,
    pub version: Option<i64>,
    pub biotype: String,
    pub bp_from: i64,
    pub bp_to: i64,
    pub strand: Strand,
    pub chromosome: String,
    pub transcripts: Vec<TranscriptIdx>,
    pub variants: Vec<VariantIdx>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exon {
    pub id: String,
    pub bp_from: i64,
    pub bp_to: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub id: String,
    pub location: i64,
    pub reference: String,
    pub alternate: String,
    pub variant_type: VariantType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub id: String,
    pub biotype: String,
    pub version: Option<i64>,
    pub cdna_sequence: String,
    pub ensembl_canonical: bool,
    pub mane_select: bool,
    /// Genomic positions of the start codon.
    pub start_codon: Vec<i64>,
    /// Genomic positions of the stop codon.
    pub stop_codon: Vec<i64>,
    pub exons: Vec<ExonIdx>,
    pub haplotypes: Vec<HaplotypeIdx>,
    /// `haplotype_frequencies[i]` belongs to `haplotypes[i]`.
    pub haplotype_frequencies: Vec<Option<f64>>,
    pub proteoforms: Vec<ProteoformIdx>,
    /// The proteoform encoded without any haplotype.
    pub canonical_protein: Option<ProteoformIdx>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Haplotype {
    pub id: String,
    /// Ordered by the `var_order` edge property.
    pub included_variants: Vec<VariantIdx>,
    pub matching_transcripts: Vec<TranscriptIdx>,
}

/// A peptide observed on a proteoform, at residue `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeptideMatch {
    pub peptide: PeptideIdx,
    pub position: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Proteoform {
    pub id: String,
    pub length: usize,
    pub sequence: String,
    pub reading_frame: i64,
    pub start_aa: i64,
    pub cdna_changes: String,
    pub protein_changes: String,
    pub splice_sites_affected: Vec<i64>,
    pub transcript: Option<TranscriptIdx>,
    /// `None` for the canonical protein.
    pub haplotype: Option<HaplotypeIdx>,
    pub matching_peptides: Vec<PeptideMatch>,
}

impl Proteoform {
    pub fn is_canonical(&self) -> bool {
        self.haplotype.is_none()
    }
}

/// One peptide-spectrum match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Psm {
    pub spectrum: SpectrumIdx,
    /// Posterior error probability.
    pub pep: f64,
    pub q_value: Option<f64>,
    pub rt_error: Option<f64>,
    pub spectral_similarity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Peptide {
    pub id: String,
    pub length: usize,
    pub sequence: String,
    pub class_1: String,
    pub class_2: String,
    /// Sorted by ascending PEP, best evidence first.
    pub psms: Vec<Psm>,
}

impl Peptide {
    /// Insert `psm` at its PEP rank; ties keep arrival order.
    pub fn insert_psm(&mut self, psm: Psm) -> usize {
        let idx = insertion_index_by_key(&self.psms, &psm.pep, |p| p.pep);
        self.psms.insert(idx, psm);
        idx
    }

    pub fn psm_count(&self) -> usize {
        self.psms.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spectrum {
    pub id: String,
    pub title: String,
    pub fraction_id: Option<String>,
    pub fragmentation_technique: String,
    pub precursor_mz: Option<f64>,
    pub precursor_intensity: Option<f64>,
    pub retention_time: Option<f64>,
    pub proteases: String,
    pub spectrometer: String,
    pub usi: Option<String>,
    pub sample: Option<SampleIdx>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sample {
    pub id: String,
    pub tissue: String,
    pub age: Option<String>,
    pub sex: String,
    pub phenotype: String,
    pub accession: String,
}

/// All entities of one hydration call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntityGraph {
    pub(crate) genes: Vec<Gene>,
    pub(crate) transcripts: Vec<Transcript>,
    pub(crate) exons: Vec<Exon>,
    pub(crate) variants: Vec<Variant>,
    pub(crate) haplotypes: Vec<Haplotype>,
    pub(crate) proteoforms: Vec<Proteoform>,
    pub(crate) peptides: Vec<Peptide>,
    pub(crate) spectra: Vec<Spectrum>,
    pub(crate) samples: Vec<Sample>,
}

macro_rules! entity_table {
    ($($field:ident: $ty:ty, $idx:ident, $find:ident;)*) => {
        impl EntityGraph {
            $(
                pub fn $field(&self) -> &[$ty] {
                    &self.$field
                }

                /// Look up an entity by its node id.
                pub fn $find(&self, id: &str) -> Option<$idx> {
                    self.$field.iter().position(|e| e.id == id).map($idx)
                }
            )*
        }

        $(
            impl Index<$idx> for EntityGraph {
                type Output = $ty;

                fn index(&self, idx: $idx) -> &$ty {
                    &self.$field[idx.0]
                }
            }
        )*
    };
}

entity_table! {
    genes: Gene, GeneIdx, find_gene;
    transcripts: Transcript, TranscriptIdx, find_transcript;
    exons: Exon, ExonIdx, find_exon;
    variants: Variant, VariantIdx, find_variant;
    haplotypes: Haplotype, HaplotypeIdx, find_haplotype;
    proteoforms: Proteoform, ProteoformIdx, find_proteoform;
    peptides: Peptide, PeptideIdx, find_peptide;
    spectra: Spectrum, SpectrumIdx, find_spectrum;
    samples: Sample, SampleIdx, find_sample;
}

impl EntityGraph {
    /// Exon spans of a transcript as inclusive `(bp_from, bp_to)` pairs.
    pub fn exon_spans(&self, transcript: TranscriptIdx) -> Vec<(i64, i64)> {
        self[transcript]
            .exons
            .iter()
            .map(|&e| (self[e].bp_from, self[e].bp_to))
            .collect()
    }

    /// Exon spans of every transcript of a gene.
    pub fn gene_exon_spans(&self, gene: GeneIdx) -> Vec<(i64, i64)> {
        self[gene]
            .transcripts
            .iter()
            .flat_map(|&t| self.exon_spans(t))
            .collect()
    }

    /// Sample a PSM's spectrum was measured from.
    pub fn sample_of(&self, psm: &Psm) -> Option<&Sample> {
        self[psm.spectrum].sample.map(|s| &self[s])
    }

    /// Number of entities across all tables.
    pub fn entity_count(&self) -> usize {
        self.genes.len()
            + self.transcripts.len()
            + self.exons.len()
            + self.variants.len()
            + self.haplotypes.len()
            + self.proteoforms.len()
            + self.peptides.len()
            + self.spectra.len()
            + self.samples.len()
    }
}
