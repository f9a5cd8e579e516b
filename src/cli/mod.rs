//! CLI utilities for ferro-proteoform
//!
//! This module provides testable functions used by the CLI binary.
//! Loading, lookups and summaries live here so the binary only wires
//! arguments to library calls and prints the results.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use crate::coords::Strand;
use crate::error::FerroError;
use crate::graph::{EntityGraph, ProteoformIdx, TranscriptIdx, WireRecord};
use crate::sequence::AlignmentInput;
use crate::splicing::CodingFootprint;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text format (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

impl FromStr for OutputFormat {
    type Err = std::convert::Infallible;

    /// Parse an output format from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use ferro_proteoform::cli::OutputFormat;
    /// use std::str::FromStr;
    ///
    /// assert!(matches!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json));
    /// assert!(matches!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        })
    }
}

/// Read query records from JSON.
///
/// Accepts either a single record or an array of records.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<WireRecord>, FerroError> {
    let value: Value = serde_json::from_reader(reader)?;
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(FerroError::from))
            .collect(),
        other => Ok(vec![serde_json::from_value(other)?]),
    }
}

/// Read query records from a file, or from stdin when `path` is `-`.
pub fn load_records(path: &Path) -> Result<Vec<WireRecord>, FerroError> {
    if path.as_os_str() == "-" {
        return read_records(io::stdin().lock());
    }
    let file = File::open(path).map_err(|e| FerroError::Io {
        msg: format!("{}: {}", path.display(), e),
    })?;
    read_records(BufReader::new(file))
}

/// Entity counts of a hydrated graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub genes: usize,
    pub transcripts: usize,
    pub exons: usize,
    pub variants: usize,
    pub haplotypes: usize,
    pub proteoforms: usize,
    pub peptides: usize,
    pub psms: usize,
    pub spectra: usize,
    pub samples: usize,
    pub dropped_relationships: usize,
}

impl GraphSummary {
    pub fn from_graph(graph: &EntityGraph, dropped_relationships: usize) -> Self {
        Self {
            genes: graph.genes().len(),
            transcripts: graph.transcripts().len(),
            exons: graph.exons().len(),
            variants: graph.variants().len(),
            haplotypes: graph.haplotypes().len(),
            proteoforms: graph.proteoforms().len(),
            peptides: graph.peptides().len(),
            psms: graph.peptides().iter().map(|p| p.psm_count()).sum(),
            spectra: graph.spectra().len(),
            samples: graph.samples().len(),
            dropped_relationships,
        }
    }
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "genes:       {}", self.genes)?;
        writeln!(f, "transcripts: {}", self.transcripts)?;
        writeln!(f, "exons:       {}", self.exons)?;
        writeln!(f, "variants:    {}", self.variants)?;
        writeln!(f, "haplotypes:  {}", self.haplotypes)?;
        writeln!(f, "proteoforms: {}", self.proteoforms)?;
        writeln!(f, "peptides:    {} ({} PSMs)", self.peptides, self.psms)?;
        writeln!(f, "spectra:     {}", self.spectra)?;
        writeln!(f, "samples:     {}", self.samples)?;
        write!(f, "dropped:     {}", self.dropped_relationships)
    }
}

/// Look up a transcript by id.
pub fn require_transcript(graph: &EntityGraph, id: &str) -> Result<TranscriptIdx, FerroError> {
    graph.find_transcript(id).ok_or_else(|| FerroError::InvalidNode {
        kind: "Transcript",
        id: id.to_string(),
        msg: "not present in the record".to_string(),
    })
}

/// Look up a proteoform by id.
pub fn require_proteoform(graph: &EntityGraph, id: &str) -> Result<ProteoformIdx, FerroError> {
    graph.find_proteoform(id).ok_or_else(|| FerroError::InvalidNode {
        kind: "Proteoform",
        id: id.to_string(),
        msg: "not present in the record".to_string(),
    })
}

/// Alignment input for a proteoform against its transcript.
///
/// The reference protein is the transcript's canonical protein and the
/// start codon sits `start_aa` codons into the cDNA.
pub fn alignment_input(
    graph: &EntityGraph,
    proteoform: ProteoformIdx,
) -> Result<AlignmentInput<'_>, FerroError> {
    let alt = &graph[proteoform];
    let transcript = alt.transcript.ok_or_else(|| FerroError::InvalidNode {
        kind: "Proteoform",
        id: alt.id.clone(),
        msg: "not linked to a transcript".to_string(),
    })?;
    let transcript = &graph[transcript];
    let reference = transcript
        .canonical_protein
        .ok_or_else(|| FerroError::InvalidNode {
            kind: "Transcript",
            id: transcript.id.clone(),
            msg: "has no canonical proteoform".to_string(),
        })?;

    Ok(AlignmentInput {
        ref_cdna: &transcript.cdna_sequence,
        ref_protein: &graph[reference].sequence,
        alt_protein: &alt.sequence,
        cdna_changes: &alt.cdna_changes,
        protein_changes: &alt.protein_changes,
        reading_frame: alt.reading_frame.max(0) as usize,
        utr_codons: alt.start_aa.max(0) as usize,
    })
}

/// Coding span and observed peptides of a transcript for track drawing.
///
/// Peptide positions are moved from the proteoform sequence to residues
/// after its start codon.
pub fn coding_footprint(
    graph: &EntityGraph,
    transcript: TranscriptIdx,
    proteoform: Option<ProteoformIdx>,
    strand: Strand,
) -> CodingFootprint {
    let transcript = &graph[transcript];
    let codons = transcript.start_codon.iter().chain(&transcript.stop_codon);
    let coding_span = codons
        .clone()
        .min()
        .zip(codons.max())
        .map(|(&from, &to)| (from, to));
    let cds_start = match strand {
        Strand::Plus => transcript.start_codon.iter().min(),
        Strand::Minus => transcript.start_codon.iter().max(),
    }
    .copied();

    let peptides = proteoform
        .map(|p| {
            let proteoform = &graph[p];
            proteoform
                .matching_peptides
                .iter()
                .map(|m| {
                    (
                        m.position - proteoform.start_aa,
                        graph[m.peptide].length as i64,
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    CodingFootprint {
        coding_span,
        cds_start,
        peptides,
    }
}
