//! Node and edge property parsing.
//!
//! Graph query results carry every node as a JSON property map. The raw
//! structs below mirror those maps (including the property names the
//! database uses) and convert into the typed entities of [`super::model`].
//!
//! | Entity | Required properties |
//! |--------|---------------------|
//! | Gene | `id`, `bp_from`, `bp_to`, `strand` |
//! | Exon | `id`, `bp_from`, `bp_to` |
//! | Variant | `id`, `location`, `ref`, `alt` |
//! | Peptide | `id`, `sequence` |
//! | others | `id` |

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::model::{
    Exon, Gene, Haplotype, Peptide, Proteoform, Sample, Spectrum, Transcript, Variant,
    VariantType,
};
use crate::coords::Strand;
use crate::error::FerroError;

/// Normalized `id` of a node, accepting strings and numbers.
pub fn node_id(value: &Value) -> Option<String> {
    match value.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("Invalid id: {}", other))),
    }
}

fn deserialize_strand<'de, D>(deserializer: D) -> Result<Strand, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let symbol = match &value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    };
    Strand::from_symbol(&symbol)
        .ok_or_else(|| serde::de::Error::custom(format!("Invalid strand: {}", value)))
}

/// Strings, numbers and null into `Option<String>`.
fn deserialize_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Integers, or integers written as strings.
fn deserialize_opt_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid integer: {}", n))),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("Invalid integer: {}", s))),
        other => Err(serde::de::Error::custom(format!("Invalid integer: {}", other))),
    }
}

/// `;`-joined integers, `-` or empty for none, or a JSON array.
fn deserialize_splice_sites<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => parse_splice_sites(&s).map_err(<D::Error as serde::de::Error>::custom),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_i64()
                    .ok_or_else(|| serde::de::Error::custom(format!("Invalid splice site: {}", item)))
            })
            .collect(),
        Value::Number(n) => n
            .as_i64()
            .map(|site| vec![site])
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid splice site: {}", n))),
        other => Err(serde::de::Error::custom(format!(
            "Invalid splice sites: {}",
            other
        ))),
    }
}

/// Parse a `splice_sites_affected` list.
///
/// ```
/// use ferro_proteoform::graph::node::parse_splice_sites;
///
/// assert_eq!(parse_splice_sites("12;40").unwrap(), vec![12, 40]);
/// assert!(parse_splice_sites("-").unwrap().is_empty());
/// ```
pub fn parse_splice_sites(text: &str) -> Result<Vec<i64>, String> {
    let text = text.trim();
    if text.is_empty() || text == "-" {
        return Ok(Vec::new());
    }
    text.split(';')
        .map(|site| {
            site.trim()
                .parse::<i64>()
                .map_err(|_| format!("Invalid splice site: {}", site))
        })
        .collect()
}

fn default_phenotype() -> String {
    "healthy".to_string()
}

#[derive(Debug, Deserialize)]
struct RawGene {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    #[serde(default, alias = "gene_name")]
    name: String,
    #[serde(default, alias = "gene_version", deserialize_with = "deserialize_opt_int")]
    version: Option<i64>,
    #[serde(default, alias = "gene_biotype")]
    biotype: String,
    bp_from: i64,
    bp_to: i64,
    #[serde(deserialize_with = "deserialize_strand")]
    strand: Strand,
    #[serde(default, alias = "chromosome", deserialize_with = "deserialize_opt_text")]
    chrom: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawExon {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    bp_from: i64,
    bp_to: i64,
}

#[derive(Debug, Deserialize)]
struct RawVariant {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    #[serde(alias = "location_bp")]
    location: i64,
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "alt")]
    alternate: String,
}

#[derive(Debug, Deserialize)]
struct RawTranscript {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    #[serde(default, alias = "transcript_biotype")]
    biotype: String,
    #[serde(default, alias = "transcript_version", deserialize_with = "deserialize_opt_int")]
    version: Option<i64>,
    #[serde(default, rename = "cDNA_sequence", alias = "cdna_sequence")]
    cdna_sequence: String,
    #[serde(default)]
    ensembl_canonical: Option<bool>,
    #[serde(default, rename = "MANE_select", alias = "mane_select")]
    mane_select: Option<bool>,
    #[serde(default)]
    start: Vec<i64>,
    #[serde(default)]
    stop: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct RawHaplotype {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct RawProteoform {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    #[serde(default)]
    length: Option<usize>,
    #[serde(default)]
    sequence: String,
    #[serde(default)]
    reading_frame: i64,
    #[serde(default)]
    start_aa: i64,
    #[serde(default, rename = "cDNA_changes", alias = "cdna_changes")]
    cdna_changes: String,
    #[serde(default)]
    protein_changes: String,
    #[serde(default, deserialize_with = "deserialize_splice_sites")]
    splice_sites_affected: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct RawPeptide {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    #[serde(default)]
    length: Option<usize>,
    sequence: String,
    #[serde(default, rename = "pep_class_1", alias = "class_1")]
    class_1: String,
    #[serde(default, rename = "pep_class_2", alias = "class_2")]
    class_2: String,
}

#[derive(Debug, Deserialize)]
struct RawSpectrum {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    #[serde(default, alias = "spec_title")]
    title: String,
    #[serde(default, deserialize_with = "deserialize_opt_text")]
    fraction_id: Option<String>,
    #[serde(default, alias = "fragment_technique")]
    frag_technique: String,
    #[serde(default)]
    precursor_mz: Option<f64>,
    #[serde(default)]
    precursor_intensity: Option<f64>,
    #[serde(default)]
    retention_time: Option<f64>,
    #[serde(default)]
    proteases: String,
    #[serde(default)]
    spectrometer: String,
    #[serde(default, rename = "USI", alias = "usi")]
    usi: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSample {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    #[serde(default, rename = "tissue_name", alias = "tissue")]
    tissue: String,
    #[serde(
        default,
        rename = "individual_age",
        alias = "indiv_age",
        deserialize_with = "deserialize_opt_text"
    )]
    age: Option<String>,
    #[serde(default, rename = "individual_sex", alias = "indiv_sex")]
    sex: String,
    #[serde(default = "default_phenotype")]
    phenotype: String,
    #[serde(
        default,
        rename = "pride_project_accession",
        alias = "price_project_accession",
        alias = "pride_accession"
    )]
    accession: String,
}

/// An entity that can be read from a node property map.
pub trait FromNode: Sized {
    /// Node label, used in error messages.
    const KIND: &'static str;

    fn from_node(value: &Value) -> Result<Self, FerroError>;
}

fn parse_raw<T: DeserializeOwned>(kind: &'static str, value: &Value) -> Result<T, FerroError> {
    T::deserialize(value).map_err(|e| FerroError::InvalidNode {
        kind,
        id: node_id(value).unwrap_or_else(|| "?".to_string()),
        msg: e.to_string(),
    })
}

impl FromNode for Gene {
    const KIND: &'static str = "Gene";

    fn from_node(value: &Value) -> Result<Self, FerroError> {
        let raw: RawGene = parse_raw(Self::KIND, value)?;
        if raw.bp_from > raw.bp_to {
            return Err(FerroError::InvalidNode {
                kind: Self::KIND,
                id: raw.id,
                msg: format!("bp_from {} is past bp_to {}", raw.bp_from, raw.bp_to),
            });
        }
        Ok(Gene {
            id: raw.id,
            name: raw.name,
            version: raw.version,
            biotype: raw.biotype,
            bp_from: raw.bp_from,
            bp_to: raw.bp_to,
            strand: raw.strand,
            chromosome: raw.chrom.unwrap_or_default(),
            transcripts: Vec::new(),
            variants: Vec::new(),
        })
    }
}

impl FromNode for Exon {
    const KIND: &'static str = "Exon";

    fn from_node(value: &Value) -> Result<Self, FerroError> {
        let raw: RawExon = parse_raw(Self::KIND, value)?;
        Ok(Exon {
            id: raw.id,
            bp_from: raw.bp_from,
            bp_to: raw.bp_to,
        })
    }
}

impl FromNode for Variant {
    const KIND: &'static str = "Variant";

    fn from_node(value: &Value) -> Result<Self, FerroError> {
        let raw: RawVariant = parse_raw(Self::KIND, value)?;
        Ok(Variant {
            variant_type: VariantType::classify(&raw.reference, &raw.alternate),
            id: raw.id,
            location: raw.location,
            reference: raw.reference,
            alternate: raw.alternate,
        })
    }
}

impl FromNode for Transcript {
    const KIND: &'static str = "Transcript";

    fn from_node(value: &Value) -> Result<Self, FerroError> {
        let raw: RawTranscript = parse_raw(Self::KIND, value)?;
        Ok(Transcript {
            id: raw.id,
            biotype: raw.biotype,
            version: raw.version,
            cdna_sequence: raw.cdna_sequence,
            ensembl_canonical: raw.ensembl_canonical.unwrap_or(false),
            mane_select: raw.mane_select.unwrap_or(false),
            start_codon: raw.start,
            stop_codon: raw.stop,
            exons: Vec::new(),
            haplotypes: Vec::new(),
            haplotype_frequencies: Vec::new(),
            proteoforms: Vec::new(),
            canonical_protein: None,
        })
    }
}

impl FromNode for Haplotype {
    const KIND: &'static str = "Haplotype";

    fn from_node(value: &Value) -> Result<Self, FerroError> {
        let raw: RawHaplotype = parse_raw(Self::KIND, value)?;
        Ok(Haplotype {
            id: raw.id,
            included_variants: Vec::new(),
            matching_transcripts: Vec::new(),
        })
    }
}

impl FromNode for Proteoform {
    const KIND: &'static str = "Proteoform";

    fn from_node(value: &Value) -> Result<Self, FerroError> {
        let raw: RawProteoform = parse_raw(Self::KIND, value)?;
        Ok(Proteoform {
            length: raw.length.unwrap_or(raw.sequence.len()),
            id: raw.id,
            sequence: raw.sequence,
            reading_frame: raw.reading_frame,
            start_aa: raw.start_aa,
            cdna_changes: raw.cdna_changes,
            protein_changes: raw.protein_changes,
            splice_sites_affected: raw.splice_sites_affected,
            transcript: None,
            haplotype: None,
            matching_peptides: Vec::new(),
        })
    }
}

impl FromNode for Peptide {
    const KIND: &'static str = "Peptide";

    fn from_node(value: &Value) -> Result<Self, FerroError> {
        let raw: RawPeptide = parse_raw(Self::KIND, value)?;
        Ok(Peptide {
            length: raw.length.unwrap_or(raw.sequence.len()),
            id: raw.id,
            sequence: raw.sequence,
            class_1: raw.class_1,
            class_2: raw.class_2,
            psms: Vec::new(),
        })
    }
}

impl FromNode for Spectrum {
    const KIND: &'static str = "Spectrum";

    fn from_node(value: &Value) -> Result<Self, FerroError> {
        let raw: RawSpectrum = parse_raw(Self::KIND, value)?;
        Ok(Spectrum {
            id: raw.id,
            title: raw.title,
            fraction_id: raw.fraction_id,
            fragmentation_technique: raw.frag_technique,
            precursor_mz: raw.precursor_mz,
            precursor_intensity: raw.precursor_intensity,
            retention_time: raw.retention_time,
            proteases: raw.proteases,
            spectrometer: raw.spectrometer,
            usi: raw.usi,
            sample: None,
        })
    }
}

impl FromNode for Sample {
    const KIND: &'static str = "Sample";

    fn from_node(value: &Value) -> Result<Self, FerroError> {
        let raw: RawSample = parse_raw(Self::KIND, value)?;
        Ok(Sample {
            id: raw.id,
            tissue: raw.tissue,
            age: raw.age,
            sex: raw.sex,
            phenotype: raw.phenotype,
            accession: raw.accession,
        })
    }
}

// ============================================================================
// Edge properties
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct AltAlleleProps {
    pub var_order: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HaploFormProps {
    #[serde(default)]
    pub frequency: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MapsToProps {
    pub position: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MatchedToProps {
    #[serde(alias = "posterior_error_probability")]
    pub posterior_error_prob: f64,
    #[serde(default)]
    pub q_value: Option<f64>,
    #[serde(default, alias = "rt_Abs_error")]
    pub rt_abs_error: Option<f64>,
    #[serde(default)]
    pub spectra_angular_similarity: Option<f64>,
    #[serde(default, rename = "USI", alias = "usi")]
    pub usi: Option<String>,
}

/// Parse the properties of a `label` edge. Absent properties read as an
/// empty map.
pub(crate) fn edge_props<T: DeserializeOwned>(
    label: &str,
    properties: &Value,
) -> Result<T, FerroError> {
    let empty = Value::Object(serde_json::Map::new());
    let properties = if properties.is_null() {
        &empty
    } else {
        properties
    };
    T::deserialize(properties).map_err(|e| FerroError::InvalidRelationship {
        label: label.to_string(),
        msg: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_id_string_or_number() {
        assert_eq!(node_id(&json!({"id": "ENSG1"})), Some("ENSG1".to_string()));
        assert_eq!(node_id(&json!({"id": 42})), Some("42".to_string()));
        assert_eq!(node_id(&json!({"id": null})), None);
        assert_eq!(node_id(&json!({})), None);
    }

    #[test]
    fn test_gene_node() {
        let gene = Gene::from_node(&json!({
            "id": "ENSG00000100", "name": "ABC", "version": 3, "biotype": "protein_coding",
            "bp_from": 100, "bp_to": 9050, "strand": "-", "chrom": 22
        }))
        .unwrap();
        assert_eq!(gene.strand, Strand::Minus);
        assert_eq!(gene.chromosome, "22");
        assert_eq!(gene.version, Some(3));
    }

    #[test]
    fn test_gene_inverted_span_rejected() {
        let err = Gene::from_node(&json!({
            "id": "G", "bp_from": 200, "bp_to": 100, "strand": "+"
        }))
        .unwrap_err();
        assert!(matches!(err, FerroError::InvalidNode { kind: "Gene", .. }));
    }

    #[test]
    fn test_exon_missing_coordinate() {
        let err = Exon::from_node(&json!({"id": "E1", "bp_to": 10})).unwrap_err();
        match err {
            FerroError::InvalidNode { kind, id, .. } => {
                assert_eq!(kind, "Exon");
                assert_eq!(id, "E1");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_variant_node_classified() {
        let variant =
            Variant::from_node(&json!({"id": 7, "location": 120, "ref": "AG", "alt": "A"}))
                .unwrap();
        assert_eq!(variant.id, "7");
        assert_eq!(variant.variant_type, VariantType::Frameshift);
    }

    #[test]
    fn test_proteoform_splice_sites() {
        let dash = Proteoform::from_node(&json!({
            "id": "P1", "sequence": "MAK", "splice_sites_affected": "-"
        }))
        .unwrap();
        assert!(dash.splice_sites_affected.is_empty());
        assert_eq!(dash.length, 3);

        let listed = Proteoform::from_node(&json!({
            "id": "P2", "sequence": "MAK", "splice_sites_affected": "3;17"
        }))
        .unwrap();
        assert_eq!(listed.splice_sites_affected, vec![3, 17]);

        assert!(Proteoform::from_node(&json!({
            "id": "P3", "splice_sites_affected": "3;x"
        }))
        .is_err());
    }

    #[test]
    fn test_sample_defaults_and_aliases() {
        let sample = Sample::from_node(&json!({
            "id": "S1", "tissue_name": "liver", "individual_age": 45,
            "individual_sex": "F", "price_project_accession": "PXD000001"
        }))
        .unwrap();
        assert_eq!(sample.phenotype, "healthy");
        assert_eq!(sample.age.as_deref(), Some("45"));
        assert_eq!(sample.accession, "PXD000001");
    }

    #[test]
    fn test_matched_to_aliases() {
        let props: MatchedToProps = edge_props(
            "MATCHED_TO",
            &json!({"posterior_error_probability": 0.01, "rt_Abs_error": 1.5}),
        )
        .unwrap();
        assert_eq!(props.posterior_error_prob, 0.01);
        assert_eq!(props.rt_abs_error, Some(1.5));
    }

    #[test]
    fn test_edge_props_absent() {
        let props: HaploFormProps = edge_props("HAPLO_FORM_OF", &Value::Null).unwrap();
        assert_eq!(props.frequency, None);
        let err = edge_props::<MapsToProps>("MAPS_TO", &Value::Null).unwrap_err();
        assert!(matches!(err, FerroError::InvalidRelationship { .. }));
    }
}
