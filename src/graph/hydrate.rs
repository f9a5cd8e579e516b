//! Reconstruction of linked entities from flattened query records.
//!
//! Each call owns one id-keyed arena per entity type. Every relationship is
//! processed atomically: edge properties are parsed and both endpoints are
//! prepared before anything is inserted, so a malformed triple leaves no
//! half-linked entities behind. Malformed triples are logged and counted,
//! and hydration carries on with the rest of the record.
//!
//! Relationships are applied in record order. Two pieces of state need the
//! whole record before they are final:
//!
//! - haplotype variant lists, built from `var_order` slots that may arrive
//!   out of order or with gaps;
//! - the canonical protein of each transcript.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use super::model::{
    EntityGraph, Exon, ExonIdx, Gene, GeneIdx, Haplotype, HaplotypeIdx, Peptide, PeptideIdx,
    PeptideMatch, Proteoform, ProteoformIdx, Psm, Sample, SampleIdx, Spectrum, SpectrumIdx,
    Transcript, TranscriptIdx, Variant, VariantIdx,
};
use super::node::{
    edge_props, node_id, AltAlleleProps, FromNode, HaploFormProps, MapsToProps, MatchedToProps,
};
use super::record::{QueryRecord, Relationship};
use crate::error::FerroError;

/// Hydrated gene-centric subgraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneSubgraph {
    pub graph: EntityGraph,
    pub root: GeneIdx,
    /// Relationships skipped because they could not be parsed.
    pub dropped_relationships: usize,
}

/// Hydrated peptide-centric subgraph of one proteoform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProteoformSubgraph {
    pub graph: EntityGraph,
    pub root: ProteoformIdx,
    pub dropped_relationships: usize,
}

/// Entities of one type keyed by node id.
#[derive(Debug)]
struct Arena<T> {
    items: Vec<T>,
    by_id: HashMap<String, usize>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            by_id: HashMap::new(),
        }
    }
}

/// An endpoint ready to be committed.
enum Slot<T> {
    Known(usize),
    Fresh(String, T),
}

impl<T: FromNode> Arena<T> {
    fn prepare(&self, node: &Value) -> Result<Slot<T>, FerroError> {
        let id = node_id(node).ok_or_else(|| FerroError::InvalidNode {
            kind: T::KIND,
            id: "?".to_string(),
            msg: "node has no id".to_string(),
        })?;
        match self.by_id.get(&id) {
            Some(&idx) => Ok(Slot::Known(idx)),
            None => Ok(Slot::Fresh(id, T::from_node(node)?)),
        }
    }

    fn commit(&mut self, slot: Slot<T>) -> usize {
        match slot {
            Slot::Known(idx) => idx,
            Slot::Fresh(id, item) => {
                let idx = self.items.len();
                self.items.push(item);
                self.by_id.insert(id, idx);
                idx
            }
        }
    }
}

/// Prepare both endpoints, then commit them.
fn endpoints<A: FromNode, B: FromNode>(
    starts: &mut Arena<A>,
    ends: &mut Arena<B>,
    rel: &Relationship<'_>,
) -> Result<(usize, usize), FerroError> {
    let start = starts.prepare(rel.start)?;
    let end = ends.prepare(rel.end)?;
    Ok((starts.commit(start), ends.commit(end)))
}

#[derive(Debug, Default)]
struct Hydrator {
    genes: Arena<Gene>,
    transcripts: Arena<Transcript>,
    exons: Arena<Exon>,
    variants: Arena<Variant>,
    haplotypes: Arena<Haplotype>,
    proteoforms: Arena<Proteoform>,
    peptides: Arena<Peptide>,
    spectra: Arena<Spectrum>,
    samples: Arena<Sample>,
    /// `var_order` slots per haplotype.
    pending_variants: HashMap<usize, Vec<Option<VariantIdx>>>,
    /// Largest `var_order` accepted, the record's relationship count.
    max_var_order: usize,
    dropped: usize,
}

impl Hydrator {
    fn apply_all(&mut self, record: &impl QueryRecord) {
        let relationships = record.relationships();
        self.max_var_order = relationships.len();
        for rel in relationships {
            match self.apply(&rel) {
                Ok(true) => {}
                Ok(false) => log::trace!("Ignoring relationship label {}", rel.label),
                Err(e) => {
                    log::warn!("Dropping {} relationship: {}", rel.label, e);
                    self.dropped += 1;
                }
            }
        }
    }

    /// Link one relationship. `Ok(false)` for labels that are not modelled.
    fn apply(&mut self, rel: &Relationship<'_>) -> Result<bool, FerroError> {
        match rel.label {
            "TRANSCRIPT_OF" => {
                let (t, g) = endpoints(&mut self.transcripts, &mut self.genes, rel)?;
                self.genes.items[g].transcripts.push(TranscriptIdx(t));
            }
            "VARIANT_MAPS_TO" => {
                let (v, g) = endpoints(&mut self.variants, &mut self.genes, rel)?;
                self.genes.items[g].variants.push(VariantIdx(v));
            }
            "INCLUDES_EXON" => {
                let (t, e) = endpoints(&mut self.transcripts, &mut self.exons, rel)?;
                self.transcripts.items[t].exons.push(ExonIdx(e));
            }
            "INCLUDES_ALT_ALLELE" => {
                let props: AltAlleleProps = edge_props(rel.label, rel.properties)?;
                if props.var_order > self.max_var_order {
                    return Err(FerroError::InvalidRelationship {
                        label: rel.label.to_string(),
                        msg: format!(
                            "var_order {} exceeds the {} relationships in the record",
                            props.var_order, self.max_var_order
                        ),
                    });
                }
                let (h, v) = endpoints(&mut self.haplotypes, &mut self.variants, rel)?;
                let slots = self.pending_variants.entry(h).or_default();
                if props.var_order >= slots.len() {
                    slots.resize(props.var_order + 1, None);
                }
                slots[props.var_order] = Some(VariantIdx(v));
            }
            "HAPLO_FORM_OF" => {
                let props: HaploFormProps = edge_props(rel.label, rel.properties)?;
                let (h, t) = endpoints(&mut self.haplotypes, &mut self.transcripts, rel)?;
                let transcript = &mut self.transcripts.items[t];
                transcript.haplotypes.push(HaplotypeIdx(h));
                transcript.haplotype_frequencies.push(props.frequency);
                self.haplotypes.items[h]
                    .matching_transcripts
                    .push(TranscriptIdx(t));
            }
            "ENCODED_BY_HAPLOTYPE" => {
                let (p, h) = endpoints(&mut self.proteoforms, &mut self.haplotypes, rel)?;
                self.proteoforms.items[p].haplotype = Some(HaplotypeIdx(h));
            }
            "ENCODED_BY_TRANSCRIPT" => {
                let (p, t) = endpoints(&mut self.proteoforms, &mut self.transcripts, rel)?;
                self.proteoforms.items[p].transcript = Some(TranscriptIdx(t));
                self.transcripts.items[t].proteoforms.push(ProteoformIdx(p));
            }
            "MAPS_TO" => {
                let props: MapsToProps = edge_props(rel.label, rel.properties)?;
                let (pep, p) = endpoints(&mut self.peptides, &mut self.proteoforms, rel)?;
                self.proteoforms.items[p].matching_peptides.push(PeptideMatch {
                    peptide: PeptideIdx(pep),
                    position: props.position,
                });
            }
            "MATCHED_TO" => {
                let props: MatchedToProps = edge_props(rel.label, rel.properties)?;
                let (pep, s) = endpoints(&mut self.peptides, &mut self.spectra, rel)?;
                if props.usi.is_some() {
                    self.spectra.items[s].usi = props.usi;
                }
                self.peptides.items[pep].insert_psm(Psm {
                    spectrum: SpectrumIdx(s),
                    pep: props.posterior_error_prob,
                    q_value: props.q_value,
                    rt_error: props.rt_abs_error,
                    spectral_similarity: props.spectra_angular_similarity,
                });
            }
            "MEASURED_FROM" => {
                let (s, sample) = endpoints(&mut self.spectra, &mut self.samples, rel)?;
                self.spectra.items[s].sample = Some(SampleIdx(sample));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Resolve deferred state and hand over the entities.
    fn finish(mut self) -> EntityGraph {
        for (h, slots) in self.pending_variants.drain() {
            self.haplotypes.items[h].included_variants = slots.into_iter().flatten().collect();
        }

        for (p, proteoform) in self.proteoforms.items.iter().enumerate() {
            let (Some(t), true) = (proteoform.transcript, proteoform.is_canonical()) else {
                continue;
            };
            let transcript = &mut self.transcripts.items[t.0];
            match transcript.canonical_protein {
                None => transcript.canonical_protein = Some(ProteoformIdx(p)),
                Some(first) => log::warn!(
                    "Transcript {} has several canonical proteoforms; keeping {}, ignoring {}",
                    transcript.id,
                    self.proteoforms.items[first.0].id,
                    proteoform.id
                ),
            }
        }

        EntityGraph {
            genes: self.genes.items,
            transcripts: self.transcripts.items,
            exons: self.exons.items,
            variants: self.variants.items,
            haplotypes: self.haplotypes.items,
            proteoforms: self.proteoforms.items,
            peptides: self.peptides.items,
            spectra: self.spectra.items,
            samples: self.samples.items,
        }
    }
}

fn root_of(record: &impl QueryRecord, kind: &str) -> Result<Value, FerroError> {
    record.root().cloned().ok_or_else(|| FerroError::MissingRoot {
        msg: format!("record has no {} root node", kind),
    })
}

/// Hydrate a gene-centric record whose root node is a Gene.
pub fn hydrate_gene(record: &impl QueryRecord) -> Result<GeneSubgraph, FerroError> {
    let root = root_of(record, Gene::KIND)?;
    let mut hydrator = Hydrator::default();
    let slot = hydrator.genes.prepare(&root)?;
    let root = GeneIdx(hydrator.genes.commit(slot));
    hydrator.apply_all(record);
    let dropped_relationships = hydrator.dropped;
    Ok(GeneSubgraph {
        graph: hydrator.finish(),
        root,
        dropped_relationships,
    })
}

/// Hydrate a peptide-centric record whose root node is a Proteoform.
pub fn hydrate_proteoform(record: &impl QueryRecord) -> Result<ProteoformSubgraph, FerroError> {
    let root = root_of(record, Proteoform::KIND)?;
    let mut hydrator = Hydrator::default();
    let slot = hydrator.proteoforms.prepare(&root)?;
    let root = ProteoformIdx(hydrator.proteoforms.commit(slot));
    hydrator.apply_all(record);
    let dropped_relationships = hydrator.dropped;
    Ok(ProteoformSubgraph {
        graph: hydrator.finish(),
        root,
        dropped_relationships,
    })
}

/// Hydrate every record, skipping those whose root is missing or invalid.
pub fn hydrate_genes<R: QueryRecord>(records: &[R]) -> Vec<GeneSubgraph> {
    records
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| match hydrate_gene(record) {
            Ok(subgraph) => Some(subgraph),
            Err(e) => {
                log::warn!("Skipping gene record {}: {}", idx, e);
                None
            }
        })
        .collect()
}

/// Hydrate every record, skipping those whose root is missing or invalid.
pub fn hydrate_proteoforms<R: QueryRecord>(records: &[R]) -> Vec<ProteoformSubgraph> {
    records
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| match hydrate_proteoform(record) {
            Ok(subgraph) => Some(subgraph),
            Err(e) => {
                log::warn!("Skipping proteoform record {}: {}", idx, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::record::{SerializedRecord, TripleRecord};
    use serde_json::json;

    fn gene_node() -> Value {
        json!({"id": "G1", "name": "ABC", "bp_from": 100, "bp_to": 9050, "strand": "+", "chrom": "1"})
    }

    fn record(relationships: Value, rel_props: Value) -> TripleRecord {
        serde_json::from_value(json!({
            "nodes": [gene_node()],
            "relationships": relationships,
            "rel_props": rel_props,
        }))
        .unwrap()
    }

    #[test]
    fn test_transcript_and_exons() {
        let rec = record(
            json!([
                [{"id": "T1"}, "TRANSCRIPT_OF", gene_node()],
                [{"id": "T1"}, "INCLUDES_EXON", {"id": "E1", "bp_from": 100, "bp_to": 200}],
                [{"id": "T1"}, "INCLUDES_EXON", {"id": "E2", "bp_from": 5000, "bp_to": 5100}],
            ]),
            json!([{}, {}, {}]),
        );
        let sub = hydrate_gene(&rec).unwrap();
        let gene = &sub.graph[sub.root];
        assert_eq!(gene.transcripts.len(), 1);
        let transcript = &sub.graph[gene.transcripts[0]];
        assert_eq!(transcript.exons.len(), 2);
        assert_eq!(sub.graph.exon_spans(gene.transcripts[0]), vec![(100, 200), (5000, 5100)]);
        assert_eq!(sub.dropped_relationships, 0);
    }

    #[test]
    fn test_nodes_reused_by_id() {
        let rec = record(
            json!([
                [{"id": "T1"}, "TRANSCRIPT_OF", gene_node()],
                [{"id": "T1"}, "TRANSCRIPT_OF", gene_node()],
            ]),
            json!([]),
        );
        let sub = hydrate_gene(&rec).unwrap();
        assert_eq!(sub.graph.genes().len(), 1);
        assert_eq!(sub.graph.transcripts().len(), 1);
    }

    #[test]
    fn test_var_order_slots() {
        let rec = record(
            json!([
                [{"id": "H1"}, "INCLUDES_ALT_ALLELE", {"id": "V2", "location": 9, "ref": "A", "alt": "G"}],
                [{"id": "H1"}, "INCLUDES_ALT_ALLELE", {"id": "V0", "location": 3, "ref": "C", "alt": "T"}],
            ]),
            json!([{"var_order": 2}, {"var_order": 0}]),
        );
        let sub = hydrate_gene(&rec).unwrap();
        let haplotype = &sub.graph.haplotypes()[0];
        let ids: Vec<&str> = haplotype
            .included_variants
            .iter()
            .map(|&v| sub.graph[v].id.as_str())
            .collect();
        assert_eq!(ids, vec!["V0", "V2"]);
    }

    #[test]
    fn test_var_order_out_of_range_dropped() {
        let rec = record(
            json!([
                [{"id": "H1"}, "INCLUDES_ALT_ALLELE", {"id": "V9", "location": 9, "ref": "A", "alt": "G"}],
                [{"id": "H1"}, "INCLUDES_ALT_ALLELE", {"id": "V0", "location": 3, "ref": "C", "alt": "T"}],
            ]),
            json!([{"var_order": 1_152_921_504_606_846_976u64}, {"var_order": 0}]),
        );
        let sub = hydrate_gene(&rec).unwrap();
        assert_eq!(sub.dropped_relationships, 1);
        let haplotype = &sub.graph.haplotypes()[0];
        assert_eq!(haplotype.included_variants.len(), 1);
        assert_eq!(sub.graph[haplotype.included_variants[0]].id, "V0");
        assert!(sub.graph.variants().iter().all(|v| v.id != "V9"));
    }

    #[test]
    fn test_bad_triple_dropped_atomically() {
        let rec = record(
            json!([
                [{"id": "T1"}, "INCLUDES_EXON", {"id": "E1", "bp_to": 200}],
                [{"id": "H1"}, "INCLUDES_ALT_ALLELE", {"id": "V1", "location": 3, "ref": "C", "alt": "T"}],
            ]),
            json!([{}, {}]),
        );
        let sub = hydrate_gene(&rec).unwrap();
        assert_eq!(sub.dropped_relationships, 2);
        // neither endpoint of the failed exon edge was created
        assert!(sub.graph.transcripts().is_empty());
        assert!(sub.graph.haplotypes().is_empty());
    }

    #[test]
    fn test_unknown_label_ignored() {
        let rec = record(json!([[{"id": "E1"}, "EXON_PART_OF", gene_node()]]), json!([]));
        let sub = hydrate_gene(&rec).unwrap();
        assert_eq!(sub.dropped_relationships, 0);
        assert!(sub.graph.exons().is_empty());
    }

    #[test]
    fn test_canonical_protein_deferred() {
        let rec = record(
            json!([
                [{"id": "P0"}, "ENCODED_BY_TRANSCRIPT", {"id": "T1"}],
                [{"id": "P1"}, "ENCODED_BY_TRANSCRIPT", {"id": "T1"}],
                [{"id": "P0"}, "ENCODED_BY_HAPLOTYPE", {"id": "H1"}],
                [{"id": "P2"}, "ENCODED_BY_TRANSCRIPT", {"id": "T1"}],
            ]),
            json!([]),
        );
        let sub = hydrate_gene(&rec).unwrap();
        let t = sub.graph.find_transcript("T1").unwrap();
        let canonical = sub.graph[t].canonical_protein.unwrap();
        assert_eq!(sub.graph[canonical].id, "P1");
        assert_eq!(sub.graph[t].proteoforms.len(), 3);
    }

    #[test]
    fn test_missing_root() {
        let rec = TripleRecord::default();
        assert!(matches!(
            hydrate_gene(&rec),
            Err(FerroError::MissingRoot { .. })
        ));
    }

    #[test]
    fn test_proteoform_root_with_psms() {
        let rec: SerializedRecord = serde_json::from_value(json!({
            "root": {"id": "P1", "sequence": "MAKTEPLGW"},
            "relationships": [
                {"start": {"id": "PEP1", "sequence": "KTEP"}, "end": {"id": "P1"},
                 "label": "MAPS_TO", "properties": {"position": 2}},
                {"start": {"id": "PEP1"}, "end": {"id": "S1"}, "label": "MATCHED_TO",
                 "properties": {"posterior_error_prob": 0.2, "USI": "mzspec:1"}},
                {"start": {"id": "PEP1"}, "end": {"id": "S2"}, "label": "MATCHED_TO",
                 "properties": {"posterior_error_prob": 0.01}},
                {"start": {"id": "S1"}, "end": {"id": "X1", "tissue_name": "liver"},
                 "label": "MEASURED_FROM"},
            ]
        }))
        .unwrap();
        let sub = hydrate_proteoform(&rec).unwrap();
        let proteoform = &sub.graph[sub.root];
        assert_eq!(proteoform.matching_peptides.len(), 1);
        let peptide = &sub.graph[proteoform.matching_peptides[0].peptide];
        let peps: Vec<f64> = peptide.psms.iter().map(|p| p.pep).collect();
        assert_eq!(peps, vec![0.01, 0.2]);
        let best_spectrum = &sub.graph[peptide.psms[1].spectrum];
        assert_eq!(best_spectrum.usi.as_deref(), Some("mzspec:1"));
        assert_eq!(sub.graph.sample_of(&peptide.psms[1]).unwrap().tissue, "liver");
    }

    #[test]
    fn test_batch_skips_bad_roots() {
        let good = record(json!([]), json!([]));
        let bad: TripleRecord =
            serde_json::from_value(json!({"nodes": [{"id": "G2"}], "relationships": []})).unwrap();
        let subs = hydrate_genes(&[good.clone(), bad, good]);
        assert_eq!(subs.len(), 2);
    }
}
