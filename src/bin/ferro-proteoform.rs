// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-proteoform CLI
//!
//! Command-line interface for hydrating proteogenomic graph records and
//! computing the browser layouts derived from them.

use clap::{Parser, Subcommand};
use ferro_proteoform::cli::{
    alignment_input, coding_footprint, load_records, require_proteoform, require_transcript,
    GraphSummary, OutputFormat,
};
use ferro_proteoform::config::ProteoviewConfig;
use ferro_proteoform::graph::{
    hydrate_gene, hydrate_proteoform, GeneSubgraph, ProteoformSubgraph, WireRecord,
};
use ferro_proteoform::psm::{pack_rows, psm_histogram, row_count};
use ferro_proteoform::sequence::align_sequences;
use ferro_proteoform::splicing::{transcript_track, SplicedTranscript, SplicingAlignment};
use ferro_proteoform::FerroError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "ferro-proteoform")]
#[command(author, version, about = "Proteogenomic graph hydration and layout")]
#[command(long_about = "Hydrate graph query records and compute browser layouts.

Input files hold one query record or a JSON array of records, in either the
triple shape (nodes/relationships/rel_props) or the serialized shape
(root/relationships). Use - to read from stdin.

Examples:
  ferro-proteoform hydrate -i gene.json
  ferro-proteoform align-exons -i gene.json --transcript ENST00000311936
  ferro-proteoform align-sequences -i gene.json --proteoform prot_1234
  ferro-proteoform psm -i peptides.json --highlight tissue -f json")]
struct Cli {
    /// Configuration file (defaults to .ferro.toml or ~/.config/ferro/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hydrate records and print a summary of each graph
    Hydrate {
        /// Input JSON file (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Root node type of the records
        #[arg(long, default_value = "gene", value_parser = ["gene", "proteoform"])]
        root: String,

        /// Output format
        #[arg(short = 'f', long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Lay out the exons of a transcript with abbreviated introns
    AlignExons {
        /// Input JSON file with gene-centric records (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Transcript to lay out
        #[arg(long)]
        transcript: String,

        /// Proteoform whose peptides are drawn on the track
        #[arg(long)]
        proteoform: Option<String>,

        /// Screen width in pixels
        #[arg(long, default_value = "1000")]
        width: f64,

        /// Share of the width given to exons (overrides the config file)
        #[arg(long)]
        exon_fraction: Option<f64>,

        /// Output format
        #[arg(short = 'f', long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Align a proteoform's alternate sequence against its transcript
    AlignSequences {
        /// Input JSON file with gene-centric records (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Haplotype proteoform to align
        #[arg(long)]
        proteoform: String,

        /// Output format
        #[arg(short = 'f', long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Summarise the PSM evidence of a proteoform
    Psm {
        /// Input JSON file with peptide-centric records (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Proteoform to summarise (defaults to the root of each record)
        #[arg(long)]
        proteoform: Option<String>,

        /// Group evidence by pep_class2 or a sample attribute (overrides the config file)
        #[arg(long)]
        highlight: Option<String>,

        /// Output format
        #[arg(short = 'f', long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let config = match &cli.config {
        Some(path) => ProteoviewConfig::load_from_path(path)?,
        None => ProteoviewConfig::load().unwrap_or_default(),
    };

    match cli.command {
        Commands::Hydrate {
            input,
            root,
            format,
        } => run_hydrate(&input, &root, OutputFormat::from_str(&format)?),
        Commands::AlignExons {
            input,
            transcript,
            proteoform,
            width,
            exon_fraction,
            format,
        } => run_align_exons(
            &input,
            &transcript,
            proteoform.as_deref(),
            width,
            &config.merge_with_cli(None, exon_fraction),
            OutputFormat::from_str(&format)?,
        ),
        Commands::AlignSequences {
            input,
            proteoform,
            format,
        } => run_align_sequences(&input, &proteoform, OutputFormat::from_str(&format)?),
        Commands::Psm {
            input,
            proteoform,
            highlight,
            format,
        } => run_psm(
            &input,
            proteoform.as_deref(),
            &config.merge_with_cli(highlight.as_deref(), None),
            OutputFormat::from_str(&format)?,
        ),
    }
}

fn init_tracing(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| format!("Invalid log level '{}': {}", level, e))?,
    };

    // log records from the library are bridged by the subscriber's log tracer
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// First gene record whose graph contains the transcript or proteoform `id`.
fn find_gene_subgraph(records: &[WireRecord], id: &str) -> Result<GeneSubgraph, FerroError> {
    records
        .iter()
        .filter_map(|record| match hydrate_gene(record) {
            Ok(subgraph) => Some(subgraph),
            Err(e) => {
                log::warn!("Skipping gene record: {}", e);
                None
            }
        })
        .find(|sub| {
            sub.graph.find_transcript(id).is_some() || sub.graph.find_proteoform(id).is_some()
        })
        .ok_or_else(|| FerroError::InvalidNode {
            kind: "Transcript",
            id: id.to_string(),
            msg: "not found in any record".to_string(),
        })
}

fn run_hydrate(
    input: &Path,
    root: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = load_records(input)?;

    for (idx, record) in records.iter().enumerate() {
        let (graph, root_id, dropped, json) = if root == "proteoform" {
            let ProteoformSubgraph {
                graph,
                root,
                dropped_relationships,
            } = hydrate_proteoform(record)?;
            let json = serde_json::to_value(&graph)?;
            let root_id = graph[root].id.clone();
            (graph, root_id, dropped_relationships, json)
        } else {
            let GeneSubgraph {
                graph,
                root,
                dropped_relationships,
            } = hydrate_gene(record)?;
            let json = serde_json::to_value(&graph)?;
            let root_id = graph[root].id.clone();
            (graph, root_id, dropped_relationships, json)
        };

        let summary = GraphSummary::from_graph(&graph, dropped);
        match format {
            OutputFormat::Json => print_json(&serde_json::json!({
                "root": root_id,
                "summary": summary,
                "graph": json,
            }))?,
            OutputFormat::Text => {
                println!("# record {} (root {})", idx, root_id);
                println!("{}", summary);
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct ExonLayout {
    bp_from: i64,
    bp_to: i64,
    x_from: Option<f64>,
    x_to: Option<f64>,
}

fn run_align_exons(
    input: &Path,
    transcript_id: &str,
    proteoform_id: Option<&str>,
    width: f64,
    config: &ProteoviewConfig,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = load_records(input)?;
    let sub = find_gene_subgraph(&records, transcript_id)?;
    let graph = &sub.graph;
    let gene = &graph[sub.root];
    let transcript = require_transcript(graph, transcript_id)?;
    let proteoform = proteoform_id
        .map(|id| require_proteoform(graph, id))
        .transpose()?;

    let alignment = SplicingAlignment::with_fraction(
        &graph.gene_exon_spans(sub.root),
        gene.strand,
        config.exon_fraction(),
    )?
    .covering(gene.bp_from, gene.bp_to);
    let spliced = SplicedTranscript::new(&graph.exon_spans(transcript), gene.strand);
    let footprint = coding_footprint(graph, transcript, proteoform, gene.strand);
    let track = transcript_track(&alignment, &spliced, &footprint, &config.track_style(), width);

    let exons: Vec<ExonLayout> = spliced
        .exons()
        .iter()
        .map(|exon| {
            let span = alignment.span_to_screen(exon.bp_from, exon.bp_to, width);
            ExonLayout {
                bp_from: exon.bp_from,
                bp_to: exon.bp_to,
                x_from: span.map(|(from, _)| from),
                x_to: span.map(|(_, to)| to),
            }
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "gene": gene.id,
            "transcript": transcript_id,
            "strand": gene.strand,
            "exon_bp": alignment.exon_bp(),
            "regions": alignment.regions(),
            "exons": exons,
            "track": track,
        }))?,
        OutputFormat::Text => {
            println!(
                "{} {} ({}), {} exon bp",
                gene.id,
                transcript_id,
                gene.strand,
                alignment.exon_bp()
            );
            println!("regions:");
            for region in alignment.regions() {
                println!(
                    "  {:?}\t{}\t{}\t{} bp",
                    region.region_type,
                    region.from,
                    region.to,
                    region.len()
                );
            }
            println!("exons:");
            for exon in &exons {
                let fmt_x = |x: Option<f64>| x.map_or("-".to_string(), |x| format!("{:.1}", x));
                println!(
                    "  {}-{}\t{}\t{}",
                    exon.bp_from,
                    exon.bp_to,
                    fmt_x(exon.x_from),
                    fmt_x(exon.x_to)
                );
            }
            println!("track:");
            for rect in &track.exons {
                println!("  {:.1}\t{:.1}\t{}", rect.x, rect.x + rect.width, rect.colour);
            }
        }
    }
    Ok(())
}

fn run_align_sequences(
    input: &Path,
    proteoform_id: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = load_records(input)?;
    let sub = find_gene_subgraph(&records, proteoform_id)?;
    let proteoform = require_proteoform(&sub.graph, proteoform_id)?;
    let alignment = align_sequences(&alignment_input(&sub.graph, proteoform)?)
        .map_err(|e| e.detailed_message())?;

    match format {
        OutputFormat::Json => print_json(&alignment)?,
        OutputFormat::Text => {
            println!("ref cDNA: {}", alignment.ref_cdna);
            println!("alt cDNA: {}", alignment.alt_cdna);
            println!("ref protein: {}", alignment.ref_protein);
            println!("alt protein: {}", alignment.alt_protein);
            for segment in &alignment.segments {
                println!(
                    "{:?}\t{}-{}\t{} > {}\t{} > {}",
                    segment.kind,
                    segment.bp_from,
                    segment.bp_to,
                    segment.ref_cdna,
                    segment.alt_cdna,
                    segment.ref_protein,
                    segment.alt_protein
                );
            }
        }
    }
    Ok(())
}

fn run_psm(
    input: &Path,
    proteoform_id: Option<&str>,
    config: &ProteoviewConfig,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = load_records(input)?;
    let categories = config.category_config();

    for record in &records {
        let sub = match hydrate_proteoform(record) {
            Ok(sub) => sub,
            Err(e) => {
                log::warn!("Skipping proteoform record: {}", e);
                continue;
            }
        };
        let proteoform = match proteoform_id {
            Some(id) => match sub.graph.find_proteoform(id) {
                Some(p) => p,
                None => continue,
            },
            None => sub.root,
        };

        let matches = &sub.graph[proteoform].matching_peptides;
        let histogram = psm_histogram(&sub.graph, matches, &categories);
        let rows = pack_rows(&sub.graph, matches, &categories, config.peptide_margin());

        match format {
            OutputFormat::Json => print_json(&serde_json::json!({
                "proteoform": sub.graph[proteoform].id,
                "histogram": histogram,
                "peptides": rows,
            }))?,
            OutputFormat::Text => {
                println!(
                    "# {}: {} peptides in {} rows, max {} PSMs",
                    sub.graph[proteoform].id,
                    matches.len(),
                    row_count(&rows),
                    histogram.max_count()
                );
                println!("position\t{}", histogram.group_names.join("\t"));
                for (i, position) in histogram.positions.iter().enumerate() {
                    let counts: Vec<String> = histogram
                        .counts
                        .iter()
                        .map(|series| series[i].to_string())
                        .collect();
                    println!("{}\t{}", position, counts.join("\t"));
                }
                for placed in &rows {
                    println!(
                        "row {}\t{}\t{}-{}\t{}",
                        placed.row,
                        sub.graph[placed.peptide].sequence,
                        placed.position,
                        placed.end(),
                        placed.colour
                    );
                }
            }
        }
    }
    Ok(())
}
