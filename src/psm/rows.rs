//! Packing peptide footprints into non-overlapping rows.

use serde::Serialize;

use super::category::{CategoryConfig, HighlightVariable};
use crate::graph::{EntityGraph, Peptide, PeptideIdx, PeptideMatch};

/// A peptide footprint assigned to a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedPeptide {
    pub peptide: PeptideIdx,
    pub position: i64,
    pub length: i64,
    pub colour: String,
    pub row: usize,
}

impl PlacedPeptide {
    /// End of the footprint, exclusive.
    pub fn end(&self) -> i64 {
        self.position + self.length
    }
}

/// Number of rows used by a packing.
pub fn row_count(placed: &[PlacedPeptide]) -> usize {
    placed.iter().map(|p| p.row + 1).max().unwrap_or(0)
}

/// Colours of the entries one peptide contributes.
fn entry_colours(graph: &EntityGraph, peptide: &Peptide, config: &CategoryConfig) -> Vec<String> {
    if config.highlight == HighlightVariable::PeptideClass {
        return vec![config.colour_of(&peptide.class_2).to_string()];
    }

    let mut seen: Vec<usize> = Vec::new();
    let mut unhighlighted = false;
    for psm in &peptide.psms {
        match config
            .attribute_of(graph, psm)
            .and_then(|value| config.category_index(value))
        {
            Some(idx) if !seen.contains(&idx) => seen.push(idx),
            Some(_) => {}
            None => unhighlighted = true,
        }
    }

    let mut colours: Vec<String> = seen
        .into_iter()
        .map(|idx| config.categories[idx].colour.clone())
        .collect();
    if unhighlighted {
        colours.push(config.other_colour.clone());
    }
    colours
}

/// Lay peptide footprints out in rows.
///
/// Footprints are visited by start, longer ones first on ties, and each goes
/// into the first row whose last footprint ended (plus `margin`) before it
/// starts. A new row is opened when none is free.
///
/// Grouping by a sample attribute gives one footprint per highlighted
/// category present in the peptide's PSMs, plus one in the "other" colour
/// when some PSM falls outside every category.
pub fn pack_rows(
    graph: &EntityGraph,
    matches: &[PeptideMatch],
    config: &CategoryConfig,
    margin: i64,
) -> Vec<PlacedPeptide> {
    let mut order: Vec<&PeptideMatch> = matches.iter().collect();
    order.sort_by_key(|m| (m.position, std::cmp::Reverse(graph[m.peptide].length)));

    let mut row_ends: Vec<i64> = Vec::new();
    let mut placed = Vec::with_capacity(order.len());
    for m in order {
        let peptide = &graph[m.peptide];
        let length = peptide.length as i64;
        for colour in entry_colours(graph, peptide, config) {
            let row = match row_ends.iter().position(|&end| end < m.position) {
                Some(row) => row,
                None => {
                    row_ends.push(i64::MIN);
                    row_ends.len() - 1
                }
            };
            row_ends[row] = m.position + length + margin;
            placed.push(PlacedPeptide {
                peptide: m.peptide,
                position: m.position,
                length,
                colour,
                row,
            });
        }
    }
    placed
}
