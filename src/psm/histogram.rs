//! Per-residue PSM counts along a proteoform.

use serde::Serialize;

use super::category::CategoryConfig;
use crate::graph::{EntityGraph, PeptideMatch};

/// Step function of PSM counts per group.
///
/// Between `positions[i]` and `positions[i + 1]` group `g` has
/// `counts[g][i]` PSMs covering the residue, and `totals[i]` is the largest
/// of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PsmHistogram {
    pub positions: Vec<i64>,
    pub counts: Vec<Vec<usize>>,
    pub totals: Vec<usize>,
    pub group_names: Vec<String>,
    pub group_colours: Vec<String>,
}

impl PsmHistogram {
    /// Largest count anywhere.
    pub fn max_count(&self) -> usize {
        self.totals.iter().copied().max().unwrap_or(0)
    }
}

/// Sweep the peptides of a proteoform into a [`PsmHistogram`].
///
/// Every peptide contributes a start event at its position and an end event
/// `length` residues later for each group it has PSMs in. Events are sorted
/// stably by position and the histogram records the counts after each one.
pub fn psm_histogram(
    graph: &EntityGraph,
    matches: &[PeptideMatch],
    config: &CategoryConfig,
) -> PsmHistogram {
    let group_names = config.group_names();

    // (position, group, signed count)
    let mut events: Vec<(i64, usize, i64)> = Vec::new();
    for m in matches {
        let peptide = &graph[m.peptide];
        let Some(counts) = config.group_counts(graph, peptide) else {
            log::debug!(
                "Peptide {} has class '{}' outside the configured categories",
                peptide.id,
                peptide.class_2
            );
            continue;
        };
        let end = m.position + peptide.length as i64;
        for (group, &count) in counts.iter().enumerate().filter(|(_, &c)| c > 0) {
            events.push((m.position, group, count as i64));
            events.push((end, group, -(count as i64)));
        }
    }
    events.sort_by_key(|&(pos, _, _)| pos);

    let mut histogram = PsmHistogram {
        counts: vec![Vec::with_capacity(events.len()); group_names.len()],
        group_colours: config.group_colours(),
        group_names,
        ..PsmHistogram::default()
    };
    let mut current = vec![0i64; histogram.group_names.len()];
    for (pos, group, delta) in events {
        current[group] += delta;
        histogram.positions.push(pos);
        for (series, &value) in histogram.counts.iter_mut().zip(&current) {
            series.push(value.max(0) as usize);
        }
        histogram
            .totals
            .push(current.iter().copied().max().unwrap_or(0).max(0) as usize);
    }
    histogram
}
