//! Splitting displayed sequence around variant alleles.

use super::change::ProteinChange;
use super::clamped_slice;

/// Which allele of a change to place into the split sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlleleSide {
    Reference,
    Alternate,
}

/// Split `sequence`, which starts at residue `window_start`, into
/// alternating plain and allele pieces.
///
/// The result always has odd length: even indices hold plain sequence and
/// odd indices hold the allele of a change falling inside the window.
/// Alternate positions are shifted by `alt_offset` (the `start_aa` of the
/// alternate proteoform).
pub fn split_at_changes(
    changes: &[ProteinChange],
    side: AlleleSide,
    window_start: i64,
    sequence: &str,
    alt_offset: i64,
) -> Vec<String> {
    let len = sequence.len() as i64;
    let located: Vec<(i64, &str)> = changes
        .iter()
        .map(|change| match side {
            AlleleSide::Reference => (change.ref_position, change.reference.as_str()),
            AlleleSide::Alternate => {
                (change.alt_position + alt_offset, change.alternate.as_str())
            }
        })
        .map(|(pos, allele)| (pos - window_start, allele))
        .filter(|(loc, _)| (0..len).contains(loc))
        .collect();

    let Some(&(first, _)) = located.first() else {
        return vec![sequence.to_string()];
    };

    let mut pieces = vec![clamped_slice(sequence, 0, first).to_string()];
    for (idx, &(loc, allele)) in located.iter().enumerate() {
        pieces.push(allele.to_string());
        let after = loc + allele.len() as i64;
        let until = located.get(idx + 1).map_or(len, |&(next, _)| next);
        pieces.push(clamped_slice(sequence, after, until).to_string());
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::parse_protein_changes;

    #[test]
    fn test_split_no_changes_in_window() {
        let changes = parse_protein_changes("50:K>50:R").unwrap();
        assert_eq!(
            split_at_changes(&changes, AlleleSide::Reference, 0, "MAKT", 0),
            vec!["MAKT"]
        );
    }

    #[test]
    fn test_split_reference() {
        let changes = parse_protein_changes("12:K>12:R;14:E>14:D").unwrap();
        let pieces = split_at_changes(&changes, AlleleSide::Reference, 10, "MAKTEPL", 0);
        assert_eq!(pieces, vec!["MA", "K", "T", "E", "PL"]);
    }

    #[test]
    fn test_split_alternate_with_offset() {
        let changes = parse_protein_changes("12:K>12:RR").unwrap();
        let pieces = split_at_changes(&changes, AlleleSide::Alternate, 12, "MRRTE", 1);
        assert_eq!(pieces, vec!["M", "RR", "TE"]);
    }

    #[test]
    fn test_split_allele_at_end() {
        let changes = parse_protein_changes("3:T>3:T").unwrap();
        let pieces = split_at_changes(&changes, AlleleSide::Reference, 0, "MAKT", 0);
        assert_eq!(pieces, vec!["MAK", "T", ""]);
    }
}
