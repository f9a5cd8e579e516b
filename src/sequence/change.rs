//! Change descriptor parsing
//!
//! Proteoform nodes carry their variation as two parallel `;`-separated
//! descriptor lists:
//!
//! | List              | Entry format                     | Example         |
//! |-------------------|----------------------------------|-----------------|
//! | `cDNA_changes`    | `loc:REF>ALT`                    | `312:G>GA`      |
//! | `protein_changes` | `refPos:REF>altPos:ALT[(+fs)]`   | `104:K>104:KX(+fs)` |
//!
//! cDNA locations are 0-based offsets into the transcript sequence. Protein
//! positions are 0-based residue offsets and may be negative for changes in
//! the 5' UTR. Alleles may be empty. An empty list is written as `""` or `-`.

use nom::{
    bytes::complete::{tag, take_while},
    character::complete::{char, digit1},
    combinator::{map_res, opt, recognize},
    IResult, Parser,
};
use serde::Serialize;

use crate::error::{Diagnostic, ErrorCode, FerroError};

/// Suffix marking a frameshift protein change.
pub const FRAMESHIFT_SUFFIX: &str = "(+fs)";

/// A single cDNA change `loc:REF>ALT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CdnaChange {
    pub location: usize,
    pub reference: String,
    pub alternate: String,
}

impl CdnaChange {
    /// Length of the alternate allele minus the reference allele.
    pub fn length_delta(&self) -> i64 {
        self.alternate.len() as i64 - self.reference.len() as i64
    }

    /// Longer of the two allele lengths.
    pub fn span(&self) -> usize {
        self.reference.len().max(self.alternate.len())
    }
}

impl std::fmt::Display for CdnaChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}>{}", self.location, self.reference, self.alternate)
    }
}

/// A single protein change `refPos:REF>altPos:ALT`, optionally `(+fs)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProteinChange {
    pub ref_position: i64,
    pub reference: String,
    pub alt_position: i64,
    pub alternate: String,
    pub frameshift: bool,
}

impl ProteinChange {
    /// Reference and alternate residues are identical.
    pub fn is_synonymous(&self) -> bool {
        self.reference == self.alternate
    }
}

impl std::fmt::Display for ProteinChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}>{}:{}{}",
            self.ref_position,
            self.reference,
            self.alt_position,
            self.alternate,
            if self.frameshift { FRAMESHIFT_SUFFIX } else { "" }
        )
    }
}

fn location(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>).parse(input)
}

fn signed_position(input: &str) -> IResult<&str, i64> {
    map_res(recognize((opt(char('-')), digit1)), str::parse::<i64>).parse(input)
}

fn nucleotides(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_ascii_alphabetic()).parse(input)
}

fn residues(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_ascii_alphabetic() || c == '*').parse(input)
}

fn cdna_change(input: &str) -> IResult<&str, CdnaChange> {
    let (rest, (loc, _, reference, _, alternate)) =
        (location, char(':'), nucleotides, char('>'), nucleotides).parse(input)?;
    Ok((
        rest,
        CdnaChange {
            location: loc,
            reference: reference.to_string(),
            alternate: alternate.to_string(),
        },
    ))
}

fn protein_change(input: &str) -> IResult<&str, ProteinChange> {
    let (rest, (ref_position, _, reference, _, alt_position, _, alternate, fs)) = (
        signed_position,
        char(':'),
        residues,
        char('>'),
        signed_position,
        char(':'),
        residues,
        opt(tag(FRAMESHIFT_SUFFIX)),
    )
        .parse(input)?;
    Ok((
        rest,
        ProteinChange {
            ref_position,
            reference: reference.to_string(),
            alt_position,
            alternate: alternate.to_string(),
            frameshift: fs.is_some(),
        },
    ))
}

/// Run `parser` over every `;`-separated entry of `input`.
///
/// Errors report the byte offset within the whole list.
fn parse_list<T>(
    input: &str,
    what: &str,
    mut parser: impl FnMut(&str) -> IResult<&str, T>,
) -> Result<Vec<T>, FerroError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return Ok(Vec::new());
    }

    let mut changes = Vec::new();
    let mut offset = 0;
    for entry in trimmed.split(';') {
        let pos = match parser(entry) {
            Ok(("", change)) => {
                changes.push(change);
                offset += entry.len() + 1;
                continue;
            }
            Ok((rest, _)) => offset + entry.len() - rest.len(),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                offset + entry.len() - e.input.len()
            }
            Err(nom::Err::Incomplete(_)) => offset + entry.len(),
        };
        let code = if pos == offset + entry.len() {
            ErrorCode::UnexpectedEnd
        } else {
            ErrorCode::UnexpectedChar
        };
        let diagnostic = Diagnostic::at(code, pos, trimmed)
            .with_hint(format!("expected {} entries separated by ';'", what));
        return Err(FerroError::parse_with_diagnostic(
            pos,
            format!("Malformed {} change '{}'", what, entry),
            diagnostic,
        ));
    }
    Ok(changes)
}

/// Parse a `;`-separated cDNA change list.
///
/// # Example
///
/// ```
/// use ferro_proteoform::sequence::parse_cdna_changes;
///
/// let changes = parse_cdna_changes("12:A>G;40:CT>C").unwrap();
/// assert_eq!(changes.len(), 2);
/// assert_eq!(changes[1].length_delta(), -1);
/// ```
pub fn parse_cdna_changes(input: &str) -> Result<Vec<CdnaChange>, FerroError> {
    parse_list(input, "cDNA", cdna_change)
}

/// Parse a `;`-separated protein change list.
pub fn parse_protein_changes(input: &str) -> Result<Vec<ProteinChange>, FerroError> {
    parse_list(input, "protein", protein_change)
}
