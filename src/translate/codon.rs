//! Genetic code and codon table.

use std::collections::HashMap;

/// One-letter symbol written for stop codons.
pub const STOP: char = '*';

/// One-letter symbol written for codons that cannot be read.
pub const UNKNOWN: char = 'X';

/// A single nucleotide base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base {
    A,
    C,
    G,
    T,
}

impl Base {
    /// Parse a base from an ASCII byte. `U` is read as `T`.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b.to_ascii_uppercase() {
            b'A' => Some(Base::A),
            b'C' => Some(Base::C),
            b'G' => Some(Base::G),
            b'T' | b'U' => Some(Base::T),
            _ => None,
        }
    }

    /// Convert to character.
    pub fn to_char(self) -> char {
        match self {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::T => 'T',
        }
    }
}

/// A codon (three nucleotides).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Codon([Base; 3]);

impl Codon {
    /// Read a codon from exactly three bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [b1, b2, b3] => Some(Self([
                Base::from_byte(*b1)?,
                Base::from_byte(*b2)?,
                Base::from_byte(*b3)?,
            ])),
            _ => None,
        }
    }

    /// Parse a codon from a string.
    pub fn parse(s: &str) -> Option<Self> {
        Self::from_bytes(s.as_bytes())
    }

    /// Get the three bases.
    pub fn bases(&self) -> &[Base; 3] {
        &self.0
    }
}

impl std::fmt::Display for Codon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [b1, b2, b3] = self.0;
        write!(f, "{}{}{}", b1.to_char(), b2.to_char(), b3.to_char())
    }
}

/// Standard genetic code, one-letter amino acids with `*` for stop.
const STANDARD_CODE: &[(char, &[&str])] = &[
    ('A', &["GCA", "GCC", "GCG", "GCT"]),
    ('C', &["TGC", "TGT"]),
    ('D', &["GAC", "GAT"]),
    ('E', &["GAA", "GAG"]),
    ('F', &["TTC", "TTT"]),
    ('G', &["GGA", "GGC", "GGG", "GGT"]),
    ('H', &["CAC", "CAT"]),
    ('I', &["ATA", "ATC", "ATT"]),
    ('K', &["AAA", "AAG"]),
    ('L', &["CTA", "CTC", "CTG", "CTT", "TTA", "TTG"]),
    ('M', &["ATG"]),
    ('N', &["AAC", "AAT"]),
    ('P', &["CCA", "CCC", "CCG", "CCT"]),
    ('Q', &["CAA", "CAG"]),
    ('R', &["AGA", "AGG", "CGA", "CGC", "CGG", "CGT"]),
    ('S', &["AGC", "AGT", "TCA", "TCC", "TCG", "TCT"]),
    ('T', &["ACA", "ACC", "ACG", "ACT"]),
    ('V', &["GTA", "GTC", "GTG", "GTT"]),
    ('W', &["TGG"]),
    ('Y', &["TAC", "TAT"]),
    (STOP, &["TAA", "TAG", "TGA"]),
];

/// Codon to amino acid lookup.
#[derive(Debug, Clone)]
pub struct CodonTable {
    codon_to_aa: HashMap<Codon, char>,
}

impl CodonTable {
    /// Create the standard genetic code.
    pub fn standard() -> Self {
        let codon_to_aa = STANDARD_CODE
            .iter()
            .flat_map(|(aa, codons)| {
                codons
                    .iter()
                    .filter_map(move |c| Codon::parse(c).map(|codon| (codon, *aa)))
            })
            .collect();
        Self { codon_to_aa }
    }

    /// Get the one-letter amino acid (or `*`) encoded by a codon.
    pub fn amino_acid_for(&self, codon: &Codon) -> Option<char> {
        self.codon_to_aa.get(codon).copied()
    }

    /// Check if a codon is a stop codon.
    pub fn is_stop(&self, codon: &Codon) -> bool {
        self.amino_acid_for(codon) == Some(STOP)
    }

    /// Number of codons in the table.
    pub fn len(&self) -> usize {
        self.codon_to_aa.len()
    }

    /// Whether the table holds no codons.
    pub fn is_empty(&self) -> bool {
        self.codon_to_aa.is_empty()
    }
}
