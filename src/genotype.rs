//! Genotype records of consumer genotyping exports.
//!
//! Exports are tab-separated, one marker per line:
//!
//! ```text
//! # rsid	chromosome	position	genotype
//! rs4477212	1	82154	AA
//! rs3094315	1	752566	AG
//! i4000759	Y	2655180	-
//! rs2853517	MT	709	G
//! ```
//!
//! Lines starting with `#` are comments. Haploid loci (Y, MT, and X in males)
//! usually report a single allele, and `-` marks a no-call.

use std::fmt;
use thiserror::Error;

use super::genome::Position;

/// The allele written for a no-call.
pub const MISSING_ALLELE: char = '0';

/// The no-call placeholder used by genotyping exports.
const NO_CALL: char = '-';

/// Prefix of comment lines.
pub const COMMENT_PREFIX: &str = "#";

#[derive(Error, Debug, PartialEq)]
pub enum GenotypeError {
    #[error("line {line}: expected at least 4 tab-separated fields, got {fields}")]
    MalformedRow { line: usize, fields: usize },
    #[error("line {line}: failed to parse position from string: '{value}'")]
    InvalidPosition { line: usize, value: String },
    #[error("line {line}: expected one or two alleles, got '{value}'")]
    MalformedAlleles { line: usize, value: String },
}

/// An ordered pair of single-character alleles; missing calls are `('0', '0')`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Genotype {
    pub base1: char,
    pub base2: char,
}

impl Genotype {
    /// The fully missing genotype.
    pub const MISSING: Genotype = Genotype {
        base1: MISSING_ALLELE,
        base2: MISSING_ALLELE,
    };

    /// Normalize a pair of raw allele characters.
    ///
    /// No-call placeholders become `'0'`, and a missing allele in either slot
    /// makes the whole genotype missing.
    pub fn new(base1: char, base2: char) -> Self {
        let normalize = |base: char| if base == NO_CALL { MISSING_ALLELE } else { base };
        let (base1, base2) = (normalize(base1), normalize(base2));
        if base1 == MISSING_ALLELE || base2 == MISSING_ALLELE {
            Self::MISSING
        } else {
            Self { base1, base2 }
        }
    }

    /// Parse a raw allele field of one or two characters. A single allele
    /// is mirrored into the second slot.
    ///
    /// Returns `None` for an empty field or a field longer than two characters.
    pub fn from_field(field: &str) -> Option<Self> {
        let mut chars = field.chars();
        let base1 = chars.next()?;
        let base2 = chars.next().unwrap_or(base1);
        if chars.next().is_some() {
            return None;
        }
        Some(Self::new(base1, base2))
    }

    pub fn is_missing(&self) -> bool {
        *self == Self::MISSING
    }

    /// Whether either allele is a raw line terminator, which only happens
    /// when a line break slipped through the field splitting.
    pub fn has_line_terminator(&self) -> bool {
        [self.base1, self.base2]
            .iter()
            .any(|&base| base == '\n' || base == '\r')
    }
}

impl fmt::Display for Genotype {
    /// Formats the genotype as a PED allele pair, `A G`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.base1, self.base2)
    }
}

/// A single data line of a genotyping export.
#[derive(Debug, Clone, PartialEq)]
pub struct GenotypeRecord {
    pub rsid: String,
    pub chrom: String,
    pub position: Position,
    pub genotype: Genotype,
}

impl GenotypeRecord {
    /// Parse a data line. `line_no` is 1-based and only used in errors.
    ///
    /// Returns `Ok(None)` for comment and blank lines. Fields beyond the
    /// fourth are ignored.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Option<Self>, GenotypeError> {
        if line.starts_with(COMMENT_PREFIX) || line.trim().is_empty() {
            return Ok(None);
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 4 {
            return Err(GenotypeError::MalformedRow {
                line: line_no,
                fields: fields.len(),
            });
        }
        let position: Position = fields[2].trim().parse().map_err(|_| {
            GenotypeError::InvalidPosition {
                line: line_no,
                value: fields[2].to_string(),
            }
        })?;
        let genotype = Genotype::from_field(fields[3].trim_end_matches(' ')).ok_or_else(|| {
            GenotypeError::MalformedAlleles {
                line: line_no,
                value: fields[3].to_string(),
            }
        })?;
        Ok(Some(Self {
            rsid: fields[0].to_string(),
            chrom: fields[1].to_string(),
            position,
            genotype,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genotype(field: &str) -> Genotype {
        Genotype::from_field(field).unwrap()
    }

    #[test]
    fn test_two_alleles() {
        assert_eq!(
            genotype("AG"),
            Genotype {
                base1: 'A',
                base2: 'G'
            }
        );
    }

    #[test]
    fn test_no_call_pair() {
        assert_eq!(genotype("--"), Genotype::MISSING);
        assert!(genotype("--").is_missing());
    }

    #[test]
    fn test_half_missing_is_missing() {
        assert_eq!(genotype("A-"), Genotype::MISSING);
        assert_eq!(genotype("-T"), Genotype::MISSING);
        assert_eq!(genotype("0C"), Genotype::MISSING);
    }

    #[test]
    fn test_haploid_is_mirrored() {
        assert_eq!(genotype("A"), Genotype::new('A', 'A'));
        assert_eq!(genotype("-"), Genotype::MISSING);
    }

    #[test]
    fn test_bad_allele_fields() {
        assert_eq!(Genotype::from_field(""), None);
        assert_eq!(Genotype::from_field("AGT"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(genotype("CT").to_string(), "C T");
        assert_eq!(genotype("--").to_string(), "0 0");
    }

    #[test]
    fn test_line_terminator() {
        assert!(Genotype::new('A', '\r').has_line_terminator());
        assert!(!genotype("AA").has_line_terminator());
    }

    #[test]
    fn test_parse_line() {
        let record = GenotypeRecord::parse_line("rs3094315\t1\t752566\tAG", 3)
            .unwrap()
            .unwrap();
        assert_eq!(record.rsid, "rs3094315");
        assert_eq!(record.chrom, "1");
        assert_eq!(record.position, 752566);
        assert_eq!(record.genotype, Genotype::new('A', 'G'));
    }

    #[test]
    fn test_parse_skipped_lines() {
        assert_eq!(
            GenotypeRecord::parse_line("# rsid\tchromosome\tposition\tgenotype", 1),
            Ok(None)
        );
        assert_eq!(GenotypeRecord::parse_line("", 2), Ok(None));
    }

    #[test]
    fn test_parse_malformed() {
        assert_eq!(
            GenotypeRecord::parse_line("rs1\t1\t100", 7),
            Err(GenotypeError::MalformedRow { line: 7, fields: 3 })
        );
        assert_eq!(
            GenotypeRecord::parse_line("rs1\t1\tabc\tAA", 8),
            Err(GenotypeError::InvalidPosition {
                line: 8,
                value: "abc".to_string()
            })
        );
        assert_eq!(
            GenotypeRecord::parse_line("rs1\t1\t100\t", 9),
            Err(GenotypeError::MalformedAlleles {
                line: 9,
                value: String::new()
            })
        );
    }
}
