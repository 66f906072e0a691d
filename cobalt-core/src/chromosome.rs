//! Canonical human chromosome ordinals.
//!
//! Window keys rank chromosomes by ordinal rather than by name so that `chr2`
//! sorts before `chr10` and `1`/`chr1` land in the same range.

use std::fmt::{self, Display};

pub const X_ORDINAL: u8 = 23;
pub const Y_ORDINAL: u8 = 24;
pub const MT_ORDINAL: u8 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Chromosome {
    Autosome(u8),
    X,
    Y,
    MT,
}

impl Chromosome {
    ///
    /// Resolve a contig name, with or without a `chr` prefix.
    ///
    pub fn from_name(name: &str) -> Option<Self> {
        let stripped = name.strip_prefix("chr").unwrap_or(name);
        match stripped {
            "X" => Some(Chromosome::X),
            "Y" => Some(Chromosome::Y),
            "MT" | "M" => Some(Chromosome::MT),
            other => {
                // reject "01", "+1" and friends that parse as numbers but are not contig names
                if other.is_empty() || !other.bytes().all(|b| b.is_ascii_digit()) || other.starts_with('0') {
                    return None;
                }
                match other.parse::<u8>() {
                    Ok(n) if (1..=22).contains(&n) => Some(Chromosome::Autosome(n)),
                    _ => None,
                }
            }
        }
    }

    pub fn ordinal(&self) -> u8 {
        match self {
            Chromosome::Autosome(n) => *n,
            Chromosome::X => X_ORDINAL,
            Chromosome::Y => Y_ORDINAL,
            Chromosome::MT => MT_ORDINAL,
        }
    }

    pub fn is_autosome(&self) -> bool {
        matches!(self, Chromosome::Autosome(_))
    }
}

impl Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chromosome::Autosome(n) => write!(f, "{}", n),
            Chromosome::X => write!(f, "X"),
            Chromosome::Y => write!(f, "Y"),
            Chromosome::MT => write!(f, "MT"),
        }
    }
}

/// Ordinal of a contig name, `None` for contigs outside the canonical set.
pub fn chromosome_ordinal(name: &str) -> Option<u8> {
    Chromosome::from_name(name).map(|c| c.ordinal())
}

/// `true` for chromosomes 1..=22 under either naming convention.
pub fn is_autosome(name: &str) -> bool {
    Chromosome::from_name(name).is_some_and(|c| c.is_autosome())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("1", Some(1))]
    #[case("chr1", Some(1))]
    #[case("22", Some(22))]
    #[case("chr22", Some(22))]
    #[case("X", Some(23))]
    #[case("chrY", Some(24))]
    #[case("chrM", Some(25))]
    #[case("MT", Some(25))]
    #[case("23", None)]
    #[case("0", None)]
    #[case("01", None)]
    #[case("chrUn_gl000220", None)]
    #[case("", None)]
    fn test_chromosome_ordinal(#[case] name: &str, #[case] expected: Option<u8>) {
        assert_eq!(chromosome_ordinal(name), expected);
    }

    #[rstest]
    fn test_autosome_flags() {
        assert!(is_autosome("chr7"));
        assert!(!is_autosome("X"));
        assert!(Chromosome::Autosome(22).is_autosome());
        assert!(!Chromosome::MT.is_autosome());
    }
}
