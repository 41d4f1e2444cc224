//! Chromosome labels as they appear in consumer genotyping exports.

/// The integer type for physical (base pair) positions.
pub type Position = u64;

/// The chromosome whose call rate decides an individual's sex.
pub const SEX_CHROMOSOME: &str = "Y";

/// Chromosomes for which a reference genetic map is looked up: the
/// autosomes 1 to 22, then X.
pub fn reference_chromosomes() -> impl Iterator<Item = String> {
    (1..=22)
        .map(|i| i.to_string())
        .chain(std::iter::once("X".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_chromosomes() {
        let chroms: Vec<String> = reference_chromosomes().collect();
        assert_eq!(chroms.len(), 23);
        assert_eq!(chroms.first().map(String::as_str), Some("1"));
        assert_eq!(chroms.last().map(String::as_str), Some("X"));
        assert!(!chroms.iter().any(|c| c == SEX_CHROMOSOME || c == "MT"));
    }
}
