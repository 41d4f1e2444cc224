use std::fmt;
use thiserror::Error;

use super::cohort::Individual;
use super::genome::SEX_CHROMOSOME;

/// Fraction of called markers on the sex chromosome above which an
/// individual is classified as male.
pub const MALE_CALL_RATE: f64 = 0.1;

#[derive(Error, Debug, PartialEq)]
pub enum SexError {
    #[error("Individual '{0}' has no genotype on chromosome {}, cannot infer sex", SEX_CHROMOSOME)]
    NoSexChromosomeCalls(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Return integer representation for PED file.
    pub fn code(&self) -> u8 {
        match self {
            Sex::Male => 1,
            Sex::Female => 2,
        }
    }

    /// Classify from the number of called markers among all markers typed
    /// on the sex chromosome.
    pub fn from_call_counts(called: usize, total: usize) -> Option<Self> {
        if total == 0 {
            return None;
        }
        let call_rate = called as f64 / total as f64;
        Some(if call_rate > MALE_CALL_RATE {
            Sex::Male
        } else {
            Sex::Female
        })
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Infer an individual's sex from its call rate on the sex chromosome.
pub fn infer_sex(individual: &Individual) -> Result<Sex, SexError> {
    let calls = individual.chromosome(SEX_CHROMOSOME);
    let total = calls.map_or(0, |calls| calls.len());
    let called = calls.map_or(0, |calls| {
        calls.values().filter(|genotype| !genotype.is_missing()).count()
    });
    Sex::from_call_counts(called, total)
        .ok_or_else(|| SexError::NoSexChromosomeCalls(individual.id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genotype::Genotype;

    fn individual_with_y_calls(called: usize, total: usize) -> Individual {
        let mut individual = Individual::new("p1");
        for i in 0..total {
            let genotype = if i < called {
                Genotype::new('A', 'A')
            } else {
                Genotype::MISSING
            };
            individual.insert(SEX_CHROMOSOME, &format!("rs{}", i), genotype);
        }
        individual
    }

    #[test]
    fn test_male_above_threshold() {
        let individual = individual_with_y_calls(5, 40);
        assert_eq!(infer_sex(&individual), Ok(Sex::Male));
    }

    #[test]
    fn test_female_below_threshold() {
        let individual = individual_with_y_calls(3, 40);
        assert_eq!(infer_sex(&individual), Ok(Sex::Female));
    }

    #[test]
    fn test_female_at_threshold() {
        assert_eq!(Sex::from_call_counts(4, 40), Some(Sex::Female));
        assert_eq!(Sex::from_call_counts(1, 10), Some(Sex::Female));
    }

    #[test]
    fn test_other_chromosomes_ignored() {
        let mut individual = individual_with_y_calls(0, 10);
        individual.insert("X", "rsx", Genotype::new('A', 'A'));
        individual.insert("1", "rs_auto", Genotype::new('A', 'G'));
        assert_eq!(infer_sex(&individual), Ok(Sex::Female));
    }

    #[test]
    fn test_no_sex_chromosome_calls() {
        let mut individual = Individual::new("p1");
        individual.insert("1", "rs1", Genotype::new('A', 'G'));
        assert_eq!(
            infer_sex(&individual),
            Err(SexError::NoSexChromosomeCalls("p1".to_string()))
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(Sex::Male.code(), 1);
        assert_eq!(Sex::Female.to_string(), "2");
    }
}
