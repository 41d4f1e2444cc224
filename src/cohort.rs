use indexmap::IndexMap;
use log::debug;
use std::fmt;
use std::io::{self, BufRead};
use std::path::Path;
use thiserror::Error;

use super::file::{FileError, InputFile};
use super::genetic_map::{GeneticMap, GeneticMapError};
use super::genome::Position;
use super::genotype::{Genotype, GenotypeError, GenotypeRecord};

#[derive(Error, Debug)]
pub enum CohortError {
    #[error("File reading error: {0}")]
    FileError(#[from] FileError),
    #[error("IO error reading '{name}': {source}")]
    IOError {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("Malformed genotype data in '{name}', {source}")]
    GenotypeError {
        name: String,
        #[source]
        source: GenotypeError,
    },
    #[error("Genetic map error: {0}")]
    GeneticMapError(#[from] GeneticMapError),
}

/// Affection status of an individual.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub enum Affection {
    #[default]
    Unknown,
    Unaffected,
    Affected,
}

impl Affection {
    /// Return integer representation for PED file.
    pub fn code(&self) -> u8 {
        match self {
            Affection::Unknown => 0,
            Affection::Unaffected => 1,
            Affection::Affected => 2,
        }
    }
}

impl fmt::Display for Affection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A genetic marker, as first observed in the cohort.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub chrom: String,
    pub position: Position,
    /// Genetic position in centiMorgans.
    pub map_pos: f64,
}

impl Marker {
    /// Genetic position in Morgans.
    pub fn morgans(&self) -> f64 {
        self.map_pos / 100.0
    }
}

/// The genotype calls of one person, per chromosome and rsid.
#[derive(Debug, Clone, Default)]
pub struct Individual {
    pub id: String,
    genotypes: IndexMap<String, IndexMap<String, Genotype>>,
}

impl Individual {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            genotypes: IndexMap::new(),
        }
    }

    /// Insert (or overwrite) the call of a marker.
    pub fn insert(&mut self, chrom: &str, rsid: &str, genotype: Genotype) {
        self.genotypes
            .entry(chrom.to_string())
            .or_default()
            .insert(rsid.to_string(), genotype);
    }

    /// The call of a marker, if this individual carries it.
    pub fn genotype(&self, chrom: &str, rsid: &str) -> Option<&Genotype> {
        self.genotypes.get(chrom)?.get(rsid)
    }

    /// All calls on a chromosome, keyed by rsid.
    pub fn chromosome(&self, chrom: &str) -> Option<&IndexMap<String, Genotype>> {
        self.genotypes.get(chrom)
    }

    /// Total number of calls over all chromosomes.
    pub fn len(&self) -> usize {
        self.genotypes.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Derive a person id from a genotype file's path: the file name without
/// its last extension, keeping only alphanumeric characters and `_`.
pub fn person_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

/// Every individual and marker seen so far, in first-insertion order.
#[derive(Debug, Default)]
pub struct Cohort {
    individuals: IndexMap<String, Individual>,
    affections: IndexMap<String, Affection>,
    markers: IndexMap<String, Marker>,
}

impl Cohort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read one person's genotyping export, with the given affection status.
    ///
    /// Returns the number of genotype records read.
    pub fn ingest_file(
        &mut self,
        path: impl AsRef<Path>,
        affection: Affection,
        genetic_map: &GeneticMap,
    ) -> Result<usize, CohortError> {
        let path = path.as_ref();
        let id = person_id(path);
        let reader = InputFile::new(path).reader()?;
        let name = path.display().to_string();
        let n_records = self.ingest_lines(&id, &name, reader, affection, genetic_map)?;
        debug!(
            "read {} genotypes for '{}' from {}",
            n_records,
            id,
            path.display()
        );
        Ok(n_records)
    }

    /// Read genotype lines for `person_id` from any buffered reader.
    ///
    /// The person's affection status is set (or overwritten) first, even if
    /// no data line follows.
    pub fn ingest_reader<R: BufRead>(
        &mut self,
        person_id: &str,
        reader: R,
        affection: Affection,
        genetic_map: &GeneticMap,
    ) -> Result<usize, CohortError> {
        self.ingest_lines(person_id, person_id, reader, affection, genetic_map)
    }

    fn ingest_lines<R: BufRead>(
        &mut self,
        person_id: &str,
        name: &str,
        reader: R,
        affection: Affection,
        genetic_map: &GeneticMap,
    ) -> Result<usize, CohortError> {
        self.affections.insert(person_id.to_string(), affection);

        let mut n_records = 0;
        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| CohortError::IOError {
                name: name.to_string(),
                source,
            })?;
            let record = GenotypeRecord::parse_line(&line, i + 1).map_err(|source| {
                CohortError::GenotypeError {
                    name: name.to_string(),
                    source,
                }
            })?;
            if let Some(record) = record {
                self.add_record(person_id, record, genetic_map)?;
                n_records += 1;
            }
        }
        Ok(n_records)
    }

    /// Register one genotype call. A marker seen for the first time is
    /// placed on the genetic map; later sightings keep that placement.
    pub fn add_record(
        &mut self,
        person_id: &str,
        record: GenotypeRecord,
        genetic_map: &GeneticMap,
    ) -> Result<(), GeneticMapError> {
        self.individuals
            .entry(person_id.to_string())
            .or_insert_with(|| Individual::new(person_id))
            .insert(&record.chrom, &record.rsid, record.genotype);

        if !self.markers.contains_key(&record.rsid) {
            let map_pos = genetic_map.genetic_position(&record.chrom, record.position)?;
            self.markers.insert(
                record.rsid,
                Marker {
                    chrom: record.chrom,
                    position: record.position,
                    map_pos,
                },
            );
        }
        Ok(())
    }

    /// Iterate over individuals with at least one call.
    pub fn individuals(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.values()
    }

    pub fn individual(&self, person_id: &str) -> Option<&Individual> {
        self.individuals.get(person_id)
    }

    /// The affection status last assigned to a person.
    pub fn affection(&self, person_id: &str) -> Affection {
        self.affections.get(person_id).copied().unwrap_or_default()
    }

    /// Iterate over rsid and [`Marker`] tuples.
    pub fn markers(&self) -> impl Iterator<Item = (&String, &Marker)> {
        self.markers.iter()
    }

    pub fn marker(&self, rsid: &str) -> Option<&Marker> {
        self.markers.get(rsid)
    }

    pub fn n_individuals(&self) -> usize {
        self.individuals.len()
    }

    pub fn n_markers(&self) -> usize {
        self.markers.len()
    }
}
