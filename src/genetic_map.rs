use csv::{ReaderBuilder, Trim};
use genomap::{GenomeMap, GenomeMapError};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::file::{FileError, InputFile};
use super::genome::{reference_chromosomes, Position};
use super::numeric::{lerp, search_bracket};

/// Leading token of a HapMap header row.
const HEADER_TOKEN: &str = "Chromosome";

/// File name prefix of the per-chromosome reference maps; the chromosome
/// label and `.txt` follow.
pub const MAP_FILE_PREFIX: &str = "genetic_map_GRCh37_chr";

#[derive(Error, Debug)]
pub enum GeneticMapError {
    #[error("HapMap parsing error in '{path}': {source}")]
    HapMapParsingError {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("File reading error: {0}")]
    FileError(#[from] FileError),
    #[error("HapMap file '{0}' contains no breakpoints")]
    EmptyMap(PathBuf),
    #[error("HapMap file '{path}' not sorted at position {position}")]
    NotSorted { path: PathBuf, position: Position },
    #[error("Chromosome '{0}' has two breakpoints at the same position around {1}")]
    DegenerateInterval(String, Position),
    #[error("GenomeMap Error: error updating GenomeMap")]
    GenomeMapError(#[from] GenomeMapError),
}

/// A single point of a genetic map: a physical position and its cumulative
/// genetic position in centiMorgans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub position: Position,
    pub map_pos: f64,
}

/// One row of a HapMap-formatted recombination map.
#[derive(Debug, Deserialize)]
struct HapMapRow {
    #[allow(dead_code)]
    chrom: String,
    position: Position,
    #[allow(dead_code)]
    rate: f64,
    map_pos: f64,
}

/// A single chromosome's breakpoints, ascending by physical position and
/// always starting with a `(0, 0)` sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromMap {
    breakpoints: Vec<Breakpoint>,
}

impl Default for ChromMap {
    fn default() -> Self {
        Self {
            breakpoints: vec![Breakpoint {
                position: 0,
                map_pos: 0.0,
            }],
        }
    }
}

impl ChromMap {
    /// Build a map from breakpoints, prefixing the `(0, 0)` sentinel.
    ///
    /// Breakpoints are trusted to be sorted; use [`ChromMap::check_sorted`]
    /// to validate them.
    pub fn new(breakpoints: impl IntoIterator<Item = Breakpoint>) -> Self {
        let mut chrom_map = Self::default();
        chrom_map.breakpoints.extend(breakpoints);
        chrom_map
    }

    /// The breakpoints, sentinel included.
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// The number of breakpoints read from the reference, sentinel excluded.
    pub fn len(&self) -> usize {
        self.breakpoints.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the first position where either the physical or the genetic
    /// position decreases, if any.
    pub fn check_sorted(&self) -> Option<Position> {
        self.breakpoints
            .windows(2)
            .find(|pair| {
                pair[1].position < pair[0].position || pair[1].map_pos < pair[0].map_pos
            })
            .map(|pair| pair[1].position)
    }

    /// Interpolate the genetic position (cM) at the specified physical
    /// position, using the tightest bracketing pair of breakpoints.
    ///
    /// Positions before the first real breakpoint interpolate from the
    /// sentinel; positions past the last breakpoint extrapolate linearly
    /// from the last two, without clamping.
    ///
    /// Returns `None` if the map has no breakpoints besides the sentinel, or
    /// if the bracketing pair has zero physical span.
    pub fn interpolate(&self, position: Position) -> Option<f64> {
        let bps = &self.breakpoints;
        let (low, high) = search_bracket(bps, position, |bp| bp.position)?;
        lerp(
            position,
            (bps[low].position, bps[low].map_pos),
            (bps[high].position, bps[high].map_pos),
        )
    }
}

/// Reference genetic maps for a set of chromosomes.
pub struct GeneticMap {
    pub map: GenomeMap<ChromMap>,
}

impl Default for GeneticMap {
    fn default() -> Self {
        Self {
            map: GenomeMap::new(),
        }
    }
}

impl GeneticMap {
    /// Create an empty genetic map; every lookup falls back to 0 cM.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the reference maps of chromosomes 1 to 22 and X from `dir`.
    ///
    /// Each chromosome is read from `<dir>/genetic_map_GRCh37_chr<label>.txt`.
    /// Chromosomes without a file are left uncovered.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<GeneticMap, GeneticMapError> {
        let dir = dir.as_ref();
        let mut genetic_map = GeneticMap::new();
        for chrom in reference_chromosomes() {
            let path = dir.join(format!("{}{}.txt", MAP_FILE_PREFIX, chrom));
            let input_file = InputFile::new(&path);
            if !input_file.exists() {
                debug!("no reference map for chromosome {} ({})", chrom, path.display());
                continue;
            }
            let chrom_map = Self::read_hapmap(&input_file)?;
            debug!(
                "loaded {} breakpoints for chromosome {}",
                chrom_map.len(),
                chrom
            );
            genetic_map.insert(&chrom, chrom_map)?;
        }
        Ok(genetic_map)
    }

    /// Read a single chromosome's map from a HapMap-formatted file.
    ///
    /// This method also supports reading directly from a gzip-compressed file.
    ///
    /// The HapMap recombination format looks like:
    ///
    /// ```text
    /// Chromosome      Position(bp)    Rate(cM/Mb)     Map(cM)
    /// chr1    55550   2.981822        0.000000
    /// chr1    82571   2.082414        0.080572
    /// chr1    88169   2.081358        0.092229
    /// ```
    ///
    /// Any row starting with `Chromosome` is treated as a header. Only the
    /// position and map columns are used; the chromosome column is ignored,
    /// the chromosome being given by the file name.
    pub fn read_hapmap(input_file: &InputFile) -> Result<ChromMap, GeneticMapError> {
        let path = &input_file.filepath;
        let parse_error = |source: csv::Error| GeneticMapError::HapMapParsingError {
            path: path.clone(),
            source,
        };

        let mut rdr = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .trim(Trim::All)
            .from_reader(input_file.reader()?);

        let mut breakpoints = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(parse_error)?;
            if record.get(0).map_or(false, |s| s.starts_with(HEADER_TOKEN)) {
                continue;
            }
            let row: HapMapRow = record.deserialize(None).map_err(parse_error)?;
            breakpoints.push(Breakpoint {
                position: row.position,
                map_pos: row.map_pos,
            });
        }

        let chrom_map = ChromMap::new(breakpoints);
        if chrom_map.is_empty() {
            return Err(GeneticMapError::EmptyMap(path.clone()));
        }
        if let Some(position) = chrom_map.check_sorted() {
            return Err(GeneticMapError::NotSorted {
                path: path.clone(),
                position,
            });
        }
        Ok(chrom_map)
    }

    /// Add a chromosome's map.
    pub fn insert(&mut self, chrom: &str, chrom_map: ChromMap) -> Result<(), GeneticMapError> {
        self.map.insert(chrom, chrom_map)?;
        Ok(())
    }

    /// Return the number of chromosomes covered.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Return if no chromosome is covered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over chromosome name and [`ChromMap`] tuples.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ChromMap)> {
        self.map.iter()
    }

    /// Return the map of a chromosome, if covered.
    pub fn get(&self, chrom: &str) -> Option<&ChromMap> {
        self.map.get(chrom)
    }

    /// Genetic position (cM) of a marker. Chromosomes without a reference
    /// map are placed at 0 cM.
    pub fn genetic_position(&self, chrom: &str, position: Position) -> Result<f64, GeneticMapError> {
        match self.get(chrom) {
            None => Ok(0.0),
            Some(chrom_map) => chrom_map
                .interpolate(position)
                .ok_or_else(|| GeneticMapError::DegenerateInterval(chrom.to_string(), position)),
        }
    }
}
