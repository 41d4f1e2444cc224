//! The conversion run: load reference maps, ingest every category's
//! genotype files, then write the PED/MAP pair.
use glob::{glob_with, GlobError, MatchOptions, Pattern, PatternError};
use log::{info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::cohort::{Affection, Cohort, CohortError};
use super::genetic_map::{GeneticMap, GeneticMapError};
use super::plink::{write_dataset, Dataset, PlinkError};

pub const DEFAULT_FAMILY_ID: &str = "FAM001";

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid file pattern: {0}")]
    PatternError(#[from] PatternError),
    #[error("Error listing files: {0}")]
    GlobError(#[from] GlobError),
    #[error("{0}")]
    GeneticMapError(#[from] GeneticMapError),
    #[error("{0}")]
    CohortError(#[from] CohortError),
    #[error("{0}")]
    PlinkError(#[from] PlinkError),
}

/// Inputs and outputs of a conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory of case genotype files (affection 2).
    pub cases: PathBuf,
    /// Directory of control genotype files (affection 1).
    pub controls: PathBuf,
    /// Directory of genotype files of unknown affection (affection 0).
    pub unknowns: PathBuf,
    /// Also read files in subdirectories.
    pub recursive: bool,
    /// Family id, used in the PED file and to name the outputs.
    pub family_id: String,
    /// Directory of the per-chromosome HapMap reference maps.
    pub map_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cases: PathBuf::from("cases"),
            controls: PathBuf::from("controls"),
            unknowns: PathBuf::from("unknowns"),
            recursive: false,
            family_id: DEFAULT_FAMILY_ID.to_string(),
            map_dir: PathBuf::from("hapmap"),
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Category directories with their affection status, in ingestion order.
    pub fn categories(&self) -> [(&Path, Affection); 3] {
        [
            (self.cases.as_path(), Affection::Affected),
            (self.controls.as_path(), Affection::Unaffected),
            (self.unknowns.as_path(), Affection::Unknown),
        ]
    }
}

/// List the regular files of `dir`, sorted by their path string.
/// Subdirectories are searched only if `recursive` is set. Hidden files and
/// directories are skipped.
pub fn discover_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, PipelineError> {
    let dir = Pattern::escape(&dir.to_string_lossy());
    let pattern = if recursive {
        format!("{}/**/*", dir)
    } else {
        format!("{}/*", dir)
    };
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let mut files = glob_with(&pattern, options)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(|path| path.is_file())
        .collect::<Vec<_>>();
    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    Ok(files)
}

/// Run the whole conversion and return the paths written.
pub fn run(config: &Config) -> Result<Dataset, PipelineError> {
    info!("Loading HapMap...");
    let genetic_map = GeneticMap::from_dir(&config.map_dir)?;
    if genetic_map.is_empty() {
        warn!(
            "no reference map found in {}, all genetic positions will be 0",
            config.map_dir.display()
        );
    }

    info!("Loading raw genotype data files...");
    let mut cohort = Cohort::new();
    for (dir, affection) in config.categories() {
        let files = discover_files(dir, config.recursive)?;
        if files.is_empty() {
            warn!("no genotype files found in {}", dir.display());
        }
        for path in files {
            cohort.ingest_file(&path, affection, &genetic_map)?;
        }
    }

    info!("Inferring sexes and writing files...");
    let dataset = write_dataset(&cohort, &config.family_id, &config.output_dir)?;
    info!(
        "wrote {} individuals and {} markers to {} and {}",
        cohort.n_individuals(),
        cohort.n_markers(),
        dataset.ped.display(),
        dataset.map.display()
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.family_id, "FAM001");
        assert_eq!(config.cases, PathBuf::from("cases"));
        assert!(!config.recursive);
        let affections: Vec<Affection> = config.categories().iter().map(|c| c.1).collect();
        assert_eq!(
            affections,
            vec![Affection::Affected, Affection::Unaffected, Affection::Unknown]
        );
    }

    #[test]
    fn test_discover_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.txt"), "").unwrap();

        let flat = discover_files(dir.path(), false).unwrap();
        assert_eq!(
            flat,
            vec![dir.path().join("a.txt"), dir.path().join("b.txt")]
        );

        let recursive = discover_files(dir.path(), true).unwrap();
        assert_eq!(recursive.len(), 3);
        assert!(recursive.contains(&dir.path().join("sub").join("c.txt")));
    }

    #[test]
    fn test_discover_files_skips_hidden() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::write(dir.path().join(".DS_Store"), "").unwrap();
        fs::create_dir(dir.path().join(".cache")).unwrap();
        fs::write(dir.path().join(".cache").join("b.txt"), "").unwrap();

        let expected = vec![dir.path().join("a.txt")];
        assert_eq!(discover_files(dir.path(), false).unwrap(), expected);
        assert_eq!(discover_files(dir.path(), true).unwrap(), expected);
    }

    #[test]
    fn test_discover_files_sorted_as_strings() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::create_dir(dir.path().join("a-b")).unwrap();
        fs::write(dir.path().join("a").join("y.txt"), "").unwrap();
        fs::write(dir.path().join("a-b").join("x.txt"), "").unwrap();

        // '-' sorts before '/', so "a-b/x.txt" comes before "a/y.txt"
        let files = discover_files(dir.path(), true).unwrap();
        assert_eq!(
            files,
            vec![
                dir.path().join("a-b").join("x.txt"),
                dir.path().join("a").join("y.txt")
            ]
        );
    }

    #[test]
    fn test_discover_files_missing_dir() {
        let dir = tempdir().unwrap();
        let files = discover_files(&dir.path().join("absent"), true).unwrap();
        assert!(files.is_empty());
    }
}
