//! Writes a cohort as a PED/MAP linkage dataset.
//!
//! The `.ped` file holds one tab-separated line per individual:
//!
//! ```text
//! FAM001	genome_Jane	0	0	2	1	A G	0 0	C C
//! ```
//!
//! that is family id, person id, paternal id, maternal id, sex, affection and
//! one allele pair per marker. The `.map` file lists the markers, in the
//! same order as the `.ped` allele columns, with their genetic position in
//! Morgans.
use log::warn;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::cohort::Cohort;
use super::file::{FileError, OutputFile};
use super::numeric::format_float;
use super::sex::{infer_sex, Sex, SexError};

/// Header of the `.map` file, written as a comment.
pub const MAP_HEADER: &str = "chromosome\trsid\tmorgans\tposition";

/// Parent id written for founders.
const UNKNOWN_PARENT: &str = "0";

#[derive(Error, Debug)]
pub enum PlinkError {
    #[error("File writing error: {0}")]
    FileError(#[from] FileError),
    #[error("IO error: {0}")]
    IOError(#[from] io::Error),
    #[error("Individual '{person_id}' has no genotype for marker {rsid}")]
    MissingGenotype { person_id: String, rsid: String },
    #[error("Sex inference error: {0}")]
    SexError(#[from] SexError),
}

/// Paths of a written PED/MAP pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub ped: PathBuf,
    pub map: PathBuf,
}

impl Dataset {
    /// The `<family_id>.ped` and `<family_id>.map` paths within `dir`.
    pub fn new(dir: impl AsRef<Path>, family_id: &str) -> Self {
        let dir = dir.as_ref();
        Self {
            ped: dir.join(format!("{}.ped", family_id)),
            map: dir.join(format!("{}.map", family_id)),
        }
    }
}

/// Infer the sex of every individual, in cohort order.
pub fn infer_sexes(cohort: &Cohort) -> Result<Vec<Sex>, SexError> {
    cohort.individuals().map(infer_sex).collect()
}

/// Write the pedigree lines. `sexes` are in cohort order, as returned by
/// [`infer_sexes`].
///
/// Fails on the first individual lacking a genotype for a registered marker;
/// lines already written are left in place.
pub fn write_ped<W: Write>(
    writer: &mut W,
    cohort: &Cohort,
    family_id: &str,
    sexes: &[Sex],
) -> Result<(), PlinkError> {
    for (individual, sex) in cohort.individuals().zip(sexes) {
        // TODO: infer parent-child relationships rather than writing every
        // individual as a founder.
        let mut line = format!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            family_id,
            individual.id,
            UNKNOWN_PARENT,
            UNKNOWN_PARENT,
            sex,
            cohort.affection(&individual.id)
        );
        for (rsid, marker) in cohort.markers() {
            let genotype = individual.genotype(&marker.chrom, rsid).ok_or_else(|| {
                PlinkError::MissingGenotype {
                    person_id: individual.id.clone(),
                    rsid: rsid.clone(),
                }
            })?;
            if genotype.has_line_terminator() {
                warn!(
                    "genotype of '{}' at {} contains a line terminator",
                    individual.id, rsid
                );
            }
            line.push('\t');
            line.push_str(&genotype.to_string());
        }
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

/// Write the marker lines, after the header has been written.
pub fn write_map<W: Write>(writer: &mut W, cohort: &Cohort) -> Result<(), PlinkError> {
    for (rsid, marker) in cohort.markers() {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            marker.chrom,
            rsid,
            format_float(marker.morgans()),
            marker.position
        )?;
    }
    Ok(())
}

/// Write `<family_id>.ped` and `<family_id>.map` into `dir`.
///
/// Sexes are inferred before either file is created, so a failed inference
/// leaves the directory untouched.
pub fn write_dataset(
    cohort: &Cohort,
    family_id: &str,
    dir: impl AsRef<Path>,
) -> Result<Dataset, PlinkError> {
    let sexes = infer_sexes(cohort)?;
    let dataset = Dataset::new(dir, family_id);

    let mut ped_writer = OutputFile::new(&dataset.ped, None).writer()?;
    write_ped(&mut ped_writer, cohort, family_id, &sexes)?;
    ped_writer.flush()?;

    let header = Some(vec![MAP_HEADER.to_string()]);
    let mut map_writer = OutputFile::new(&dataset.map, header).writer()?;
    write_map(&mut map_writer, cohort)?;
    map_writer.flush()?;

    Ok(dataset)
}
