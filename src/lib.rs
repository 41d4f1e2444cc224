//! Convert consumer genotyping exports into a PED/MAP linkage dataset.
//!
//! Each individual's export (a tab-separated file of rsid, chromosome,
//! position and genotype) is ingested into a [`Cohort`], which keeps every
//! individual and marker in first-seen order. Markers are placed on the
//! genetic map by linear interpolation over HapMap-formatted reference maps
//! ([`GeneticMap`]), and each individual's sex is inferred from its call rate
//! on chromosome Y.
//!
//! ```no_run
//! use rawplink::prelude::*;
//! let genetic_map = GeneticMap::from_dir("hapmap")
//!                       .expect("cannot read hapmap");
//!
//! let mut cohort = Cohort::new();
//! cohort.ingest_file("cases/genome_Jane.txt", Affection::Affected, &genetic_map)
//!       .expect("cannot read genotypes");
//!
//! write_dataset(&cohort, "FAM001", ".").expect("cannot write PED/MAP");
//! ```
//!
//! The whole conversion, with file discovery over case, control and unknown
//! directories, is available as [`pipeline::run`]:
//!
//! ```no_run
//! use rawplink::prelude::*;
//! let config = Config {
//!     family_id: "FAM002".to_string(),
//!     recursive: true,
//!     ..Config::default()
//! };
//! let dataset = run(&config).expect("conversion failed");
//! println!("{}", dataset.ped.display());
//! ```

pub mod cohort;
pub mod file;
pub mod genetic_map;
pub mod genome;
pub mod genotype;
mod numeric;
pub mod pipeline;
pub mod plink;
pub mod sex;

pub use cohort::{Affection, Cohort, CohortError};
pub use genetic_map::{GeneticMap, GeneticMapError};
pub use pipeline::{run, Config, PipelineError};
pub use plink::{write_dataset, Dataset, PlinkError};

pub mod prelude {
    pub use crate::cohort::{Affection, Cohort, CohortError, Individual, Marker};
    pub use crate::genetic_map::{Breakpoint, ChromMap, GeneticMap, GeneticMapError};
    pub use crate::genotype::{Genotype, GenotypeRecord};
    pub use crate::pipeline::{run, Config, PipelineError};
    pub use crate::plink::{write_dataset, Dataset, PlinkError};
    pub use crate::sex::{infer_sex, Sex};
}
