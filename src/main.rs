use clap::Parser;
use env_logger::{Builder, Env};
use log::LevelFilter;
use rawplink::pipeline::DEFAULT_FAMILY_ID;
use rawplink::{run, Config, PipelineError};
use std::path::PathBuf;

const INFO: &str = "\
rawplink: convert consumer genotyping exports into a PED/MAP linkage dataset

Every file found in the cases, controls and unknowns directories is read as
one individual's tab-separated genotype export. Genetic positions are
interpolated from HapMap reference maps named
genetic_map_GRCh37_chr<1..22,X>.txt, and sexes are inferred from calls on Y.
Writes <family>.ped and <family>.map.
";

#[derive(Parser)]
#[clap(name = "rawplink", version)]
#[clap(about = INFO)]
struct Cli {
    /// directory of case genotype files (affection 2)
    #[arg(long, default_value = "cases")]
    cases: PathBuf,
    /// directory of control genotype files (affection 1)
    #[arg(long, default_value = "controls")]
    controls: PathBuf,
    /// directory of genotype files of unknown affection (affection 0)
    #[arg(long, default_value = "unknowns")]
    unknowns: PathBuf,
    /// also read files in subdirectories
    #[arg(short, long, default_value_t = false)]
    recursive: bool,
    /// the family id, also used to name the output files
    #[arg(long, default_value = DEFAULT_FAMILY_ID)]
    family: String,
    /// directory of the per-chromosome HapMap reference maps
    #[arg(long, default_value = "hapmap")]
    hapmap_dir: PathBuf,
    /// directory the .ped and .map files are written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
    /// increase logging verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn verbosity_to_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn init_logger(verbosity: u8) {
    Builder::new()
        .filter_level(verbosity_to_level(verbosity))
        .parse_env(Env::default().filter("RAWPLINK_LOG"))
        .init();
}

fn run_cli() -> Result<(), PipelineError> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let config = Config {
        cases: cli.cases,
        controls: cli.controls,
        unknowns: cli.unknowns,
        recursive: cli.recursive,
        family_id: cli.family,
        map_dir: cli.hapmap_dir,
        output_dir: cli.output_dir,
    };
    run(&config)?;
    Ok(())
}

fn main() {
    match run_cli() {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
