use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

use varhit::batch::{run_batch, BatchConfig};

const DEFAULT_INPUT_DIR: &str = ".";
const DEFAULT_REF_FLAT: &str = "refFlat.txt";

/// varhit - Annotate gene-model intervals with overlapping variant calls
///
/// Scans per-sample variant reports (files named all*) against a refFlat gene
/// model and appends one row per gene interval to the hit or miss output
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Directory of sample variant reports; overrides the default together with REF_FLAT
    #[clap(value_name = "INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// refFlat gene model file; must be supplied together with INPUT_DIR
    #[clap(value_name = "REF_FLAT")]
    ref_flat: Option<PathBuf>,

    /// Output file for matched gene intervals (appended)
    #[clap(long = "hit", default_value = "hit.txt")]
    hit: PathBuf,

    /// Output file for unmatched gene intervals (appended)
    #[clap(long = "miss", default_value = "miss.txt")]
    miss: PathBuf,

    /// Quiet mode (no progress output)
    #[clap(long = "quiet")]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let (input_dir, ref_flat) = match (args.input_dir, args.ref_flat) {
        (Some(input_dir), Some(ref_flat)) => (input_dir, ref_flat),
        (None, None) => (
            PathBuf::from(DEFAULT_INPUT_DIR),
            PathBuf::from(DEFAULT_REF_FLAT),
        ),
        _ => bail!("INPUT_DIR and REF_FLAT must be supplied together, or both omitted for the defaults"),
    };

    if !args.quiet {
        eprintln!("input dir: {}", input_dir.display());
        eprintln!("gene model: {}", ref_flat.display());
    }

    run_batch(&BatchConfig {
        input_dir,
        ref_flat,
        hit_path: args.hit,
        miss_path: args.miss,
        quiet: args.quiet,
    })
}
