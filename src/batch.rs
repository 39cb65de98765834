use crate::gene_model::GeneModelReader;
use crate::input::open_input;
use crate::report::Reporter;
use crate::scan::scan_interval;
use crate::variant_index::VariantIndex;
use anyhow::{Context, Result};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Sample report files are selected by this literal name prefix
pub const SAMPLE_PREFIX: &str = "all";

/// Configuration for one batch run
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub ref_flat: PathBuf,
    pub hit_path: PathBuf,
    pub miss_path: PathBuf,
    pub quiet: bool,
}

/// List the sample report files in a directory: regular files whose name
/// starts with the sample prefix, sorted by path so re-runs see the same
/// order regardless of directory listing order.
pub fn discover_sample_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with(SAMPLE_PREFIX) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Run the whole batch: discover sample reports, then for each one build a
/// fresh index and scan every interval of the gene model against it.
///
/// The hit and miss streams are opened once, in append mode, and shared by
/// every sample iteration; row order is file order then gene model line order.
pub fn run_batch(config: &BatchConfig) -> Result<()> {
    let samples = discover_sample_files(&config.input_dir)?;
    if !config.quiet {
        eprintln!(
            "Found {} sample report(s) in {}",
            samples.len(),
            config.input_dir.display()
        );
    }

    let mut reporter = Reporter::open(&config.hit_path, &config.miss_path)?;
    for sample in &samples {
        process_sample(sample, &config.ref_flat, &mut reporter, config.quiet)?;
    }
    Ok(())
}

fn process_sample(
    sample: &Path,
    ref_flat: &Path,
    reporter: &mut Reporter<File>,
    quiet: bool,
) -> Result<()> {
    if !quiet {
        eprintln!("Processing {}", sample.display());
    }

    let report_reader = open_input(sample)?;
    let index = VariantIndex::from_reader(report_reader)
        .with_context(|| format!("parsing variant report {}", sample.display()))?;
    if !quiet {
        eprintln!(
            "  indexed {} position(s) across {} chromosome(s)",
            index.position_count(),
            index.chromosome_count()
        );
    }

    // The gene model is re-opened from the start for every sample
    let gene_reader = open_input(ref_flat)?;
    let mut genes = GeneModelReader::new(gene_reader);

    let source = sample.to_string_lossy();
    let mut hits = 0usize;
    let mut misses = 0usize;
    while let Some(gene) = genes
        .read_interval()
        .with_context(|| format!("parsing gene model {}", ref_flat.display()))?
    {
        let found = scan_interval(&index, &gene);
        log::debug!(
            "{} {} [{}, {}] -> {:?}",
            gene.gene_name,
            gene.chromosome,
            gene.tx_start,
            gene.tx_end,
            found
        );
        match found {
            Some(_) => hits += 1,
            None => misses += 1,
        }
        reporter.report(&source, &gene, &index, found)?;
    }

    if !quiet {
        eprintln!("  {hits} hit(s), {misses} miss(es)");
    }
    Ok(())
}
