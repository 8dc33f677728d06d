#![warn(missing_debug_implementations, rust_2018_idioms)]

//! Writes spectrum or mismatch kernel feature tables for a sweep of window and k-mer sizes.
mod cli;

use log::{info, warn};
use std::sync::atomic::AtomicBool;
use structopt::StructOpt;
use varkernel::error::Error;
use varkernel::output::save_table;
use varkernel::reference::SeqMap;
use varkernel::variant::VariantTable;
use varkernel::Result;

fn main() -> Result<()> {
    let opt = cli::VarKernel::from_args();
    opt.set_logging();

    rayon::ThreadPoolBuilder::new()
        .num_threads(opt.threads)
        .build_global()
        .map_err(|_| Error::ThreadError)?;

    let store = SeqMap::from_path(&opt.reference)?;
    let table = VariantTable::from_path(&opt.variants, opt.keep_sex_chromosomes)?;
    std::fs::create_dir_all(&opt.output_dir)?;

    let kernel = opt.kernel_kind();
    let cancel = AtomicBool::new(false);
    let mut skipped = 0;

    let completed = opt.sweep.run(
        &table.records,
        &store,
        kernel,
        opt.indel_policy,
        &cancel,
        |features| {
            skipped += features.skipped.len();
            save_table(&features, &table.malformed, &opt.output_dir).map(|_| ())
        },
    )?;

    if !table.malformed.is_empty() {
        warn!(
            "{} malformed variant rows were not processed, see the skipped reports in {}",
            table.malformed.len(),
            opt.output_dir.display()
        );
    }
    info!(
        "Finished {} configurations for {} variants, {} exclusions across all tables",
        completed.len(),
        table.records.len(),
        skipped
    );
    Ok(())
}
