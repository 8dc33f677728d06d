use env_logger::Builder;
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;
use structopt::StructOpt;
use varkernel::error::Error;
use varkernel::features::{KernelKind, Sweep, DEFAULT_SWEEP};
use varkernel::sequence::IndelPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KernelName {
    Spectrum,
    Mismatch,
}

impl FromStr for KernelName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spectrum" => Ok(KernelName::Spectrum),
            "mismatch" => Ok(KernelName::Mismatch),
            other => Err(Error::InvalidConfig(format!(
                "unknown kernel `{}`, expected `spectrum` or `mismatch`",
                other
            ))),
        }
    }
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "varkernel",
    about = "Spectrum and mismatch kernel features between wild type and mutant variant windows"
)]
pub(crate) struct VarKernel {
    #[structopt(
        short,
        long,
        help = "Reference FASTA, optionally gzipped",
        parse(from_os_str)
    )]
    pub reference: PathBuf,
    #[structopt(
        short = "i",
        long,
        help = "Headerless TSV with chrom, pos, ref, alt, recurrence and driver status columns",
        parse(from_os_str)
    )]
    pub variants: PathBuf,
    #[structopt(
        short,
        long,
        default_value = ".",
        help = "Directory receiving one `{window}_{kmer}_kernel.txt` per configuration",
        parse(from_os_str)
    )]
    pub output_dir: PathBuf,
    #[structopt(
        short,
        long,
        default_value = DEFAULT_SWEEP,
        help = "Comma separated `window:kmin-kmax` or `window:k` configurations"
    )]
    pub sweep: Sweep,
    #[structopt(
        long,
        default_value = "spectrum",
        possible_values = &["spectrum", "mismatch"],
        help = "Kernel comparing wild type and mutant"
    )]
    pub kernel: KernelName,
    #[structopt(
        short,
        long,
        default_value = "1",
        help = "Substitutions tolerated per k-mer by the mismatch kernel"
    )]
    pub mismatches: usize,
    #[structopt(long, help = "Also write the cosine normalised mismatch kernel")]
    pub normalize: bool,
    #[structopt(
        long,
        default_value = "keep",
        possible_values = &["keep", "snv-only"],
        help = "Keep indels with unequal window lengths or only allow single base substitutions"
    )]
    pub indel_policy: IndelPolicy,
    #[structopt(long, help = "Do not remove variants on chromosomes X and Y")]
    pub keep_sex_chromosomes: bool,
    #[structopt(short, long, default_value = "1", help = "Number of threads")]
    pub threads: usize,
    #[structopt(short, long, help = "Debug level logging")]
    pub verbose: bool,
    #[structopt(short, long, conflicts_with = "verbose", help = "Only log errors")]
    pub quiet: bool,
}

impl VarKernel {
    /// Kernel selected on the command line
    pub fn kernel_kind(&self) -> KernelKind {
        match self.kernel {
            KernelName::Spectrum => KernelKind::Spectrum,
            KernelName::Mismatch => KernelKind::Mismatch {
                mismatches: self.mismatches,
                normalize: self.normalize,
            },
        }
    }

    /// Initialises `env_logger`, `RUST_LOG` filters take precedence over the flags
    pub fn set_logging(&self) {
        let level = if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Error
        } else {
            LevelFilter::Info
        };

        let mut builder = Builder::new();
        builder.filter_level(level);
        if let Ok(filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }
        builder.init();
    }
}
