use crate::error::Error;
use crate::kmer::KmerCounts;
use crate::mismatch::{MismatchKernel, MismatchScore};
use crate::reference::ReferenceStore;
use crate::sequence::{IndelPolicy, SequencePair};
use crate::spectrum::SpectrumScore;
use crate::variant::VariantRecord;
use crate::Result;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

/// Window/k-mer sweep used when none is supplied
pub const DEFAULT_SWEEP: &str = "5:1-3,4:1-3,3:1-3,2:1-2,1:1";

/// One `(window size, k-mer size)` combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SweepConfig {
    /// Bases taken either side of the variant
    pub window_size: usize,
    /// K-mer length
    pub kmer_size: usize,
}

impl SweepConfig {
    /// Creates a configuration, both sizes must be at least one
    pub fn new(window_size: usize, kmer_size: usize) -> Result<Self> {
        if window_size == 0 {
            return Err(Error::InvalidConfig("window size must be at least 1".into()));
        }
        if kmer_size == 0 {
            return Err(Error::InvalidKmerSize(kmer_size));
        }
        Ok(Self {
            window_size,
            kmer_size,
        })
    }
}

impl fmt::Display for SweepConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.window_size, self.kmer_size)
    }
}

/// Ordered list of configurations, parsed from entries such as `5:1-3,2:1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sweep(pub Vec<SweepConfig>);

impl FromStr for Sweep {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut configs = Vec::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let invalid = || Error::InvalidConfig(format!("could not parse entry `{}`", entry));
            let mut parts = entry.splitn(2, ':');
            let window = parts.next().ok_or_else(invalid)?;
            let kmers = parts.next().ok_or_else(invalid)?;
            let window: usize = window.trim().parse().map_err(|_| invalid())?;

            let (lo, hi) = match kmers.find('-') {
                Some(idx) => (&kmers[..idx], &kmers[idx + 1..]),
                None => (kmers, kmers),
            };
            let lo: usize = lo.trim().parse().map_err(|_| invalid())?;
            let hi: usize = hi.trim().parse().map_err(|_| invalid())?;
            if lo > hi {
                return Err(invalid());
            }
            for k in lo..=hi {
                configs.push(SweepConfig::new(window, k)?);
            }
        }
        if configs.is_empty() {
            return Err(Error::InvalidConfig("no configurations given".into()));
        }
        Ok(Sweep(configs))
    }
}

/// Kernel used to compare the wild type and mutant windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelKind {
    /// Exact p-spectrum kernel, four feature columns
    Spectrum,
    /// Mismatch kernel tolerating `mismatches` substitutions per k-mer
    Mismatch {
        /// Substitutions tolerated
        mismatches: usize,
        /// Also emit the cosine normalised value
        normalize: bool,
    },
}

impl KernelKind {
    /// Names of the feature columns this kernel produces
    pub fn feature_columns(&self) -> &'static [&'static str] {
        match self {
            KernelKind::Spectrum => &[
                "sum_squares_wt",
                "cross_wt_mut",
                "cross_mut_wt",
                "sum_squares_mutant",
            ],
            KernelKind::Mismatch {
                normalize: false, ..
            } => &["mismatch_kernel"],
            KernelKind::Mismatch {
                normalize: true, ..
            } => &["mismatch_kernel", "mismatch_kernel_normalized"],
        }
    }
}

/// Kernel values of one variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KernelFeatures {
    /// Spectrum kernel between wild type and mutant
    Spectrum(SpectrumScore),
    /// Mismatch kernel matrix, `normalize` controls the extra column
    Mismatch {
        /// Kernel matrix
        score: MismatchScore,
        /// Whether the normalised value is emitted
        normalize: bool,
    },
}

impl KernelFeatures {
    /// Feature values in column order
    pub fn values(&self) -> Vec<String> {
        match self {
            KernelFeatures::Spectrum(score) => {
                score.features().iter().map(|v| v.to_string()).collect()
            }
            KernelFeatures::Mismatch { score, normalize } => {
                let mut values = vec![score.cross().to_string()];
                if *normalize {
                    values.push(format!("{:.6}", score.normalized()));
                }
                values
            }
        }
    }
}

/// Variant fields followed by its kernel features
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// The original variant
    pub variant: VariantRecord,
    /// Kernel values for the variant
    pub features: KernelFeatures,
}

/// Variant excluded from a table together with the reason
#[derive(Debug)]
pub struct SkippedVariant {
    /// Position of the variant in the input
    pub index: usize,
    /// The excluded variant
    pub variant: VariantRecord,
    /// Why the variant was excluded
    pub reason: Error,
}

/// All rows of one configuration, in input order
#[derive(Debug)]
pub struct FeatureTable {
    /// Configuration the table was computed for
    pub config: SweepConfig,
    /// Kernel used
    pub kernel: KernelKind,
    /// One row per successfully processed variant
    pub rows: Vec<FeatureRow>,
    /// Variants that could not be processed
    pub skipped: Vec<SkippedVariant>,
}

/// Computes the features of a single variant
pub fn variant_features<S: ReferenceStore + ?Sized>(
    store: &S,
    variant: &VariantRecord,
    config: SweepConfig,
    kernel: KernelKind,
    policy: IndelPolicy,
) -> Result<FeatureRow> {
    let pair = SequencePair::build(store, variant, config.window_size, policy)?;
    let (wild_type, mutant) = (pair.wild_type.as_bytes(), pair.mutant.as_bytes());

    let features = match kernel {
        KernelKind::Spectrum => KernelFeatures::Spectrum(SpectrumScore::new(
            &KmerCounts::new(wild_type, config.kmer_size),
            &KmerCounts::new(mutant, config.kmer_size),
        )),
        KernelKind::Mismatch {
            mismatches,
            normalize,
        } => {
            let kernel = MismatchKernel::new(config.kmer_size, mismatches)?;
            KernelFeatures::Mismatch {
                score: kernel.matrix(wild_type, mutant),
                normalize,
            }
        }
    };

    Ok(FeatureRow {
        variant: variant.clone(),
        features,
    })
}

/// Builds the feature table of one configuration.
///
/// Variants are processed in parallel on the current rayon pool and merged back in input
/// order. A variant whose windows cannot be built is excluded and recorded in
/// [`FeatureTable::skipped`], no partial row is emitted for it.
pub fn assemble<S: ReferenceStore + Sync + ?Sized>(
    variants: &[VariantRecord],
    store: &S,
    config: SweepConfig,
    kernel: KernelKind,
    policy: IndelPolicy,
) -> FeatureTable {
    info!(
        "Computing {:?} kernel features for window size {} and k-mer size {}",
        kernel, config.window_size, config.kmer_size
    );
    let results = variants
        .par_iter()
        .map(|variant| variant_features(store, variant, config, kernel, policy))
        .collect::<Vec<Result<FeatureRow>>>();

    let mut rows = Vec::with_capacity(results.len());
    let mut skipped = Vec::new();
    for (index, (result, variant)) in results.into_iter().zip(variants).enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(reason) => {
                debug!("Skipping variant {}: {}", variant.desc(), reason);
                skipped.push(SkippedVariant {
                    index,
                    variant: variant.clone(),
                    reason,
                })
            }
        }
    }

    if !skipped.is_empty() {
        warn!(
            "Configuration {} excluded {} of {} variants",
            config,
            skipped.len(),
            variants.len()
        );
    }

    FeatureTable {
        config,
        kernel,
        rows,
        skipped,
    }
}

impl Sweep {
    /// Assembles every configuration in order and hands each table to `sink` before the next
    /// one is computed. `cancel` is checked between configurations, the configurations that
    /// were completed are returned.
    pub fn run<S, F>(
        &self,
        variants: &[VariantRecord],
        store: &S,
        kernel: KernelKind,
        policy: IndelPolicy,
        cancel: &AtomicBool,
        mut sink: F,
    ) -> Result<Vec<SweepConfig>>
    where
        S: ReferenceStore + Sync + ?Sized,
        F: FnMut(FeatureTable) -> Result<()>,
    {
        let mut completed = Vec::with_capacity(self.0.len());
        for config in self.0.iter() {
            if cancel.load(Ordering::Relaxed) {
                warn!(
                    "Sweep cancelled after {} of {} configurations",
                    completed.len(),
                    self.0.len()
                );
                break;
            }
            sink(assemble(variants, store, *config, kernel, policy))?;
            completed.push(*config);
        }
        Ok(completed)
    }
}
