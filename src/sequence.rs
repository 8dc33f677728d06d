use crate::error::Error;
use crate::reference::ReferenceStore;
use crate::variant::VariantRecord;
use crate::Result;
use log::debug;
use std::convert::TryFrom;
use std::str::FromStr;

/// How alleles of unequal length are handled when building the mutant window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndelPolicy {
    /// Splice the alternate allele in as is, wild type and mutant may differ in length
    Keep,
    /// Reject anything but single base substitutions with [`Error::UnsupportedAllele`]
    SnvOnly,
}

impl Default for IndelPolicy {
    fn default() -> Self {
        IndelPolicy::Keep
    }
}

impl FromStr for IndelPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "keep" => Ok(IndelPolicy::Keep),
            "snv-only" => Ok(IndelPolicy::SnvOnly),
            other => Err(Error::InvalidConfig(format!(
                "unknown indel policy `{}`, expected `keep` or `snv-only`",
                other
            ))),
        }
    }
}

/// Upper-cased wild type and mutant windows around a variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePair {
    /// Reference window `[pos - 1 - w, pos - 1 + w)`
    pub wild_type: String,
    /// Reference flanks with the alternate allele in place of the variant base
    pub mutant: String,
}

impl SequencePair {
    /// Builds the windows for `variant` using 0-based half-open slices of the reference.
    ///
    /// The variant base sits at offset `pos - 1`. The wild type covers `w` bases either side
    /// of it (the variant base being the first of the right flank) and the mutant is
    /// `[pos - 1 - w, pos - 1) + alt + [pos, pos - 1 + w)`. For a substitution both windows
    /// are `2 * w` long.
    pub fn build<S: ReferenceStore + ?Sized>(
        store: &S,
        variant: &VariantRecord,
        window_size: usize,
        policy: IndelPolicy,
    ) -> Result<Self> {
        if policy == IndelPolicy::SnvOnly && !variant.is_snv() {
            return Err(Error::UnsupportedAllele {
                reference: variant.reference_allele.clone(),
                alternate: variant.alternate_allele.clone(),
            });
        }
        if !store.has_chromosome(&variant.chrom) {
            return Err(Error::UnknownChromosome(variant.chrom.clone()));
        }

        let chrom = variant.chrom.as_str();
        let (start, offset, end) = window_bounds(variant.pos, window_size).ok_or_else(|| {
            let pos = i64::try_from(variant.pos).unwrap_or(i64::MAX);
            let w = i64::try_from(window_size).unwrap_or(i64::MAX);
            Error::OutOfRangeWindow {
                chrom: chrom.to_string(),
                start: (pos - 1).saturating_sub(w),
                end: (pos - 1).saturating_add(w),
                len: store.chromosome_len(chrom).unwrap_or(0),
            }
        })?;

        let wild_type = store.slice(chrom, start, end)?;
        let left = store.slice(chrom, start, offset)?;
        let right = store.slice(chrom, offset + 1, end)?;

        let mut mutant =
            Vec::with_capacity(left.len() + variant.alternate_allele.len() + right.len());
        mutant.extend_from_slice(left);
        mutant.extend_from_slice(variant.alternate_allele.as_bytes());
        mutant.extend_from_slice(right);

        let pair = Self {
            wild_type: String::from_utf8(wild_type.to_ascii_uppercase())?,
            mutant: String::from_utf8(mutant.to_ascii_uppercase())?,
        };
        debug!(
            "Variant {} has wild type {} and mutant {}",
            variant.desc(),
            pair.wild_type,
            pair.mutant
        );
        if !pair.is_balanced() {
            debug!(
                "Variant {} windows differ in length: {} vs {}",
                variant.desc(),
                pair.wild_type.len(),
                pair.mutant.len()
            );
        }
        Ok(pair)
    }

    /// Checks if both windows have the same length
    pub fn is_balanced(&self) -> bool {
        self.wild_type.len() == self.mutant.len()
    }
}

/// `(start, offset, end)` of the wild type window, `None` when it does not fit in `i64`
fn window_bounds(pos: u64, window_size: usize) -> Option<(i64, i64, i64)> {
    let offset = i64::try_from(pos).ok()? - 1;
    let w = i64::try_from(window_size).ok()?;
    Some((offset.checked_sub(w)?, offset, offset.checked_add(w)?))
}
