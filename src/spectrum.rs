use crate::kmer::KmerCounts;

/// p-spectrum kernel values between two sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpectrumScore {
    /// Sum of squared k-mer counts of the first sequence
    pub self_a: u64,
    /// Sum of squared k-mer counts of the second sequence
    pub self_b: u64,
    /// Dot product of the two count vectors
    pub cross: u64,
}

impl SpectrumScore {
    /// Computes the kernel from two count vectors.
    ///
    /// The cross term is a dot product over the k-mers of either sequence, a k-mer missing
    /// from one side contributes zero so only one side needs to be walked.
    pub fn new(a: &KmerCounts<'_>, b: &KmerCounts<'_>) -> Self {
        let (small, large) = if a.distinct() <= b.distinct() {
            (a, b)
        } else {
            (b, a)
        };
        let cross = small
            .iter()
            .map(|(kmer, count)| count * large.get(kmer))
            .sum();

        Self {
            self_a: sum_of_squares(a),
            self_b: sum_of_squares(b),
            cross,
        }
    }

    /// Computes the kernel for two sequences at k-mer length `k`
    pub fn from_sequences(a: &[u8], b: &[u8], k: usize) -> Self {
        Self::new(&KmerCounts::new(a, k), &KmerCounts::new(b, k))
    }

    /// Feature columns in the order `self_a, cross, cross, self_b`
    pub fn features(&self) -> [u64; 4] {
        [self.self_a, self.cross, self.cross, self.self_b]
    }
}

fn sum_of_squares(counts: &KmerCounts<'_>) -> u64 {
    counts.iter().map(|(_, count)| count * count).sum()
}
