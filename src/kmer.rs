use bio::alignment::sparse::HashMapFx;

/// Overlapping k-mers of a sequence, advancing one base at a time.
///
/// A clone resumes from the same position, [`KmerWindows::restart`] starts again from the
/// first k-mer. A `k` of zero or larger than the sequence yields no k-mers.
#[derive(Debug, Clone)]
pub struct KmerWindows<'a> {
    seq: &'a [u8],
    k: usize,
    pos: usize,
}

impl<'a> KmerWindows<'a> {
    /// Creates a sliding window of width `k` over `seq`
    pub fn new(seq: &'a [u8], k: usize) -> Self {
        Self { seq, k, pos: 0 }
    }

    /// Returns a fresh iterator positioned at the first k-mer
    pub fn restart(&self) -> Self {
        Self::new(self.seq, self.k)
    }

    /// Number of k-mers in the whole sequence, `len - k + 1` or zero
    pub fn total(&self) -> usize {
        if self.k == 0 || self.k > self.seq.len() {
            0
        } else {
            self.seq.len() - self.k + 1
        }
    }
}

impl<'a> Iterator for KmerWindows<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.total() {
            return None;
        }
        let kmer = &self.seq[self.pos..self.pos + self.k];
        self.pos += 1;
        Some(kmer)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total().saturating_sub(self.pos);
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for KmerWindows<'a> {}

/// Exact occurrence counts of every k-mer observed in one sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KmerCounts<'a> {
    counts: HashMapFx<&'a [u8], u64>,
}

impl<'a> KmerCounts<'a> {
    /// Tallies the overlapping k-mers of `seq`
    pub fn new(seq: &'a [u8], k: usize) -> Self {
        Self::from_windows(KmerWindows::new(seq, k))
    }

    /// Tallies the k-mers produced by a window iterator
    pub fn from_windows(windows: KmerWindows<'a>) -> Self {
        let counts = windows.fold(HashMapFx::default(), |mut counts, kmer| {
            *counts.entry(kmer).or_insert(0) += 1;
            counts
        });
        Self { counts }
    }

    /// Occurrences of `kmer`, zero when it was never observed
    pub fn get(&self, kmer: &[u8]) -> u64 {
        self.counts.get(kmer).copied().unwrap_or(0)
    }

    /// Number of distinct k-mers
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Sum of all counts, the number of k-mer positions in the sequence
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Checks if no k-mer was observed
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates over `(kmer, count)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&'a [u8], u64)> + '_ {
        self.counts.iter().map(|(kmer, count)| (*kmer, *count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bio::alignment::sparse::hash_kmers;

    #[test]
    fn test_windows() {
        let kmers: Vec<&[u8]> = KmerWindows::new(b"ACGTA", 3).collect();
        assert_eq!(kmers, vec![&b"ACG"[..], &b"CGT"[..], &b"GTA"[..]]);
    }

    #[test]
    fn test_windows_restart() {
        let mut windows = KmerWindows::new(b"ACGT", 2);
        assert_eq!(windows.len(), 3);
        windows.next();
        windows.next();
        assert_eq!(windows.len(), 1);
        let again = windows.restart();
        assert_eq!(again.len(), 3);
        assert_eq!(again.collect::<Vec<_>>().len(), 3);
    }

    #[test]
    fn test_degenerate_k() {
        assert_eq!(KmerWindows::new(b"ACG", 4).count(), 0);
        assert_eq!(KmerWindows::new(b"ACG", 0).count(), 0);
        assert!(KmerCounts::new(b"ACG", 4).is_empty());
        assert!(KmerCounts::new(b"", 1).is_empty());
    }

    #[test]
    fn test_counts_overlapping() {
        let a = KmerCounts::new(b"AAAA", 2);
        assert_eq!(a.get(b"AA"), 3);
        assert_eq!(a.distinct(), 1);

        let b = KmerCounts::new(b"AAAT", 2);
        assert_eq!(b.get(b"AA"), 2);
        assert_eq!(b.get(b"AT"), 1);
        assert_eq!(b.get(b"TT"), 0);
    }

    #[test]
    fn test_total_is_number_of_positions() {
        let seq = b"GATTACAGATTACACCGTN";
        for k in 1..=seq.len() {
            assert_eq!(KmerCounts::new(seq, k).total(), (seq.len() - k + 1) as u64);
        }
    }

    #[test]
    fn test_counts_agree_with_kmer_positions() {
        let seq = b"GCATGGTGTAGCATG";
        let counts = KmerCounts::new(seq, 3);
        let positions = hash_kmers(seq, 3);
        assert_eq!(counts.distinct(), positions.len());
        for (kmer, pos) in positions {
            assert_eq!(counts.get(kmer), pos.len() as u64);
        }
    }

    #[test]
    fn test_deterministic() {
        let seq = b"ACGTTGCAACGT";
        assert_eq!(KmerCounts::new(seq, 2), KmerCounts::new(seq, 2));
    }
}
