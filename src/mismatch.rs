//! `(k, m)` mismatch kernel.
//!
//! Two k-mers match when they differ in at most `m` positions and the kernel value is the
//! number of matching k-mer position pairs between two sequences. Instead of comparing every
//! pair, the k-mers of the first sequence are walked as a trie over an integer alphabet. Each
//! node carries the k-mer positions of the second sequence that are still within `m`
//! substitutions of the node prefix, and a branch is abandoned as soon as either side runs
//! empty.

use crate::error::Error;
use crate::Result;

/// Dense integer codes for the symbols of a set of sequences
#[derive(Clone)]
pub struct Alphabet {
    codes: [Option<u8>; 256],
    size: usize,
}

impl std::fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbols: String = (0..=255u8)
            .filter(|b| self.codes[*b as usize].is_some())
            .map(|b| b as char)
            .collect();
        f.debug_struct("Alphabet")
            .field("symbols", &symbols)
            .finish()
    }
}

impl Alphabet {
    /// Assigns codes `0..n` to the distinct symbols of `seqs` in byte order, so the same
    /// symbol gets the same code in every sequence
    pub fn from_sequences(seqs: &[&[u8]]) -> Self {
        let mut seen = [false; 256];
        seqs.iter()
            .flat_map(|seq| seq.iter())
            .for_each(|b| seen[*b as usize] = true);

        let mut codes = [None; 256];
        let mut size = 0;
        for (symbol, _) in seen.iter().enumerate().filter(|(_, seen)| **seen) {
            codes[symbol] = Some(size as u8);
            size += 1;
        }
        Self { codes, size }
    }

    /// Number of distinct symbols
    pub fn len(&self) -> usize {
        self.size
    }

    /// Checks if no symbol was seen
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Maps every symbol of `seq` to its code, symbols outside the alphabet map to `None`
    pub fn encode(&self, seq: &[u8]) -> Option<Vec<u8>> {
        seq.iter().map(|b| self.codes[*b as usize]).collect()
    }
}

/// Kernel matrix of a wild type/mutant pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MismatchScore {
    /// `[[K(a, a), K(a, b)], [K(b, a), K(b, b)]]`
    pub matrix: [[u64; 2]; 2],
}

impl MismatchScore {
    /// The off-diagonal value used as the feature
    pub fn cross(&self) -> u64 {
        self.matrix[0][1]
    }

    /// Cosine normalised cross value, zero when either sequence has no k-mers
    pub fn normalized(&self) -> f64 {
        let (aa, bb) = (self.matrix[0][0], self.matrix[1][1]);
        if aa == 0 || bb == 0 {
            0.0
        } else {
            self.cross() as f64 / ((aa as f64) * (bb as f64)).sqrt()
        }
    }
}

/// Mismatch kernel over k-mers of length `k` tolerating `m` substitutions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MismatchKernel {
    k: usize,
    m: usize,
}

impl MismatchKernel {
    /// Creates the kernel, `k` must be at least one
    pub fn new(k: usize, m: usize) -> Result<Self> {
        if k == 0 {
            return Err(Error::InvalidKmerSize(k));
        }
        Ok(Self { k, m })
    }

    /// Kernel value between `a` and `b`
    pub fn score(&self, a: &[u8], b: &[u8]) -> u64 {
        let alphabet = Alphabet::from_sequences(&[a, b]);
        match (alphabet.encode(a), alphabet.encode(b)) {
            (Some(a), Some(b)) => self.encoded(&a, &b, alphabet.len()),
            _ => 0,
        }
    }

    /// Full 2x2 kernel matrix of `a` and `b` under one shared alphabet
    pub fn matrix(&self, a: &[u8], b: &[u8]) -> MismatchScore {
        let alphabet = Alphabet::from_sequences(&[a, b]);
        let (a, b) = match (alphabet.encode(a), alphabet.encode(b)) {
            (Some(a), Some(b)) => (a, b),
            _ => return MismatchScore::default(),
        };
        let n = alphabet.len();
        let cross = self.encoded(&a, &b, n);
        MismatchScore {
            matrix: [
                [self.encoded(&a, &a, n), cross],
                [cross, self.encoded(&b, &b, n)],
            ],
        }
    }

    /// Kernel value of two sequences already encoded with an alphabet of `alphabet_size`
    /// symbols
    pub fn encoded(&self, a: &[u8], b: &[u8], alphabet_size: usize) -> u64 {
        if self.k > a.len() || self.k > b.len() {
            return 0;
        }
        let traversal = Traversal {
            a,
            b,
            k: self.k,
            m: self.m,
            alphabet_size,
        };
        let a_alive: Vec<usize> = (0..=a.len() - self.k).collect();
        let b_alive: Vec<(usize, usize)> = (0..=b.len() - self.k).map(|pos| (pos, 0)).collect();
        traversal.descend(0, &a_alive, &b_alive)
    }
}

struct Traversal<'a> {
    a: &'a [u8],
    b: &'a [u8],
    k: usize,
    m: usize,
    alphabet_size: usize,
}

impl<'a> Traversal<'a> {
    /// `a_alive` holds the k-mer starts of `a` sharing the current prefix, `b_alive` the
    /// k-mer starts of `b` with their mismatch count against it
    fn descend(&self, depth: usize, a_alive: &[usize], b_alive: &[(usize, usize)]) -> u64 {
        if depth == self.k {
            return a_alive.len() as u64 * b_alive.len() as u64;
        }

        let mut total = 0;
        for symbol in 0..self.alphabet_size {
            let a_child: Vec<usize> = a_alive
                .iter()
                .copied()
                .filter(|pos| self.a[pos + depth] as usize == symbol)
                .collect();
            if a_child.is_empty() {
                continue;
            }

            let b_child: Vec<(usize, usize)> = b_alive
                .iter()
                .filter_map(|&(pos, mismatches)| {
                    let mismatches = mismatches + (self.b[pos + depth] as usize != symbol) as usize;
                    if mismatches <= self.m {
                        Some((pos, mismatches))
                    } else {
                        None
                    }
                })
                .collect();
            if b_child.is_empty() {
                continue;
            }

            total += self.descend(depth + 1, &a_child, &b_child);
        }
        total
    }
}
