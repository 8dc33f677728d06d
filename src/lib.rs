#![warn(missing_debug_implementations, rust_2018_idioms, missing_docs)]

//! String-kernel features for single nucleotide and short indel variants.
//!
//! For every variant a wild-type window is cut from the reference and a mutant window is
//! built by splicing in the alternate allele. The two windows are compared with either the
//! exact p-spectrum kernel or the `(k, m)` mismatch kernel, and the resulting similarity
//! values become feature columns next to the original variant fields.
//!

/// Error type shared by the whole crate
pub mod error;
/// Per-configuration feature tables and the window/k-mer sweep
pub mod features;
/// Sliding k-mer windows and exact counts
pub mod kmer;
pub mod mismatch;
/// Delimited text output
pub mod output;
/// Reference sequence access
pub mod reference;
/// Wild type and mutant windows
pub mod sequence;
/// p-spectrum kernel
pub mod spectrum;
/// Variant table input
pub mod variant;

pub use crate::error::Error;

/// Nucleotide alphabet used
pub const NUCLEOTIDES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Crate wide result type
pub type Result<T> = std::result::Result<T, crate::error::Error>;
