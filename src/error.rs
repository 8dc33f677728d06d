use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised while loading inputs, building sequence windows or writing feature tables
pub enum Error {
    #[error("Could not read or write file")]
    /// Underlying I/O failure, including unreadable FASTA entries
    IoError(#[from] std::io::Error),
    #[error("Could not convert bytes in FASTA as it is invalid UTF-8")]
    /// Data is not in UTF-8 format
    NotUTF8(#[from] std::string::FromUtf8Error),
    #[error("Could not create read FASTA file")]
    /// Read FASTA error
    FastaError(#[from] niffler::Error),
    #[error("Could not read/write delimited table")]
    /// Variant or feature table I/O error
    TableError(#[from] csv::Error),
    #[error("Could not spawn threads")]
    /// Create thread pools erorr
    ThreadError,
    #[error("Chromosome `{0}` is not present in the reference")]
    /// Variant refers to a sequence missing from the reference store
    UnknownChromosome(String),
    #[error("Window {start}..{end} on `{chrom}` is outside the chromosome bounds 0..{len}")]
    /// Requested window extends past either end of the chromosome
    OutOfRangeWindow {
        /// Chromosome name
        chrom: String,
        /// Requested 0-based start, negative when the window begins before the chromosome
        start: i64,
        /// Requested 0-based exclusive end
        end: i64,
        /// Chromosome length
        len: usize,
    },
    #[error("Malformed variant row at line {0}: {1}")]
    /// Variant table row with missing or unparseable fields
    MalformedVariantRow(usize, String),
    #[error("Only single nucleotide variants are allowed but got {reference} > {alternate}")]
    /// Indel rejected under the single nucleotide policy
    UnsupportedAllele {
        /// Reference allele
        reference: String,
        /// Alternate allele
        alternate: String,
    },
    #[error("Invalid configuration: {0}")]
    /// Sweep, window size or option value could not be parsed
    InvalidConfig(String),
    #[error("K-mer size must be at least 1 but got {0}")]
    /// Zero length k-mers were requested
    InvalidKmerSize(usize),
}
