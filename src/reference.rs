use crate::error::Error;
use crate::Result;
use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;

/// Random access to reference sequences by chromosome name and 0-based offsets.
pub trait ReferenceStore {
    /// Checks if the chromosome is present in the store
    fn has_chromosome(&self, name: &str) -> bool;

    /// Length of the chromosome if it is present
    fn chromosome_len(&self, name: &str) -> Option<usize>;

    /// Returns the half-open `[start, end)` slice of a chromosome. Never clips: a range
    /// outside the chromosome is an [`Error::OutOfRangeWindow`].
    fn slice(&self, name: &str, start: i64, end: i64) -> Result<&[u8]>;
}

/// In-memory reference keyed by FASTA record id
#[derive(Debug, Default)]
pub struct SeqMap {
    records: HashMap<String, Vec<u8>>,
}

impl SeqMap {
    /// Reads a (possibly compressed) FASTA file into memory
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Reading reference {}...", path.as_ref().display());
        let (rdr, format) = niffler::from_path(path)?;
        debug!("Reference compression format is {:?}", format);
        Self::from_reader(bio::io::fasta::Reader::new(rdr))
    }

    /// Collects every record of a FASTA reader
    pub fn from_reader<T: std::io::Read>(rdr: bio::io::fasta::Reader<T>) -> Result<Self> {
        let mut records = HashMap::new();
        for record in rdr.records() {
            let record = record?;
            debug!(
                "Loaded reference sequence {} of length {}",
                record.id(),
                record.seq().len()
            );
            records.insert(record.id().to_string(), record.seq().to_vec());
        }
        info!("Loaded {} reference sequences", records.len());
        Ok(Self { records })
    }

    /// Number of chromosomes in the store
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Checks if the store holds no chromosomes
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<K: Into<String>, V: Into<Vec<u8>>> std::iter::FromIterator<(K, V)> for SeqMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            records: iter
                .into_iter()
                .map(|(name, seq)| (name.into(), seq.into()))
                .collect(),
        }
    }
}

impl ReferenceStore for SeqMap {
    fn has_chromosome(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    fn chromosome_len(&self, name: &str) -> Option<usize> {
        self.records.get(name).map(Vec::len)
    }

    fn slice(&self, name: &str, start: i64, end: i64) -> Result<&[u8]> {
        let seq = self
            .records
            .get(name)
            .ok_or_else(|| Error::UnknownChromosome(name.to_string()))?;

        if start < 0 || end < start || end > seq.len() as i64 {
            return Err(Error::OutOfRangeWindow {
                chrom: name.to_string(),
                start,
                end,
                len: seq.len(),
            });
        }
        Ok(&seq[start as usize..end as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fasta_store() -> SeqMap {
        let fasta = b">chr1 test\nACGTacgtAC\nGT\n>chr2\nTTTT\n";
        SeqMap::from_reader(bio::io::fasta::Reader::new(&fasta[..])).unwrap()
    }

    #[test]
    fn test_reads_multiline_records() {
        let store = fasta_store();
        assert_eq!(store.len(), 2);
        assert_eq!(store.chromosome_len("chr1"), Some(12));
        assert_eq!(store.slice("chr1", 8, 12).unwrap(), b"ACGT");
        assert_eq!(store.slice("chr1", 4, 8).unwrap(), b"acgt");
    }

    #[test]
    fn test_slice_is_half_open() {
        let store = fasta_store();
        assert_eq!(store.slice("chr2", 0, 4).unwrap(), b"TTTT");
        assert!(store.slice("chr2", 2, 2).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_chromosome() {
        let store = fasta_store();
        assert!(!store.has_chromosome("chr3"));
        assert!(matches!(
            store.slice("chr3", 0, 1),
            Err(Error::UnknownChromosome(name)) if name == "chr3"
        ));
    }

    #[test]
    fn test_out_of_range_is_never_clipped() {
        let store = fasta_store();
        assert!(matches!(
            store.slice("chr2", -1, 3),
            Err(Error::OutOfRangeWindow { start: -1, .. })
        ));
        assert!(matches!(
            store.slice("chr2", 1, 5),
            Err(Error::OutOfRangeWindow { end: 5, len: 4, .. })
        ));
    }
}
