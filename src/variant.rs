use crate::error::Error;
use crate::Result;
use log::{debug, info, warn};
use serde::Deserialize;
use std::path::Path;

/// Number of columns in a variant table row
pub const VARIANT_COLUMNS: usize = 6;

/// Chromosomes removed at load unless explicitly kept
pub const SEX_CHROMOSOMES: [&str; 2] = ["X", "Y"];

/// Prefix stripped from chromosome names when they are written out
pub const CHROM_PREFIX: &str = "chr";

/// A single row of the variant table, `pos` is 1-based
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[allow(missing_docs)]
pub struct VariantRecord {
    pub chrom: String,
    pub pos: u64,
    pub reference_allele: String,
    pub alternate_allele: String,
    pub recurrence: u32,
    pub driver_status: String,
}

impl VariantRecord {
    /// Returns a description of the variant in the form `chrom:pos:ref>alt`
    pub fn desc(&self) -> String {
        format!(
            "{}:{}:{}>{}",
            self.chrom, self.pos, self.reference_allele, self.alternate_allele
        )
    }

    /// Checks if reference and alternate alleles are both a single base
    pub fn is_snv(&self) -> bool {
        self.reference_allele.len() == 1 && self.alternate_allele.len() == 1
    }

    /// Checks if the variant lies on chromosome X or Y, with or without a `chr` prefix
    pub fn is_sex_chromosome(&self) -> bool {
        SEX_CHROMOSOMES.contains(&normalized_chrom(&self.chrom))
    }
}

/// Strips a leading `chr` from a chromosome name
pub fn normalized_chrom(chrom: &str) -> &str {
    chrom.strip_prefix(CHROM_PREFIX).unwrap_or(chrom)
}

/// Parsed variant table, rows that could not be parsed are kept with their reason
#[derive(Debug, Default)]
pub struct VariantTable {
    /// Variants in input order
    pub records: Vec<VariantRecord>,
    /// One [`Error::MalformedVariantRow`] per rejected line
    pub malformed: Vec<Error>,
    /// Number of rows dropped by the sex chromosome filter
    pub filtered: usize,
}

impl VariantTable {
    /// Reads a headerless tab separated variant table from a path
    pub fn from_path<P: AsRef<Path>>(path: P, keep_sex_chromosomes: bool) -> Result<Self> {
        info!("Reading variants from {}...", path.as_ref().display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file), keep_sex_chromosomes)
    }

    /// Reads a headerless tab separated variant table with columns
    /// `chrom, pos, reference_allele, alternate_allele, recurrence, driver_status`
    pub fn from_reader<R: std::io::Read>(rdr: R, keep_sex_chromosomes: bool) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(rdr);

        let mut table = VariantTable::default();
        for (i, row) in rdr.records().enumerate() {
            let row = match row {
                Ok(row) => row,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    let line = e.position().map_or(i + 1, |p| p.line() as usize);
                    table.reject(line, e.to_string());
                    continue;
                }
            };
            let line = row.position().map_or(i + 1, |p| p.line() as usize);
            match parse_row(&row) {
                Ok(record) if !keep_sex_chromosomes && record.is_sex_chromosome() => {
                    debug!("Removing variant {} on a sex chromosome", record.desc());
                    table.filtered += 1;
                }
                Ok(record) => table.records.push(record),
                Err(reason) => table.reject(line, reason),
            }
        }

        info!(
            "Loaded {} variants ({} malformed, {} on sex chromosomes removed)",
            table.records.len(),
            table.malformed.len(),
            table.filtered
        );
        Ok(table)
    }

    fn reject(&mut self, line: usize, reason: String) {
        let err = Error::MalformedVariantRow(line, reason);
        warn!("{}", err);
        self.malformed.push(err);
    }
}

fn parse_row(row: &csv::StringRecord) -> std::result::Result<VariantRecord, String> {
    if row.len() != VARIANT_COLUMNS {
        return Err(format!(
            "expected {} columns but found {}",
            VARIANT_COLUMNS,
            row.len()
        ));
    }
    let record: VariantRecord = row.deserialize(None).map_err(|e| e.to_string())?;

    if record.pos == 0 {
        return Err("position must be 1-based".to_string());
    }
    if record.chrom.is_empty() {
        return Err("empty chromosome".to_string());
    }
    if record.reference_allele.is_empty() || record.alternate_allele.is_empty() {
        return Err("empty allele".to_string());
    }
    Ok(record)
}
