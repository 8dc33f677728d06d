use crate::error::Error;
use crate::features::{FeatureTable, SweepConfig};
use crate::variant::normalized_chrom;
use crate::Result;
use log::info;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Variant columns written before the kernel features
pub const VARIANT_HEADER: [&str; 6] = [
    "chrom",
    "pos",
    "reference_allele",
    "alternate_allele",
    "recurrence",
    "driver_status",
];

/// Path of the feature table for a configuration, `{window}_{kmer}_kernel.txt`
pub fn table_path<P: AsRef<Path>>(dir: P, config: SweepConfig) -> PathBuf {
    dir.as_ref().join(format!("{}_kernel.txt", config))
}

/// Path of the excluded variant report for a configuration, `{window}_{kmer}_skipped.txt`
pub fn skipped_path<P: AsRef<Path>>(dir: P, config: SweepConfig) -> PathBuf {
    dir.as_ref().join(format!("{}_skipped.txt", config))
}

/// Writes the rows of `table` as tab separated text with a header line. Chromosome names
/// lose their `chr` prefix.
pub fn write_table<W: Write>(table: &FeatureTable, wtr: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(wtr);

    wtr.write_record(
        VARIANT_HEADER
            .iter()
            .chain(table.kernel.feature_columns().iter()),
    )?;
    for row in table.rows.iter() {
        let v = &row.variant;
        let mut record = vec![
            normalized_chrom(&v.chrom).to_string(),
            v.pos.to_string(),
            v.reference_allele.clone(),
            v.alternate_allele.clone(),
            v.recurrence.to_string(),
            v.driver_status.clone(),
        ];
        record.extend(row.features.values());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes one line per excluded variant with its input index and the reason, followed by
/// one line per variant row rejected at load time. Rejected rows have no index, chromosome or
/// position, their reason carries the input line number.
pub fn write_skipped<W: Write>(table: &FeatureTable, malformed: &[Error], wtr: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(wtr);

    wtr.write_record(&["index", "chrom", "pos", "reason"])?;
    for skipped in table.skipped.iter() {
        wtr.write_record(&[
            skipped.index.to_string(),
            skipped.variant.chrom.clone(),
            skipped.variant.pos.to_string(),
            skipped.reason.to_string(),
        ])?;
    }
    for reason in malformed.iter() {
        wtr.write_record(&["-", "-", "-", reason.to_string().as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Persists a table in `dir`, the skipped report is only written when a variant was excluded
/// or a row of the variant table was `malformed`. Returns the path of the feature table.
pub fn save_table<P: AsRef<Path>>(
    table: &FeatureTable,
    malformed: &[Error],
    dir: P,
) -> Result<PathBuf> {
    let path = table_path(&dir, table.config);
    write_table(table, std::fs::File::create(&path)?)?;
    info!(
        "Wrote {} rows to {}",
        table.rows.len(),
        path.display()
    );

    if !table.skipped.is_empty() || !malformed.is_empty() {
        let skipped = skipped_path(&dir, table.config);
        write_skipped(table, malformed, std::fs::File::create(&skipped)?)?;
        info!(
            "Wrote {} excluded variants and {} malformed rows to {}",
            table.skipped.len(),
            malformed.len(),
            skipped.display()
        );
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{assemble, KernelKind};
    use crate::reference::SeqMap;
    use crate::sequence::IndelPolicy;
    use crate::variant::VariantRecord;

    fn table(kernel: KernelKind) -> FeatureTable {
        let store: SeqMap = vec![("chr3", b"CCCCAAAACCCC".to_vec())].into_iter().collect();
        let variants = vec![
            VariantRecord {
                chrom: "chr3".to_string(),
                pos: 7,
                reference_allele: "A".to_string(),
                alternate_allele: "T".to_string(),
                recurrence: 9,
                driver_status: "1".to_string(),
            },
            VariantRecord {
                chrom: "chr3".to_string(),
                pos: 1,
                reference_allele: "C".to_string(),
                alternate_allele: "T".to_string(),
                recurrence: 6,
                driver_status: "0".to_string(),
            },
        ];
        assemble(
            &variants,
            &store,
            SweepConfig::new(2, 2).unwrap(),
            kernel,
            IndelPolicy::Keep,
        )
    }

    #[test]
    fn test_paths() {
        let config = SweepConfig::new(5, 3).unwrap();
        assert_eq!(table_path("out", config), Path::new("out/5_3_kernel.txt"));
        assert_eq!(skipped_path("out", config), Path::new("out/5_3_skipped.txt"));
    }

    #[test]
    fn test_write_spectrum_table() {
        let mut out = Vec::new();
        write_table(&table(KernelKind::Spectrum), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "chrom\tpos\treference_allele\talternate_allele\trecurrence\tdriver_status\t\
             sum_squares_wt\tcross_wt_mut\tcross_mut_wt\tsum_squares_mutant\n\
             3\t7\tA\tT\t9\t1\t9\t3\t3\t3\n"
        );
    }

    #[test]
    fn test_write_mismatch_table() {
        let mut out = Vec::new();
        let kernel = KernelKind::Mismatch {
            mismatches: 1,
            normalize: false,
        };
        write_table(&table(kernel), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("driver_status\tmismatch_kernel"));
        assert_eq!(lines[1], "3\t7\tA\tT\t9\t1\t9");
    }

    #[test]
    fn test_write_skipped() {
        let mut out = Vec::new();
        write_skipped(&table(KernelKind::Spectrum), &[], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "index\tchrom\tpos\treason");
        assert!(lines[1].starts_with("1\tchr3\t1\tWindow -2..2 on `chr3`"));
    }

    #[test]
    fn test_write_skipped_with_malformed_rows() {
        let malformed = vec![Error::MalformedVariantRow(4, "expected 6 columns".to_string())];
        let mut out = Vec::new();
        write_skipped(&table(KernelKind::Spectrum), &malformed, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[2],
            "-\t-\t-\tMalformed variant row at line 4: expected 6 columns"
        );
    }

    #[test]
    fn test_save_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_table(&table(KernelKind::Spectrum), &[], dir.path()).unwrap();
        assert_eq!(path, dir.path().join("2_2_kernel.txt"));
        assert!(path.exists());
        assert!(dir.path().join("2_2_skipped.txt").exists());
    }

    #[test]
    fn test_save_table_reports_malformed_rows_only() {
        let store: SeqMap = vec![("chr3", b"CCCCAAAACCCC".to_vec())].into_iter().collect();
        let clean = assemble(
            &[],
            &store,
            SweepConfig::new(2, 2).unwrap(),
            KernelKind::Spectrum,
            IndelPolicy::Keep,
        );
        let dir = tempfile::tempdir().unwrap();
        save_table(&clean, &[], dir.path()).unwrap();
        assert!(!dir.path().join("2_2_skipped.txt").exists());

        let malformed = vec![Error::MalformedVariantRow(2, "bad position".to_string())];
        save_table(&clean, &malformed, dir.path()).unwrap();
        let report = std::fs::read_to_string(dir.path().join("2_2_skipped.txt")).unwrap();
        assert!(report.contains("Malformed variant row at line 2: bad position"));
    }
}
