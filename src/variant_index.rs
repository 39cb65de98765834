use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::io::BufRead;

/// Header prefix of a variant report; repeated copies show up mid-file when
/// reports are concatenated, so record parsing skips any line starting with it.
const HEADER_PREFIX: &str = "Sample\tGroup\tChromosome\tPosition\tRead";

/// One data row of a variant report
#[derive(Debug, Clone)]
pub struct VariantRecord {
    pub sample: String,
    pub group: String,
    pub chromosome: String,
    pub position: u64,
    pub read: String,
    pub reference: String,
}

/// The (read, reference) pair attached to a variant position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub read: String,
    pub reference: String,
}

/// Per-sample lookup from chromosome to reported variant positions.
///
/// Positions are kept in file order with duplicates retained; annotations are
/// keyed by exact (chromosome, position) with last-write-wins on duplicates.
/// Built fresh for every sample report and dropped after its scan.
#[derive(Debug, Default)]
pub struct VariantIndex {
    positions: IndexMap<String, Vec<u64>>,
    annotations: HashMap<String, HashMap<u64, Annotation>>,
}

/// Parse one tab-delimited variant report row
pub fn parse_variant_line(line: &str) -> Result<VariantRecord> {
    let fields: Vec<&str> = line.split('\t').collect();

    if fields.len() < 6 {
        bail!(
            "variant report line has {} fields, expected at least 6: {:?}",
            fields.len(),
            line
        );
    }

    let position: u64 = fields[3]
        .parse()
        .with_context(|| format!("invalid variant position {:?}", fields[3]))?;

    Ok(VariantRecord {
        sample: fields[0].to_string(),
        group: fields[1].to_string(),
        chromosome: fields[2].to_string(),
        position,
        read: fields[4].to_string(),
        reference: fields[5].to_string(),
    })
}

impl VariantIndex {
    /// Build an index from a variant report stream.
    ///
    /// The first line is discarded as the header regardless of content; any
    /// later line carrying the literal header prefix is skipped as well.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<VariantIndex> {
        let mut index = VariantIndex::default();
        let mut lines = reader.lines();

        // Header line, always present
        if lines.next().transpose()?.is_none() {
            return Ok(index);
        }

        let mut line_no = 1usize;
        for line in lines {
            let line = line?;
            line_no += 1;
            if line.starts_with(HEADER_PREFIX) {
                continue;
            }
            let record = parse_variant_line(&line)
                .with_context(|| format!("variant report line {line_no}"))?;
            index.insert(record);
        }

        Ok(index)
    }

    /// Append a record's position and set its annotation, overwriting any
    /// earlier annotation at the same (chromosome, position)
    pub fn insert(&mut self, record: VariantRecord) {
        self.positions
            .entry(record.chromosome.clone())
            .or_default()
            .push(record.position);
        self.annotations
            .entry(record.chromosome)
            .or_default()
            .insert(
                record.position,
                Annotation {
                    read: record.read,
                    reference: record.reference,
                },
            );
    }

    /// Positions reported on a chromosome, in file order. Absent chromosomes
    /// yield an empty slice, not an error.
    pub fn positions_for(&self, chromosome: &str) -> &[u64] {
        self.positions
            .get(chromosome)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Annotation recorded for an exact (chromosome, position) key
    pub fn annotation(&self, chromosome: &str, position: u64) -> Option<&Annotation> {
        self.annotations
            .get(chromosome)
            .and_then(|by_pos| by_pos.get(&position))
    }

    pub fn chromosome_count(&self) -> usize {
        self.positions.len()
    }

    pub fn position_count(&self) -> usize {
        self.positions.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    const HEADER: &str = "Sample\tGroup\tChromosome\tPosition\tRead\tReference";

    fn index_from(lines: &[&str]) -> VariantIndex {
        let text = lines.join("\n");
        VariantIndex::from_reader(Cursor::new(text)).unwrap()
    }

    #[test]
    fn first_line_discarded_even_without_header_text() {
        // A bogus first line must not become a record
        let index = index_from(&[
            "s1\tg1\tchr1\t100\tA\tG",
            "s1\tg1\tchr1\t250\tC\tT",
        ]);
        assert_eq!(index.positions_for("chr1"), &[250]);
    }

    #[test]
    fn repeated_headers_are_skipped() {
        let index = index_from(&[
            HEADER,
            "s1\tg1\tchr1\t100\tA\tG",
            HEADER,
            "s1\tg1\tchr1\t250\tC\tT",
        ]);
        assert_eq!(index.positions_for("chr1"), &[100, 250]);
    }

    #[test]
    fn positions_keep_file_order_and_duplicates() {
        let index = index_from(&[
            HEADER,
            "s1\tg1\tchr1\t250\tA\tG",
            "s1\tg1\tchr1\t100\tC\tT",
            "s1\tg1\tchr1\t250\tG\tA",
        ]);
        assert_eq!(index.positions_for("chr1"), &[250, 100, 250]);
    }

    #[test]
    fn duplicate_key_annotation_is_last_write_wins() {
        let index = index_from(&[
            HEADER,
            "s1\tg1\tchr1\t250\tA\tG",
            "s1\tg1\tchr1\t250\tG\tA",
        ]);
        let annotation = index.annotation("chr1", 250).unwrap();
        assert_eq!(annotation.read, "G");
        assert_eq!(annotation.reference, "A");
    }

    #[test]
    fn every_indexed_position_has_an_annotation() {
        let index = index_from(&[
            HEADER,
            "s1\tg1\tchr1\t100\tA\tG",
            "s1\tg2\tchr2\t7\tC\tT",
        ]);
        for chromosome in ["chr1", "chr2"] {
            for &position in index.positions_for(chromosome) {
                assert!(index.annotation(chromosome, position).is_some());
            }
        }
        assert_eq!(index.chromosome_count(), 2);
        assert_eq!(index.position_count(), 2);
    }

    #[test]
    fn absent_chromosome_is_empty_not_error() {
        let index = index_from(&[HEADER, "s1\tg1\tchr1\t100\tA\tG"]);
        assert!(index.positions_for("chrX").is_empty());
        assert!(index.annotation("chrX", 100).is_none());
    }

    #[test]
    fn non_numeric_position_is_fatal() {
        let text = format!("{HEADER}\ns1\tg1\tchr1\tnot_a_number\tA\tG");
        let err = VariantIndex::from_reader(Cursor::new(text)).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn short_line_is_fatal() {
        let text = format!("{HEADER}\ns1\tg1\tchr1\t100");
        assert!(VariantIndex::from_reader(Cursor::new(text)).is_err());
    }

    #[test]
    fn empty_report_yields_empty_index() {
        let index = VariantIndex::from_reader(Cursor::new("")).unwrap();
        assert_eq!(index.chromosome_count(), 0);
    }
}
