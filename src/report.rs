use crate::gene_model::GeneInterval;
use crate::variant_index::{Annotation, VariantIndex};
use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Stringified form of the "no matching position" sentinel in output rows
pub const NO_POSITION: &str = "None";

/// Outcome of resolving the annotation for a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotated {
    /// The (chromosome, position) key was present in the index
    Found(Annotation),
    /// The lookup failed; the placeholder pair is written in its place
    Missing { placeholder: Annotation },
}

impl Annotated {
    pub fn pair(&self) -> &Annotation {
        match self {
            Annotated::Found(annotation) => annotation,
            Annotated::Missing { placeholder } => placeholder,
        }
    }
}

/// Resolve the (read, reference) pair for a scan result.
///
/// The lookup is attempted on both branches, sentinel included: an unmatched
/// interval carries the "no value" sentinel, which can never be a key in the
/// annotation map, so miss rows always take the placeholder pair. A matched
/// position whose key is somehow absent takes the placeholder as well instead
/// of aborting.
pub fn resolve_annotation(
    index: &VariantIndex,
    chromosome: &str,
    found: Option<u64>,
) -> Annotated {
    let hit = found.and_then(|position| index.annotation(chromosome, position));

    match hit {
        Some(annotation) => Annotated::Found(annotation.clone()),
        None => {
            let description = match found {
                Some(position) => format!("no annotation for {chromosome}:{position}"),
                None => format!("no matched position for {chromosome}"),
            };
            Annotated::Missing {
                placeholder: Annotation {
                    read: format!("Error {chromosome}"),
                    reference: description,
                },
            }
        }
    }
}

/// Writes hit and miss rows for scanned gene intervals.
///
/// The two streams stay open across the whole batch; rows are appended in
/// scan order with no flush guarantee before the reporter is dropped.
pub struct Reporter<W: Write> {
    hit: W,
    miss: W,
}

impl Reporter<File> {
    /// Open the hit and miss streams in append mode, creating them if needed
    pub fn open(hit_path: &Path, miss_path: &Path) -> Result<Reporter<File>> {
        let open = |path: &Path| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open output {}", path.display()))
        };
        Ok(Reporter {
            hit: open(hit_path)?,
            miss: open(miss_path)?,
        })
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(hit: W, miss: W) -> Self {
        Reporter { hit, miss }
    }

    /// Write one row for a scanned interval.
    ///
    /// The stream is chosen by the scan result alone; the annotation lookup
    /// can fail on either branch and only changes the trailing pair.
    pub fn report(
        &mut self,
        source: &str,
        gene: &GeneInterval,
        index: &VariantIndex,
        found: Option<u64>,
    ) -> Result<()> {
        let annotated = resolve_annotation(index, &gene.chromosome, found);
        let pair = annotated.pair();
        let position = match found {
            Some(position) => position.to_string(),
            None => NO_POSITION.to_string(),
        };

        let stream = match found {
            Some(_) => &mut self.hit,
            None => &mut self.miss,
        };
        writeln!(
            stream,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            source,
            gene.gene_name,
            gene.ref_name,
            gene.chromosome,
            gene.tx_start,
            gene.tx_end,
            position,
            pair.read,
            pair.reference
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant_index::VariantRecord;
    use pretty_assertions::assert_eq;

    fn index_with_chr1_250() -> VariantIndex {
        let mut index = VariantIndex::default();
        index.insert(VariantRecord {
            sample: "s1".to_string(),
            group: "g1".to_string(),
            chromosome: "chr1".to_string(),
            position: 250,
            read: "A".to_string(),
            reference: "G".to_string(),
        });
        index
    }

    fn interval(chromosome: &str) -> GeneInterval {
        GeneInterval {
            gene_name: "G1".to_string(),
            ref_name: "NM_1".to_string(),
            chromosome: chromosome.to_string(),
            tx_start: 200,
            tx_end: 300,
        }
    }

    #[test]
    fn matched_row_goes_to_hit_stream() {
        let index = index_with_chr1_250();
        let mut reporter = Reporter::new(Vec::new(), Vec::new());
        reporter
            .report("allS1.txt", &interval("chr1"), &index, Some(250))
            .unwrap();

        let hit = String::from_utf8(reporter.hit).unwrap();
        assert_eq!(hit, "allS1.txt\tG1\tNM_1\tchr1\t200\t300\t250\tA\tG\n");
        assert!(reporter.miss.is_empty());
    }

    #[test]
    fn unmatched_row_goes_to_miss_stream_with_sentinel_and_placeholder() {
        let index = index_with_chr1_250();
        let mut reporter = Reporter::new(Vec::new(), Vec::new());
        reporter
            .report("allS1.txt", &interval("chr2"), &index, None)
            .unwrap();

        let miss = String::from_utf8(reporter.miss).unwrap();
        assert_eq!(
            miss,
            "allS1.txt\tG1\tNM_1\tchr2\t200\t300\tNone\tError chr2\tno matched position for chr2\n"
        );
        assert!(reporter.hit.is_empty());
    }

    #[test]
    fn matched_position_without_annotation_takes_placeholder_on_hit_stream() {
        // A matched key absent from the annotation map must not abort
        let index = VariantIndex::default();
        let mut reporter = Reporter::new(Vec::new(), Vec::new());
        reporter
            .report("allS1.txt", &interval("chr1"), &index, Some(999))
            .unwrap();

        let hit = String::from_utf8(reporter.hit).unwrap();
        assert_eq!(
            hit,
            "allS1.txt\tG1\tNM_1\tchr1\t200\t300\t999\tError chr1\tno annotation for chr1:999\n"
        );
    }

    #[test]
    fn resolve_annotation_is_attempted_on_both_branches() {
        let index = index_with_chr1_250();
        assert_eq!(
            resolve_annotation(&index, "chr1", Some(250)),
            Annotated::Found(Annotation {
                read: "A".to_string(),
                reference: "G".to_string(),
            })
        );
        assert!(matches!(
            resolve_annotation(&index, "chr1", None),
            Annotated::Missing { .. }
        ));
    }
}
