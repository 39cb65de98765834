use anyhow::{bail, Context, Result};
use std::io::BufRead;

/// One gene interval from a refFlat-style gene model line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneInterval {
    pub gene_name: String,
    pub ref_name: String,
    pub chromosome: String,
    pub tx_start: u64,
    pub tx_end: u64,
}

/// Parse one tab-delimited gene model line.
///
/// Fields are positional: geneName, refName, chromosome, then txStart and
/// txEnd at indices 4 and 5. Field 3 and anything past field 5 are ignored.
pub fn parse_gene_line(line: &str) -> Result<GeneInterval> {
    let fields: Vec<&str> = line.split('\t').collect();

    if fields.len() < 6 {
        bail!(
            "gene model line has {} fields, expected at least 6: {:?}",
            fields.len(),
            line
        );
    }

    let tx_start: u64 = fields[4]
        .parse()
        .with_context(|| format!("invalid txStart {:?}", fields[4]))?;
    let tx_end: u64 = fields[5]
        .parse()
        .with_context(|| format!("invalid txEnd {:?}", fields[5]))?;

    Ok(GeneInterval {
        gene_name: fields[0].to_string(),
        ref_name: fields[1].to_string(),
        chromosome: fields[2].to_string(),
        tx_start,
        tx_end,
    })
}

/// Line-by-line reader over a gene model stream. No header line is assumed.
pub struct GeneModelReader<R: BufRead> {
    reader: R,
    line: String,
    line_no: usize,
}

impl<R: BufRead> GeneModelReader<R> {
    pub fn new(reader: R) -> Self {
        GeneModelReader {
            reader,
            line: String::new(),
            line_no: 0,
        }
    }

    /// Read the next interval, or None at end of stream. A malformed line is
    /// a fatal parse error.
    pub fn read_interval(&mut self) -> Result<Option<GeneInterval>> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;

        let line = self.line.trim_end_matches(['\n', '\r']);
        let interval =
            parse_gene_line(line).with_context(|| format!("gene model line {}", self.line_no))?;
        Ok(Some(interval))
    }
}
