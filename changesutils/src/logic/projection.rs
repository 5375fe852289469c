use crate::error::ChangesUtilsError;
use crate::utils::tablewriter::{Delimiter, TableWriter};
use crate::utils::{open_input, tsv_reader_builder};
use std::collections::HashSet;
use std::io::{BufWriter, Read};
use std::path::Path;
use std::str;

/// Columns kept from a changes file when no other list is given
pub const DEFAULT_COLUMNS: &[&str] = &[
    "ChangeUID",
    "IndexString",
    "Coverage",
    "MinQualityScore",
    "MaxQualityScore",
    "AverageQualityScore",
    "DistinctCoverage",
    "MutPct",
    "Chrom",
    "Start",
    "End",
    "BaseFrom",
    "BaseTo",
    "LookupKey",
    "ENSG",
    "GeneName",
];

pub fn default_columns() -> Vec<String> {
    DEFAULT_COLUMNS.iter().map(|x| x.to_string()).collect()
}

/// Positions of the wanted columns in one file's header.
///
/// Columns keep the order in which they appear in the header, not the order of
/// the wanted list. Wanted columns absent from the header are recorded in
/// `missing` and dropped from the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndexMap {
    header: Vec<String>,
    indices: Vec<usize>,
    missing: Vec<String>,
    width: usize,
}

impl ColumnIndexMap {
    pub fn new<'a>(
        header: impl IntoIterator<Item = &'a [u8]>,
        wanted: &[String],
    ) -> Result<Self, ChangesUtilsError> {
        let mut wanted_set = HashSet::new();
        for one in wanted {
            if !wanted_set.insert(one.as_str()) {
                return Err(ChangesUtilsError::DuplicateColumn(one.to_string()));
            }
        }

        let mut output_header = Vec::new();
        let mut indices = Vec::new();
        for (i, field) in header.into_iter().enumerate() {
            let name = str::from_utf8(field)?;
            // only the first occurrence of a repeated header name is kept
            if wanted_set.remove(name) {
                output_header.push(name.to_string());
                indices.push(i);
            }
        }

        if indices.is_empty() {
            return Err(ChangesUtilsError::NoMatchingColumns);
        }

        let missing = wanted
            .iter()
            .filter(|x| wanted_set.contains(x.as_str()))
            .cloned()
            .collect();

        let width = indices.iter().max().map(|x| x + 1).unwrap_or(0);

        Ok(ColumnIndexMap {
            header: output_header,
            indices,
            missing,
            width,
        })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub fn project<'a>(
        &self,
        record: &'a csv::ByteRecord,
        line: u64,
    ) -> Result<Vec<&'a [u8]>, ChangesUtilsError> {
        if record.len() < self.width {
            return Err(ChangesUtilsError::MalformedRow {
                line,
                index: self.width - 1,
                found: record.len(),
            });
        }
        Ok(self.indices.iter().map(|x| &record[*x]).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionSummary {
    pub header: Vec<String>,
    pub rows: u64,
    pub missing_columns: Vec<String>,
}

/// Copy the wanted columns of tab-delimited `reader` into `writer`, one row at a time.
pub fn project<R: Read>(
    reader: R,
    wanted: &[String],
    writer: &mut impl TableWriter,
) -> Result<ProjectionSummary, ChangesUtilsError> {
    let mut tsv_reader = tsv_reader_builder()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut record = csv::ByteRecord::new();

    if !tsv_reader.read_byte_record(&mut record)? {
        return Err(ChangesUtilsError::EmptyFile);
    }
    let index_map = ColumnIndexMap::new(record.iter(), wanted)?;
    for one in index_map.missing() {
        log::warn!("Column {} is not found in the header", one);
    }
    log::trace!("column positions: {:?}", index_map.indices());

    writer.set_header(index_map.header());
    writer.write_header()?;

    let mut rows = 0;
    while tsv_reader.read_byte_record(&mut record)? {
        let line = record.position().map(|x| x.line()).unwrap_or(rows + 2);
        let row = index_map.project(&record, line)?;
        writer.write_row_bytes(&row)?;
        rows += 1;
    }
    writer.flush()?;

    Ok(ProjectionSummary {
        header: index_map.header().to_vec(),
        rows,
        missing_columns: index_map.missing().to_vec(),
    })
}

/// Project `input` into `output`.
///
/// Rows are written to a temporary file next to `output` which replaces it only
/// after every row was projected, so a failure leaves no partial file behind.
pub fn project_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    wanted: &[String],
    delimiter: Delimiter,
) -> Result<ProjectionSummary, ChangesUtilsError> {
    let output = output.as_ref();
    let reader = open_input(input)?;

    let output_dir = match output.parent() {
        Some(x) if !x.as_os_str().is_empty() => x,
        _ => Path::new("."),
    };
    let temp = tempfile::Builder::new()
        .prefix(".changes2vcf")
        .suffix(".partial")
        .tempfile_in(output_dir)?;

    let summary = {
        let mut writer = delimiter.create_writer(BufWriter::new(temp.as_file()));
        project(reader, wanted, &mut writer)?
    };
    temp.persist(output).map_err(|e| e.error)?;

    Ok(summary)
}
