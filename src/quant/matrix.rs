use anyhow::{anyhow, Context, Result};
use csv::WriterBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Transcript x sample read-count matrix.
///
/// Rows keep first-insertion order; columns keep the order they were opened in.
/// Each row holds one count per column once [`CountMatrix::normalize`] has run.
#[derive(Debug, Clone, Default)]
pub struct CountMatrix {
    rows: Vec<String>,
    row_index: HashMap<String, usize>,
    columns: Vec<String>,
    counts: Vec<Vec<u64>>,
}

impl CountMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a matrix with the given row keys. Repeated keys keep their first position.
    pub fn with_rows<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut matrix = Self::new();
        for key in keys {
            matrix.add_row(key);
        }
        matrix
    }

    /// Add a row with an empty count sequence; returns false if it already exists
    pub fn add_row(&mut self, key: impl Into<String>) -> bool {
        let key = key.into();
        if self.row_index.contains_key(&key) {
            return false;
        }
        self.row_index.insert(key.clone(), self.rows.len());
        self.rows.push(key);
        self.counts.push(Vec::new());
        true
    }

    /// Open a new sample column. Subsequent [`CountMatrix::add_count`] calls fill it.
    pub fn push_column(&mut self, label: impl Into<String>) {
        self.columns.push(label.into());
    }

    /// Add `count` to `key`'s cell in the most recently opened column.
    ///
    /// The first count for a row in a column is appended to its sequence;
    /// further counts for the same row and column are summed into it.
    pub fn add_count(&mut self, key: &str, count: u64) -> Result<()> {
        let n_columns = self.columns.len();
        if n_columns == 0 {
            return Err(anyhow!("No column open for transcript {}", key));
        }
        let idx = *self
            .row_index
            .get(key)
            .ok_or_else(|| anyhow!("Transcript {} is not a row of the count matrix", key))?;

        let row = &mut self.counts[idx];
        if row.len() < n_columns {
            row.push(count);
        } else if let Some(last) = row.last_mut() {
            *last += count;
        }
        Ok(())
    }

    /// Right-pad every row with zeros up to the number of columns.
    ///
    /// Rows never visited while counting would otherwise be shorter than the header.
    pub fn normalize(&mut self) {
        let n_columns = self.columns.len();
        for row in &mut self.counts {
            if row.len() < n_columns {
                row.resize(n_columns, 0);
            }
        }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Counts for one transcript, in column order
    pub fn row_counts(&self, key: &str) -> Option<&[u64]> {
        self.row_index.get(key).map(|&idx| self.counts[idx].as_slice())
    }

    /// Write comma-separated output: an empty index cell then the column labels,
    /// followed by one line per transcript.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = WriterBuilder::new().flexible(true).from_writer(writer);

        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push("");
        header.extend(self.columns.iter().map(String::as_str));
        csv_writer.write_record(&header)?;

        for (key, counts) in self.rows.iter().zip(&self.counts) {
            let mut record = Vec::with_capacity(counts.len() + 1);
            record.push(key.clone());
            record.extend(counts.iter().map(|c| c.to_string()));
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Write the matrix as CSV, replacing any existing file at `path`
    pub fn write_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Unable to write count matrix: {}", path.display()))?;
        self.write_csv(file)
            .with_context(|| format!("Failed writing count matrix: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_string(matrix: &CountMatrix) -> String {
        let mut out = Vec::new();
        matrix.write_csv(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_rows_keep_first_occurrence_order() {
        let matrix = CountMatrix::with_rows(vec!["t2", "t1", "t2", "t3"]);
        assert_eq!(matrix.rows(), &["t2", "t1", "t3"]);
        assert_eq!(matrix.n_columns(), 0);
    }

    #[test]
    fn test_add_count_appends_then_sums() {
        let mut matrix = CountMatrix::with_rows(vec!["t1", "t2"]);
        matrix.push_column("s1");
        matrix.add_count("t1", 4).unwrap();
        matrix.add_count("t2", 1).unwrap();
        matrix.add_count("t1", 3).unwrap();
        matrix.push_column("s2");
        matrix.add_count("t1", 0).unwrap();
        matrix.add_count("t2", 9).unwrap();

        assert_eq!(matrix.row_counts("t1"), Some(&[7, 0][..]));
        assert_eq!(matrix.row_counts("t2"), Some(&[1, 9][..]));
    }

    #[test]
    fn test_add_count_errors() {
        let mut matrix = CountMatrix::with_rows(vec!["t1"]);
        assert!(matrix.add_count("t1", 1).is_err());
        matrix.push_column("s1");
        assert!(matrix.add_count("missing", 1).is_err());
    }

    #[test]
    fn test_normalize_pads_unvisited_rows() {
        let mut matrix = CountMatrix::with_rows(vec!["t1", "t2"]);
        matrix.push_column("s1");
        matrix.add_count("t1", 5).unwrap();
        matrix.push_column("s2");
        matrix.add_count("t1", 6).unwrap();

        assert_eq!(matrix.row_counts("t2").unwrap().len(), 0);
        matrix.normalize();
        assert_eq!(matrix.row_counts("t1"), Some(&[5, 6][..]));
        assert_eq!(matrix.row_counts("t2"), Some(&[0, 0][..]));
    }

    #[test]
    fn test_write_csv() {
        let mut matrix = CountMatrix::with_rows(vec!["t1", "t2"]);
        matrix.push_column("sample1");
        matrix.add_count("t1", 2).unwrap();
        matrix.add_count("t2", 0).unwrap();
        matrix.push_column("sample2");
        matrix.add_count("t1", 11).unwrap();
        matrix.add_count("t2", 3).unwrap();
        matrix.normalize();

        assert_eq!(csv_string(&matrix), ",sample1,sample2\nt1,2,11\nt2,0,3\n");
    }

    #[test]
    fn test_write_csv_without_columns() {
        let mut matrix = CountMatrix::with_rows(vec!["t1", "t2"]);
        matrix.normalize();

        let out = csv_string(&matrix);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        // a lone empty field may be written quoted
        assert!(lines[0].trim_matches('"').is_empty());
        assert_eq!(&lines[1..], &["t1", "t2"]);
    }

    #[test]
    fn test_write_csv_quotes_labels_when_needed() {
        let mut matrix = CountMatrix::with_rows(vec!["t,1"]);
        matrix.push_column("s1");
        matrix.add_count("t,1", 1).unwrap();
        assert_eq!(csv_string(&matrix), ",s1\n\"t,1\",1\n");
    }
}
