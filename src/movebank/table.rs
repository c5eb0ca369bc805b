use std::path::Path;

use crate::error::HttpError;

/// A delimited result table: a header row plus string records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub const fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Parses a response body. An empty body yields an empty table.
    ///
    /// # Errors
    ///
    /// Returns an error when the body is not valid CSV.
    pub fn parse(entity: &str, body: &str) -> Result<Self, HttpError> {
        let parse_error = |source: csv::Error| HttpError::ParseTable {
            entity: entity.to_owned(),
            source,
        };
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(body.as_bytes());
        let headers = reader
            .headers()
            .map_err(parse_error)?
            .iter()
            .map(str::to_owned)
            .collect();
        let rows = reader
            .records()
            .map(|record| {
                record
                    .map(|record| record.iter().map(str::to_owned).collect())
                    .map_err(parse_error)
            })
            .collect::<Result<Vec<Vec<String>>, HttpError>>()?;
        Ok(Self { headers, rows })
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn column<'table>(&'table self, name: &str) -> Option<impl Iterator<Item = &'table str>> {
        let index = self.headers.iter().position(|header| header == name)?;
        Some(
            self.rows
                .iter()
                .map(move |row| row.get(index).map(String::as_str).unwrap_or_default()),
        )
    }

    /// Distinct non-empty values of `name`, in first-seen order.
    #[must_use]
    pub fn distinct(&self, name: &str) -> Vec<String> {
        let mut values: Vec<String> = Vec::new();
        for value in self.column(name).into_iter().flatten() {
            let value = value.trim();
            if !value.is_empty() && !values.iter().any(|seen| seen == value) {
                values.push(value.to_owned());
            }
        }
        values
    }

    /// Writes the header and every row to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be created or written.
    pub fn write_csv(&self, path: &Path) -> Result<(), HttpError> {
        let write_error = |source: csv::Error| HttpError::WriteTable {
            path: path.display().to_string(),
            source,
        };
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(write_error)?;
        writer.write_record(&self.headers).map_err(write_error)?;
        for row in &self.rows {
            writer.write_record(row).map_err(write_error)?;
        }
        writer
            .flush()
            .map_err(|err| write_error(csv::Error::from(err)))?;
        Ok(())
    }
}
