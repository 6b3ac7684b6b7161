//! Labelled-table input: headered CSV files become [`SampleTable`]s whose
//! column names carry over to the features and targets.
use csv::{Reader, ReaderBuilder};
use nalgebra::DMatrix;
use std::{io::Read, path::Path};

use super::dataset::{RealNumber, SampleTable};
use crate::error::TreeError;

impl<T: RealNumber> SampleTable<T> {
    /// Reads a headered CSV file. Columns named in `target_columns` form `y`
    /// (in the order given), every other column forms `x` in header order.
    pub fn from_csv<P: AsRef<Path>>(path: P, target_columns: &[&str]) -> Result<Self, TreeError> {
        let reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
        Self::from_csv_records(reader, target_columns)
    }

    /// Same as [`SampleTable::from_csv`] for any byte source.
    pub fn from_csv_reader<R: Read>(source: R, target_columns: &[&str]) -> Result<Self, TreeError> {
        let reader = ReaderBuilder::new().has_headers(true).from_reader(source);
        Self::from_csv_records(reader, target_columns)
    }

    fn from_csv_records<R: Read>(
        mut reader: Reader<R>,
        target_columns: &[&str],
    ) -> Result<Self, TreeError> {
        let headers = reader.headers()?.clone();

        let target_indices = target_columns
            .iter()
            .map(|&name| {
                headers.iter().position(|header| header == name).ok_or_else(|| {
                    TreeError::ShapeMismatch(format!("target column '{}' not in header", name))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let feature_indices = (0..headers.len())
            .filter(|index| !target_indices.contains(index))
            .collect::<Vec<_>>();

        let parse = |record: &csv::StringRecord, index: usize| -> Result<T, TreeError> {
            let field = record.get(index).unwrap_or("").trim();
            let parse_error = || TreeError::Parse {
                column: headers[index].to_string(),
                value: field.to_string(),
            };
            let value = field.parse::<f64>().map_err(|_| parse_error())?;
            T::from_f64(value).ok_or_else(parse_error)
        };

        let mut features = Vec::new();
        let mut targets = Vec::new();
        let mut nrows = 0;
        for result in reader.records() {
            let record = result?;
            for &index in &feature_indices {
                features.push(parse(&record, index)?);
            }
            for &index in &target_indices {
                targets.push(parse(&record, index)?);
            }
            nrows += 1;
        }

        let x = DMatrix::from_row_slice(nrows, feature_indices.len(), &features);
        let y = DMatrix::from_row_slice(nrows, target_indices.len(), &targets);

        Self::new(x, y)?
            .with_feature_names(
                feature_indices
                    .iter()
                    .map(|&index| headers[index].to_string())
                    .collect(),
            )?
            .with_target_names(target_columns.iter().map(|name| name.to_string()).collect())
    }
}
