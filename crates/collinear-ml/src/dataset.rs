//! In-memory tables of named numeric columns.

use std::collections::HashSet;

use collinear_common::error::{CommonError, CommonResult};
use nalgebra::DMatrix;

#[derive(Debug, Clone, PartialEq)]
struct Column {
    name: String,
    values: Vec<f64>,
}

/// An ordered set of records with named numeric fields, stored column by column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    num_rows: usize,
}

impl Dataset {
    /// Builds a dataset from `(name, values)` pairs.
    ///
    /// All columns must have the same length and distinct names.
    pub fn new(columns: Vec<(String, Vec<f64>)>) -> CommonResult<Self> {
        let num_rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut seen = HashSet::new();
        for (name, values) in &columns {
            if !seen.insert(name.as_str()) {
                return Err(CommonError::invalid(format!("duplicate column: {name}")));
            }
            if values.len() != num_rows {
                return Err(CommonError::mismatch(format!(
                    "column {name} has {} rows, expected {num_rows}",
                    values.len()
                )));
            }
        }
        let columns = columns
            .into_iter()
            .map(|(name, values)| Column { name, values })
            .collect();
        Ok(Self { columns, num_rows })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> CommonResult<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| CommonError::missing_column(name))
    }

    /// Gathers the named columns, in the given order, into a feature matrix.
    pub fn feature_matrix<S: AsRef<str>>(&self, names: &[S]) -> CommonResult<FeatureMatrix> {
        let columns = names
            .iter()
            .map(|name| self.column(name.as_ref()))
            .collect::<CommonResult<Vec<_>>>()?;
        let values = DMatrix::from_fn(self.num_rows, columns.len(), |i, j| columns[j][i]);
        FeatureMatrix::new(
            names.iter().map(|n| n.as_ref().to_string()).collect(),
            values,
        )
    }

    pub fn target(&self, name: &str) -> CommonResult<Vec<f64>> {
        self.column(name).map(|values| values.to_vec())
    }

    /// Keeps the rows whose mask entry is `true`.
    pub fn filter(&self, mask: &[bool]) -> CommonResult<Dataset> {
        if mask.len() != self.num_rows {
            return Err(CommonError::mismatch(format!(
                "mask has {} entries, dataset has {} rows",
                mask.len(),
                self.num_rows
            )));
        }
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: c
                    .values
                    .iter()
                    .zip(mask)
                    .filter(|(_, keep)| **keep)
                    .map(|(v, _)| *v)
                    .collect(),
            })
            .collect();
        let num_rows = mask.iter().filter(|keep| **keep).count();
        Ok(Dataset { columns, num_rows })
    }

    /// Splits into the rows flagged `true` and the rest.
    pub fn split(&self, mask: &[bool]) -> CommonResult<(Dataset, Dataset)> {
        let complement = mask.iter().map(|keep| !keep).collect::<Vec<_>>();
        Ok((self.filter(mask)?, self.filter(&complement)?))
    }
}

/// A dense row-major view of records over an ordered list of named features.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    names: Vec<String>,
    values: DMatrix<f64>,
}

impl FeatureMatrix {
    pub fn new(names: Vec<String>, values: DMatrix<f64>) -> CommonResult<Self> {
        if names.len() != values.ncols() {
            return Err(CommonError::mismatch(format!(
                "{} feature names for {} columns",
                names.len(),
                values.ncols()
            )));
        }
        Ok(Self { names, values })
    }

    /// Builds a matrix from rows; every row must have one value per name.
    pub fn from_rows(names: Vec<String>, rows: &[Vec<f64>]) -> CommonResult<Self> {
        let num_features = names.len();
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != num_features)
        {
            return Err(CommonError::mismatch(format!(
                "row {i} has {} values, expected {num_features}",
                row.len()
            )));
        }
        let values = DMatrix::from_fn(rows.len(), num_features, |i, j| rows[i][j]);
        Self::new(names, values)
    }

    /// Like [`FeatureMatrix::from_rows`], naming the features `x0`, `x1`, ...
    pub fn from_unnamed_rows(rows: &[Vec<f64>]) -> CommonResult<Self> {
        let num_features = rows.first().map(Vec::len).unwrap_or(0);
        let names = (0..num_features).map(|j| format!("x{j}")).collect();
        Self::from_rows(names, rows)
    }

    pub fn num_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn num_features(&self) -> usize {
        self.values.ncols()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn column(&self, j: usize) -> Vec<f64> {
        self.values.column(j).iter().copied().collect()
    }

    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    /// A copy of this matrix without feature `j`.
    pub fn without_feature(&self, j: usize) -> CommonResult<FeatureMatrix> {
        if j >= self.num_features() {
            return Err(CommonError::invalid(format!(
                "feature index {j} out of range for {} features",
                self.num_features()
            )));
        }
        let mut names = self.names.clone();
        names.remove(j);
        Self::new(names, self.values.clone().remove_column(j))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cars() -> Dataset {
        Dataset::new(vec![
            ("engine".to_string(), vec![1.0, 2.0, 3.0, 4.0]),
            ("city".to_string(), vec![8.0, 9.5, 11.0, 13.0]),
            ("co2".to_string(), vec![150.0, 180.0, 210.0, 250.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_ragged_columns_are_rejected() {
        let result = Dataset::new(vec![
            ("a".to_string(), vec![1.0, 2.0]),
            ("b".to_string(), vec![1.0]),
        ]);
        assert!(matches!(result, Err(CommonError::DimensionMismatch(_))));
    }

    #[test]
    fn test_duplicate_columns_are_rejected() {
        let result = Dataset::new(vec![
            ("a".to_string(), vec![1.0]),
            ("a".to_string(), vec![2.0]),
        ]);
        assert!(matches!(result, Err(CommonError::InvalidArgument(_))));
    }

    #[test]
    fn test_feature_matrix_follows_requested_order() {
        let dataset = cars();
        let matrix = dataset.feature_matrix(&["city", "engine"]).unwrap();
        assert_eq!(matrix.names(), &["city".to_string(), "engine".to_string()]);
        assert_eq!(matrix.num_rows(), 4);
        assert_eq!(matrix.values()[(1, 0)], 9.5);
        assert_eq!(matrix.values()[(1, 1)], 2.0);
    }

    #[test]
    fn test_missing_column() {
        let dataset = cars();
        assert_eq!(
            dataset.feature_matrix(&["hwy"]).unwrap_err(),
            CommonError::MissingColumn("hwy".to_string())
        );
        assert!(dataset.target("hwy").is_err());
    }

    #[test]
    fn test_split_is_disjoint_and_complete() {
        let dataset = cars();
        let (train, test) = dataset.split(&[true, false, true, false]).unwrap();
        assert_eq!(train.num_rows(), 2);
        assert_eq!(test.num_rows(), 2);
        assert_eq!(train.column("engine").unwrap(), &[1.0, 3.0]);
        assert_eq!(test.column("engine").unwrap(), &[2.0, 4.0]);
    }

    #[test]
    fn test_split_mask_length_mismatch() {
        let dataset = cars();
        assert!(matches!(
            dataset.split(&[true]),
            Err(CommonError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_from_rows() {
        let matrix = FeatureMatrix::from_unnamed_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(matrix.names(), &["x0".to_string(), "x1".to_string()]);
        assert_eq!(matrix.column(1), vec![2.0, 4.0]);
        assert!(matches!(
            FeatureMatrix::from_unnamed_rows(&[vec![1.0, 2.0], vec![3.0]]),
            Err(CommonError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_without_feature() {
        let matrix = cars().feature_matrix(&["engine", "city", "co2"]).unwrap();
        let reduced = matrix.without_feature(1).unwrap();
        assert_eq!(reduced.names(), &["engine".to_string(), "co2".to_string()]);
        assert_eq!(reduced.column(1), vec![150.0, 180.0, 210.0, 250.0]);
        assert!(matrix.without_feature(3).is_err());
    }
}
