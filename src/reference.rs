//! Reference dataset loading.
//!
//! The dataset is only used to derive the choice lists for the categorical
//! fields. Each domain is the set of distinct non-empty values observed in
//! the column, sorted ascending by code point.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::error::ArtifactError;
use crate::record::Column;

/// Sorted distinct values per categorical column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoricalDomains {
    domains: BTreeMap<Column, Vec<String>>,
    n_rows: usize,
}

impl CategoricalDomains {
    /// Build domains from explicit value lists. Values are sorted and deduplicated.
    pub fn from_values<I, S>(entries: impl IntoIterator<Item = (Column, I)>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let domains = entries
            .into_iter()
            .map(|(column, values)| {
                let set: BTreeSet<String> = values.into_iter().map(Into::into).collect();
                (column, set.into_iter().collect())
            })
            .collect();
        Self { domains, n_rows: 0 }
    }

    /// Sorted values for a column. Empty for numeric or unknown columns.
    pub fn values(&self, column: Column) -> &[String] {
        self.domains.get(&column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `value` was observed in `column`.
    pub fn contains(&self, column: Column, value: &str) -> bool {
        self.values(column)
            .binary_search_by(|probe| probe.as_str().cmp(value))
            .is_ok()
    }

    /// Iterate `(column, values)` in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (Column, &[String])> {
        self.domains.iter().map(|(&c, v)| (c, v.as_slice()))
    }

    /// Number of data rows the domains were derived from.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }
}

/// Load categorical domains from a CSV file with a header row.
pub fn load_domains(path: impl AsRef<Path>) -> Result<CategoricalDomains, ArtifactError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let domains = read_domains(file)?;
    info!(
        path = %path.display(),
        rows = domains.n_rows(),
        "loaded reference dataset"
    );
    Ok(domains)
}

/// Derive categorical domains from CSV text.
///
/// Columns other than the eight categorical ones are ignored. Empty cells
/// are treated as missing and do not contribute a value.
pub fn read_domains<R: Read>(reader: R) -> Result<CategoricalDomains, ArtifactError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = reader.headers()?.clone();

    let positions = Column::CATEGORICAL
        .into_iter()
        .map(|column| {
            headers
                .iter()
                .position(|h| h == column.name())
                .map(|idx| (column, idx))
                .ok_or_else(|| ArtifactError::MissingColumn(column.name().to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut sets: BTreeMap<Column, BTreeSet<String>> = BTreeMap::new();
    let mut n_rows = 0;
    for row in reader.records() {
        let row = row?;
        n_rows += 1;
        for &(column, idx) in &positions {
            match row.get(idx) {
                Some(value) if !value.is_empty() => {
                    sets.entry(column).or_default().insert(value.to_string());
                }
                _ => {}
            }
        }
    }

    let domains: BTreeMap<Column, Vec<String>> = Column::CATEGORICAL
        .into_iter()
        .map(|column| {
            let values = sets.remove(&column).unwrap_or_default();
            debug!(column = column.name(), distinct = values.len(), "derived domain");
            (column, values.into_iter().collect())
        })
        .collect();

    Ok(CategoricalDomains { domains, n_rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::REFERENCE_CSV;

    #[test]
    fn domains_are_sorted_and_distinct() {
        let domains = read_domains(REFERENCE_CSV.as_bytes()).unwrap();

        assert_eq!(domains.values(Column::Brand), ["Acer", "HP", "Lenovo"]);
        assert_eq!(domains.values(Column::RomType), ["SSD"]);
        assert_eq!(domains.values(Column::RamType), ["DDR4", "LPDDR5"]);
        for (_, values) in domains.iter() {
            assert!(values.windows(2).all(|w| w[0] < w[1]));
        }
        assert_eq!(domains.n_rows(), 5);
    }

    #[test]
    fn every_categorical_column_has_a_domain() {
        let domains = read_domains(REFERENCE_CSV.as_bytes()).unwrap();
        let columns: Vec<Column> = domains.iter().map(|(c, _)| c).collect();
        assert_eq!(columns, Column::CATEGORICAL.to_vec());
    }

    #[test]
    fn sort_is_by_code_point() {
        let csv = "brand,name,processor,CPU,Ram_type,ROM_type,GPU,OS\n\
                   asus,a,p,c,r,s,g,o\n\
                   Zebronics,a,p,c,r,s,g,o\n\
                   Acer,a,p,c,r,s,g,o\n";
        let domains = read_domains(csv.as_bytes()).unwrap();
        assert_eq!(domains.values(Column::Brand), ["Acer", "Zebronics", "asus"]);
    }

    #[test]
    fn empty_cells_are_skipped() {
        let csv = "brand,name,processor,CPU,Ram_type,ROM_type,GPU,OS\n\
                   HP,a,p,c,,s,g,o\n\
                   HP,b,p,c,DDR5,s,g,o\n";
        let domains = read_domains(csv.as_bytes()).unwrap();
        assert_eq!(domains.values(Column::RamType), ["DDR5"]);
        assert_eq!(domains.values(Column::Name), ["a", "b"]);
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "brand,name,processor,CPU,Ram_type,ROM_type,GPU\nHP,a,p,c,r,s,g\n";
        let err = read_domains(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ArtifactError::MissingColumn(ref c) if c == "OS"));
    }

    #[test]
    fn contains_uses_exact_match() {
        let domains = read_domains(REFERENCE_CSV.as_bytes()).unwrap();
        assert!(domains.contains(Column::Brand, "HP"));
        assert!(!domains.contains(Column::Brand, "hp"));
        assert!(!domains.contains(Column::Ram, "8"));
    }

    #[test]
    fn from_values_sorts_and_dedups() {
        let domains = CategoricalDomains::from_values([(Column::Os, vec!["b", "a", "b"])]);
        assert_eq!(domains.values(Column::Os), ["a", "b"]);
        assert!(domains.values(Column::Gpu).is_empty());
    }
}
