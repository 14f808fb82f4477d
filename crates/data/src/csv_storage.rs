use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Writer};
use tracing::info;

use retail_synth_generator::Dataset;

use crate::table::Table;

pub const CUSTOMERS_FILE: &str = "customers.csv";
pub const PRODUCTS_FILE: &str = "products.csv";
pub const SALES_FILE: &str = "sales.csv";

/// Paths of the files written for one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFiles {
    pub customers: PathBuf,
    pub products: PathBuf,
    pub sales: PathBuf,
}

pub struct CsvStorage;

impl CsvStorage {
    /// Writes a table as CSV: one header line, then one line per row.
    ///
    /// # Errors
    /// Returns error if file cannot be created or writing fails
    pub fn write_table(path: impl AsRef<Path>, table: &Table) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        let mut writer = Writer::from_writer(file);

        writer.write_record(table.headers())?;
        for i in 0..table.num_rows() {
            if let Some(row) = table.row(i) {
                writer.write_record(row)?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// Reads a CSV file written by [`CsvStorage::write_table`].
    ///
    /// # Errors
    /// Returns error if the file cannot be opened or a record is malformed
    pub fn read_table(path: impl AsRef<Path>) -> Result<Table> {
        let path = path.as_ref();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut records = Vec::new();
        for record in reader.records() {
            let record = record
                .with_context(|| format!("Malformed record in {}", path.display()))?;
            records.push(record.iter().map(str::to_string).collect());
        }

        Ok(Table::from_records(headers, records))
    }

    /// Writes the customers, products, and sales tables into `dir`, creating it if needed.
    ///
    /// # Errors
    /// Returns error if the directory or any file cannot be written
    pub fn write_dataset(dir: impl AsRef<Path>, dataset: &Dataset) -> Result<DatasetFiles> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

        let files = DatasetFiles {
            customers: dir.join(CUSTOMERS_FILE),
            products: dir.join(PRODUCTS_FILE),
            sales: dir.join(SALES_FILE),
        };
        Self::write_table(&files.customers, &Table::from_rows(&dataset.customers))?;
        Self::write_table(&files.products, &Table::from_rows(&dataset.products))?;
        Self::write_table(&files.sales, &Table::from_rows(&dataset.sales))?;

        info!(
            dir = %dir.display(),
            customers = dataset.customers.len(),
            products = dataset.products.len(),
            sales = dataset.sales.len(),
            "dataset written"
        );
        Ok(files)
    }
}
