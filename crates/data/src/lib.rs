//! Tabular views and storage for generated retail datasets.
//!
//! This crate provides:
//! - [`Table`], a column-name to column-values mapping built from any [`TableRow`]
//! - CSV storage of single tables and of a whole dataset

pub mod csv_storage;
pub mod table;

pub use csv_storage::{CsvStorage, DatasetFiles, CUSTOMERS_FILE, PRODUCTS_FILE, SALES_FILE};
pub use table::{Table, TableRow};
