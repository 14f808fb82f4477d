//! Generate command: writes customers.csv, products.csv, and sales.csv.

use anyhow::Result;
use clap::Args;

use retail_synth_data::CsvStorage;
use retail_synth_generator::DatasetGenerator;

use super::GenerationArgs;

/// Arguments for the generate command.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub generation: GenerationArgs,

    /// Output directory for the CSV files
    #[arg(short, long, default_value = "output")]
    pub out_dir: String,
}

pub fn run_generate(args: GenerateArgs) -> Result<()> {
    let config = args.generation.load_config()?;
    let dataset = DatasetGenerator::new(config).generate()?;
    let files = CsvStorage::write_dataset(&args.out_dir, &dataset)?;

    println!("Customers: {}", files.customers.display());
    println!("Products:  {}", files.products.display());
    println!("Sales:     {}", files.sales.display());
    Ok(())
}
