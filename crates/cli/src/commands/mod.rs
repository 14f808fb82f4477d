//! CLI commands for the synthetic retail dataset generator.

pub mod generate;
pub mod report;

pub use generate::{run_generate, GenerateArgs};
pub use report::{run_report, ReportArgs};

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::Args;

use retail_synth_core::{ConfigLoader, GeneratorConfig};

/// Options shared by every command that generates a dataset.
#[derive(Args, Debug, Clone)]
pub struct GenerationArgs {
    /// Config file path (missing file means built-in defaults)
    #[arg(short, long, default_value = "config/Synth.toml")]
    pub config: String,

    /// Seed for reproducible output
    #[arg(long, env = "RETAIL_SYNTH_SEED")]
    pub seed: Option<u64>,

    /// First day of the window (YYYY-MM-DD); defaults to `days` before today
    #[arg(long)]
    pub start: Option<String>,

    /// Number of days to generate
    #[arg(long)]
    pub days: Option<u32>,

    /// Number of products
    #[arg(long)]
    pub products: Option<u32>,

    /// Number of customers
    #[arg(long)]
    pub customers: Option<u32>,
}

impl GenerationArgs {
    /// Loads the config file and applies command-line overrides.
    pub fn load_config(&self) -> Result<GeneratorConfig> {
        let mut config = ConfigLoader::load(&self.config)?;

        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(start) = &self.start {
            let date = NaiveDate::parse_from_str(start, "%Y-%m-%d")
                .map_err(|_| anyhow!("Invalid start date '{}'. Use YYYY-MM-DD", start))?;
            config.start_date = Some(date);
        }
        if let Some(days) = self.days {
            config.num_days = days;
        }
        if let Some(products) = self.products {
            config.num_products = products;
        }
        if let Some(customers) = self.customers {
            config.num_customers = customers;
        }

        config.validate()?;
        Ok(config)
    }
}
