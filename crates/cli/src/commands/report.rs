//! Report command: generates a dataset in memory and prints summary aggregates.

use anyhow::{anyhow, Result};
use clap::Args;

use retail_synth_generator::{DatasetGenerator, SalesReport};

use super::GenerationArgs;

/// Arguments for the report command.
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub generation: GenerationArgs,

    /// Number of products and cities to list
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Output format: text, json (default: text)
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Parses an output format from string.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!(
                "Unknown format: '{}'. Valid formats: text, json",
                s
            )),
        }
    }
}

/// Formats the report as plain text.
fn format_text_report(report: &SalesReport) -> String {
    let totals = &report.totals;
    let mut output = String::new();

    output.push('\n');
    output.push_str("===============================================================\n");
    output.push_str("                      SALES DATASET REPORT                     \n");
    output.push_str("===============================================================\n");
    output.push_str(&format!("Records:        {}\n", totals.records));
    output.push_str(&format!("Orders:         {}\n", totals.orders));
    output.push_str(&format!("Units Sold:     {}\n", totals.units));
    output.push_str(&format!("Revenue:        {:.2}\n", totals.revenue));
    output.push_str(&format!(
        "Return Rate:    {:.1}%\n",
        totals.return_rate * 100.0
    ));
    match totals.mean_rating {
        Some(rating) => output.push_str(&format!("Mean Rating:    {rating:.2}\n")),
        None => output.push_str("Mean Rating:    n/a\n"),
    }
    output.push('\n');

    output.push_str("TOP PRODUCTS BY REVENUE\n");
    output.push_str("---------------------------------------------------------------\n");
    for (rank, product) in report.top_products.iter().enumerate() {
        output.push_str(&format!(
            "{:>2}. {:<16} {:<12} {:<11} {:>12.2}\n",
            rank + 1,
            product.product_name,
            product.category.label(),
            product.product_type.label(),
            product.revenue
        ));
    }
    output.push('\n');

    output.push_str("MEAN REMAINING STOCK BY CATEGORY\n");
    output.push_str("---------------------------------------------------------------\n");
    for entry in &report.stock_by_category {
        output.push_str(&format!(
            "{:<12} {:>8.1}\n",
            entry.category.label(),
            entry.mean_remaining_stock
        ));
    }
    output.push('\n');

    output.push_str("TOP CITIES BY ORDERS\n");
    output.push_str("---------------------------------------------------------------\n");
    for (rank, city) in report.top_cities.iter().enumerate() {
        output.push_str(&format!(
            "{:>2}. {:<28} {:>6}\n",
            rank + 1,
            city.location,
            city.orders
        ));
    }
    output.push_str("===============================================================\n");

    output
}

pub fn run_report(args: ReportArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;
    let config = args.generation.load_config()?;
    let dataset = DatasetGenerator::new(config).generate()?;
    let report = SalesReport::build(&dataset, args.top);

    match format {
        OutputFormat::Text => print!("{}", format_text_report(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
