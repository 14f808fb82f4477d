//! End-to-end generation: entities, factor tables, sales, enrichment, tiers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use retail_synth_core::{CustomerProfile, FactorTables, GeneratorConfig, Product, SynthResult};

use crate::campaigns::build_factor_tables;
use crate::enrichment::{EnrichedSale, Enricher};
use crate::entities::{generate_customers, generate_products};
use crate::orders::{classify_customers, order_counts};
use crate::rng::{seeded_rng, SynthRng};
use crate::sales::SalesSynthesizer;

/// The three output tables of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub start_date: NaiveDate,
    pub num_days: u32,
    pub customers: Vec<CustomerProfile>,
    pub products: Vec<Product>,
    pub sales: Vec<EnrichedSale>,
}

pub struct DatasetGenerator {
    config: GeneratorConfig,
}

impl DatasetGenerator {
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Runs the whole pipeline with a source seeded from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or its dates are out of range.
    pub fn generate(&self) -> SynthResult<Dataset> {
        let mut rng = seeded_rng(self.config.seed);
        self.generate_with(&mut rng)
    }

    /// Runs the whole pipeline, drawing every random value from `rng`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn generate_with(&self, rng: &mut SynthRng) -> SynthResult<Dataset> {
        let config = &self.config;
        config.validate()?;

        let window = config.date_window()?;
        let start_date = window[0];
        info!(
            start = %start_date,
            days = config.num_days,
            products = config.num_products,
            customers = config.num_customers,
            seed = ?config.seed,
            "generating dataset"
        );

        let customers = generate_customers(config.num_customers as usize, &window, rng)?;
        let products = generate_products(config.num_products as usize, rng)?;
        info!(
            customers = customers.len(),
            products = products.len(),
            "entities generated"
        );

        let factors: FactorTables = build_factor_tables(config, start_date, &products, rng)?;

        let customer_ids: Vec<u32> = customers.iter().map(|c| c.customer_id).collect();
        let synthesizer = SalesSynthesizer::new(config, &factors)?;
        let sales = synthesizer.synthesize(&window, &products, &customer_ids, rng)?;

        let enricher = Enricher::new(&config.enrichment)?;
        let sales = enricher.enrich(&sales, &products, rng)?;

        let counts = order_counts(sales.iter().map(|s| (s.customer_id, s.order_id)));
        let customers = classify_customers(&customers, &counts);
        info!(
            sales = sales.len(),
            orders = counts.values().sum::<usize>(),
            "dataset complete"
        );

        Ok(Dataset {
            start_date,
            num_days: config.num_days,
            customers,
            products,
            sales,
        })
    }
}
