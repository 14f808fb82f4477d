//! Synthetic retail sales generation engine.
//!
//! The pipeline runs in dependency order:
//! - [`entities`]: customer and product reference tables
//! - [`campaigns`]: dated campaigns and the read-only factor tables
//! - [`sales`]: one record per (day, product) from the composed demand factors
//! - [`enrichment`]: catalog join, running stock, payment, delivery, returns, ratings
//! - [`orders`]: order grouping and customer tiers
//! - [`report`]: summary aggregates for presentation
//!
//! Every random draw comes from one explicitly passed [`rng::SynthRng`].

pub mod campaigns;
pub mod enrichment;
pub mod entities;
pub mod orders;
pub mod pipeline;
pub mod report;
pub mod rng;
pub mod sales;

pub use campaigns::{build_campaigns, build_factor_tables};
pub use enrichment::{rating_for, EnrichedSale, Enricher, StockLedger, StockPosition};
pub use entities::{generate_customers, generate_products, product_type_pool};
pub use orders::{assign_order_ids, classify_customers, order_counts};
pub use pipeline::{Dataset, DatasetGenerator};
pub use report::{CategoryStock, CityOrders, ProductRevenue, SalesReport, Totals};
pub use rng::{seeded_rng, Noise, SynthRng, WeightedChoice};
pub use sales::{apply_multiplier, apply_noise, price_for, SaleRecord, SalesSynthesizer};
