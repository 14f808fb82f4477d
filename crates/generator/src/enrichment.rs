//! Post-processing: joins sales to the catalog and attaches derived and
//! randomly drawn order attributes.
//!
//! Remaining stock is a display derivation only. Sales are never capped by it.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, Weekday};
use rand::distributions::{Bernoulli, Distribution};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use retail_synth_core::{
    Category, EnrichmentConfig, Product, ProductType, Season, SynthError, SynthResult,
};

use crate::orders::assign_order_ids;
use crate::rng::{Noise, WeightedChoice};
use crate::sales::SaleRecord;

/// A sale joined with product attributes and order-level details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSale {
    pub date: NaiveDate,
    pub order_id: u32,
    pub customer_id: u32,
    pub payment_method: String,
    pub product_id: u32,
    pub product_name: String,
    pub category: Category,
    pub product_type: ProductType,
    pub units_sold: u32,
    pub is_promotion: bool,
    pub original_price: Decimal,
    pub discount_applied: bool,
    pub final_price: Decimal,
    pub initial_stock: u32,
    pub remaining_stock: u32,
    pub cumulative_sales: u64,
    pub revenue: Decimal,
    pub delivery_mode: String,
    pub is_returned: bool,
    pub return_reason: Option<String>,
    /// Absent for returned sales.
    pub rating: Option<f64>,
    pub weekday: Weekday,
    pub season: Season,
    pub campaign_name: Option<String>,
    pub event_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockPosition {
    pub cumulative_sales: u64,
    pub remaining_stock: u32,
}

#[derive(Debug, Clone, Copy, Default)]
struct RunningStock {
    cumulative: u64,
    last_date: Option<NaiveDate>,
}

/// Per-product running totals, kept apart from the immutable catalog.
#[derive(Debug, Clone, Default)]
pub struct StockLedger {
    running: BTreeMap<u32, RunningStock>,
}

impl StockLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one day of sales for a product and returns the new position.
    ///
    /// # Errors
    ///
    /// Returns `SynthError::OutOfOrder` unless `date` is strictly after the
    /// product's previous entry.
    pub fn record(
        &mut self,
        product_id: u32,
        initial_stock: u32,
        date: NaiveDate,
        units: u32,
    ) -> SynthResult<StockPosition> {
        let entry = self.running.entry(product_id).or_default();
        if entry.last_date.is_some_and(|last| date <= last) {
            return Err(SynthError::OutOfOrder { product_id, date });
        }
        *entry = RunningStock {
            cumulative: entry.cumulative + u64::from(units),
            last_date: Some(date),
        };

        let remaining = u64::from(initial_stock).saturating_sub(entry.cumulative);
        Ok(StockPosition {
            cumulative_sales: entry.cumulative,
            remaining_stock: u32::try_from(remaining).unwrap_or(u32::MAX),
        })
    }

    #[must_use]
    pub fn cumulative(&self, product_id: u32) -> u64 {
        self.running.get(&product_id).map_or(0, |r| r.cumulative)
    }
}

/// Product-type base, plus a bonus when discounted, plus noise; clamped to
/// [1.0, 5.0] and rounded to one decimal.
#[must_use]
pub fn rating_for(product_type: ProductType, discount_applied: bool, bonus: f64, noise: f64) -> f64 {
    let mut rating = product_type.base_rating() + noise;
    if discount_applied {
        rating += bonus;
    }
    (rating.clamp(1.0, 5.0) * 10.0).round() / 10.0
}

pub struct Enricher<'a> {
    config: &'a EnrichmentConfig,
    payment: WeightedChoice,
    returns: Bernoulli,
    reasons: HashMap<Category, WeightedChoice>,
    fallback_reasons: WeightedChoice,
    rating_noise: Noise,
}

impl<'a> Enricher<'a> {
    /// # Errors
    ///
    /// Returns `SynthError::InvalidConfig` if there is no delivery mode, and
    /// `SynthError::Distribution` if the return probability, a weighted list,
    /// or the rating noise is invalid.
    pub fn new(config: &'a EnrichmentConfig) -> SynthResult<Self> {
        if config.delivery_modes.is_empty() {
            return Err(SynthError::InvalidConfig(
                "delivery_modes must not be empty".into(),
            ));
        }
        let returns = Bernoulli::new(config.return_probability).map_err(|e| {
            SynthError::Distribution(format!(
                "return_probability {}: {e}",
                config.return_probability
            ))
        })?;

        let mut reasons = HashMap::new();
        for entry in &config.return_reasons {
            match entry.category.parse::<Category>() {
                Ok(category) => {
                    reasons.insert(category, WeightedChoice::new(&entry.reasons)?);
                }
                Err(e) => warn!("ignoring return reasons: {e}"),
            }
        }

        Ok(Self {
            config,
            payment: WeightedChoice::new(&config.payment_methods)?,
            returns,
            reasons,
            fallback_reasons: WeightedChoice::new(&config.fallback_return_reasons)?,
            rating_noise: Noise::new(config.rating_noise_std_dev)?,
        })
    }

    /// Reason drawn from the category list, or the fallback list.
    pub fn return_reason<R: Rng + ?Sized>(&self, category: Category, rng: &mut R) -> String {
        self.reasons
            .get(&category)
            .unwrap_or(&self.fallback_reasons)
            .sample(rng)
            .to_string()
    }

    /// Enriches day-major sales, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns `SynthError::UnknownProduct` for a sale outside the catalog and
    /// `SynthError::OutOfOrder` if a product's dates do not strictly increase.
    pub fn enrich<R: Rng + ?Sized>(
        &self,
        sales: &[SaleRecord],
        products: &[Product],
        rng: &mut R,
    ) -> SynthResult<Vec<EnrichedSale>> {
        let catalog: HashMap<u32, &Product> = products.iter().map(|p| (p.product_id, p)).collect();
        let order_ids = assign_order_ids(sales);
        let mut ledger = StockLedger::new();
        let mut enriched = Vec::with_capacity(sales.len());

        for (sale, order_id) in sales.iter().zip(order_ids) {
            let product = catalog
                .get(&sale.product_id)
                .ok_or(SynthError::UnknownProduct(sale.product_id))?;
            let position = ledger.record(
                product.product_id,
                product.initial_stock,
                sale.date,
                sale.units_sold,
            )?;

            let payment_method = self.payment.sample(rng).to_string();
            let delivery_mode = self
                .config
                .delivery_modes
                .choose(rng)
                .cloned()
                .unwrap_or_default();
            let is_returned = self.returns.sample(rng);
            let (return_reason, rating) = if is_returned {
                (Some(self.return_reason(product.category, rng)), None)
            } else {
                let noise = self.rating_noise.sample(rng);
                let rating = rating_for(
                    product.product_type,
                    sale.discount_applied,
                    self.config.discount_rating_bonus,
                    noise,
                );
                (None, Some(rating))
            };

            enriched.push(EnrichedSale {
                date: sale.date,
                order_id,
                customer_id: sale.customer_id,
                payment_method,
                product_id: product.product_id,
                product_name: product.product_name.clone(),
                category: product.category,
                product_type: product.product_type,
                units_sold: sale.units_sold,
                is_promotion: sale.is_promotion,
                original_price: sale.base_price,
                discount_applied: sale.discount_applied,
                final_price: sale.final_price,
                initial_stock: product.initial_stock,
                remaining_stock: position.remaining_stock,
                cumulative_sales: position.cumulative_sales,
                revenue: sale.final_price * Decimal::from(sale.units_sold),
                delivery_mode,
                is_returned,
                return_reason,
                rating,
                weekday: sale.weekday,
                season: sale.season,
                campaign_name: sale.campaign_name.clone(),
                event_name: sale.event_name.clone(),
            });
        }

        info!(
            records = enriched.len(),
            returns = enriched.iter().filter(|s| s.is_returned).count(),
            "sales enriched"
        );
        Ok(enriched)
    }
}
