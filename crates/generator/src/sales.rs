//! Daily sales synthesis.
//!
//! For every day of the window and every product, the synthesizer composes the
//! demand effects in a fixed order:
//!
//! 1. base units from the product-type range, plus extra units when promoted
//! 2. seasonal, weekday, and category multipliers, then the promotion
//!    multiplier when promoted (each truncated to an integer)
//! 3. Gaussian noise, floored at zero
//! 4. the first matching campaign boost
//! 5. the first matching special-event multiplier
//!
//! The customer id is drawn uniformly and is unrelated to campaign or event
//! targeting.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use retail_synth_core::{
    FactorTables, GeneratorConfig, Product, Season, SynthError, SynthResult,
};

use crate::rng::Noise;

/// One synthesized (day, product) sale, before enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub date: NaiveDate,
    pub product_id: u32,
    pub customer_id: u32,
    pub units_sold: u32,
    pub is_promotion: bool,
    pub weekday: Weekday,
    pub season: Season,
    pub campaign_name: Option<String>,
    pub event_name: Option<String>,
    pub base_price: Decimal,
    pub discount_applied: bool,
    pub final_price: Decimal,
}

/// Scales a unit count and truncates toward zero. Never negative.
#[must_use]
pub fn apply_multiplier(units: u32, multiplier: f64) -> u32 {
    // `as` saturates: negative or NaN products become 0
    (f64::from(units) * multiplier) as u32
}

/// Adds noise to a unit count and floors the result at zero.
#[must_use]
pub fn apply_noise(units: u32, noise: f64) -> u32 {
    (f64::from(units) + noise).max(0.0) as u32
}

/// Returns `(final_price, discount_applied)`.
#[must_use]
pub fn price_for(base_price: Decimal, promoted: bool, discount_rate: Decimal) -> (Decimal, bool) {
    if promoted {
        let discounted = (base_price * (Decimal::ONE - discount_rate)).round_dp(2);
        (discounted.max(Decimal::ZERO), true)
    } else {
        (base_price, false)
    }
}

pub struct SalesSynthesizer<'a> {
    config: &'a GeneratorConfig,
    factors: &'a FactorTables,
    noise: Noise,
}

impl<'a> SalesSynthesizer<'a> {
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn new(config: &'a GeneratorConfig, factors: &'a FactorTables) -> SynthResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            factors,
            noise: Noise::new(config.noise_std_dev)?,
        })
    }

    /// Produces one record per (day, product), day-major, in window order.
    ///
    /// # Errors
    ///
    /// Returns `SynthError::InvalidConfig` if there are no customers to attribute
    /// sales to, or if `window` is not strictly increasing.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        window: &[NaiveDate],
        products: &[Product],
        customer_ids: &[u32],
        rng: &mut R,
    ) -> SynthResult<Vec<SaleRecord>> {
        if customer_ids.is_empty() {
            return Err(SynthError::InvalidConfig(
                "cannot attribute sales without customers".into(),
            ));
        }
        if window.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SynthError::InvalidConfig(
                "date window must be strictly increasing".into(),
            ));
        }

        let mut records = Vec::with_capacity(window.len() * products.len());
        for &date in window {
            let before = records.len();
            for product in products {
                records.push(self.synthesize_one(date, product, customer_ids, rng)?);
            }
            debug!(
                %date,
                units = records[before..].iter().map(|r| u64::from(r.units_sold)).sum::<u64>(),
                "synthesized day"
            );
        }

        info!(
            days = window.len(),
            products = products.len(),
            records = records.len(),
            "sales synthesized"
        );
        Ok(records)
    }

    /// Synthesizes a single (day, product) record.
    ///
    /// # Errors
    ///
    /// Returns `SynthError::InvalidConfig` if `customer_ids` is empty.
    pub fn synthesize_one<R: Rng + ?Sized>(
        &self,
        date: NaiveDate,
        product: &Product,
        customer_ids: &[u32],
        rng: &mut R,
    ) -> SynthResult<SaleRecord> {
        let factors = self.factors;
        let (low, high) = product.product_type.daily_units_range();
        let mut units = rng.gen_range(low..=high);

        let is_promotion = rng.gen_bool(self.config.promotion_probability);
        if is_promotion {
            units += rng.gen_range(self.config.promotion_extra_min..=self.config.promotion_extra_max);
        }

        let season = Season::of(date);
        let weekday = date.weekday();
        units = apply_multiplier(units, factors.seasonal(product.category, season));
        units = apply_multiplier(units, factors.weekday(weekday));
        units = apply_multiplier(units, factors.category_multiplier(product.category));
        if is_promotion {
            units = apply_multiplier(units, factors.promotion_multiplier());
        }

        let (final_price, discount_applied) = price_for(
            product.price,
            is_promotion,
            factors.discount_rate(product.category),
        );

        units = apply_noise(units, self.noise.sample(rng));

        let campaign_name = factors
            .campaign_for(date, product.product_id)
            .map(|boost| {
                units = apply_multiplier(units, boost.multiplier);
                boost.name.to_string()
            });

        let event_name = factors.event_for(date, product.category).map(|boost| {
            units = apply_multiplier(units, boost.multiplier);
            boost.name.to_string()
        });

        let customer_id = *customer_ids
            .choose(rng)
            .ok_or_else(|| SynthError::InvalidConfig("no customers".into()))?;

        Ok(SaleRecord {
            date,
            product_id: product.product_id,
            customer_id,
            units_sold: units,
            is_promotion,
            weekday,
            season,
            campaign_name,
            event_name,
            base_price: product.price,
            discount_applied,
            final_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded_rng;
    use retail_synth_core::{Campaign, Category, EventConfig, FactorConfig, ProductType};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn product(id: u32, category: Category, product_type: ProductType) -> Product {
        Product {
            product_id: id,
            product_name: format!("Item{id}"),
            category,
            price: dec!(19.99),
            product_type,
            initial_stock: 100,
        }
    }

    fn window(start: NaiveDate, days: i64) -> Vec<NaiveDate> {
        (0..days).map(|i| start + chrono::Duration::days(i)).collect()
    }

    fn quiet_config() -> GeneratorConfig {
        GeneratorConfig::new(3, 5, 10)
            .with_factors(FactorConfig::neutral())
            .with_noise_std_dev(0.0)
            .with_promotion_probability(0.0)
    }

    #[test]
    fn test_apply_multiplier_truncates() {
        assert_eq!(apply_multiplier(7, 1.3), 9);
        assert_eq!(apply_multiplier(3, 0.9), 2);
        assert_eq!(apply_multiplier(0, 1.7), 0);
        assert_eq!(apply_multiplier(5, -2.0), 0);
    }

    #[test]
    fn test_apply_noise_never_negative() {
        assert_eq!(apply_noise(2, -5.3), 0);
        assert_eq!(apply_noise(2, 1.9), 3);
        assert_eq!(apply_noise(0, -0.1), 0);
    }

    #[test]
    fn test_price_for_discounts_only_when_promoted() {
        assert_eq!(price_for(dec!(100), false, dec!(0.1)), (dec!(100), false));
        assert_eq!(price_for(dec!(100), true, dec!(0.1)), (dec!(90.00), true));
        assert_eq!(price_for(dec!(19.99), true, dec!(0.07)), (dec!(18.59), true));
    }

    #[test]
    fn test_neutral_factors_keep_base_ranges() {
        let config = quiet_config();
        let tables = FactorTables::new(&config.factors, 1.5, Vec::new());
        let synth = SalesSynthesizer::new(&config, &tables).unwrap();
        let products = vec![
            product(1, Category::Food, ProductType::Bestseller),
            product(2, Category::Sport, ProductType::Niche),
            product(3, Category::Beauty, ProductType::Normal),
        ];
        let mut rng = seeded_rng(Some(42));
        let records = synth
            .synthesize(&window(date(2025, 5, 1), 30), &products, &[1, 2, 3], &mut rng)
            .unwrap();

        assert_eq!(records.len(), 90);
        for record in &records {
            let kind = products[record.product_id as usize - 1].product_type;
            let (low, high) = kind.daily_units_range();
            assert!((low..=high).contains(&record.units_sold), "{record:?}");
            assert!(!record.is_promotion);
            assert_eq!(record.final_price, record.base_price);
            assert!(record.campaign_name.is_none());
            assert!(record.event_name.is_none());
        }
    }

    #[test]
    fn test_records_are_day_major() {
        let config = quiet_config();
        let tables = FactorTables::new(&config.factors, 1.5, Vec::new());
        let synth = SalesSynthesizer::new(&config, &tables).unwrap();
        let products = vec![
            product(1, Category::Food, ProductType::Normal),
            product(2, Category::Food, ProductType::Normal),
        ];
        let mut rng = seeded_rng(Some(1));
        let records = synth
            .synthesize(&window(date(2025, 5, 1), 3), &products, &[1], &mut rng)
            .unwrap();

        let keys: Vec<_> = records.iter().map(|r| (r.date.day(), r.product_id)).collect();
        assert_eq!(keys, vec![(1, 1), (1, 2), (2, 1), (2, 2), (3, 1), (3, 2)]);
    }

    #[test]
    fn test_promotion_applies_category_discount() {
        let config = quiet_config().with_promotion_probability(1.0);
        let tables = FactorTables::new(&config.factors, 1.5, Vec::new());
        let synth = SalesSynthesizer::new(&config, &tables).unwrap();
        let item = product(1, Category::Beauty, ProductType::Normal);
        let mut rng = seeded_rng(Some(3));

        let record = synth
            .synthesize_one(date(2025, 5, 1), &item, &[1], &mut rng)
            .unwrap();
        assert!(record.is_promotion);
        assert!(record.discount_applied);
        assert_eq!(record.final_price, dec!(16.99));
        // base 1..=10 plus 3..=10 extra
        assert!((4..=20).contains(&record.units_sold));
    }

    #[test]
    fn test_campaign_and_event_boost_once_each() {
        let mut factors = FactorConfig::neutral();
        for (name, multiplier) in [("Flash", 2.0), ("Shadowed", 10.0)] {
            factors.events.push(EventConfig {
                name: name.to_string(),
                start_date: date(2025, 5, 1),
                end_date: date(2025, 5, 1),
                categories: Some(vec!["Food".to_string()]),
                multiplier,
            });
        }
        let config = quiet_config().with_factors(factors);
        let campaigns = vec![
            Campaign {
                name: "Launch".to_string(),
                start: date(2025, 5, 1),
                end: date(2025, 5, 1),
                product_ids: [1].into_iter().collect(),
            },
            Campaign {
                name: "Overlap".to_string(),
                start: date(2025, 5, 1),
                end: date(2025, 5, 1),
                product_ids: [1].into_iter().collect(),
            },
        ];
        let tables = FactorTables::new(&config.factors, 3.0, campaigns);
        let synth = SalesSynthesizer::new(&config, &tables).unwrap();
        let item = product(1, Category::Food, ProductType::Bestseller);

        let mut rng = seeded_rng(Some(8));
        let record = synth
            .synthesize_one(date(2025, 5, 1), &item, &[1], &mut rng)
            .unwrap();
        assert_eq!(record.campaign_name.as_deref(), Some("Launch"));
        assert_eq!(record.event_name.as_deref(), Some("Flash"));
        // bestseller base 5..=15, x3 campaign, x2 event
        assert!((30..=90).contains(&record.units_sold), "{record:?}");
        assert_eq!(record.units_sold % 2, 0);

        let other = product(2, Category::Sport, ProductType::Normal);
        let record = synth
            .synthesize_one(date(2025, 5, 1), &other, &[1], &mut rng)
            .unwrap();
        assert!(record.campaign_name.is_none());
        assert!(record.event_name.is_none());
    }

    #[test]
    fn test_heavy_noise_never_goes_negative() {
        let config = quiet_config().with_noise_std_dev(25.0);
        let tables = FactorTables::new(&config.factors, 1.5, Vec::new());
        let synth = SalesSynthesizer::new(&config, &tables).unwrap();
        let products = vec![product(1, Category::Food, ProductType::Niche)];
        let mut rng = seeded_rng(Some(99));
        let records = synth
            .synthesize(&window(date(2025, 1, 1), 200), &products, &[1], &mut rng)
            .unwrap();

        assert!(records.iter().any(|r| r.units_sold == 0));
        assert!(records.iter().any(|r| r.units_sold > 5));
    }

    #[test]
    fn test_rejects_missing_customers_and_unordered_window() {
        let config = quiet_config();
        let tables = FactorTables::new(&config.factors, 1.5, Vec::new());
        let synth = SalesSynthesizer::new(&config, &tables).unwrap();
        let products = vec![product(1, Category::Food, ProductType::Niche)];
        let mut rng = seeded_rng(Some(1));

        assert!(synth
            .synthesize(&window(date(2025, 1, 1), 2), &products, &[], &mut rng)
            .is_err());
        let backwards = vec![date(2025, 1, 2), date(2025, 1, 1)];
        assert!(synth
            .synthesize(&backwards, &products, &[1], &mut rng)
            .is_err());
    }
}
