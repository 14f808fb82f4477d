use std::collections::BTreeMap;

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{SynthError, SynthResult};

/// A label with a relative sampling weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weighted {
    pub label: String,
    pub weight: f64,
}

impl Weighted {
    pub fn new(label: impl Into<String>, weight: f64) -> Self {
        Self {
            label: label.into(),
            weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalFactor {
    pub category: String,
    pub season: String,
    pub multiplier: f64,
}

/// Marketing campaign template. The window is derived from the generation start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignConfig {
    pub name: String,
    pub duration_days: u32,
}

/// Special event with an explicit window. `categories = None` targets every category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnReasons {
    pub category: String,
    pub reasons: Vec<Weighted>,
}

/// Demand multipliers. Categories, seasons, and weekdays are referenced by
/// label so that unknown names degrade to a neutral factor instead of failing.
///
/// The keyed tables are sparse: a label without an entry gets 1.0 (discount 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorConfig {
    pub seasonal: Vec<SeasonalFactor>,
    /// Weekday name (`monday`, `Sat`, ...) to multiplier.
    pub weekday: BTreeMap<String, f64>,
    pub promotion_multiplier: f64,
    pub category_multipliers: BTreeMap<String, f64>,
    pub discount_rates: BTreeMap<String, f64>,
    pub campaigns: Vec<CampaignConfig>,
    pub events: Vec<EventConfig>,
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn seasonal(category: &str, season: &str, multiplier: f64) -> SeasonalFactor {
    SeasonalFactor {
        category: category.to_string(),
        season: season.to_string(),
        multiplier,
    }
}

fn table(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), *v))
        .collect()
}

fn category_list(names: &[&str]) -> Option<Vec<String>> {
    Some(names.iter().map(|n| (*n).to_string()).collect())
}

impl Default for FactorConfig {
    fn default() -> Self {
        Self {
            seasonal: vec![
                seasonal("Clothing", "Winter", 1.3),
                seasonal("Clothing", "Summer", 0.8),
                seasonal("Electronics", "Winter", 1.2),
                seasonal("Sport", "Spring", 1.3),
                seasonal("Sport", "Summer", 1.4),
                seasonal("Beauty", "Summer", 1.2),
                seasonal("Food", "Winter", 1.1),
            ],
            weekday: table(&[
                ("monday", 0.9),
                ("tuesday", 1.0),
                ("wednesday", 1.0),
                ("thursday", 1.0),
                ("friday", 1.2),
                ("saturday", 1.5),
                ("sunday", 1.3),
            ]),
            promotion_multiplier: 1.3,
            category_multipliers: table(&[
                ("Electronics", 1.2),
                ("Clothing", 1.0),
                ("Beauty", 0.9),
                ("Sport", 1.1),
                ("Food", 1.3),
            ]),
            discount_rates: table(&[
                ("Clothing", 0.10),
                ("Electronics", 0.05),
                ("Beauty", 0.15),
                ("Food", 0.07),
                ("Sport", 0.12),
            ]),
            campaigns: vec![
                CampaignConfig {
                    name: "Buzz TikTok".to_string(),
                    duration_days: 5,
                },
                CampaignConfig {
                    name: "Influencer A".to_string(),
                    duration_days: 5,
                },
                CampaignConfig {
                    name: "TV Ad".to_string(),
                    duration_days: 10,
                },
            ],
            events: vec![
                EventConfig {
                    name: "Black Friday".to_string(),
                    start_date: ymd(2025, 11, 24),
                    end_date: ymd(2025, 11, 24),
                    categories: None,
                    multiplier: 1.7,
                },
                EventConfig {
                    name: "Winter Sales".to_string(),
                    start_date: ymd(2026, 1, 8),
                    end_date: ymd(2026, 2, 7),
                    categories: category_list(&["Electronics", "Clothing", "Sport", "Beauty"]),
                    multiplier: 1.5,
                },
                EventConfig {
                    name: "Christmas".to_string(),
                    start_date: ymd(2025, 12, 20),
                    end_date: ymd(2025, 12, 24),
                    categories: category_list(&["Electronics", "Beauty"]),
                    multiplier: 1.6,
                },
                EventConfig {
                    name: "Summer Sales".to_string(),
                    start_date: ymd(2025, 7, 8),
                    end_date: ymd(2025, 8, 7),
                    categories: category_list(&["Electronics", "Clothing", "Sport", "Beauty"]),
                    multiplier: 1.5,
                },
            ],
        }
    }
}

impl FactorConfig {
    /// Every multiplier is 1.0 and no campaign or event is declared.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            seasonal: Vec::new(),
            weekday: BTreeMap::new(),
            promotion_multiplier: 1.0,
            category_multipliers: BTreeMap::new(),
            discount_rates: FactorConfig::default().discount_rates,
            campaigns: Vec::new(),
            events: Vec::new(),
        }
    }
}

/// Draw parameters for the order attributes attached after generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub payment_methods: Vec<Weighted>,
    pub delivery_modes: Vec<String>,
    pub return_probability: f64,
    pub return_reasons: Vec<ReturnReasons>,
    pub fallback_return_reasons: Vec<Weighted>,
    pub rating_noise_std_dev: f64,
    pub discount_rating_bonus: f64,
}

fn reasons(category: &str, entries: &[(&str, f64)]) -> ReturnReasons {
    ReturnReasons {
        category: category.to_string(),
        reasons: entries.iter().map(|(l, w)| Weighted::new(*l, *w)).collect(),
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            payment_methods: vec![
                Weighted::new("Credit card", 0.5),
                Weighted::new("PayPal", 0.25),
                Weighted::new("Apple Pay", 0.15),
                Weighted::new("Gift card", 0.1),
            ],
            delivery_modes: vec![
                "standard".to_string(),
                "express".to_string(),
                "pickup".to_string(),
            ],
            return_probability: 0.05,
            return_reasons: vec![
                reasons(
                    "Clothing",
                    &[("size", 0.6), ("changed mind", 0.3), ("defect", 0.1)],
                ),
                reasons(
                    "Electronics",
                    &[("defect", 0.5), ("not as described", 0.4), ("changed mind", 0.1)],
                ),
                reasons("Beauty", &[("changed mind", 0.8), ("not as described", 0.2)]),
                reasons("Food", &[("not as described", 0.7), ("late delivery", 0.3)]),
                reasons(
                    "Sport",
                    &[("size", 0.5), ("defect", 0.3), ("changed mind", 0.2)],
                ),
            ],
            fallback_return_reasons: vec![Weighted::new("changed mind", 1.0)],
            rating_noise_std_dev: 0.5,
            discount_rating_bonus: 0.3,
        }
    }
}

/// Upper bounds accepted by [`GeneratorConfig::validate`].
pub const MAX_DAYS: u32 = 36_600;
pub const MAX_PRODUCTS: u32 = 1_000_000;
pub const MAX_CUSTOMERS: u32 = 10_000_000;
/// Upper bound on `num_days * num_products`, the number of sale rows.
pub const MAX_SALE_RECORDS: u64 = 50_000_000;

/// Top-level generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Optional seed for reproducible datasets.
    pub seed: Option<u64>,
    /// First day of the window. `None` means `num_days` before today.
    pub start_date: Option<NaiveDate>,
    pub num_days: u32,
    pub num_customers: u32,
    pub num_products: u32,
    pub promotion_probability: f64,
    pub promotion_extra_min: u32,
    pub promotion_extra_max: u32,
    /// Standard deviation of the Gaussian demand noise. 0 disables it.
    pub noise_std_dev: f64,
    pub campaign_boost: f64,
    pub campaign_spacing_days: u32,
    pub campaign_product_count: usize,
    pub factors: FactorConfig,
    pub enrichment: EnrichmentConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            start_date: None,
            num_days: 30,
            num_customers: 1000,
            num_products: 50,
            promotion_probability: 0.2,
            promotion_extra_min: 3,
            promotion_extra_max: 10,
            noise_std_dev: 2.0,
            campaign_boost: 1.5,
            campaign_spacing_days: 7,
            campaign_product_count: 5,
            factors: FactorConfig::default(),
            enrichment: EnrichmentConfig::default(),
        }
    }
}

fn check_probability(name: &str, p: f64) -> SynthResult<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(SynthError::InvalidConfig(format!(
            "{name} must be within [0, 1], got {p}"
        )))
    }
}

fn check_max(name: &str, value: u64, max: u64) -> SynthResult<()> {
    if value > max {
        return Err(SynthError::InvalidConfig(format!(
            "{name} must be at most {max}, got {value}"
        )));
    }
    Ok(())
}

fn check_weights(name: &str, entries: &[Weighted]) -> SynthResult<()> {
    if entries.is_empty() {
        return Err(SynthError::InvalidConfig(format!("{name} must not be empty")));
    }
    if let Some(bad) = entries.iter().find(|w| !(w.weight > 0.0)) {
        return Err(SynthError::InvalidConfig(format!(
            "{name}: weight of '{}' must be positive, got {}",
            bad.label, bad.weight
        )));
    }
    Ok(())
}

impl GeneratorConfig {
    #[must_use]
    pub fn new(num_days: u32, num_products: u32, num_customers: u32) -> Self {
        Self {
            num_days,
            num_products,
            num_customers,
            ..Default::default()
        }
    }

    /// Sets a seed for reproducible generation.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_start_date(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    #[must_use]
    pub fn with_factors(mut self, factors: FactorConfig) -> Self {
        self.factors = factors;
        self
    }

    #[must_use]
    pub fn with_noise_std_dev(mut self, std_dev: f64) -> Self {
        self.noise_std_dev = std_dev;
        self
    }

    #[must_use]
    pub fn with_promotion_probability(mut self, p: f64) -> Self {
        self.promotion_probability = p;
        self
    }

    /// First day of the generation window.
    ///
    /// # Errors
    ///
    /// Returns `SynthError::InvalidConfig` if `num_days` before today is not a
    /// representable date.
    pub fn resolved_start(&self) -> SynthResult<NaiveDate> {
        match self.start_date {
            Some(start) => Ok(start),
            None => Local::now()
                .date_naive()
                .checked_sub_signed(Duration::days(i64::from(self.num_days)))
                .ok_or_else(|| {
                    SynthError::InvalidConfig(format!(
                        "cannot start {} days before today",
                        self.num_days
                    ))
                }),
        }
    }

    /// Contiguous daily window of `num_days` days, in increasing order.
    ///
    /// # Errors
    ///
    /// Returns `SynthError::InvalidConfig` if `num_days` exceeds [`MAX_DAYS`]
    /// or the window runs past the last representable date.
    pub fn date_window(&self) -> SynthResult<Vec<NaiveDate>> {
        check_max("num_days", u64::from(self.num_days), u64::from(MAX_DAYS))?;
        let start = self.resolved_start()?;
        (0..self.num_days)
            .map(|i| {
                start
                    .checked_add_signed(Duration::days(i64::from(i)))
                    .ok_or_else(|| {
                        SynthError::InvalidConfig(format!(
                            "window starting {start} overflows at day {i}"
                        ))
                    })
            })
            .collect()
    }

    /// Rejects configuration that cannot produce a dataset.
    ///
    /// # Errors
    ///
    /// Returns `SynthError::InvalidConfig` describing the first problem found.
    pub fn validate(&self) -> SynthResult<()> {
        if self.num_days == 0 {
            return Err(SynthError::InvalidConfig("num_days must be positive".into()));
        }
        if self.num_products == 0 {
            return Err(SynthError::InvalidConfig(
                "num_products must be positive".into(),
            ));
        }
        if self.num_customers == 0 {
            return Err(SynthError::InvalidConfig(
                "num_customers must be positive".into(),
            ));
        }
        check_max("num_days", u64::from(self.num_days), u64::from(MAX_DAYS))?;
        check_max("num_products", u64::from(self.num_products), u64::from(MAX_PRODUCTS))?;
        check_max(
            "num_customers",
            u64::from(self.num_customers),
            u64::from(MAX_CUSTOMERS),
        )?;
        check_max(
            "num_days * num_products",
            u64::from(self.num_days) * u64::from(self.num_products),
            MAX_SALE_RECORDS,
        )?;
        let longest_campaign = self
            .factors
            .campaigns
            .iter()
            .map(|c| u64::from(c.duration_days))
            .max()
            .unwrap_or(0);
        let campaign_span = u64::from(self.campaign_spacing_days)
            .saturating_mul(self.factors.campaigns.len() as u64)
            .saturating_add(longest_campaign);
        check_max("campaign schedule length in days", campaign_span, u64::from(MAX_DAYS))?;
        if self.promotion_extra_min > self.promotion_extra_max {
            return Err(SynthError::InvalidConfig(format!(
                "promotion_extra_min ({}) exceeds promotion_extra_max ({})",
                self.promotion_extra_min, self.promotion_extra_max
            )));
        }
        if !(self.noise_std_dev >= 0.0) || !self.noise_std_dev.is_finite() {
            return Err(SynthError::InvalidConfig(format!(
                "noise_std_dev must be finite and non-negative, got {}",
                self.noise_std_dev
            )));
        }
        if !(self.enrichment.rating_noise_std_dev >= 0.0)
            || !self.enrichment.rating_noise_std_dev.is_finite()
        {
            return Err(SynthError::InvalidConfig(format!(
                "rating_noise_std_dev must be finite and non-negative, got {}",
                self.enrichment.rating_noise_std_dev
            )));
        }
        check_probability("promotion_probability", self.promotion_probability)?;
        check_probability("return_probability", self.enrichment.return_probability)?;
        check_weights("payment_methods", &self.enrichment.payment_methods)?;
        check_weights("fallback_return_reasons", &self.enrichment.fallback_return_reasons)?;
        for entry in &self.enrichment.return_reasons {
            check_weights(&format!("return_reasons.{}", entry.category), &entry.reasons)?;
        }
        if self.enrichment.delivery_modes.is_empty() {
            return Err(SynthError::InvalidConfig(
                "delivery_modes must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_window_is_contiguous_and_increasing() {
        let start = NaiveDate::from_ymd_opt(2025, 12, 30).unwrap();
        let config = GeneratorConfig::new(4, 5, 10).with_start_date(start);
        let window = config.date_window().unwrap();

        assert_eq!(window.len(), 4);
        assert_eq!(window[0], start);
        assert_eq!(window[3], NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        assert!(window.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_window_defaults_to_days_before_today() {
        let config = GeneratorConfig::new(30, 5, 10);
        let today = Local::now().date_naive();
        assert_eq!(config.resolved_start().unwrap(), today - Duration::days(30));
    }

    #[test]
    fn test_oversized_runs_are_rejected_not_allocated() {
        let huge = GeneratorConfig::new(u32::MAX, 1, 1);
        assert!(matches!(huge.validate(), Err(SynthError::InvalidConfig(_))));
        assert!(matches!(huge.date_window(), Err(SynthError::InvalidConfig(_))));

        assert!(GeneratorConfig::new(30, u32::MAX, 10).validate().is_err());
        assert!(GeneratorConfig::new(30, 50, u32::MAX).validate().is_err());
        // each size fits on its own, the grid does not
        assert!(GeneratorConfig::new(MAX_DAYS, MAX_PRODUCTS, 10).validate().is_err());

        let mut spaced = GeneratorConfig::new(30, 50, 100);
        spaced.campaign_spacing_days = u32::MAX;
        assert!(spaced.validate().is_err());
    }

    #[test]
    fn test_window_past_last_date_is_an_error() {
        let config = GeneratorConfig::new(10, 5, 10).with_start_date(NaiveDate::MAX);
        assert!(matches!(
            config.date_window(),
            Err(SynthError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_sizes() {
        assert!(GeneratorConfig::new(0, 5, 10).validate().is_err());
        assert!(GeneratorConfig::new(3, 0, 10).validate().is_err());
        assert!(GeneratorConfig::new(3, 5, 0).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_probability() {
        let config = GeneratorConfig::default().with_promotion_probability(1.5);
        assert!(matches!(
            config.validate(),
            Err(SynthError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_positive_weight() {
        let mut config = GeneratorConfig::default();
        config.enrichment.payment_methods = vec![Weighted::new("Cash", 0.0)];
        assert!(config.validate().is_err());

        config.enrichment.payment_methods.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_noise() {
        let config = GeneratorConfig::default().with_noise_std_dev(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_neutral_factors_keep_discounts() {
        let neutral = FactorConfig::neutral();
        assert!(neutral.seasonal.is_empty());
        assert!(neutral.campaigns.is_empty());
        assert!(neutral.events.is_empty());
        assert_eq!(neutral.promotion_multiplier, 1.0);
        assert_eq!(neutral.discount_rates.get("Beauty"), Some(&0.15));
    }
}
