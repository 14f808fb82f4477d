//! Read-only demand factor tables.
//!
//! Built once from [`FactorConfig`] and never mutated afterwards. Every lookup
//! falls back to a neutral value (multiplier 1.0, discount 0) when the table
//! has no entry, so partial or inconsistent configuration never fails.

use std::collections::{BTreeSet, HashMap};

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{EventConfig, FactorConfig};
use crate::model::{Category, Season};

/// Time-boxed marketing push on a fixed subset of products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub name: String,
    pub start: NaiveDate,
    /// Inclusive.
    pub end: NaiveDate,
    pub product_ids: BTreeSet<u32>,
}

impl Campaign {
    #[must_use]
    pub fn applies_to(&self, date: NaiveDate, product_id: u32) -> bool {
        self.start <= date && date <= self.end && self.product_ids.contains(&product_id)
    }
}

/// Time-boxed multiplier, optionally restricted to some categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialEvent {
    pub name: String,
    pub start: NaiveDate,
    /// Inclusive.
    pub end: NaiveDate,
    /// `None` applies to every category.
    pub categories: Option<BTreeSet<Category>>,
    pub multiplier: f64,
}

impl SpecialEvent {
    /// Resolves category labels; unknown labels are dropped with a warning.
    #[must_use]
    pub fn from_config(config: &EventConfig) -> Self {
        let categories = config.categories.as_ref().map(|names| {
            names
                .iter()
                .filter_map(|name| match name.parse::<Category>() {
                    Ok(category) => Some(category),
                    Err(e) => {
                        warn!(event = %config.name, "ignoring event category: {e}");
                        None
                    }
                })
                .collect()
        });
        Self {
            name: config.name.clone(),
            start: config.start_date,
            end: config.end_date,
            categories,
            multiplier: config.multiplier,
        }
    }

    #[must_use]
    pub fn applies_to(&self, date: NaiveDate, category: Category) -> bool {
        let in_window = self.start <= date && date <= self.end;
        let in_scope = self
            .categories
            .as_ref()
            .map_or(true, |set| set.contains(&category));
        in_window && in_scope
    }
}

/// An adjustment picked from a priority-ordered list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boost<'a> {
    pub name: &'a str,
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactorTables {
    seasonal: HashMap<(Category, Season), f64>,
    weekday: HashMap<Weekday, f64>,
    promotion_multiplier: f64,
    category_multipliers: HashMap<Category, f64>,
    discount_rates: HashMap<Category, Decimal>,
    campaign_boost: f64,
    /// Priority order: the first matching campaign wins.
    campaigns: Vec<Campaign>,
    /// Declaration order: the first matching event wins.
    events: Vec<SpecialEvent>,
}

fn resolve_categories<V>(
    table: &str,
    entries: impl IntoIterator<Item = (String, V)>,
) -> HashMap<Category, V> {
    entries
        .into_iter()
        .filter_map(|(name, value)| match name.parse::<Category>() {
            Ok(category) => Some((category, value)),
            Err(e) => {
                warn!(table = table, "ignoring factor entry: {e}");
                None
            }
        })
        .collect()
}

impl FactorTables {
    /// Builds the lookup tables. `campaigns` already carry their resolved
    /// windows and product subsets.
    #[must_use]
    pub fn new(config: &FactorConfig, campaign_boost: f64, campaigns: Vec<Campaign>) -> Self {
        let mut seasonal = HashMap::new();
        for entry in &config.seasonal {
            match (entry.category.parse::<Category>(), entry.season.parse::<Season>()) {
                (Ok(category), Ok(season)) => {
                    seasonal.insert((category, season), entry.multiplier);
                }
                (Err(e), _) | (_, Err(e)) => warn!(table = "seasonal", "ignoring factor entry: {e}"),
            }
        }

        let weekday = config
            .weekday
            .iter()
            .filter_map(|(name, value)| match name.parse::<Weekday>() {
                Ok(day) => Some((day, *value)),
                Err(_) => {
                    warn!(table = "weekday", "ignoring factor entry: unknown weekday '{name}'");
                    None
                }
            })
            .collect();

        let category_multipliers = resolve_categories(
            "category_multipliers",
            config
                .category_multipliers
                .iter()
                .map(|(k, v)| (k.clone(), *v)),
        );

        let discount_rates = resolve_categories(
            "discount_rates",
            config.discount_rates.iter().filter_map(|(k, v)| {
                match Decimal::try_from(*v) {
                    Ok(rate) => Some((k.clone(), rate)),
                    Err(e) => {
                        warn!(category = %k, "ignoring discount rate {v}: {e}");
                        None
                    }
                }
            }),
        );

        Self {
            seasonal,
            weekday,
            promotion_multiplier: config.promotion_multiplier,
            category_multipliers,
            discount_rates,
            campaign_boost,
            campaigns,
            events: config.events.iter().map(SpecialEvent::from_config).collect(),
        }
    }

    #[must_use]
    pub fn seasonal(&self, category: Category, season: Season) -> f64 {
        self.seasonal.get(&(category, season)).copied().unwrap_or(1.0)
    }

    #[must_use]
    pub fn weekday(&self, weekday: Weekday) -> f64 {
        self.weekday.get(&weekday).copied().unwrap_or(1.0)
    }

    #[must_use]
    pub fn promotion_multiplier(&self) -> f64 {
        self.promotion_multiplier
    }

    #[must_use]
    pub fn category_multiplier(&self, category: Category) -> f64 {
        self.category_multipliers.get(&category).copied().unwrap_or(1.0)
    }

    #[must_use]
    pub fn discount_rate(&self, category: Category) -> Decimal {
        self.discount_rates
            .get(&category)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    #[must_use]
    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    #[must_use]
    pub fn events(&self) -> &[SpecialEvent] {
        &self.events
    }

    /// First campaign, in priority order, covering this day and product.
    #[must_use]
    pub fn campaign_for(&self, date: NaiveDate, product_id: u32) -> Option<Boost<'_>> {
        self.campaigns
            .iter()
            .find(|c| c.applies_to(date, product_id))
            .map(|c| Boost {
                name: &c.name,
                multiplier: self.campaign_boost,
            })
    }

    /// First event, in declaration order, covering this day and category.
    #[must_use]
    pub fn event_for(&self, date: NaiveDate, category: Category) -> Option<Boost<'_>> {
        self.events
            .iter()
            .find(|e| e.applies_to(date, category))
            .map(|e| Boost {
                name: &e.name,
                multiplier: e.multiplier,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeasonalFactor;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn campaign(name: &str, start: NaiveDate, end: NaiveDate, ids: &[u32]) -> Campaign {
        Campaign {
            name: name.to_string(),
            start,
            end,
            product_ids: ids.iter().copied().collect(),
        }
    }

    #[test]
    fn test_missing_entries_are_neutral() {
        let tables = FactorTables::new(&FactorConfig::default(), 1.5, Vec::new());

        // (Food, Summer) is not listed
        assert_eq!(tables.seasonal(Category::Food, Season::Summer), 1.0);
        assert_eq!(tables.seasonal(Category::Clothing, Season::Winter), 1.3);

        let mut config = FactorConfig::default();
        config.category_multipliers.clear();
        config.discount_rates.clear();
        let tables = FactorTables::new(&config, 1.5, Vec::new());
        for category in Category::ALL {
            assert_eq!(tables.category_multiplier(category), 1.0);
            assert_eq!(tables.discount_rate(category), Decimal::ZERO);
            for season in Season::ALL {
                assert!(tables.seasonal(category, season) > 0.0);
            }
        }
    }

    #[test]
    fn test_unknown_category_labels_are_ignored() {
        let mut config = FactorConfig::neutral();
        config.seasonal.push(SeasonalFactor {
            category: "Garden".to_string(),
            season: "Summer".to_string(),
            multiplier: 3.0,
        });
        config.seasonal.push(SeasonalFactor {
            category: "Food".to_string(),
            season: "Monsoon".to_string(),
            multiplier: 3.0,
        });
        config.category_multipliers.insert("Garden".to_string(), 9.0);

        let tables = FactorTables::new(&config, 1.5, Vec::new());
        for category in Category::ALL {
            assert_eq!(tables.category_multiplier(category), 1.0);
            for season in Season::ALL {
                assert_eq!(tables.seasonal(category, season), 1.0);
            }
        }
    }

    #[test]
    fn test_weekday_lookup() {
        let tables = FactorTables::new(&FactorConfig::default(), 1.5, Vec::new());
        assert_eq!(tables.weekday(Weekday::Mon), 0.9);
        assert_eq!(tables.weekday(Weekday::Sat), 1.5);
        assert_eq!(tables.discount_rate(Category::Beauty), dec!(0.15));
    }

    #[test]
    fn test_sparse_weekday_table() {
        let mut config = FactorConfig::neutral();
        config.weekday.insert("Friday".to_string(), 2.0);
        config.weekday.insert("sat".to_string(), 1.5);
        config.weekday.insert("Caturday".to_string(), 9.0);

        let tables = FactorTables::new(&config, 1.5, Vec::new());
        assert_eq!(tables.weekday(Weekday::Fri), 2.0);
        assert_eq!(tables.weekday(Weekday::Sat), 1.5);
        for day in [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Sun] {
            assert_eq!(tables.weekday(day), 1.0);
        }
    }

    #[test]
    fn test_first_matching_campaign_wins() {
        let campaigns = vec![
            campaign("First", date(2025, 1, 1), date(2025, 1, 5), &[1, 2]),
            campaign("Second", date(2025, 1, 3), date(2025, 1, 12), &[2, 3]),
        ];
        let tables = FactorTables::new(&FactorConfig::neutral(), 1.5, campaigns);

        let hit = tables.campaign_for(date(2025, 1, 4), 2).unwrap();
        assert_eq!(hit.name, "First");
        assert_eq!(hit.multiplier, 1.5);

        assert_eq!(tables.campaign_for(date(2025, 1, 6), 2).unwrap().name, "Second");
        assert!(tables.campaign_for(date(2025, 1, 4), 4).is_none());
        // end date is inclusive
        assert!(tables.campaign_for(date(2025, 1, 5), 1).is_some());
        assert!(tables.campaign_for(date(2025, 1, 6), 1).is_none());
    }

    #[test]
    fn test_first_matching_event_wins_with_category_filter() {
        let config = FactorConfig::default();
        let tables = FactorTables::new(&config, 1.5, Vec::new());

        let black_friday = tables.event_for(date(2025, 11, 24), Category::Food).unwrap();
        assert_eq!(black_friday.name, "Black Friday");
        assert_eq!(black_friday.multiplier, 1.7);

        let christmas = tables
            .event_for(date(2025, 12, 22), Category::Electronics)
            .unwrap();
        assert_eq!(christmas.name, "Christmas");

        // Christmas excludes Food
        assert!(tables.event_for(date(2025, 12, 22), Category::Food).is_none());
        assert!(tables.event_for(date(2025, 10, 1), Category::Sport).is_none());
    }

    #[test]
    fn test_overlapping_events_follow_declaration_order() {
        let mut config = FactorConfig::neutral();
        for (name, multiplier) in [("Early", 2.0), ("Late", 3.0)] {
            config.events.push(EventConfig {
                name: name.to_string(),
                start_date: date(2025, 3, 1),
                end_date: date(2025, 3, 31),
                categories: None,
                multiplier,
            });
        }
        let tables = FactorTables::new(&config, 1.5, Vec::new());
        let hit = tables.event_for(date(2025, 3, 10), Category::Sport).unwrap();
        assert_eq!(hit.name, "Early");
        assert_eq!(hit.multiplier, 2.0);
    }
}
