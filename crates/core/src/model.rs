//! Reference entities shared by every stage of the generator.
//!
//! Customers and products are immutable once created. Everything derived
//! later (customer tier, running stock) lives in separate tables keyed by id.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product category. The set is closed; configuration refers to categories by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Electronics,
    Clothing,
    Food,
    Beauty,
    Sport,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Electronics,
        Category::Clothing,
        Category::Food,
        Category::Beauty,
        Category::Sport,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing",
            Category::Food => "Food",
            Category::Beauty => "Beauty",
            Category::Sport => "Sport",
        }
    }

    /// Inclusive price range used when drawing a base price.
    #[must_use]
    pub fn price_range(self) -> (f64, f64) {
        match self {
            Category::Food => (1.0, 20.0),
            Category::Beauty => (5.0, 50.0),
            Category::Clothing => (10.0, 150.0),
            Category::Electronics => (50.0, 1000.0),
            Category::Sport => (10.0, 500.0),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category: '{s}'"))
    }
}

/// Sales profile of a product. Controls both stock range and daily demand range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Normal,
    Bestseller,
    Niche,
}

impl ProductType {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ProductType::Normal => "normal",
            ProductType::Bestseller => "bestseller",
            ProductType::Niche => "niche",
        }
    }

    /// Inclusive range for the initial stock of a product of this type.
    #[must_use]
    pub fn stock_range(self) -> (u32, u32) {
        match self {
            ProductType::Bestseller => (100, 200),
            ProductType::Niche => (20, 80),
            ProductType::Normal => (50, 150),
        }
    }

    /// Inclusive range for the base number of units sold per day.
    #[must_use]
    pub fn daily_units_range(self) -> (u32, u32) {
        match self {
            ProductType::Bestseller => (5, 15),
            ProductType::Niche => (0, 5),
            ProductType::Normal => (1, 10),
        }
    }

    /// Starting point of a customer rating before noise and bonuses.
    #[must_use]
    pub fn base_rating(self) -> f64 {
        match self {
            ProductType::Bestseller | ProductType::Niche => 4.5,
            ProductType::Normal => 4.0,
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Autumn];

    /// Dec-Feb winter, Mar-May spring, Jun-Aug summer, Sep-Nov autumn.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        match date.month() {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Season::ALL
            .into_iter()
            .find(|season| season.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown season: '{s}'"))
    }
}

/// Full English weekday name, as written in the sales table.
#[must_use]
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: u32,
    pub customer_name: String,
    pub email: String,
    pub location: String,
    pub registration_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: u32,
    pub product_name: String,
    pub category: Category,
    pub price: Decimal,
    pub product_type: ProductType,
    pub initial_stock: u32,
}

/// Customer tier derived from the number of distinct orders placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerType {
    New,
    Returning,
    Vip,
}

impl CustomerType {
    /// new: fewer than 2 orders, returning: 2 to 4, VIP: 5 or more.
    #[must_use]
    pub fn from_order_count(orders: usize) -> Self {
        match orders {
            0 | 1 => CustomerType::New,
            2..=4 => CustomerType::Returning,
            _ => CustomerType::Vip,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CustomerType::New => "new",
            CustomerType::Returning => "returning",
            CustomerType::Vip => "VIP",
        }
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A customer annotated with its tier once all sales exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    #[serde(flatten)]
    pub customer: Customer,
    pub order_count: usize,
    pub customer_type: CustomerType,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_season_partition_covers_every_month() {
        let expected = [
            Season::Winter,
            Season::Winter,
            Season::Spring,
            Season::Spring,
            Season::Spring,
            Season::Summer,
            Season::Summer,
            Season::Summer,
            Season::Autumn,
            Season::Autumn,
            Season::Autumn,
            Season::Winter,
        ];
        for (i, season) in expected.iter().enumerate() {
            assert_eq!(Season::of(date(2025, i as u32 + 1, 15)), *season);
        }
    }

    #[test]
    fn test_category_parses_case_insensitively() {
        assert_eq!("electronics".parse::<Category>(), Ok(Category::Electronics));
        assert_eq!(" Sport ".parse::<Category>(), Ok(Category::Sport));
        assert!("Garden".parse::<Category>().is_err());
    }

    #[test]
    fn test_customer_type_thresholds() {
        assert_eq!(CustomerType::from_order_count(0), CustomerType::New);
        assert_eq!(CustomerType::from_order_count(1), CustomerType::New);
        assert_eq!(CustomerType::from_order_count(2), CustomerType::Returning);
        assert_eq!(CustomerType::from_order_count(4), CustomerType::Returning);
        assert_eq!(CustomerType::from_order_count(5), CustomerType::Vip);
        assert_eq!(CustomerType::from_order_count(40), CustomerType::Vip);
    }

    #[test]
    fn test_product_type_ranges() {
        assert_eq!(ProductType::Bestseller.stock_range(), (100, 200));
        assert_eq!(ProductType::Niche.daily_units_range(), (0, 5));
        assert!(ProductType::Niche.base_rating() > ProductType::Normal.base_rating());
    }

    #[test]
    fn test_weekday_names() {
        assert_eq!(weekday_name(date(2025, 11, 24).weekday()), "Monday");
        assert_eq!(weekday_name(date(2025, 11, 29).weekday()), "Saturday");
    }
}
