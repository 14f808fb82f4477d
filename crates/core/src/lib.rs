//! Core types for the synthetic retail dataset generator.
//!
//! This crate provides:
//! - Reference entities (customers, products) and their classifications
//! - Generator configuration and its `figment` loader
//! - Read-only demand factor tables (seasonal, weekday, promotion, campaigns, events)
//! - The shared error type

pub mod config;
pub mod config_loader;
pub mod error;
pub mod factors;
pub mod model;

pub use config::{
    CampaignConfig, EnrichmentConfig, EventConfig, FactorConfig, GeneratorConfig, ReturnReasons,
    SeasonalFactor, Weighted,
};
pub use config_loader::ConfigLoader;
pub use error::{SynthError, SynthResult};
pub use factors::{Boost, Campaign, FactorTables, SpecialEvent};
pub use model::{
    weekday_name, Category, Customer, CustomerProfile, CustomerType, Product, ProductType, Season,
};
