//! Summary aggregates over a generated dataset.
//!
//! Consumes the output tables only; nothing here feeds back into generation.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use retail_synth_core::{Category, ProductType};

use crate::pipeline::Dataset;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRevenue {
    pub product_id: u32,
    pub product_name: String,
    pub category: Category,
    pub product_type: ProductType,
    pub units: u64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStock {
    pub category: Category,
    pub mean_remaining_stock: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityOrders {
    pub location: String,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub records: usize,
    pub orders: usize,
    pub units: u64,
    pub revenue: Decimal,
    pub return_rate: f64,
    /// `None` when every sale was returned.
    pub mean_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub totals: Totals,
    pub top_products: Vec<ProductRevenue>,
    pub stock_by_category: Vec<CategoryStock>,
    pub top_cities: Vec<CityOrders>,
}

impl SalesReport {
    /// Builds the report, keeping the `top_n` best products and cities.
    #[must_use]
    pub fn build(dataset: &Dataset, top_n: usize) -> Self {
        Self {
            totals: totals(dataset),
            top_products: top_products_by_revenue(dataset, top_n),
            stock_by_category: mean_remaining_stock_by_category(dataset),
            top_cities: top_cities_by_orders(dataset, top_n),
        }
    }
}

fn totals(dataset: &Dataset) -> Totals {
    let sales = &dataset.sales;
    let orders: BTreeSet<u32> = sales.iter().map(|s| s.order_id).collect();
    let ratings: Vec<f64> = sales.iter().filter_map(|s| s.rating).collect();
    let returns = sales.iter().filter(|s| s.is_returned).count();

    Totals {
        records: sales.len(),
        orders: orders.len(),
        units: sales.iter().map(|s| u64::from(s.units_sold)).sum(),
        revenue: sales.iter().map(|s| s.revenue).sum(),
        return_rate: if sales.is_empty() {
            0.0
        } else {
            returns as f64 / sales.len() as f64
        },
        mean_rating: if ratings.is_empty() {
            None
        } else {
            Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
        },
    }
}

/// Products ranked by total revenue, highest first; ties broken by id.
#[must_use]
pub fn top_products_by_revenue(dataset: &Dataset, top_n: usize) -> Vec<ProductRevenue> {
    let mut by_product: HashMap<u32, (u64, Decimal)> = HashMap::new();
    for sale in &dataset.sales {
        let entry = by_product.entry(sale.product_id).or_default();
        entry.0 += u64::from(sale.units_sold);
        entry.1 += sale.revenue;
    }

    let mut ranked: Vec<ProductRevenue> = dataset
        .products
        .iter()
        .filter_map(|p| {
            by_product.get(&p.product_id).map(|(units, revenue)| ProductRevenue {
                product_id: p.product_id,
                product_name: p.product_name.clone(),
                category: p.category,
                product_type: p.product_type,
                units: *units,
                revenue: *revenue,
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.revenue.cmp(&a.revenue).then(a.product_id.cmp(&b.product_id)));
    ranked.truncate(top_n);
    ranked
}

/// Mean remaining stock over all sale rows of each category.
#[must_use]
pub fn mean_remaining_stock_by_category(dataset: &Dataset) -> Vec<CategoryStock> {
    let mut sums: BTreeMap<Category, (u64, usize)> = BTreeMap::new();
    for sale in &dataset.sales {
        let entry = sums.entry(sale.category).or_default();
        entry.0 += u64::from(sale.remaining_stock);
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(category, (total, n))| CategoryStock {
            category,
            mean_remaining_stock: total as f64 / n as f64,
        })
        .collect()
}

/// Cities ranked by number of distinct orders, highest first; ties by name.
#[must_use]
pub fn top_cities_by_orders(dataset: &Dataset, top_n: usize) -> Vec<CityOrders> {
    let locations: HashMap<u32, &str> = dataset
        .customers
        .iter()
        .map(|c| (c.customer.customer_id, c.customer.location.as_str()))
        .collect();

    let mut orders: BTreeMap<&str, BTreeSet<u32>> = BTreeMap::new();
    for sale in &dataset.sales {
        if let Some(location) = locations.get(&sale.customer_id) {
            orders.entry(*location).or_default().insert(sale.order_id);
        }
    }

    let mut ranked: Vec<CityOrders> = orders
        .into_iter()
        .map(|(location, ids)| CityOrders {
            location: location.to_string(),
            orders: ids.len(),
        })
        .collect();
    ranked.sort_by(|a, b| b.orders.cmp(&a.orders).then_with(|| a.location.cmp(&b.location)));
    ranked.truncate(top_n);
    ranked
}
