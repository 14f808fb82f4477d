//! Column-oriented views of the generated datasets.
//!
//! A [`Table`] maps each column name to its values, one value per row, in a
//! fixed presentation order. Values are already rendered as text.

use retail_synth_core::{weekday_name, CustomerProfile, Product};
use retail_synth_generator::EnrichedSale;

/// A record type that can be laid out as one table row.
pub trait TableRow {
    const COLUMNS: &'static [&'static str];

    /// Cell values, aligned with [`Self::COLUMNS`].
    fn cells(&self) -> Vec<String>;
}

fn flag(value: bool) -> String {
    let cell = if value { "1" } else { "0" };
    cell.to_string()
}

fn optional(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

impl TableRow for CustomerProfile {
    const COLUMNS: &'static [&'static str] = &[
        "customer_id",
        "customer_name",
        "email",
        "location",
        "registration_date",
        "order_count",
        "customer_type",
    ];

    fn cells(&self) -> Vec<String> {
        let c = &self.customer;
        vec![
            c.customer_id.to_string(),
            c.customer_name.clone(),
            c.email.clone(),
            c.location.clone(),
            c.registration_date.format("%Y-%m-%d").to_string(),
            self.order_count.to_string(),
            self.customer_type.label().to_string(),
        ]
    }
}

impl TableRow for Product {
    const COLUMNS: &'static [&'static str] = &[
        "product_id",
        "product_name",
        "category",
        "price",
        "product_type",
        "initial_stock",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.product_id.to_string(),
            self.product_name.clone(),
            self.category.label().to_string(),
            self.price.to_string(),
            self.product_type.label().to_string(),
            self.initial_stock.to_string(),
        ]
    }
}

impl TableRow for EnrichedSale {
    const COLUMNS: &'static [&'static str] = &[
        "date",
        "order_id",
        "customer_id",
        "payment_method",
        "product_id",
        "product_name",
        "category",
        "product_type",
        "units_sold",
        "is_promotion",
        "original_price",
        "discount_applied",
        "final_price",
        "initial_stock",
        "remaining_stock",
        "cumulative_sales",
        "revenue",
        "delivery_mode",
        "is_returned",
        "return_reason",
        "rating",
        "weekday",
        "season",
        "campaign_name",
        "event",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.date.format("%Y-%m-%d").to_string(),
            self.order_id.to_string(),
            self.customer_id.to_string(),
            self.payment_method.clone(),
            self.product_id.to_string(),
            self.product_name.clone(),
            self.category.label().to_string(),
            self.product_type.label().to_string(),
            self.units_sold.to_string(),
            flag(self.is_promotion),
            self.original_price.to_string(),
            flag(self.discount_applied),
            self.final_price.to_string(),
            self.initial_stock.to_string(),
            self.remaining_stock.to_string(),
            self.cumulative_sales.to_string(),
            self.revenue.round_dp(2).to_string(),
            self.delivery_mode.clone(),
            flag(self.is_returned),
            optional(self.return_reason.as_deref()),
            self.rating.map(|r| format!("{r:.1}")).unwrap_or_default(),
            weekday_name(self.weekday).to_string(),
            self.season.label().to_string(),
            optional(self.campaign_name.as_deref()),
            optional(self.event_name.as_deref()),
        ]
    }
}

/// Ordered mapping from column name to column values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<(String, Vec<String>)>,
}

impl Table {
    /// Builds a table with one row per record.
    #[must_use]
    pub fn from_rows<T: TableRow>(rows: &[T]) -> Self {
        let mut columns: Vec<(String, Vec<String>)> = T::COLUMNS
            .iter()
            .map(|name| ((*name).to_string(), Vec::with_capacity(rows.len())))
            .collect();
        for row in rows {
            for ((_, values), cell) in columns.iter_mut().zip(row.cells()) {
                values.push(cell);
            }
        }
        Self { columns }
    }

    /// Builds a table from a header and row-major cells.
    ///
    /// Short rows are padded with empty cells; extra cells are dropped.
    #[must_use]
    pub fn from_records(headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        let mut columns: Vec<(String, Vec<String>)> = headers
            .into_iter()
            .map(|name| (name, Vec::with_capacity(records.len())))
            .collect();
        for record in records {
            let mut cells = record.into_iter();
            for (_, values) in &mut columns {
                values.push(cells.next().unwrap_or_default());
            }
        }
        Self { columns }
    }

    #[must_use]
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |(_, values)| values.len())
    }

    /// Row `i`, in column order.
    #[must_use]
    pub fn row(&self, i: usize) -> Option<Vec<&str>> {
        if i >= self.num_rows() {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|(_, values)| values[i].as_str())
                .collect(),
        )
    }
}
