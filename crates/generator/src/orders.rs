//! Order grouping and customer tiers.
//!
//! All sales of one customer on one day form a single order. Order ids are
//! dense 1-based codes assigned in ascending `(customer_id, date)` order.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;

use retail_synth_core::{Customer, CustomerProfile, CustomerType};

use crate::sales::SaleRecord;

/// Order id of every sale, aligned with `sales`.
#[must_use]
pub fn assign_order_ids(sales: &[SaleRecord]) -> Vec<u32> {
    let keys: BTreeSet<(u32, NaiveDate)> = sales.iter().map(|s| (s.customer_id, s.date)).collect();
    let codes: BTreeMap<(u32, NaiveDate), u32> = keys
        .into_iter()
        .enumerate()
        .map(|(i, key)| (key, i as u32 + 1))
        .collect();

    sales
        .iter()
        .map(|s| codes[&(s.customer_id, s.date)])
        .collect()
}

/// Distinct orders per customer, from `(customer_id, order_id)` pairs.
#[must_use]
pub fn order_counts(orders: impl IntoIterator<Item = (u32, u32)>) -> HashMap<u32, usize> {
    let distinct: BTreeSet<(u32, u32)> = orders.into_iter().collect();
    let mut counts = HashMap::new();
    for (customer_id, _) in distinct {
        *counts.entry(customer_id).or_insert(0) += 1;
    }
    counts
}

/// Annotates every customer with its order count and tier. Customers without
/// orders are `new`.
#[must_use]
pub fn classify_customers(
    customers: &[Customer],
    counts: &HashMap<u32, usize>,
) -> Vec<CustomerProfile> {
    customers
        .iter()
        .map(|customer| {
            let order_count = counts.get(&customer.customer_id).copied().unwrap_or(0);
            CustomerProfile {
                customer: customer.clone(),
                order_count,
                customer_type: CustomerType::from_order_count(order_count),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use retail_synth_core::Season;
    use rust_decimal_macros::dec;

    fn sale(day: u32, product_id: u32, customer_id: u32) -> SaleRecord {
        SaleRecord {
            date: NaiveDate::from_ymd_opt(2025, 4, day).unwrap(),
            product_id,
            customer_id,
            units_sold: 1,
            is_promotion: false,
            weekday: Weekday::Mon,
            season: Season::Spring,
            campaign_name: None,
            event_name: None,
            base_price: dec!(10),
            discount_applied: false,
            final_price: dec!(10),
        }
    }

    fn customer(id: u32) -> Customer {
        Customer {
            customer_id: id,
            customer_name: format!("Customer {id}"),
            email: format!("c{id}@example.com"),
            location: "Springfield".to_string(),
            registration_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        }
    }

    #[test]
    fn test_same_customer_same_day_share_an_order() {
        let sales = vec![sale(1, 1, 7), sale(1, 2, 7), sale(1, 3, 2), sale(2, 1, 7)];
        let ids = assign_order_ids(&sales);

        assert_eq!(ids[0], ids[1]);
        assert_ne!(ids[0], ids[3]);
        // (2, day1) < (7, day1) < (7, day2)
        assert_eq!(ids, vec![2, 2, 1, 3]);
    }

    #[test]
    fn test_order_ids_are_dense() {
        let sales: Vec<_> = (1..=5).map(|d| sale(d, 1, d % 2 + 1)).collect();
        let ids: BTreeSet<u32> = assign_order_ids(&sales).into_iter().collect();
        assert_eq!(ids, (1..=5).collect());
    }

    #[test]
    fn test_classification_counts_distinct_orders() {
        let pairs = vec![(1, 1), (1, 1), (1, 2), (2, 3), (2, 4), (2, 5), (2, 6), (2, 7)];
        let counts = order_counts(pairs);
        assert_eq!(counts[&1], 2);
        assert_eq!(counts[&2], 5);

        let profiles = classify_customers(&[customer(1), customer(2), customer(3)], &counts);
        assert_eq!(profiles[0].customer_type, CustomerType::Returning);
        assert_eq!(profiles[1].customer_type, CustomerType::Vip);
        assert_eq!(profiles[2].customer_type, CustomerType::New);
        assert_eq!(profiles[2].order_count, 0);
    }
}
