//! Customer and product reference tables.

use chrono::NaiveDate;
use fake::faker::address::en::CityName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Word;
use fake::faker::name::en::Name;
use fake::Fake;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use tracing::debug;

use retail_synth_core::{Category, Customer, Product, ProductType, SynthError, SynthResult};

/// Exact product-type mix for `n` products: 30% bestseller and 20% niche
/// (rounded down), the rest normal. Not shuffled.
#[must_use]
pub fn product_type_pool(n: usize) -> Vec<ProductType> {
    let bestsellers = n * 3 / 10;
    let niche = n * 2 / 10;
    let normal = n - bestsellers - niche;

    let mut pool = Vec::with_capacity(n);
    pool.extend(std::iter::repeat(ProductType::Normal).take(normal));
    pool.extend(std::iter::repeat(ProductType::Bestseller).take(bestsellers));
    pool.extend(std::iter::repeat(ProductType::Niche).take(niche));
    pool
}

/// Draws a price in the category range, rounded to cents.
///
/// # Errors
///
/// Returns `SynthError::Distribution` if the draw is not representable.
pub fn draw_price<R: Rng + ?Sized>(category: Category, rng: &mut R) -> SynthResult<Decimal> {
    let (low, high) = category.price_range();
    let raw = rng.gen_range(low..=high);
    Decimal::try_from(raw)
        .map(|price| price.round_dp(2))
        .map_err(|e| SynthError::Distribution(format!("price {raw}: {e}")))
}

#[must_use]
pub fn draw_stock<R: Rng + ?Sized>(product_type: ProductType, rng: &mut R) -> u32 {
    let (low, high) = product_type.stock_range();
    rng.gen_range(low..=high)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Generates `n` products with sequential ids starting at 1.
///
/// # Errors
///
/// Returns `SynthError::Distribution` if a price cannot be drawn.
pub fn generate_products<R: Rng + ?Sized>(n: usize, rng: &mut R) -> SynthResult<Vec<Product>> {
    let mut types = product_type_pool(n);
    types.shuffle(rng);

    let mut products = Vec::with_capacity(n);
    for (i, product_type) in types.into_iter().enumerate() {
        let category = *Category::ALL
            .choose(rng)
            .ok_or_else(|| SynthError::InvalidConfig("no product categories".into()))?;
        let price = draw_price(category, rng)?;
        let word: String = Word().fake_with_rng(rng);
        let initial_stock = draw_stock(product_type, rng);

        products.push(Product {
            product_id: i as u32 + 1,
            product_name: capitalize(&word),
            category,
            price,
            product_type,
            initial_stock,
        });
    }

    debug!(count = products.len(), "generated products");
    Ok(products)
}

/// Generates `n` customers with sequential ids starting at 1, each registered
/// on a day of `window`.
///
/// # Errors
///
/// Returns `SynthError::InvalidConfig` if `window` is empty.
pub fn generate_customers<R: Rng + ?Sized>(
    n: usize,
    window: &[NaiveDate],
    rng: &mut R,
) -> SynthResult<Vec<Customer>> {
    let mut customers = Vec::with_capacity(n);
    for i in 0..n {
        let customer_name: String = Name().fake_with_rng(rng);
        let email: String = SafeEmail().fake_with_rng(rng);
        let location: String = CityName().fake_with_rng(rng);
        let registration_date = *window
            .choose(rng)
            .ok_or_else(|| SynthError::InvalidConfig("empty date window".into()))?;

        customers.push(Customer {
            customer_id: i as u32 + 1,
            customer_name,
            email,
            location,
            registration_date,
        });
    }

    debug!(count = customers.len(), "generated customers");
    Ok(customers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded_rng;
    use chrono::Duration;

    fn count(pool: &[ProductType], kind: ProductType) -> usize {
        pool.iter().filter(|t| **t == kind).count()
    }

    #[test]
    fn test_pool_of_fifty_is_exact() {
        let pool = product_type_pool(50);
        assert_eq!(count(&pool, ProductType::Normal), 25);
        assert_eq!(count(&pool, ProductType::Bestseller), 15);
        assert_eq!(count(&pool, ProductType::Niche), 10);
    }

    #[test]
    fn test_generated_mix_survives_shuffle() {
        let mut rng = seeded_rng(Some(42));
        let products = generate_products(50, &mut rng).unwrap();
        let types: Vec<_> = products.iter().map(|p| p.product_type).collect();

        assert_eq!(count(&types, ProductType::Normal), 25);
        assert_eq!(count(&types, ProductType::Bestseller), 15);
        assert_eq!(count(&types, ProductType::Niche), 10);
    }

    #[test]
    fn test_small_pool_sizes() {
        let pool = product_type_pool(5);
        assert_eq!(pool.len(), 5);
        assert_eq!(count(&pool, ProductType::Bestseller), 1);
        assert_eq!(count(&pool, ProductType::Niche), 1);
        assert!(product_type_pool(0).is_empty());
    }

    #[test]
    fn test_products_respect_category_and_type_ranges() {
        let mut rng = seeded_rng(Some(9));
        let products = generate_products(200, &mut rng).unwrap();

        for (i, product) in products.iter().enumerate() {
            assert_eq!(product.product_id, i as u32 + 1);
            let (low, high) = product.category.price_range();
            let price: f64 = product.price.to_string().parse().unwrap();
            assert!(price >= low - 0.005 && price <= high + 0.005, "{product:?}");
            assert!(product.price.scale() <= 2);

            let (s_low, s_high) = product.product_type.stock_range();
            assert!((s_low..=s_high).contains(&product.initial_stock));
            assert!(!product.product_name.is_empty());
        }
    }

    #[test]
    fn test_customers_register_inside_window() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let window: Vec<_> = (0..10).map(|i| start + Duration::days(i)).collect();
        let mut rng = seeded_rng(Some(5));
        let customers = generate_customers(100, &window, &mut rng).unwrap();

        assert_eq!(customers.len(), 100);
        assert_eq!(customers[99].customer_id, 100);
        assert!(customers
            .iter()
            .all(|c| window.contains(&c.registration_date)));
        assert!(customers.iter().all(|c| c.email.contains('@')));
    }

    #[test]
    fn test_customers_need_a_window() {
        let mut rng = seeded_rng(Some(5));
        assert!(generate_customers(3, &[], &mut rng).is_err());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("velit"), "Velit");
        assert_eq!(capitalize(""), "");
    }
}
