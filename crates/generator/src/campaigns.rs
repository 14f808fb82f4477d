//! Resolves campaign templates into dated, product-targeted campaigns and
//! assembles the read-only factor tables.

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use retail_synth_core::{
    Campaign, CampaignConfig, FactorTables, GeneratorConfig, Product, SynthError, SynthResult,
};

fn shift(date: NaiveDate, days: i64) -> SynthResult<NaiveDate> {
    date.checked_add_signed(Duration::days(days)).ok_or_else(|| {
        SynthError::InvalidConfig(format!("campaign date {date} + {days} days is out of range"))
    })
}

/// Campaign `i` starts `i * spacing_days` after `start` and lasts
/// `duration_days` days inclusive. Each targets `product_count` distinct
/// products (fewer when the catalog is smaller).
///
/// A template with `duration_days = 0` has an empty window and is dropped.
///
/// # Errors
///
/// Returns `SynthError::InvalidConfig` if a window runs past the last
/// representable date.
pub fn build_campaigns<R: Rng + ?Sized>(
    templates: &[CampaignConfig],
    start: NaiveDate,
    spacing_days: u32,
    product_count: usize,
    product_ids: &[u32],
    rng: &mut R,
) -> SynthResult<Vec<Campaign>> {
    let mut campaigns = Vec::with_capacity(templates.len());
    for (i, template) in templates.iter().enumerate() {
        if template.duration_days == 0 {
            warn!(campaign = %template.name, "skipping campaign with zero duration");
            continue;
        }
        let offset = i64::from(spacing_days).saturating_mul(i as i64);
        let campaign_start = shift(start, offset)?;
        let end = shift(campaign_start, i64::from(template.duration_days) - 1)?;
        let product_ids = product_ids
            .choose_multiple(rng, product_count)
            .copied()
            .collect();

        let campaign = Campaign {
            name: template.name.clone(),
            start: campaign_start,
            end,
            product_ids,
        };
        debug!(
            campaign = %campaign.name,
            start = %campaign.start,
            end = %campaign.end,
            products = ?campaign.product_ids,
            "resolved campaign"
        );
        campaigns.push(campaign);
    }
    Ok(campaigns)
}

/// Builds the factor tables for one generation run.
///
/// # Errors
///
/// Returns `SynthError::InvalidConfig` if a campaign window is out of range.
pub fn build_factor_tables<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    start: NaiveDate,
    products: &[Product],
    rng: &mut R,
) -> SynthResult<FactorTables> {
    let ids: Vec<u32> = products.iter().map(|p| p.product_id).collect();
    let campaigns = build_campaigns(
        &config.factors.campaigns,
        start,
        config.campaign_spacing_days,
        config.campaign_product_count,
        &ids,
        rng,
    )?;
    Ok(FactorTables::new(
        &config.factors,
        config.campaign_boost,
        campaigns,
    ))
}
