use std::path::Path;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::config::GeneratorConfig;

/// Prefix for environment overrides, e.g. `RETAIL_SYNTH_NUM_DAYS=7` or
/// `RETAIL_SYNTH_FACTORS__PROMOTION_MULTIPLIER=1.5`.
pub const ENV_PREFIX: &str = "RETAIL_SYNTH_";

pub struct ConfigLoader;

/// Defaults with every keyed factor table the file declares emptied, so a
/// declared table replaces the built-in one instead of being merged into it.
fn defaults_under(file: &Figment) -> GeneratorConfig {
    let mut defaults = GeneratorConfig::default();
    let factors = &mut defaults.factors;
    if file.contains("factors.weekday") {
        factors.weekday.clear();
    }
    if file.contains("factors.category_multipliers") {
        factors.category_multipliers.clear();
    }
    if file.contains("factors.discount_rates") {
        factors.discount_rates.clear();
    }
    defaults
}

impl ConfigLoader {
    /// Loads generator configuration by merging defaults, a TOML file, and environment variables.
    ///
    /// A missing TOML file is not an error; the defaults apply. A keyed factor
    /// table (`[factors.weekday]`, `[factors.category_multipliers]`,
    /// `[factors.discount_rates]`) present in the file replaces the default
    /// table whole, so entries it leaves out are neutral.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment cannot be parsed, or if the
    /// merged configuration fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<GeneratorConfig> {
        let file = Figment::from(Toml::file(path.as_ref()));
        let config: GeneratorConfig = Figment::from(Serialized::defaults(defaults_under(&file)))
            .merge(file)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from defaults and environment variables only.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be parsed or validation fails.
    pub fn load_env() -> Result<GeneratorConfig> {
        let config: GeneratorConfig = Figment::from(Serialized::defaults(GeneratorConfig::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }
}
