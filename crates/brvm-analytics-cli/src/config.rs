use brvm_analytics_core::config::SanityBands;
use brvm_analytics_core::AnalyticsConfig;

use crate::input;

/// Build the analytics configuration from `--config` and `--strict-bands`.
///
/// `--strict-bands` replaces whatever bands the file set.
pub fn load(
    path: Option<&str>,
    strict_bands: bool,
) -> Result<AnalyticsConfig, Box<dyn std::error::Error>> {
    let mut config: AnalyticsConfig = match path {
        Some(path) => input::file::read_json_or_yaml(path)?,
        None => AnalyticsConfig::default(),
    };
    if strict_bands {
        config.valuation.bands = SanityBands::strict();
    }
    config.validate()?;
    tracing::debug!(?config, "analytics configuration loaded");
    Ok(config)
}
