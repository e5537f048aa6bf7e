use std::{fs, path::Path};

use serde::Deserialize;

use crate::{prelude::*, quantity::rate::KilowattHourRate};

/// Hourly price forecast, the first prices are for `start_hour` after midnight.
#[derive(Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub start_hour: usize,

    pub import: Vec<KilowattHourRate>,
    pub export: Vec<KilowattHourRate>,
}

impl Forecast {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        text.parse()
    }
}

impl std::str::FromStr for Forecast {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let forecast: Self = toml::from_str(text).context("failed to parse the forecast")?;
        ensure!(
            forecast.import.len() == forecast.export.len(),
            "the forecast has {} import prices but {} export prices",
            forecast.import.len(),
            forecast.export.len(),
        );
        Ok(forecast)
    }
}
