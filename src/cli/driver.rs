use clap::Parser;
use reqwest::Url;

use crate::{
    api::{BatteryApi, Driver, example, solarnet},
    prelude::*,
};

#[derive(Parser)]
pub struct DriverArgs {
    #[clap(long = "driver", default_value = "example", env = "BATTERY_DRIVER")]
    pub driver: Driver,

    #[clap(flatten)]
    pub solarnet: SolarnetArgs,
}

impl DriverArgs {
    pub fn connect(&self) -> Result<Box<dyn BatteryApi>> {
        info!(driver = ?self.driver, "connecting…");
        match self.driver {
            Driver::Example => Ok(Box::new(example::Api::default())),
            Driver::FroniusSolarnet => {
                let url = self.solarnet.url.clone().context("SolarNet URL is not set")?;
                let password =
                    self.solarnet.password.clone().context("SolarNet password is not set")?;
                Ok(Box::new(solarnet::Api::new(url, self.solarnet.username.clone(), password)?))
            }
        }
    }
}

#[derive(Parser)]
pub struct SolarnetArgs {
    /// Inverter web interface URL, for example `http://192.168.1.20`.
    #[clap(long = "solarnet-url", env = "SOLARNET_URL")]
    pub url: Option<Url>,

    #[clap(long = "solarnet-username", default_value = "customer", env = "SOLARNET_USERNAME")]
    pub username: String,

    #[clap(long = "solarnet-password", env = "SOLARNET_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}
