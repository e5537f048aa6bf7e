//! Fronius SolarNet battery driver.

pub mod digest;
pub mod schedule;

use async_trait::async_trait;
use chrono::Local;
use reqwest::Url;

use self::schedule::TimeOfUse;
use crate::{
    api::BatteryApi,
    core::charge_plan::ChargePlan,
    prelude::*,
    tables::build_time_of_use_table,
};

pub struct Api {
    client: digest::Client,
    username: String,
}

impl Api {
    const TIME_OF_USE_URI: &'static str = "/config/timeofuse";

    pub fn new(base_url: Url, username: String, password: String) -> Result<Self> {
        Ok(Self { client: digest::Client::new(base_url, username.clone(), password)?, username })
    }

    async fn login(&self) -> Result {
        self.client
            .get(&format!("/commands/Login?user={}", self.username))
            .await
            .with_context(|| format!("failed to log in as `{}`", self.username))?;
        Ok(())
    }

    #[instrument(skip_all)]
    pub async fn get_time_of_use(&self) -> Result<TimeOfUse> {
        let time_of_use: TimeOfUse = self
            .client
            .get(Self::TIME_OF_USE_URI)
            .await?
            .json()
            .await
            .context("failed to deserialize the time-of-use table")?;
        debug!(n_entries = time_of_use.entries.len(), "fetched");
        Ok(time_of_use)
    }

    #[instrument(skip_all, fields(n_entries = time_of_use.entries.len()))]
    pub async fn set_time_of_use(&self, time_of_use: &TimeOfUse) -> Result {
        self.client
            .post_json(Self::TIME_OF_USE_URI, time_of_use)
            .await
            .context("failed to update the time-of-use table")?;
        info!("updated");
        Ok(())
    }
}

#[async_trait]
impl BatteryApi for Api {
    #[instrument(skip_all, fields(n_hours = plan.len()))]
    async fn schedule(&self, plan: &ChargePlan) -> Result {
        self.login().await?;
        let time_of_use = self.get_time_of_use().await?.with_plan(plan);
        println!("{}", build_time_of_use_table(&time_of_use.entries));
        self.set_time_of_use(&time_of_use).await
    }

    async fn active_plan(&self) -> Result<ChargePlan> {
        self.login().await?;
        Ok(self.get_time_of_use().await?.to_plan(Local::now().date_naive()))
    }

    async fn stop(&self) -> Result {
        self.login().await?;
        let time_of_use = self.get_time_of_use().await?.deactivated();
        self.set_time_of_use(&time_of_use).await
    }

    async fn clear(&self) -> Result {
        self.login().await?;
        self.set_time_of_use(&TimeOfUse::default()).await
    }
}
