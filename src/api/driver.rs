use async_trait::async_trait;

use crate::{core::charge_plan::ChargePlan, prelude::*};

/// Something that can run a charge plan.
#[async_trait]
pub trait BatteryApi: Send + Sync {
    /// Push the plan to the battery.
    async fn schedule(&self, plan: &ChargePlan) -> Result;

    /// Read back the plan the battery is currently following.
    async fn active_plan(&self) -> Result<ChargePlan>;

    /// Keep the schedule but make the battery ignore it.
    async fn stop(&self) -> Result;

    /// Remove the whole schedule.
    async fn clear(&self) -> Result;
}

/// Supported battery drivers.
#[derive(Copy, Clone, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum Driver {
    /// In-memory driver that only logs what it is asked to do.
    Example,

    /// Fronius Gen24 inverter via the local SolarNet web API.
    FroniusSolarnet,
}
