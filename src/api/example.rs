use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tokio::sync::Mutex;

use crate::{
    api::BatteryApi,
    core::{charge_hour::ChargeHour, charge_plan::ChargePlan},
    prelude::*,
    quantity::{power::Watts, rate::KilowattHourRate},
};

/// Driver that keeps the plan in memory.
///
/// Until something gets scheduled, it reports a small demonstration plan.
pub struct Api {
    midnight: NaiveDate,
    plan: Mutex<Option<ChargePlan>>,
}

impl Default for Api {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

impl Api {
    pub fn new(midnight: NaiveDate) -> Self {
        Self { midnight, plan: Mutex::new(None) }
    }

    fn demo_plan(&self) -> ChargePlan {
        [(0, -1122.0, 1.15), (1, 1234.0, 3.05), (2, 3000.0, 2.0)]
            .into_iter()
            .filter_map(|(index, power, price)| {
                let price = KilowattHourRate::from(price);
                let hour = ChargeHour::new(index, self.midnight, price, price)?;
                Some(hour.with_power(Watts::from(power)))
            })
            .collect()
    }
}

#[async_trait]
impl BatteryApi for Api {
    #[instrument(skip_all, fields(n_hours = plan.len()))]
    async fn schedule(&self, plan: &ChargePlan) -> Result {
        info!(expected_yield = ?plan.expected_yield(), "scheduling…");
        *self.plan.lock().await = Some(plan.clone());
        Ok(())
    }

    async fn active_plan(&self) -> Result<ChargePlan> {
        Ok(self.plan.lock().await.clone().unwrap_or_else(|| self.demo_plan()))
    }

    async fn stop(&self) -> Result {
        if let Some(plan) = self.plan.lock().await.as_mut() {
            for hour in plan.hours_mut() {
                hour.power = Watts::ZERO;
            }
        }
        info!("stopped");
        Ok(())
    }

    async fn clear(&self) -> Result {
        *self.plan.lock().await = Some(ChargePlan::default());
        info!("cleared");
        Ok(())
    }
}
