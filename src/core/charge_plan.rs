use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

use crate::{
    core::charge_hour::ChargeHour,
    prelude::*,
    quantity::{
        cost::Cost,
        energy::WattHours,
        power::Watts,
        rate::KilowattHourRate,
        time::Hours,
    },
};

/// Planned hours, ordered and unique by index.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChargePlan(Vec<ChargeHour>);

impl FromIterator<ChargeHour> for ChargePlan {
    fn from_iter<T: IntoIterator<Item = ChargeHour>>(iter: T) -> Self {
        let mut plan = Self::default();
        for hour in iter {
            plan.add_charge_hour(hour);
        }
        plan
    }
}

impl ChargePlan {
    /// Insert the hour keeping the index order, replacing an hour with the same index.
    pub fn add_charge_hour(&mut self, hour: ChargeHour) {
        match self.0.binary_search_by_key(&hour.index, |existing| existing.index) {
            Ok(position) => self.0[position] = hour,
            Err(position) => self.0.insert(position, hour),
        }
    }

    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&ChargeHour> {
        self.position_of(index).map(|position| &self.0[position])
    }

    /// Find the hour containing the timestamp.
    #[must_use]
    pub fn get_by_time(&self, time: NaiveDateTime) -> Option<&ChargeHour> {
        self.0
            .iter()
            .find(|hour| hour.start.date() == time.date() && hour.start.hour() == time.hour())
    }

    #[must_use]
    pub fn is_scheduled(&self, time: NaiveDateTime) -> bool {
        self.get_by_time(time).is_some()
    }

    /// Set the power of the hour with the index, returns `false` if there is no such hour.
    pub fn set_power(&mut self, index: usize, power: Watts) -> bool {
        if let Some(position) = self.position_of(index) {
            self.0[position].power = power;
            true
        } else {
            false
        }
    }

    pub fn get_power(&self, time: NaiveDateTime) -> Watts {
        self.get_by_time(time).map_or_else(
            || {
                warn!(%time, "the hour is not scheduled, assuming no power");
                Watts::ZERO
            },
            |hour| hour.power,
        )
    }

    /// Sum of the hourly yields, rounded to cents.
    pub fn expected_yield(&self) -> Cost {
        self.0.iter().map(ChargeHour::expected_yield).sum::<Cost>().round_to_cents()
    }

    /// Energy-weighted average import price over the charging hours.
    pub fn average_charging_price(&self) -> KilowattHourRate {
        let (energy, cost) = self
            .0
            .iter()
            .filter(|hour| hour.is_charging())
            .map(|hour| {
                let energy = hour.power.abs() * Hours::ONE;
                (energy, energy * hour.import_price)
            })
            .fold((WattHours::ZERO, Cost::ZERO), |(total_energy, total_cost), (energy, cost)| {
                (total_energy + energy, total_cost + cost)
            });
        if energy > WattHours::ZERO { cost / energy } else { KilowattHourRate::ZERO }
    }

    #[must_use]
    pub fn is_empty_plan(&self) -> bool {
        self.0.iter().all(|hour| !hour.is_active())
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChargeHour> {
        self.0.iter()
    }

    #[must_use]
    pub fn hours(&self) -> &[ChargeHour] {
        &self.0
    }

    pub fn hours_mut(&mut self) -> &mut [ChargeHour] {
        &mut self.0
    }

    /// Position of the first hour with a non-zero power.
    #[must_use]
    pub fn first_active_position(&self) -> Option<usize> {
        self.0.iter().position(ChargeHour::is_active)
    }

    #[must_use]
    pub fn first_active_hour(&self) -> Option<&ChargeHour> {
        self.first_active_position().map(|position| &self.0[position])
    }

    fn position_of(&self, index: usize) -> Option<usize> {
        self.0.binary_search_by_key(&index, |hour| hour.index).ok()
    }

    /// Render the plan for downstream consumers.
    pub fn to_json(&self) -> Result<String> {
        let records: Vec<_> = self.0.iter().map(HourRecord::from).collect();
        serde_json::to_string(&records).context("failed to serialize the charge plan")
    }
}

impl<'a> IntoIterator for &'a ChargePlan {
    type Item = &'a ChargeHour;
    type IntoIter = std::slice::Iter<'a, ChargeHour>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Serialize)]
struct HourRecord {
    index: usize,

    #[serde(with = "iso_hour")]
    hour: NaiveDateTime,

    import_price: KilowattHourRate,
    export_price: KilowattHourRate,
    power: i64,
}

impl From<&ChargeHour> for HourRecord {
    #[expect(clippy::cast_possible_truncation)]
    fn from(hour: &ChargeHour) -> Self {
        Self {
            index: hour.index,
            hour: hour.start,
            import_price: hour.import_price,
            export_price: hour.export_price,
            power: hour.power.round().into_inner() as i64,
        }
    }
}

mod iso_hour {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(
        hour: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&hour.format("%Y-%m-%dT%H:%M:%S"))
    }
}
