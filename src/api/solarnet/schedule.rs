//! SolarNet time-of-use table.
//!
//! The table only knows times of day and weekdays, so an hourly plan is pushed as one pair of
//! entries per active hour, and only for the next 24 hours.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use chrono::{Datelike, NaiveDate, Timelike, Weekday};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay, serde_as};

use crate::{
    core::{charge_hour::ChargeHour, charge_plan::ChargePlan},
    prelude::*,
    quantity::{power::Watts, rate::KilowattHourRate},
};

/// Number of plan hours that fit into the table without clashing.
pub const HORIZON: usize = 24;

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TimeOfUse {
    #[serde(rename = "timeofuse")]
    pub entries: Vec<Entry>,
}

impl TimeOfUse {
    /// Put the plan's first hours into the table.
    ///
    /// Existing entries starting at one of the planned hours get replaced, the others are kept.
    pub fn with_plan(mut self, plan: &ChargePlan) -> Self {
        let hours = plan.iter().take(HORIZON).collect_vec();
        self.entries.retain(|entry| {
            !hours.iter().any(|hour| entry.covers(hour.start.weekday(), hour.start.hour()))
        });
        self.entries.extend(hours.into_iter().filter_map(Entry::pair_for).flatten());
        self
    }

    pub fn deactivated(mut self) -> Self {
        for entry in &mut self.entries {
            entry.is_active = false;
        }
        self
    }

    /// Convert the active entries back into a plan indexed from `today`'s midnight.
    ///
    /// Each weekday resolves to its next occurrence, today included.
    /// Prices are unknown and left zero.
    pub fn to_plan(&self, today: NaiveDate) -> ChargePlan {
        let mut plan = ChargePlan::default();
        for entry in self.entries.iter().filter(|entry| entry.is_active) {
            for weekday in entry.weekdays.iter() {
                let days_ahead = (7 + weekday.num_days_from_monday()
                    - today.weekday().num_days_from_monday())
                    % 7;
                let index = (days_ahead * 24 + entry.time_table.start.hour) as usize;
                // Minimum and maximum entries of the same hour collapse into one:
                if plan.get_by_index(index).is_some() {
                    continue;
                }
                let price = KilowattHourRate::ZERO;
                if let Some(hour) = ChargeHour::new(index, today, price, price) {
                    plan.add_charge_hour(hour.with_power(entry.signed_power()));
                } else {
                    warn!(index, %today, "the hour is out of the calendar range, skipping");
                }
            }
        }
        plan
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "Active")]
    pub is_active: bool,

    /// Absolute power in watts, the direction comes from the schedule type.
    #[serde(rename = "Power")]
    pub power: u32,

    #[serde(rename = "ScheduleType")]
    pub schedule_type: ScheduleType,

    #[serde(rename = "TimeTable")]
    pub time_table: TimeTable,

    #[serde(rename = "Weekdays")]
    pub weekdays: Weekdays,
}

impl Entry {
    /// Minimum and maximum entries pinning the battery to the hour's power, `None` for idle hours.
    #[must_use]
    pub fn pair_for(hour: &ChargeHour) -> Option<[Self; 2]> {
        let (minimum, maximum) = if hour.is_charging() {
            (ScheduleType::ChargeMin, ScheduleType::ChargeMax)
        } else if hour.is_discharging() {
            (ScheduleType::DischargeMin, ScheduleType::DischargeMax)
        } else {
            return None;
        };
        let time_table = TimeTable::of_hour(hour.start.hour());
        let weekdays = Weekdays::only(hour.start.weekday());
        let power = absolute_watts(hour.power);
        let entry =
            |schedule_type| Self { is_active: true, power, schedule_type, time_table, weekdays };
        Some([entry(minimum), entry(maximum)])
    }

    pub fn signed_power(&self) -> Watts {
        let power = Watts::from(f64::from(self.power));
        if self.schedule_type.is_charging() { -power } else { power }
    }

    fn covers(&self, weekday: Weekday, hour: u32) -> bool {
        self.weekdays.contains(weekday) && self.time_table.start.hour == hour
    }
}

#[expect(clippy::cast_possible_truncation)]
#[expect(clippy::cast_sign_loss)]
fn absolute_watts(power: Watts) -> u32 {
    power.abs().round().into_inner() as u32
}

/// Entry kind, serialized with the same name it displays with.
#[derive(Copy, Clone, Debug, Eq, PartialEq, SerializeDisplay, DeserializeFromStr)]
pub enum ScheduleType {
    ChargeMin,
    ChargeMax,
    DischargeMin,
    DischargeMax,
}

impl ScheduleType {
    pub const ALL: [Self; 4] =
        [Self::ChargeMin, Self::ChargeMax, Self::DischargeMin, Self::DischargeMax];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ChargeMin => "CHARGE_MIN",
            Self::ChargeMax => "CHARGE_MAX",
            Self::DischargeMin => "DISCHARGE_MIN",
            Self::DischargeMax => "DISCHARGE_MAX",
        }
    }

    #[must_use]
    pub const fn is_charging(self) -> bool {
        matches!(self, Self::ChargeMin | Self::ChargeMax)
    }
}

impl Display for ScheduleType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|schedule_type| schedule_type.as_str() == s)
            .with_context(|| format!("unknown schedule type `{s}`"))
    }
}

#[serde_as]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TimeTable {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    #[serde(rename = "Start")]
    pub start: ClockTime,

    #[serde_as(as = "serde_with::DisplayFromStr")]
    #[serde(rename = "End")]
    pub end: ClockTime,
}

impl TimeTable {
    /// The whole hour. The last hour of a day ends at 23:59, the table cannot wrap past midnight.
    #[must_use]
    pub const fn of_hour(hour: u32) -> Self {
        let end = if hour >= 23 {
            ClockTime { hour: 23, minute: 59 }
        } else {
            ClockTime { hour: hour + 1, minute: 0 }
        };
        Self { start: ClockTime { hour, minute: 0 }, end }
    }
}

/// Time of day as the API spells it: `HH:MM`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl Display for ClockTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (hour, minute) = s.split_once(':').with_context(|| format!("`{s}` is not `HH:MM`"))?;
        let hour = hour.parse::<u32>().with_context(|| format!("invalid hour in `{s}`"))?;
        let minute = minute.parse::<u32>().with_context(|| format!("invalid minute in `{s}`"))?;
        ensure!(hour < 24 && minute < 60, "`{s}` is out of range");
        Ok(Self { hour, minute })
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Weekdays {
    #[serde(rename = "Mon")]
    pub monday: bool,

    #[serde(rename = "Tue")]
    pub tuesday: bool,

    #[serde(rename = "Wed")]
    pub wednesday: bool,

    #[serde(rename = "Thu")]
    pub thursday: bool,

    #[serde(rename = "Fri")]
    pub friday: bool,

    #[serde(rename = "Sat")]
    pub saturday: bool,

    #[serde(rename = "Sun")]
    pub sunday: bool,
}

impl Weekdays {
    const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn only(weekday: Weekday) -> Self {
        let mut weekdays = Self::default();
        *weekdays.flag_mut(weekday) = true;
        weekdays
    }

    #[must_use]
    pub const fn contains(&self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        Self::ALL.into_iter().filter(|weekday| self.contains(*weekday))
    }

    const fn flag_mut(&mut self, weekday: Weekday) -> &mut bool {
        match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }
}

impl Display for Weekdays {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.iter().join(","))
    }
}
