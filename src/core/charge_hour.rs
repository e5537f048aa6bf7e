use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::quantity::{cost::Cost, power::Watts, rate::KilowattHourRate, time::Hours};

/// One planned hour.
///
/// The power is signed: negative means charging from the grid, positive means discharging to it.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChargeHour {
    /// Hours since the reference midnight.
    pub index: usize,

    pub start: NaiveDateTime,
    pub import_price: KilowattHourRate,
    pub export_price: KilowattHourRate,
    pub power: Watts,
}

impl ChargeHour {
    /// Idle hour starting `index` hours after the midnight.
    ///
    /// Returns [`None`] when the start time does not fit into the calendar.
    pub fn new(
        index: usize,
        midnight: NaiveDate,
        import_price: KilowattHourRate,
        export_price: KilowattHourRate,
    ) -> Option<Self> {
        let offset = TimeDelta::try_hours(i64::try_from(index).ok()?)?;
        let start = midnight.and_time(NaiveTime::MIN).checked_add_signed(offset)?;
        Some(Self { index, start, import_price, export_price, power: Watts::ZERO })
    }

    pub const fn with_power(mut self, power: Watts) -> Self {
        self.power = power;
        self
    }

    /// Price at which the energy of this hour is traded.
    pub fn active_price(&self) -> KilowattHourRate {
        if self.power > Watts::ZERO { self.export_price } else { self.import_price }
    }

    #[must_use]
    pub fn is_charging(&self) -> bool {
        self.power < Watts::ZERO
    }

    #[must_use]
    pub fn is_discharging(&self) -> bool {
        self.power > Watts::ZERO
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.power != Watts::ZERO
    }

    /// Money earned (positive) or spent (negative) during this hour.
    pub fn expected_yield(&self) -> Cost {
        self.power * Hours::ONE * self.active_price()
    }
}
