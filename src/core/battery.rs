use bon::Builder;

use crate::{
    core::{charge_hour::ChargeHour, error::InvalidInput},
    quantity::{
        energy::WattHours,
        percent::Percent,
        power::Watts,
        rate::KilowattHourRate,
        time::Hours,
    },
};

/// Simulated battery used while planning.
///
/// Every charge and discharge is one hour long and clamped to the state-of-charge limits,
/// so the stored energy never leaves `lower_limit_energy()..=upper_limit_energy()`.
#[must_use]
#[derive(Clone, Debug, PartialEq, Builder)]
pub struct Battery {
    pub capacity: WattHours,
    pub max_charge_power: Watts,
    pub max_discharge_power: Watts,

    #[builder(default = Percent::HUNDRED)]
    pub upper_soc_limit: Percent,

    #[builder(default = Percent::ZERO)]
    pub lower_soc_limit: Percent,

    /// Currently stored energy.
    #[builder(default)]
    pub energy: WattHours,

    /// Energy-weighted average price paid for the stored energy.
    #[builder(default)]
    pub average_charge_cost: KilowattHourRate,
}

impl Battery {
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if self.capacity <= WattHours::ZERO {
            return Err(InvalidInput::NonPositiveCapacity(self.capacity));
        }
        if self.max_charge_power <= Watts::ZERO {
            return Err(InvalidInput::NonPositivePower {
                direction: "charge",
                power: self.max_charge_power,
            });
        }
        if self.max_discharge_power <= Watts::ZERO {
            return Err(InvalidInput::NonPositivePower {
                direction: "discharge",
                power: self.max_discharge_power,
            });
        }
        if !(Percent::ZERO <= self.lower_soc_limit
            && self.lower_soc_limit <= self.upper_soc_limit
            && self.upper_soc_limit <= Percent::HUNDRED)
        {
            return Err(InvalidInput::InvalidSocLimits {
                lower: self.lower_soc_limit,
                upper: self.upper_soc_limit,
            });
        }
        Ok(())
    }

    pub fn set_soc(&mut self, soc: Percent) {
        self.energy = self.capacity * soc;
    }

    pub fn soc(&self) -> Percent {
        Percent(100.0 * (self.energy / self.capacity))
    }

    pub fn upper_limit_energy(&self) -> WattHours {
        self.capacity * self.upper_soc_limit
    }

    pub fn lower_limit_energy(&self) -> WattHours {
        self.capacity * self.lower_soc_limit
    }

    /// Energy that can still be withdrawn before hitting the lower limit.
    pub fn available_energy(&self) -> WattHours {
        (self.energy - self.lower_limit_energy()).max(WattHours::ZERO)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.energy >= self.upper_limit_energy()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.energy <= self.lower_limit_energy()
    }

    /// Charge for one hour at the hour's import price and assign the resulting (negative) power.
    pub fn charge(&mut self, max_power: Watts, charge_hour: &mut ChargeHour) -> Watts {
        let headroom = (self.upper_limit_energy() - self.energy).max(WattHours::ZERO);
        let added = headroom.min(max_power * Hours::ONE);
        if added > WattHours::ZERO {
            let total = self.energy + added;
            self.average_charge_cost = (self.average_charge_cost * self.energy.into_inner()
                + charge_hour.import_price * added.into_inner())
                / total.into_inner();
            self.energy = total;
        }
        charge_hour.power = -(added / Hours::ONE);
        charge_hour.power
    }

    /// Discharge for one hour and assign the resulting (positive) power.
    pub fn discharge(&mut self, max_power: Watts, charge_hour: &mut ChargeHour) -> Watts {
        charge_hour.power = self.release(max_power);
        charge_hour.power
    }

    /// Withdraw up to one hour of `max_power` without assigning it to any hour.
    pub fn release(&mut self, max_power: Watts) -> Watts {
        let released = self.available_energy().min(max_power * Hours::ONE);
        self.energy -= released;
        released / Hours::ONE
    }

    pub fn charge_max_power_for_one_hour(&mut self, charge_hour: &mut ChargeHour) -> Watts {
        self.charge(self.max_charge_power, charge_hour)
    }

    pub fn discharge_max_power_for_one_hour(&mut self, charge_hour: &mut ChargeHour) -> Watts {
        self.discharge(self.max_discharge_power, charge_hour)
    }

    #[must_use]
    pub fn needed_hours_to_fill(&self) -> usize {
        Self::hours_to_move(
            self.upper_limit_energy() - self.lower_limit_energy(),
            self.max_charge_power,
        )
    }

    #[must_use]
    pub fn needed_hours_to_deplete(&self) -> usize {
        Self::hours_to_move(
            self.upper_limit_energy() - self.lower_limit_energy(),
            self.max_discharge_power,
        )
    }

    #[expect(clippy::cast_possible_truncation)]
    #[expect(clippy::cast_sign_loss)]
    fn hours_to_move(energy: WattHours, power: Watts) -> usize {
        (energy / power).into_inner().ceil() as usize
    }

    /// Same battery settings, but nothing stored and no charge history.
    pub fn empty_clone(&self, charged_up_to_lower_soc: bool) -> Self {
        let mut battery = self.clone();
        battery.energy =
            if charged_up_to_lower_soc { self.lower_limit_energy() } else { WattHours::ZERO };
        battery.average_charge_cost = KilowattHourRate::ZERO;
        battery
    }
}
