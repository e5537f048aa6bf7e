use std::cmp::Reverse;

use bon::Builder;
use chrono::{Local, NaiveDate};
use itertools::Itertools;

use crate::{
    core::{
        battery::Battery,
        charge_hour::ChargeHour,
        charge_plan::ChargePlan,
        error::InvalidInput,
    },
    prelude::*,
    quantity::{power::Watts, rate::KilowattHourRate, time::Hours},
};

/// Order in which a pass walks through time.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Direction {
    Forward,
    Reversed,
}

impl Direction {
    /// Whether the `earlier` position is visited before the `later` one.
    const fn precedes(self, earlier: usize, later: usize) -> bool {
        match self {
            Self::Forward => earlier < later,
            Self::Reversed => earlier > later,
        }
    }
}

/// Price-arbitrage planner: charge at the cheapest hours, discharge at the most expensive ones.
///
/// This is a greedy heuristic with local gap filling, it does not search for a global optimum.
#[must_use]
#[derive(Builder)]
pub struct Planner {
    /// Wear cost of cycling one kilowatt-hour through the battery.
    #[builder(default)]
    battery_cycle_cost: KilowattHourRate,

    /// Minimal required earnings per kilowatt-hour.
    #[builder(default)]
    price_margin: KilowattHourRate,

    /// Charge at import prices below this when there is nothing better to do.
    #[builder(default)]
    low_price_threshold: KilowattHourRate,

    /// Date of the hour index zero.
    #[builder(default = Local::now().date_naive())]
    midnight: NaiveDate,
}

impl Planner {
    /// Plan one power value per price.
    ///
    /// The hours are indexed from `start_hour`. The caller's battery is not modified.
    #[instrument(skip_all, fields(n_hours = import_prices.len(), start_hour = start_hour))]
    pub fn create_price_arbitrage_plan(
        &self,
        battery: &Battery,
        import_prices: &[KilowattHourRate],
        export_prices: &[KilowattHourRate],
        start_hour: usize,
    ) -> Result<ChargePlan, InvalidInput> {
        if import_prices.len() != export_prices.len() {
            return Err(InvalidInput::MismatchedPriceLengths {
                import: import_prices.len(),
                export: export_prices.len(),
            });
        }
        battery.validate()?;
        let blank_plan = import_prices
            .iter()
            .zip(export_prices)
            .enumerate()
            .map(|(offset, (import_price, export_price))| {
                start_hour
                    .checked_add(offset)
                    .and_then(|index| {
                        ChargeHour::new(index, self.midnight, *import_price, *export_price)
                    })
                    .ok_or(InvalidInput::StartHourOutOfRange(start_hour))
            })
            .collect::<Result<ChargePlan, _>>()?;
        debug!(
            energy = ?battery.energy,
            average_charge_cost = ?battery.average_charge_cost,
            "planning…",
        );

        let mut initial_battery = battery.clone();
        let mut working_battery = battery.clone();
        let is_already_charged = !battery.is_empty();
        if is_already_charged {
            working_battery.set_soc(working_battery.lower_soc_limit);
        }

        let mut plan = self.create_new_plan(working_battery, blank_plan);
        if is_already_charged {
            Self::discharge_at_beginning_or_remove_planned_charging(
                &mut initial_battery,
                &mut plan,
            );
        }
        Self::trim_to_soc_limits(battery.clone(), &mut plan);
        if plan.is_empty_plan() {
            self.charge_if_price_is_below_threshold(&mut initial_battery, &mut plan);
        }

        info!(expected_yield = ?plan.expected_yield(), is_empty = plan.is_empty_plan(), "planned");
        Ok(plan)
    }

    fn create_new_plan(&self, mut battery: Battery, mut plan: ChargePlan) -> ChargePlan {
        let initial_battery = battery.clone();

        let mut expected_yield = plan.expected_yield();
        self.charge_low_and_discharge_high(plan.hours_mut(), &mut battery, Direction::Forward);

        // Every pass may only assign idle hours, so this converges:
        while expected_yield != plan.expected_yield() {
            expected_yield = plan.expected_yield();
            debug!(?expected_yield, "filling gaps…");
            self.find_and_fill_gaps(plan.hours_mut(), initial_battery.clone());
        }

        plan
    }

    /// Run one greedy pass over the hours.
    fn charge_low_and_discharge_high(
        &self,
        hours: &mut [ChargeHour],
        battery: &mut Battery,
        direction: Direction,
    ) {
        let lowest_import_first =
            (0..hours.len()).sorted_by_key(|&position| hours[position].import_price).collect_vec();
        let highest_export_first = (0..hours.len())
            .sorted_by_key(|&position| Reverse(hours[position].export_price))
            .collect_vec();

        let initial_average_charge_cost = battery.average_charge_cost;
        let last_charged = self.charge_battery_full_at_lowest_price(
            hours,
            &lowest_import_first,
            &highest_export_first,
            battery,
            direction,
        );
        Self::discharge_at_highest_priced_hours(
            hours,
            &highest_export_first,
            last_charged,
            battery,
            initial_average_charge_cost,
            direction,
        );
    }

    /// Returns the position of the hour that was charged last.
    fn charge_battery_full_at_lowest_price(
        &self,
        hours: &mut [ChargeHour],
        lowest_import_first: &[usize],
        highest_export_first: &[usize],
        battery: &mut Battery,
        direction: Direction,
    ) -> Option<usize> {
        let mut last_charged = None;
        for &discharge_position in highest_export_first {
            let discharge_price = hours[discharge_position].export_price;
            for &charge_position in lowest_import_first {
                if direction.precedes(charge_position, discharge_position)
                    && self.charge_cost(&hours[charge_position]) < discharge_price
                    && discharge_price > battery.average_charge_cost
                    && !battery.is_full()
                    && !hours[charge_position].is_active()
                {
                    battery.charge_max_power_for_one_hour(&mut hours[charge_position]);
                    last_charged = Some(charge_position);
                }
            }
        }
        last_charged
    }

    fn charge_cost(&self, charge_hour: &ChargeHour) -> KilowattHourRate {
        charge_hour.import_price + self.battery_cycle_cost + self.price_margin
    }

    fn discharge_at_highest_priced_hours(
        hours: &mut [ChargeHour],
        highest_export_first: &[usize],
        last_charged: Option<usize>,
        battery: &mut Battery,
        initial_average_charge_cost: KilowattHourRate,
        direction: Direction,
    ) {
        let average_charge_cost = match direction {
            Direction::Forward => battery.average_charge_cost,
            Direction::Reversed => initial_average_charge_cost,
        };
        for &position in highest_export_first {
            let comes_after_last_charge = last_charged.map_or(
                direction == Direction::Forward,
                |last_charged| direction.precedes(last_charged, position),
            );
            if !battery.is_empty()
                && hours[position].export_price > average_charge_cost
                && comes_after_last_charge
                && !hours[position].is_active()
            {
                battery.discharge_max_power_for_one_hour(&mut hours[position]);
            }
        }
    }

    /// Re-run the greedy pass on the idle stretches around the planned cycles.
    ///
    /// The hours must be ordered by time.
    fn find_and_fill_gaps(&self, hours: &mut [ChargeHour], mut battery: Battery) {
        let n_hours = hours.len();
        let first_charge = hours.iter().position(ChargeHour::is_charging);
        let last_charge = hours.iter().rposition(ChargeHour::is_charging);
        let first_discharge = hours.iter().position(ChargeHour::is_discharging).unwrap_or(n_hours);
        let last_discharge = hours.iter().rposition(ChargeHour::is_discharging).unwrap_or(n_hours);

        if let Some(first_charge) =
            first_charge.filter(|&first_charge| 0 < first_charge && first_charge < first_discharge)
        {
            // Before the first charge:
            self.charge_low_and_discharge_high(
                &mut hours[..first_charge],
                &mut battery,
                Direction::Forward,
            );
        } else if first_discharge < n_hours {
            // Before the first discharge, when the battery got charged right from the start:
            let mut empty_battery = battery.empty_clone(true);
            empty_battery.average_charge_cost = battery.average_charge_cost;
            self.charge_low_and_discharge_high(
                &mut hours[..first_discharge],
                &mut empty_battery,
                Direction::Reversed,
            );
        }

        if let Some(last_charge) = last_charge
            .filter(|&last_charge| last_charge < first_discharge && first_discharge < n_hours)
        {
            // Between the charge and the discharge:
            self.charge_low_and_discharge_high(
                &mut hours[last_charge + 1..first_discharge],
                &mut battery.empty_clone(true),
                Direction::Reversed,
            );
        }

        if last_charge.is_none_or(|last_charge| last_charge < last_discharge)
            && last_discharge < n_hours
        {
            // After the last discharge:
            self.charge_low_and_discharge_high(
                &mut hours[last_discharge + 1..],
                &mut battery.empty_clone(true),
                Direction::Forward,
            );
        }
    }

    /// Account for the energy that was already stored before planning.
    ///
    /// Discharge it before the first planned charge, and then skip as much of the planned
    /// charging as the remaining energy covers.
    fn discharge_at_beginning_or_remove_planned_charging(
        initial_battery: &mut Battery,
        plan: &mut ChargePlan,
    ) {
        let Some(first_active) = plan.first_active_position() else {
            return;
        };
        let hours = plan.hours_mut();
        if !hours[first_active].is_charging() {
            return;
        }

        let highest_export_first = (0..first_active)
            .sorted_by_key(|&position| Reverse(hours[position].export_price))
            .collect_vec();
        let average_charge_cost = initial_battery.average_charge_cost;
        Self::discharge_at_highest_priced_hours(
            hours,
            &highest_export_first,
            None,
            initial_battery,
            average_charge_cost,
            Direction::Forward,
        );

        for hour in &mut hours[first_active..] {
            if initial_battery.is_empty() || hour.is_discharging() {
                break;
            }
            let available_power = initial_battery.available_energy() / Hours::ONE;
            let power = (hour.power + available_power).min(Watts::ZERO);
            initial_battery.release(hour.power.abs().min(available_power));
            hour.power = power;
        }
    }

    /// Replay the plan on the caller's battery and shrink the hours that would cross
    /// the state-of-charge limits.
    ///
    /// Gap passes run on separate battery clones, so the combined plan may ask for more
    /// than the battery can hold or give.
    fn trim_to_soc_limits(mut battery: Battery, plan: &mut ChargePlan) {
        let mut n_trimmed = 0_usize;
        for hour in plan.hours_mut() {
            let planned_power = hour.power;
            if hour.is_charging() {
                battery.charge(planned_power.abs(), hour);
            } else if hour.is_discharging() {
                battery.discharge(planned_power, hour);
            }
            if hour.power != planned_power {
                n_trimmed += 1;
            }
        }
        if n_trimmed != 0 {
            debug!(n_trimmed, "trimmed the hours exceeding the state-of-charge limits");
        }
    }

    fn charge_if_price_is_below_threshold(&self, battery: &mut Battery, plan: &mut ChargePlan) {
        let hours = plan.hours_mut();
        let lowest_import_first =
            (0..hours.len()).sorted_by_key(|&position| hours[position].import_price).collect_vec();
        for position in lowest_import_first {
            if hours[position].import_price < self.low_price_threshold && !battery.is_full() {
                battery.charge_max_power_for_one_hour(&mut hours[position]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::quantity::{cost::Cost, energy::WattHours, percent::Percent};

    fn rates(values: &[f64]) -> Vec<KilowattHourRate> {
        values.iter().copied().map(KilowattHourRate::from).collect()
    }

    fn battery(capacity: f64, power: f64) -> Battery {
        Battery::builder()
            .capacity(WattHours::from(capacity))
            .max_charge_power(Watts::from(power))
            .max_discharge_power(Watts::from(power))
            .build()
    }

    fn planner() -> Planner {
        Planner::builder().midnight(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()).build()
    }

    fn powers(plan: &ChargePlan) -> Vec<f64> {
        plan.iter().map(|hour| hour.power.into_inner()).collect()
    }

    fn plan(battery: &Battery, import_prices: &[f64], export_prices: &[f64]) -> Result<ChargePlan> {
        Ok(planner().create_price_arbitrage_plan(
            battery,
            &rates(import_prices),
            &rates(export_prices),
            0,
        )?)
    }

    #[test]
    fn test_one_cycle() -> Result {
        let plan = plan(&battery(1000.0, 1000.0), &[3.0, 2.0, 4.0, 4.0], &[1.0, 1.0, 3.0, 1.0])?;
        assert_eq!(powers(&plan), [0.0, -1000.0, 1000.0, 0.0]);
        assert_eq!(plan.expected_yield(), Cost::from(1.0));
        Ok(())
    }

    #[test]
    fn test_consecutive_charge() -> Result {
        let plan = plan(
            &battery(2000.0, 1000.0),
            &[3.0, 2.0, 1.0, 3.0, 5.0, 6.0, 2.0],
            &[1.0, 1.0, 3.0, 2.0, 4.0, 5.0, 1.0],
        )?;
        assert_eq!(powers(&plan), [0.0, -1000.0, -1000.0, 0.0, 1000.0, 1000.0, 0.0]);
        assert_eq!(plan.expected_yield(), Cost::from(6.0));
        Ok(())
    }

    #[test]
    fn test_two_cycles() -> Result {
        let plan =
            plan(&battery(1000.0, 1000.0), &[3.0, 2.0, 4.0, 1.0, 5.0], &[1.0, 1.0, 3.0, 2.0, 4.0])?;
        assert_eq!(powers(&plan), [0.0, -1000.0, 1000.0, -1000.0, 1000.0]);
        assert_eq!(plan.expected_yield(), Cost::from(4.0));
        Ok(())
    }

    #[test]
    fn test_three_cycles() -> Result {
        let plan = plan(
            &battery(1000.0, 1000.0),
            &[97.58, 165.69, 186.5, 183.57, 80.1, 71.98, 97.79, 166.61, 93.67, 94.09, 205.3],
            &[39.1, 93.59, 110.24, 107.9, 25.12, 18.62, 39.27, 94.33, 35.98, 36.31, 125.28],
        )?;
        assert_eq!(
            powers(&plan),
            [-1000.0, 0.0, 1000.0, 0.0, 0.0, -1000.0, 0.0, 1000.0, -1000.0, 0.0, 1000.0],
        );
        assert_abs_diff_eq!(plan.expected_yield().into_inner(), 66.62, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_already_charged_skips_charging() -> Result {
        let mut battery = battery(1000.0, 1000.0);
        battery.energy = WattHours::from(1000.0);
        battery.average_charge_cost = KilowattHourRate::from(1.0);

        let plan = plan(&battery, &[3.0, 2.0, 4.0, 4.0], &[1.0, 1.0, 3.0, 1.0])?;
        assert_eq!(powers(&plan), [0.0, 0.0, 1000.0, 0.0]);

        // Stored energy was paid for in advance:
        let stored_cost = battery.energy * battery.average_charge_cost;
        assert_abs_diff_eq!((plan.expected_yield() - stored_cost).into_inner(), 2.0);
        Ok(())
    }

    #[test]
    fn test_already_charged_discharges_first() -> Result {
        let mut battery = battery(1000.0, 1000.0);
        battery.energy = WattHours::from(1000.0);
        battery.average_charge_cost = KilowattHourRate::from(1.0);

        let plan = plan(&battery, &[5.0, 2.0, 4.0, 4.0], &[4.0, 1.0, 3.0, 1.0])?;
        assert_eq!(powers(&plan), [1000.0, -1000.0, 1000.0, 0.0]);
        let stored_cost = battery.energy * battery.average_charge_cost;
        assert_abs_diff_eq!((plan.expected_yield() - stored_cost).into_inner(), 4.0);
        Ok(())
    }

    #[test]
    fn test_already_charged_expensively() -> Result {
        let mut battery = battery(1000.0, 1000.0);
        battery.energy = WattHours::from(1000.0);
        battery.average_charge_cost = KilowattHourRate::from(4.0);

        let plan = plan(&battery, &[5.0, 2.0, 6.0, 4.0], &[4.0, 1.0, 5.0, 1.0])?;
        assert_eq!(powers(&plan), [0.0, 0.0, 1000.0, 0.0]);
        let stored_cost = battery.energy * battery.average_charge_cost;
        assert_abs_diff_eq!((plan.expected_yield() - stored_cost).into_inner(), 1.0);
        Ok(())
    }

    #[test]
    fn test_caller_battery_is_untouched() -> Result {
        let mut battery = battery(1000.0, 1000.0);
        battery.energy = WattHours::from(1000.0);
        battery.average_charge_cost = KilowattHourRate::from(1.0);
        let snapshot = battery.clone();

        let _ = plan(&battery, &[5.0, 2.0, 4.0, 4.0], &[4.0, 1.0, 3.0, 1.0])?;
        assert_eq!(battery, snapshot);
        Ok(())
    }

    fn charged_battery(capacity: f64, power: f64, energy: f64, charge_cost: f64) -> Battery {
        let mut battery = battery(capacity, power);
        battery.energy = WattHours::from(energy);
        battery.average_charge_cost = KilowattHourRate::from(charge_cost);
        battery
    }

    #[test]
    fn test_overlapping_gaps_are_trimmed_to_soc_limits() -> Result {
        // Separately filled gaps would charge the battery up to 2200 Wh here:
        let battery = battery(1500.0, 700.0);
        let plan = plan(
            &battery,
            &[3.9, 6.5, 8.1, 2.0, 1.9, 5.4, 3.0, 7.8, 4.9],
            &[2.88, 5.94, 6.52, 1.8, -0.04, 3.7, 1.2, 7.36, 3.34],
        )?;
        assert_eq!(powers(&plan), [-700.0, -700.0, 700.0, -700.0, -100.0, 0.0, 0.0, 700.0, 700.0]);
        assert_abs_diff_eq!(plan.expected_yield().into_inner(), 3.18, epsilon = 1e-9);

        let mut energy = battery.energy;
        for hour in &plan {
            energy -= hour.power * Hours::ONE;
            assert!(energy >= battery.lower_limit_energy(), "{energy:?}");
            assert!(energy <= battery.upper_limit_energy(), "{energy:?}");
        }
        Ok(())
    }

    #[test]
    fn test_soc_limits_are_respected() -> Result {
        let battery = Battery::builder()
            .capacity(WattHours::from(2000.0))
            .max_charge_power(Watts::from(1000.0))
            .max_discharge_power(Watts::from(1000.0))
            .lower_soc_limit(Percent(10.0))
            .upper_soc_limit(Percent(90.0))
            .energy(WattHours::from(200.0))
            .build();
        let plan = plan(
            &battery,
            &[5.0, 1.0, 2.0, 9.0, 8.0, 1.0, 7.0],
            &[4.0, 0.5, 1.0, 8.0, 7.0, 0.5, 6.0],
        )?;
        assert_eq!(powers(&plan), [0.0, -1000.0, -600.0, 1000.0, 600.0, -1000.0, 1000.0]);
        assert_eq!(plan.expected_yield(), Cost::from(15.0));
        Ok(())
    }

    #[test]
    fn test_reversed_gap_before_first_discharge() -> Result {
        let plan =
            plan(&battery(1000.0, 500.0), &[4.0, 9.0, 3.0, 5.0, 8.0], &[2.0, 7.0, 3.0, 2.0, 5.0])?;
        assert_eq!(powers(&plan), [-500.0, 500.0, -500.0, -500.0, 500.0]);
        assert_abs_diff_eq!(plan.expected_yield().into_inner(), 0.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_reversed_gap_discharges_above_initial_cost() -> Result {
        let plan = plan(
            &battery(1000.0, 1000.0),
            &[1.0, 3.0, 1.0, 4.0, 2.0, 6.0],
            &[0.0, 3.0, 0.0, 1.0, 0.0, 5.0],
        )?;
        assert_eq!(powers(&plan), [-1000.0, 1000.0, -1000.0, 1000.0, -1000.0, 1000.0]);
        assert_eq!(plan.expected_yield(), Cost::from(5.0));
        Ok(())
    }

    #[test]
    fn test_reversed_gap_keeps_average_charge_cost() -> Result {
        let battery = charged_battery(1000.0, 1000.0, 500.0, 3.0);
        let plan = plan(&battery, &[1.0, 3.0, 1.0, 1.0, 7.0], &[0.0, 3.0, 0.0, 0.0, 4.0])?;
        assert_eq!(powers(&plan), [-500.0, 1000.0, -1000.0, 0.0, 1000.0]);
        assert_abs_diff_eq!(plan.expected_yield().into_inner(), 5.5, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_already_charged_partially_covers_charging() -> Result {
        let battery = charged_battery(2000.0, 1000.0, 500.0, 3.0);
        let plan = plan(&battery, &[3.0, 7.0, 8.0], &[3.0, 4.0, 6.0])?;
        assert_eq!(powers(&plan), [-500.0, 0.0, 1000.0]);
        assert_abs_diff_eq!(plan.expected_yield().into_inner(), 4.5, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_already_charged_stops_at_discharge() -> Result {
        let battery = charged_battery(1000.0, 500.0, 1000.0, 2.0);
        let plan = plan(&battery, &[1.0, 5.0, 5.0], &[0.0, 5.0, 5.0])?;
        assert_eq!(powers(&plan), [0.0, 500.0, 0.0]);
        assert_abs_diff_eq!(plan.expected_yield().into_inner(), 2.5, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_low_price_fallback_tops_up_charged_battery() -> Result {
        let planner = Planner::builder()
            .low_price_threshold(KilowattHourRate::from(3.0))
            .midnight(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
            .build();
        let import_prices = rates(&[5.0, 7.0, 2.0]);
        let export_prices = rates(&[5.0, 4.0, 0.0]);

        let half_charged = charged_battery(1000.0, 1000.0, 500.0, 1.0);
        let plan =
            planner.create_price_arbitrage_plan(&half_charged, &import_prices, &export_prices, 0)?;
        assert_eq!(powers(&plan), [0.0, 0.0, -500.0]);
        assert_abs_diff_eq!(plan.expected_yield().into_inner(), -1.0, epsilon = 1e-9);

        let fully_charged = charged_battery(1000.0, 1000.0, 1000.0, 1.0);
        let plan =
            planner.create_price_arbitrage_plan(&fully_charged, &import_prices, &export_prices, 0)?;
        assert!(plan.is_empty_plan());
        Ok(())
    }

    #[test]
    fn test_cycle_cost_prevents_unprofitable_cycle() -> Result {
        let planner = Planner::builder()
            .battery_cycle_cost(KilowattHourRate::from(0.5))
            .price_margin(KilowattHourRate::from(0.5))
            .midnight(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
            .build();
        let plan = planner.create_price_arbitrage_plan(
            &battery(1000.0, 1000.0),
            &rates(&[3.0, 2.0, 4.0, 4.0]),
            &rates(&[1.0, 1.0, 3.0, 1.0]),
            0,
        )?;
        assert!(plan.is_empty_plan());
        Ok(())
    }

    #[test]
    fn test_zero_prices_give_empty_plan() -> Result {
        let plan = plan(&battery(1000.0, 1000.0), &[0.0; 5], &[0.0; 5])?;
        assert_eq!(plan.len(), 5);
        assert!(plan.is_empty_plan());
        assert_eq!(plan.expected_yield(), Cost::ZERO);
        Ok(())
    }

    #[test]
    fn test_low_price_fallback() -> Result {
        let planner = Planner::builder()
            .low_price_threshold(KilowattHourRate::from(1.0))
            .midnight(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
            .build();
        let import_prices = rates(&[3.0, 0.5, 0.2, 2.0]);
        let export_prices = rates(&[0.0; 4]);

        let plan = planner.create_price_arbitrage_plan(
            &battery(1000.0, 1000.0),
            &import_prices,
            &export_prices,
            0,
        )?;
        assert_eq!(powers(&plan), [0.0, 0.0, -1000.0, 0.0]);

        let plan = planner.create_price_arbitrage_plan(
            &battery(2000.0, 1000.0),
            &import_prices,
            &export_prices,
            0,
        )?;
        assert_eq!(powers(&plan), [0.0, -1000.0, -1000.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_start_hour_offsets_indices() -> Result {
        let plan = planner().create_price_arbitrage_plan(
            &battery(1000.0, 1000.0),
            &rates(&[3.0, 2.0, 4.0]),
            &rates(&[1.0, 1.0, 3.0]),
            13,
        )?;
        assert_eq!(plan.iter().map(|hour| hour.index).collect_vec(), [13, 14, 15]);
        let hour = plan.get_by_index(14).context("missing hour")?;
        assert_eq!(hour.power, Watts::from(-1000.0));
        assert_eq!(hour.start.format("%H:%M").to_string(), "14:00");
        Ok(())
    }

    #[test]
    fn test_empty_prices() -> Result {
        let plan = plan(&battery(1000.0, 1000.0), &[], &[])?;
        assert!(plan.is_empty());
        assert!(plan.is_empty_plan());
        Ok(())
    }

    #[test]
    fn test_mismatched_prices() {
        let result = planner().create_price_arbitrage_plan(
            &battery(1000.0, 1000.0),
            &rates(&[1.0, 2.0]),
            &rates(&[1.0]),
            0,
        );
        assert_eq!(result, Err(InvalidInput::MismatchedPriceLengths { import: 2, export: 1 }));
    }

    #[test]
    fn test_invalid_battery() {
        let result = planner().create_price_arbitrage_plan(
            &battery(0.0, 1000.0),
            &rates(&[1.0]),
            &rates(&[1.0]),
            0,
        );
        assert!(matches!(result, Err(InvalidInput::NonPositiveCapacity(_))));
    }

    #[test]
    fn test_start_hour_out_of_range() {
        let result = planner().create_price_arbitrage_plan(
            &battery(1000.0, 1000.0),
            &rates(&[3.0, 2.0, 4.0]),
            &rates(&[1.0, 1.0, 3.0]),
            3_000_000_000,
        );
        assert_eq!(result, Err(InvalidInput::StartHourOutOfRange(3_000_000_000)));

        let result = planner().create_price_arbitrage_plan(
            &battery(1000.0, 1000.0),
            &rates(&[3.0, 2.0]),
            &rates(&[1.0, 1.0]),
            usize::MAX,
        );
        assert_eq!(result, Err(InvalidInput::StartHourOutOfRange(usize::MAX)));
    }
}
