use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    api::solarnet::schedule::Entry,
    core::charge_plan::ChargePlan,
    quantity::{cost::Cost, power::Watts, rate::KilowattHourRate},
};

pub fn build_plan_table(plan: &ChargePlan) -> Table {
    let mean_import_price: KilowattHourRate = if plan.is_empty() {
        KilowattHourRate::ZERO
    } else {
        #[expect(clippy::cast_precision_loss)]
        let n_hours = plan.len() as f64;
        plan.iter().map(|hour| hour.import_price).sum::<KilowattHourRate>() / n_hours
    };

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table.set_header(vec!["Date", "Start", "Import", "Export", "Power", "Yield"]);
    for hour in plan {
        table.add_row(vec![
            Cell::new(hour.start.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(hour.start.format("%H:%M")),
            Cell::new(hour.import_price).fg(if hour.import_price >= mean_import_price {
                Color::Red
            } else {
                Color::Green
            }),
            Cell::new(hour.export_price).add_attribute(Attribute::Dim),
            Cell::new(hour.power).set_alignment(CellAlignment::Right).fg(power_color(hour.power)),
            Cell::new(hour.expected_yield().round_to_cents())
                .set_alignment(CellAlignment::Right)
                .fg(cost_color(hour.expected_yield())),
        ]);
    }
    let expected_yield = plan.expected_yield();
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(expected_yield)
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold)
            .fg(cost_color(expected_yield)),
    ]);
    table
}

pub fn build_time_of_use_table(entries: &[Entry]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table.set_header(vec!["Days", "Start", "End", "Type", "Power", "Active"]);
    for entry in entries {
        let attribute = if entry.is_active { Attribute::NormalIntensity } else { Attribute::Dim };
        table.add_row(vec![
            Cell::new(&entry.weekdays).add_attribute(attribute),
            Cell::new(&entry.time_table.start).add_attribute(attribute),
            Cell::new(&entry.time_table.end).add_attribute(Attribute::Dim),
            Cell::new(entry.schedule_type).fg(power_color(entry.signed_power())),
            Cell::new(entry.power).set_alignment(CellAlignment::Right).add_attribute(attribute),
            Cell::new(if entry.is_active { "yes" } else { "no" }).add_attribute(attribute),
        ]);
    }
    table
}

/// Charging is green, discharging is red.
fn power_color(power: Watts) -> Color {
    if power < Watts::ZERO {
        Color::Green
    } else if power > Watts::ZERO {
        Color::Red
    } else {
        Color::Reset
    }
}

fn cost_color(cost: Cost) -> Color {
    if cost >= Cost::ZERO { Color::Green } else { Color::Red }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        api::solarnet::schedule::{ScheduleType, TimeTable, Weekdays},
        core::charge_hour::ChargeHour,
    };

    #[test]
    fn test_plan_table() {
        let midnight = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        let plan: ChargePlan = [
            ChargeHour::new(0, midnight, 0.1.into(), 0.05.into())
                .unwrap()
                .with_power(Watts::from(-1000.0)),
            ChargeHour::new(1, midnight, 0.4.into(), 0.3.into())
                .unwrap()
                .with_power(Watts::from(1000.0)),
        ]
        .into_iter()
        .collect();
        let table = build_plan_table(&plan);
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_empty_plan_table() {
        let table = build_plan_table(&ChargePlan::default());
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_time_of_use_table() {
        let entry = Entry {
            is_active: true,
            power: 2000,
            schedule_type: ScheduleType::ChargeMax,
            time_table: TimeTable::of_hour(3),
            weekdays: Weekdays::only(chrono::Weekday::Mon),
        };
        let table = build_time_of_use_table(&[entry]);
        assert_eq!(table.row_count(), 1);
    }
}
