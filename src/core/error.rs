use crate::quantity::{energy::WattHours, percent::Percent, power::Watts};

/// Planner input that cannot produce a meaningful plan.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum InvalidInput {
    #[error("got {import} import prices but {export} export prices")]
    MismatchedPriceLengths { import: usize, export: usize },

    #[error("start hour {0} does not fit into the calendar")]
    StartHourOutOfRange(usize),

    #[error("battery capacity must be positive, got {0}")]
    NonPositiveCapacity(WattHours),

    #[error("maximum {direction} power must be positive, got {power}")]
    NonPositivePower { direction: &'static str, power: Watts },

    #[error("state-of-charge limits must be 0 ≤ lower ≤ upper ≤ 100, got {lower}..{upper}")]
    InvalidSocLimits { lower: Percent, upper: Percent },
}
