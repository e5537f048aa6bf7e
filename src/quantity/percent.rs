use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

/// State-of-charge percentage, `100.0` being a full battery.
#[derive(
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
pub struct Percent(pub f64);

impl Percent {
    pub const ZERO: Self = Self(0.0);
    pub const HUNDRED: Self = Self(100.0);

    #[must_use]
    pub const fn to_proportion(self) -> f64 {
        0.01 * self.0
    }
}

impl Debug for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl Display for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} %", self.0)
    }
}
