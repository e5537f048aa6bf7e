use std::{
    fmt::{Debug, Display, Formatter},
    ops::Div,
};

use ordered_float::OrderedFloat;

use crate::quantity::{Quantity, energy::WattHours, rate::KilowattHourRate};

pub type Cost = Quantity<0, 0, 1>;

impl Cost {
    /// Round the cost to hundredths of the currency unit.
    pub fn round_to_cents(self) -> Self {
        Self(OrderedFloat((self.0.0 * 100.0).round() / 100.0))
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+.2}", self.0)
    }
}

impl Debug for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Div<WattHours> for Cost {
    type Output = KilowattHourRate;

    fn div(self, rhs: WattHours) -> Self::Output {
        Quantity(self.0 * 1000.0 / rhs.0)
    }
}
