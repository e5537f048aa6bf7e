use std::{
    fmt::{Debug, Display, Formatter},
    ops::{Div, Mul},
};

use crate::quantity::{
    Quantity,
    cost::Cost,
    percent::Percent,
    power::Watts,
    rate::KilowattHourRate,
    time::Hours,
};

pub type WattHours = Quantity<1, 1, 0>;

impl Display for WattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0} Wh", self.0)
    }
}

impl Debug for WattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}Wh", self.0)
    }
}

impl Mul<Percent> for WattHours {
    type Output = Self;

    fn mul(self, percent: Percent) -> Self::Output {
        self * percent.to_proportion()
    }
}

impl Mul<KilowattHourRate> for WattHours {
    type Output = Cost;

    fn mul(self, rhs: KilowattHourRate) -> Self::Output {
        Quantity(self.0 * rhs.0 / 1000.0)
    }
}

impl Div<Hours> for WattHours {
    type Output = Watts;

    fn div(self, rhs: Hours) -> Self::Output {
        Quantity(self.0 / rhs.0)
    }
}

impl Div<Watts> for WattHours {
    type Output = Hours;

    fn div(self, rhs: Watts) -> Self::Output {
        Quantity(self.0 / rhs.0)
    }
}
