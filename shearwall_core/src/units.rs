//! # Unit Types
//!
//! Newtype wrappers for the quantities the design pipeline converts between.
//! Capacity tables and demands are in kips and klf, while the deflection
//! formulas want plf and inches and story heights arrive in feet.
//!
//! The operators encode the conversions the pipeline actually performs:
//!
//! ```text
//! Kips / Feet  -> KlF     story shear spread over a wall length
//! KlF  * Feet  -> Kips    unit shear acting over a lever arm
//! KlF          -> PlF     table units to deflection units
//! Feet         -> Inches  story height to drift and rod length
//! ```
//!
//! ## Example
//!
//! ```rust
//! use shearwall_core::units::{Feet, Inches, Kips, KlF, PlF};
//!
//! let unit_shear: KlF = Kips(5.0) / Feet(20.0);
//! assert_eq!(unit_shear.value(), 0.25);
//! assert_eq!(PlF::from(unit_shear).value(), 250.0);
//!
//! let height: Inches = Feet(10.0).into();
//! assert_eq!(height.value(), 120.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul};

macro_rules! quantity {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }
    };
}

quantity!(
    /// Length in feet (story heights, wall lengths)
    Feet
);
quantity!(
    /// Length in inches (deflections, drift limits, rod length)
    Inches
);
quantity!(
    /// Force in kips
    Kips
);
quantity!(
    /// Unit shear in kips per linear foot, the capacity table unit
    KlF
);
quantity!(
    /// Unit shear in pounds per linear foot, the deflection formula unit
    PlF
);

impl From<Feet> for Inches {
    fn from(ft: Feet) -> Self {
        Inches(ft.0 * 12.0)
    }
}

impl From<KlF> for PlF {
    fn from(klf: KlF) -> Self {
        PlF(klf.0 * 1000.0)
    }
}

impl Div<Feet> for Kips {
    type Output = KlF;
    fn div(self, length: Feet) -> KlF {
        KlF(self.0 / length.0)
    }
}

impl Mul<Feet> for KlF {
    type Output = Kips;
    fn mul(self, length: Feet) -> Kips {
        Kips(self.0 * length.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feet_to_inches() {
        let inches: Inches = Feet(10.0).into();
        assert_eq!(inches.0, 120.0);
        assert_eq!((inches * 0.02).value(), 2.4);
    }

    #[test]
    fn test_story_force_to_unit_shear() {
        // 5 kips over a 20 ft wall is 250 plf
        let klf = Kips(5.0) / Feet(20.0);
        assert_eq!(klf, KlF(0.25));
        assert_eq!(PlF::from(klf).value(), 250.0);
    }

    #[test]
    fn test_unit_shear_over_lever_arm() {
        // 0.25 klf over a 9 ft arm
        assert_eq!(KlF(0.25) * Feet(9.0), Kips(2.25));
    }

    #[test]
    fn test_serialization() {
        let ft = Feet(12.5);
        let json = serde_json::to_string(&ft).unwrap();
        assert_eq!(json, "12.5");
        let roundtrip: Feet = serde_json::from_str(&json).unwrap();
        assert_eq!(ft, roundtrip);
    }
}
