//! Ink/fabric spread multipliers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InkType {
    #[default]
    Plastisol,
    WaterBased,
    Discharge,
    Pvc,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FabricType {
    #[default]
    Cotton,
    Polyester,
    Blend,
    Dark,
    Light,
}

/// How far ink spreads on a given fabric, relative to plastisol on cotton.
pub fn spread_factor(ink: InkType, fabric: FabricType) -> f32 {
    use FabricType::*;
    match ink {
        InkType::Plastisol => match fabric {
            Cotton => 1.0,
            Polyester => 0.8,
            Blend => 0.9,
            Dark => 1.0,
            Light => 0.9,
        },
        InkType::WaterBased => match fabric {
            Cotton => 1.2,
            Polyester => 0.7,
            Blend => 0.95,
            Dark => 1.1,
            Light => 0.9,
        },
        InkType::Discharge => match fabric {
            Cotton => 1.3,
            Polyester => 0.6,
            Blend => 0.85,
            Dark => 1.2,
            Light => 0.8,
        },
        InkType::Pvc => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_table_values() {
        assert_eq!(spread_factor(InkType::Plastisol, FabricType::Cotton), 1.0);
        assert_eq!(spread_factor(InkType::WaterBased, FabricType::Cotton), 1.2);
        assert_eq!(spread_factor(InkType::Discharge, FabricType::Polyester), 0.6);
        assert_eq!(spread_factor(InkType::WaterBased, FabricType::Blend), 0.95);
    }

    #[test]
    fn test_unlisted_ink_defaults_to_one() {
        for fabric in FabricType::iter() {
            assert_eq!(spread_factor(InkType::Pvc, fabric), 1.0);
        }
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(InkType::WaterBased.to_string(), "water_based");
        assert_eq!("discharge".parse::<InkType>().unwrap(), InkType::Discharge);
        assert_eq!(
            serde_json::to_string(&FabricType::Polyester).unwrap(),
            "\"polyester\""
        );
    }
}
