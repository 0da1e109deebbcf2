use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::AppError;

macro_rules! unit_types {
    ($($variant:ident => $code:literal, $label:literal;)+) => {
        /// Unit quantity code printed on GST invoices
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum UnitType {
            $($variant,)+
        }

        impl UnitType {
            pub const ALL: &'static [UnitType] = &[$(UnitType::$variant,)+];

            /// Three-letter code stored with the line item
            pub fn code(&self) -> &'static str {
                match self {
                    $(UnitType::$variant => $code,)+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $(UnitType::$variant => $label,)+
                }
            }
        }

        impl FromStr for UnitType {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($code => Ok(UnitType::$variant),)+
                    other => Err(AppError::validation(format!("Unknown unit type '{}'", other))),
                }
            }
        }
    };
}

unit_types! {
    Bag => "BAG", "BAGS";
    Bale => "BAL", "BALE";
    Bundles => "BDL", "BUNDLES";
    Buckles => "BKL", "BUCKLES";
    BillionsOfUnits => "BOU", "BILLIONS OF UNITS";
    Box => "BOX", "BOX";
    Bottles => "BTL", "BOTTLES";
    Bunches => "BUN", "BUNCHES";
    Cans => "CAN", "CANS";
    CubicMeter => "CBM", "CUBIC METER";
    CubicCentimeter => "CCM", "CUBIC CENTIMETER";
    Centimeter => "CMS", "CENTIMETER";
    Cartons => "CTN", "CARTONS";
    Dozen => "DOZ", "DOZEN";
    Drum => "DRM", "DRUM";
    GreatGross => "GGR", "GREAT GROSS";
    Grams => "GMS", "GRAMS";
    Gross => "GRS", "GROSS";
    GrossYards => "GYD", "GROSS YARDS";
    Kilograms => "KGS", "KILOGRAMS";
    Kilolitre => "KLR", "KILOLITRE";
    Kilometre => "KME", "KILOMETRE";
    Millilitre => "MLT", "MILLILITRE";
    Meters => "MTR", "METERS";
    MetricTon => "MTS", "METRIC TON";
    Numbers => "NOS", "NUMBERS";
    Packs => "PAC", "PACKS";
    Pieces => "PCS", "PIECES";
    Pairs => "PRS", "PAIRS";
    Quintal => "QTL", "QUINTAL";
    Rolls => "ROL", "ROLLS";
    Sets => "SET", "SETS";
    SquareFeet => "SQF", "SQUARE FEET";
    SquareMeters => "SQM", "SQUARE METERS";
    SquareYards => "SQY", "SQUARE YARDS";
    Tablets => "TBS", "TABLETS";
    TenGrams => "TGM", "TEN GRAMS";
    Thousands => "THD", "THOUSANDS";
    Tonnes => "TON", "TONNES";
    Tubes => "TUB", "TUBES";
    UsGallons => "UGS", "US GALLONS";
    Units => "UNT", "UNITS";
    Yards => "YDS", "YARDS";
    Others => "OTH", "OTHERS";
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for UnitType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for UnitType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}
