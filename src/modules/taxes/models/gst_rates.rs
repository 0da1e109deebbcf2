use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// Largest percentage accepted for a single GST component
const MAX_RATE_PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Fractional digits allowed on a rate (`DECIMAL(5,2)`)
const RATE_SCALE: u32 = 2;

/// The three GST components of a line item, as percentages.
///
/// An intra-state supply normally carries CGST and SGST, an inter-state
/// supply IGST. All three are summed unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GstRates {
    #[serde(default)]
    pub cgst: Decimal,
    #[serde(default)]
    pub sgst: Decimal,
    #[serde(default)]
    pub igst: Decimal,
}

impl GstRates {
    pub fn new(cgst: Decimal, sgst: Decimal, igst: Decimal) -> Self {
        Self { cgst, sgst, igst }
    }

    /// Combined GST percentage
    pub fn total_rate(&self) -> Decimal {
        self.cgst + self.sgst + self.igst
    }

    pub fn validate(&self) -> Result<()> {
        for (label, rate) in [("cgst", self.cgst), ("sgst", self.sgst), ("igst", self.igst)] {
            if rate < Decimal::ZERO {
                return Err(AppError::validation(format!(
                    "{} rate cannot be negative",
                    label
                )));
            }

            if rate > MAX_RATE_PERCENT {
                return Err(AppError::validation(format!(
                    "{} rate cannot exceed 100%",
                    label
                )));
            }

            if rate.normalize().scale() > RATE_SCALE {
                return Err(AppError::validation(format!(
                    "{} rate cannot have more than {} decimal places",
                    label, RATE_SCALE
                )));
            }
        }

        Ok(())
    }
}
