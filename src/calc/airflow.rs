//! Airflow (CFM) and air-change rate (ACH) calculators
//!
//! ```text
//! CFM = round(volume × ACH / 60)
//! ACH = round(CFM × 60 / volume × 10) / 10
//! ```

use crate::calc::error::{or_default, require_positive, CalcResult};
use crate::calc::factors::{AchBand, RoomUsage};
use crate::calc::round_to;
use serde::{Deserialize, Serialize};

/// Airflow calculator input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AirflowInput {
    /// Room volume in cubic feet
    pub volume: f64,
    /// Air changes per hour; `None` or zero uses the usage default
    pub air_changes: Option<f64>,
    pub usage: RoomUsage,
}

/// Required airflow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AirflowResult {
    pub cfm: u64,
    pub volume: f64,
    pub air_changes: f64,
    pub room_usage: RoomUsage,
}

/// Compute the airflow needed for a target air-change rate
pub fn airflow(input: &AirflowInput) -> CalcResult<AirflowResult> {
    let volume = require_positive("room volume", input.volume)?;
    let air_changes = or_default("air changes", input.air_changes, input.usage.default_ach())?;

    let cfm = (volume * air_changes / 60.0).round();

    Ok(AirflowResult {
        cfm: cfm as u64,
        volume,
        air_changes,
        room_usage: input.usage,
    })
}

/// Air-change rate calculator input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AirChangeInput {
    /// Supplied airflow in CFM
    pub flow: f64,
    /// Room volume in cubic feet
    pub volume: f64,
    pub usage: RoomUsage,
}

/// Qualitative ventilation rating against a usage band
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VentilationRating {
    /// Below the band minimum
    Insufficient,
    /// Within the band
    Adequate,
    /// Above the band maximum
    Excessive,
}

impl VentilationRating {
    pub fn evaluate(ach: f64, band: &AchBand) -> Self {
        if ach < band.min {
            VentilationRating::Insufficient
        } else if ach <= band.max {
            VentilationRating::Adequate
        } else {
            VentilationRating::Excessive
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            VentilationRating::Insufficient => "low, may not provide enough fresh air",
            VentilationRating::Adequate => "within the recommended range",
            VentilationRating::Excessive => "high, more air movement than this space needs",
        }
    }
}

impl std::fmt::Display for VentilationRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VentilationRating::Insufficient => write!(f, "insufficient"),
            VentilationRating::Adequate => write!(f, "adequate"),
            VentilationRating::Excessive => write!(f, "excessive"),
        }
    }
}

/// Air-change rate with its rating
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AirChangeResult {
    pub ach: f64,
    pub cfm: f64,
    pub volume: f64,
    pub room_usage: RoomUsage,
    pub band: AchBand,
    pub rating: VentilationRating,
}

/// Compute the air-change rate delivered by a given airflow
pub fn air_changes(input: &AirChangeInput) -> CalcResult<AirChangeResult> {
    let cfm = require_positive("airflow", input.flow)?;
    let volume = require_positive("room volume", input.volume)?;

    let ach = round_to(cfm * 60.0 / volume, 1);
    let band = input.usage.ach_band();

    Ok(AirChangeResult {
        ach,
        cfm,
        volume,
        room_usage: input.usage,
        band,
        rating: VentilationRating::evaluate(ach, &band),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::error::CalcError;

    #[test]
    fn test_airflow_reference_case() {
        let result = airflow(&AirflowInput {
            volume: 1000.0,
            air_changes: Some(6.0),
            usage: RoomUsage::Residential,
        })
        .unwrap();

        assert_eq!(result.cfm, 100);
        assert_eq!(result.air_changes, 6.0);
    }

    #[test]
    fn test_airflow_usage_default() {
        let result = airflow(&AirflowInput {
            volume: 1500.0,
            air_changes: None,
            usage: RoomUsage::Industrial,
        })
        .unwrap();
        assert_eq!(result.air_changes, 12.0);
        assert_eq!(result.cfm, 300);

        let zero = airflow(&AirflowInput {
            volume: 1500.0,
            air_changes: Some(0.0),
            usage: RoomUsage::Office,
        })
        .unwrap();
        assert_eq!(zero.air_changes, 6.0);
    }

    #[test]
    fn test_airflow_requires_volume() {
        let result = airflow(&AirflowInput {
            volume: 0.0,
            air_changes: Some(6.0),
            usage: RoomUsage::Office,
        });
        assert!(matches!(result, Err(CalcError::MissingInput("room volume"))));
    }

    #[test]
    fn test_air_change_reference_case() {
        let result = air_changes(&AirChangeInput {
            flow: 400.0,
            volume: 2000.0,
            usage: RoomUsage::Industrial,
        })
        .unwrap();

        assert_eq!(result.ach, 12.0);
        assert_eq!(result.rating, VentilationRating::Adequate);
    }

    #[test]
    fn test_air_change_rounds_to_one_decimal() {
        let result = air_changes(&AirChangeInput {
            flow: 100.0,
            volume: 1400.0,
            usage: RoomUsage::Residential,
        })
        .unwrap();
        // 100 × 60 / 1400 = 4.2857...
        assert_eq!(result.ach, 4.3);
    }

    #[test]
    fn test_ratings_follow_usage_band() {
        let rate = |flow: f64, usage| {
            air_changes(&AirChangeInput {
                flow,
                volume: 600.0,
                usage,
            })
            .unwrap()
            .rating
        };

        // 600 ft³: ACH = flow / 10
        assert_eq!(rate(20.0, RoomUsage::Residential), VentilationRating::Insufficient);
        assert_eq!(rate(60.0, RoomUsage::Residential), VentilationRating::Adequate);
        assert_eq!(rate(61.0, RoomUsage::Residential), VentilationRating::Excessive);
        assert_eq!(rate(61.0, RoomUsage::Commercial), VentilationRating::Adequate);
        assert_eq!(rate(61.0, RoomUsage::Industrial), VentilationRating::Insufficient);
    }

    #[test]
    fn test_air_change_requires_both_inputs() {
        let result = air_changes(&AirChangeInput {
            flow: 0.0,
            volume: 2000.0,
            usage: RoomUsage::Office,
        });
        assert!(matches!(result, Err(CalcError::MissingInput("airflow"))));
    }
}
