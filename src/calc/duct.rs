//! Duct sizing calculator
//!
//! Derives the cross-section needed to carry an airflow at a target air
//! velocity, then snaps each dimension to the nearest standard size.
//!
//! ```text
//! area (ft²)        = CFM / velocity
//! round diameter    = sqrt(area × 144 × 4 / π)      inches
//! rectangular width = sqrt(area × 144 / aspect)     inches
//! rectangular height = width × aspect
//! ```

use crate::calc::error::{or_default, require_positive, CalcResult};
use crate::calc::factors::DuctShape;
use crate::calc::round_to;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Velocity used when none is given (feet per minute)
pub const DEFAULT_VELOCITY_FPM: f64 = 900.0;

/// Width-to-height ratio used when none is given
pub const DEFAULT_ASPECT_RATIO: f64 = 1.5;

/// Square inches per square foot
const SQ_IN_PER_SQ_FT: f64 = 144.0;

/// Square centimetres per square foot
const SQ_CM_PER_SQ_FT: f64 = 929.03;

const MM_PER_INCH: f64 = 25.4;

/// Standard round duct diameters (inches)
pub const STANDARD_ROUND_SIZES: &[f64] = &[
    4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 22.0, 24.0, 26.0, 28.0,
    30.0, 32.0, 34.0, 36.0, 40.0, 42.0, 48.0,
];

/// Standard rectangular duct sides (inches)
pub const STANDARD_RECT_SIZES: &[f64] = &[
    4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 22.0, 24.0, 26.0, 28.0, 30.0, 32.0, 36.0,
    40.0, 44.0, 48.0,
];

/// Nearest entry of `sizes` to `value`
///
/// Ties resolve to the entry that appears first in `sizes`. Returns `None`
/// only for an empty list.
pub fn nearest_standard(value: f64, sizes: &[f64]) -> Option<f64> {
    let mut best: Option<(f64, f64)> = None;
    for &size in sizes {
        let distance = (size - value).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((size, distance)),
        }
    }
    best.map(|(size, _)| size)
}

/// Duct sizing input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DuctInput {
    /// Airflow in CFM
    pub flow: f64,
    /// Air velocity in FPM; `None` or zero uses the default
    pub velocity: Option<f64>,
    pub shape: DuctShape,
    /// Rectangular width/height ratio; `None` or zero uses the default
    pub aspect_ratio: Option<f64>,
}

impl DuctInput {
    pub fn round(flow: f64) -> Self {
        Self {
            flow,
            velocity: None,
            shape: DuctShape::Round,
            aspect_ratio: None,
        }
    }

    pub fn rectangular(flow: f64) -> Self {
        Self {
            shape: DuctShape::Rectangular,
            ..Self::round(flow)
        }
    }

    pub fn velocity(mut self, velocity: f64) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn aspect_ratio(mut self, ratio: f64) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }
}

/// Computed dimensions for the selected shape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum DuctDimensions {
    #[serde(rename_all = "camelCase")]
    Round {
        diameter_in: f64,
        diameter_mm: f64,
        standard_diameter_in: f64,
    },
    #[serde(rename_all = "camelCase")]
    Rectangular {
        aspect_ratio: f64,
        width_in: f64,
        height_in: f64,
        standard_width_in: f64,
        standard_height_in: f64,
    },
}

/// Duct sizing result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DuctSizeResult {
    pub cfm: f64,
    pub velocity: f64,
    /// Cross-section in square feet
    pub area: f64,
    /// Cross-section in square centimetres
    pub area_cm2: f64,
    pub dimensions: DuctDimensions,
}

/// Size a duct for the given airflow
pub fn duct_size(input: &DuctInput) -> CalcResult<DuctSizeResult> {
    let cfm = require_positive("airflow", input.flow)?;
    let velocity = or_default("air velocity", input.velocity, DEFAULT_VELOCITY_FPM)?;

    let area = cfm / velocity;
    let area_sq_in = area * SQ_IN_PER_SQ_FT;

    let dimensions = match input.shape {
        DuctShape::Round => {
            let diameter_in = (area_sq_in * 4.0 / PI).sqrt();
            DuctDimensions::Round {
                diameter_in,
                diameter_mm: diameter_in * MM_PER_INCH,
                standard_diameter_in: snap(diameter_in, STANDARD_ROUND_SIZES),
            }
        }
        DuctShape::Rectangular => {
            let aspect_ratio = or_default("aspect ratio", input.aspect_ratio, DEFAULT_ASPECT_RATIO)?;
            let width_in = (area_sq_in / aspect_ratio).sqrt();
            let height_in = width_in * aspect_ratio;
            DuctDimensions::Rectangular {
                aspect_ratio,
                width_in,
                height_in,
                standard_width_in: snap(width_in, STANDARD_RECT_SIZES),
                standard_height_in: snap(height_in, STANDARD_RECT_SIZES),
            }
        }
    };

    Ok(DuctSizeResult {
        cfm,
        velocity,
        area,
        area_cm2: round_to(area * SQ_CM_PER_SQ_FT, 2),
        dimensions,
    })
}

fn snap(value: f64, sizes: &[f64]) -> f64 {
    nearest_standard(value, sizes).unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::error::CalcError;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_round_reference_case() {
        let result = duct_size(&DuctInput::round(1000.0).velocity(900.0)).unwrap();

        let area = 1000.0 / 900.0;
        let diameter = (area * 144.0 * 4.0 / PI).sqrt();
        assert!(approx(result.area, area));

        match result.dimensions {
            DuctDimensions::Round {
                diameter_in,
                diameter_mm,
                standard_diameter_in,
            } => {
                assert!(approx(diameter_in, diameter));
                assert!(approx(diameter_mm, diameter * 25.4));
                // 14.27 in
                assert_eq!(standard_diameter_in, 14.0);
            }
            other => panic!("expected round dimensions, got {:?}", other),
        }
    }

    #[test]
    fn test_default_velocity() {
        let result = duct_size(&DuctInput::round(1000.0)).unwrap();
        assert_eq!(result.velocity, DEFAULT_VELOCITY_FPM);
    }

    #[test]
    fn test_rectangular_uses_aspect_ratio() {
        let result = duct_size(&DuctInput::rectangular(1000.0).velocity(900.0)).unwrap();

        match result.dimensions {
            DuctDimensions::Rectangular {
                aspect_ratio,
                width_in,
                height_in,
                standard_width_in,
                standard_height_in,
            } => {
                assert_eq!(aspect_ratio, 1.5);
                assert!(approx(height_in, width_in * 1.5));
                assert!(approx(width_in * height_in, result.area * 144.0));
                // 10.33 × 15.49 in
                assert_eq!(standard_width_in, 10.0);
                assert_eq!(standard_height_in, 16.0);
            }
            other => panic!("expected rectangular dimensions, got {:?}", other),
        }

        let square = duct_size(&DuctInput::rectangular(1000.0).aspect_ratio(1.0)).unwrap();
        match square.dimensions {
            DuctDimensions::Rectangular {
                width_in, height_in, ..
            } => assert!(approx(width_in, height_in)),
            other => panic!("expected rectangular dimensions, got {:?}", other),
        }
    }

    #[test]
    fn test_nearest_standard_ties_go_to_first_entry() {
        assert_eq!(nearest_standard(11.0, STANDARD_ROUND_SIZES), Some(10.0));
        assert_eq!(nearest_standard(11.0, &[12.0, 10.0]), Some(12.0));
        assert_eq!(nearest_standard(4.5, STANDARD_ROUND_SIZES), Some(4.0));
    }

    #[test]
    fn test_nearest_standard_clamps_to_ends() {
        assert_eq!(nearest_standard(1.0, STANDARD_ROUND_SIZES), Some(4.0));
        assert_eq!(nearest_standard(90.0, STANDARD_ROUND_SIZES), Some(48.0));
        assert_eq!(nearest_standard(5.0, &[]), None);
    }

    #[test]
    fn test_missing_flow() {
        let result = duct_size(&DuctInput::round(0.0));
        assert!(matches!(result, Err(CalcError::MissingInput("airflow"))));
    }
}
