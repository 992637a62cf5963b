//! ColdCloud Calculators
//!
//! Closed-form HVAC formulas over constant factor tables:
//!
//! - **cooling**: room cooling load in BTU and tons
//! - **airflow**: required CFM, and the ACH a given CFM delivers
//! - **duct**: duct cross-section and nearest standard size
//! - **energy**: running cost of a cooling system
//! - **history**: newest-first record of every calculation
//! - **engine**: runs a calculator and records the result
//!
//! # Example
//!
//! ```rust
//! use coldcloud::calc::{cooling_load, CoolingLoadInput, RoomType};
//!
//! let input = CoolingLoadInput::new(5.0, 4.0, 3.0)
//!     .room_type(RoomType::Bedroom)
//!     .occupants(2);
//! let result = cooling_load(&input).unwrap();
//! assert_eq!(result.total_btu, 7200);
//! assert_eq!(result.tonnage, 0.6);
//! ```

pub mod airflow;
pub mod cooling;
pub mod duct;
pub mod energy;
pub mod engine;
pub mod error;
pub mod factors;
pub mod history;

pub use airflow::{
    air_changes, airflow, AirChangeInput, AirChangeResult, AirflowInput, AirflowResult,
    VentilationRating,
};
pub use cooling::{cooling_load, CoolingLoadInput, CoolingLoadResult};
pub use duct::{
    duct_size, nearest_standard, DuctDimensions, DuctInput, DuctSizeResult, STANDARD_RECT_SIZES,
    STANDARD_ROUND_SIZES,
};
pub use energy::{energy_cost, EnergyCostResult, EnergyInput};
pub use engine::{CalculationEngine, CalculatorSettings, Recorded};
pub use error::{CalcError, CalcResult};
pub use factors::{AchBand, Climate, DuctShape, Insulation, RoomType, RoomUsage, SunExposure};
pub use history::{
    CalculationHistory, CalculationKind, CalculationRecord, CalculationResult, ExportFormat,
};

/// Round half away from zero to `decimals` places
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.6, 1), 0.6);
        assert_eq!(round_to(4.2857, 1), 4.3);
        assert_eq!(round_to(2.879999, 2), 2.88);
        assert_eq!(round_to(12.0, 1), 12.0);
    }
}
