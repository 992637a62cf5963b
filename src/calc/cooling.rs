//! Cooling load (BTU) calculator
//!
//! ```text
//! BTU     = round(volume × 100 × room × climate × sun × insulation + occupants × 600)
//! tonnage = round(BTU / 12000 × 10) / 10
//! ```

use crate::calc::error::{require_positive, CalcResult};
use crate::calc::factors::{Climate, Insulation, RoomType, SunExposure};
use crate::calc::round_to;
use serde::{Deserialize, Serialize};

/// BTU per cubic metre of conditioned space
pub const BASE_BTU_PER_M3: f64 = 100.0;

/// BTU added per occupant
pub const BTU_PER_OCCUPANT: f64 = 600.0;

/// BTU per refrigeration ton
pub const BTU_PER_TON: f64 = 12_000.0;

/// Room dimensions (metres) and conditions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoolingLoadInput {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub room_type: RoomType,
    /// Zero is treated as one occupant
    pub occupants: u32,
    pub climate: Climate,
    pub sun_exposure: SunExposure,
    pub insulation: Insulation,
}

impl CoolingLoadInput {
    /// Room with default conditions (bedroom, moderate climate, one occupant)
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
            room_type: RoomType::default(),
            occupants: 1,
            climate: Climate::default(),
            sun_exposure: SunExposure::default(),
            insulation: Insulation::default(),
        }
    }

    pub fn room_type(mut self, room_type: RoomType) -> Self {
        self.room_type = room_type;
        self
    }

    pub fn occupants(mut self, occupants: u32) -> Self {
        self.occupants = occupants;
        self
    }

    pub fn climate(mut self, climate: Climate) -> Self {
        self.climate = climate;
        self
    }

    pub fn sun_exposure(mut self, sun: SunExposure) -> Self {
        self.sun_exposure = sun;
        self
    }

    pub fn insulation(mut self, insulation: Insulation) -> Self {
        self.insulation = insulation;
        self
    }
}

/// Cooling load result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoolingLoadResult {
    pub total_btu: u64,
    pub tonnage: f64,
    pub volume: f64,
    pub room_type: RoomType,
    pub recommendation: String,
}

/// Compute the cooling load for a room
pub fn cooling_load(input: &CoolingLoadInput) -> CalcResult<CoolingLoadResult> {
    let length = require_positive("room length", input.length)?;
    let width = require_positive("room width", input.width)?;
    let height = require_positive("room height", input.height)?;

    let volume = length * width * height;
    let occupants = input.occupants.max(1) as f64;

    let factor = input.room_type.factor()
        * input.climate.load_factor()
        * input.sun_exposure.factor()
        * input.insulation.factor();

    let total_btu = (volume * BASE_BTU_PER_M3 * factor + occupants * BTU_PER_OCCUPANT).round();
    let tonnage = round_to(total_btu / BTU_PER_TON, 1);

    Ok(CoolingLoadResult {
        total_btu: total_btu as u64,
        tonnage,
        volume,
        room_type: input.room_type,
        recommendation: recommendation(tonnage, volume),
    })
}

/// Equipment advice by tonnage band
pub fn recommendation(tonnage: f64, volume: f64) -> String {
    let system = if tonnage <= 1.0 {
        "a 1-ton split unit or a mini-split system."
    } else if tonnage <= 3.0 {
        "a small central system or several split units."
    } else if tonnage <= 5.0 {
        "a medium-capacity central system with proper air distribution."
    } else {
        "a high-capacity central system with engineered ductwork."
    };

    format!(
        "For {:.1} m³ we recommend {} Please have a qualified technician verify the load before sizing equipment.",
        volume, system
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::error::CalcError;

    #[test]
    fn test_bedroom_reference_case() {
        let input = CoolingLoadInput::new(5.0, 4.0, 3.0)
            .room_type(RoomType::Bedroom)
            .occupants(2)
            .climate(Climate::Moderate)
            .sun_exposure(SunExposure::Medium)
            .insulation(Insulation::Average);

        let result = cooling_load(&input).unwrap();
        assert_eq!(result.volume, 60.0);
        assert_eq!(result.total_btu, 7200);
        assert_eq!(result.tonnage, 0.6);
        assert!(result.recommendation.contains("1-ton split"));
    }

    #[test]
    fn test_factors_multiply() {
        let input = CoolingLoadInput::new(10.0, 10.0, 3.0)
            .room_type(RoomType::Kitchen)
            .climate(Climate::Hot)
            .sun_exposure(SunExposure::High)
            .insulation(Insulation::Poor);

        // 300 × 100 × 1.4 × 1.2 × 1.1 × 1.2 + 600
        let result = cooling_load(&input).unwrap();
        assert_eq!(result.total_btu, 67_128);
        assert_eq!(result.tonnage, 5.6);
        assert!(result.recommendation.contains("high-capacity"));
    }

    #[test]
    fn test_zero_occupants_counts_as_one() {
        let none = cooling_load(&CoolingLoadInput::new(5.0, 4.0, 3.0).occupants(0)).unwrap();
        let one = cooling_load(&CoolingLoadInput::new(5.0, 4.0, 3.0).occupants(1)).unwrap();
        assert_eq!(none.total_btu, one.total_btu);
    }

    #[test]
    fn test_missing_dimension() {
        let result = cooling_load(&CoolingLoadInput::new(5.0, 0.0, 3.0));
        assert!(matches!(result, Err(CalcError::MissingInput("room width"))));
    }

    #[test]
    fn test_recommendation_bands() {
        assert!(recommendation(1.0, 10.0).contains("split unit"));
        assert!(recommendation(2.5, 10.0).contains("small central"));
        assert!(recommendation(5.0, 10.0).contains("medium-capacity"));
        assert!(recommendation(5.1, 10.0).contains("high-capacity"));
    }
}
