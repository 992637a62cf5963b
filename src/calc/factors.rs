//! Constant factor tables
//!
//! Every lookup key used by the calculators is an enum variant. Parsing an
//! unknown name fails instead of silently falling back to a neutral factor.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

fn parse_error(kind: &str, value: &str, expected: &[&str]) -> String {
    format!(
        "unknown {} '{}' (expected one of: {})",
        kind,
        value,
        expected.join(", ")
    )
}

/// Room type for cooling load
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Living,
    #[default]
    Bedroom,
    Kitchen,
    Office,
    Commercial,
}

impl RoomType {
    pub fn all() -> &'static [RoomType] {
        &[
            RoomType::Living,
            RoomType::Bedroom,
            RoomType::Kitchen,
            RoomType::Office,
            RoomType::Commercial,
        ]
    }

    pub fn factor(&self) -> f64 {
        match self {
            RoomType::Living => 1.2,
            RoomType::Bedroom => 1.0,
            RoomType::Kitchen => 1.4,
            RoomType::Office => 1.1,
            RoomType::Commercial => 1.5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoomType::Living => "Living room",
            RoomType::Bedroom => "Bedroom",
            RoomType::Kitchen => "Kitchen",
            RoomType::Office => "Office",
            RoomType::Commercial => "Commercial",
        }
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomType::Living => write!(f, "living"),
            RoomType::Bedroom => write!(f, "bedroom"),
            RoomType::Kitchen => write!(f, "kitchen"),
            RoomType::Office => write!(f, "office"),
            RoomType::Commercial => write!(f, "commercial"),
        }
    }
}

impl FromStr for RoomType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "living" => Ok(RoomType::Living),
            "bedroom" => Ok(RoomType::Bedroom),
            "kitchen" => Ok(RoomType::Kitchen),
            "office" => Ok(RoomType::Office),
            "commercial" => Ok(RoomType::Commercial),
            other => Err(parse_error(
                "room type",
                other,
                &["living", "bedroom", "kitchen", "office", "commercial"],
            )),
        }
    }
}

/// Outdoor climate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Climate {
    Hot,
    #[default]
    Moderate,
    Cold,
}

impl Climate {
    /// Multiplier on cooling load
    pub fn load_factor(&self) -> f64 {
        match self {
            Climate::Hot => 1.2,
            Climate::Moderate => 1.0,
            Climate::Cold => 0.8,
        }
    }

    /// Multiplier on daily energy use
    pub fn energy_factor(&self) -> f64 {
        match self {
            Climate::Hot => 1.25,
            Climate::Moderate => 1.0,
            Climate::Cold => 0.75,
        }
    }
}

impl std::fmt::Display for Climate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Climate::Hot => write!(f, "hot"),
            Climate::Moderate => write!(f, "moderate"),
            Climate::Cold => write!(f, "cold"),
        }
    }
}

impl FromStr for Climate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hot" => Ok(Climate::Hot),
            "moderate" => Ok(Climate::Moderate),
            "cold" => Ok(Climate::Cold),
            other => Err(parse_error("climate", other, &["hot", "moderate", "cold"])),
        }
    }
}

/// Direct sun exposure of the room
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SunExposure {
    Low,
    #[default]
    Medium,
    High,
}

impl SunExposure {
    pub fn factor(&self) -> f64 {
        match self {
            SunExposure::Low => 0.9,
            SunExposure::Medium => 1.0,
            SunExposure::High => 1.1,
        }
    }
}

impl std::fmt::Display for SunExposure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SunExposure::Low => write!(f, "low"),
            SunExposure::Medium => write!(f, "medium"),
            SunExposure::High => write!(f, "high"),
        }
    }
}

impl FromStr for SunExposure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(SunExposure::Low),
            "medium" => Ok(SunExposure::Medium),
            "high" => Ok(SunExposure::High),
            other => Err(parse_error("sun exposure", other, &["low", "medium", "high"])),
        }
    }
}

/// Building envelope insulation quality
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Insulation {
    Poor,
    #[default]
    Average,
    Good,
}

impl Insulation {
    pub fn factor(&self) -> f64 {
        match self {
            Insulation::Poor => 1.2,
            Insulation::Average => 1.0,
            Insulation::Good => 0.8,
        }
    }
}

impl std::fmt::Display for Insulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Insulation::Poor => write!(f, "poor"),
            Insulation::Average => write!(f, "average"),
            Insulation::Good => write!(f, "good"),
        }
    }
}

impl FromStr for Insulation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "poor" => Ok(Insulation::Poor),
            "average" => Ok(Insulation::Average),
            "good" => Ok(Insulation::Good),
            other => Err(parse_error("insulation", other, &["poor", "average", "good"])),
        }
    }
}

/// Recommended ventilation band for a usage category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AchBand {
    pub min: f64,
    pub max: f64,
    pub ideal: f64,
}

/// How a space is used, which drives ventilation targets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoomUsage {
    #[default]
    Residential,
    Office,
    Commercial,
    Industrial,
}

impl RoomUsage {
    pub fn all() -> &'static [RoomUsage] {
        &[
            RoomUsage::Residential,
            RoomUsage::Office,
            RoomUsage::Commercial,
            RoomUsage::Industrial,
        ]
    }

    /// Air changes per hour assumed when none is given
    pub fn default_ach(&self) -> f64 {
        match self {
            RoomUsage::Residential => 4.0,
            RoomUsage::Office => 6.0,
            RoomUsage::Commercial => 8.0,
            RoomUsage::Industrial => 12.0,
        }
    }

    pub fn ach_band(&self) -> AchBand {
        match self {
            RoomUsage::Residential => AchBand { min: 3.0, max: 6.0, ideal: 4.0 },
            RoomUsage::Office => AchBand { min: 4.0, max: 8.0, ideal: 6.0 },
            RoomUsage::Commercial => AchBand { min: 6.0, max: 10.0, ideal: 8.0 },
            RoomUsage::Industrial => AchBand { min: 8.0, max: 20.0, ideal: 12.0 },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoomUsage::Residential => "Residential",
            RoomUsage::Office => "Office",
            RoomUsage::Commercial => "Commercial",
            RoomUsage::Industrial => "Industrial",
        }
    }
}

impl std::fmt::Display for RoomUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomUsage::Residential => write!(f, "residential"),
            RoomUsage::Office => write!(f, "office"),
            RoomUsage::Commercial => write!(f, "commercial"),
            RoomUsage::Industrial => write!(f, "industrial"),
        }
    }
}

impl FromStr for RoomUsage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "residential" => Ok(RoomUsage::Residential),
            "office" => Ok(RoomUsage::Office),
            "commercial" => Ok(RoomUsage::Commercial),
            "industrial" => Ok(RoomUsage::Industrial),
            other => Err(parse_error(
                "room usage",
                other,
                &["residential", "office", "commercial", "industrial"],
            )),
        }
    }
}

/// Duct cross-section shape
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum DuctShape {
    #[default]
    Round,
    Rectangular,
}

impl std::fmt::Display for DuctShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuctShape::Round => write!(f, "round"),
            DuctShape::Rectangular => write!(f, "rectangular"),
        }
    }
}

impl FromStr for DuctShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "round" => Ok(DuctShape::Round),
            "rectangular" | "rect" => Ok(DuctShape::Rectangular),
            other => Err(parse_error("duct shape", other, &["round", "rectangular"])),
        }
    }
}
