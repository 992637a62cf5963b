//! Service Catalog
//!
//! Static reference data: the offerings the company sells and the plans
//! under each one, plus the pricing and scheduling helpers used by the
//! plan picker.

use crate::services::error::{ServiceError, ServiceResult};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Hotline shown for emergency service
pub const EMERGENCY_HOTLINE: &str = "920012345";

/// Top-level service category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Maintenance,
    Repair,
    Installation,
}

impl std::fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceCategory::Maintenance => write!(f, "maintenance"),
            ServiceCategory::Repair => write!(f, "repair"),
            ServiceCategory::Installation => write!(f, "installation"),
        }
    }
}

impl FromStr for ServiceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "maintenance" => Ok(ServiceCategory::Maintenance),
            "repair" => Ok(ServiceCategory::Repair),
            "installation" => Ok(ServiceCategory::Installation),
            other => Err(format!(
                "unknown service category '{}' (expected maintenance, repair or installation)",
                other
            )),
        }
    }
}

/// A priced package within an offering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServicePlan {
    pub name: String,
    /// Yearly price
    pub price: f64,
    pub features: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

impl ServicePlan {
    fn new(name: &str, price: f64, features: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            price,
            features: strings(features),
            featured: false,
        }
    }

    fn featured(mut self) -> Self {
        self.featured = true;
        self
    }
}

/// One line of business
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceOffering {
    pub id: u32,
    pub category: ServiceCategory,
    pub title: String,
    pub description: String,
    pub features: Vec<String>,
    #[serde(default)]
    pub plans: Vec<ServicePlan>,
}

impl ServiceOffering {
    /// Case-insensitive plan lookup
    pub fn plan(&self, name: &str) -> Option<&ServicePlan> {
        self.plans
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }
}

/// Add-on priced on top of a plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtraService {
    pub name: String,
    /// Missing cost counts as free
    #[serde(default)]
    pub cost: Option<f64>,
}

/// How often a maintenance visit recurs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Monthly,
    #[default]
    Quarterly,
    Biannual,
    Annual,
}

impl Frequency {
    pub fn months(&self) -> u32 {
        match self {
            Frequency::Monthly => 1,
            Frequency::Quarterly => 3,
            Frequency::Biannual => 6,
            Frequency::Annual => 12,
        }
    }

    /// Date of the visit following `date`
    ///
    /// Month-end dates clamp to the last day of the target month.
    pub fn next_after(&self, date: NaiveDate) -> Option<NaiveDate> {
        date.checked_add_months(Months::new(self.months()))
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Monthly => write!(f, "monthly"),
            Frequency::Quarterly => write!(f, "quarterly"),
            Frequency::Biannual => write!(f, "biannual"),
            Frequency::Annual => write!(f, "annual"),
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "biannual" => Ok(Frequency::Biannual),
            "annual" => Ok(Frequency::Annual),
            other => Err(format!(
                "unknown frequency '{}' (expected monthly, quarterly, biannual or annual)",
                other
            )),
        }
    }
}

/// First and next visit for a maintenance plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceSchedule {
    pub plan: String,
    pub start_date: NaiveDate,
    pub frequency: Frequency,
    pub next_service: NaiveDate,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Read-only list of offerings
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    offerings: Vec<ServiceOffering>,
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl ServiceCatalog {
    pub fn new(offerings: Vec<ServiceOffering>) -> Self {
        Self { offerings }
    }

    /// The company's published offerings
    pub fn standard() -> Self {
        Self::new(vec![
            ServiceOffering {
                id: 1,
                category: ServiceCategory::Maintenance,
                title: "Preventive Maintenance".to_string(),
                description: "Scheduled maintenance programs that keep systems running efficiently"
                    .to_string(),
                features: strings(&[
                    "Comprehensive periodic inspection",
                    "Cleaning and parts replacement",
                    "Detailed performance reports",
                ]),
                plans: vec![
                    ServicePlan::new(
                        "Basic",
                        500.0,
                        &[
                            "4 maintenance visits per year",
                            "Full equipment inspection",
                            "Filter cleaning",
                            "Detailed technical report",
                        ],
                    ),
                    ServicePlan::new(
                        "Advanced",
                        800.0,
                        &[
                            "6 maintenance visits per year",
                            "Advanced inspection",
                            "Full system cleaning",
                            "Priority emergency service",
                            "Monthly performance reports",
                        ],
                    )
                    .featured(),
                    ServicePlan::new(
                        "Comprehensive",
                        1200.0,
                        &[
                            "12 maintenance visits per year",
                            "Advanced inspection",
                            "Complete preventive maintenance",
                            "Top service priority",
                            "Weekly performance reports",
                            "Free emergency service",
                        ],
                    ),
                ],
            },
            ServiceOffering {
                id: 2,
                category: ServiceCategory::Repair,
                title: "Fault Repair".to_string(),
                description: "Fast, professional repair for emergencies and sudden breakdowns"
                    .to_string(),
                features: strings(&["24/7 emergency line", "Specialist technicians", "Genuine spare parts"]),
                plans: Vec::new(),
            },
            ServiceOffering {
                id: 3,
                category: ServiceCategory::Installation,
                title: "System Installation".to_string(),
                description: "Design and installation of split, central, VRF and package systems"
                    .to_string(),
                features: strings(&["Load calculation", "Duct design", "Commissioning and handover"]),
                plans: Vec::new(),
            },
        ])
    }

    pub fn all(&self) -> &[ServiceOffering] {
        &self.offerings
    }

    pub fn get(&self, id: u32) -> Option<&ServiceOffering> {
        self.offerings.iter().find(|o| o.id == id)
    }

    pub fn by_category(&self, category: ServiceCategory) -> Vec<&ServiceOffering> {
        self.offerings
            .iter()
            .filter(|o| o.category == category)
            .collect()
    }

    /// Find a plan by name across all offerings
    pub fn find_plan(&self, name: &str) -> Option<&ServicePlan> {
        self.offerings.iter().find_map(|o| o.plan(name))
    }

    pub fn emergency_contact(&self) -> &'static str {
        EMERGENCY_HOTLINE
    }
}

/// Plan price plus any add-ons
pub fn maintenance_cost(plan: &ServicePlan, extras: &[ExtraService]) -> f64 {
    plan.price + extras.iter().map(|e| e.cost.unwrap_or(0.0)).sum::<f64>()
}

/// Build the visit schedule for a plan starting on `start`
pub fn schedule_maintenance(
    plan: &ServicePlan,
    start: NaiveDate,
    frequency: Frequency,
) -> ServiceResult<MaintenanceSchedule> {
    let next_service = frequency.next_after(start).ok_or_else(|| {
        ServiceError::Validation(format!("cannot schedule past {}", start))
    })?;

    Ok(MaintenanceSchedule {
        plan: plan.name.clone(),
        start_date: start,
        frequency,
        next_service,
    })
}
