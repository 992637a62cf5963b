//! Service Requests
//!
//! The request form: shared contact fields plus a category-specific detail
//! block. Submission is local only; the payload is logged and a receipt
//! handed back.

use crate::services::catalog::{Frequency, ServiceCategory};
use crate::services::error::{ServiceError, ServiceResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

/// Installation capacity bounds in tons
pub const MIN_CAPACITY_TONS: u32 = 1;
pub const MAX_CAPACITY_TONS: u32 = 100;

/// Declares a lowercase string-valued form choice with `Display`/`FromStr`
macro_rules! form_choice {
    ($(#[$meta:meta])* $name:ident, $label:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $($name::$variant => write!(f, $text)),+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!(
                        concat!("unknown ", $label, " '{}' (expected", $(" ", $text),+, ")"),
                        other
                    )),
                }
            }
        }
    };
}

form_choice!(
    /// Depth of a maintenance visit
    MaintenanceType, "maintenance type" {
        Basic => "basic",
        Comprehensive => "comprehensive",
        Emergency => "emergency",
    }
);

form_choice!(
    IssueType, "issue type" {
        Electrical => "electrical",
        Mechanical => "mechanical",
        Cooling => "cooling",
        Other => "other",
    }
);

form_choice!(
    Urgency, "urgency" {
        Low => "low",
        Medium => "medium",
        High => "high",
        Emergency => "emergency",
    }
);

form_choice!(
    /// Installed system family; `vrv` covers VRV/VRF
    SystemType, "system type" {
        Split => "split",
        Central => "central",
        Vrv => "vrv",
        Package => "package",
    }
);

/// Category-specific part of the form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "serviceType", rename_all = "lowercase")]
pub enum RequestDetails {
    #[serde(rename_all = "camelCase")]
    Maintenance {
        maintenance_type: MaintenanceType,
        frequency: Frequency,
    },
    #[serde(rename_all = "camelCase")]
    Repair { issue_type: IssueType, urgency: Urgency },
    #[serde(rename_all = "camelCase")]
    Installation {
        system_type: SystemType,
        capacity_tons: u32,
    },
}

impl RequestDetails {
    pub fn category(&self) -> ServiceCategory {
        match self {
            RequestDetails::Maintenance { .. } => ServiceCategory::Maintenance,
            RequestDetails::Repair { .. } => ServiceCategory::Repair,
            RequestDetails::Installation { .. } => ServiceCategory::Installation,
        }
    }
}

/// A filled-in service request form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceRequest {
    pub name: String,
    pub phone: String,
    pub location: String,
    #[serde(flatten)]
    pub details: RequestDetails,
}

impl ServiceRequest {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        location: impl Into<String>,
        details: RequestDetails,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            location: location.into(),
            details,
        }
    }

    pub fn category(&self) -> ServiceCategory {
        self.details.category()
    }

    pub fn validate(&self) -> ServiceResult<()> {
        for (field, value) in [
            ("name", &self.name),
            ("phone", &self.phone),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                return Err(ServiceError::Validation(format!("{} is required", field)));
            }
        }

        if let RequestDetails::Installation { capacity_tons, .. } = self.details {
            if !(MIN_CAPACITY_TONS..=MAX_CAPACITY_TONS).contains(&capacity_tons) {
                return Err(ServiceError::Validation(format!(
                    "capacity must be between {} and {} tons, got {}",
                    MIN_CAPACITY_TONS, MAX_CAPACITY_TONS, capacity_tons
                )));
            }
        }

        Ok(())
    }
}

/// Acknowledgement for a submitted request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub reference: Uuid,
    pub category: ServiceCategory,
    pub submitted_at: DateTime<Utc>,
    pub message: String,
}

/// Validate and "send" a request
///
/// Nothing is persisted; the payload only goes to the log.
pub fn submit(request: &ServiceRequest) -> ServiceResult<SubmissionReceipt> {
    request.validate()?;

    let reference = Uuid::new_v4();
    let payload = serde_json::to_string(request)
        .map_err(|e| ServiceError::Validation(format!("unserializable request: {}", e)))?;

    info!(%reference, category = %request.category(), payload = %payload, "Service request submitted");
    debug!(name = %request.name, phone = %request.phone, "Request contact");

    Ok(SubmissionReceipt {
        reference,
        category: request.category(),
        submitted_at: Utc::now(),
        message: "Service request sent. Our team will contact you shortly.".to_string(),
    })
}
