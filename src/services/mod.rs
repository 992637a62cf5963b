//! Service catalog, request form and order book

pub mod catalog;
pub mod error;
pub mod orders;
pub mod request;

pub use catalog::{
    maintenance_cost, schedule_maintenance, ExtraService, Frequency, MaintenanceSchedule,
    ServiceCatalog, ServiceCategory, ServiceOffering, ServicePlan, EMERGENCY_HOTLINE,
};
pub use error::{ServiceError, ServiceResult};
pub use orders::{OrderStatus, ServiceOrder, ServiceOrderBook};
pub use request::{
    submit, IssueType, MaintenanceType, RequestDetails, ServiceRequest, SubmissionReceipt,
    SystemType, Urgency,
};
