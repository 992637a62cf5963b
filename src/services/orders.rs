//! Service Orders
//!
//! Services a user has added to their account, kept in the services
//! collection.

use crate::services::catalog::{ServiceCategory, ServiceOffering};
use crate::services::error::{ServiceError, ServiceResult};
use crate::storage::{load_list, next_id, save_json, SharedStore, SERVICES_KEY};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Cancelled => "cancelled",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    pub id: i64,
    pub user_id: i64,
    pub offering_id: u32,
    pub category: ServiceCategory,
    pub title: String,
    #[serde(default)]
    pub plan: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: OrderStatus,
}

/// Persistent list of service orders
pub struct ServiceOrderBook {
    store: SharedStore,
}

impl ServiceOrderBook {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn all(&self) -> ServiceResult<Vec<ServiceOrder>> {
        Ok(load_list(self.store.as_ref(), SERVICES_KEY)?)
    }

    /// Create a pending order for `offering`
    ///
    /// Offerings with plans require one of them to be named; plan-less
    /// offerings ignore `plan`.
    pub fn place(
        &self,
        user_id: i64,
        offering: &ServiceOffering,
        plan: Option<&str>,
    ) -> ServiceResult<ServiceOrder> {
        let plan = if offering.plans.is_empty() {
            None
        } else {
            let name = plan.ok_or_else(|| {
                ServiceError::Validation(format!("'{}' requires a plan", offering.title))
            })?;
            let found = offering.plan(name).ok_or_else(|| {
                ServiceError::NotFound(format!("plan '{}' in '{}'", name, offering.title))
            })?;
            Some(found.name.clone())
        };

        let mut orders = self.all()?;
        let order = ServiceOrder {
            id: next_id(orders.iter().map(|o| o.id)),
            user_id,
            offering_id: offering.id,
            category: offering.category,
            title: offering.title.clone(),
            plan,
            created_at: Utc::now(),
            status: OrderStatus::Pending,
        };
        orders.push(order.clone());
        save_json(self.store.as_ref(), SERVICES_KEY, &orders)?;

        info!(order_id = order.id, user_id, category = %order.category, "Service order placed");
        Ok(order)
    }

    pub fn for_user(&self, user_id: i64) -> ServiceResult<Vec<ServiceOrder>> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|o| o.user_id == user_id)
            .collect())
    }

    /// Delete an order outright
    pub fn remove(&self, order_id: i64) -> ServiceResult<()> {
        let mut orders = self.all()?;
        orders.retain(|o| o.id != order_id);
        save_json(self.store.as_ref(), SERVICES_KEY, &orders)?;
        Ok(())
    }

    /// Mark a user's order cancelled
    pub fn cancel(&self, user_id: i64, order_id: i64) -> ServiceResult<ServiceOrder> {
        let mut orders = self.all()?;
        let order = orders
            .iter_mut()
            .find(|o| o.id == order_id && o.user_id == user_id)
            .ok_or_else(|| ServiceError::NotFound(format!("order {}", order_id)))?;
        order.status = OrderStatus::Cancelled;
        let cancelled = order.clone();

        save_json(self.store.as_ref(), SERVICES_KEY, &orders)?;
        Ok(cancelled)
    }
}
