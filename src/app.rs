//! Application wiring
//!
//! `App` owns the account store, the calculation engine, the service
//! catalog and the order book, all over one shared key-value store. It is
//! the only layer that turns outcomes into notifications: every operation
//! returns `Some` on success and `None` after reporting the failure.

use crate::auth::{AccountStore, AuthError, ProfilePatch, Registration, User};
use crate::calc::{
    AirChangeInput, AirChangeResult, AirflowInput, AirflowResult, CalcError, CalcResult,
    CalculationEngine, CalculationKind, CalculationRecord, CalculatorSettings, CoolingLoadInput,
    CoolingLoadResult, DuctInput, DuctSizeResult, EnergyCostResult, EnergyInput, ExportFormat,
    Recorded,
};
use crate::config::Config;
use crate::notify::{Notification, Notifier};
use crate::services::{
    maintenance_cost, schedule_maintenance, submit, ExtraService, Frequency, MaintenanceSchedule,
    ServiceCatalog, ServiceError, ServiceOrder, ServiceOrderBook, ServiceRequest,
    SubmissionReceipt,
};
use crate::storage::{FileStore, SharedStore, StorageError};
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type AppResult<T> = Result<T, AppError>;

pub struct App {
    accounts: AccountStore,
    engine: CalculationEngine,
    catalog: ServiceCatalog,
    orders: ServiceOrderBook,
    notifier: Arc<dyn Notifier>,
}

impl App {
    pub fn new(
        store: SharedStore,
        settings: CalculatorSettings,
        notifier: Arc<dyn Notifier>,
    ) -> AppResult<Self> {
        Ok(Self {
            accounts: AccountStore::open(Arc::clone(&store))?,
            engine: CalculationEngine::with_settings(Arc::clone(&store), settings),
            catalog: ServiceCatalog::standard(),
            orders: ServiceOrderBook::new(store),
            notifier,
        })
    }

    /// Build over the file store in the configured data directory
    pub fn open(config: &Config, notifier: Arc<dyn Notifier>) -> AppResult<Self> {
        let data_dir = config.data_dir();
        tracing::debug!("Data directory: {:?}", data_dir);

        let store: SharedStore = Arc::new(FileStore::open(data_dir)?);
        Self::new(store, config.calculator.to_settings(), notifier)
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &CalculatorSettings {
        self.engine.settings()
    }

    // Accounts

    pub fn register(&self, registration: Registration) -> Option<User> {
        let result = self.accounts.register(registration).map_err(AppError::from);
        self.report(result, |user| {
            Notification::success(format!("Account created. Welcome, {}!", user.first_name))
        })
    }

    pub fn login(&self, email: &str, password: &str) -> Option<User> {
        let result = self.accounts.login(email, password).map_err(AppError::from);
        self.report(result, |user| {
            Notification::success(format!("Welcome back, {}", user.full_name()))
        })
    }

    pub fn logout(&self) -> Option<()> {
        let result = self.accounts.logout().map_err(AppError::from);
        self.report(result, |_| Notification::info("You have been logged out"))
    }

    /// The logged-in user; `None` without a notification when logged out
    pub fn current_user(&self) -> Option<User> {
        self.quiet(self.accounts.current_user().map_err(AppError::from))
            .flatten()
    }

    pub fn update_profile(&self, patch: ProfilePatch) -> Option<User> {
        let result: AppResult<User> = if patch.is_empty() {
            Err(AuthError::Validation("No profile changes given".to_string()).into())
        } else {
            self.accounts.update_profile(patch).map_err(AppError::from)
        };
        self.report(result, |_| Notification::success("Profile updated"))
    }

    /// Deactivate the logged-in account and end its session
    pub fn deactivate(&self) -> Option<User> {
        let result = self.require_user().and_then(|user| {
            let user = self.accounts.deactivate(user.id)?;
            self.accounts.logout()?;
            Ok(user)
        });
        self.report(result, |_| Notification::warning("Account deactivated"))
    }

    // Calculators

    pub fn cooling_load(&self, input: &CoolingLoadInput) -> Option<Recorded<CoolingLoadResult>> {
        self.calculate(|engine| engine.cooling_load(input))
    }

    pub fn airflow(&self, input: &AirflowInput) -> Option<Recorded<AirflowResult>> {
        self.calculate(|engine| engine.airflow(input))
    }

    pub fn air_changes(&self, input: &AirChangeInput) -> Option<Recorded<AirChangeResult>> {
        self.calculate(|engine| engine.air_changes(input))
    }

    pub fn duct_size(&self, input: &DuctInput) -> Option<Recorded<DuctSizeResult>> {
        self.calculate(|engine| engine.duct_size(input))
    }

    pub fn energy_cost(&self, input: &EnergyInput) -> Option<Recorded<EnergyCostResult>> {
        self.calculate(|engine| engine.energy_cost(input))
    }

    /// Recent records of one kind, or the whole history
    pub fn history(&self, kind: Option<CalculationKind>) -> Option<Vec<CalculationRecord>> {
        let history = self.engine.history();
        let result = match kind {
            Some(kind) => history.recent(kind),
            None => history.all(),
        };
        self.quiet(result.map_err(AppError::from))
    }

    /// History records linked to the logged-in user, optionally one kind
    /// capped like `history`
    pub fn user_calculations(
        &self,
        kind: Option<CalculationKind>,
    ) -> Option<Vec<CalculationRecord>> {
        let result = self.require_user().and_then(|user| {
            let history = self.engine.history();
            let records = match kind {
                Some(kind) => history.recent_by_ids(&user.calculations, kind)?,
                None => history.by_ids(&user.calculations)?,
            };
            Ok(records)
        });
        self.quiet(result)
    }

    pub fn clear_history(&self) -> Option<()> {
        let result = self.engine.history().clear().map_err(AppError::from);
        self.report(result, |_| Notification::success("Calculation history cleared"))
    }

    pub fn export_history(&self, format: ExportFormat) -> Option<String> {
        self.quiet(self.engine.history().export(format).map_err(AppError::from))
    }

    // Services

    pub fn submit_request(&self, request: &ServiceRequest) -> Option<SubmissionReceipt> {
        let result = submit(request).map_err(AppError::from);
        self.report(result, |receipt| Notification::success(receipt.message.clone()))
    }

    /// Add a catalog offering to the logged-in user's account
    ///
    /// The order is removed again if it cannot be linked to the user.
    pub fn order_service(&self, offering_id: u32, plan: Option<&str>) -> Option<ServiceOrder> {
        let result = self.require_user().and_then(|user| {
            let offering = self
                .catalog
                .get(offering_id)
                .ok_or_else(|| ServiceError::NotFound(format!("service {}", offering_id)))?;
            let order = self.orders.place(user.id, offering, plan)?;
            if let Err(err) = self.accounts.link_service(order.id) {
                if let Err(undo) = self.orders.remove(order.id) {
                    tracing::error!(order_id = order.id, error = %undo, "Could not roll back order");
                }
                return Err(err.into());
            }
            Ok(order)
        });
        self.report(result, |order| {
            Notification::success(format!("{} added to your account", order.title))
        })
    }

    pub fn my_orders(&self) -> Option<Vec<ServiceOrder>> {
        let result = self
            .require_user()
            .and_then(|user| Ok(self.orders.for_user(user.id)?));
        self.quiet(result)
    }

    pub fn cancel_order(&self, order_id: i64) -> Option<ServiceOrder> {
        let result = self
            .require_user()
            .and_then(|user| Ok(self.orders.cancel(user.id, order_id)?));
        self.report(result, |order| {
            Notification::info(format!("Order {} cancelled", order.id))
        })
    }

    /// Price of a maintenance plan with add-ons
    pub fn quote(&self, plan: &str, extras: &[ExtraService]) -> Option<f64> {
        let result: AppResult<f64> = self
            .catalog
            .find_plan(plan)
            .map(|p| maintenance_cost(p, extras))
            .ok_or_else(|| ServiceError::NotFound(format!("plan '{}'", plan)).into());
        self.quiet(result)
    }

    pub fn schedule_maintenance(
        &self,
        plan: &str,
        start: NaiveDate,
        frequency: Frequency,
    ) -> Option<MaintenanceSchedule> {
        let result = self
            .catalog
            .find_plan(plan)
            .ok_or_else(|| ServiceError::NotFound(format!("plan '{}'", plan)))
            .and_then(|p| schedule_maintenance(p, start, frequency))
            .map_err(AppError::from);
        self.report(result, |schedule| {
            Notification::info(format!("Next service on {}", schedule.next_service))
        })
    }

    pub fn emergency_contact(&self) -> &'static str {
        self.catalog.emergency_contact()
    }

    fn require_user(&self) -> AppResult<User> {
        self.accounts
            .current_user()?
            .ok_or(AppError::Auth(AuthError::NotAuthenticated))
    }

    /// Run a calculator and link the record to the logged-in user
    ///
    /// The user is resolved before anything is written. A record that
    /// cannot be linked is removed from history again.
    fn calculate<T>(
        &self,
        run: impl FnOnce(&CalculationEngine) -> CalcResult<Recorded<T>>,
    ) -> Option<Recorded<T>> {
        let result = self.accounts.current_user().map_err(AppError::from).and_then(|user| {
            let recorded = run(&self.engine)?;
            if user.is_some() {
                if let Err(err) = self.accounts.link_calculation(recorded.id) {
                    if let Err(undo) = self.engine.history().remove(recorded.id) {
                        tracing::error!(
                            id = recorded.id,
                            error = %undo,
                            "Could not roll back calculation"
                        );
                    }
                    return Err(err.into());
                }
            }
            Ok(recorded)
        });
        self.report(result, |_| Notification::success("Calculation saved to history"))
    }

    fn report<T>(
        &self,
        result: AppResult<T>,
        on_success: impl FnOnce(&T) -> Notification,
    ) -> Option<T> {
        match result {
            Ok(value) => {
                self.notifier.notify(on_success(&value));
                Some(value)
            }
            Err(err) => {
                self.fail(err);
                None
            }
        }
    }

    fn quiet<T>(&self, result: AppResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.fail(err);
                None
            }
        }
    }

    fn fail(&self, err: AppError) {
        if matches!(err, AppError::Storage(_))
            || matches!(err, AppError::Auth(AuthError::Storage(_)))
            || matches!(err, AppError::Calc(CalcError::Storage(_)))
            || matches!(err, AppError::Service(ServiceError::Storage(_)))
        {
            tracing::error!(error = %err, "Storage failure");
        } else {
            tracing::debug!(error = %err, "Operation rejected");
        }
        self.notifier.notify(Notification::error(err.to_string()));
    }
}
