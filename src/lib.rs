//! # ColdCloud
//!
//! The engine behind an HVAC services site: customer accounts, sizing and
//! cost calculators with a shared history, and a service catalog with a
//! request form.
//!
//! ## Features
//!
//! - **Accounts**: register, log in, update a profile; one active session
//! - **Calculators**: cooling load (BTU), airflow (CFM), air changes (ACH),
//!   duct sizing and energy cost, each recorded in history
//! - **Services**: maintenance plans, repair and installation requests,
//!   orders linked to the customer's account
//! - **Storage**: whole-value JSON documents in a key-value store, in memory
//!   or one file per key
//!
//! ## Modules
//!
//! - [`storage`]: key-value store and typed JSON collections
//! - [`auth`]: account store and session
//! - [`calc`]: calculators, factor tables and history
//! - [`services`]: catalog, request form and order book
//! - [`app`]: wiring and notifications
//!
//! ## Quick Start
//!
//! ```rust
//! use coldcloud::app::App;
//! use coldcloud::calc::{CalculatorSettings, CoolingLoadInput, RoomType};
//! use coldcloud::notify::TracingNotifier;
//! use coldcloud::storage::MemoryStore;
//! use std::sync::Arc;
//!
//! let app = App::new(
//!     MemoryStore::shared(),
//!     CalculatorSettings::default(),
//!     Arc::new(TracingNotifier),
//! )
//! .unwrap();
//!
//! app.login("ahmed@example.com", "123456").unwrap();
//! let load = app
//!     .cooling_load(&CoolingLoadInput::new(5.0, 4.0, 3.0).room_type(RoomType::Bedroom).occupants(2))
//!     .unwrap();
//! assert_eq!(load.result.total_btu, 7200);
//! assert_eq!(app.current_user().unwrap().calculations, vec![load.id]);
//! ```

pub mod app;
pub mod auth;
pub mod calc;
pub mod config;
pub mod notify;
pub mod services;
pub mod storage;

// Re-export top-level types for convenience
pub use app::{App, AppError, AppResult};

pub use auth::{AccountStore, AuthError, AuthResult, ProfilePatch, Registration, User, UserType};

pub use calc::{CalcError, CalcResult, CalculationEngine, CalculationHistory, CalculationKind};

pub use config::{generate_default_config, Config, ConfigError, LoggingConfig};

pub use notify::{ConsoleNotifier, Notification, NotificationLevel, Notifier, TracingNotifier};

pub use services::{ServiceCatalog, ServiceError, ServiceOrderBook, ServiceRequest};

pub use storage::{FileStore, KeyValueStore, MemoryStore, SharedStore, StorageError, StorageResult};
