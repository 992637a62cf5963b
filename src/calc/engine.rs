//! Calculation Engine
//!
//! Runs a calculator, and on success appends the result to the shared
//! history. A rejected input returns before anything is written.

use crate::calc::airflow::{air_changes, airflow, AirChangeInput, AirChangeResult, AirflowInput, AirflowResult};
use crate::calc::cooling::{cooling_load, CoolingLoadInput, CoolingLoadResult};
use crate::calc::duct::{duct_size, DuctInput, DuctSizeResult, DEFAULT_ASPECT_RATIO, DEFAULT_VELOCITY_FPM};
use crate::calc::energy::{energy_cost, EnergyCostResult, EnergyInput, DEFAULT_HOURS_PER_DAY};
use crate::calc::error::CalcResult;
use crate::calc::history::{CalculationHistory, CalculationResult, DEFAULT_VIEW_LIMIT};
use crate::storage::SharedStore;

/// Defaults applied when an optional calculator input is left out
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorSettings {
    /// Records shown per kind in history views
    pub history_view_limit: usize,
    /// Duct air velocity (FPM)
    pub default_duct_velocity: f64,
    /// Rectangular duct width/height ratio
    pub duct_aspect_ratio: f64,
    /// Daily run time for energy estimates
    pub energy_hours_per_day: f64,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        Self {
            history_view_limit: DEFAULT_VIEW_LIMIT,
            default_duct_velocity: DEFAULT_VELOCITY_FPM,
            duct_aspect_ratio: DEFAULT_ASPECT_RATIO,
            energy_hours_per_day: DEFAULT_HOURS_PER_DAY,
        }
    }
}

/// A result together with the id of its history record
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded<T> {
    pub id: i64,
    pub result: T,
}

/// Calculators bound to the shared history
pub struct CalculationEngine {
    history: CalculationHistory,
    settings: CalculatorSettings,
}

impl CalculationEngine {
    pub fn new(store: SharedStore) -> Self {
        Self::with_settings(store, CalculatorSettings::default())
    }

    pub fn with_settings(store: SharedStore, settings: CalculatorSettings) -> Self {
        Self {
            history: CalculationHistory::with_view_limit(store, settings.history_view_limit),
            settings,
        }
    }

    pub fn history(&self) -> &CalculationHistory {
        &self.history
    }

    pub fn settings(&self) -> &CalculatorSettings {
        &self.settings
    }

    pub fn cooling_load(&self, input: &CoolingLoadInput) -> CalcResult<Recorded<CoolingLoadResult>> {
        let result = cooling_load(input)?;
        self.record(CalculationResult::Btu(result.clone()), result)
    }

    pub fn airflow(&self, input: &AirflowInput) -> CalcResult<Recorded<AirflowResult>> {
        let result = airflow(input)?;
        self.record(CalculationResult::Cfm(result.clone()), result)
    }

    pub fn air_changes(&self, input: &AirChangeInput) -> CalcResult<Recorded<AirChangeResult>> {
        let result = air_changes(input)?;
        self.record(CalculationResult::Ach(result.clone()), result)
    }

    pub fn duct_size(&self, input: &DuctInput) -> CalcResult<Recorded<DuctSizeResult>> {
        let mut input = input.clone();
        if input.velocity.map_or(true, |v| v == 0.0) {
            input.velocity = Some(self.settings.default_duct_velocity);
        }
        if input.aspect_ratio.map_or(true, |r| r == 0.0) {
            input.aspect_ratio = Some(self.settings.duct_aspect_ratio);
        }

        let result = duct_size(&input)?;
        self.record(CalculationResult::Duct(result.clone()), result)
    }

    pub fn energy_cost(&self, input: &EnergyInput) -> CalcResult<Recorded<EnergyCostResult>> {
        let mut input = input.clone();
        if input.hours_per_day.map_or(true, |h| h == 0.0) {
            input.hours_per_day = Some(self.settings.energy_hours_per_day);
        }

        let result = energy_cost(&input)?;
        self.record(CalculationResult::Energy(result.clone()), result)
    }

    fn record<T>(&self, entry: CalculationResult, result: T) -> CalcResult<Recorded<T>> {
        let record = self.history.record(entry)?;
        Ok(Recorded {
            id: record.id,
            result,
        })
    }
}
