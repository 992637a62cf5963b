//! Energy cost calculator
//!
//! ```text
//! kW        = tons × 12 / EER
//! kWh/day   = kW × hours/day × climate multiplier
//! cost/day  = kWh/day × rate
//! cost/month = cost/day × 30, cost/year = cost/day × 365
//! ```

use crate::calc::error::{or_default, require_positive, CalcError, CalcResult};
use crate::calc::factors::Climate;
use crate::calc::round_to;
use serde::{Deserialize, Serialize};

/// 12000 BTU/h per ton divided by 1000 W/kW
pub const KW_PER_TON_EER: f64 = 12.0;

/// Run time assumed when none is given
pub const DEFAULT_HOURS_PER_DAY: f64 = 8.0;

pub const MAX_HOURS_PER_DAY: f64 = 24.0;

const DAYS_PER_MONTH: f64 = 30.0;
const DAYS_PER_YEAR: f64 = 365.0;

/// Energy cost input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnergyInput {
    /// Cooling capacity in tons
    pub capacity_tons: f64,
    /// Energy efficiency ratio (BTU/h per W)
    pub efficiency: f64,
    /// Electricity price per kWh
    pub rate_per_kwh: f64,
    /// `None` or zero uses the default
    pub hours_per_day: Option<f64>,
    pub climate: Climate,
}

/// Projected running cost
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnergyCostResult {
    pub capacity_tons: f64,
    pub efficiency: f64,
    pub rate_per_kwh: f64,
    pub hours_per_day: f64,
    pub climate: Climate,
    /// Electrical draw in kW
    pub power_kw: f64,
    pub daily_kwh: f64,
    pub daily_cost: f64,
    pub monthly_cost: f64,
    pub yearly_cost: f64,
}

/// Estimate electricity use and cost for a cooling system
pub fn energy_cost(input: &EnergyInput) -> CalcResult<EnergyCostResult> {
    let capacity_tons = require_positive("capacity", input.capacity_tons)?;
    let efficiency = require_positive("efficiency rating", input.efficiency)?;
    let rate_per_kwh = require_positive("electricity rate", input.rate_per_kwh)?;
    let hours_per_day = or_default("hours per day", input.hours_per_day, DEFAULT_HOURS_PER_DAY)?;
    if hours_per_day > MAX_HOURS_PER_DAY {
        return Err(CalcError::InvalidInput {
            field: "hours per day",
            reason: format!("{} exceeds {}", hours_per_day, MAX_HOURS_PER_DAY),
        });
    }

    let power_kw = capacity_tons * KW_PER_TON_EER / efficiency;
    let daily_kwh = power_kw * hours_per_day * input.climate.energy_factor();
    let daily_cost = daily_kwh * rate_per_kwh;

    Ok(EnergyCostResult {
        capacity_tons,
        efficiency,
        rate_per_kwh,
        hours_per_day,
        climate: input.climate,
        power_kw: round_to(power_kw, 2),
        daily_kwh: round_to(daily_kwh, 2),
        daily_cost: round_to(daily_cost, 2),
        monthly_cost: round_to(daily_cost * DAYS_PER_MONTH, 2),
        yearly_cost: round_to(daily_cost * DAYS_PER_YEAR, 2),
    })
}
