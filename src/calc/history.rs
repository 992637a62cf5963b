//! Calculation history
//!
//! One list shared by every calculator, newest first. Records are
//! prepended; removal is either the whole list or a single record whose
//! save is being rolled back.

use crate::calc::airflow::{AirChangeResult, AirflowResult};
use crate::calc::cooling::CoolingLoadResult;
use crate::calc::duct::{DuctDimensions, DuctSizeResult};
use crate::calc::energy::EnergyCostResult;
use crate::calc::error::{CalcError, CalcResult};
use crate::storage::{load_list, next_id, save_json, SharedStore, HISTORY_KEY};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Records shown per kind unless configured otherwise
pub const DEFAULT_VIEW_LIMIT: usize = 5;

/// Which calculator produced a record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CalculationKind {
    Btu,
    Cfm,
    Ach,
    Duct,
    Energy,
}

impl CalculationKind {
    pub fn all() -> &'static [CalculationKind] {
        &[
            CalculationKind::Btu,
            CalculationKind::Cfm,
            CalculationKind::Ach,
            CalculationKind::Duct,
            CalculationKind::Energy,
        ]
    }
}

impl std::fmt::Display for CalculationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CalculationKind::Btu => "btu",
            CalculationKind::Cfm => "cfm",
            CalculationKind::Ach => "ach",
            CalculationKind::Duct => "duct",
            CalculationKind::Energy => "energy",
        };
        f.pad(name)
    }
}

impl FromStr for CalculationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "btu" => Ok(CalculationKind::Btu),
            "cfm" => Ok(CalculationKind::Cfm),
            "ach" => Ok(CalculationKind::Ach),
            "duct" => Ok(CalculationKind::Duct),
            "energy" => Ok(CalculationKind::Energy),
            other => Err(format!(
                "unknown calculation kind '{}' (expected btu, cfm, ach, duct or energy)",
                other
            )),
        }
    }
}

/// Kind-specific payload of a record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum CalculationResult {
    Btu(CoolingLoadResult),
    Cfm(AirflowResult),
    Ach(AirChangeResult),
    Duct(DuctSizeResult),
    Energy(EnergyCostResult),
}

impl CalculationResult {
    pub fn kind(&self) -> CalculationKind {
        match self {
            CalculationResult::Btu(_) => CalculationKind::Btu,
            CalculationResult::Cfm(_) => CalculationKind::Cfm,
            CalculationResult::Ach(_) => CalculationKind::Ach,
            CalculationResult::Duct(_) => CalculationKind::Duct,
            CalculationResult::Energy(_) => CalculationKind::Energy,
        }
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        match self {
            CalculationResult::Btu(r) => format!(
                "{:.1} m³ {} → {} BTU ({} t)",
                r.volume,
                r.room_type.label(),
                r.total_btu,
                r.tonnage
            ),
            CalculationResult::Cfm(r) => format!(
                "{:.0} ft³ at {} ACH ({}) → {} CFM",
                r.volume,
                r.air_changes,
                r.room_usage.label(),
                r.cfm
            ),
            CalculationResult::Ach(r) => format!(
                "{:.0} CFM in {:.0} ft³ → {} ACH ({})",
                r.cfm, r.volume, r.ach, r.rating
            ),
            CalculationResult::Duct(r) => match &r.dimensions {
                DuctDimensions::Round {
                    standard_diameter_in,
                    ..
                } => format!(
                    "{:.0} CFM at {:.0} FPM → Ø {} in round",
                    r.cfm, r.velocity, standard_diameter_in
                ),
                DuctDimensions::Rectangular {
                    standard_width_in,
                    standard_height_in,
                    ..
                } => format!(
                    "{:.0} CFM at {:.0} FPM → {} × {} in rectangular",
                    r.cfm, r.velocity, standard_width_in, standard_height_in
                ),
            },
            CalculationResult::Energy(r) => format!(
                "{} t at EER {} → {:.2}/day, {:.2}/month, {:.2}/year",
                r.capacity_tons, r.efficiency, r.daily_cost, r.monthly_cost, r.yearly_cost
            ),
        }
    }
}

/// One entry in the history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculationRecord {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub result: CalculationResult,
}

impl CalculationRecord {
    pub fn kind(&self) -> CalculationKind {
        self.result.kind()
    }

    pub fn display_timestamp(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Flat row used for CSV export
#[derive(Serialize)]
struct ExportRow<'a> {
    id: i64,
    kind: CalculationKind,
    timestamp: String,
    summary: String,
    data: &'a str,
}

/// Export format for the whole history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown export format '{}' (expected json or csv)", other)),
        }
    }
}

/// Persisted, newest-first calculation history
pub struct CalculationHistory {
    store: SharedStore,
    view_limit: usize,
}

impl CalculationHistory {
    pub fn new(store: SharedStore) -> Self {
        Self::with_view_limit(store, DEFAULT_VIEW_LIMIT)
    }

    pub fn with_view_limit(store: SharedStore, view_limit: usize) -> Self {
        Self { store, view_limit }
    }

    pub fn view_limit(&self) -> usize {
        self.view_limit
    }

    /// Every record, newest first
    pub fn all(&self) -> CalcResult<Vec<CalculationRecord>> {
        Ok(load_list(self.store.as_ref(), HISTORY_KEY)?)
    }

    /// Prepend a new record and persist the list
    pub fn record(&self, result: CalculationResult) -> CalcResult<CalculationRecord> {
        let mut records = self.all()?;
        let record = CalculationRecord {
            id: next_id(records.iter().map(|r| r.id)),
            timestamp: Utc::now(),
            result,
        };

        records.insert(0, record.clone());
        save_json(self.store.as_ref(), HISTORY_KEY, &records)?;

        tracing::debug!(
            id = record.id,
            kind = %record.kind(),
            total = records.len(),
            "Recorded calculation"
        );
        Ok(record)
    }

    /// Latest records of one kind, capped at the view limit
    pub fn recent(&self, kind: CalculationKind) -> CalcResult<Vec<CalculationRecord>> {
        Ok(self.latest(self.all()?, kind))
    }

    /// `recent`, restricted to the records whose ids appear in `ids`
    pub fn recent_by_ids(
        &self,
        ids: &[i64],
        kind: CalculationKind,
    ) -> CalcResult<Vec<CalculationRecord>> {
        Ok(self.latest(self.by_ids(ids)?, kind))
    }

    fn latest(
        &self,
        records: Vec<CalculationRecord>,
        kind: CalculationKind,
    ) -> Vec<CalculationRecord> {
        records
            .into_iter()
            .filter(|r| r.kind() == kind)
            .take(self.view_limit)
            .collect()
    }

    /// Records whose ids appear in `ids`, newest first
    pub fn by_ids(&self, ids: &[i64]) -> CalcResult<Vec<CalculationRecord>> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|r| ids.contains(&r.id))
            .collect())
    }

    /// Drop one record; a missing id is not an error
    pub fn remove(&self, id: i64) -> CalcResult<()> {
        let mut records = self.all()?;
        records.retain(|r| r.id != id);
        save_json(self.store.as_ref(), HISTORY_KEY, &records)?;
        tracing::debug!(id, "Removed calculation");
        Ok(())
    }

    /// Empty the history and persist the empty list
    pub fn clear(&self) -> CalcResult<()> {
        save_json::<[CalculationRecord]>(self.store.as_ref(), HISTORY_KEY, &[])?;
        tracing::info!("Calculation history cleared");
        Ok(())
    }

    /// Serialize the whole history
    pub fn export(&self, format: ExportFormat) -> CalcResult<String> {
        let records = self.all()?;
        match format {
            ExportFormat::Json => Ok(serde_json::to_string_pretty(&records)?),
            ExportFormat::Csv => export_csv(&records),
        }
    }
}

fn export_csv(records: &[CalculationRecord]) -> CalcResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for record in records {
        let data = serde_json::to_string(&record.result)?;
        writer.serialize(ExportRow {
            id: record.id,
            kind: record.kind(),
            timestamp: record.timestamp.to_rfc3339(),
            summary: record.result.summary(),
            data: &data,
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CalcError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CalcError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::airflow::{airflow, AirflowInput};
    use crate::calc::cooling::{cooling_load, CoolingLoadInput};
    use crate::calc::factors::RoomUsage;
    use crate::storage::{MemoryStore, SharedStore};
    use std::sync::Arc;

    fn btu(length: f64) -> CalculationResult {
        CalculationResult::Btu(cooling_load(&CoolingLoadInput::new(length, 4.0, 3.0)).unwrap())
    }

    fn cfm(volume: f64) -> CalculationResult {
        CalculationResult::Cfm(
            airflow(&AirflowInput {
                volume,
                air_changes: Some(6.0),
                usage: RoomUsage::Office,
            })
            .unwrap(),
        )
    }

    #[test]
    fn test_record_prepends() {
        let history = CalculationHistory::new(MemoryStore::shared());
        let first = history.record(btu(1.0)).unwrap();
        let second = history.record(btu(2.0)).unwrap();

        let all = history.all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
        assert!(second.id > first.id);
    }

    #[test]
    fn test_recent_is_capped_and_filtered() {
        let history = CalculationHistory::new(MemoryStore::shared());

        for i in 1..=7 {
            history.record(btu(i as f64)).unwrap();
            history.record(cfm(i as f64 * 100.0)).unwrap();
        }

        let recent = history.recent(CalculationKind::Btu).unwrap();
        assert_eq!(recent.len(), 5);
        assert!(recent.iter().all(|r| r.kind() == CalculationKind::Btu));
        for pair in recent.windows(2) {
            assert!(pair[0].id > pair[1].id);
        }
        match &recent[0].result {
            CalculationResult::Btu(r) => assert_eq!(r.volume, 7.0 * 4.0 * 3.0),
            other => panic!("unexpected record {:?}", other),
        }

        assert!(history.recent(CalculationKind::Duct).unwrap().is_empty());
        assert_eq!(history.all().unwrap().len(), 14);
    }

    #[test]
    fn test_view_limit_is_configurable() {
        let history = CalculationHistory::with_view_limit(MemoryStore::shared(), 2);
        for i in 1..=4 {
            history.record(btu(i as f64)).unwrap();
        }
        assert_eq!(history.recent(CalculationKind::Btu).unwrap().len(), 2);
    }

    #[test]
    fn test_clear_persists_empty_list() {
        let store: SharedStore = MemoryStore::shared();
        let history = CalculationHistory::new(Arc::clone(&store));
        history.record(btu(1.0)).unwrap();
        history.clear().unwrap();

        assert!(history.all().unwrap().is_empty());
        assert_eq!(store.get(HISTORY_KEY).unwrap().as_deref(), Some("[]"));

        let reopened = CalculationHistory::new(store);
        assert!(reopened.all().unwrap().is_empty());
    }

    #[test]
    fn test_stored_shape() {
        let store: SharedStore = MemoryStore::shared();
        let history = CalculationHistory::new(Arc::clone(&store));
        history.record(btu(5.0)).unwrap();

        let raw = store.get(HISTORY_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["result"]["type"], "btu");
        assert_eq!(value[0]["result"]["data"]["totalBtu"], 6600);
    }

    #[test]
    fn test_export_csv() {
        let history = CalculationHistory::new(MemoryStore::shared());
        history.record(btu(5.0)).unwrap();
        history.record(cfm(1000.0)).unwrap();

        let csv = history.export(ExportFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("id,kind,timestamp,summary,data"));
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.contains(",cfm,"));

        let json = history.export(ExportFormat::Json).unwrap();
        let parsed: Vec<CalculationRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_recent_by_ids_is_capped() {
        let history = CalculationHistory::with_view_limit(MemoryStore::shared(), 3);
        let mut mine = Vec::new();
        for i in 1..=6 {
            mine.push(history.record(btu(i as f64)).unwrap().id);
            history.record(btu(i as f64 * 10.0)).unwrap();
        }
        mine.push(history.record(cfm(500.0)).unwrap().id);

        let recent = history.recent_by_ids(&mine, CalculationKind::Btu).unwrap();
        assert_eq!(recent.len(), 3);
        assert!(recent.iter().all(|r| mine.contains(&r.id)));
        assert_eq!(recent[0].id, mine[5]);
        assert_eq!(history.by_ids(&mine).unwrap().len(), 7);
    }

    #[test]
    fn test_remove_single_record() {
        let history = CalculationHistory::new(MemoryStore::shared());
        let first = history.record(btu(1.0)).unwrap();
        let second = history.record(btu(2.0)).unwrap();

        history.remove(second.id).unwrap();
        history.remove(424242).unwrap();

        let all = history.all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, first.id);
    }

    #[test]
    fn test_kind_display_pads() {
        assert_eq!(format!("{:<6}|", CalculationKind::Btu), "btu   |");
        assert_eq!(CalculationKind::Energy.to_string(), "energy");
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("ACH".parse::<CalculationKind>().unwrap(), CalculationKind::Ach);
        assert!("lux".parse::<CalculationKind>().is_err());
    }
}
