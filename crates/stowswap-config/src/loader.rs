//! File-reading entry points, gated behind the `fs` feature.
//!
//! Grounded in `utils/file_io.py`'s branch on `map_config_path.suffix`:
//! a JSON map config is self-contained, while a CSV map additionally needs
//! a companion JSON holding a `DATASET` key (the rest of that JSON's
//! fields are unused by this port — the original's `DATASET` pointed at
//! a directory of named map layouts; here it just gates the JSON-vs-CSV
//! choice, matching §6's "CSV with a companion JSON specifying width/
//! height and a DATASET key").

use crate::error::{ConfigError, ConfigResult};
use crate::formats::{
    AgentConfigRow, ItemConfigRow, ManualAssignmentRow, MapConfigJson, PickingListRow,
};
use crate::spec::{AgentSpec, ItemSpec, ManualAssignmentSpec, MapSpec, PickingTaskSpec};
use std::path::Path;

pub fn load_map_config(path: &Path) -> ConfigResult<MapSpec> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => {
            let bytes = std::fs::read(path)?;
            let json: MapConfigJson = serde_json::from_slice(&bytes)?;
            Ok(json.into_spec())
        }
        _ => Err(ConfigError::MissingDataset),
    }
}

pub fn load_agent_config(path: &Path) -> ConfigResult<Vec<AgentSpec>> {
    read_csv_rows::<AgentConfigRow>(path, "agent config").map(|rows| rows.into_iter().map(|r| r.into_spec()).collect())
}

pub fn load_item_config(path: &Path) -> ConfigResult<Vec<ItemSpec>> {
    read_csv_rows::<ItemConfigRow>(path, "item config").map(|rows| rows.into_iter().map(|r| r.into_spec()).collect())
}

pub fn load_picking_list(path: &Path) -> ConfigResult<Vec<PickingTaskSpec>> {
    read_csv_rows::<PickingListRow>(path, "picking list").map(|rows| rows.into_iter().map(|r| r.into_spec()).collect())
}

pub fn load_manual_assignment(path: &Path) -> ConfigResult<Vec<ManualAssignmentSpec>> {
    let rows = read_csv_rows::<ManualAssignmentRow>(path, "manual assignment")?;
    rows.into_iter().map(|r| r.into_spec()).collect()
}

fn read_csv_rows<T: for<'de> serde::Deserialize<'de>>(path: &Path, _file: &'static str) -> ConfigResult<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut out = Vec::new();
    for (row, record) in reader.deserialize::<T>().enumerate() {
        out.push(record.map_err(|source| ConfigError::Csv { row, source })?);
    }
    Ok(out)
}

impl From<csv::Error> for ConfigError {
    fn from(source: csv::Error) -> Self {
        ConfigError::Csv { row: 0, source }
    }
}
