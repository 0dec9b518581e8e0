//! Reader for payloads written before the schema was versioned.
//!
//! A legacy payload is a JSON object with a `parameters` map and a
//! `trajectories` array. Each trajectory may be written as
//!
//! - a bare array of numbers: `[1.0, 1.0, 1.0]`,
//! - an object with a `state` or `position` array, or
//! - an object with `x`, `y` and optionally `z` keys,
//!
//! optionally with `name` and `color`. Top-level `time` and `dt` are
//! honoured when present. Everything else takes its default.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::ImportError;

/// A decoded legacy payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LegacyPayload {
    /// Parameter values by name. Unknown names are reported at import.
    pub parameters: IndexMap<String, f64>,
    /// Trajectories in payload order.
    pub trajectories: Vec<LegacyTrajectory>,
    /// Simulation time, if recorded.
    pub time: Option<f64>,
    /// Time step, if recorded.
    pub dt: Option<f64>,
}

/// One legacy trajectory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LegacyTrajectory {
    /// Display name, if recorded.
    pub name: Option<String>,
    /// Display colour, if recorded.
    pub color: Option<String>,
    /// State components.
    pub state: Vec<f64>,
}

/// Decode a legacy payload from its top-level object.
pub fn parse(root: &Map<String, Value>) -> Result<LegacyPayload, ImportError> {
    let parameters = match root.get("parameters") {
        None | Some(Value::Null) => IndexMap::new(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(name, v)| {
                v.as_f64()
                    .map(|x| (name.clone(), x))
                    .ok_or_else(|| ImportError::malformed(format!("parameter '{name}' is not a number")))
            })
            .collect::<Result<_, _>>()?,
        Some(_) => return Err(ImportError::malformed("'parameters' must be an object")),
    };

    let entries = match root.get("trajectories") {
        None | Some(Value::Null) => {
            return Err(ImportError::MissingField {
                field: "trajectories",
            })
        }
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ImportError::malformed("'trajectories' must be an array")),
    };
    let trajectories = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| trajectory(i, entry))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LegacyPayload {
        parameters,
        trajectories,
        time: optional_number(root, "time")?,
        dt: optional_number(root, "dt")?,
    })
}

fn trajectory(index: usize, entry: &Value) -> Result<LegacyTrajectory, ImportError> {
    match entry {
        Value::Array(items) => Ok(LegacyTrajectory {
            state: numbers(index, items)?,
            ..Default::default()
        }),
        Value::Object(obj) => {
            let state = match obj.get("state").or_else(|| obj.get("position")) {
                Some(Value::Array(items)) => numbers(index, items)?,
                Some(_) => {
                    return Err(ImportError::malformed(format!(
                        "trajectory {index}: state must be an array"
                    )))
                }
                None => axes(index, obj)?,
            };
            Ok(LegacyTrajectory {
                name: optional_string(obj, "name"),
                color: optional_string(obj, "color"),
                state,
            })
        }
        _ => Err(ImportError::malformed(format!(
            "trajectory {index} is neither an array nor an object"
        ))),
    }
}

fn numbers(index: usize, items: &[Value]) -> Result<Vec<f64>, ImportError> {
    items
        .iter()
        .map(|v| {
            v.as_f64().ok_or_else(|| {
                ImportError::malformed(format!("trajectory {index}: non-numeric component {v}"))
            })
        })
        .collect()
}

fn axes(index: usize, obj: &Map<String, Value>) -> Result<Vec<f64>, ImportError> {
    let mut state = Vec::with_capacity(3);
    for key in ["x", "y", "z"] {
        match obj.get(key) {
            Some(v) => state.push(v.as_f64().ok_or_else(|| {
                ImportError::malformed(format!("trajectory {index}: '{key}' is not a number"))
            })?),
            None if key == "z" => {}
            None => {
                return Err(ImportError::malformed(format!(
                    "trajectory {index}: no state, position or '{key}' field"
                )))
            }
        }
    }
    Ok(state)
}

fn optional_number(obj: &Map<String, Value>, key: &str) -> Result<Option<f64>, ImportError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| ImportError::malformed(format!("'{key}' is not a number"))),
    }
}

fn optional_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}
