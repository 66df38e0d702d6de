//! Python-side extraction helpers for the extension module.
//!
//! Purpose
//! -------
//! Turn loosely typed Python inputs (dicts of per-channel settings, floats)
//! into validated Rust values, mapping malformed shapes to `TypeError` /
//! `ValueError` before any optimizer code runs.
//!
//! Conventions
//! -----------
//! - Everything in this module is gated behind `python-bindings`.
//! - Semantic validation (unknown channels, bounds ordering, spend sign)
//!   stays in [`crate::budget`]; these helpers only check structure.
#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::{PyAny, PyDict},
};

#[cfg(feature = "python-bindings")]
use crate::{
    budget::{channels::Channel, config::ChannelSetting},
    response::traits::ContributionSet,
};

/// Keys accepted in each per-channel settings entry.
#[cfg(feature = "python-bindings")]
pub const STARTING_BUDGET_KEY: &str = "starting_budget";
#[cfg(feature = "python-bindings")]
pub const LOWER_BOUND_KEY: &str = "lower_bound";
#[cfg(feature = "python-bindings")]
pub const UPPER_BOUND_KEY: &str = "upper_bound";

/// Extract `{channel: {"starting_budget", "lower_bound", "upper_bound"}}`.
///
/// Errors
/// ------
/// - `TypeError` if `raw` or an entry is not a dict, or a value is not a
///   float.
/// - `ValueError` if an entry is missing one of the three keys.
#[cfg(feature = "python-bindings")]
pub fn extract_channel_settings<'py>(raw: &Bound<'py, PyAny>) -> PyResult<Vec<ChannelSetting>> {
    let dict = raw
        .downcast::<PyDict>()
        .map_err(|_| PyTypeError::new_err("settings must be a dict keyed by channel name"))?;

    let mut settings = Vec::with_capacity(dict.len());
    for (key, value) in dict.iter() {
        let channel: String = key
            .extract()
            .map_err(|_| PyTypeError::new_err("settings keys must be channel names (str)"))?;
        let entry = value.downcast::<PyDict>().map_err(|_| {
            PyTypeError::new_err(format!("settings for channel '{channel}' must be a dict"))
        })?;
        let starting_budget = required_f64(entry, &channel, STARTING_BUDGET_KEY)?;
        let lower_bound = required_f64(entry, &channel, LOWER_BOUND_KEY)?;
        let upper_bound = required_f64(entry, &channel, UPPER_BOUND_KEY)?;
        settings.push(ChannelSetting::new(channel, starting_budget, lower_bound, upper_bound));
    }
    Ok(settings)
}

#[cfg(feature = "python-bindings")]
fn required_f64(entry: &Bound<'_, PyDict>, channel: &str, key: &str) -> PyResult<f64> {
    let value = entry.get_item(key)?.ok_or_else(|| {
        PyValueError::new_err(format!("settings for channel '{channel}' are missing '{key}'"))
    })?;
    value.extract::<f64>().map_err(|_| {
        PyTypeError::new_err(format!("'{key}' for channel '{channel}' must be a float"))
    })
}

/// Ordered `(channel, value)` pairs as a Python dict.
#[cfg(feature = "python-bindings")]
pub fn pairs_to_dict<'py>(
    py: Python<'py>, pairs: Vec<(Channel, f64)>,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    for (channel, value) in pairs {
        dict.set_item(channel, value)?;
    }
    Ok(dict)
}

/// Per-channel contribution series as `{channel: [per-period values]}`.
#[cfg(feature = "python-bindings")]
pub fn contribution_series_to_dict<'py>(
    py: Python<'py>, contributions: &ContributionSet,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    for (i, channel) in contributions.channels().iter().enumerate() {
        dict.set_item(channel, contributions.values().column(i).to_vec())?;
    }
    Ok(dict)
}
