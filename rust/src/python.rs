//! Python bindings. Built only with the `extension-module` feature.
//!
//! Tasks, scenarios and timelines cross the boundary as JSON strings.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::NaiveDate;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::critical_path::schedule_tasks;
use crate::models::Task;
use crate::scenario::{transform, Scenario};
use crate::simulation::simulate;

fn value_error(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn parse_tasks(tasks_json: &str) -> PyResult<Vec<Task>> {
    serde_json::from_str(tasks_json).map_err(value_error)
}

/// Validate and schedule a JSON task list; returns the timeline as JSON.
///
/// # Raises
/// * ValueError on malformed JSON or an invalid task graph
#[pyfunction]
fn schedule_json(tasks_json: &str, reference_date: NaiveDate) -> PyResult<String> {
    let tasks = parse_tasks(tasks_json)?;
    let timeline = schedule_tasks(&tasks, reference_date).map_err(value_error)?;
    serde_json::to_string(&timeline).map_err(value_error)
}

/// Schedule and simulate at `current_day`; returns the simulated timeline as JSON.
#[pyfunction]
fn simulate_json(
    tasks_json: &str,
    reference_date: NaiveDate,
    current_day: i64,
) -> PyResult<String> {
    let tasks = parse_tasks(tasks_json)?;
    let timeline = schedule_tasks(&tasks, reference_date).map_err(value_error)?;
    let simulated = simulate(&timeline, current_day).map_err(value_error)?;
    serde_json::to_string(&simulated).map_err(value_error)
}

/// Apply a JSON scenario to a JSON task list; returns the new task list as JSON.
#[pyfunction]
fn transform_json(tasks_json: &str, scenario_json: &str) -> PyResult<String> {
    let tasks = parse_tasks(tasks_json)?;
    let scenario: Scenario = serde_json::from_str(scenario_json).map_err(value_error)?;
    let transformed = transform(&tasks, &scenario).map_err(value_error)?;
    serde_json::to_string(&transformed).map_err(value_error)
}

/// The kya_timeline Python module.
#[pymodule]
fn kya_timeline(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(schedule_json, m)?)?;
    m.add_function(wrap_pyfunction!(simulate_json, m)?)?;
    m.add_function(wrap_pyfunction!(transform_json, m)?)?;
    Ok(())
}
