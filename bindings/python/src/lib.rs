//! Python bindings for the BL parser
//!
//! Thin wrapper around `bl-core`; no parsing logic lives here.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn to_py_err(e: bl_core::Error) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn to_json(value: &serde_json::Value) -> PyResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| PyValueError::new_err(format!("Serialization error: {}", e)))
}

/// Parse BL program text and return a JSON string of the syntax tree.
///
/// Args:
///     text: BL program source text
///
/// Returns:
///     JSON string with the program name, instruction context and body
///
/// Raises:
///     ValueError: If the text is not a valid BL program
#[pyfunction]
fn parse_program(text: &str) -> PyResult<String> {
    let program = bl_core::parse(text).map_err(to_py_err)?;
    let value = serde_json::to_value(&program)
        .map_err(|e| PyValueError::new_err(format!("Serialization error: {}", e)))?;
    to_json(&value)
}

/// Reformat BL program text in canonical layout.
///
/// Comments are dropped and instructions are ordered by name;
/// format(format(x)) == format(x).
///
/// Raises:
///     ValueError: If the text is not a valid BL program
#[pyfunction]
fn format(text: &str) -> PyResult<String> {
    let program = bl_core::parse(text).map_err(to_py_err)?;
    Ok(bl_core::print_program(&program))
}

/// SHA-256 of the canonical form, lowercase hex.
///
/// Raises:
///     ValueError: If the text is not a valid BL program
#[pyfunction]
fn program_hash(text: &str) -> PyResult<String> {
    let program = bl_core::parse(text).map_err(to_py_err)?;
    Ok(bl_core::program_hash(&program))
}

/// Check BL program text without raising.
///
/// Returns:
///     JSON string: {"valid": bool, "error": null | {"kind", "message", "line", "column"}}
#[pyfunction]
fn check(text: &str) -> PyResult<String> {
    let output = match bl_core::parse(text) {
        Ok(_) => serde_json::json!({ "valid": true, "error": null }),
        Err(e) => serde_json::json!({ "valid": false, "error": e.to_json() }),
    };
    to_json(&output)
}

/// BL Python module: parser for the BL robot-control language
#[pymodule]
fn bl(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(parse_program, m)?)?;
    m.add_function(wrap_pyfunction!(format, m)?)?;
    m.add_function(wrap_pyfunction!(program_hash, m)?)?;
    m.add_function(wrap_pyfunction!(check, m)?)?;
    Ok(())
}
