use ndarray::Array1;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::{pymodule, PyModule, PyResult, Python};

use crate::assoc_tools::{associate, AssocParams, DEFAULT_BLOCK_SIZE, DEFAULT_TS_WINDOW};
use crate::errors::Error;
use crate::Timestamps;

fn to_py_err(e: Error) -> pyo3::PyErr {
    PyValueError::new_err(e.to_string())
}

#[pymodule]
fn charge_light_assoc(_py: Python, m: &PyModule) -> PyResult<()> {
    /// Returns the (charge_idx, light_idx) pairs whose unix timestamps differ by at
    /// most one second and whose fine timestamps differ by less than ts_window.
    #[pyfn(m, "associate", ts_window = "DEFAULT_TS_WINDOW", block_size = "DEFAULT_BLOCK_SIZE")]
    fn py_associate(
        _py: Python,
        charge_unix_ts: Vec<i64>,
        charge_ts: Vec<i64>,
        light_unix_ts: Vec<i64>,
        light_ts: Vec<i64>,
        ts_window: i64,
        block_size: usize,
    ) -> PyResult<Vec<(usize, usize)>> {
        let charge = Timestamps::new(Array1::from(charge_unix_ts), Array1::from(charge_ts))
            .map_err(to_py_err)?;
        let light = Timestamps::new(Array1::from(light_unix_ts), Array1::from(light_ts))
            .map_err(to_py_err)?;
        let params = AssocParams {
            ts_window,
            block_size,
        };
        let assoc = associate(&charge, &light, &params).map_err(to_py_err)?;
        Ok(assoc.table.pairs().to_vec())
    }

    Ok(())
}
