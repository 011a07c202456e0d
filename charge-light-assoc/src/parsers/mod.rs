pub mod charge;
pub mod light;
pub mod npz;

use ndarray::{Array1, ArrayD, Ix1};

use crate::errors::Error;

/// Checks a dataset is one dimensional and returns it as such.
pub(crate) fn to_1d(name: &str, array: ArrayD<i64>) -> Result<Array1<i64>, Error> {
    if array.ndim() != 1 {
        return Err(Error::InvalidShape(format!(
            "{} must be one dimensional, found shape {:?}",
            name,
            array.shape()
        )));
    }
    Ok(array.into_dimensionality::<Ix1>()?)
}
