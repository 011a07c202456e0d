use ndarray::{Array1, ArrayD, Axis, Ix2};

use crate::datasets::{LIGHT_EVENT_TAI_NS, LIGHT_EVENT_UTIME_MS};
use crate::errors::Error;
use crate::parsers::to_1d;
use crate::{DatasetSource, Timestamps};

/// Nanoseconds per fine tick (0.1 us).
const TAI_NS_PER_TICK: i64 = 100;
const MS_PER_SECOND: i64 = 1000;

/// Reads the light event stream.
///
/// Both `tai_ns` and `utime_ms` may carry one column per light digitizer, in which
/// case the latest value of each event is used. The coarse timestamp is whole unix
/// seconds and the fine timestamp is in 0.1 us ticks.
pub fn light_timestamps<S: DatasetSource + ?Sized>(source: &mut S) -> Result<Timestamps, Error> {
    let utime_ms = reduce_max(LIGHT_EVENT_UTIME_MS, source.read_ints(LIGHT_EVENT_UTIME_MS)?)?;
    let tai_ns = reduce_max(LIGHT_EVENT_TAI_NS, source.read_ints(LIGHT_EVENT_TAI_NS)?)?;

    let coarse = utime_ms.mapv(|t| t / MS_PER_SECOND);
    let fine = tai_ns.mapv(|t| t / TAI_NS_PER_TICK);
    Timestamps::new(coarse, fine)
}

fn reduce_max(name: &str, array: ArrayD<i64>) -> Result<Array1<i64>, Error> {
    match array.ndim() {
        1 => to_1d(name, array),
        2 => {
            let array = array.into_dimensionality::<Ix2>()?;
            if array.ncols() == 0 {
                return Err(Error::InvalidShape(format!("{} has no columns", name)));
            }
            Ok(array.map_axis(Axis(1), |row| row.fold(i64::MIN, |acc, &t| acc.max(t))))
        }
        _ => Err(Error::InvalidShape(format!(
            "{} must be one or two dimensional, found shape {:?}",
            name,
            array.shape()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2, Array3};
    use std::collections::HashMap;

    fn source(tai_ns: ArrayD<i64>, utime_ms: ArrayD<i64>) -> HashMap<String, ArrayD<i64>> {
        let mut source = HashMap::new();
        source.insert(LIGHT_EVENT_TAI_NS.to_string(), tai_ns);
        source.insert(LIGHT_EVENT_UTIME_MS.to_string(), utime_ms);
        source
    }

    #[test]
    fn reduces_columns_and_rescales() {
        let mut source = source(
            arr2(&[[1_250, 1_399], [0, 88_000]]).into_dyn(),
            arr2(&[[1_600_000_000_999, 1_600_000_000_500], [1_600_000_001_000, 0]]).into_dyn(),
        );
        let ts = light_timestamps(&mut source).unwrap();
        assert_eq!(ts.coarse(), arr1(&[1_600_000_000, 1_600_000_001]));
        assert_eq!(ts.fine(), arr1(&[13, 880]));
    }

    #[test]
    fn accepts_single_column_streams() {
        let mut source = source(arr1(&[500, 1_000]).into_dyn(), arr1(&[2_000, 3_999]).into_dyn());
        let ts = light_timestamps(&mut source).unwrap();
        assert_eq!(ts.coarse(), arr1(&[2, 3]));
        assert_eq!(ts.fine(), arr1(&[5, 10]));
    }

    #[test]
    fn rejects_bad_shapes() {
        let mut empty_cols = source(
            ArrayD::zeros(ndarray::IxDyn(&[2, 0])),
            arr1(&[1, 2]).into_dyn(),
        );
        assert!(matches!(
            light_timestamps(&mut empty_cols),
            Err(Error::InvalidShape(_))
        ));

        let mut cube = source(Array3::zeros((1, 1, 1)).into_dyn(), arr1(&[1]).into_dyn());
        assert!(matches!(light_timestamps(&mut cube), Err(Error::InvalidShape(_))));

        let mut ragged = source(arr1(&[1, 2, 3]).into_dyn(), arr1(&[1, 2]).into_dyn());
        assert!(matches!(light_timestamps(&mut ragged), Err(Error::InvalidShape(_))));
    }
}
