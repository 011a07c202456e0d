use log::info;
use ndarray::Array2;

use crate::errors::Error;
use crate::Timestamps;

mod blocked;
pub mod range;

use blocked::BlockedMatch;
use range::{restricted_range, IndexRange};

pub const DEFAULT_TS_WINDOW: i64 = 1000;
pub const DEFAULT_BLOCK_SIZE: usize = 256;
/// Largest coarse timestamp difference, in seconds, of two associated events.
pub const COARSE_TOLERANCE: i64 = 1;

/// Parameters for the association algorithm
///
/// # Parameters
///    - ts_window: Largest fine timestamp difference (exclusive) for two events to be
///      associated, in fine ticks of 0.1 us
///    - block_size: Number of light events compared at once. Bounds the size of the
///      dense match matrix and has no effect on the result
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AssocParams {
    pub ts_window: i64,
    pub block_size: usize,
}

impl Default for AssocParams {
    fn default() -> Self {
        Self {
            ts_window: DEFAULT_TS_WINDOW,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl AssocParams {
    pub fn validate(&self) -> Result<(), Error> {
        if self.ts_window < 0 {
            return Err(Error::InvalidParameter(format!(
                "ts_window must not be negative, got {}",
                self.ts_window
            )));
        }
        if self.block_size == 0 {
            return Err(Error::InvalidParameter(String::from(
                "block_size must be at least 1",
            )));
        }
        Ok(())
    }
}

/// Deduplicated `(charge_idx, light_idx)` pairs sorted lexicographically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationTable {
    pairs: Vec<(usize, usize)>,
}

impl AssociationTable {
    fn from_pairs(mut pairs: Vec<(usize, usize)>) -> Self {
        pairs.sort_unstable();
        pairs.dedup();
        Self { pairs }
    }

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The table as a `(K, 2)` array, charge index in column 0 and light index in
    /// column 1.
    pub fn to_array(&self) -> Array2<i64> {
        Array2::from_shape_fn((self.pairs.len(), 2), |(i, j)| {
            let (charge, light) = self.pairs[i];
            (if j == 0 { charge } else { light }) as i64
        })
    }
}

/// Result from the association algorithm
#[derive(Debug, Clone)]
pub struct Association {
    pub table: AssociationTable,
    /// Charge indices that can be associated at all, `None` without overlap.
    pub charge_range: Option<IndexRange>,
    /// Light indices that can be associated at all, `None` without overlap.
    pub light_range: Option<IndexRange>,
}

/// Associates charge external triggers with light events by timestamp.
///
/// Charge trigger `i` and light event `j` are associated when their coarse
/// timestamps differ by at most one second and their fine timestamps by less than
/// `ts_window` ticks. Matches are not exclusive: an event may appear in any number
/// of pairs.
///
/// ## Algorithm description
/// Each stream is first trimmed to the indices whose coarse timestamp falls within
/// the span of the other stream. The trimmed light range is then walked in blocks of
/// `block_size` events. For every block the charge candidates are narrowed to the
/// triggers whose coarse timestamp is within one second of the block's span, and a
/// dense candidates x block boolean matrix is evaluated with both criteria. This
/// keeps the work close to linear in the stream lengths instead of a full N x M
/// comparison, as long as the streams are sorted by coarse timestamp.
///
/// Unsorted streams still give correct pairs within the trimmed ranges, only slower.
pub fn associate(
    charge: &Timestamps,
    light: &Timestamps,
    params: &AssocParams,
) -> Result<Association, Error> {
    params.validate()?;

    let charge_range = restricted_range(charge.coarse(), light.coarse());
    let light_range = restricted_range(light.coarse(), charge.coarse());
    info!(
        "first/last index: {:?} (light), {:?} (charge)",
        light_range, charge_range
    );

    let table = match (charge_range, light_range) {
        (Some(charge_range), Some(light_range)) => {
            let pairs = BlockedMatch::new(charge, light, *params).compute(charge_range, light_range)?;
            if pairs.is_empty() {
                AssociationTable::default()
            } else {
                AssociationTable::from_pairs(pairs)
            }
        }
        _ => {
            info!("no overlapping time range between streams");
            AssociationTable::default()
        }
    };

    Ok(Association {
        table,
        charge_range,
        light_range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    fn stream(coarse: &[i64], fine: &[i64]) -> Timestamps {
        Timestamps::new(arr1(coarse), arr1(fine)).unwrap()
    }

    #[test]
    fn pairs_satisfy_both_criteria_exactly() {
        let charge = stream(&[10, 10, 11], &[5, 500, 5]);
        let light = stream(&[10, 11], &[500, 500]);
        let params = AssocParams {
            ts_window: 100,
            ..AssocParams::default()
        };

        let assoc = associate(&charge, &light, &params).unwrap();
        // (0, 0), (0, 1), (2, 0) and (2, 1) are 495 ticks apart.
        assert_eq!(assoc.table.pairs(), &[(1, 0), (1, 1)]);
        assert_eq!(assoc.charge_range, Some(IndexRange { start: 0, end: 2 }));
        assert_eq!(assoc.light_range, Some(IndexRange { start: 0, end: 1 }));
    }

    #[test]
    fn window_bound_is_exclusive() {
        let charge = stream(&[3], &[100]);
        let light = stream(&[3, 3], &[0, 1]);
        let params = AssocParams {
            ts_window: 100,
            block_size: 1,
        };
        let assoc = associate(&charge, &light, &params).unwrap();
        assert_eq!(assoc.table.pairs(), &[(0, 1)]);
    }

    #[test]
    fn disjoint_streams_give_an_empty_table() {
        let charge = stream(&[1, 2, 3], &[0, 0, 0]);
        let light = stream(&[7, 8], &[0, 0]);
        let assoc = associate(&charge, &light, &AssocParams::default()).unwrap();
        assert!(assoc.table.is_empty());
        assert_eq!(assoc.charge_range, None);
        assert_eq!(assoc.light_range, None);
        assert_eq!(assoc.table.to_array().shape(), &[0, 2]);
    }

    #[test]
    fn empty_streams_give_an_empty_table() {
        let empty = stream(&[], &[]);
        let light = stream(&[7, 8], &[0, 0]);
        let assoc = associate(&empty, &light, &AssocParams::default()).unwrap();
        assert!(assoc.table.is_empty());
        let assoc = associate(&light, &empty, &AssocParams::default()).unwrap();
        assert!(assoc.table.is_empty());
    }

    #[test]
    fn table_is_sorted_and_converts_to_columns() {
        let table = AssociationTable::from_pairs(vec![(3, 1), (0, 2), (3, 1), (0, 1)]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.to_array(), arr2(&[[0, 1], [0, 2], [3, 1]]));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let s = stream(&[1], &[1]);
        let negative = AssocParams {
            ts_window: -1,
            ..AssocParams::default()
        };
        assert!(matches!(
            associate(&s, &s, &negative),
            Err(Error::InvalidParameter(_))
        ));
        let zero_block = AssocParams {
            block_size: 0,
            ..AssocParams::default()
        };
        assert!(matches!(
            associate(&s, &s, &zero_block),
            Err(Error::InvalidParameter(_))
        ));
    }
}
