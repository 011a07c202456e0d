pub mod assoc_tools;
pub mod datasets;
pub mod errors;
pub mod output;
pub mod parsers;
#[cfg(feature = "python")]
mod python;
pub mod run;

use ndarray::{Array1, ArrayD, ArrayView1};

/// Anything that can hand out named integer datasets.
///
/// Source archives implement it directly. The output `Layout` implements it by
/// resolving each dataset name to the archive that provides it, so the association
/// stage reads through the same names whether the output links or copies.
pub trait DatasetSource {
    fn read_ints(&mut self, name: &str) -> Result<ArrayD<i64>, errors::Error>;
}

/// Coarse and fine timestamps of one event stream, index aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct Timestamps {
    coarse: Array1<i64>,
    fine: Array1<i64>,
}

impl Timestamps {
    pub fn new(coarse: Array1<i64>, fine: Array1<i64>) -> Result<Self, errors::Error> {
        if coarse.len() != fine.len() {
            return Err(errors::Error::InvalidShape(format!(
                "coarse ({}) and fine ({}) timestamps differ in length",
                coarse.len(),
                fine.len()
            )));
        }
        Ok(Self { coarse, fine })
    }

    #[inline]
    pub fn coarse(&self) -> ArrayView1<i64> {
        self.coarse.view()
    }

    #[inline]
    pub fn fine(&self) -> ArrayView1<i64> {
        self.fine.view()
    }

    pub fn len(&self) -> usize {
        self.coarse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coarse.is_empty()
    }
}

impl DatasetSource for std::collections::HashMap<String, ArrayD<i64>> {
    fn read_ints(&mut self, name: &str) -> Result<ArrayD<i64>, errors::Error> {
        self.get(name)
            .cloned()
            .ok_or_else(|| errors::Error::MissingDataset(name.to_string()))
    }
}
