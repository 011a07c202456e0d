use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use ndarray::ArrayD;
use ndarray_npy::ReadNpyExt;
use num_traits::ToPrimitive;
use zip::ZipArchive;

use crate::datasets::dataset_name;
use crate::errors::Error;
use crate::DatasetSource;

/// Tries each element type in turn and widens the first one that reads.
macro_rules! read_widened {
    ($archive:expr, $name:expr, $entry:expr, $($ty:ty),+) => {
        $(
            let array = ArrayD::<$ty>::read_npy($archive.by_name($entry)?);
            if let Ok(array) = array {
                return widen($name, array);
            }
        )+
    };
}

/// An npz archive opened for reading.
///
/// Dataset names are the archive entry names without their `.npy` extension.
pub struct DatasetArchive {
    pub path: PathBuf,
    archive: ZipArchive<File>,
    entries: BTreeMap<String, String>,
}

impl DatasetArchive {
    /// Open an archive from its filepath.
    ///
    /// If the file does not exist a FileNotAvailable error will be returned.
    pub fn open(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Err(Error::FileNotAvailable(path.display().to_string()));
        }
        let mut archive = ZipArchive::new(File::open(path)?)?;
        let mut entries = BTreeMap::new();
        for i in 0..archive.len() {
            let file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let entry = file.name().to_string();
            entries.insert(dataset_name(&entry).to_string(), entry);
        }
        Ok(Self {
            path: path.to_path_buf(),
            archive,
            entries,
        })
    }

    /// Dataset names paired with the archive entry holding them.
    pub fn datasets(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DatasetSource for DatasetArchive {
    /// Reads a numeric dataset of any integer or float type as `i64`.
    ///
    /// Floats are truncated toward zero.
    fn read_ints(&mut self, name: &str) -> Result<ArrayD<i64>, Error> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| Error::MissingDataset(name.to_string()))?
            .clone();
        read_widened!(self.archive, name, &entry, i64, u64, i32, u32, i16, u16, i8, u8, f64, f32);
        Err(Error::UnsupportedDtype(name.to_string()))
    }
}

fn widen<T: ToPrimitive>(name: &str, array: ArrayD<T>) -> Result<ArrayD<i64>, Error> {
    let mut widened = ArrayD::zeros(array.raw_dim());
    for (out, value) in widened.iter_mut().zip(array.iter()) {
        *out = value
            .to_i64()
            .ok_or_else(|| Error::ValueOverflow(name.to_string()))?;
    }
    Ok(widened)
}
