use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use ndarray::ArrayD;

use crate::datasets::EVENT_ASSOC;
use crate::errors::Error;
use crate::output::MANIFEST_ENTRY;
use crate::parsers::npz::DatasetArchive;
use crate::DatasetSource;

/// Where a dataset of the output lives in its source archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLocation {
    pub file: PathBuf,
    pub entry: String,
}

/// Dataset names the output exposes, mapped to the source providing each.
///
/// Reading through a layout opens the source archives lazily and keeps them open.
pub struct Layout {
    datasets: BTreeMap<String, DatasetLocation>,
    archives: HashMap<PathBuf, DatasetArchive>,
}

impl Layout {
    /// Collects the datasets of all `sources`. A name provided twice, or one the
    /// output reserves for itself, is a DuplicateDataset error.
    pub fn from_sources(sources: &[&Path]) -> Result<Self, Error> {
        let mut datasets = BTreeMap::new();
        let mut archives = HashMap::new();

        for &path in sources {
            let archive = DatasetArchive::open(path)?;
            for (name, entry) in archive.datasets() {
                if name == EVENT_ASSOC || name == MANIFEST_ENTRY {
                    return Err(Error::DuplicateDataset(name.to_string()));
                }
                match datasets.entry(name.to_string()) {
                    Entry::Occupied(_) => return Err(Error::DuplicateDataset(name.to_string())),
                    Entry::Vacant(slot) => {
                        slot.insert(DatasetLocation {
                            file: path.to_path_buf(),
                            entry: entry.to_string(),
                        });
                    }
                }
            }
            archives.insert(path.to_path_buf(), archive);
        }

        Ok(Self { datasets, archives })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DatasetLocation)> {
        self.datasets.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, name: &str) -> Option<&DatasetLocation> {
        self.datasets.get(name)
    }

    /// Fails with MissingDataset on the first name not exposed.
    pub fn require(&self, names: &[&str]) -> Result<(), Error> {
        match names.iter().find(|name| !self.datasets.contains_key(**name)) {
            Some(name) => Err(Error::MissingDataset(name.to_string())),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

impl DatasetSource for Layout {
    fn read_ints(&mut self, name: &str) -> Result<ArrayD<i64>, Error> {
        let location = self
            .datasets
            .get(name)
            .ok_or_else(|| Error::MissingDataset(name.to_string()))?;
        let archive = match self.archives.get_mut(&location.file) {
            Some(archive) => archive,
            None => return Err(Error::FileNotAvailable(location.file.display().to_string())),
        };
        archive.read_ints(name)
    }
}
