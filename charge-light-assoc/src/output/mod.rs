use std::collections::BTreeMap;
use std::path::PathBuf;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

pub mod container;
pub mod layout;

pub use container::ContainerWriter;
pub use layout::{DatasetLocation, Layout};

/// Name of the archive entry holding the output manifest.
pub const MANIFEST_ENTRY: &str = "manifest.json";

/// How the source datasets are made available in the output.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStrategy {
    /// Record an external link to every source dataset.
    Link,
    /// Copy every source dataset into the output.
    Copy,
}

impl Default for OutputStrategy {
    fn default() -> Self {
        OutputStrategy::Link
    }
}

impl OutputStrategy {
    /// Exposes every dataset of `layout` in the output, either as link or as copy.
    pub fn stage(&self, layout: &Layout, container: &mut ContainerWriter) -> Result<(), Error> {
        for (name, location) in layout.iter() {
            debug!("{:?} {} from {}", self, name, location.file.display());
            match self {
                OutputStrategy::Link => container.link(name, location),
                OutputStrategy::Copy => container.copy(location)?,
            }
        }
        Ok(())
    }
}

/// Points at a dataset living in another archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLink {
    pub file: PathBuf,
    pub entry: String,
}

/// Attributes attached to the association table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssocAttrs {
    /// Charge trigger dataset first, light event dataset second.
    pub assoc_dset_ref: [String; 2],
}

/// Metadata stored alongside the arrays of an output archive.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub strategy: OutputStrategy,
    #[serde(default)]
    pub links: BTreeMap<String, ExternalLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_assoc: Option<AssocAttrs>,
}
