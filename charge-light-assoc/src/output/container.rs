use std::fs::File;
use std::io;
use std::path::Path;

use log::info;
use ndarray_npy::WriteNpyExt;
use tempfile::NamedTempFile;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::assoc_tools::AssociationTable;
use crate::datasets::{EVENT_ASSOC, NPY_EXT};
use crate::errors::Error;
use crate::output::{AssocAttrs, DatasetLocation, ExternalLink, Manifest, OutputStrategy, MANIFEST_ENTRY};

/// Output archive staged in a temporary file next to its final path.
///
/// Nothing is visible at the final path until `persist` succeeds. Dropping the
/// writer before that removes the staged file.
pub struct ContainerWriter {
    staged: NamedTempFile,
    zip: ZipWriter<File>,
    options: FileOptions,
    manifest: Manifest,
}

impl ContainerWriter {
    /// Stages a new archive for `output`, refusing if `output` already exists.
    pub fn create(output: &Path, strategy: OutputStrategy) -> Result<Self, Error> {
        if output.exists() {
            return Err(Error::OutputExists(output.display().to_string()));
        }
        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let staged = NamedTempFile::new_in(dir)?;
        let zip = ZipWriter::new(staged.reopen()?);

        Ok(Self {
            staged,
            zip,
            options: FileOptions::default().compression_method(CompressionMethod::Deflated),
            manifest: Manifest {
                strategy,
                ..Manifest::default()
            },
        })
    }

    pub fn link(&mut self, name: &str, location: &DatasetLocation) {
        self.manifest.links.insert(
            name.to_string(),
            ExternalLink {
                file: location.file.clone(),
                entry: location.entry.clone(),
            },
        );
    }

    /// Copies a source entry byte for byte, keeping its entry name.
    pub fn copy(&mut self, location: &DatasetLocation) -> Result<(), Error> {
        let mut source = ZipArchive::new(File::open(&location.file)?)?;
        let mut entry = source.by_name(&location.entry)?;
        self.zip.start_file(location.entry.clone(), self.options)?;
        io::copy(&mut entry, &mut self.zip)?;
        Ok(())
    }

    /// Writes the association table and the references to the two datasets it
    /// indexes, charge first.
    pub fn write_association(
        &mut self,
        table: &AssociationTable,
        charge_dset: &str,
        light_dset: &str,
    ) -> Result<(), Error> {
        self.zip
            .start_file(format!("{}{}", EVENT_ASSOC, NPY_EXT), self.options)?;
        table.to_array().write_npy(&mut self.zip)?;
        self.manifest.event_assoc = Some(AssocAttrs {
            assoc_dset_ref: [charge_dset.to_string(), light_dset.to_string()],
        });
        Ok(())
    }

    /// Finishes the archive and moves it to `output`. Fails without touching
    /// `output` if something appeared there in the meantime.
    pub fn persist(mut self, output: &Path) -> Result<(), Error> {
        self.zip.start_file(MANIFEST_ENTRY, self.options)?;
        serde_json::to_writer_pretty(&mut self.zip, &self.manifest)?;
        let file = self.zip.finish()?;
        file.sync_all()?;
        drop(file);

        self.staged.persist_noclobber(output).map_err(|e| {
            if e.error.kind() == io::ErrorKind::AlreadyExists {
                Error::OutputExists(output.display().to_string())
            } else {
                Error::IOError(e.error)
            }
        })?;
        info!("wrote {}", output.display());
        Ok(())
    }
}
