// Transferable data object
// Offers a file list as CF_HDROP over a shared memory block

use super::format::{CanonicalFormat, DataDir, FormatEtc};
use super::hglobal::{encode_file_list, GlobalBlock, StgMedium};
use super::DndError;
use crate::com::{ComBox, ComPtr, Interface, Unknown};
use log::debug;
use std::cell::Cell;
use std::path::{Path, PathBuf};

/// The data side of a drag (IDataObject)
pub trait DataObject: Unknown {
    /// Render the data into a new medium the caller owns
    fn get_data(&self, format: &FormatEtc) -> Result<StgMedium, DndError>;

    /// Render into a caller-supplied medium
    fn get_data_here(&self, format: &FormatEtc, medium: &mut StgMedium) -> Result<(), DndError>;

    /// Whether `get_data` would succeed for `format`
    fn query_get_data(&self, format: &FormatEtc) -> Result<(), DndError>;

    fn canonical_format(&self, format: &FormatEtc) -> CanonicalFormat;

    fn set_data(&self, format: &FormatEtc, medium: StgMedium, release: bool)
        -> Result<(), DndError>;

    fn enum_formats(&self, direction: DataDir) -> Result<ComPtr<FormatEnumerator>, DndError>;

    /// Register for data change notifications, returning a connection id
    fn advise(&self, format: &FormatEtc, flags: u32) -> Result<u32, DndError>;

    fn unadvise(&self, connection: u32) -> Result<(), DndError>;

    /// List active advise connections
    fn enum_advise(&self) -> Result<Vec<u32>, DndError>;
}

/// Read-only data object carrying one or more existing files
#[derive(Debug)]
pub struct FileDataObject {
    block: GlobalBlock,
}

impl FileDataObject {
    /// Wrap a single file, which must exist right now
    pub fn new(path: &Path) -> Result<Self, DndError> {
        Self::from_paths(vec![path.to_path_buf()])
    }

    /// Wrap a non-empty list of existing files
    pub fn from_paths(paths: Vec<PathBuf>) -> Result<Self, DndError> {
        if paths.is_empty() {
            return Err(DndError::InvalidArg("no files to transfer".into()));
        }
        if let Some(missing) = paths.iter().find(|p| !p.exists()) {
            return Err(DndError::InvalidArg(format!(
                "{} does not exist",
                missing.display()
            )));
        }
        let block = encode_file_list(&paths)?;
        debug!(
            "Data object created for {} file(s), {} byte payload",
            paths.len(),
            block.len()
        );
        Ok(Self { block })
    }

    /// Move into a counted handle typed as the protocol interface
    pub fn into_com(self) -> ComPtr<dyn DataObject> {
        let boxed: Box<ComBox<dyn DataObject>> = Box::new(ComBox::new(self));
        ComPtr::from_box(boxed)
    }
}

impl Drop for FileDataObject {
    fn drop(&mut self) {
        debug!("Data object destroyed, freeing {} byte payload", self.block.len());
    }
}

impl Unknown for FileDataObject {
    fn interfaces(&self) -> &'static [Interface] {
        &[Interface::DataObject]
    }
}

impl DataObject for FileDataObject {
    fn get_data(&self, format: &FormatEtc) -> Result<StgMedium, DndError> {
        if !format.wants_hdrop() {
            return Err(DndError::FormatNotSupported);
        }
        // The receiver gets its own copy, ours lives until we are destroyed.
        Ok(StgMedium::hglobal(self.block.duplicate()?))
    }

    fn get_data_here(&self, _format: &FormatEtc, _medium: &mut StgMedium) -> Result<(), DndError> {
        Err(DndError::NotImplemented)
    }

    fn query_get_data(&self, format: &FormatEtc) -> Result<(), DndError> {
        if format.wants_hdrop() {
            Ok(())
        } else {
            Err(DndError::FormatNotSupported)
        }
    }

    fn canonical_format(&self, _format: &FormatEtc) -> CanonicalFormat {
        CanonicalFormat::SameFormat
    }

    fn set_data(
        &self,
        _format: &FormatEtc,
        _medium: StgMedium,
        _release: bool,
    ) -> Result<(), DndError> {
        Err(DndError::NotImplemented)
    }

    fn enum_formats(&self, direction: DataDir) -> Result<ComPtr<FormatEnumerator>, DndError> {
        match direction {
            DataDir::Get => Ok(ComPtr::new(FormatEnumerator::new(vec![FormatEtc::hdrop()]))),
            DataDir::Set => Err(DndError::NotImplemented),
        }
    }

    fn advise(&self, _format: &FormatEtc, _flags: u32) -> Result<u32, DndError> {
        Err(DndError::AdviseNotSupported)
    }

    fn unadvise(&self, _connection: u32) -> Result<(), DndError> {
        Err(DndError::AdviseNotSupported)
    }

    fn enum_advise(&self) -> Result<Vec<u32>, DndError> {
        Err(DndError::AdviseNotSupported)
    }
}

/// Cursor over a fixed list of formats (IEnumFORMATETC)
pub struct FormatEnumerator {
    formats: Vec<FormatEtc>,
    position: Cell<usize>,
}

#[allow(dead_code)]
impl FormatEnumerator {
    pub fn new(formats: Vec<FormatEtc>) -> Self {
        Self {
            formats,
            position: Cell::new(0),
        }
    }

    /// Fetch up to `count` formats, advancing the cursor
    pub fn next(&self, count: usize) -> Vec<FormatEtc> {
        let start = self.position.get().min(self.formats.len());
        let end = start.saturating_add(count).min(self.formats.len());
        self.position.set(end);
        self.formats[start..end].to_vec()
    }

    /// Skip `count` formats; false if the end was reached first
    pub fn skip(&self, count: usize) -> bool {
        let target = self.position.get().saturating_add(count);
        self.position.set(target.min(self.formats.len()));
        target <= self.formats.len()
    }

    pub fn reset(&self) {
        self.position.set(0);
    }

    /// Independent enumerator at the same position
    pub fn clone_enum(&self) -> ComPtr<FormatEnumerator> {
        ComPtr::new(Self {
            formats: self.formats.clone(),
            position: Cell::new(self.position.get()),
        })
    }
}

impl Unknown for FormatEnumerator {
    fn interfaces(&self) -> &'static [Interface] {
        &[Interface::EnumFormatEtc]
    }
}
