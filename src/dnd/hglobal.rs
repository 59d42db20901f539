// Shared memory medium
// Anonymous shared mappings standing in for HGLOBAL blocks, and the
// CF_HDROP (DROPFILES) layout written into them

use super::format::Tymed;
use super::DndError;
use log::warn;
use memmap2::MmapMut;
use std::path::{Path, PathBuf};

/// Size of the DROPFILES header preceding the path list
pub const DROPFILES_HEADER_SIZE: usize = 20;

/// A singly-owned shared memory block.
///
/// The block is freed when dropped. Handing data to someone else means
/// giving them a [`GlobalBlock::duplicate`], never the block itself.
pub struct GlobalBlock {
    map: MmapMut,
}

impl GlobalBlock {
    /// Allocate a zero-filled block (GHND semantics)
    pub fn alloc(len: usize) -> Result<Self, DndError> {
        if len == 0 {
            return Err(DndError::InvalidArg("zero-sized block".into()));
        }
        let map = MmapMut::map_anon(len).map_err(|e| {
            warn!("Shared block allocation of {} bytes failed: {}", len, e);
            DndError::OutOfMemory(len)
        })?;
        Ok(Self { map })
    }

    /// Allocate a block holding a copy of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DndError> {
        let mut block = Self::alloc(bytes.len())?;
        block.as_mut_bytes().copy_from_slice(bytes);
        Ok(block)
    }

    /// Independent copy of this block, owned by whoever receives it
    pub fn duplicate(&self) -> Result<Self, DndError> {
        Self::from_bytes(self.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.map
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.map
    }
}

impl std::fmt::Debug for GlobalBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalBlock")
            .field("addr", &self.map.as_ptr())
            .field("len", &self.map.len())
            .finish()
    }
}

/// Storage medium handed across the protocol (STGMEDIUM).
///
/// Dropping it frees the block, the equivalent of `ReleaseStgMedium`.
#[derive(Debug)]
pub struct StgMedium {
    tymed: Tymed,
    block: GlobalBlock,
}

impl StgMedium {
    pub fn hglobal(block: GlobalBlock) -> Self {
        Self {
            tymed: Tymed::HGLOBAL,
            block,
        }
    }

    #[allow(dead_code)]
    pub fn tymed(&self) -> Tymed {
        self.tymed
    }

    pub fn block(&self) -> &GlobalBlock {
        &self.block
    }

    /// Free the medium now
    pub fn release(self) {
        drop(self);
    }
}

fn wide(path: &Path) -> Result<Vec<u16>, DndError> {
    // A lossy conversion would name a different file than the one checked.
    let text = path.to_str().ok_or_else(|| {
        DndError::InvalidArg(format!("{} is not valid Unicode", path.display()))
    })?;
    Ok(text.encode_utf16().collect())
}

/// Build a CF_HDROP block listing `paths`.
///
/// Layout: DROPFILES header (`pFiles`, `pt.x`, `pt.y`, `fNC`, `fWide`),
/// then each path as NUL-terminated UTF-16LE, then one more NUL.
pub fn encode_file_list(paths: &[PathBuf]) -> Result<GlobalBlock, DndError> {
    if paths.is_empty() {
        return Err(DndError::InvalidArg("empty file list".into()));
    }

    let mut units: Vec<u16> = Vec::new();
    for path in paths {
        units.extend(wide(path)?);
        units.push(0);
    }
    units.push(0);

    let mut block = GlobalBlock::alloc(DROPFILES_HEADER_SIZE + units.len() * 2)?;
    let bytes = block.as_mut_bytes();
    bytes[0..4].copy_from_slice(&(DROPFILES_HEADER_SIZE as u32).to_le_bytes());
    // pt and fNC stay zero
    bytes[16..20].copy_from_slice(&1i32.to_le_bytes());
    for (chunk, unit) in bytes[DROPFILES_HEADER_SIZE..].chunks_exact_mut(2).zip(&units) {
        chunk.copy_from_slice(&unit.to_le_bytes());
    }
    Ok(block)
}

/// Read the path list out of a CF_HDROP block (DragQueryFile)
pub fn decode_file_list(bytes: &[u8]) -> Result<Vec<PathBuf>, DndError> {
    if bytes.len() < DROPFILES_HEADER_SIZE {
        return Err(DndError::Malformed("block shorter than DROPFILES header"));
    }
    let offset = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    let is_wide = i32::from_le_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]) != 0;
    if offset < DROPFILES_HEADER_SIZE || offset > bytes.len() {
        return Err(DndError::Malformed("file list offset out of range"));
    }
    let list = &bytes[offset..];

    let mut paths = Vec::new();
    if is_wide {
        let units: Vec<u16> = list
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        for entry in units.split(|&unit| unit == 0) {
            if entry.is_empty() {
                break;
            }
            paths.push(PathBuf::from(String::from_utf16_lossy(entry)));
        }
    } else {
        for entry in list.split(|&byte| byte == 0) {
            if entry.is_empty() {
                break;
            }
            paths.push(PathBuf::from(String::from_utf8_lossy(entry).into_owned()));
        }
    }
    Ok(paths)
}
