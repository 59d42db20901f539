// Drag session orchestration
// Builds the data object and source for one modal drag and tears them down

use super::data_object::{DataObject, FileDataObject};
use super::drop_source::DragSource;
use super::engine::{DragEngine, DragOutcome};
use super::format::DropEffect;
use super::DndError;
use crate::com::ComPtr;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Drag `path` out of the application.
///
/// Fails before any allocation or engine call if the file is gone. Blocks
/// until the user drops or cancels.
pub fn begin_drag(engine: &mut dyn DragEngine, path: &Path) -> Result<DragOutcome, DndError> {
    info!("Dragging {}", path.display());
    drag_payload(engine, FileDataObject::new(path), DropEffect::COPY)
}

/// Drag existing files in from outside, as another application would
pub fn deliver_files(
    engine: &mut dyn DragEngine,
    paths: Vec<PathBuf>,
) -> Result<DragOutcome, DndError> {
    drag_payload(
        engine,
        FileDataObject::from_paths(paths),
        DropEffect::COPY | DropEffect::MOVE,
    )
}

/// Start the loop only once the payload exists; a failed build never
/// reaches the engine
fn drag_payload(
    engine: &mut dyn DragEngine,
    payload: Result<FileDataObject, DndError>,
    allowed: DropEffect,
) -> Result<DragOutcome, DndError> {
    let data = payload?.into_com();
    run_drag(engine, data, allowed)
}

fn run_drag(
    engine: &mut dyn DragEngine,
    data: ComPtr<dyn DataObject>,
    allowed: DropEffect,
) -> Result<DragOutcome, DndError> {
    let source = DragSource::new().into_com();
    let result = engine.do_drag_drop(&data, &source, allowed);

    // Both references are ours, and they go back whatever the loop returned.
    let source_refs = source.release();
    let data_refs = data.release();
    debug!(
        "Drag objects released (source refs left: {}, data refs left: {})",
        source_refs, data_refs
    );

    match &result {
        Ok(DragOutcome::Dropped(effect)) => info!("Drag dropped with effect {}", effect),
        Ok(DragOutcome::Cancelled) => info!("Drag cancelled"),
        Err(e) => warn!("Drag failed: {} ({:#010x})", e, e.hresult()),
    }
    result
}
