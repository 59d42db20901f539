// Drag engine host
// The platform side of drag-and-drop: target registration and the modal loop

use super::data_object::DataObject;
use super::drop_source::DropSource;
use super::drop_target::DropTarget;
use super::format::{DragAction, DropEffect, FormatEtc, KeyState, Point};
use super::hglobal::decode_file_list;
use super::DndError;
use crate::com::{ComBox, ComPtr, Interface, Unknown};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

/// How a modal drag loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Dropped on a target that accepted `effect`
    Dropped(DropEffect),
    Cancelled,
}

/// Host drag-and-drop entry points (RegisterDragDrop, RevokeDragDrop,
/// DoDragDrop)
pub trait DragEngine {
    /// Make `target` receive drags over the application window
    fn register_target(&mut self, target: ComPtr<dyn DropTarget>) -> Result<(), DndError>;

    /// Stop delivering drags to the registered target, handing its
    /// reference back
    fn revoke_target(&mut self) -> Option<ComPtr<dyn DropTarget>>;

    /// Run a blocking drag of `data` until it is dropped or cancelled
    fn do_drag_drop(
        &mut self,
        data: &ComPtr<dyn DataObject>,
        source: &ComPtr<dyn DropSource>,
        allowed: DropEffect,
    ) -> Result<DragOutcome, DndError>;
}

/// One sample of the user's input during a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputFrame {
    pub escape: bool,
    pub keys: KeyState,
    pub point: Point,
}

impl InputFrame {
    /// Left button held at `(x, y)`
    pub fn held(x: i32, y: i32) -> Self {
        Self {
            escape: false,
            keys: KeyState::LBUTTON,
            point: Point { x, y },
        }
    }

    /// Button let go at `(x, y)`
    pub fn released(x: i32, y: i32) -> Self {
        Self {
            escape: false,
            keys: KeyState::NONE,
            point: Point { x, y },
        }
    }

    /// Escape pressed with the button still held
    pub fn escape(x: i32, y: i32) -> Self {
        Self {
            escape: true,
            keys: KeyState::LBUTTON,
            point: Point { x, y },
        }
    }
}

/// What lies under the pointer during a scripted drag
pub enum Destination {
    /// The target registered for our own window
    Window,
    /// Some other application's target
    Target(ComPtr<dyn DropTarget>),
    /// Empty desktop, nothing accepts the drop
    Nowhere,
}

/// In-process engine replaying scripted input.
///
/// The loop runs synchronously on the calling thread, like the real modal
/// loop: every frame polls the source, forwards enter/over to the target
/// under the pointer and reports the answer back as feedback.
pub struct ScriptedEngine {
    registered: Option<ComPtr<dyn DropTarget>>,
    frames: VecDeque<InputFrame>,
    destination: Destination,
    loops_run: usize,
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            registered: None,
            frames: VecDeque::new(),
            destination: Destination::Nowhere,
            loops_run: 0,
        }
    }

    /// Queue the input and destination for the next drag
    pub fn script(&mut self, frames: Vec<InputFrame>, destination: Destination) {
        self.frames = frames.into();
        self.destination = destination;
    }

    /// Number of modal loops run so far
    #[allow(dead_code)]
    pub fn loops_run(&self) -> usize {
        self.loops_run
    }

    #[allow(dead_code)]
    pub fn has_registered_target(&self) -> bool {
        self.registered.is_some()
    }

    fn resolve_destination(&mut self) -> Option<ComPtr<dyn DropTarget>> {
        match std::mem::replace(&mut self.destination, Destination::Nowhere) {
            // The engine holds its own reference for the duration of the loop
            Destination::Window => self.registered.as_ref().map(ComPtr::add_ref),
            Destination::Target(target) => Some(target),
            Destination::Nowhere => None,
        }
    }
}

impl DragEngine for ScriptedEngine {
    fn register_target(&mut self, target: ComPtr<dyn DropTarget>) -> Result<(), DndError> {
        if !target.supports(Interface::DropTarget) {
            return Err(DndError::NoInterface(Interface::DropTarget));
        }
        if self.registered.is_some() {
            return Err(DndError::InvalidArg("a drop target is already registered".into()));
        }
        self.registered = Some(target);
        Ok(())
    }

    fn revoke_target(&mut self) -> Option<ComPtr<dyn DropTarget>> {
        self.registered.take()
    }

    fn do_drag_drop(
        &mut self,
        data: &ComPtr<dyn DataObject>,
        source: &ComPtr<dyn DropSource>,
        allowed: DropEffect,
    ) -> Result<DragOutcome, DndError> {
        self.loops_run += 1;
        let target = self.resolve_destination();
        let mut entered = false;
        let mut effect = DropEffect::NONE;

        while let Some(frame) = self.frames.pop_front() {
            match source.query_continue_drag(frame.escape, frame.keys) {
                DragAction::Continue => {
                    if let Some(target) = &target {
                        let answer = if entered {
                            target.drag_over(frame.keys, frame.point)?
                        } else {
                            entered = true;
                            target.drag_enter(&**data, frame.keys, frame.point)?
                        };
                        effect = answer & allowed;
                    }
                    source.give_feedback(effect);
                }
                DragAction::Drop => {
                    let Some(target) = &target else {
                        debug!("Drag released over nothing");
                        return Ok(DragOutcome::Cancelled);
                    };
                    if !entered {
                        effect = target.drag_enter(&**data, frame.keys, frame.point)? & allowed;
                    }
                    if effect.is_none() {
                        target.drag_leave()?;
                        return Ok(DragOutcome::Cancelled);
                    }
                    let accepted = target.drop_data(&**data, frame.keys, frame.point)? & allowed;
                    return Ok(DragOutcome::Dropped(accepted));
                }
                DragAction::Cancel => {
                    if let (Some(target), true) = (&target, entered) {
                        target.drag_leave()?;
                    }
                    return Ok(DragOutcome::Cancelled);
                }
            }
        }

        warn!("Drag input ended before the drag resolved, cancelling");
        if let (Some(target), true) = (&target, entered) {
            target.drag_leave()?;
        }
        Ok(DragOutcome::Cancelled)
    }
}

/// Standard gesture: press, move a few steps and let go
pub fn drag_gesture(steps: i32) -> Vec<InputFrame> {
    let mut frames: Vec<InputFrame> = (0..steps.max(1))
        .map(|step| InputFrame::held(step * 10, step * 5))
        .collect();
    let last = steps.max(1) * 10;
    frames.push(InputFrame::released(last, last / 2));
    frames
}

/// Target behaving like a file manager folder: dropped files are copied in
pub struct FolderDropTarget {
    folder: PathBuf,
    copied: RefCell<Vec<PathBuf>>,
}

impl FolderDropTarget {
    pub fn new(folder: &Path) -> Self {
        Self {
            folder: folder.to_path_buf(),
            copied: RefCell::new(Vec::new()),
        }
    }

    pub fn into_com(self) -> ComPtr<dyn DropTarget> {
        let boxed: Box<ComBox<dyn DropTarget>> = Box::new(ComBox::new(self));
        ComPtr::from_box(boxed)
    }

    /// Files written into the folder so far
    #[allow(dead_code)]
    pub fn copied(&self) -> Vec<PathBuf> {
        self.copied.borrow().clone()
    }

    fn copy_files(&self, files: Vec<PathBuf>) -> usize {
        let mut count = 0;
        for file in files {
            let Some(name) = file.file_name() else {
                warn!("Skipping dropped path without a file name: {}", file.display());
                continue;
            };
            let dest = self.folder.join(name);
            // Copying a file onto itself truncates it to nothing.
            if same_file(&file, &dest) {
                warn!("{} is already in {}, not copying", file.display(), self.folder.display());
                continue;
            }
            match fs::copy(&file, &dest) {
                Ok(_) => {
                    info!("Copied {} to {}", file.display(), dest.display());
                    self.copied.borrow_mut().push(dest);
                    count += 1;
                }
                Err(e) => warn!("Failed to copy {}: {}", file.display(), e),
            }
        }
        count
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl Unknown for FolderDropTarget {
    fn interfaces(&self) -> &'static [Interface] {
        &[Interface::DropTarget]
    }
}

impl DropTarget for FolderDropTarget {
    fn drag_enter(
        &self,
        data: &dyn DataObject,
        _keys: KeyState,
        _point: Point,
    ) -> Result<DropEffect, DndError> {
        // Probe first so unsupported drags get the "no drop" cursor
        Ok(match data.query_get_data(&FormatEtc::hdrop()) {
            Ok(()) => DropEffect::COPY,
            Err(_) => DropEffect::NONE,
        })
    }

    fn drag_over(&self, _keys: KeyState, _point: Point) -> Result<DropEffect, DndError> {
        Ok(DropEffect::COPY)
    }

    fn drag_leave(&self) -> Result<(), DndError> {
        Ok(())
    }

    fn drop_data(
        &self,
        data: &dyn DataObject,
        _keys: KeyState,
        _point: Point,
    ) -> Result<DropEffect, DndError> {
        let medium = data.get_data(&FormatEtc::hdrop())?;
        let files = decode_file_list(medium.block().as_bytes());
        medium.release();

        if self.copy_files(files?) > 0 {
            Ok(DropEffect::COPY)
        } else {
            Ok(DropEffect::NONE)
        }
    }
}
