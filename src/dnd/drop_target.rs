// Drop target
// Receives files dragged onto the viewer and shows the first image among them

use super::data_object::DataObject;
use super::format::{DropEffect, FormatEtc, KeyState, Point};
use super::hglobal::decode_file_list;
use super::DndError;
use crate::app::ViewerState;
use crate::com::{ComBox, ComPtr, Interface, Unknown};
use crate::scanner::is_supported_image;
use log::{debug, error, info, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// The receiving side of a drag (IDropTarget)
pub trait DropTarget: Unknown {
    /// The pointer entered the target carrying `data`
    fn drag_enter(
        &self,
        data: &dyn DataObject,
        keys: KeyState,
        point: Point,
    ) -> Result<DropEffect, DndError>;

    fn drag_over(&self, keys: KeyState, point: Point) -> Result<DropEffect, DndError>;

    fn drag_leave(&self) -> Result<(), DndError>;

    /// The user released over the target
    fn drop_data(
        &self,
        data: &dyn DataObject,
        keys: KeyState,
        point: Point,
    ) -> Result<DropEffect, DndError>;
}

/// Where a target is in its enter/over/leave cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPhase {
    Idle,
    DragEntered,
}

/// Drop target registered for the viewer window
pub struct ImageDropTarget {
    state: Rc<RefCell<ViewerState>>,
    phase: Cell<TargetPhase>,
}

impl ImageDropTarget {
    pub fn new(state: Rc<RefCell<ViewerState>>) -> Self {
        Self {
            state,
            phase: Cell::new(TargetPhase::Idle),
        }
    }

    pub fn into_com(self) -> ComPtr<dyn DropTarget> {
        let boxed: Box<ComBox<dyn DropTarget>> = Box::new(ComBox::new(self));
        ComPtr::from_box(boxed)
    }

    #[allow(dead_code)]
    pub fn phase(&self) -> TargetPhase {
        self.phase.get()
    }

    /// Show the first supported image in the payload, if any
    fn accept_payload(&self, data: &dyn DataObject) {
        let medium = match data.get_data(&FormatEtc::hdrop()) {
            Ok(medium) => medium,
            Err(e) => {
                debug!("Dropped data has no file list: {}", e);
                return;
            }
        };

        match decode_file_list(medium.block().as_bytes()) {
            Ok(paths) => match paths.into_iter().find(|p| is_supported_image(p)) {
                Some(path) => match self.state.try_borrow_mut() {
                    Ok(mut state) => {
                        info!("Dropped image: {}", path.display());
                        state.show_image(path);
                    }
                    Err(_) => error!("Viewer state busy, ignoring dropped {}", path.display()),
                },
                None => debug!("Drop contained no supported image"),
            },
            Err(e) => warn!("Ignoring unreadable file list: {}", e),
        }

        medium.release();
    }
}

impl Unknown for ImageDropTarget {
    fn interfaces(&self) -> &'static [Interface] {
        &[Interface::DropTarget]
    }
}

impl DropTarget for ImageDropTarget {
    fn drag_enter(
        &self,
        _data: &dyn DataObject,
        _keys: KeyState,
        _point: Point,
    ) -> Result<DropEffect, DndError> {
        self.phase.set(TargetPhase::DragEntered);
        Ok(DropEffect::COPY)
    }

    fn drag_over(&self, _keys: KeyState, _point: Point) -> Result<DropEffect, DndError> {
        Ok(DropEffect::COPY)
    }

    fn drag_leave(&self) -> Result<(), DndError> {
        self.phase.set(TargetPhase::Idle);
        Ok(())
    }

    fn drop_data(
        &self,
        data: &dyn DataObject,
        _keys: KeyState,
        _point: Point,
    ) -> Result<DropEffect, DndError> {
        self.phase.set(TargetPhase::Idle);
        self.accept_payload(data);
        Ok(DropEffect::COPY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dnd::data_object::FormatEnumerator;
    use crate::dnd::format::{CanonicalFormat, DataDir};
    use crate::dnd::hglobal::{encode_file_list, GlobalBlock, StgMedium};
    use crate::i18n::Language;
    use std::path::{Path, PathBuf};

    /// Data object serving a prebuilt block, counting outstanding media
    struct RawPayload {
        block: Option<GlobalBlock>,
        handed_out: Cell<usize>,
    }

    impl RawPayload {
        fn files(paths: &[&str]) -> Self {
            let paths: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
            Self {
                block: Some(encode_file_list(&paths).unwrap()),
                handed_out: Cell::new(0),
            }
        }

        fn empty() -> Self {
            Self {
                block: None,
                handed_out: Cell::new(0),
            }
        }
    }

    impl Unknown for RawPayload {
        fn interfaces(&self) -> &'static [Interface] {
            &[Interface::DataObject]
        }
    }

    impl DataObject for RawPayload {
        fn get_data(&self, format: &FormatEtc) -> Result<StgMedium, DndError> {
            let block = self.block.as_ref().ok_or(DndError::FormatNotSupported)?;
            if !format.wants_hdrop() {
                return Err(DndError::FormatNotSupported);
            }
            self.handed_out.set(self.handed_out.get() + 1);
            Ok(StgMedium::hglobal(block.duplicate()?))
        }

        fn get_data_here(&self, _: &FormatEtc, _: &mut StgMedium) -> Result<(), DndError> {
            Err(DndError::NotImplemented)
        }

        fn query_get_data(&self, _: &FormatEtc) -> Result<(), DndError> {
            Ok(())
        }

        fn canonical_format(&self, _: &FormatEtc) -> CanonicalFormat {
            CanonicalFormat::SameFormat
        }

        fn set_data(&self, _: &FormatEtc, _: StgMedium, _: bool) -> Result<(), DndError> {
            Err(DndError::NotImplemented)
        }

        fn enum_formats(&self, _: DataDir) -> Result<ComPtr<FormatEnumerator>, DndError> {
            Err(DndError::NotImplemented)
        }

        fn advise(&self, _: &FormatEtc, _: u32) -> Result<u32, DndError> {
            Err(DndError::AdviseNotSupported)
        }

        fn unadvise(&self, _: u32) -> Result<(), DndError> {
            Err(DndError::AdviseNotSupported)
        }

        fn enum_advise(&self) -> Result<Vec<u32>, DndError> {
            Err(DndError::AdviseNotSupported)
        }
    }

    fn target() -> (Rc<RefCell<ViewerState>>, ImageDropTarget) {
        let state = Rc::new(RefCell::new(ViewerState::new(Language::En)));
        let target = ImageDropTarget::new(state.clone());
        (state, target)
    }

    fn drop_onto(target: &ImageDropTarget, payload: &RawPayload) -> DropEffect {
        let point = Point { x: 10, y: 10 };
        assert_eq!(
            target.drag_enter(payload, KeyState::LBUTTON, point).unwrap(),
            DropEffect::COPY
        );
        assert_eq!(target.drag_over(KeyState::LBUTTON, point).unwrap(), DropEffect::COPY);
        target.drop_data(payload, KeyState::NONE, point).unwrap()
    }

    #[test]
    fn first_matching_image_wins() {
        let (state, target) = target();
        let payload = RawPayload::files(&["C:\\a\\photo.TXT", "C:\\b\\pic.JPG", "C:\\c\\x.png"]);

        assert_eq!(drop_onto(&target, &payload), DropEffect::COPY);

        let state = state.borrow();
        assert_eq!(state.current_image(), Some(Path::new("C:\\b\\pic.JPG")));
        assert_eq!(state.history().entries(), &[PathBuf::from("C:\\b\\pic.JPG")]);
        assert_eq!(state.history().cursor(), 0);
        assert!(state.needs_redraw());
        assert_eq!(target.phase(), TargetPhase::Idle);
    }

    #[test]
    fn drop_appends_after_existing_history() {
        let (state, target) = target();
        state.borrow_mut().show_image(PathBuf::from("/old/one.png"));
        state.borrow_mut().show_image(PathBuf::from("/old/two.png"));
        state.borrow_mut().navigate(false);

        drop_onto(&target, &RawPayload::files(&["/new/three.bmp"]));

        let state = state.borrow();
        assert_eq!(state.history().len(), 3);
        assert_eq!(state.history().cursor(), 2);
        assert_eq!(state.current_image(), Some(Path::new("/new/three.bmp")));
    }

    #[test]
    fn unrecognized_payload_changes_nothing() {
        let (state, target) = target();
        state.borrow_mut().show_image(PathBuf::from("/kept.png"));
        state.borrow_mut().take_redraw();

        let payload = RawPayload::files(&["/notes.txt", "/movie.mp4"]);
        assert_eq!(drop_onto(&target, &payload), DropEffect::COPY);
        assert_eq!(payload.handed_out.get(), 1);

        let state = state.borrow();
        assert_eq!(state.current_image(), Some(Path::new("/kept.png")));
        assert_eq!(state.history().len(), 1);
        assert!(!state.needs_redraw());
    }

    #[test]
    fn missing_file_list_is_accepted_silently() {
        let (state, target) = target();
        assert_eq!(drop_onto(&target, &RawPayload::empty()), DropEffect::COPY);
        assert!(state.borrow().history().is_empty());
        assert_eq!(state.borrow().current_image(), None);
    }

    #[test]
    fn leave_returns_to_idle() {
        let (state, target) = target();
        let payload = RawPayload::files(&["/x.png"]);
        target.drag_enter(&payload, KeyState::LBUTTON, Point::default()).unwrap();
        assert_eq!(target.phase(), TargetPhase::DragEntered);
        target.drag_leave().unwrap();
        assert_eq!(target.phase(), TargetPhase::Idle);
        assert!(state.borrow().history().is_empty());
    }

    #[test]
    fn busy_state_does_not_panic() {
        let (state, target) = target();
        let held = state.borrow();
        assert_eq!(
            drop_onto(&target, &RawPayload::files(&["/x.png"])),
            DropEffect::COPY
        );
        assert!(held.history().is_empty());
    }
}
