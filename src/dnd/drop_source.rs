// Drop source
// Answers the engine's continue/feedback questions during an outbound drag

use super::format::{DragAction, DropEffect, Feedback, KeyState};
use crate::com::{ComBox, ComPtr, Interface, Unknown};

/// The source side of a drag (IDropSource)
pub trait DropSource: Unknown {
    /// Polled by the engine whenever the input state may have changed
    fn query_continue_drag(&self, escape_pressed: bool, keys: KeyState) -> DragAction;

    /// Called after each target answer with the effect it accepted
    fn give_feedback(&self, effect: DropEffect) -> Feedback;
}

/// Stateless source driven by the left mouse button
#[derive(Debug, Default)]
pub struct DragSource;

impl DragSource {
    pub fn new() -> Self {
        Self
    }

    pub fn into_com(self) -> ComPtr<dyn DropSource> {
        let boxed: Box<ComBox<dyn DropSource>> = Box::new(ComBox::new(self));
        ComPtr::from_box(boxed)
    }
}

impl Unknown for DragSource {
    fn interfaces(&self) -> &'static [Interface] {
        &[Interface::DropSource]
    }
}

impl DropSource for DragSource {
    fn query_continue_drag(&self, escape_pressed: bool, keys: KeyState) -> DragAction {
        if escape_pressed {
            DragAction::Cancel
        } else if !keys.contains(KeyState::LBUTTON) {
            DragAction::Drop
        } else {
            DragAction::Continue
        }
    }

    fn give_feedback(&self, _effect: DropEffect) -> Feedback {
        Feedback::UseDefaultCursors
    }
}
