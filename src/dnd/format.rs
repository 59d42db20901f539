// Format negotiation vocabulary
// Clipboard formats, storage media, drop effects and input state

use std::fmt;
use std::ops::{BitAnd, BitOr};

/// Clipboard format identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipFormat(pub u16);

impl ClipFormat {
    #[allow(dead_code)]
    pub const UNICODE_TEXT: ClipFormat = ClipFormat(13);
    /// List of dropped files (DROPFILES followed by the paths)
    pub const HDROP: ClipFormat = ClipFormat(15);
}

/// Storage medium flags (TYMED)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tymed(pub u32);

impl Tymed {
    pub const HGLOBAL: Tymed = Tymed(1);
    #[allow(dead_code)]
    pub const ISTREAM: Tymed = Tymed(4);

    pub fn contains(self, other: Tymed) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }
}

impl BitOr for Tymed {
    type Output = Tymed;

    fn bitor(self, rhs: Tymed) -> Tymed {
        Tymed(self.0 | rhs.0)
    }
}

/// Which rendering of the data is wanted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aspect {
    Content,
}

/// A (format, medium) request or offer, mirroring FORMATETC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatEtc {
    pub format: ClipFormat,
    pub aspect: Aspect,
    pub lindex: i32,
    pub tymed: Tymed,
}

impl FormatEtc {
    /// File list delivered through a shared memory block
    pub const fn hdrop() -> Self {
        Self {
            format: ClipFormat::HDROP,
            aspect: Aspect::Content,
            lindex: -1,
            tymed: Tymed::HGLOBAL,
        }
    }

    /// Whether this request can be served by a CF_HDROP over HGLOBAL offer
    pub fn wants_hdrop(&self) -> bool {
        self.format == ClipFormat::HDROP && self.tymed.contains(Tymed::HGLOBAL)
    }
}

/// Direction argument to format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum DataDir {
    Get,
    Set,
}

/// Drop effect flags (DROPEFFECT)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DropEffect(pub u32);

impl DropEffect {
    pub const NONE: DropEffect = DropEffect(0);
    pub const COPY: DropEffect = DropEffect(1);
    pub const MOVE: DropEffect = DropEffect(2);
    pub const LINK: DropEffect = DropEffect(4);

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl BitAnd for DropEffect {
    type Output = DropEffect;

    fn bitand(self, rhs: DropEffect) -> DropEffect {
        DropEffect(self.0 & rhs.0)
    }
}

impl BitOr for DropEffect {
    type Output = DropEffect;

    fn bitor(self, rhs: DropEffect) -> DropEffect {
        DropEffect(self.0 | rhs.0)
    }
}

impl fmt::Display for DropEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            DropEffect::NONE => "none",
            DropEffect::COPY => "copy",
            DropEffect::MOVE => "move",
            DropEffect::LINK => "link",
            _ => return write!(f, "{:#x}", self.0),
        };
        f.write_str(name)
    }
}

/// Mouse button and modifier state (MK_* flags)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyState(pub u32);

impl KeyState {
    pub const NONE: KeyState = KeyState(0);
    pub const LBUTTON: KeyState = KeyState(0x01);
    #[allow(dead_code)]
    pub const RBUTTON: KeyState = KeyState(0x02);
    #[allow(dead_code)]
    pub const SHIFT: KeyState = KeyState(0x04);
    #[allow(dead_code)]
    pub const CONTROL: KeyState = KeyState(0x08);

    pub fn contains(self, other: KeyState) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for KeyState {
    type Output = KeyState;

    fn bitor(self, rhs: KeyState) -> KeyState {
        KeyState(self.0 | rhs.0)
    }
}

/// Screen position of the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Answer to "should the drag go on?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAction {
    Continue,
    Drop,
    Cancel,
}

/// Answer to a feedback callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// Let the engine draw its standard drag cursors
    UseDefaultCursors,
}

/// Result of canonical format lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalFormat {
    /// The input is already canonical (DATA_S_SAMEFORMATETC)
    SameFormat,
}
