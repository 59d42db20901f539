// COM-style object base
// Atomic manual reference counting shared by every drag-and-drop participant

use crate::dnd::DndError;
use log::trace;
use std::fmt;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ops::Deref;
use std::ptr::NonNull;
use std::sync::atomic::{fence, AtomicU32, Ordering};

/// Closed set of capabilities an object can be queried for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interface {
    /// The universal "any object" capability, implemented by everyone
    Unknown,
    DropTarget,
    DropSource,
    DataObject,
    #[allow(dead_code)]
    EnumFormatEtc,
}

impl Interface {
    pub fn name(self) -> &'static str {
        match self {
            Interface::Unknown => "IUnknown",
            Interface::DropTarget => "IDropTarget",
            Interface::DropSource => "IDropSource",
            Interface::DataObject => "IDataObject",
            Interface::EnumFormatEtc => "IEnumFORMATETC",
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capability negotiation implemented by every protocol participant
pub trait Unknown {
    /// Interfaces implemented besides `Interface::Unknown`
    fn interfaces(&self) -> &'static [Interface];
}

/// Heap cell pairing an object with its holder count
pub struct ComBox<T: ?Sized> {
    refs: AtomicU32,
    value: T,
}

impl<T> ComBox<T> {
    /// The creator is the first holder, so the count starts at 1
    pub fn new(value: T) -> Self {
        Self {
            refs: AtomicU32::new(1),
            value,
        }
    }
}

/// One counted reference to a COM-style object.
///
/// Every live `ComPtr` accounts for exactly one unit of the object's count.
/// `add_ref` hands out another unit, `release` (or dropping the handle) gives
/// one back, and the object is destroyed on the transition to zero. Because
/// `release` consumes the handle, a reference can't be used after it has
/// been given back.
pub struct ComPtr<T: ?Sized> {
    ptr: NonNull<ComBox<T>>,
    _marker: PhantomData<ComBox<T>>,
}

impl<T> ComPtr<T> {
    /// Create a new object owned by the returned handle
    #[allow(dead_code)]
    pub fn new(value: T) -> Self {
        Self::from_box(Box::new(ComBox::new(value)))
    }
}

impl<T: ?Sized> ComPtr<T> {
    /// Take ownership of a freshly boxed object.
    ///
    /// Accepting a box lets callers coerce to a trait object first, e.g.
    /// `Box<ComBox<dyn DropTarget>>`.
    pub fn from_box(boxed: Box<ComBox<T>>) -> Self {
        Self {
            ptr: NonNull::from(Box::leak(boxed)),
            _marker: PhantomData,
        }
    }

    fn inner(&self) -> &ComBox<T> {
        // SAFETY: this handle holds a unit of the count, so the box is alive.
        unsafe { self.ptr.as_ref() }
    }

    /// Acquire another reference to the same object
    pub fn add_ref(&self) -> Self {
        let count = self.inner().refs.fetch_add(1, Ordering::Relaxed) + 1;
        trace!("AddRef -> {}", count);
        Self {
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }

    /// Give this reference back, returning the remaining count
    pub fn release(self) -> u32 {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never touched again after giving back its unit.
        unsafe { Self::release_raw(this.ptr) }
    }

    /// Current number of holders (a snapshot, only meaningful single-threaded)
    pub fn ref_count(&self) -> u32 {
        self.inner().refs.load(Ordering::Acquire)
    }

    /// Whether two handles point at the same object
    #[allow(dead_code)]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        std::ptr::addr_eq(a.ptr.as_ptr(), b.ptr.as_ptr())
    }

    /// # Safety
    /// The caller must own one unit of the count and must not use `ptr` again.
    unsafe fn release_raw(ptr: NonNull<ComBox<T>>) -> u32 {
        let previous = ptr.as_ref().refs.fetch_sub(1, Ordering::Release);
        if previous != 1 {
            trace!("Release -> {}", previous - 1);
            return previous - 1;
        }
        // Synchronize with every other release before tearing down.
        fence(Ordering::Acquire);
        trace!("Release -> 0, destroying object");
        drop(Box::from_raw(ptr.as_ptr()));
        0
    }
}

impl<T: ?Sized + Unknown> ComPtr<T> {
    /// Query the object for a capability.
    ///
    /// `Interface::Unknown` and every interface the object implements yield a
    /// new reference to the same object. Anything else fails with
    /// `DndError::NoInterface` and leaves the count alone.
    #[allow(dead_code)]
    pub fn query_interface(&self, iid: Interface) -> Result<Self, DndError> {
        if self.supports(iid) {
            Ok(self.add_ref())
        } else {
            Err(DndError::NoInterface(iid))
        }
    }

    pub fn supports(&self, iid: Interface) -> bool {
        iid == Interface::Unknown || self.inner().value.interfaces().contains(&iid)
    }
}

impl<T: ?Sized> Deref for ComPtr<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner().value
    }
}

impl<T: ?Sized> Drop for ComPtr<T> {
    fn drop(&mut self) {
        // SAFETY: the handle is going away, so its unit is given back once.
        unsafe {
            Self::release_raw(self.ptr);
        }
    }
}

impl<T: ?Sized> fmt::Debug for ComPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComPtr")
            .field("ptr", &self.ptr)
            .field("refs", &self.ref_count())
            .finish()
    }
}

// SAFETY: the count is atomic and the value is only shared by reference, which
// is exactly what `Arc` requires of its payload.
unsafe impl<T: ?Sized + Send + Sync> Send for ComPtr<T> {}
unsafe impl<T: ?Sized + Send + Sync> Sync for ComPtr<T> {}
