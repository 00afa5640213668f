//! Unchecked version of the shared node cell.
//!
//! If the logic is correct with the checked version,
//! it should also be sound with this unchecked version
//! as all the borrow checks in there are redundant and always panic when failed.
//! Tree invariant checks (`assume!`, `unreachable!`) stay enabled in both versions.

use std::cell::UnsafeCell;
use std::rc::{Rc, Weak};

pub use std::{assert as assume, unreachable};

pub type Ref<'a, T> = &'a T;
pub type RefMut<'a, T> = &'a mut T;

#[derive(Debug)]
pub struct RcCell<T> {
    inner: Rc<UnsafeCell<T>>,
}

#[derive(Debug)]
pub struct WeakCell<T> {
    inner: Weak<UnsafeCell<T>>,
}

impl<T> RcCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(UnsafeCell::new(value)),
        }
    }

    pub fn ptr_eq(&self, rhs: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &rhs.inner)
    }

    pub fn get(&self) -> Ref<'_, T> {
        unsafe { &*self.inner.get() }
    }

    #[allow(clippy::mut_from_ref)]
    pub fn get_mut(&self) -> RefMut<'_, T> {
        unsafe { &mut *self.inner.get() }
    }

    pub fn shallow_clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }

    pub fn downgrade(&self) -> WeakCell<T> {
        WeakCell {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Returns `None` if any other strong handle is still alive.
    pub fn into_inner(self) -> Option<T> {
        Rc::try_unwrap(self.inner).ok().map(UnsafeCell::into_inner)
    }
}

impl<T> WeakCell<T> {
    pub fn upgrade(&self) -> Option<RcCell<T>> {
        self.inner.upgrade().map(|inner| RcCell { inner })
    }
}

pub fn map_ref<T, U, F: FnOnce(&T) -> &U>(orig: Ref<'_, T>, f: F) -> Ref<'_, U> {
    f(orig)
}
