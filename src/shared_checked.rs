use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub use std::cell::{Ref, RefMut};
pub use std::{assert as assume, unreachable};

#[derive(Debug)]
pub struct RcCell<T> {
    inner: Rc<RefCell<T>>,
}

#[derive(Debug)]
pub struct WeakCell<T> {
    inner: Weak<RefCell<T>>,
}

impl<T> RcCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(value)),
        }
    }

    pub fn ptr_eq(&self, rhs: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &rhs.inner)
    }

    pub fn get(&self) -> Ref<'_, T> {
        self.inner.borrow()
    }

    pub fn get_mut(&self) -> RefMut<'_, T> {
        self.inner.borrow_mut()
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
        Rc::try_unwrap(self.inner).ok().map(RefCell::into_inner)
    }
}

impl<T> WeakCell<T> {
    pub fn upgrade(&self) -> Option<RcCell<T>> {
        self.inner.upgrade().map(|inner| RcCell { inner })
    }
}

pub fn map_ref<T, U, F: FnOnce(&T) -> &U>(orig: Ref<'_, T>, f: F) -> Ref<'_, U> {
    Ref::map(orig, f)
}
