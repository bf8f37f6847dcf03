//! Deferred values resolved exactly once at the point of use.
//!
//! Some lookup inputs are not known until the lookup actually happens,
//! most commonly a package version that an environment variable may
//! override. [`Provider`] captures such a value as either a fixed literal
//! or a thunk; the thunk runs the first time [`Provider::get`] is called
//! and its result is memoized, so the observed value can never change
//! between uses.

use std::cell::{Cell, OnceCell};

/// A value that is either fixed up front or produced by a thunk on first
/// access.
///
/// # Examples
///
/// ```
/// use bindrig::core::Provider;
///
/// let fixed = Provider::fixed("3.2.14".to_string());
/// assert_eq!(fixed.get(), "3.2.14");
///
/// let deferred = Provider::deferred(|| "resolved-late".to_string());
/// assert_eq!(deferred.get(), "resolved-late");
/// // Subsequent reads observe the memoized result.
/// assert_eq!(deferred.get(), "resolved-late");
/// ```
pub struct Provider<T> {
    value: OnceCell<T>,
    thunk: Cell<Option<Box<dyn FnOnce() -> T>>>,
}

impl<T> Provider<T> {
    /// Creates a provider holding an already-resolved value.
    #[must_use]
    pub fn fixed(value: T) -> Self {
        Self {
            value: OnceCell::from(value),
            thunk: Cell::new(None),
        }
    }

    /// Creates a provider that resolves by running `thunk` on first access.
    #[must_use]
    pub fn deferred(thunk: impl FnOnce() -> T + 'static) -> Self {
        Self {
            value: OnceCell::new(),
            thunk: Cell::new(Some(Box::new(thunk))),
        }
    }

    /// Returns the value, resolving the thunk if this is the first access.
    pub fn get(&self) -> &T {
        self.value.get_or_init(|| {
            // Invariant: the thunk is present exactly while the cell is
            // empty, so a deferred provider can never reach here twice.
            let thunk = self.thunk.take().expect("deferred value resolved twice");
            thunk()
        })
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Provider<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value.get() {
            Some(v) => f.debug_tuple("Provider").field(v).finish(),
            None => f.write_str("Provider(<deferred>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn fixed_value_is_returned_as_is() {
        let p = Provider::fixed(42u32);
        assert_eq!(*p.get(), 42);
    }

    #[test]
    fn thunk_runs_exactly_once() {
        let calls = Rc::new(RefCell::new(0u32));
        let counter = Rc::clone(&calls);
        let p = Provider::deferred(move || {
            *counter.borrow_mut() += 1;
            "value".to_string()
        });

        assert_eq!(*calls.borrow(), 0, "thunk must not run before first access");
        assert_eq!(p.get(), "value");
        assert_eq!(p.get(), "value");
        assert_eq!(*calls.borrow(), 1);
    }
}
