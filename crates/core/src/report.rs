//! Diagnostic reporting
//!
//! Failure sites report a human readable message through [`report_error!`]
//! and return a structured [`Error`](crate::Error) alongside it. Reporting
//! logs through `tracing` and keeps the message as the calling thread's
//! last error, it never changes control flow.

use std::cell::RefCell;

use crate::Error;

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Report a diagnostic message
///
/// # Example
/// ```
/// use tensorinfo_core::report::last_error;
/// use tensorinfo_core::report_error;
///
/// report_error!("tensor {} has no type", 3);
/// assert_eq!(last_error().as_deref(), Some("tensor 3 has no type"));
/// ```
#[macro_export]
macro_rules! report_error {
    ($($arg:tt)*) => {
        $crate::report::record(::std::format!($($arg)*))
    };
}

#[doc(hidden)]
pub fn record(message: String) {
    tracing::error!(target: "tensorinfo::report", "{}", message);
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(message));
}

/// Last message reported on this thread
pub fn last_error() -> Option<String> {
    LAST_ERROR.with(|slot| slot.borrow().clone())
}

/// Forget the last message reported on this thread
pub fn clear_last_error() {
    LAST_ERROR.with(|slot| slot.borrow_mut().take());
}

/// Report `message` and build the matching invalid-parameter error
pub(crate) fn invalid_parameter(message: impl Into<String>) -> Error {
    let message = message.into();
    record(message.clone());
    Error::InvalidParameter(message)
}
