use crate::error::{CollectionError, SharedError};
use std::any::{Any, TypeId};
use std::cell::Cell;
use std::error::Error as StdError;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

static INSTALL_HOOK: Once = Once::new();

thread_local! {
    static CAPTURE_DEPTH: Cell<usize> = Cell::new(0);
}

#[cfg(test)]
thread_local! {
    static FORWARDED: Cell<usize> = Cell::new(0);
}

/// Origin of a captured panic payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The callback panicked with a `&str` or `String`
    Message,
    /// The callback panicked with an error value
    Structured,
    /// The payload was something else entirely
    Unknown,
}

/// A panic payload taken from `catch_unwind`, with its type recorded for inspection
pub(crate) struct Payload {
    type_id: TypeId,
    value: Box<dyn Any + Send>,
}

impl Payload {
    pub(crate) fn new(value: Box<dyn Any + Send>) -> Self {
        Self {
            type_id: (*value).type_id(),
            value,
        }
    }

    /// Check if the payload is of type T
    pub(crate) fn is_type<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub(crate) fn kind(&self) -> FaultKind {
        if self.is_type::<&'static str>() || self.is_type::<String>() {
            FaultKind::Message
        } else if self.is_type::<CollectionError>()
            || self.is_type::<Box<dyn StdError + Send + Sync>>()
            || self.is_type::<SharedError>()
        {
            FaultKind::Structured
        } else {
            FaultKind::Unknown
        }
    }

    /// Reduce the payload to a single error value
    pub(crate) fn into_error(self) -> CollectionError {
        if let Some(message) = self.value.downcast_ref::<&'static str>() {
            return CollectionError::Panicked((*message).to_string());
        }
        let value = match self.value.downcast::<String>() {
            Ok(message) => return CollectionError::Panicked(*message),
            Err(value) => value,
        };
        let value = match value.downcast::<CollectionError>() {
            Ok(err) => return *err,
            Err(value) => value,
        };
        let value = match value.downcast::<Box<dyn StdError + Send + Sync>>() {
            Ok(err) => return CollectionError::Raised(SharedError::from(*err)),
            Err(value) => value,
        };
        match value.downcast::<SharedError>() {
            Ok(err) => CollectionError::Raised(*err),
            Err(_) => CollectionError::UnknownPanic,
        }
    }
}

/// Wraps the process panic hook so panics raised inside [`capture`] are not reported
///
/// Panics on a thread that is not capturing still reach the hook that was
/// installed before the first `capture` call.
fn install_quiet_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CAPTURE_DEPTH.try_with(Cell::get).unwrap_or(0) > 0 {
                return;
            }
            #[cfg(test)]
            FORWARDED.with(|count| count.set(count.get() + 1));
            previous(info);
        }));
    });
}

/// Marks the current thread as capturing until dropped; nests
struct Capturing;

impl Capturing {
    fn enter() -> Self {
        CAPTURE_DEPTH.with(|depth| depth.set(depth.get() + 1));
        Capturing
    }
}

impl Drop for Capturing {
    fn drop(&mut self) {
        CAPTURE_DEPTH.with(|depth| depth.set(depth.get() - 1));
    }
}

/// Runs `f`, converting a panic into a `CollectionError`
///
/// The panic never escapes this call. Text payloads become
/// [`CollectionError::Panicked`] carrying the text verbatim, a `CollectionError`
/// payload is returned unchanged, boxed or shared `dyn Error` payloads become
/// [`CollectionError::Raised`], and anything else becomes
/// [`CollectionError::UnknownPanic`].
///
/// A captured panic is reported only through the returned error: the first
/// call wraps the process panic hook so that it stays silent while `f` runs on
/// this thread. Hooks installed afterwards replace the wrapper.
///
/// # Examples
///
/// ```
/// use sovran_collections::{capture, CollectionError};
///
/// let ok = capture(|| 21 * 2);
/// assert_eq!(ok.unwrap(), 42);
///
/// let err = capture(|| -> i32 { panic!("boom") }).unwrap_err();
/// assert_eq!(err.to_string(), "boom");
/// assert!(matches!(err, CollectionError::Panicked(_)));
/// ```
pub fn capture<R, F>(f: F) -> Result<R, CollectionError>
where
    F: FnOnce() -> R,
{
    install_quiet_hook();
    let result = {
        let _capturing = Capturing::enter();
        panic::catch_unwind(AssertUnwindSafe(f))
    };
    result.map_err(|payload| {
        let payload = Payload::new(payload);
        let kind = payload.kind();
        let error = payload.into_error();
        tracing::debug!(?kind, %error, "captured callback panic");
        error
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Rejected(u32);

    impl fmt::Display for Rejected {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "rejected {}", self.0)
        }
    }

    impl StdError for Rejected {}

    #[test]
    fn test_success_passes_through() {
        assert_eq!(capture(|| "fine").unwrap(), "fine");
    }

    #[test]
    fn test_static_str_payload() {
        let err = capture(|| panic!("unexpected value")).unwrap_err();
        assert_eq!(err.kind(), Some(FaultKind::Message));
        assert_eq!(err.to_string(), "unexpected value");
    }

    #[test]
    fn test_formatted_string_payload() {
        let err = capture(|| panic!("item {} is bad", 7)).unwrap_err();
        assert_eq!(err.kind(), Some(FaultKind::Message));
        assert_eq!(err.to_string(), "item 7 is bad");
    }

    #[test]
    fn test_collection_error_payload_is_unchanged() {
        let err = capture(|| panic::panic_any(CollectionError::KeyNotFound("k".to_string())))
            .unwrap_err();
        assert!(matches!(err, CollectionError::KeyNotFound(ref key) if key == "k"));
    }

    #[test]
    fn test_boxed_error_payload() {
        let err = capture(|| {
            let boxed: Box<dyn StdError + Send + Sync> = Box::new(Rejected(4));
            panic::panic_any(boxed)
        })
        .unwrap_err();
        assert_eq!(err.kind(), Some(FaultKind::Structured));
        assert_eq!(err.to_string(), "rejected 4");
    }

    #[test]
    fn test_shared_error_payload() {
        let err = capture(|| {
            let shared: SharedError = Arc::new(Rejected(9));
            panic::panic_any(shared)
        })
        .unwrap_err();
        assert_eq!(err.kind(), Some(FaultKind::Structured));
        assert_eq!(err.to_string(), "rejected 9");
    }

    #[test]
    fn test_unknown_payload() {
        let err = capture(|| panic::panic_any(17u64)).unwrap_err();
        assert_eq!(err.kind(), Some(FaultKind::Unknown));
        assert_eq!(err.to_string(), "Unknown panic");
    }

    #[test]
    fn test_captured_panic_is_not_reported_by_the_hook() {
        let before = FORWARDED.with(Cell::get);
        let err = capture(|| panic!("unexpected value")).unwrap_err();
        assert_eq!(err.to_string(), "unexpected value");
        assert_eq!(FORWARDED.with(Cell::get), before);

        // Panics outside capture still reach the previous hook
        assert!(panic::catch_unwind(|| panic!("not captured")).is_err());
        assert_eq!(FORWARDED.with(Cell::get), before + 1);
    }

    #[test]
    fn test_nested_capture_stays_quiet() {
        let before = FORWARDED.with(Cell::get);
        let err = capture(|| {
            let inner = capture(|| panic!("inner"));
            assert_eq!(inner.unwrap_err().to_string(), "inner");
            panic!("outer")
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "outer");
        assert_eq!(FORWARDED.with(Cell::get), before);
        assert_eq!(CAPTURE_DEPTH.with(Cell::get), 0);
    }

    #[test]
    fn test_payload_kind() {
        assert_eq!(Payload::new(Box::new("text")).kind(), FaultKind::Message);
        assert_eq!(
            Payload::new(Box::new(String::from("text"))).kind(),
            FaultKind::Message
        );
        assert_eq!(
            Payload::new(Box::new(CollectionError::UnknownPanic)).kind(),
            FaultKind::Structured
        );
        assert_eq!(Payload::new(Box::new(3.5f32)).kind(), FaultKind::Unknown);
    }
}
