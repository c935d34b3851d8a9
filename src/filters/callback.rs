/// Shared callables stored in the configuration
///
/// Every callable is held behind an `Arc` so cloning a configuration shares
/// the same closures. Equality is identity: two handles are equal only when
/// they point at the same allocation.
use std::fmt;
use std::sync::Arc;

use crate::config::Configuration;

/// Notice payload handed to async handlers and ignore filters
pub type Notice = serde_json::Value;

macro_rules! callable_handle {
    ($(#[$meta:meta])* $name:ident, $kind:literal, $($sig:tt)+) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name(Arc<$($sig)+ + Send + Sync>);

        impl $name {
            /// Short label used in debug output and serialized snapshots
            pub fn kind(&self) -> &'static str {
                $kind
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:p})", stringify!($name), Arc::as_ptr(&self.0) as *const ())
            }
        }
    };
}

callable_handle!(
    /// Handler that takes over delivery of a notice (the `async` option)
    AsyncHandler,
    "async",
    dyn Fn(Notice) -> Notice
);

callable_handle!(
    /// Rewrites a single backtrace line, or returns `None` to drop it
    BacktraceFilter,
    "backtrace_filter",
    dyn Fn(&str, &Configuration) -> Option<String>
);

callable_handle!(
    /// Returns `true` when a notice should not be reported
    IgnoreFilter,
    "ignore_filter",
    dyn Fn(&Notice) -> bool
);

callable_handle!(
    /// Free-form string predicate used by `Rule::Predicate`
    Predicate,
    "predicate",
    dyn Fn(&str) -> bool
);

impl AsyncHandler {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(Notice) -> Notice + Send + Sync + 'static,
    {
        Self(Arc::new(handler))
    }

    pub fn call(&self, notice: Notice) -> Notice {
        (self.0)(notice)
    }
}

impl BacktraceFilter {
    pub fn new<F>(filter: F) -> Self
    where
        F: Fn(&str, &Configuration) -> Option<String> + Send + Sync + 'static,
    {
        Self(Arc::new(filter))
    }

    pub fn apply(&self, line: &str, config: &Configuration) -> Option<String> {
        (self.0)(line, config)
    }
}

impl IgnoreFilter {
    pub fn new<F>(filter: F) -> Self
    where
        F: Fn(&Notice) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(filter))
    }

    pub fn matches(&self, notice: &Notice) -> bool {
        (self.0)(notice)
    }
}

impl Predicate {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    pub fn test(&self, candidate: &str) -> bool {
        (self.0)(candidate)
    }
}

/// Any stored callable, as it appears in a configuration snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum Callable {
    Async(AsyncHandler),
    Backtrace(BacktraceFilter),
    Ignore(IgnoreFilter),
    Predicate(Predicate),
}

impl Callable {
    pub fn kind(&self) -> &'static str {
        match self {
            Callable::Async(h) => h.kind(),
            Callable::Backtrace(f) => f.kind(),
            Callable::Ignore(f) => f.kind(),
            Callable::Predicate(p) => p.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_async_handler_call() {
        let handler = AsyncHandler::new(|notice| notice);
        assert_eq!(handler.call(json!("foo")), json!("foo"));
    }

    #[test]
    fn test_identity_equality() {
        let a = Predicate::new(|s| s.is_empty());
        let b = Predicate::new(|s| s.is_empty());

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_ignore_filter_matches() {
        let filter = IgnoreFilter::new(|notice| notice["error_class"] == "Timeout");
        assert!(filter.matches(&json!({ "error_class": "Timeout" })));
        assert!(!filter.matches(&json!({ "error_class": "Panic" })));
    }

    #[test]
    fn test_callable_kind() {
        let callable = Callable::Async(AsyncHandler::new(|n| n));
        assert_eq!(callable.kind(), "async");
        assert!(format!("{:?}", callable).contains("AsyncHandler"));
    }
}
