/// Opaque logger handle for the `logger` option
use std::fmt;
use std::sync::Arc;

use tracing::{Dispatch, Subscriber};

/// A `tracing` dispatcher the notifier logs through instead of the global one.
///
/// Clones share the same dispatcher; equality is identity.
#[derive(Clone)]
pub struct Logger(Arc<Dispatch>);

impl Logger {
    pub fn new<S>(subscriber: S) -> Self
    where
        S: Subscriber + Send + Sync + 'static,
    {
        Self::from_dispatch(Dispatch::new(subscriber))
    }

    pub fn from_dispatch(dispatch: Dispatch) -> Self {
        Self(Arc::new(dispatch))
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.0
    }

    /// Run `f` with this logger as the thread's default dispatcher
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.0, f)
    }
}

impl PartialEq for Logger {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Logger({:p})", Arc::as_ptr(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::Registry;

    #[test]
    fn test_logger_identity() {
        let logger = Logger::new(Registry::default());
        let other = Logger::new(Registry::default());

        assert_eq!(logger, logger.clone());
        assert_ne!(logger, other);
    }

    #[test]
    fn test_in_scope_uses_dispatcher() {
        let logger = Logger::new(Registry::default());
        let same = logger.in_scope(|| {
            tracing::dispatcher::get_default(|current| {
                // Dispatch clones share the subscriber, compare by type
                current.is::<Registry>()
            })
        });
        assert!(same);
        assert_eq!(logger.in_scope(|| 42), 42);
    }
}
