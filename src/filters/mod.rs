/// Filter module - Callables and rules stored in the configuration
pub mod callback;
pub mod rule;

pub use callback::{AsyncHandler, BacktraceFilter, Callable, IgnoreFilter, Notice, Predicate};
pub use rule::{OneOrMany, Rule};
