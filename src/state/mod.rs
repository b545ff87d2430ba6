pub mod custom_problems;
pub mod debounce;
pub mod observable;

pub use custom_problems::CustomProblems;
pub use debounce::Debouncer;
pub use observable::{Observable, SubscriptionId};
