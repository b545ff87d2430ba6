//! Imported problems shared across screens.
use super::observable::{Observable, SubscriptionId};
use crate::models::Problem;

#[derive(Clone, Default)]
pub struct CustomProblems {
    store: Observable<Vec<Problem>>,
}

impl CustomProblems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<Problem> {
        self.store.snapshot()
    }

    /// Adds `problem` at the end, dropping any earlier entry with the same id.
    pub fn add(&self, problem: Problem) {
        self.store.update(|problems| {
            problems.retain(|p| p.id != problem.id);
            problems.push(problem);
        });
    }

    pub fn replace_all(&self, problems: Vec<Problem>) {
        self.store.set(problems);
    }

    pub fn subscribe(&self, listener: impl Fn(&Vec<Problem>) + Send + Sync + 'static) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }
}
