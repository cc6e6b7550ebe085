//! Test targets shared by the unit tests.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::TargetError;
use crate::filter::Predicate;
use crate::group::{FilterTarget, FilteredView};

/// Log shared between several targets, entries are `name.key` or `name!apply`.
pub type SharedLog = Arc<Mutex<Vec<String>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Run(String),
    Apply,
}

/// A [`FilteredView`] that records every call it receives.
pub struct RecordingTarget<E = i32> {
    name: String,
    view: FilteredView<E>,
    calls: Vec<Call>,
    log: Option<SharedLog>,
    fail: Option<String>,
}

impl<E: Clone + Send + 'static> RecordingTarget<E> {
    pub fn new(elements: Vec<E>) -> Self {
        Self {
            name: String::new(),
            view: FilteredView::new(elements),
            calls: Vec::new(),
            log: None,
            fail: None,
        }
    }

    pub fn logged(name: &str, elements: Vec<E>, log: SharedLog) -> Self {
        Self {
            name: name.to_string(),
            log: Some(log),
            ..Self::new(elements)
        }
    }

    pub fn visible(&self) -> &[E] {
        self.view.visible()
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Make the next call fail with `message`.
    pub fn fail_next(&mut self, message: &str) {
        self.fail = Some(message.to_string());
    }

    fn record(&mut self, call: Call) -> Result<(), TargetError> {
        if let Some(message) = self.fail.take() {
            return Err(message.into());
        }
        if let Some(log) = &self.log {
            let entry = match &call {
                Call::Run(key) => format!("{}.{}", self.name, key),
                Call::Apply => format!("{}!apply", self.name),
            };
            log.lock().push(entry);
        }
        self.calls.push(call);
        Ok(())
    }
}

impl<E: Clone + Send + 'static> FilterTarget for RecordingTarget<E> {
    type Element = E;

    fn run_filter(&mut self, predicate: Predicate<E>, key: &str) -> Result<(), TargetError> {
        self.record(Call::Run(key.to_string()))?;
        self.view.run_filter(predicate, key)
    }

    fn apply_filters(&mut self) -> Result<(), TargetError> {
        self.record(Call::Apply)?;
        self.view.apply_filters()
    }
}
