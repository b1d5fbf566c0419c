#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use visual_verdict::backend::{BackendError, VisionBackend};

pub type CallLog = Rc<RefCell<Vec<String>>>;

/// Scripted backend. Each model replays its replies in order and repeats the
/// last one; unscripted models answer model-unavailable.
pub struct StubBackend {
    name: &'static str,
    script: HashMap<String, Vec<Result<String, BackendError>>>,
    calls: CallLog,
}

impl StubBackend {
    pub fn new(name: &'static str) -> (Self, CallLog) {
        let calls = CallLog::default();
        let stub = Self {
            name,
            script: HashMap::new(),
            calls: calls.clone(),
        };
        (stub, calls)
    }

    pub fn reply(mut self, model: &str, reply: Result<&str, BackendError>) -> Self {
        self.script
            .entry(model.to_string())
            .or_default()
            .push(reply.map(str::to_string));
        self
    }
}

impl VisionBackend for StubBackend {
    fn name(&self) -> &str {
        self.name
    }

    fn evaluate(&self, _image: &[u8], model: &str) -> Result<String, BackendError> {
        let mut calls = self.calls.borrow_mut();
        let n = calls.iter().filter(|m| m.as_str() == model).count();
        calls.push(model.to_string());
        match self.script.get(model) {
            Some(replies) => replies[n.min(replies.len() - 1)].clone(),
            None => Err(unavailable(model)),
        }
    }
}

pub fn unavailable(model: &str) -> BackendError {
    BackendError::ModelUnavailable {
        model: model.to_string(),
        status: 404,
    }
}

pub fn models(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.borrow().clone()
}
