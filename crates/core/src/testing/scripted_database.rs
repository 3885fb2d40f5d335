//! Scripted database backend for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use crate::database::{Connector, DatabaseError, QueryRunner, RawResult};

/// Scripted implementation of the database boundary.
///
/// Provides controllable behavior for testing:
/// - Pre-loaded per-query responses, popped in FIFO order (an exhausted
///   script answers with an empty successful result)
/// - Injected connection failures
/// - An execution gate to park the worker inside a query call
/// - A record of every executed query for assertions
///
/// Clones share the same script, record and gate, so a test can keep a
/// handle after moving the connector into an engine.
#[derive(Clone)]
pub struct ScriptedConnector {
    responses: Arc<Mutex<VecDeque<Result<RawResult, DatabaseError>>>>,
    connect_errors: Arc<Mutex<VecDeque<DatabaseError>>>,
    connects: Arc<AtomicUsize>,
    executed: Arc<Mutex<Vec<String>>>,
    gate: Arc<Gate>,
}

impl Default for ScriptedConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedConnector {
    /// Create a connector with an empty script and an open gate.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            connect_errors: Arc::new(Mutex::new(VecDeque::new())),
            connects: Arc::new(AtomicUsize::new(0)),
            executed: Arc::new(Mutex::new(Vec::new())),
            gate: Arc::new(Gate::open()),
        }
    }

    /// Queue the response for the next executed query.
    pub fn push_response(&self, response: Result<RawResult, DatabaseError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Make the next `connect` call fail with `error`.
    pub fn fail_next_connect(&self, error: DatabaseError) {
        self.connect_errors.lock().unwrap().push_back(error);
    }

    /// Number of successfully opened connections.
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Every query executed so far, in execution order.
    pub fn executed_queries(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    /// Close the execution gate: queries block inside the runner until
    /// [`ScriptedConnector::release_executions`] is called.
    pub fn hold_executions(&self) {
        self.gate.close();
    }

    /// Open the execution gate, releasing any blocked query.
    pub fn release_executions(&self) {
        self.gate.open_and_notify();
    }
}

impl Connector for ScriptedConnector {
    fn connect(&self) -> Result<Box<dyn QueryRunner>, DatabaseError> {
        if let Some(error) = self.connect_errors.lock().unwrap().pop_front() {
            return Err(error);
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedRunner {
            responses: Arc::clone(&self.responses),
            executed: Arc::clone(&self.executed),
            gate: Arc::clone(&self.gate),
        }))
    }
}

struct ScriptedRunner {
    responses: Arc<Mutex<VecDeque<Result<RawResult, DatabaseError>>>>,
    executed: Arc<Mutex<Vec<String>>>,
    gate: Arc<Gate>,
}

impl QueryRunner for ScriptedRunner {
    fn run(&mut self, query: &str) -> Result<RawResult, DatabaseError> {
        self.executed.lock().unwrap().push(query.to_string());
        self.gate.wait_open();
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(RawResult::command_ok()))
    }
}

/// Open/closed gate blocking executions while closed.
struct Gate {
    open: Mutex<bool>,
    condvar: Condvar,
}

impl Gate {
    fn open() -> Self {
        Self {
            open: Mutex::new(true),
            condvar: Condvar::new(),
        }
    }

    fn close(&self) {
        *self.open.lock().unwrap() = false;
    }

    fn open_and_notify(&self) {
        *self.open.lock().unwrap() = true;
        self.condvar.notify_all();
    }

    fn wait_open(&self) {
        let mut open = self.open.lock().unwrap();
        while !*open {
            open = self.condvar.wait(open).unwrap();
        }
    }
}
