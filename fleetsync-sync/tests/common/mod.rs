//! Recording fake of the TFE API shared by orchestrator tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::io;
use std::sync::{Arc, Mutex};

use fleetsync_tfe::{Method, TfeApi, TfeError};
use serde_json::Value;

/// One authenticated call as seen by the fake.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub endpoint: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

type Responder = Box<dyn Fn(&RecordedCall) -> Result<Value, TfeError>>;

pub struct FakeTfe {
    responder: Responder,
    upload_status: u16,
    pub calls: RefCell<Vec<RecordedCall>>,
    pub uploads: RefCell<Vec<(String, Vec<u8>)>>,
}

impl FakeTfe {
    pub fn new(
        upload_status: u16,
        responder: impl Fn(&RecordedCall) -> Result<Value, TfeError> + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            upload_status,
            calls: RefCell::new(Vec::new()),
            uploads: RefCell::new(Vec::new()),
        }
    }

    /// A fake that fails the test if anything is called.
    pub fn untouchable() -> Self {
        Self::new(599, |call| panic!("unexpected TFE call: {call:?}"))
    }

    pub fn calls_with(&self, method: Method) -> Vec<RecordedCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }
}

impl TfeApi for FakeTfe {
    fn call(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, TfeError> {
        let call = RecordedCall {
            method,
            endpoint: endpoint.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.cloned(),
        };
        self.calls.borrow_mut().push(call.clone());
        (self.responder)(&call)
    }

    fn upload(&self, url: &str, archive: &[u8]) -> Result<u16, TfeError> {
        self.uploads
            .borrow_mut()
            .push((url.to_string(), archive.to_vec()));
        Ok(self.upload_status)
    }
}

pub fn api_error(method: Method, endpoint: &str, status: u16) -> TfeError {
    TfeError::Api {
        method,
        endpoint: endpoint.to_string(),
        status,
        body: format!(r#"{{"errors":[{{"status":"{status}"}}]}}"#),
    }
}

// ---------------------------------------------------------------------------
// Log capture
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return what it logged.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (result, logs)
}
