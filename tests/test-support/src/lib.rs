//! Shared helpers for the ipcheck test suites

use std::{
    io::{self, Write},
    sync::{Arc, Mutex, Once},
};

use tracing::Dispatch;
use tracing_subscriber::layer::SubscriberExt;

/// Registers a global default tracing subscriber when called for the first time. This is intended
/// for use in tests.
pub fn subscribe() {
    static INSTALL_TRACING_SUBSCRIBER: Once = Once::new();
    INSTALL_TRACING_SUBSCRIBER.call_once(|| {
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).unwrap();
    });
}

/// This is a writer that can be used with a thread-local tracing subscriber to inspect
/// logs for a single test.
#[derive(Clone, Default)]
pub struct LogWriter(pub Arc<Mutex<Vec<u8>>>);

impl LogWriter {
    /// True if any captured line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.logs().contains(needle)
    }

    /// Everything captured so far
    pub fn logs(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.lock().unwrap().flush()
    }
}

/// Runs `f` with a thread-local subscriber that records every event at TRACE and above,
/// returning the captured output.
pub fn capture_logs<F: FnOnce()>(f: F) -> LogWriter {
    let logs = LogWriter::default();
    let logs_clone = logs.clone();

    let writer = move || logs_clone.clone();

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false);

    let subscriber = tracing_subscriber::registry()
        .with(layer)
        .with(tracing_subscriber::filter::LevelFilter::TRACE);
    let dispatch = Dispatch::new(subscriber);

    tracing::dispatcher::with_default(&dispatch, f);
    logs
}
