//! Shared helpers for registration integration tests.

use std::io;
use std::sync::{Arc, Mutex};

use registration::domain::RawRegistration;
use tracing::subscriber::DefaultGuard;

/// Form values that pass validation.
pub fn valid_form() -> RawRegistration {
    RawRegistration {
        name: "Ana".to_owned(),
        age: Some("30".to_owned()),
        email: "ana@x.com".to_owned(),
        password: "secret".to_owned(),
    }
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Route this thread's tracing output into the buffer until the guard drops.
    pub fn install(&self) -> DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().expect("log buffer mutex");
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer mutex").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
