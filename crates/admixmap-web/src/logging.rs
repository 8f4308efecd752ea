#![forbid(unsafe_code)]

//! `tracing` subscriber that writes to the browser console.
//!
//! Each event is buffered and emitted as one console call on drop, routed by
//! level so devtools filtering works.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, Copy, Default)]
struct ConsoleMakeWriter;

struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&self.buf);
        let msg = JsValue::from_str(line.trim_end());
        match self.level {
            Level::ERROR => web_sys::console::error_1(&msg),
            Level::WARN => web_sys::console::warn_1(&msg),
            Level::INFO => web_sys::console::info_1(&msg),
            Level::DEBUG => web_sys::console::debug_1(&msg),
            Level::TRACE => web_sys::console::log_1(&msg),
        }
        self.buf.clear();
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buf: Vec::new(),
        }
    }
}

/// Install the console subscriber. Returns `false` if a global subscriber was
/// already set.
pub(crate) fn init(level: Level) -> bool {
    #[cfg(feature = "console-panic")]
    console_error_panic_hook::set_once();

    tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_max_level(level)
        .with_ansi(false)
        .without_time()
        .with_target(true)
        .try_init()
        .is_ok()
}
