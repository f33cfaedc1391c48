//! Trace sink for a single comparison

use affirm_core_types::schema::EVENT_TRACE;

/// Records what the engine did, when tracing is enabled in the options
///
/// Every line is also emitted as a `trace`-level event, whether or not the
/// tracer keeps it.
#[derive(Debug, Default, Clone)]
pub struct Tracer {
    enabled: bool,
    lines: Vec<String>,
}

impl Tracer {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            lines: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a line indented by the node depth
    pub fn write_line(&mut self, depth: usize, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::trace!(event = EVENT_TRACE, depth = depth as u64, "{}", message);
        if self.enabled {
            self.lines.push(format!("{}{}", "  ".repeat(depth), message));
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
