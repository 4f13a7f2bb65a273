/// Receives the per-item progress text a tool writes while it works.
pub trait StatusSink {
    fn status(&mut self, text: &str);
}

/// Default sink: progress goes to the log.
#[derive(Debug, Default)]
pub struct LogStatus;

impl StatusSink for LogStatus {
    fn status(&mut self, text: &str) {
        log::info!("{text}");
    }
}

/// Test sink that keeps every line it was given.
#[derive(Debug, Default)]
pub struct CollectStatus {
    pub lines: Vec<String>,
}

impl StatusSink for CollectStatus {
    fn status(&mut self, text: &str) {
        self.lines.push(text.to_owned());
    }
}
