use std::io::Write;

use texcount_core::StatusView;

/// Host-side sinks for what the core wants to show the user.
pub trait Notifier {
    fn status(&mut self, view: &StatusView);
    fn information(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Renders to a pair of writers: status and info to `out`, errors to `err`.
pub struct TerminalNotifier<O: Write, E: Write> {
    out: O,
    err: E,
    last_status: Option<StatusView>,
    show_status: bool,
}

impl TerminalNotifier<std::io::Stdout, std::io::Stderr> {
    pub fn stdio(show_status: bool) -> Self {
        Self::new(std::io::stdout(), std::io::stderr(), show_status)
    }
}

impl<O: Write, E: Write> TerminalNotifier<O, E> {
    pub fn new(out: O, err: E, show_status: bool) -> Self {
        Self {
            out,
            err,
            last_status: None,
            show_status,
        }
    }

    #[cfg(test)]
    fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> Notifier for TerminalNotifier<O, E> {
    fn status(&mut self, view: &StatusView) {
        if !self.show_status || self.last_status.as_ref() == Some(view) {
            return;
        }
        let _ = writeln!(self.out, "{}", status_line(view));
        let _ = self.out.flush();
        self.last_status = Some(view.clone());
    }

    fn information(&mut self, message: &str) {
        let _ = writeln!(self.out, "{message}");
        let _ = self.out.flush();
    }

    fn error(&mut self, message: &str) {
        let _ = writeln!(self.err, "{message}");
        let _ = self.err.flush();
    }
}

/// Keeps notifications in memory instead of printing them.
#[derive(Debug, Default)]
pub struct CapturingNotifier {
    pub information: Vec<String>,
    pub errors: Vec<String>,
}

impl Notifier for CapturingNotifier {
    fn status(&mut self, _view: &StatusView) {}

    fn information(&mut self, message: &str) {
        self.information.push(message.to_string());
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

pub fn status_line(view: &StatusView) -> String {
    if !view.visible {
        return "[status hidden]".to_string();
    }
    if view.tooltip.is_empty() {
        format!("[{}]", view.text)
    } else {
        format!("[{}] {}", view.text, view.tooltip)
    }
}
