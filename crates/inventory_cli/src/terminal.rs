//! Line-oriented terminal rendering of the dashboard.

use inventory_core::{Confirmation, DashboardState, DashboardView, Field, Notice, NoticeLevel};
use log::warn;
use std::io::{self, BufRead, Write};

pub struct TerminalView<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalView<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prompts and reads one line; `None` on end of input.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub fn print(&mut self, text: &str) {
        if let Err(err) = writeln!(self.output, "{text}") {
            warn!("event=terminal_write module=cli status=error error={err}");
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn write_state(&mut self, state: &DashboardState) -> io::Result<()> {
        let out = &mut self.output;
        writeln!(out)?;
        writeln!(
            out,
            "{:>6}  {:<24} {:<16} {:>8} {:>10}",
            "ID", "NAME", "CATEGORY", "QTY", "PRICE"
        )?;
        for item in &state.items {
            let marker = match &state.selected {
                Some(selected) if selected.id == item.id => '>',
                _ => ' ',
            };
            writeln!(
                out,
                "{marker}{:>5}  {:<24} {:<16} {:>8} {:>10.2}",
                item.id.get(),
                item.name,
                item.category,
                item.quantity,
                item.price
            )?;
        }
        if state.items.is_empty() {
            writeln!(out, "       (no items)")?;
        }
        writeln!(out)?;
        for field in Field::ALL {
            writeln!(out, "  {:<9} [{}]", field.label(), state.form.get(field))?;
        }
        writeln!(out, "  search    [{}]", state.search)?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> DashboardView for TerminalView<R, W> {
    fn confirm(&mut self, confirmation: Confirmation) -> bool {
        let question = format!(
            "{}: {} [y/N] ",
            confirmation.title(),
            confirmation.message()
        );
        match self.read_line(&question) {
            Ok(Some(answer)) => {
                matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
            }
            Ok(None) => false,
            Err(err) => {
                warn!("event=terminal_confirm module=cli status=error error={err}");
                false
            }
        }
    }

    fn notify(&mut self, notice: &Notice) {
        let tag = match notice.level {
            NoticeLevel::Info => "INFO",
            NoticeLevel::Warning => "WARN",
            NoticeLevel::Error => "ERROR",
        };
        self.print(&format!("[{tag}] {}: {}", notice.title, notice.message));
    }

    fn render(&mut self, state: &DashboardState) {
        if let Err(err) = self.write_state(state) {
            warn!("event=terminal_render module=cli status=error error={err}");
        }
    }
}
