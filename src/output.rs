//! Where results go: colored text on a terminal, or NDJSON in headless mode

use std::io;

use robotarium_app::DisplayPreference;
use robotarium_core::prelude::*;
use robotarium_core::{BuildReport, CommandResult, Device, Fragment, ReportSink};
use robotarium_toolchain::{StepOutcome, ToolAvailability};

use crate::headless::HeadlessEvent;
use crate::terminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Terminal,
    Headless,
}

impl Output {
    pub fn new(headless: bool) -> Self {
        if headless {
            Output::Headless
        } else {
            Output::Terminal
        }
    }

    pub fn is_headless(&self) -> bool {
        matches!(self, Output::Headless)
    }

    /// Terminal writes are best effort; a closed stdout is only logged.
    fn print(&self, result: io::Result<()>) {
        if let Err(e) = result {
            warn!("Failed to write to stdout: {}", e);
        }
    }

    pub fn started(&self, command: &str, preference: &DisplayPreference) {
        match self {
            Output::Terminal => debug!("Running {} (font {})", command, preference.font),
            Output::Headless => HeadlessEvent::started(command, preference).emit(),
        }
    }

    pub fn step_finished(&self, outcome: &StepOutcome) {
        if self.is_headless() {
            HeadlessEvent::step_finished(outcome).emit();
        }
    }

    pub fn compile_finished(&self, result: &CommandResult) {
        if self.is_headless() {
            HeadlessEvent::compile_finished(result).emit();
        }
    }

    pub fn build_finished(&self, report: &BuildReport) {
        match self {
            Output::Terminal => {
                self.print(terminal::write_build_summary(&mut io::stdout(), report))
            }
            Output::Headless => HeadlessEvent::build_finished(report).emit(),
        }
    }

    pub fn devices(&self, devices: &[Device]) {
        match self {
            Output::Terminal => self.print(terminal::write_devices(&mut io::stdout(), devices)),
            Output::Headless => {
                for device in devices {
                    HeadlessEvent::device_detected(device).emit();
                }
            }
        }
    }

    pub fn availability(&self, availability: &ToolAvailability) {
        match self {
            Output::Terminal => {
                self.print(terminal::write_availability(&mut io::stdout(), availability))
            }
            Output::Headless => HeadlessEvent::toolchain_checked(availability).emit(),
        }
    }

    pub fn setting_updated(&self, key: &str, value: &serde_json::Value) {
        match self {
            Output::Terminal => self.print(terminal::write_tagged(
                &mut io::stdout(),
                robotarium_core::ReportTag::Success,
                &format!("{} = {}", key, value),
            )),
            Output::Headless => HeadlessEvent::setting_updated(key, value).emit(),
        }
    }

    pub fn error(&self, err: &Error) {
        match self {
            Output::Terminal => self.print(terminal::write_tagged(
                &mut io::stderr(),
                robotarium_core::ReportTag::Failure,
                &err.to_string(),
            )),
            Output::Headless => HeadlessEvent::error(err).emit(),
        }
    }
}

impl ReportSink for Output {
    fn report(&mut self, fragment: Fragment) {
        match self {
            Output::Terminal => self.print(terminal::write_fragment(&mut io::stdout(), &fragment)),
            Output::Headless => HeadlessEvent::fragment(fragment).emit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robotarium_app::Settings;

    #[test]
    fn test_mode_from_flag() {
        assert!(Output::new(true).is_headless());
        assert!(!Output::new(false).is_headless());
    }

    #[test]
    fn test_terminal_start_logs_font() {
        let preference = Settings::default().display();
        Output::new(false).started("check", &preference);
    }
}
