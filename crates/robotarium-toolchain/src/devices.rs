//! Board discovery using `arduino-cli board list`
//!
//! The command prints a table, one port per line:
//!
//! ```text
//! Port         Protocol Type              Board Name  FQBN            Core
//! /dev/ttyACM0 serial   Serial Port (USB) Arduino Uno arduino:avr:uno arduino:avr
//! /dev/ttyS0   serial   Serial Port       Unknown
//! ```
//!
//! or the sentinel `No boards found.` when nothing is attached. Only lines
//! mentioning the serial protocol are usable upload targets.

use robotarium_core::prelude::*;
use robotarium_core::Device;

use super::commands::Toolchain;
use super::process::ProcessRunner;

/// Substring marking a serial-attached board in `board list` output
pub const SERIAL_MARKER: &str = "serial";

/// Trimmed line printed by `board list` when nothing is attached
pub const NO_BOARDS_SENTINEL: &str = "No boards found.";

/// How to choose among several serial boards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeviceSelection {
    /// First serial line in listing order wins
    #[default]
    FirstSerial,
    /// First serial board whose port equals the given identifier
    Port(String),
}

impl DeviceSelection {
    fn accepts(&self, device: &Device) -> bool {
        match self {
            DeviceSelection::FirstSerial => true,
            DeviceSelection::Port(port) => device.identifier == *port,
        }
    }
}

/// Parse one board-list line into a [`Device`] if it is a serial board.
fn parse_serial_line(line: &str) -> Option<Device> {
    if !line.contains(SERIAL_MARKER) {
        return None;
    }
    let trimmed = line.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let identifier = parts.next().filter(|id| !id.is_empty())?;
    let detail = parts.next().unwrap_or("").trim();
    Some(Device::new(identifier).with_detail(detail))
}

/// Every serial board in `board list` output, in listing order.
///
/// Scanning stops at the sentinel line: the toolchain only emits it when
/// the list is empty, so anything after it is not a board.
pub fn parse_board_list(output: &str) -> Vec<Device> {
    let mut devices = Vec::new();
    for line in output.lines() {
        if line.trim() == NO_BOARDS_SENTINEL {
            break;
        }
        if let Some(device) = parse_serial_line(line) {
            devices.push(device);
        }
    }
    devices
}

/// Pick a device from `board list` output.
///
/// Lines are scanned top to bottom; the first serial line accepted by
/// `selection` is returned. The sentinel ends the scan with `None`, even if
/// later lines would match.
pub fn select_device(output: &str, selection: &DeviceSelection) -> Option<Device> {
    for line in output.lines() {
        if line.trim() == NO_BOARDS_SENTINEL {
            return None;
        }
        if let Some(device) = parse_serial_line(line) {
            if selection.accepts(&device) {
                return Some(device);
            }
        }
    }
    None
}

/// Finds the attached board by running `board list`.
///
/// Holds no state between calls: every [`locate`](Self::locate) runs the
/// command afresh, since boards may be plugged or unplugged at any time.
pub struct DeviceLocator<'a, R> {
    runner: &'a R,
    toolchain: &'a Toolchain,
    selection: DeviceSelection,
}

impl<'a, R: ProcessRunner> DeviceLocator<'a, R> {
    pub fn new(runner: &'a R, toolchain: &'a Toolchain) -> Self {
        Self {
            runner,
            toolchain,
            selection: DeviceSelection::default(),
        }
    }

    pub fn with_selection(mut self, selection: DeviceSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Locate the upload target, or `None` when no serial board is attached.
    ///
    /// The exit code of `board list` is not consulted: the listing text is
    /// authoritative. Only a spawn failure is an error.
    pub async fn locate(&self) -> Result<Option<Device>> {
        let result = self.runner.run(&self.toolchain.board_list()).await?;
        if !result.success() {
            debug!("board list exited with code {}", result.exit_code);
        }

        let device = select_device(&result.output, &self.selection);
        match &device {
            Some(device) => info!("Located board on {}", device.identifier),
            None => info!("No serial board attached"),
        }
        Ok(device)
    }

    /// All serial boards currently attached.
    pub async fn list(&self) -> Result<Vec<Device>> {
        let result = self.runner.run(&self.toolchain.board_list()).await?;
        let devices = parse_board_list(&result.output);
        info!("Discovered {} serial boards", devices.len());
        Ok(devices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_BOARDS: &str = "\
Port         Protocol Type              Board Name  FQBN            Core
/dev/ttyACM0 serial   Serial Port (USB) Arduino Uno arduino:avr:uno arduino:avr
/dev/ttyACM1 serial   Serial Port (USB) Arduino Uno arduino:avr:uno arduino:avr

";

    #[test]
    fn test_first_serial_match_wins() {
        let output = "COM3  serial  Uno\nCOM9  serial  Uno\n";
        let device = select_device(output, &DeviceSelection::FirstSerial).unwrap();
        assert_eq!(device.identifier, "COM3");
        assert_eq!(device.detail, "serial  Uno");
    }

    #[test]
    fn test_header_line_is_skipped() {
        let device = select_device(TWO_BOARDS, &DeviceSelection::FirstSerial).unwrap();
        assert_eq!(device.identifier, "/dev/ttyACM0");
    }

    #[test]
    fn test_sentinel_returns_none() {
        assert!(select_device("No boards found.\n", &DeviceSelection::FirstSerial).is_none());
    }

    #[test]
    fn test_sentinel_takes_priority_over_later_lines() {
        let output = "  No boards found.  \nCOM3  serial  Uno\n";
        assert!(select_device(output, &DeviceSelection::FirstSerial).is_none());
        assert!(parse_board_list(output).is_empty());
    }

    #[test]
    fn test_serial_before_sentinel_still_matches() {
        let output = "COM3  serial  Uno\nNo boards found.\n";
        let device = select_device(output, &DeviceSelection::FirstSerial).unwrap();
        assert_eq!(device.identifier, "COM3");
    }

    #[test]
    fn test_sentinel_must_match_exactly() {
        let output = "Warning: No boards found. Retrying\nCOM4 serial Nano\n";
        let device = select_device(output, &DeviceSelection::FirstSerial).unwrap();
        assert_eq!(device.identifier, "COM4");
    }

    #[test]
    fn test_non_serial_lines_ignored() {
        let output = "Port Protocol Type\n192.168.1.5 network Network Port\n";
        assert!(select_device(output, &DeviceSelection::FirstSerial).is_none());
    }

    #[test]
    fn test_empty_output() {
        assert!(select_device("", &DeviceSelection::FirstSerial).is_none());
        assert!(parse_board_list("").is_empty());
    }

    #[test]
    fn test_leading_whitespace_before_identifier() {
        let output = "   /dev/ttyUSB0 serial Serial Port Unknown\n";
        let device = select_device(output, &DeviceSelection::FirstSerial).unwrap();
        assert_eq!(device.identifier, "/dev/ttyUSB0");
    }

    #[test]
    fn test_port_selection() {
        let selection = DeviceSelection::Port("/dev/ttyACM1".to_string());
        let device = select_device(TWO_BOARDS, &selection).unwrap();
        assert_eq!(device.identifier, "/dev/ttyACM1");

        let selection = DeviceSelection::Port("COM7".to_string());
        assert!(select_device(TWO_BOARDS, &selection).is_none());
    }

    #[test]
    fn test_parse_board_list_all_serial() {
        let devices = parse_board_list(TWO_BOARDS);
        let ids: Vec<&str> = devices.iter().map(|d| d.identifier.as_str()).collect();
        assert_eq!(ids, vec!["/dev/ttyACM0", "/dev/ttyACM1"]);
    }

    #[test]
    fn test_repeated_parse_is_stable() {
        let first = select_device(TWO_BOARDS, &DeviceSelection::FirstSerial);
        let second = select_device(TWO_BOARDS, &DeviceSelection::FirstSerial);
        assert_eq!(first, second);
    }
}
