//! Human-readable rendering with crossterm colors

use std::io::{self, Write};

use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};

use robotarium_core::{BuildOutcome, BuildReport, Device, Fragment, ReportTag};
use robotarium_toolchain::ToolAvailability;

fn color_for(tag: ReportTag) -> Option<Color> {
    match tag {
        ReportTag::Success => Some(Color::Green),
        ReportTag::Failure => Some(Color::Red),
        ReportTag::Info => None,
    }
}

/// Write `text` on its own line, colored for `tag`.
///
/// Tool output usually ends in a newline already; it is not doubled.
/// Empty text writes nothing.
pub fn write_tagged<W: Write>(out: &mut W, tag: ReportTag, text: &str) -> io::Result<()> {
    let text = text.trim_end_matches(['\r', '\n']);
    if text.is_empty() {
        return Ok(());
    }

    match color_for(tag) {
        Some(color) => {
            out.queue(SetForegroundColor(color))?;
            out.queue(Print(text))?;
            out.queue(ResetColor)?;
        }
        None => {
            out.queue(Print(text))?;
        }
    }
    out.queue(Print("\n"))?;
    out.flush()
}

pub fn write_fragment<W: Write>(out: &mut W, fragment: &Fragment) -> io::Result<()> {
    write_tagged(out, fragment.tag, &fragment.text)
}

pub fn write_devices<W: Write>(out: &mut W, devices: &[Device]) -> io::Result<()> {
    if devices.is_empty() {
        return write_tagged(out, ReportTag::Failure, "No serial boards attached");
    }
    for device in devices {
        write_tagged(
            out,
            ReportTag::Info,
            &format!("{:<16} {}", device.identifier, device.detail),
        )?;
    }
    Ok(())
}

pub fn write_availability<W: Write>(out: &mut W, availability: &ToolAvailability) -> io::Result<()> {
    match (&availability.path, availability.unavailable_message()) {
        (_, Some(message)) => write_tagged(out, ReportTag::Failure, &message),
        (Some(path), None) => write_tagged(
            out,
            ReportTag::Success,
            &format!("{} found at {}", availability.executable, path.display()),
        ),
        (None, None) => write_tagged(
            out,
            ReportTag::Success,
            &format!("{} found", availability.executable),
        ),
    }
}

/// One-line summary after a build run; the per-phase messages have
/// already been printed as fragments.
pub fn write_build_summary<W: Write>(out: &mut W, report: &BuildReport) -> io::Result<()> {
    let (tag, text) = match report.outcome() {
        BuildOutcome::Uploaded => (ReportTag::Success, "Done"),
        BuildOutcome::CompileFailed => (ReportTag::Failure, "Stopped after compile"),
        BuildOutcome::DeviceNotFound => (ReportTag::Failure, "Nothing uploaded"),
        BuildOutcome::UploadFailed => (ReportTag::Failure, "Upload failed"),
    };
    write_tagged(out, tag, text)
}
