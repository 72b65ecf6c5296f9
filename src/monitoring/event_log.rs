use crate::error::Result;
use crate::global_variables::EVENT_LOG_TIME_FORMAT;
use crate::simulation_engine::approach::ApproachId;
use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Controller events that downstream consumers read from the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEvent {
    EmergencyEntered { approach: ApproachId },
    EmergencyCleared { approach: ApproachId },
    InvalidEvent { index: u8 },
}

impl fmt::Display for ControllerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerEvent::EmergencyEntered { approach } => {
                write!(f, "Emergency vehicle detected: preempting {} approach", approach)
            }
            ControllerEvent::EmergencyCleared { approach } => write!(
                f,
                "Emergency cleared on {} approach: resuming rotation",
                approach
            ),
            ControllerEvent::InvalidEvent { index } => write!(
                f,
                "Rejected invalid emergency event: approach index {} out of range",
                index
            ),
        }
    }
}

/// Formats one log line: `[YYYY-MM-DD HH:MM:SS] <message>`.
pub fn format_line(at: &NaiveDateTime, message: &str) -> String {
    format!("[{}] {}", at.format(EVENT_LOG_TIME_FORMAT), message)
}

/// Append-only event log, one timestamped line per event.
pub struct EventLog {
    writer: Box<dyn Write + Send>,
}

impl EventLog {
    /// Opens (or creates) the log file in append mode.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file))
    }

    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Box::new(writer),
        }
    }

    /// A log that discards everything.
    pub fn discard() -> Self {
        Self::new(io::sink())
    }

    /// Writes `event` stamped with the local wall-clock time and mirrors it to
    /// the diagnostic log.
    pub fn record(&mut self, event: &ControllerEvent) -> io::Result<()> {
        match event {
            ControllerEvent::InvalidEvent { .. } => log::warn!("{}", event),
            _ => log::info!("{}", event),
        }
        self.record_at(Local::now().naive_local(), &event.to_string())
    }

    pub fn record_at(&mut self, at: NaiveDateTime, message: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", format_line(&at, message))?;
        self.writer.flush()
    }
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLog").finish_non_exhaustive()
    }
}
