use std::{
    io::Write,
    path::PathBuf,
    process::{Command, Stdio},
};

use tracing::debug;

use crate::{error::Error, report::Report};

/// Where the finished daily report goes.
pub trait NotificationSink {
    fn send(&mut self, report: &Report) -> Result<(), Error>;
}

/// Hands the report to the local mail relay through a sendmail-compatible program.
#[derive(Debug, Clone)]
pub struct SendmailSink {
    program: PathBuf,
}

impl SendmailSink {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl NotificationSink for SendmailSink {
    fn send(&mut self, report: &Report) -> Result<(), Error> {
        debug!(
            program = %self.program.display(),
            to = %report.to,
            day = %report.day,
            "Handing report to mail relay"
        );
        let mut child = Command::new(&self.program)
            .args(["-t", "-oi"])
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| {
                Error::Delivery(format!("failed to start {}: {e}", self.program.display()))
            })?;

        // stdin must be closed before waiting or the relay never sees EOF
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(report.to_message().as_bytes()),
            None => Err(std::io::Error::other("mail relay stdin unavailable")),
        };
        let status = child
            .wait()
            .map_err(|e| Error::Delivery(format!("failed waiting for mail relay: {e}")))?;

        written.map_err(|e| Error::Delivery(format!("failed writing to mail relay: {e}")))?;
        if !status.success() {
            return Err(Error::Delivery(format!(
                "{} exited with {status}",
                self.program.display()
            )));
        }
        debug!("Mail relay accepted report");
        Ok(())
    }
}

/// Writes the rendered message instead of sending it.
#[derive(Debug)]
pub struct StdoutSink<W> {
    out: W,
}

impl<W: Write> StdoutSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> NotificationSink for StdoutSink<W> {
    fn send(&mut self, report: &Report) -> Result<(), Error> {
        self.out
            .write_all(report.to_message().as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(Error::Output)
    }
}
