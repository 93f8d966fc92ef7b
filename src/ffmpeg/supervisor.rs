use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use log::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::config::EncoderConfig;
use crate::error::{EncodeError, Result};
use crate::events::{LogLine, ProgressEvent};
use super::pass_plan::PassDescriptor;
use super::progress::{DiagnosticLine, DiagnosticParser, DiagnosticTail};

#[derive(Debug, PartialEq)]
pub enum PassEvent {
    Progress(ProgressEvent),
    Log(LogLine),
}

#[derive(Debug, PartialEq, Eq)]
pub enum PassExit {
    Completed,
    Cancelled,
}

/// Runs one encoder process per pass and turns its stderr into events.
pub struct Supervisor {
    program: PathBuf,
    chunk_size: usize,
    tail_len: usize,
}

impl Supervisor {
    pub fn new(config: &EncoderConfig) -> Self {
        Supervisor {
            program: config.ffmpeg.clone(),
            chunk_size: config.chunk_size.max(1),
            tail_len: config.tail_len,
        }
    }

    pub fn run(
        &self,
        pass: &PassDescriptor,
        duration: f64,
        cancel: &CancelToken,
        observer: &mut dyn FnMut(PassEvent),
    ) -> Result<PassExit> {
        info!("pass {}/{}: {}", pass.index, pass.total, pass.command_line(&self.program));

        let mut child = Command::new(&self.program)
            .args(&pass.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => EncodeError::ToolNotFound(self.program.clone()),
                _ => EncodeError::ProcessSpawnFailed { program: self.program.clone(), source: err },
            })?;

        let Some(mut stderr) = child.stderr.take() else {
            terminate(&mut child);
            return Err(EncodeError::Io(io::Error::new(io::ErrorKind::Other, "encoder stderr was not captured")));
        };

        observer(PassEvent::Progress(self.progress(pass, 0)));

        let mut parser = DiagnosticParser::new(duration);
        let mut tail = DiagnosticTail::new(self.tail_len);
        let mut buf = vec![0u8; self.chunk_size];
        loop {
            if cancel.is_cancelled() {
                info!("cancelling pass {}/{}; killing encoder ({})", pass.index, pass.total, child.id());
                terminate(&mut child);
                return Ok(PassExit::Cancelled);
            }

            let n = match stderr.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    terminate(&mut child);
                    return Err(err.into());
                },
            };
            tail.push(&buf[..n]);
            for line in parser.feed(&buf[..n]) {
                self.dispatch(pass, line, observer);
            }
        }

        for line in parser.finish() {
            self.dispatch(pass, line, observer);
        }

        let status = child.wait()?;
        debug!("pass {}/{} exited with {}", pass.index, pass.total, status);
        if cancel.is_cancelled() && !status.success() {
            return Ok(PassExit::Cancelled);
        }
        if !status.success() {
            return Err(EncodeError::ProcessExitedNonZero {
                code: status.code(),
                tail: tail.text(),
            });
        }

        observer(PassEvent::Progress(self.progress(pass, 100)));
        Ok(PassExit::Completed)
    }

    fn dispatch(&self, pass: &PassDescriptor, line: DiagnosticLine, observer: &mut dyn FnMut(PassEvent)) {
        if let Some(percent) = line.percent {
            observer(PassEvent::Progress(self.progress(pass, percent)));
        }
        if line.is_error {
            debug!("{}", line.text);
            observer(PassEvent::Log(LogLine::warn(line.text)));
        }
    }

    fn progress(&self, pass: &PassDescriptor, percent: u8) -> ProgressEvent {
        ProgressEvent {
            pass: pass.index,
            total_passes: pass.total,
            percent,
        }
    }
}

fn terminate(child: &mut Child) {
    if let Err(err) = child.kill() {
        warn!("error killing encoder process ({}) {err:?}", child.id());
    }
    if let Err(err) = child.wait() {
        warn!("error waiting for encoder process ({}) {err:?}", child.id());
    }
}
