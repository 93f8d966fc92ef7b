use std::fmt::Display;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use human_repr::HumanDuration;
use log::debug;

use crate::cancel::CancelToken;
use crate::config::EncoderConfig;
use crate::encode_request::EncodeRequest;
use crate::error::{EncodeError, Result};
use crate::events::{EncodeEvent, LogLine};
use crate::ffmpeg::pass_plan::{self, PassDescriptor};
use crate::ffmpeg::supervisor::{PassEvent, PassExit, Supervisor};
use crate::fstools::{file_size, remove_best_effort};
use crate::planner;
use crate::probe::MediaProber;
use crate::report::{EncodeReport, report};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Probing,
    Planning,
    Encoding { pass: usize, of: usize },
    Finalizing,
    Completed,
    Failed,
    Cancelled,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Failed | SessionState::Cancelled)
    }
}

impl Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Encoding { pass, of } => write!(f, "Pass {}/{}", pass, of),
            _ => write!(f, "{:?}", self),
        }
    }
}

#[derive(Debug)]
pub enum SessionOutcome {
    Completed(EncodeReport),
    Failed(EncodeError),
    Cancelled,
}

/// What a finished session leaves behind: its outcome plus the state, log and
/// progress it accumulated.
#[derive(Debug)]
pub struct SessionRecord {
    pub outcome: SessionOutcome,
    pub state: SessionState,
    pub log: Vec<LogLine>,
    pub last_progress: u8,
}

/// One probe → plan → encode → finalize run. Consumed by `run`/`spawn`, so a
/// session can't be restarted.
pub struct EncodeSession<P: MediaProber> {
    request: EncodeRequest,
    config: EncoderConfig,
    prober: P,
    cancel: CancelToken,
    state: SessionState,
    log: Vec<LogLine>,
    last_progress: u8,
    sidecars: Vec<PathBuf>,
    subscribers: Vec<Sender<EncodeEvent>>,
}

pub struct SessionHandle {
    pub events: Receiver<EncodeEvent>,
    pub cancel: CancelToken,
    thread: JoinHandle<SessionRecord>,
}

impl SessionHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn join(self) -> thread::Result<SessionRecord> {
        self.thread.join()
    }
}

impl<P: MediaProber> EncodeSession<P> {
    pub fn new(request: EncodeRequest, config: EncoderConfig, prober: P) -> Self {
        EncodeSession {
            request,
            config,
            prober,
            cancel: CancelToken::new(),
            state: SessionState::Created,
            log: vec![],
            last_progress: 0,
            sidecars: vec![],
            subscribers: vec![],
        }
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn subscribe(&mut self) -> Receiver<EncodeEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Runs the session on its own thread; events stream through the handle.
    pub fn spawn(mut self) -> SessionHandle
    where
        P: Send + 'static,
    {
        let events = self.subscribe();
        let cancel = self.cancel_token();
        let thread = thread::spawn(move || self.finish());
        SessionHandle { events, cancel, thread }
    }

    pub fn run(self) -> SessionOutcome {
        self.finish().outcome
    }

    /// Runs to a terminal state and hands back everything the session recorded.
    pub fn finish(mut self) -> SessionRecord {
        let outcome = match self.execute() {
            Ok(report) => SessionOutcome::Completed(report),
            Err(EncodeError::Cancelled) => SessionOutcome::Cancelled,
            Err(err) => SessionOutcome::Failed(err),
        };

        self.remove_sidecars();

        match &outcome {
            SessionOutcome::Completed(report) => {
                self.transition(SessionState::Completed);
                self.record(LogLine::info(format!("Compression complete, saved {:.1}%.", report.percent_saved)));
            },
            SessionOutcome::Failed(err) => {
                self.transition(SessionState::Failed);
                self.record(LogLine::warn(err.to_string()));
            },
            SessionOutcome::Cancelled => {
                self.transition(SessionState::Cancelled);
                self.record(LogLine::info("Cancelled."));
            },
        }
        SessionRecord {
            outcome,
            state: self.state,
            log: self.log,
            last_progress: self.last_progress,
        }
    }

    fn execute(&mut self) -> Result<EncodeReport> {
        self.transition(SessionState::Probing);
        let info = self.prober.probe(&self.request.input)?;
        self.record(LogLine::info(info.summary(file_size(&self.request.input))));

        self.transition(SessionState::Planning);
        let plan = planner::plan(
            self.request.target_mb,
            info.duration,
            &self.request.audio,
            info.audio_bitrate_kbps(),
        )?;
        self.record(LogLine::info(format!("Duration: {}", info.duration.human_duration())));
        self.record(LogLine::info(format!("Target: {:.1} MB", self.request.target_mb)));
        self.record(LogLine::info(format!("Video bitrate: {} kbps", plan.video_kbps)));
        if plan.audio_kbps > 0 {
            self.record(LogLine::info(format!("Audio bitrate: {} kbps", plan.audio_kbps)));
        }

        let passes = pass_plan::build(self.request.codec.family(), &plan, &self.request, &self.config);
        self.sidecars = passes.iter().flat_map(|p| p.sidecars.iter().cloned()).collect();

        let supervisor = Supervisor::new(&self.config);
        let cancel = self.cancel.clone();
        for pass in &passes {
            if cancel.is_cancelled() {
                return Err(EncodeError::Cancelled);
            }
            self.transition(SessionState::Encoding { pass: pass.index, of: pass.total });
            self.last_progress = 0;
            let result = supervisor.run(pass, info.duration, &cancel, &mut |event| self.observe(event));
            match result {
                Ok(PassExit::Completed) => (),
                Ok(PassExit::Cancelled) => {
                    self.discard_partial_output(pass);
                    return Err(EncodeError::Cancelled);
                },
                Err(err) => {
                    self.discard_partial_output(pass);
                    return Err(err);
                },
            }
        }

        self.transition(SessionState::Finalizing);
        let output_size = file_size(&self.request.output)
            .ok_or_else(|| EncodeError::OutputMissing(self.request.output.clone()))?;
        let input_size = file_size(&self.request.input).unwrap_or(0);
        Ok(report(input_size, output_size))
    }

    fn observe(&mut self, event: PassEvent) {
        match event {
            PassEvent::Progress(progress) => {
                self.last_progress = progress.percent;
                self.publish(EncodeEvent::Progress(progress));
            },
            PassEvent::Log(line) => {
                self.log.push(line.clone());
                self.publish(EncodeEvent::Log(line));
            },
        }
    }

    fn record(&mut self, line: LogLine) {
        debug!("{}: {}", line.level, line.text);
        self.log.push(line.clone());
        self.publish(EncodeEvent::Log(line));
    }

    fn transition(&mut self, next: SessionState) {
        if self.state.is_terminal() {
            return;
        }
        debug!("session {:?} -> {:?}", self.state, next);
        self.state = next.clone();
        self.publish(EncodeEvent::State(next));
    }

    fn publish(&self, event: EncodeEvent) {
        for tx in &self.subscribers {
            let _ = tx.send(event.clone());
        }
    }

    fn discard_partial_output(&self, pass: &PassDescriptor) {
        if pass.writes_output() {
            remove_best_effort(pass.sink.path());
        }
    }

    fn remove_sidecars(&self) {
        for sidecar in &self.sidecars {
            remove_best_effort(sidecar);
        }
    }
}
