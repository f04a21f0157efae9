//! Background configuration fetch.
//!
//! The worker only talks to the remote source; the session thread applies the
//! answer, so there is still a single writer.

use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rc_remote::{ConfigureRequest, RemoteError, RemoteResult, SimulationResult, SimulationSource};
use tracing::debug;

pub struct ConfigWorker {
    rx: Receiver<RemoteResult<SimulationResult>>,
    _handle: JoinHandle<()>,
}

impl ConfigWorker {
    pub fn start<S>(source: S, request: ConfigureRequest) -> Self
    where
        S: SimulationSource + Send + 'static,
    {
        let (tx, rx) = channel();
        let handle = thread::spawn(move || {
            debug!(source = %source.describe(), "configuration worker started");
            let outcome = source.fetch(&request);
            let _ = tx.send(outcome);
        });
        Self {
            rx,
            _handle: handle,
        }
    }

    /// The answer, if it has arrived.
    pub fn try_finish(&self) -> Option<RemoteResult<SimulationResult>> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(worker_lost())),
        }
    }

    /// Block up to `timeout` for the answer.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<RemoteResult<SimulationResult>> {
        use std::sync::mpsc::RecvTimeoutError;
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(worker_lost())),
        }
    }

    /// Block until the answer arrives.
    pub fn wait(self) -> RemoteResult<SimulationResult> {
        self.rx.recv().unwrap_or_else(|_| Err(worker_lost()))
    }
}

fn worker_lost() -> RemoteError {
    RemoteError::Transport {
        message: "configuration worker exited without an answer".to_string(),
    }
}
