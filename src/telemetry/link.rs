//! Link reader thread
//!
//! Dedicated thread per sensor link. Reads raw bytes from a [`ByteSource`],
//! decodes them and pushes the resulting messages into the telemetry channel.
//! The only place it waits is inside `read_timeout`, so a stop request is
//! noticed within one read timeout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use flume::{Receiver, RecvTimeoutError, Sender};

use super::channel::TelemetrySender;
use super::decoder::{AxisCodes, TelemetryDecoder};
use crate::error::LinkError;

/// A byte stream whose reads give up after a timeout.
pub trait ByteSource: Send {
    /// Read into `buf`, waiting at most `timeout`. `Ok(0)` means nothing
    /// arrived in time; `Err(LinkError::Disconnected)` ends the stream.
    fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, LinkError>;
}

/// [`ByteSource`] fed by chunks sent over a `flume` channel. Dropping every
/// sender disconnects the source once buffered bytes are consumed.
pub struct ChannelSource {
    rx: Receiver<Vec<u8>>,
    pending: Vec<u8>,
    offset: usize,
}

impl ChannelSource {
    pub fn new(rx: Receiver<Vec<u8>>) -> Self {
        Self {
            rx,
            pending: Vec::new(),
            offset: 0,
        }
    }

    /// Bounded channel plus the source reading from it.
    pub fn bounded(capacity: usize) -> (Sender<Vec<u8>>, Self) {
        let (tx, rx) = flume::bounded(capacity);
        (tx, Self::new(rx))
    }

    fn copy_pending(&mut self, buf: &mut [u8]) -> usize {
        let available = &self.pending[self.offset..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.offset += n;
        n
    }
}

impl ByteSource for ChannelSource {
    fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, LinkError> {
        if self.offset < self.pending.len() {
            return Ok(self.copy_pending(buf));
        }

        match self.rx.recv_timeout(timeout) {
            Ok(chunk) => {
                self.pending = chunk;
                self.offset = 0;
                Ok(self.copy_pending(buf))
            }
            Err(RecvTimeoutError::Timeout) => Ok(0),
            Err(RecvTimeoutError::Disconnected) => Err(LinkError::Disconnected),
        }
    }
}

/// Shared "sensor connected" flag. Set while a reader is running on a live
/// source; the mapping runtime stays idle while it is clear.
#[derive(Debug, Clone, Default)]
pub struct LinkStatus {
    connected: Arc<AtomicBool>,
}

impl LinkStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }
}

#[derive(Debug, Clone)]
pub struct LinkOptions {
    pub axis_codes: AxisCodes,
    pub read_timeout: Duration,
    /// How long `Drop` waits for the thread before detaching it.
    pub shutdown_timeout: Duration,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            axis_codes: AxisCodes::default(),
            read_timeout: Duration::from_millis(5),
            shutdown_timeout: Duration::from_millis(500),
        }
    }
}

/// Marks the link down when the reader thread exits, panics included.
struct ExitGuard {
    status: LinkStatus,
    alive: Arc<AtomicBool>,
    _done: Sender<()>,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        self.status.set_connected(false);
        self.alive.store(false, Ordering::Relaxed);
    }
}

/// Link reader thread handle
///
/// Owns the join handle and a shutdown flag.
/// When dropped, signals the thread to stop and waits up to the configured
/// shutdown timeout.
pub struct LinkReader {
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
    /// Closed by the thread on exit; lets `stop` wait with a deadline.
    done: Receiver<()>,
    alive: Arc<AtomicBool>,
    status: LinkStatus,
    name: String,
    shutdown_timeout: Duration,
}

impl LinkReader {
    /// Spawn a reader thread for `source`.
    ///
    /// - `name`: Human-readable link name (for logging and the thread name)
    /// - `sender`: Producer side of the telemetry channel
    /// - `status`: Connectivity flag shared with the mapping runtime
    pub fn spawn<S>(
        name: &str,
        source: S,
        sender: TelemetrySender,
        status: LinkStatus,
        options: LinkOptions,
    ) -> Result<Self, LinkError>
    where
        S: ByteSource + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let alive = Arc::new(AtomicBool::new(true));
        let (done_tx, done) = flume::bounded::<()>(1);

        let handle = {
            let shutdown = shutdown.clone();
            let alive = alive.clone();
            let status = status.clone();
            let name = name.to_string();
            let decoder = TelemetryDecoder::with_codes(options.axis_codes.clone());
            let read_timeout = options.read_timeout;

            thread::Builder::new()
                .name(format!("link-{}", name))
                .spawn(move || {
                    let _exit = ExitGuard {
                        status: status.clone(),
                        alive,
                        _done: done_tx,
                    };
                    Self::read_loop(source, decoder, sender, &status, &shutdown, read_timeout, &name);
                })?
        };

        Ok(Self {
            shutdown,
            handle: Some(handle),
            done,
            alive,
            status,
            name: name.to_string(),
            shutdown_timeout: options.shutdown_timeout,
        })
    }

    /// Check if the read loop is still running
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    pub fn status(&self) -> &LinkStatus {
        &self.status
    }

    fn read_loop<S: ByteSource>(
        mut source: S,
        mut decoder: TelemetryDecoder,
        mut sender: TelemetrySender,
        status: &LinkStatus,
        shutdown: &AtomicBool,
        read_timeout: Duration,
        name: &str,
    ) {
        log::info!("[link {}] reader started", name);
        status.set_connected(true);

        let mut buf = [0u8; 256];

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            match source.read_timeout(&mut buf, read_timeout) {
                Ok(0) => {} // Timeout, no data (expected)
                Ok(n) => {
                    for message in decoder.decode(&buf[..n]) {
                        log::debug!("[link {}] {:?}", name, message);
                        sender.push(message);
                    }
                }
                Err(LinkError::Disconnected) => {
                    log::warn!("[link {}] source disconnected", name);
                    break;
                }
                Err(e) => {
                    log::error!("[link {}] read error: {}", name, e);
                    break;
                }
            }

            if sender.is_abandoned() {
                log::info!("[link {}] telemetry receiver dropped", name);
                break;
            }
        }

        log::info!("[link {}] reader stopped", name);
    }

    /// Signal the thread and wait up to `timeout` for it to exit. Returns
    /// false if it was still running at the deadline; the thread is then
    /// detached and exits on its own once its current read returns.
    pub fn stop(&mut self, timeout: Duration) -> bool {
        self.shutdown.store(true, Ordering::Relaxed);

        let Some(handle) = self.handle.take() else {
            return true;
        };

        match self.done.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => {
                log::warn!(
                    "[link {}] reader did not stop within {:?}, detaching",
                    self.name,
                    timeout
                );
                false
            }
            _ => {
                if handle.join().is_err() {
                    log::error!("[link {}] reader thread panicked", self.name);
                }
                true
            }
        }
    }
}

impl Drop for LinkReader {
    fn drop(&mut self) {
        if self.handle.is_some() {
            log::debug!("[link {}] waiting for reader to stop...", self.name);
            self.stop(self.shutdown_timeout);
        }
    }
}
