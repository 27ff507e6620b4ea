//! Fixed-period tick source
//!
//! Runs a background thread that posts a [`TickSignal`] into a channel
//! once per period. The thread never touches timer state; the receiver
//! applies ticks on its own task before each frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info};

/// One elapsed tick period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSignal;

/// Ticker lifecycle errors
#[derive(Debug, thiserror::Error)]
pub enum TickerError {
    #[error("Ticker already running")]
    AlreadyRunning,

    #[error("Ticker not running")]
    NotRunning,

    #[error("Failed to spawn ticker thread: {0}")]
    SpawnFailed(#[from] std::io::Error),

    #[error("Thread join failed")]
    ThreadJoinFailed,
}

/// Background thread posting ticks at a fixed period
pub struct Ticker {
    period: Duration,
    thread_handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl Ticker {
    /// Create a ticker (not yet started)
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            thread_handle: None,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start posting ticks into `sender`
    ///
    /// The thread also ends on its own once the receiving side is dropped.
    pub fn start(&mut self, sender: Sender<TickSignal>) -> Result<(), TickerError> {
        if self.thread_handle.is_some() {
            return Err(TickerError::AlreadyRunning);
        }

        self.shutdown.store(false, Ordering::Relaxed);

        let shutdown = Arc::clone(&self.shutdown);
        let period = self.period;

        let handle = thread::Builder::new()
            .name("eggtimer-ticker".into())
            .spawn(move || {
                while !shutdown.load(Ordering::Relaxed) {
                    thread::sleep(period);
                    if shutdown.load(Ordering::Relaxed) {
                        break;
                    }
                    if sender.send(TickSignal).is_err() {
                        debug!("ticker: receiver dropped, exiting");
                        break;
                    }
                }
            })?;

        self.thread_handle = Some(handle);
        info!(period_ms = self.period.as_millis() as u64, "ticker started");

        Ok(())
    }

    /// Stop the thread and wait for it to finish
    pub fn stop(&mut self) -> Result<(), TickerError> {
        let Some(handle) = self.thread_handle.take() else {
            return Err(TickerError::NotRunning);
        };

        self.shutdown.store(true, Ordering::Relaxed);
        handle.join().map_err(|_| TickerError::ThreadJoinFailed)?;
        info!("ticker stopped");

        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.thread_handle.is_some()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn ticker_creation() {
        let ticker = Ticker::new(Duration::from_millis(5));
        assert!(!ticker.is_running());
        assert_eq!(ticker.period(), Duration::from_millis(5));
    }

    #[test]
    fn ticker_start_stop() {
        let (tx, rx) = mpsc::channel();
        let mut ticker = Ticker::new(Duration::from_millis(2));

        ticker.start(tx).expect("Failed to start ticker");
        assert!(ticker.is_running());

        // Blocks until the first tick arrives
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(TickSignal));

        ticker.stop().expect("Failed to stop ticker");
        assert!(!ticker.is_running());
    }

    #[test]
    fn double_start_is_rejected() {
        let (tx, _rx) = mpsc::channel();
        let mut ticker = Ticker::new(Duration::from_millis(2));
        ticker.start(tx.clone()).unwrap();
        assert!(matches!(ticker.start(tx), Err(TickerError::AlreadyRunning)));
    }

    #[test]
    fn stop_without_start_is_an_error() {
        let mut ticker = Ticker::new(Duration::from_millis(2));
        assert!(matches!(ticker.stop(), Err(TickerError::NotRunning)));
    }

    #[test]
    fn thread_exits_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel();
        let mut ticker = Ticker::new(Duration::from_millis(1));
        ticker.start(tx).unwrap();
        drop(rx);

        // Join succeeds whether the thread already exited or is told to
        ticker.stop().expect("join after receiver drop");
    }
}
