//! Fixed-interval background refresh, stopped when the handle is dropped.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

pub struct Poller {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Call `fetch` now and then every `interval`, sending each result to the
    /// returned receiver. Polling ends when the `Poller` is dropped or the
    /// receiver goes away.
    pub fn spawn<T, F>(interval: Duration, mut fetch: F) -> (Self, Receiver<T>)
    where
        T: Send + 'static,
        F: FnMut() -> T + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let (result_tx, result_rx) = mpsc::channel::<T>();

        let handle = thread::spawn(move || {
            loop {
                if result_tx.send(fetch()).is_err() {
                    debug!("poll receiver dropped");
                    break;
                }
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            debug!("poller stopped");
        });

        let poller = Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        };
        (poller, result_rx)
    }

    pub fn stop(&mut self) {
        // Dropping the sender wakes the thread out of recv_timeout.
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_polls_immediately_and_repeatedly() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let (poller, rx) = Poller::spawn(Duration::from_millis(10), move || {
            counter.fetch_add(1, Ordering::SeqCst) + 1
        });

        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), 1);
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), 2);
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), 3);
        drop(poller);

        let after_stop = calls.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(calls.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn test_drop_stops_long_interval_promptly() {
        let (poller, rx) = Poller::spawn(Duration::from_secs(3600), || "tick");
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), "tick");

        let started = std::time::Instant::now();
        drop(poller);
        assert!(started.elapsed() < Duration::from_secs(5));
        // Thread has exited, so the channel is closed.
        assert!(rx.recv().is_err());
    }
}
