//! Coalesces rapid writes into one after a quiet period.
//!
//! Every `push` cancels the pending write and schedules a new one, so only
//! the latest value of a burst reaches the sink. Dropping the debouncer
//! flushes whatever is still pending.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub struct Debouncer<T: Send + 'static> {
    sender: Option<Sender<T>>,
    worker: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(quiet: Duration, mut sink: impl FnMut(T) + Send + 'static) -> Self {
        let (sender, receiver) = mpsc::channel::<T>();

        let worker = thread::spawn(move || {
            let mut pending: Option<T> = None;
            loop {
                if pending.is_none() {
                    match receiver.recv() {
                        Ok(value) => pending = Some(value),
                        Err(_) => break,
                    }
                    continue;
                }

                match receiver.recv_timeout(quiet) {
                    Ok(value) => pending = Some(value),
                    Err(RecvTimeoutError::Timeout) => {
                        if let Some(value) = pending.take() {
                            sink(value);
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        if let Some(value) = pending.take() {
                            sink(value);
                        }
                        break;
                    }
                }
            }
        });

        Self {
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    pub fn push(&self, value: T) {
        let delivered = self
            .sender
            .as_ref()
            .map(|sender| sender.send(value).is_ok())
            .unwrap_or(false);
        if !delivered {
            log::warn!("Debounced writer has stopped; dropping update");
        }
    }
}

impl<T: Send + 'static> Drop for Debouncer<T> {
    fn drop(&mut self) {
        // Closing the channel makes the worker flush and exit.
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("Debounced writer panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_sink() -> (Arc<Mutex<Vec<String>>>, impl FnMut(String) + Send + 'static) {
        let written = Arc::new(Mutex::new(Vec::new()));
        let written_clone = Arc::clone(&written);
        (written, move |value| written_clone.lock().unwrap().push(value))
    }

    #[test]
    fn test_burst_writes_only_latest() {
        let (written, sink) = recording_sink();
        let debouncer = Debouncer::new(Duration::from_millis(50), sink);

        debouncer.push("u".to_string());
        debouncer.push("us".to_string());
        debouncer.push("use a map".to_string());
        thread::sleep(Duration::from_millis(250));

        assert_eq!(*written.lock().unwrap(), vec!["use a map".to_string()]);
        drop(debouncer);
        assert_eq!(written.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_separate_bursts_write_separately() {
        let (written, sink) = recording_sink();
        let debouncer = Debouncer::new(Duration::from_millis(30), sink);

        debouncer.push("first".to_string());
        thread::sleep(Duration::from_millis(200));
        debouncer.push("second".to_string());
        thread::sleep(Duration::from_millis(200));

        assert_eq!(
            *written.lock().unwrap(),
            vec!["first".to_string(), "second".to_string()]
        );
    }

    #[test]
    fn test_drop_flushes_pending_value() {
        let (written, sink) = recording_sink();
        let debouncer = Debouncer::new(Duration::from_secs(60), sink);

        debouncer.push("unsaved".to_string());
        drop(debouncer);

        assert_eq!(*written.lock().unwrap(), vec!["unsaved".to_string()]);
    }
}
