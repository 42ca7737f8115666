use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Sender, bounded, select};
use parking_lot::Mutex;

use crate::level::{Level, WindowPass};

/// Background thread keeping the level's window filled around the observer.
///
/// Runs a window pass, then sleeps until the observer moves; an interrupted
/// pass restarts immediately around the new center.
pub struct Streamer {
    stop_tx: Sender<()>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Streamer {
    pub fn spawn(level: Arc<Level>) -> io::Result<Self> {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let handle = thread::Builder::new()
            .name("strata-stream".into())
            .spawn(move || {
                let mut passes = 0u64;
                loop {
                    if stop_rx.try_recv().is_ok() {
                        break;
                    }
                    passes += 1;
                    if level.ensure_window() == WindowPass::Interrupted {
                        continue;
                    }
                    select! {
                        recv(level.observer_moved()) -> _ => {}
                        recv(stop_rx) -> _ => break,
                    }
                }
                log::debug!(target: "stream", "streamer exiting after {passes} passes");
            })?;
        Ok(Self {
            stop_tx,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Asks the thread to exit and joins it. Idempotent.
    pub fn stop(&self) {
        let _ = self.stop_tx.try_send(());
        if let Some(h) = self.handle.lock().take() {
            if h.join().is_err() {
                log::error!(target: "stream", "streamer thread panicked");
            }
        }
    }
}

impl Drop for Streamer {
    fn drop(&mut self) {
        self.stop();
    }
}
