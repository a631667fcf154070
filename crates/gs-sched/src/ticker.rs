//! The global ticker thread: the one clock driving every simulation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

use crate::SimulationsController;

/// Handle to the background thread that invokes
/// [`SimulationsController::make_models_tick`] once per base period.
///
/// The sleep re-reads the controller's base period each iteration, so
/// [`TickSettings::set_base_period_ms`][crate::TickSettings::set_base_period_ms]
/// takes effect on the next pass.  Dropping the handle stops the thread.
pub struct Ticker {
    stop:   Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Start the ticker loop against `controller`.
    pub fn spawn(controller: Arc<SimulationsController>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            debug!("ticker started");
            loop {
                let period = controller.settings().base_period_ms().max(1);
                thread::sleep(Duration::from_millis(period));
                if stop_flag.load(Ordering::Acquire) {
                    break;
                }
                controller.make_models_tick();
            }
            debug!("ticker stopped");
        });
        Self { stop, handle: Some(handle) }
    }

    /// Stop the loop and wait for the thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            // The thread only panics if a pass panicked; nothing to recover.
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
