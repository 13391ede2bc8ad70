use rand::Rng;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, error, info};

use crate::client::{RequestError, Response, Transport};
use crate::config::Config;
use crate::target::{Target, TargetPicker};

/// Drives the request loop: one GET at a time, forever, until `shutdown` flips.
pub struct LoadGenerator<T, R> {
    transport: T,
    picker: TargetPicker<R>,
    warmup: Duration,
    pause_bounds: (Duration, Duration),
    shutdown: watch::Receiver<bool>,
}

impl<T: Transport, R: Rng> LoadGenerator<T, R> {
    pub fn new(config: &Config, transport: T, rng: R, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            transport,
            picker: TargetPicker::new(config, rng),
            warmup: config.tuning.warmup(),
            pause_bounds: config.tuning.pause_bounds(),
            shutdown,
        }
    }

    pub async fn run(mut self) {
        info!("Warming up for {:?} before the first request", self.warmup);
        if !self.sleep_unless_shutdown(self.warmup).await {
            info!("Shutdown requested during warm-up");
            return;
        }

        loop {
            let target = self.picker.next_target();
            debug!("Requesting {} from {}", target.vehicle, target.host);

            let outcome = self.transport.get(&target).await;
            handle_outcome(&target, outcome);

            let pause = sample_pause(self.picker.rng_mut(), self.pause_bounds);
            if !self.sleep_unless_shutdown(pause).await {
                break;
            }
        }

        info!("Load generator stopped");
    }

    /// Returns false when shutdown was requested before `duration` elapsed.
    async fn sleep_unless_shutdown(&mut self, duration: Duration) -> bool {
        if *self.shutdown.borrow() {
            return false;
        }
        tokio::select! {
            _ = time::sleep(duration) => {}
            changed = self.shutdown.changed() => {
                // sender gone: treat as shutdown
                if changed.is_err() {
                    return false;
                }
            }
        }
        !*self.shutdown.borrow()
    }
}

fn handle_outcome(target: &Target, outcome: Result<Response, RequestError>) {
    match outcome {
        Ok(response) => debug!(
            "Response from {}: {} {}",
            target, response.status, response.body
        ),
        Err(e) => error!("Request failed: {}", e.describe()),
    }
}

pub fn sample_pause<R: Rng + ?Sized>(rng: &mut R, (min, max): (Duration, Duration)) -> Duration {
    rng.random_range(min..=max)
}
