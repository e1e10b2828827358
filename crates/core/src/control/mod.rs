use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::engine;
use crate::pacing::{CancelToken, Pacer, SpeedControl};
use crate::{Algorithm, AppConfig, Result, RunSummary, Sequence, SortVizError};

/// Render callback invoked after every engine step with the current state.
type RenderCallback = Box<dyn FnMut(&[u32]) + Send + 'static>;

/// High level command surface over one sequence.
///
/// Owns the sequence, the algorithm selection, the speed control and the
/// render callback, and enforces the single-run policy: at most one
/// background worker mutates the sequence at a time, and the worker holds
/// exclusive access to it for the whole run. `reset` and `start` go through
/// the same guard, so the unsynchronised races of the classic visualiser
/// cannot occur.
pub struct SortController {
    config: AppConfig,
    sequence: Arc<Mutex<Sequence>>,
    algorithm: Mutex<Algorithm>,
    speed: SpeedControl,
    render: Arc<Mutex<Option<RenderCallback>>>,
    active: Mutex<Option<ActiveRun>>,
}

#[derive(Debug)]
struct ActiveRun {
    token: CancelToken,
    worker: JoinHandle<RunSummary>,
}

impl SortController {
    /// Creates a controller with a freshly generated sequence.
    pub fn new(config: AppConfig) -> Result<Self> {
        let sequence = Sequence::generate(
            config.sequence.bars,
            config.sequence.min_value,
            config.sequence.max_value,
        )?;
        Self::with_sequence(config, sequence)
    }

    /// Creates a controller over an explicit sequence, typically for
    /// deterministic runs.
    pub fn with_sequence(config: AppConfig, sequence: Sequence) -> Result<Self> {
        config.validate()?;
        let speed = SpeedControl::new(config.pacing.delay_ms);
        Ok(Self {
            algorithm: Mutex::new(config.algorithm),
            sequence: Arc::new(Mutex::new(sequence)),
            speed,
            render: Arc::new(Mutex::new(None)),
            active: Mutex::new(None),
            config,
        })
    }

    /// Selects the algorithm for the *next* run. An in-flight run keeps the
    /// selection it started with.
    pub fn set_algorithm(&self, algorithm: Algorithm) -> Result<()> {
        *self.lock_algorithm()? = algorithm;
        Ok(())
    }

    pub fn algorithm(&self) -> Result<Algorithm> {
        Ok(*self.lock_algorithm()?)
    }

    /// Updates the step delay. Applies live, from the next pause onwards.
    pub fn set_speed(&self, delay_ms: u64) {
        self.speed.set(delay_ms);
    }

    pub fn speed(&self) -> Duration {
        self.speed.current()
    }

    /// Registers the render callback. Replaces any previous registration.
    pub fn on_step<F>(&self, callback: F) -> Result<()>
    where
        F: FnMut(&[u32]) + Send + 'static,
    {
        *self.lock_render()? = Some(Box::new(callback));
        Ok(())
    }

    pub fn is_running(&self) -> Result<bool> {
        let active = self.lock_active()?;
        Ok(match active.as_ref() {
            Some(run) => !run.worker.is_finished(),
            None => false,
        })
    }

    /// Spawns one background run of the selected algorithm over the held
    /// sequence. Fails with [`SortVizError::RunActive`] while a run is in
    /// flight.
    pub fn start(&self) -> Result<()> {
        let mut active = self.lock_active()?;
        if active
            .as_ref()
            .is_some_and(|run| !run.worker.is_finished())
        {
            return Err(SortVizError::RunActive);
        }
        // Reap a finished worker before starting anew.
        if let Some(run) = active.take() {
            let _ = run.worker.join();
        }

        let algorithm = *self.lock_algorithm()?;
        let token = CancelToken::new();
        let pacer = Pacer::new(self.speed.clone(), token.clone());
        let sequence = Arc::clone(&self.sequence);
        let render = Arc::clone(&self.render);

        let worker = thread::spawn(move || {
            // Exclusive handle to the sequence for the run's duration.
            let mut guard = sequence.lock().unwrap_or_else(PoisonError::into_inner);
            engine::run(algorithm, guard.values_mut(), &pacer, |step| {
                let mut slot = render.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(callback) = slot.as_mut() {
                    callback(step.values);
                }
            })
        });

        *active = Some(ActiveRun { token, worker });
        Ok(())
    }

    /// Requests cancellation of the active run, if any, and drains its
    /// worker. Returns the run's summary.
    pub fn cancel(&self) -> Result<Option<RunSummary>> {
        let run = self.lock_active()?.take();
        match run {
            Some(run) => {
                run.token.cancel();
                Ok(Some(join_worker(run.worker)?))
            }
            None => Ok(None),
        }
    }

    /// Cancels any active run, regenerates the sequence from configuration
    /// and redraws once. Returns the fresh snapshot.
    pub fn reset(&self) -> Result<Vec<u32>> {
        self.cancel()?;
        let fresh = Sequence::generate(
            self.config.sequence.bars,
            self.config.sequence.min_value,
            self.config.sequence.max_value,
        )?;
        let snapshot = fresh.values().to_vec();
        *self.lock_sequence()? = fresh;
        if let Some(callback) = self.lock_render()?.as_mut() {
            callback(&snapshot);
        }
        Ok(snapshot)
    }

    /// Blocks until the active run finishes and returns its summary, or
    /// `None` when nothing is running.
    pub fn wait(&self) -> Result<Option<RunSummary>> {
        let run = self.lock_active()?.take();
        match run {
            Some(run) => Ok(Some(join_worker(run.worker)?)),
            None => Ok(None),
        }
    }

    /// Copy of the current sequence state. Blocks while a run holds the
    /// sequence; redraws during a run arrive through the render callback
    /// instead.
    pub fn snapshot(&self) -> Result<Vec<u32>> {
        Ok(self.lock_sequence()?.values().to_vec())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn lock_sequence(&self) -> Result<MutexGuard<'_, Sequence>> {
        self.sequence
            .lock()
            .map_err(|_| SortVizError::msg("sequence state has been poisoned"))
    }

    fn lock_algorithm(&self) -> Result<MutexGuard<'_, Algorithm>> {
        self.algorithm
            .lock()
            .map_err(|_| SortVizError::msg("algorithm selection has been poisoned"))
    }

    fn lock_render(&self) -> Result<MutexGuard<'_, Option<RenderCallback>>> {
        self.render
            .lock()
            .map_err(|_| SortVizError::msg("render callback has been poisoned"))
    }

    fn lock_active(&self) -> Result<MutexGuard<'_, Option<ActiveRun>>> {
        self.active
            .lock()
            .map_err(|_| SortVizError::msg("run state has been poisoned"))
    }
}

impl fmt::Debug for SortController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortController")
            .field("config", &self.config)
            .field("speed", &self.speed)
            .finish()
    }
}

fn join_worker(worker: JoinHandle<RunSummary>) -> Result<RunSummary> {
    worker
        .join()
        .map_err(|_| SortVizError::msg("sort worker panicked"))
}
