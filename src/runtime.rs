//! Background threads and the render loop.
//!
//! [`App`] ties a [`Chart`] to an input listener and a periodic data source
//! update. Both run on their own [`Worker`] thread; rendering happens on the
//! thread calling [`App::run`].

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use eyre::WrapErr;
use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, info, warn};

use crate::chart::Chart;
use crate::input::{spawn_listener, KeyBindings};
use crate::surface::KeySource;

/// Shared stop request. Sleeping on it returns early once stopped.
#[derive(Clone, Default)]
pub struct StopFlag {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        let (stopped, cvar) = &*self.inner;
        *stopped.lock() = true;
        cvar.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        *self.inner.0.lock()
    }

    /// Sleeps for `duration` or until stopped. Returns whether the flag is set.
    pub fn sleep(&self, duration: Duration) -> bool {
        let (stopped, cvar) = &*self.inner;
        let mut stopped = stopped.lock();
        if !*stopped {
            // spurious wakeups only shorten one sleep
            cvar.wait_for(&mut stopped, duration);
        }
        *stopped
    }
}

/// A named thread with a stop flag. Dropping a worker stops and joins it.
pub struct Worker {
    name: String,
    stop: StopFlag,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn spawn<F>(name: &str, f: F) -> io::Result<Self>
    where
        F: FnOnce(StopFlag) + Send + 'static,
    {
        let stop = StopFlag::new();
        let flag = stop.clone();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || f(flag))?;
        debug!(worker = name, "started");
        Ok(Self {
            name: name.to_string(),
            stop,
            handle: Some(handle),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Waits for the thread to end. Call [`Worker::stop`] first unless the
    /// thread ends on its own.
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!(worker = %self.name, "waiting for thread to join");
            if handle.join().is_err() {
                error!(worker = %self.name, "thread panicked");
            }
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop();
        self.join();
    }
}

/// Periodic producer of new points, called from the update thread.
pub trait DataSource: Send {
    fn update(&mut self) -> eyre::Result<()>;
}

impl<F> DataSource for F
where
    F: FnMut() -> eyre::Result<()> + Send,
{
    fn update(&mut self) -> eyre::Result<()> {
        self()
    }
}

/// Runs a chart until a quit command arrives.
pub struct App {
    chart: Chart,
    keys: Option<Box<dyn KeySource>>,
    bindings: KeyBindings,
    source: Option<Box<dyn DataSource>>,
}

impl App {
    pub fn new(chart: Chart) -> Self {
        Self {
            chart,
            keys: None,
            bindings: KeyBindings::default(),
            source: None,
        }
    }

    pub fn with_keys(mut self, keys: impl KeySource + 'static) -> Self {
        self.keys = Some(Box::new(keys));
        self
    }

    pub fn with_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn with_data_source(mut self, source: impl DataSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn chart_mut(&mut self) -> &mut Chart {
        &mut self.chart
    }

    pub fn into_chart(self) -> Chart {
        self.chart
    }

    fn spawn_updater(&mut self) -> io::Result<Option<Worker>> {
        let Some(mut source) = self.source.take() else {
            return Ok(None);
        };
        let interval = Duration::from_millis(self.chart.config().update_interval_ms);
        Worker::spawn("update", move |stop| {
            while !stop.is_stopped() {
                if let Err(e) = source.update() {
                    warn!(error = ?e, "data source update failed");
                }
                if stop.sleep(interval) {
                    break;
                }
            }
        })
        .map(Some)
    }

    /// Starts the workers, renders until quit, then stops and joins them.
    pub fn run(&mut self) -> eyre::Result<()> {
        let mut input = match self.keys.take() {
            Some(keys) => Some(
                spawn_listener(keys, self.bindings.clone(), self.chart.command_sender())
                    .wrap_err("failed to start input listener")?,
            ),
            None => None,
        };
        let mut updater = self.spawn_updater().wrap_err("failed to start update thread")?;

        let frame_interval = Duration::from_millis(self.chart.config().frame_interval_ms);
        info!("chart running");

        if let Err(e) = self.chart.draw().wrap_err("initial draw failed") {
            error!("{e:?}");
        }
        while !self.chart.should_quit() {
            if let Err(e) = self.chart.frame().wrap_err("frame failed") {
                error!("{e:?}");
            }
            thread::sleep(frame_interval);
        }

        info!("stopping threads");
        for worker in [input.as_mut(), updater.as_mut()].into_iter().flatten() {
            worker.stop();
            worker.join();
        }
        info!("done");
        Ok(())
    }
}
