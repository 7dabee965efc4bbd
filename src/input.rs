//! Key bindings and the input listener thread.

use std::collections::HashMap;
use std::io;
use std::sync::mpsc::Sender;
use std::time::Duration;

use crossterm::event::KeyCode;
use tracing::{debug, trace, warn};

use crate::runtime::Worker;
use crate::surface::KeySource;

/// How long one key poll may block before the stop flag is checked again.
pub const POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Everything the user can ask the chart to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    ZoomXIn,
    ZoomXOut,
    ZoomYIn,
    ZoomYOut,
    PanUp,
    PanDown,
    PanLeft,
    PanRight,
    Reset,
    ToggleLegend,
    ToggleGrid,
    ToggleLastValues,
    ToggleStatusLine,
    TogglePaused,
    ToggleFitAll,
    /// Enable or disable the series with this line number.
    ToggleSeries(usize),
    CycleZoomUnit,
    Quit,
}

/// Key to command registry.
#[derive(Clone, Debug)]
pub struct KeyBindings {
    bindings: HashMap<KeyCode, Command>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Command::*;

        let mut bindings = HashMap::new();
        let chars = [
            ('L', ZoomXIn),
            ('H', ZoomXOut),
            ('K', ZoomYIn),
            ('J', ZoomYOut),
            ('k', PanUp),
            ('j', PanDown),
            ('h', PanLeft),
            ('l', PanRight),
            ('r', Reset),
            ('i', ToggleLegend),
            ('g', ToggleGrid),
            ('v', ToggleLastValues),
            ('s', ToggleStatusLine),
            (' ', TogglePaused),
            ('a', ToggleFitAll),
            ('z', CycleZoomUnit),
            ('q', Quit),
        ];
        for (ch, command) in chars {
            bindings.insert(KeyCode::Char(ch), command);
        }
        for n in 1..=9u32 {
            if let Some(ch) = char::from_digit(n, 10) {
                bindings.insert(KeyCode::Char(ch), ToggleSeries(n as usize));
            }
        }
        bindings.insert(KeyCode::Up, PanUp);
        bindings.insert(KeyCode::Down, PanDown);
        bindings.insert(KeyCode::Left, PanLeft);
        bindings.insert(KeyCode::Right, PanRight);

        Self { bindings }
    }
}

impl KeyBindings {
    /// A registry without any binding.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn lookup(&self, key: KeyCode) -> Option<Command> {
        self.bindings.get(&key).copied()
    }

    /// Binds `key`, replacing whatever it was bound to.
    pub fn bind(&mut self, key: KeyCode, command: Command) -> Option<Command> {
        self.bindings.insert(key, command)
    }

    pub fn unbind(&mut self, key: KeyCode) -> Option<Command> {
        self.bindings.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Starts a thread that polls `keys` and sends every bound key's command to
/// `tx`. The thread ends when stopped or when the receiver is gone.
pub fn spawn_listener(
    mut keys: Box<dyn KeySource>,
    bindings: KeyBindings,
    tx: Sender<Command>,
) -> io::Result<Worker> {
    Worker::spawn("input", move |stop| {
        while !stop.is_stopped() {
            match keys.poll_key(POLL_TIMEOUT) {
                Ok(Some(key)) => match bindings.lookup(key) {
                    Some(command) => {
                        debug!(?key, ?command, "key pressed");
                        if tx.send(command).is_err() {
                            debug!("command receiver dropped, stopping input listener");
                            break;
                        }
                    }
                    None => trace!(?key, "unbound key"),
                },
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "failed to read key");
                    stop.sleep(POLL_TIMEOUT);
                }
            }
        }
    })
}
