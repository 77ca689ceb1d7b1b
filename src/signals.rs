//! Boolean control lines between the harness and the encoder.
//!
//! Each line is a `tokio::sync::watch` channel holding its current level.
//! The encoder only listens to `init`; `training` and `test` exist so the
//! harness can drive and trace them, and nothing in the encoder reads them.
//!
//! The `init` line also counts its rising edges, so a rise that happens
//! while the encoder is busy is not lost to channel coalescing.

use tokio::sync::watch;

/// Level of the trigger line and how many times it has risen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineState {
    pub level: bool,
    pub rises: u64,
}

/// The three control lines of an encoder instance.
#[derive(Debug)]
pub struct Signals {
    init: watch::Sender<LineState>,
    training: watch::Sender<bool>,
    test: watch::Sender<bool>,
}

impl Default for Signals {
    fn default() -> Self {
        Self::new()
    }
}

impl Signals {
    /// All lines start low.
    pub fn new() -> Self {
        Self {
            init: watch::Sender::new(LineState::default()),
            training: watch::Sender::new(false),
            test: watch::Sender::new(false),
        }
    }

    /// Drive the trigger line.
    pub fn set_init(&self, level: bool) {
        self.init.send_modify(|state| {
            if level && !state.level {
                state.rises += 1;
            }
            state.level = level;
        });
    }

    /// Drive the reserved training line.
    pub fn set_training(&self, level: bool) {
        self.training.send_replace(level);
    }

    /// Drive the reserved test line.
    pub fn set_test(&self, level: bool) {
        self.test.send_replace(level);
    }

    pub fn init(&self) -> bool {
        self.init.borrow().level
    }

    pub fn training(&self) -> bool {
        *self.training.borrow()
    }

    pub fn test(&self) -> bool {
        *self.test.borrow()
    }

    /// Levels of (init, training, test).
    pub fn levels(&self) -> (bool, bool, bool) {
        (self.init(), self.training(), self.test())
    }

    /// Rising edges seen on `init` so far.
    pub fn rises(&self) -> u64 {
        self.init.borrow().rises
    }

    /// A listener for rising edges on `init`, starting from now.
    ///
    /// The line closes when this `Signals` is dropped.
    pub fn trigger_line(&self) -> TriggerLine {
        TriggerLine::new(self.init.subscribe())
    }
}

/// Rising-edge listener over the `init` line.
#[derive(Debug)]
pub struct TriggerLine {
    rx: watch::Receiver<LineState>,
    seen: u64,
}

impl TriggerLine {
    /// Start listening; edges that already happened are not reported.
    pub fn new(mut rx: watch::Receiver<LineState>) -> Self {
        let seen = rx.borrow_and_update().rises;
        Self { rx, seen }
    }

    /// Wait for the next false → true transition.
    ///
    /// Rises that happened since the last call are reported at once, and
    /// several of them collapse into one. Returns `None` once the driving
    /// side is gone and no rise is pending.
    pub async fn rising_edge(&mut self) -> Option<()> {
        loop {
            let rises = self.rx.borrow_and_update().rises;
            if rises > self.seen {
                self.seen = rises;
                return Some(());
            }
            if self.rx.changed().await.is_err() {
                return None;
            }
        }
    }

    /// Current level of the line.
    pub fn level(&self) -> bool {
        self.rx.borrow().level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test(start_paused = true)]
    async fn test_rising_edge_fires() {
        let signals = Signals::new();
        let mut line = signals.trigger_line();

        signals.set_init(true);
        assert_eq!(line.rising_edge().await, Some(()));
        assert!(line.level());
        assert_eq!(signals.rises(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_falling_edge_ignored() {
        let signals = Signals::new();
        signals.set_init(true);
        let mut line = signals.trigger_line();

        signals.set_init(false);
        let waited = timeout(Duration::from_millis(5), line.rising_edge()).await;
        assert!(waited.is_err(), "falling edge must not trigger");
        assert!(!line.level());
    }

    #[tokio::test(start_paused = true)]
    async fn test_holding_high_is_one_edge() {
        let signals = Signals::new();
        let mut line = signals.trigger_line();

        signals.set_init(true);
        signals.set_init(true);
        assert_eq!(line.rising_edge().await, Some(()));
        let waited = timeout(Duration::from_millis(5), line.rising_edge()).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missed_toggles_collapse() {
        let signals = Signals::new();
        let mut line = signals.trigger_line();

        for _ in 0..3 {
            signals.set_init(true);
            signals.set_init(false);
        }
        assert_eq!(signals.rises(), 3);
        assert_eq!(line.rising_edge().await, Some(()));
        let waited = timeout(Duration::from_millis(5), line.rising_edge()).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_line_returns_none() {
        let signals = Signals::new();
        let mut line = signals.trigger_line();
        drop(signals);
        assert_eq!(line.rising_edge().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reserved_lines_do_not_trigger() {
        let signals = Signals::new();
        let mut line = signals.trigger_line();

        signals.set_training(true);
        signals.set_test(true);
        let waited = timeout(Duration::from_millis(5), line.rising_edge()).await;
        assert!(waited.is_err());
        assert_eq!(signals.levels(), (false, true, true));
    }
}
