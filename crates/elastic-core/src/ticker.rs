/// Per-display-refresh callback source.
///
/// The view starts it on touch-down and stops it once the settle spring has
/// finished; the host calls [`crate::ElasticView::frame`] on every tick in
/// between. Idle views never tick.
pub trait FrameTicker {
    fn start(&mut self);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

/// Ticker with no scheduler behind it. The host polls [`FrameTicker::is_running`]
/// and drives frames itself. Start/stop transitions are counted.
#[derive(Clone, Debug, Default)]
pub struct ManualTicker {
    running: bool,
    starts: usize,
    stops: usize,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starts(&self) -> usize {
        self.starts
    }

    pub fn stops(&self) -> usize {
        self.stops
    }
}

impl FrameTicker for ManualTicker {
    fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.starts += 1;
        }
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.stops += 1;
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_transitions() {
        let mut ticker = ManualTicker::new();
        ticker.stop();
        ticker.start();
        ticker.start();
        assert!(ticker.is_running());
        ticker.stop();
        ticker.stop();
        assert!(!ticker.is_running());
        assert_eq!((ticker.starts(), ticker.stops()), (1, 1));
    }
}
