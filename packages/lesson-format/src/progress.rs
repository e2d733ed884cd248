//! Progress reporting for load and save.
//!
//! Progress is an ordered stream of payload-free ticks. A consumer sizes its
//! indicator from a [`CountSnapshot`](crate::types::CountSnapshot) and
//! advances it once per tick.

/// Granularity of a progress tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressTick {
    /// A tab was entered.
    Tab,
    /// A section was entered.
    Section,
    /// A page was entered.
    Page,
    /// A content item was processed.
    Content,
}

/// Receiver of progress ticks.
pub trait ProgressSink {
    /// Called once per tick, in traversal order.
    fn tick(&mut self, tick: ProgressTick);
}

impl<F> ProgressSink for F
where
    F: FnMut(ProgressTick),
{
    fn tick(&mut self, tick: ProgressTick) {
        self(tick);
    }
}

/// Sink that discards every tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn tick(&mut self, _tick: ProgressTick) {}
}

/// Sink that counts ticks per granularity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickCounter {
    pub tabs: usize,
    pub sections: usize,
    pub pages: usize,
    pub contents: usize,
}

impl TickCounter {
    /// Create a counter with all counts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all ticks seen.
    #[must_use]
    pub fn total(&self) -> usize {
        self.tabs + self.sections + self.pages + self.contents
    }
}

impl ProgressSink for TickCounter {
    fn tick(&mut self, tick: ProgressTick) {
        match tick {
            ProgressTick::Tab => self.tabs += 1,
            ProgressTick::Section => self.sections += 1,
            ProgressTick::Page => self.pages += 1,
            ProgressTick::Content => self.contents += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |tick: ProgressTick| seen.push(tick);
            sink.tick(ProgressTick::Tab);
            sink.tick(ProgressTick::Content);
        }
        assert_eq!(seen, vec![ProgressTick::Tab, ProgressTick::Content]);
    }

    #[test]
    fn test_tick_counter() {
        let mut counter = TickCounter::new();
        for tick in [
            ProgressTick::Tab,
            ProgressTick::Section,
            ProgressTick::Page,
            ProgressTick::Content,
            ProgressTick::Content,
        ] {
            counter.tick(tick);
        }
        assert_eq!(counter.contents, 2);
        assert_eq!(counter.total(), 5);
    }
}
