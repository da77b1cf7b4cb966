// Linux perf_event backend: the measured events share one counter group so
// they are enabled, disabled and read together.

use std::fmt;
use std::io;

use perf_event::events::{Cache, CacheOp, CacheResult, WhichCache};
use perf_event::{Builder, Counter, Group};

use super::{CacheEvent, CounterBackend};

pub struct PerfBackend {
    group: Group,
    counters: Vec<Counter>,
}

impl PerfBackend {
    /// Opens an empty counter group for the calling process.
    pub fn create() -> io::Result<Self> {
        Ok(Self {
            group: Group::new()?,
            counters: Vec::new(),
        })
    }
}

// The generic cache events have no L2 selector; the last-level cache is the
// closest portable stand-in for second-level data misses.
fn cache_event(event: CacheEvent) -> Cache {
    let which = match event {
        CacheEvent::L1DataMisses => WhichCache::L1D,
        CacheEvent::L2DataMisses => WhichCache::LL,
    };
    Cache {
        which,
        operation: CacheOp::READ,
        result: CacheResult::MISS,
    }
}

impl CounterBackend for PerfBackend {
    fn add_event(&mut self, event: CacheEvent) -> io::Result<()> {
        let counter = Builder::new()
            .group(&mut self.group)
            .kind(cache_event(event))
            .build()?;
        self.counters.push(counter);
        Ok(())
    }

    fn enable(&mut self) -> io::Result<()> {
        self.group.enable()
    }

    fn disable(&mut self) -> io::Result<()> {
        self.group.disable()
    }

    fn read(&mut self) -> io::Result<Vec<u64>> {
        let counts = self.group.read()?;
        Ok(self.counters.iter().map(|counter| counts[counter]).collect())
    }

    fn reset(&mut self) -> io::Result<()> {
        self.group.reset()
    }

    fn remove_events(&mut self) -> io::Result<()> {
        // dropping a counter closes its file descriptor
        self.counters.clear();
        Ok(())
    }

    fn destroy(self) -> io::Result<()> {
        drop(self.group);
        Ok(())
    }
}

impl fmt::Debug for PerfBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerfBackend")
            .field("events", &self.counters.len())
            .finish()
    }
}
