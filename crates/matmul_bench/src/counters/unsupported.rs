// Placeholder backend for targets without a supported counter subsystem.
// Creating it fails, which aborts the run before any measurement.

use std::io;

use super::{CacheEvent, CounterBackend};

#[derive(Debug)]
pub struct UnsupportedBackend;

impl UnsupportedBackend {
    pub fn create() -> io::Result<Self> {
        Err(unsupported())
    }
}

fn unsupported() -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        "hardware cache counters are only available on Linux",
    )
}

impl CounterBackend for UnsupportedBackend {
    fn add_event(&mut self, _event: CacheEvent) -> io::Result<()> {
        Err(unsupported())
    }

    fn enable(&mut self) -> io::Result<()> {
        Err(unsupported())
    }

    fn disable(&mut self) -> io::Result<()> {
        Err(unsupported())
    }

    fn read(&mut self) -> io::Result<Vec<u64>> {
        Err(unsupported())
    }

    fn reset(&mut self) -> io::Result<()> {
        Err(unsupported())
    }

    fn remove_events(&mut self) -> io::Result<()> {
        Err(unsupported())
    }
}
