// Hardware cache-miss counters bracketing a single kernel run.
//
// A session is configured once with the declared event list, then cycles
// through start -> stop -> reset for every run, and is torn down at the end.

#[cfg(target_os = "linux")]
mod perf;
#[cfg(not(target_os = "linux"))]
mod unsupported;

use std::fmt;
use std::io;

use crate::error::CounterError;

#[cfg(target_os = "linux")]
pub use perf::PerfBackend as SystemBackend;
#[cfg(not(target_os = "linux"))]
pub use unsupported::UnsupportedBackend as SystemBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEvent {
    L1DataMisses,
    L2DataMisses,
}

impl CacheEvent {
    pub fn name(self) -> &'static str {
        match self {
            CacheEvent::L1DataMisses => "L1 DCM",
            CacheEvent::L2DataMisses => "L2 DCM",
        }
    }
}

/// Events measured around every run, in the order their values are reported.
pub const MEASURED_EVENTS: [CacheEvent; 2] = [CacheEvent::L1DataMisses, CacheEvent::L2DataMisses];

/// Interface to the platform's performance-counter subsystem.
///
/// Constructing a backend creates its (empty) event set.
pub trait CounterBackend {
    fn add_event(&mut self, event: CacheEvent) -> io::Result<()>;

    fn enable(&mut self) -> io::Result<()>;

    fn disable(&mut self) -> io::Result<()>;

    /// Accumulated counts, one per added event, in the order they were added.
    fn read(&mut self) -> io::Result<Vec<u64>>;

    fn reset(&mut self) -> io::Result<()>;

    fn remove_events(&mut self) -> io::Result<()>;

    /// Releases the event set.
    fn destroy(self) -> io::Result<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Subsystem calls, named for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterOp {
    CreateEventSet,
    AddEvent(CacheEvent),
    Start,
    Stop,
    Read,
    Reset,
    RemoveEvents,
    Destroy,
}

impl fmt::Display for CounterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterOp::CreateEventSet => f.write_str("create the event set"),
            CounterOp::AddEvent(event) => write!(f, "add the {} event", event.name()),
            CounterOp::Start => f.write_str("start counting"),
            CounterOp::Stop => f.write_str("stop counting"),
            CounterOp::Read => f.write_str("read the counters"),
            CounterOp::Reset => f.write_str("reset the counters"),
            CounterOp::RemoveEvents => f.write_str("remove the events"),
            CounterOp::Destroy => f.write_str("destroy the event set"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Configured,
    Running,
    Stopped,
    Reset,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Configured => "configured",
            SessionState::Running => "running",
            SessionState::Stopped => "stopped",
            SessionState::Reset => "reset",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterValues {
    pub l1_misses: u64,
    pub l2_misses: u64,
}

/// Owns a configured counter backend and enforces its lifecycle.
///
/// `start` is only valid from the configured or reset states and `stop`
/// only while running. Tearing down consumes the session.
#[derive(Debug)]
pub struct CounterSession<B: CounterBackend> {
    backend: B,
    state: SessionState,
    values: CounterValues,
}

impl CounterSession<SystemBackend> {
    /// Creates the platform event set and configures it.
    pub fn open() -> Result<Self, CounterError> {
        let backend = SystemBackend::create().map_err(|source| CounterError::Subsystem {
            op: CounterOp::CreateEventSet,
            source,
        })?;
        Self::configure(backend)
    }
}

impl<B: CounterBackend> CounterSession<B> {
    /// Adds every event of [`MEASURED_EVENTS`] to the backend's event set.
    pub fn configure(mut backend: B) -> Result<Self, CounterError> {
        for event in MEASURED_EVENTS {
            backend
                .add_event(event)
                .map_err(|source| CounterError::Subsystem {
                    op: CounterOp::AddEvent(event),
                    source,
                })?;
        }
        log::debug!("counter session configured");

        Ok(Self {
            backend,
            state: SessionState::Configured,
            values: CounterValues::default(),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Values captured by the last `stop`, zero after a reset.
    pub fn values(&self) -> CounterValues {
        self.values
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn start(&mut self) -> Result<(), CounterError> {
        self.require(CounterOp::Start, &[SessionState::Configured, SessionState::Reset])?;
        self.backend.enable().map_err(|source| CounterError::Subsystem {
            op: CounterOp::Start,
            source,
        })?;
        self.transition(SessionState::Running);
        Ok(())
    }

    pub fn stop(&mut self) -> Result<CounterValues, CounterError> {
        self.require(CounterOp::Stop, &[SessionState::Running])?;
        self.backend.disable().map_err(|source| CounterError::Subsystem {
            op: CounterOp::Stop,
            source,
        })?;

        let counts = self.backend.read().map_err(|source| CounterError::Subsystem {
            op: CounterOp::Read,
            source,
        })?;
        let [l1_misses, l2_misses] = <[u64; 2]>::try_from(counts).map_err(|counts| {
            CounterError::EventCount {
                expected: MEASURED_EVENTS.len(),
                actual: counts.len(),
            }
        })?;

        self.values = CounterValues { l1_misses, l2_misses };
        self.transition(SessionState::Stopped);
        Ok(self.values)
    }

    /// Zeroes the accumulated counts so the session can run again.
    pub fn reset(&mut self) -> Result<(), CounterError> {
        self.require(
            CounterOp::Reset,
            &[SessionState::Configured, SessionState::Stopped, SessionState::Reset],
        )?;
        self.backend.reset().map_err(|source| CounterError::Subsystem {
            op: CounterOp::Reset,
            source,
        })?;
        self.values = CounterValues::default();
        self.transition(SessionState::Reset);
        Ok(())
    }

    /// Removes the events and destroys the event set.
    pub fn teardown(mut self) -> Result<(), CounterError> {
        self.require(
            CounterOp::RemoveEvents,
            &[SessionState::Configured, SessionState::Stopped, SessionState::Reset],
        )?;
        self.backend
            .remove_events()
            .map_err(|source| CounterError::Subsystem {
                op: CounterOp::RemoveEvents,
                source,
            })?;
        self.backend.destroy().map_err(|source| CounterError::Subsystem {
            op: CounterOp::Destroy,
            source,
        })?;
        log::debug!("counter session destroyed");
        Ok(())
    }

    fn require(&self, op: CounterOp, allowed: &[SessionState]) -> Result<(), CounterError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(CounterError::InvalidTransition {
                op,
                state: self.state,
            })
        }
    }

    fn transition(&mut self, next: SessionState) {
        log::debug!("counter session {} -> {}", self.state, next);
        self.state = next;
    }
}
