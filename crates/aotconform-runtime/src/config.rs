//! Runtime configuration.
//!
//! Everything is set programmatically (the harness CLI maps its flags onto
//! [`RuntimeConfig`]); nothing is read from the environment.

/// Default number of simultaneously live local handles.
pub const DEFAULT_LOCAL_CAPACITY: usize = 512;

/// Garbage an invocation may leave behind before the runtime collects on
/// its own when the outermost frame exits.
pub const DEFAULT_COLLECT_THRESHOLD: usize = 4096;

/// What happens when a routine needs a local handle and the table is full.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverflowPolicy {
    /// Raise a handle-overflow fault in the routine. Leaks become visible.
    #[default]
    Fault,
    /// Double the capacity and continue. Leaks only show in occupancy.
    Grow,
}

impl OverflowPolicy {
    /// Parse from string (case-insensitive). `None` for unknown names.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fault" => Some(Self::Fault),
            "grow" | "expand" | "unbounded" => Some(Self::Grow),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fault => "fault",
            Self::Grow => "grow",
        }
    }
}

/// Configuration for a [`crate::Runtime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub local_capacity: usize,
    pub overflow: OverflowPolicy,
    /// Objects allocated since the last collection that trigger a
    /// collection at the end of an invocation.
    pub collect_threshold: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            local_capacity: DEFAULT_LOCAL_CAPACITY,
            overflow: OverflowPolicy::default(),
            collect_threshold: DEFAULT_COLLECT_THRESHOLD,
        }
    }
}

impl RuntimeConfig {
    /// Set the local-handle capacity (at least one slot).
    #[must_use]
    pub fn with_local_capacity(mut self, capacity: usize) -> Self {
        self.local_capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    #[must_use]
    pub fn with_collect_threshold(mut self, threshold: usize) -> Self {
        self.collect_threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_overflow_policies() {
        assert_eq!(OverflowPolicy::from_str_loose("fault"), Some(OverflowPolicy::Fault));
        assert_eq!(OverflowPolicy::from_str_loose("GROW"), Some(OverflowPolicy::Grow));
        assert_eq!(OverflowPolicy::from_str_loose("expand"), Some(OverflowPolicy::Grow));
        assert_eq!(OverflowPolicy::from_str_loose("bogus"), None);
        assert_eq!(OverflowPolicy::from_str_loose(""), None);
    }

    #[test]
    fn defaults() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.local_capacity, DEFAULT_LOCAL_CAPACITY);
        assert_eq!(cfg.overflow, OverflowPolicy::Fault);
        assert_eq!(cfg.with_local_capacity(0).local_capacity, 1);
        assert_eq!(cfg.collect_threshold, DEFAULT_COLLECT_THRESHOLD);
    }
}
