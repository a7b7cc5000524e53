//! Shared helpers for engine test binaries.

pub mod test_logging;
