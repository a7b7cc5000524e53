//! Test logging for unit tests.
//!
//! Runs once per test binary through `ctor` (see `lib.rs`) and shares the
//! subscriber setup used by integration tests.

pub fn init() {
    engine_test_support::test_logging::init();
}
