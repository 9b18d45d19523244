#![cfg(test)]

//! Unit-test logging. Same filter rules as integration tests
//! (`TEST_LOG`, then `RUST_LOG`, then `warn`).

pub fn init() {
    backend_test_support::logging::init();
}
