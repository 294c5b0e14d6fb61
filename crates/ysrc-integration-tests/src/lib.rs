//! Integration test crate for the yield source.
//!
//! This crate has no library code. It only contains integration tests
//! that drive the yield source, simulated vault and token ledger together
//! through multi-user flows.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p ysrc-integration-tests
//! ```
