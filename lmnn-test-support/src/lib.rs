//! Shared test utilities used across lmnn crates.

pub mod proptest_profile;
