//! Command workflows shared by the binary and integration tests.

pub mod orchestration;
