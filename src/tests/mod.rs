//! Crate-level tests that exercise several modules together.
//!
//! Backend traffic is served by wiremock; downloads land in temp dirs.

mod common;
mod desk;
