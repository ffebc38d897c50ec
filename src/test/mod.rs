//! Test helpers shared by the unit tests and the integration tests under `tests/`.

#[path = "../../tests/common/builder.rs"]
pub mod builder;
