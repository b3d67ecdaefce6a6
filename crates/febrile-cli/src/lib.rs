//! CLI library components for febrile-dx.

pub mod logging;
pub mod pipeline;
pub mod types;
