//! Cross-cutting utilities: percent-encoding, filesystem primitives, and
//! platform-specific git discovery.

pub mod encode;
pub mod fs;
pub mod platform;
