//! Effect layer model: kinds, per-kind options and the ordered stack.

/// Effect kinds and loosely typed option values.
pub mod kind;
/// Tagged per-kind options.
pub mod options;
/// The ordered layer stack.
pub mod stack;
