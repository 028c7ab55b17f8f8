//! Domain rules for the internship subject platform.
//!
//! Everything in here is free of I/O: the server crate owns persistence,
//! sessions and outbound calls, and asks this crate whether an operation is
//! allowed and what it should write.

pub mod domain;
