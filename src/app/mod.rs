//! Application layer: ports at the edges, orchestration in the
//! middle. Nothing in this tree touches I/O directly.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
