//! Async DLIS.

pub mod io;
