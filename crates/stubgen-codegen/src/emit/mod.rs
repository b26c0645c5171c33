//! Lua stub emission.
//!
//! Emitters render one fragment per entity and splice the fragments into
//! the surface skeleton. Fragments appear in the order the descriptors are
//! given; names are not deduplicated.

pub mod context;
mod realtime;
mod rest;

pub use realtime::RealtimeEmitter;
pub use rest::RestEmitter;
