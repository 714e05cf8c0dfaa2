//! Core domain types
//!
//! Shared between the HTTP client and the panel. Jobs are the only stateful
//! entities; the artist records and navigation model are plain data.

pub mod artist;
pub mod job;
pub mod manifest;
pub mod nav;
pub mod view;
