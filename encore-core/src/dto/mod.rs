//! Data Transfer Objects
//!
//! Payloads received from the dashboard API.

pub mod event;
