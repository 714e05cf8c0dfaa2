//! Encore Core
//!
//! Core types for the Encore artist-metrics admin panel.
//!
//! This crate contains:
//! - Domain types: metrics jobs, manifests, view keys, artist records and navigation
//! - DTOs: payloads exchanged with the dashboard API

pub mod domain;
pub mod dto;
