//! Aggregation layer over the Helldivers 2 community war-status API
//!
//! One polling cycle fans out to seven endpoints through a shared rate
//! limiter, normalizes whatever came back, substitutes static data for
//! failed categories, and returns an [`types::AggregateSnapshot`].

pub mod services;
pub mod types;
