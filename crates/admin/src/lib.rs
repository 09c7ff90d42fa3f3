//! Role administration: the off-chain users table, the PharmaNFT contract
//! client, and the service that keeps the two in step.

pub mod chain;
pub mod service;
pub mod store;
