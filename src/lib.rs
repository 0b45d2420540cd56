//! Tally - aggregation report service
//!
//! A small REST service exposing fixed, parameterized MongoDB aggregation
//! reports over three operational datasets: employee salaries, bank
//! customers/accounts/transactions, and bike-share trips.
//!
//! Request flow: query parameters are normalized into typed criteria
//! ([`params`]), criteria parameterize a deterministic pipeline of
//! aggregation stages ([`reports`]), and rows come back shaped into the
//! documented output fields wrapped in a response envelope ([`http`]).

pub mod config;
pub mod error;
pub mod http;
pub mod params;
pub mod reports;
pub mod storage;
pub mod utils;
