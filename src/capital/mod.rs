//! Capital module - Client implementation for the Capital.com REST API

pub mod auth;
pub mod client;
pub mod messages;
pub mod rest;

pub use client::CapitalClient;
pub use rest::CapitalRestClient;
