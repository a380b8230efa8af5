//! Adapters: implementations of the ports against real and test backends.

pub mod auth;
pub mod http;
pub mod navigation;
pub mod postgres;
pub mod profile;
