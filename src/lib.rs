//! BrandReach Gating - Session and Onboarding Routing Service
//!
//! This crate implements the post-authentication gating subsystem of the
//! BrandReach creator/brand marketplace: given a session, its email
//! verification status, and a two-stage onboarding record, it decides the
//! single next destination for the visitor.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
