//! Subgate - Subscription Access Backend
//!
//! This crate authenticates users, manages the lifecycle of their bearer
//! credentials, and reconciles local subscription state with Stripe.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
