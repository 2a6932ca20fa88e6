//! Rural `HealthConnect` symptom checker
//!
//! A scripted, multilingual intake conversation. The dialogue itself is a
//! pure state machine ([`state_machine`]); [`runtime`] executes its effects
//! with injected timers, speech and observers.

pub mod catalog;
pub mod config;
pub mod runtime;
pub mod session;
pub mod state_machine;
pub mod transcript;
