//! Shiftboard - shift scheduling core
//!
//! Role-scoped permissions over users and shifts, plus temporal conflict
//! validation for shift assignments. It exposes all modules for testing
//! purposes.

pub mod ability;
pub mod entities;
pub mod errors;
pub mod overlap;
pub mod settings;
pub mod shifts;
pub mod storage;
