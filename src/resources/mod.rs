//! Long-lived data shared by the demo driver and games built on the crate.
//!
//! Overview
//! - `animationstore` – named animation timing definitions reused across entities
//! - `gameconfig` – INI settings for the headless demo
pub mod animationstore;
pub mod gameconfig;
