pub mod auth;
pub mod config;
pub mod deep_dive;
pub mod lesson;
pub mod memorize;
pub mod notes;
pub mod quiz;
pub mod status;
