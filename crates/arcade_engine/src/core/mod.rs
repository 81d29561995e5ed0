//! # Core Engine Module
//!
//! Shared configuration for every engine subsystem.

pub mod config;

pub use config::{
    ApplicationConfig,
    AudioConfig,
    Config,
    ConfigError,
    EngineConfig,
    SplashConfig,
    WindowConfig,
};
