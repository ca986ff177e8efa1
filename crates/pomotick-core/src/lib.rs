//! # pomotick Core Library
//!
//! This library provides the countdown engine behind the pomotick work/break
//! timer. The CLI binary is a thin terminal host over the same types.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A tick-driven state machine. The caller delivers one
//!   `tick()` per second while it runs; every command returns the events it
//!   produced.
//! - **Session**: An async host that owns one engine, its tick subscription,
//!   a display observer and an expiry alert.
//! - **Storage**: TOML-based preferences. Timer state is never persisted.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerSession`]: tokio host for a single engine
//! - [`Config`]: Application configuration management
//! - [`TimerObserver`] / [`ExpiryAlert`]: Host-provided display and alert

pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use storage::Config;
pub use timer::{
    AlertTone, Category, DisplayFrame, ExpiryAlert, Mode, Preset, SessionCommand,
    SessionSettings, TimerEngine, TimerObserver, TimerSession, TimerState,
};
