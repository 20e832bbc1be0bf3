//! Game registry and spectator fan-out for Boardwatch.
//!
//! This crate owns the only shared mutable state in the system: the map
//! from game id to move log and live spectators. Producers append and
//! revert moves; spectators attach and receive the full history followed
//! by every later move.
//!
//! # Modules
//!
//! - [`registry`] -- [`GameRegistry`], the per-game locking boundary
//! - [`game`] -- [`Game`] and its [`GameLog`]
//! - [`dispatch`] -- bounded per-spectator queues and [`Subscription`]
//! - [`analysis`] -- [`AnalysisCache`] of opaque per-game blobs
//! - [`config`] -- YAML configuration with environment overrides
//! - [`error`] -- [`RegistryError`]

pub mod analysis;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod game;
pub mod registry;

pub use analysis::AnalysisCache;
pub use config::{BoardwatchConfig, ConfigError, DispatchConfig, ServerSettings};
pub use dispatch::{DeliveryFailed, PublishReport, SubscriberSet, Subscription};
pub use error::RegistryError;
pub use game::{Game, GameLog};
pub use registry::{GameHandle, GameRegistry};
