//! Repvox - voice commands for your workout tracker
//!
//! This crate records a voice command from the microphone, uploads it to a
//! workout-tracking backend, and presents the parsed command together with
//! the backend's synthesized spoken reply.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core business logic, value objects, entities, and errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, HTTP, rodio, config files)
//! - **CLI**: Command-line interface and argument parsing

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
