//! # Service abstractions.
//!
//! This module provides the service-related types:
//! - [`Service`] - async trait with the four lifecycle capabilities
//! - [`BaseService`] - no-op service, usable as placeholder or delegate
//! - [`ServiceFn`] - closure-backed service built from optional hooks
//! - [`ServiceRef`] - shared reference to a service (`Arc<dyn Service>`)
//! - [`Message`] - opaque notification envelope
//! - [`Phase`] - lifecycle phase tag used by errors and events

mod base;
mod message;
mod phase;
mod service;
mod service_fn;

pub use base::BaseService;
pub use message::Message;
pub use phase::Phase;
pub use service::{Service, ServiceRef};
pub use service_fn::ServiceFn;
