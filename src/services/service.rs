//! # Service capability set.
//!
//! A [`Service`] is any component the registry can drive through the
//! lifecycle phases. Every method has a no-op default that succeeds, so a
//! service only overrides the phases it cares about; a capability left at its
//! default trivially succeeds its phase.
//!
//! The common handle type is [`ServiceRef`], an `Arc<dyn Service>` shared
//! between the registry and whoever else needs to talk to the service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::services::Message;

/// Shared handle to a service.
pub type ServiceRef = Arc<dyn Service>;

/// # Lifecycle capabilities of a registered component.
///
/// Methods are awaited one service at a time; a service never runs
/// concurrently with another service of the same phase. There is no deadline:
/// a method that never returns blocks its phase.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use svcwire::{Message, Service, ServiceError};
///
/// struct Cache;
///
/// #[async_trait]
/// impl Service for Cache {
///     fn name(&self) -> &str { "cache" }
///
///     async fn start(&self) -> Result<(), ServiceError> {
///         // warm up...
///         Ok(())
///     }
///
///     async fn notify(&self, msg: &Message) -> Result<(), ServiceError> {
///         if msg.key() == "purge" {
///             // drop entries...
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// Human-readable name, used to annotate errors and events.
    ///
    /// Not an identity: two services may share a name.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Prepares the service. Called in registration order.
    async fn init(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    /// Starts the service. Called in registration order.
    async fn start(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    /// Stops the service. Called in reverse registration order.
    async fn stop(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    /// Receives a broadcast message. Called in registration order.
    async fn notify(&self, _msg: &Message) -> Result<(), ServiceError> {
        Ok(())
    }
}
