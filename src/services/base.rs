//! # No-op service.
//!
//! [`BaseService`] implements every capability as an immediate success. It can
//! be registered as a placeholder, or embedded in a concrete service that
//! forwards the phases it does not customize:
//!
//! ```rust
//! use async_trait::async_trait;
//! use svcwire::{BaseService, Message, Service, ServiceError};
//!
//! struct Audit {
//!     base: BaseService,
//! }
//!
//! #[async_trait]
//! impl Service for Audit {
//!     async fn notify(&self, msg: &Message) -> Result<(), ServiceError> {
//!         println!("audit: {}", msg.key());
//!         self.base.notify(msg).await
//!     }
//! }
//! ```

use crate::services::Service;

/// Service whose phases all succeed without doing anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaseService;

impl BaseService {
    /// Construct a new [`BaseService`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Service for BaseService {
    fn name(&self) -> &str {
        "base"
    }
}
