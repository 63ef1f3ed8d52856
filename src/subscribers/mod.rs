//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and the built-in [`LogWriter`].
//!
//! ```text
//! Registry / Runtime ── publish(Event) ──► Bus ──► listener ──► SubscriberSet
//!                                                                 ├──► LogWriter (tracing)
//!                                                                 └──► custom subscribers
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
