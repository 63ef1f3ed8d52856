//! # Notification envelope.
//!
//! A [`Message`] carries a string key and an arbitrary payload. The registry
//! forwards it untouched to every service; only services interpret it.
//!
//! Messages are immutable and cheap to clone (both fields are `Arc`-backed).
//!
//! ## Example
//! ```rust
//! use svcwire::Message;
//!
//! let msg = Message::new("NullMessage", "change");
//! assert_eq!(msg.key(), "NullMessage");
//! assert_eq!(msg.data::<&str>(), Some(&"change"));
//! assert!(msg.data::<u32>().is_none());
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// Opaque notification envelope `{ key, data }`.
#[derive(Clone)]
pub struct Message {
    key: Arc<str>,
    data: Arc<dyn Any + Send + Sync>,
    data_type: &'static str,
}

impl Message {
    /// Creates a message with the given key and payload.
    pub fn new<T>(key: impl Into<Arc<str>>, data: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            key: key.into(),
            data: Arc::new(data),
            data_type: type_name::<T>(),
        }
    }

    /// Creates a message without payload (the payload is `()`).
    pub fn key_only(key: impl Into<Arc<str>>) -> Self {
        Self::new(key, ())
    }

    /// Message key.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Shared handle to the key (for events and errors).
    #[inline]
    pub(crate) fn key_arc(&self) -> Arc<str> {
        Arc::clone(&self.key)
    }

    /// Borrows the payload if it is a `T`.
    pub fn data<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }

    /// True if the payload is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.data.is::<T>()
    }

    /// Type name of the payload, as given at construction.
    pub fn data_type(&self) -> &'static str {
        self.data_type
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("key", &self.key)
            .field("data", &format_args!("<{}>", self.data_type))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_payload() {
        let msg = Message::new("config", vec![1u8, 2, 3]);
        let copy = msg.clone();
        assert!(std::ptr::eq(
            msg.data::<Vec<u8>>().unwrap(),
            copy.data::<Vec<u8>>().unwrap()
        ));
    }

    #[test]
    fn key_only_carries_unit() {
        let msg = Message::key_only("flush");
        assert!(msg.is::<()>());
        assert_eq!(format!("{msg:?}"), r#"Message { key: "flush", data: <()> }"#);
    }
}
