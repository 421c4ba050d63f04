//! Messages exchanged between components
//!
//! A [`Message`] is a typed envelope around an opaque byte payload. Game
//! objects keep one subscriber set per [`MessageType`]; only components that
//! subscribed to a message's type ever see it, whatever handlers they
//! implement.
//!
//! Payloads are plain bytes so senders and receivers only need to agree on a
//! layout. Plain-old-data values can be packed and unpacked with
//! [`Message::with_payload`] and [`Message::payload`].

use bytemuck::{AnyBitPattern, NoUninit};

/// Message type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageType {
    /// Two colliders touched
    Collision,
    /// Something entered or left a trigger volume
    Trigger,
    /// Damage dealt to an object
    Damage,
    /// A marker fired during animation playback
    AnimationEvent,
    /// Application-defined message
    Custom(u32),
}

/// Typed message with an opaque payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    message_type: MessageType,
    payload: Vec<u8>,
}

impl Message {
    /// Create a message without payload
    pub fn new(message_type: MessageType) -> Self {
        Self {
            message_type,
            payload: Vec::new(),
        }
    }

    /// Create a message carrying raw bytes
    pub fn with_bytes(message_type: MessageType, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            message_type,
            payload: payload.into(),
        }
    }

    /// Create a message carrying a plain-old-data value
    pub fn with_payload<T: NoUninit>(message_type: MessageType, value: &T) -> Self {
        Self::with_bytes(message_type, bytemuck::bytes_of(value))
    }

    /// Type used for subscriber lookup
    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    /// Raw payload bytes
    pub fn bytes(&self) -> &[u8] {
        &self.payload
    }

    /// Decode the payload as `T`
    ///
    /// Returns `None` when the payload size does not match `T`.
    pub fn payload<T: AnyBitPattern>(&self) -> Option<T> {
        bytemuck::try_pod_read_unaligned(&self.payload).ok()
    }
}
