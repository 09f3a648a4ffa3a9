// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Value envelope codec
//!
//! Every value travels as `{"val":<json>}`. Only four element types are
//! supported; [`Payload`] is sealed so any other type is a compile error, and
//! [`ValueKind::from_str`] rejects unknown type names at run time.

use crate::error::CodecError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// Closed set of element types that can be sent and received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Double,
    String,
}

impl ValueKind {
    pub const ALL: [ValueKind; 4] = [
        ValueKind::Bool,
        ValueKind::Int,
        ValueKind::Double,
        ValueKind::String,
    ];

    /// Name used as the first component of every topic
    pub fn type_name(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Double => "double",
            ValueKind::String => "string",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for ValueKind {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueKind::ALL
            .into_iter()
            .find(|kind| kind.type_name() == s)
            .ok_or_else(|| CodecError::UnsupportedType(s.to_string()))
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for bool {}
    impl Sealed for i32 {}
    impl Sealed for f64 {}
    impl Sealed for String {}
}

/// A value type that can travel inside an envelope
///
/// `Default` supplies the zero value a sender or receiver starts from.
pub trait Payload:
    sealed::Sealed
    + Serialize
    + DeserializeOwned
    + Default
    + Clone
    + fmt::Debug
    + PartialEq
    + Send
    + Sync
    + 'static
{
    const KIND: ValueKind;

    /// Reject values JSON cannot represent faithfully
    fn check_encodable(&self) -> Result<(), CodecError> {
        Ok(())
    }
}

impl Payload for bool {
    const KIND: ValueKind = ValueKind::Bool;
}

impl Payload for i32 {
    const KIND: ValueKind = ValueKind::Int;
}

impl Payload for f64 {
    const KIND: ValueKind = ValueKind::Double;

    fn check_encodable(&self) -> Result<(), CodecError> {
        if self.is_finite() {
            Ok(())
        } else {
            // serde_json would silently write `null`
            Err(CodecError::Encode(format!("non-finite double {}", self)))
        }
    }
}

impl Payload for String {
    const KIND: ValueKind = ValueKind::String;
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    val: &'a T,
}

#[derive(Deserialize)]
struct Envelope<T> {
    val: T,
}

/// Encoder/decoder for one payload type
pub struct ValueCodec<T: Payload> {
    _marker: PhantomData<T>,
}

impl<T: Payload> ValueCodec<T> {
    pub fn kind() -> ValueKind {
        T::KIND
    }

    /// `value` -> `{"val":<value>}`
    pub fn encode(value: &T) -> Result<String, CodecError> {
        value.check_encodable()?;
        serde_json::to_string(&EnvelopeRef { val: value })
            .map_err(|e| CodecError::Encode(e.to_string()))
    }

    /// `{"val":<value>}` -> `value`
    pub fn decode(bytes: &[u8]) -> Result<T, CodecError> {
        let envelope: Envelope<T> = serde_json::from_slice(bytes)?;
        Ok(envelope.val)
    }
}
