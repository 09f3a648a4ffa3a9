// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! ZMQ subscribing side

pub mod sub;

pub use sub::ZmqSub;
