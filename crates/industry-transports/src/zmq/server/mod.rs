// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! ZMQ publishing side

pub mod pub_socket;

pub use pub_socket::ZmqPub;
