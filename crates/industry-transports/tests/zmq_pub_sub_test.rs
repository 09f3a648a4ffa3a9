// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the ZMQ PUB/SUB pair

use industry_transports::prelude::*;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

/// Frames arrive as `<topic><payload>` with nothing in between
#[test]
fn test_pub_sub_single_frame() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let barrier = Arc::new(Barrier::new(2));
    let barrier_server = Arc::clone(&barrier);
    let barrier_client = Arc::clone(&barrier);

    // Publisher thread
    let publisher_handle = thread::spawn(move || {
        let context = Arc::new(zmq::Context::new());
        let config = ServerConfig::new("tcp://127.0.0.1:31001");
        let mut publisher = ZmqPub::new(context, config).unwrap();
        publisher.start().unwrap();

        // Signal ready
        barrier_server.wait();

        // Wait for subscriber to connect and subscribe
        thread::sleep(Duration::from_millis(200));

        for i in 0..5 {
            let payload = format!("{{\"val\":{}}}", i);
            publisher
                .publish(b"int.svc/default.price", payload.as_bytes())
                .unwrap();
            thread::sleep(Duration::from_millis(10));
        }

        thread::sleep(Duration::from_millis(100));
        publisher.stop().unwrap();
    });

    // Subscriber thread
    let subscriber_handle = thread::spawn(move || {
        let context = Arc::new(zmq::Context::new());
        let config = ClientConfig::new("tcp://127.0.0.1:31001");
        let mut subscriber = ZmqSub::new(context, config).unwrap();
        subscriber.start().unwrap();
        subscriber.subscribe(b"int.svc/default.price").unwrap();

        // Signal ready
        barrier_client.wait();

        let mut received = Vec::new();
        for _ in 0..5 {
            if let Ok(frame) = subscriber.receive_timeout(2000) {
                received.push(String::from_utf8(frame).unwrap());
            }
        }

        assert!(received.contains(&"int.svc/default.price{\"val\":0}".to_string()));
        assert!(received.contains(&"int.svc/default.price{\"val\":4}".to_string()));

        subscriber.stop().unwrap();
    });

    publisher_handle.join().unwrap();
    subscriber_handle.join().unwrap();
}

/// Subscriptions are prefix filters: other topics never reach the subscriber
#[test]
fn test_pub_sub_filters_by_prefix() {
    let barrier = Arc::new(Barrier::new(2));
    let barrier_server = Arc::clone(&barrier);
    let barrier_client = Arc::clone(&barrier);

    let publisher_handle = thread::spawn(move || {
        let mut publisher = ZmqPub::with_address("tcp://127.0.0.1:31002").unwrap();
        publisher.start().unwrap();

        barrier_server.wait();
        thread::sleep(Duration::from_millis(200));

        for _ in 0..3 {
            publisher
                .publish(b"bool.svc/default.other", b"{\"val\":false}")
                .unwrap();
            publisher
                .publish(b"bool.svc/default.feed", b"{\"val\":true}")
                .unwrap();
            thread::sleep(Duration::from_millis(10));
        }

        thread::sleep(Duration::from_millis(100));
        publisher.stop().unwrap();
    });

    let subscriber_handle = thread::spawn(move || {
        let mut subscriber = ZmqSub::with_address("tcp://127.0.0.1:31002").unwrap();
        subscriber.start().unwrap();
        subscriber.subscribe(b"bool.svc/default.feed").unwrap();

        barrier_client.wait();

        let mut received = Vec::new();
        while let Ok(frame) = subscriber.receive_timeout(500) {
            received.push(frame);
        }

        assert!(!received.is_empty());
        for frame in &received {
            assert!(frame.starts_with(b"bool.svc/default.feed"));
        }

        subscriber.stop().unwrap();
    });

    publisher_handle.join().unwrap();
    subscriber_handle.join().unwrap();
}

/// Binding the same endpoint twice fails with a bind error
#[test]
fn test_second_bind_fails() {
    let mut first = ZmqPub::with_address("tcp://127.0.0.1:31003").unwrap();
    first.start().unwrap();

    let mut second = ZmqPub::with_address("tcp://127.0.0.1:31003").unwrap();
    assert!(matches!(second.start(), Err(TransportError::BindFailed(_))));

    first.stop().unwrap();
}
