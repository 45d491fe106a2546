//! One-shot request/reply over caller-chosen response topics.

use std::thread;
use std::time::Duration;

use servicebus::{BusError, Publisher, ServiceBus, Subscriber};

fn echo_responder(bus: &ServiceBus, prefix: &str) -> thread::JoinHandle<()> {
    let requests = bus.subscribe(prefix).unwrap();
    let bus = bus.clone();
    thread::spawn(move || {
        let request = requests.recv().unwrap();
        let reply_to = request.data().as_text().unwrap().to_owned();
        bus.publish(&reply_to, request.topic().last().into()).unwrap();
    })
}

#[test]
fn reply_arrives_and_subscription_is_released() {
    let bus = ServiceBus::new();
    let responder = echo_responder(&bus, "echo");

    let reply = bus
        .request("echo:hello", "echo-reply:1".into(), "echo-reply:1", None)
        .unwrap();
    assert_eq!(reply.data().as_text(), Some("hello"));
    responder.join().unwrap();

    // The responder's subscription went with its thread; the reply
    // subscription went with the request.
    assert_eq!(bus.subscription_count().unwrap(), 0);
}

#[test]
fn replies_do_not_cross_between_requesters() {
    let bus = ServiceBus::new();
    let first = echo_responder(&bus, "echo:a");
    let second = echo_responder(&bus, "echo:b");

    let a = {
        let bus = bus.clone();
        thread::spawn(move || bus.request("echo:a", "reply:a".into(), "reply:a", None))
    };
    let b = bus.request("echo:b", "reply:b".into(), "reply:b", None).unwrap();

    assert_eq!(b.data().as_text(), Some("b"));
    assert_eq!(a.join().unwrap().unwrap().data().as_text(), Some("a"));
    first.join().unwrap();
    second.join().unwrap();
}

#[test]
fn timeout_is_reported_with_the_response_topic() {
    let bus = ServiceBus::new();
    let err = bus
        .request(
            "nobody:home",
            "reply:none".into(),
            "reply:none",
            Some(Duration::from_millis(10)),
        )
        .unwrap_err();

    match err {
        BusError::Timeout { topic, waited } => {
            assert_eq!(topic, "reply:none");
            assert_eq!(waited, Duration::from_millis(10));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}
