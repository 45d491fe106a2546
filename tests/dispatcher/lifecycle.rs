//! Start, quit and shutdown.

use std::sync::Arc;

use servicebus::{BusConfig, DispatchError, Dispatcher, Frontend, Payload, Publisher, ServiceBus};

use crate::support::{eventually, Call, Running};

/// A frontend that cannot take a title.
struct Untitled;

impl Frontend for Untitled {
    fn quit(&self) {}
    fn call_result(&self, _result: &str) {}
    fn notify_event(&self, _payload: &str) {}
    fn window_set_title(&self, title: &str) {
        panic!("title rejected: {title}");
    }
    fn window_fullscreen(&self) {}
    fn window_unfullscreen(&self) {}
    fn window_set_colour(&self, _colour: &str) {}
    fn open_file_dialog(&self, _title: &str) -> String {
        String::new()
    }
    fn save_file_dialog(&self, _title: &str) -> String {
        String::new()
    }
    fn open_directory_dialog(&self, _title: &str) -> String {
        String::new()
    }
}

#[test]
fn quit_reaches_every_client_and_ends_the_loop() {
    let running = Running::start(3);
    let recorders: Vec<_> = running.clients.iter().map(|(_, r)| r.clone()).collect();

    let stats = running.stop();
    assert_eq!(stats.quits, 1);
    for recorder in recorders {
        assert_eq!(recorder.calls(), vec![Call::Quit]);
    }
}

#[test]
fn dispatcher_subscribes_to_five_domains() {
    let bus = ServiceBus::new();
    let dispatcher = Dispatcher::new(&bus, &BusConfig::default()).unwrap();
    assert_eq!(bus.subscription_count().unwrap(), 5);

    let running = dispatcher.start().unwrap();
    assert!(!running.is_finished());
    bus.publish("quit", Payload::Empty).unwrap();
    running.join();

    // The loop's subscriptions are released when it exits.
    assert_eq!(bus.subscription_count().unwrap(), 0);
}

#[test]
fn frontend_panic_is_surfaced_by_try_join() {
    let bus = ServiceBus::new();
    let dispatcher = Dispatcher::new(&bus, &BusConfig::default()).unwrap();
    dispatcher.register_client(Arc::new(Untitled)).unwrap();
    let running = dispatcher.start().unwrap();

    bus.publish("window:settitle", "Hello".into()).unwrap();
    assert!(eventually(|| running.is_finished()));

    match running.try_join() {
        Err(DispatchError::Panicked(message)) => {
            assert_eq!(message, "title rejected: Hello");
        }
        other => panic!("expected a panicked loop, got {other:?}"),
    }
}
