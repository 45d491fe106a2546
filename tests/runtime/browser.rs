//! `runtime:browser:openurl` handling.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use servicebus::{
    BusConfig, Browser, Payload, Publisher, RuntimeError, RuntimeSubsystem, ServiceBus,
};

struct Recording(Sender<String>);

impl Browser for Recording {
    fn open(&self, url: &str) -> Result<(), RuntimeError> {
        self.0.send(url.to_owned()).ok();
        Ok(())
    }
}

struct Broken;

impl Browser for Broken {
    fn open(&self, url: &str) -> Result<(), RuntimeError> {
        Err(RuntimeError::Browser {
            url: url.to_owned(),
            reason: "no display".into(),
        })
    }
}

fn start(bus: &ServiceBus) -> (servicebus::RuntimeThread, Receiver<String>) {
    let (tx, rx) = unbounded();
    let subsystem =
        RuntimeSubsystem::new(bus, &BusConfig::default(), Arc::new(Recording(tx))).unwrap();
    (subsystem.start().unwrap(), rx)
}

#[test]
fn openurl_launches_the_browser() {
    let bus = ServiceBus::new();
    let (running, opened) = start(&bus);

    bus.publish("runtime:browser:openurl", "https://example.com".into())
        .unwrap();
    assert_eq!(
        opened.recv_timeout(Duration::from_secs(1)).unwrap(),
        "https://example.com"
    );

    bus.publish("quit", Payload::Empty).unwrap();
    let stats = running.join();
    assert_eq!(stats.urls_requested, 1);
    assert_eq!(stats.rejected, 0);
}

#[test]
fn bad_requests_are_skipped() {
    let bus = ServiceBus::new();
    let (running, opened) = start(&bus);

    bus.publish("runtime:browser", "https://a".into()).unwrap();
    bus.publish("runtime:browser:openurl:now", "https://b".into()).unwrap();
    bus.publish("runtime:clipboard:copy", "x".into()).unwrap();
    bus.publish("runtime:browser:close", Payload::Empty).unwrap();
    bus.publish("runtime:browser:openurl", Payload::Empty).unwrap();
    bus.publish("runtime:browser:openurl", "https://c".into()).unwrap();

    assert_eq!(
        opened.recv_timeout(Duration::from_secs(1)).unwrap(),
        "https://c"
    );

    bus.publish("quit", Payload::Empty).unwrap();
    let stats = running.join();
    assert_eq!(stats.rejected, 5);
    assert_eq!(stats.urls_requested, 1);
    assert!(opened.try_recv().is_err());
}

#[test]
fn browser_failure_does_not_stop_the_loop() {
    let bus = ServiceBus::new();
    let subsystem = RuntimeSubsystem::new(&bus, &BusConfig::default(), Arc::new(Broken)).unwrap();
    let running = subsystem.start().unwrap();

    bus.publish("runtime:browser:openurl", "https://a".into()).unwrap();
    std::thread::sleep(Duration::from_millis(50));
    assert!(!running.is_finished());

    bus.publish("quit", Payload::Empty).unwrap();
    assert_eq!(running.join().urls_requested, 1);
}
