//! `call:result:<client>` routing and the unroutable-result policy.

use std::process::Command;
use std::sync::mpsc;
use std::time::Duration;

use servicebus::{BusConfig, CallResultPolicy, Payload, Publisher};

use crate::support::{eventually, Call, Running};

#[test]
fn result_goes_only_to_its_client() {
    let running = Running::start(2);
    let topic = running.clients[1].0.result_topic();
    running.bus.publish(&topic, r#"{"result":42}"#.into()).unwrap();

    let target = running.recorder(1);
    assert!(eventually(|| !target.calls().is_empty()));
    assert_eq!(target.calls(), vec![Call::CallResult(r#"{"result":42}"#.into())]);
    assert!(running.recorder(0).calls().is_empty());

    let stats = running.stop();
    assert_eq!(stats.call_results, 1);
}

#[test]
fn non_text_result_is_dropped() {
    let running = Running::start(1);
    let topic = running.clients[0].0.result_topic();
    running.bus.publish(&topic, Payload::Empty).unwrap();
    running.bus.publish(&topic, "ok".into()).unwrap();

    let recorder = running.recorder(0);
    assert!(eventually(|| !recorder.calls().is_empty()));
    assert_eq!(recorder.calls(), vec![Call::CallResult("ok".into())]);

    let stats = running.stop();
    assert_eq!(stats.rejected, 1);
}

#[test]
fn unroutable_result_invokes_fatal_hook() {
    let (tx, rx) = mpsc::channel();
    let running = Running::start_with(1, &BusConfig::default(), move |d| {
        d.with_fatal_hook(move |reason| {
            let _ = tx.send(reason.to_owned());
        })
    });

    running.bus.publish("call:result:nobody", "1".into()).unwrap();
    running.bus.publish("call:result", "2".into()).unwrap();

    let first = rx.recv_timeout(Duration::from_secs(1)).unwrap();
    assert!(first.contains("call:result:nobody"), "{first}");
    rx.recv_timeout(Duration::from_secs(1)).unwrap();
    assert!(running.recorder(0).calls().is_empty());

    let stats = running.stop();
    assert_eq!(stats.rejected, 2);
}

#[test]
fn log_and_drop_keeps_going() {
    let config = BusConfig::default().with_call_result_policy(CallResultPolicy::LogAndDrop);
    let running = Running::start_with(1, &config, |d| {
        d.with_fatal_hook(|reason| panic!("fatal hook called: {reason}"))
    });

    running.bus.publish("call:result:nobody", "1".into()).unwrap();
    let topic = running.clients[0].0.result_topic();
    running.bus.publish(&topic, "2".into()).unwrap();

    let recorder = running.recorder(0);
    assert!(eventually(|| !recorder.calls().is_empty()));
    assert_eq!(recorder.calls(), vec![Call::CallResult("2".into())]);

    let stats = running.stop();
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.call_results, 1);
}

const CHILD_ENV: &str = "SERVICEBUS_FATAL_CHILD";

/// The default configuration terminates the process. Runs itself again as
/// a child so the exit does not take down the test harness.
#[test]
fn unroutable_result_terminates_the_process() {
    if std::env::var_os(CHILD_ENV).is_some() {
        let running = Running::start(1);
        running.bus.publish("call:result:nobody", "1".into()).unwrap();
        std::thread::sleep(Duration::from_secs(5));
        panic!("process survived an unroutable call result");
    }

    let status = Command::new(std::env::current_exe().unwrap())
        .args([
            "call_result::unroutable_result_terminates_the_process",
            "--exact",
            "--nocapture",
        ])
        .env(CHILD_ENV, "1")
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(1));
}
