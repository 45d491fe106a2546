//! `window:<command>` broadcasts.

use rstest::rstest;
use servicebus::{Payload, Publisher};

use crate::support::{eventually, Call, Running};

#[test]
fn settitle_reaches_every_client_once() {
    let running = Running::start(3);
    running.bus.publish("window:settitle", "Hello".into()).unwrap();

    for i in 0..3 {
        let recorder = running.recorder(i);
        assert!(eventually(|| !recorder.calls().is_empty()));
        assert_eq!(recorder.calls(), vec![Call::SetTitle("Hello".into())]);
    }

    let stats = running.stop();
    assert_eq!(stats.window_commands, 1);
    assert_eq!(stats.rejected, 0);
}

#[test]
fn settitle_without_text_calls_nobody() {
    let running = Running::start(2);
    running.bus.publish("window:settitle", Payload::Empty).unwrap();
    // Same subscription, so this one is handled strictly after.
    running.bus.publish("window:fullscreen", Payload::Empty).unwrap();

    for i in 0..2 {
        let recorder = running.recorder(i);
        assert!(eventually(|| !recorder.calls().is_empty()));
        assert_eq!(recorder.calls(), vec![Call::Fullscreen]);
    }

    let stats = running.stop();
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.window_commands, 1);
}

#[rstest]
#[case::fullscreen("window:fullscreen", Payload::Empty, Call::Fullscreen)]
#[case::unfullscreen("window:unfullscreen", Payload::Empty, Call::Unfullscreen)]
#[case::setcolour("window:setcolour", "#1e1e1e".into(), Call::SetColour("#1e1e1e".into()))]
fn commands_map_to_capabilities(#[case] topic: &str, #[case] data: Payload, #[case] call: Call) {
    let running = Running::start(1);
    running.bus.publish(topic, data).unwrap();

    let recorder = running.recorder(0);
    assert!(eventually(|| !recorder.calls().is_empty()));
    assert_eq!(recorder.calls(), vec![call]);
    running.stop();
}

#[test]
fn unknown_command_is_dropped_and_loop_continues() {
    let running = Running::start(1);
    running.bus.publish("window:minimise", Payload::Empty).unwrap();
    running.bus.publish("window", Payload::Empty).unwrap();
    running.bus.publish("window:settitle", "still here".into()).unwrap();

    let recorder = running.recorder(0);
    assert!(eventually(|| !recorder.calls().is_empty()));
    assert_eq!(recorder.calls(), vec![Call::SetTitle("still here".into())]);

    let stats = running.stop();
    assert_eq!(stats.rejected, 2);
}
