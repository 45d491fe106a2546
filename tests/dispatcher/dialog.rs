//! `dialog:select:<kind>:<title>` request/reply.

use std::time::Duration;

use rstest::rstest;
use servicebus::{
    BusConfig, ClientId, ClientInfo, LastRegistered, Payload, Publisher, Subscriber,
};

use crate::support::{eventually, Call, Running};

#[rstest]
#[case::file("file", Call::OpenFile("Open".into()))]
#[case::filesave("filesave", Call::SaveFile("Open".into()))]
#[case::directory("directory", Call::OpenDirectory("Open".into()))]
fn reply_is_published_on_the_response_topic(#[case] kind: &str, #[case] call: Call) {
    let running = Running::start(1);
    let reply = running.bus.subscribe("R").unwrap();

    let topic = format!("dialog:select:{kind}:Open");
    running.bus.publish(&topic, "R".into()).unwrap();

    let answer = reply.recv_timeout(Duration::from_secs(1)).unwrap().unwrap();
    assert_eq!(answer.topic().as_str(), "R");
    assert_eq!(answer.data().as_text(), Some("client0/Open"));
    assert!(reply.try_recv().unwrap().is_none());
    assert_eq!(running.recorder(0).calls(), vec![call]);

    let stats = running.stop();
    assert_eq!(stats.dialogs, 1);
}

#[test]
fn only_the_first_registered_client_is_asked() {
    let running = Running::start(3);
    let reply = running.bus.subscribe("R").unwrap();

    running.bus.publish("dialog:select:file:Pick", "R".into()).unwrap();

    let answer = reply.recv_timeout(Duration::from_secs(1)).unwrap().unwrap();
    assert_eq!(answer.data().as_text(), Some("client0/Pick"));
    assert_eq!(running.recorder(0).calls(), vec![Call::OpenFile("Pick".into())]);
    assert!(running.recorder(1).calls().is_empty());
    assert!(running.recorder(2).calls().is_empty());
    running.stop();
}

#[test]
fn selector_strategy_can_be_replaced() {
    let running = Running::start_with(2, &BusConfig::default(), |d| {
        d.with_selector(LastRegistered)
    });
    let reply = running.bus.subscribe("R").unwrap();

    running.bus.publish("dialog:select:file:Pick", "R".into()).unwrap();

    let answer = reply.recv_timeout(Duration::from_secs(1)).unwrap().unwrap();
    assert_eq!(answer.data().as_text(), Some("client1/Pick"));
    assert!(running.recorder(0).calls().is_empty());
    running.stop();
}

#[test]
fn closure_selector_sees_clients_oldest_first() {
    let running = Running::start_with(3, &BusConfig::default(), |d| {
        d.with_selector(|clients: &[ClientInfo]| -> Option<ClientId> {
            assert!(clients.windows(2).all(|w| w[0].sequence < w[1].sequence));
            clients.get(1).map(|c| c.id.clone())
        })
    });
    let reply = running.bus.subscribe("R").unwrap();

    running.bus.publish("dialog:select:directory:Where", "R".into()).unwrap();

    let answer = reply.recv_timeout(Duration::from_secs(1)).unwrap().unwrap();
    assert_eq!(answer.data().as_text(), Some("client1/Where"));
    running.stop();
}

#[test]
fn no_clients_means_an_empty_reply() {
    let running = Running::start(0);
    let reply = running.bus.subscribe("R").unwrap();

    running.bus.publish("dialog:select:file:Open", "R".into()).unwrap();

    let answer = reply.recv_timeout(Duration::from_secs(1)).unwrap().unwrap();
    assert_eq!(answer.data().as_text(), Some(""));
    running.stop();
}

#[test]
fn malformed_requests_are_dropped() {
    let running = Running::start(1);
    let reply = running.bus.subscribe("R").unwrap();

    // Too few segments, unknown kind, missing response topic.
    running.bus.publish("dialog:select:file", "R".into()).unwrap();
    running.bus.publish("dialog:select:colour:Pick", "R".into()).unwrap();
    running.bus.publish("dialog:select:file:Open", Payload::Empty).unwrap();
    running.bus.publish("dialog:select:file:Last", "R".into()).unwrap();

    let answer = reply.recv_timeout(Duration::from_secs(1)).unwrap().unwrap();
    assert_eq!(answer.data().as_text(), Some("client0/Last"));
    assert!(reply.try_recv().unwrap().is_none());

    let recorder = running.recorder(0);
    assert!(eventually(|| recorder.calls().len() == 1));
    assert_eq!(recorder.calls(), vec![Call::OpenFile("Last".into())]);

    let stats = running.stop();
    assert_eq!(stats.rejected, 3);
    assert_eq!(stats.dialogs, 1);
}
