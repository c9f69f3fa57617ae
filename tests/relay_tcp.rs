//! End-to-end relay tests against a fake caster on loopback.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::time::{Duration, Instant};

use ntrip_relay::prelude::*;

const GGA: &str = "$GPGGA,123519,4807.038,N,01131.000,E,4,08,0.9,545.4,M,46.9,M,,*47";

/// Accepts one client and reads its stream request up to the blank line.
fn accept_request(listener: &TcpListener) -> (TcpStream, Vec<String>) {
    let (stream, _) = listener.accept().unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut lines = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        if line == "\r\n" || line.is_empty() {
            break;
        }
        lines.push(line);
    }
    (stream, lines)
}

fn relay_for(port: u16, status: &Arc<SharedStatus>) -> RelayLoop<TcpConnector, Vec<u8>> {
    let caster = CasterConfig::new("127.0.0.1", port, "RTCM3", "u", "p");
    let session = NtripSession::new(caster, TcpConnector::new());
    RelayLoop::new(session, Vec::new(), status.clone())
}

/// Steps until `done` holds, failing after a few seconds.
fn step_until<C: Connector, W: Write>(
    relay: &mut RelayLoop<C, W>,
    mut done: impl FnMut(&RelayLoop<C, W>) -> bool,
) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done(relay) {
        assert!(Instant::now() < deadline, "relay did not reach the expected state");
        relay.step();
    }
}

#[test]
fn test_request_and_correction_relay() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let status = Arc::new(SharedStatus::new());
    let mut relay = relay_for(port, &status);

    assert!(matches!(relay.step(), StepOutcome::Reconnected));
    let (mut caster, request) = accept_request(&listener);
    assert_eq!(
        request,
        vec![
            "GET /RTCM3 HTTP/1.0\r\n",
            "User-Agent: NTRIP SimpleClient/1.0\r\n",
            "Authorization: Basic dTpw\r\n",
            "Connection: close\r\n",
        ]
    );

    let rtcm: Vec<u8> = (0..200u8).collect();
    caster.write_all(&rtcm).unwrap();

    step_until(&mut relay, |r| r.sink().len() >= rtcm.len());
    assert_eq!(relay.sink(), &rtcm);
    assert_eq!(status.byte_counter(), 200);
    assert!(status.is_connected());
}

#[test]
fn test_position_reported_after_interval() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let status = Arc::new(SharedStatus::new());
    let mut relay = relay_for(port, &status);

    let start = Instant::now();
    relay.step_at(start);
    let (caster, _) = accept_request(&listener);
    status.set_last_position(GGA.to_string());

    assert!(matches!(
        relay.step_at(start + Duration::from_secs(5)),
        StepOutcome::Relayed { reported: true, .. }
    ));
    relay.step_at(start + Duration::from_secs(6));

    let mut reader = BufReader::new(caster);
    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    assert_eq!(line, format!("{GGA}\r\n"));
}

#[test]
fn test_caster_hangup_triggers_reconnect() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let status = Arc::new(SharedStatus::new());
    let mut relay = relay_for(port, &status);

    relay.step();
    let (caster, _) = accept_request(&listener);
    drop(caster);

    step_until(&mut relay, |_| !status.is_connected());
    assert!(matches!(relay.step(), StepOutcome::Reconnected));
    let (_caster, request) = accept_request(&listener);
    assert_eq!(request[0], "GET /RTCM3 HTTP/1.0\r\n");
    assert_eq!(status.retry_count(), 0);
}

#[test]
fn test_stalled_caster_forced_down_then_reconnected() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let status = Arc::new(SharedStatus::new());
    let mut relay = relay_for(port, &status);
    let mut monitor = HealthMonitor::new(status.clone(), Signal::new());

    relay.step();
    let (mut caster, _) = accept_request(&listener);
    caster.write_all(&[0xd3, 0x00, 0x00]).unwrap();
    step_until(&mut relay, |r| r.sink().len() == 3);
    assert!(monitor.sample().is_none());

    // No more data: the next window forces the link down, exactly once.
    assert!(matches!(
        monitor.sample(),
        Some(RelayError::LivenessTimeout(_))
    ));
    assert!(monitor.sample().is_none());
    assert!(!status.is_connected());

    let mut rest = Vec::new();
    caster.read_to_end(&mut rest).unwrap();
    assert!(rest.is_empty());

    assert!(matches!(relay.step(), StepOutcome::Reconnected));
    let (_caster, request) = accept_request(&listener);
    assert_eq!(request[0], "GET /RTCM3 HTTP/1.0\r\n");
    assert_eq!(status.byte_counter(), 3);
}

#[test]
fn test_unreachable_caster_counts_retries() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let status = Arc::new(SharedStatus::new());
    let mut relay = relay_for(port, &status);
    for expected in 1..=3 {
        assert!(relay.step().needs_backoff());
        assert_eq!(status.retry_count(), expected);
    }
}
