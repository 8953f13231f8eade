//! Fuzz target: `routes::respond`
//!
//! Arbitrary first packets must always produce a well-formed `200 OK` with
//! a Content-Length that matches the body.
//!
//! cargo fuzz run fuzz_http_request

#![no_main]

use libfuzzer_sys::fuzz_target;
use weatherstation::calibration::{CalibratedReading, CalibrationStore};
use weatherstation::error::ParseError;
use weatherstation::net::RequestHandler;
use weatherstation::net::routes::respond;

#[derive(Default)]
struct Station {
    store: CalibrationStore,
}

impl RequestHandler for Station {
    fn apply_thresholds(&mut self, query: &str) -> Result<(), ParseError> {
        self.store.apply_thresholds(query)
    }

    fn apply_offsets(&mut self, query: &str) -> Result<(), ParseError> {
        self.store.apply_offsets(query)
    }

    fn telemetry(&self) -> CalibratedReading {
        CalibratedReading::default()
    }
}

fuzz_target!(|data: &[u8]| {
    let mut station = Station::default();
    let Some(resp) = respond(data, &mut station) else {
        return;
    };

    assert!(resp.starts_with(b"HTTP/1.1 200 OK\r\n"));
    let split = resp
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("header terminator");
    let head = std::str::from_utf8(&resp[..split]).expect("ASCII head");
    let len: usize = head
        .lines()
        .find_map(|l| l.strip_prefix("Content-Length: "))
        .and_then(|v| v.parse().ok())
        .expect("Content-Length header");
    assert_eq!(len, resp.len() - split - 4);
});
