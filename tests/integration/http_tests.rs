//! Integration tests for the HTTP responder over the in-memory transport.

use weatherstation::calibration::{CalibratedReading, CalibrationConfig, CalibrationStore};
use weatherstation::error::ParseError;
use weatherstation::net::RequestHandler;
use weatherstation::net::http::HttpConfigServer;
use weatherstation::net::routes::{DASHBOARD_HTML, LIMITS_OK, OFFSETS_OK};

use crate::mock_net::MemListener;

#[derive(Default)]
struct Station {
    store: CalibrationStore,
    reading: CalibratedReading,
    rejected: u32,
}

impl RequestHandler for Station {
    fn apply_thresholds(&mut self, query: &str) -> Result<(), ParseError> {
        let r = self.store.apply_thresholds(query);
        self.rejected += u32::from(r.is_err());
        r
    }

    fn apply_offsets(&mut self, query: &str) -> Result<(), ParseError> {
        let r = self.store.apply_offsets(query);
        self.rejected += u32::from(r.is_err());
        r
    }

    fn telemetry(&self) -> CalibratedReading {
        self.reading
    }
}

fn server() -> (HttpConfigServer<MemListener>, MemListener, Station) {
    let listener = MemListener::new();
    (HttpConfigServer::new(listener.clone()), listener, Station::default())
}

#[test]
fn dados_returns_formatted_json_and_closes() {
    let (mut srv, net, mut st) = server();
    st.reading = CalibratedReading {
        temperature_c: 18.5,
        pressure_kpa: 92.456,
        altitude_m: 771.6,
        humidity_pct: 48.96,
    };
    let c = net.request("GET /dados");
    srv.poll(&mut st);

    assert!(c.response().starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(c.header("Content-Type").as_deref(), Some("application/json"));
    assert_eq!(c.header("Connection").as_deref(), Some("close"));
    assert_eq!(c.body(), r#"{"tem":18.5,"pre":92.46,"alt":772,"umi":49.0}"#);
    assert!(c.released());
    assert_eq!(srv.open_connections(), 0);
}

#[test]
fn content_length_matches_body() {
    let (mut srv, net, mut st) = server();
    let clients = [
        net.request("GET /"),
        net.request("GET /dados"),
        net.request("GET /set_limits?temp_min=1&temp_max=2&umi_min=3&umi_max=4"),
    ];
    srv.poll(&mut st);
    for c in &clients {
        let len: usize = c.header("Content-Length").unwrap().parse().unwrap();
        assert_eq!(len, c.body().len());
    }
}

#[test]
fn set_limits_applies_and_confirms() {
    let (mut srv, net, mut st) = server();
    let c = net.request("GET /set_limits?temp_min=5&temp_max=30&umi_min=20&umi_max=80");
    srv.poll(&mut st);

    assert_eq!(c.body(), LIMITS_OK);
    assert_eq!(c.header("Content-Type").as_deref(), Some("text/plain"));
    let cfg = st.store.snapshot();
    assert_eq!((cfg.temp_min, cfg.temp_max, cfg.humid_min, cfg.humid_max), (5.0, 30.0, 20.0, 80.0));
}

#[test]
fn malformed_set_limits_still_confirms_but_changes_nothing() {
    let (mut srv, net, mut st) = server();
    let c = net.request("GET /set_limits?temp_min=abc&temp_max=35&umi_min=30&umi_max=70");
    srv.poll(&mut st);

    assert_eq!(c.body(), LIMITS_OK);
    assert_eq!(st.store.snapshot(), CalibrationConfig::default());
    assert_eq!(st.rejected, 1);
}

#[test]
fn set_offsets_applies_and_confirms() {
    let (mut srv, net, mut st) = server();
    let c = net.request("GET /set_offsets?temp_off=-1.5&pres_off=0.2&alt_off=10&umi_off=3");
    srv.poll(&mut st);

    assert_eq!(c.body(), OFFSETS_OK);
    let cfg = st.store.snapshot();
    assert_eq!(cfg.temp_offset, -1.5);
    assert_eq!(cfg.pressure_offset, 0.2);
    assert_eq!(cfg.altitude_offset, 10.0);
    assert_eq!(cfg.humidity_offset, 3.0);
}

#[test]
fn unknown_path_gets_dashboard() {
    let (mut srv, net, mut st) = server();
    let c = net.request("GET /nope");
    srv.poll(&mut st);
    assert_eq!(c.header("Content-Type").as_deref(), Some("text/html"));
    assert_eq!(c.body(), DASHBOARD_HTML);
}

#[test]
fn small_send_window_still_delivers_everything() {
    let (mut srv, net, mut st) = server();
    let c = net.connect();
    c.set_window(7);
    c.send(b"GET / HTTP/1.1\r\n\r\n");
    srv.poll(&mut st);
    assert_eq!(c.body(), DASHBOARD_HTML);
    assert!(c.released());
}

#[test]
fn stalled_peer_keeps_connection_until_drained() {
    let (mut srv, net, mut st) = server();
    let c = net.connect();
    c.set_stalled(true);
    c.send(b"GET /dados HTTP/1.1\r\n\r\n");

    for _ in 0..5 {
        srv.poll(&mut st);
    }
    assert_eq!(srv.open_connections(), 1);
    assert!(!c.released());
    assert!(c.received().is_empty());

    c.set_stalled(false);
    srv.poll(&mut st);
    assert!(c.body().starts_with("{\"tem\":"));
    assert!(c.released());
}

#[test]
fn idle_connection_is_never_timed_out() {
    let (mut srv, net, mut st) = server();
    let c = net.connect();
    for _ in 0..50 {
        srv.poll(&mut st);
    }
    assert_eq!(srv.open_connections(), 1);
    assert!(!c.released());
}

#[test]
fn peer_close_before_request_tears_down_silently() {
    let (mut srv, net, mut st) = server();
    let c = net.connect();
    srv.poll(&mut st);
    c.close();
    srv.poll(&mut st);
    assert!(c.released());
    assert!(c.received().is_empty());
    assert_eq!(srv.open_connections(), 0);
}

#[test]
fn only_first_packet_is_routed() {
    let (mut srv, net, mut st) = server();
    let c = net.connect();
    c.set_stalled(true);
    c.send(b"GET /dados HTTP/1.1\r\n\r\n");
    srv.poll(&mut st);
    c.send(b"GET /set_limits?temp_min=1&temp_max=2&umi_min=3&umi_max=4 HTTP/1.1\r\n\r\n");
    c.set_stalled(false);
    srv.poll(&mut st);

    assert!(c.body().starts_with("{\"tem\":"));
    assert_eq!(st.store.snapshot(), CalibrationConfig::default());
}

#[test]
fn several_connections_in_one_poll() {
    let (mut srv, net, mut st) = server();
    let a = net.request("GET /dados");
    let b = net.request("GET /set_offsets?temp_off=1&pres_off=0&alt_off=0&umi_off=0");
    srv.poll(&mut st);
    assert!(a.released() && b.released());
    assert_eq!(b.body(), OFFSETS_OK);
    assert_eq!(st.store.snapshot().temp_offset, 1.0);
}
