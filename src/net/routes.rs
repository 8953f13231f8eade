//! Request classification and response construction.
//!
//! Matching is substring search over the raw request bytes, in a fixed
//! priority order.  There is no 404: anything unrecognised gets the
//! dashboard.
//!
//! | Priority | Marker              | Response                               |
//! |----------|---------------------|----------------------------------------|
//! | 1        | `GET /set_limits?`  | `text/plain` "Limites atualizados…"    |
//! | 2        | `GET /dados`        | `application/json` telemetry           |
//! | 3        | `GET /set_offsets?` | `text/plain` "Offsets atualizados…"    |
//! | 4        | (anything else)     | `text/html` dashboard                  |

use core::fmt::Write;

use heapless::String;
use log::{debug, info, warn};

use super::RequestHandler;
use crate::calibration::CalibratedReading;

pub const DASHBOARD_HTML: &str = include_str!("dashboard.html");
pub const LIMITS_OK: &str = "Limites atualizados com sucesso";
pub const OFFSETS_OK: &str = "Offsets atualizados com sucesso";

const SET_LIMITS: &[u8] = b"GET /set_limits?";
const DADOS: &[u8] = b"GET /dados";
const SET_OFFSETS: &[u8] = b"GET /set_offsets?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    SetLimits(&'a [u8]),
    Telemetry,
    SetOffsets(&'a [u8]),
    Dashboard,
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Bytes after `marker` up to the first whitespace.
fn query_after<'a>(request: &'a [u8], marker: &[u8]) -> Option<&'a [u8]> {
    let start = find(request, marker)? + marker.len();
    let rest = &request[start..];
    let end = rest
        .iter()
        .position(u8::is_ascii_whitespace)
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

pub fn classify(request: &[u8]) -> Route<'_> {
    if let Some(q) = query_after(request, SET_LIMITS) {
        Route::SetLimits(q)
    } else if find(request, DADOS).is_some() {
        Route::Telemetry
    } else if let Some(q) = query_after(request, SET_OFFSETS) {
        Route::SetOffsets(q)
    } else {
        Route::Dashboard
    }
}

/// JSON number with `decimals` places, or `null` for NaN and infinities.
struct Number(f32, usize);

impl core::fmt::Display for Number {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.0.is_finite() {
            write!(f, "{:.*}", self.1, self.0)
        } else {
            f.write_str("null")
        }
    }
}

/// `{"tem":F1,"pre":F2,"alt":F0,"umi":F1}`
pub fn telemetry_json(r: &CalibratedReading) -> String<256> {
    let mut s = String::new();
    // The widest finite f32 prints in 43 bytes, so four fields always fit.
    write!(
        s,
        "{{\"tem\":{},\"pre\":{},\"alt\":{},\"umi\":{}}}",
        Number(r.temperature_c, 1),
        Number(r.pressure_kpa, 2),
        Number(r.altitude_m, 0),
        Number(r.humidity_pct, 1)
    )
    .ok();
    s
}

/// Complete `200 OK` response, or `None` if the buffer cannot be allocated.
pub fn build_response(content_type: &str, body: &[u8]) -> Option<Vec<u8>> {
    let mut head: String<128> = String::new();
    write!(
        head,
        "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        content_type,
        body.len()
    )
    .ok()?;

    let mut out = Vec::new();
    out.try_reserve_exact(head.len() + body.len()).ok()?;
    out.extend_from_slice(head.as_bytes());
    out.extend_from_slice(body);
    Some(out)
}

/// Route one request.  Calibration routes confirm unconditionally; only the
/// store mutation depends on the query parsing.
pub fn respond(request: &[u8], handler: &mut impl RequestHandler) -> Option<Vec<u8>> {
    match classify(request) {
        Route::SetLimits(q) => {
            let query = core::str::from_utf8(q).unwrap_or("");
            match handler.apply_thresholds(query) {
                Ok(()) => info!("http: thresholds updated"),
                Err(e) => warn!("http: set_limits ignored ({})", e),
            }
            build_response("text/plain", LIMITS_OK.as_bytes())
        }
        Route::Telemetry => {
            let json = telemetry_json(&handler.telemetry());
            debug!("http: dados {}", json);
            build_response("application/json", json.as_bytes())
        }
        Route::SetOffsets(q) => {
            let query = core::str::from_utf8(q).unwrap_or("");
            match handler.apply_offsets(query) {
                Ok(()) => info!("http: offsets updated"),
                Err(e) => warn!("http: set_offsets ignored ({})", e),
            }
            build_response("text/plain", OFFSETS_OK.as_bytes())
        }
        Route::Dashboard => build_response("text/html", DASHBOARD_HTML.as_bytes()),
    }
}
