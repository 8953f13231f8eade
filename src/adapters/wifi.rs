//! WiFi station-mode bring-up.
//!
//! Runs once at startup, before the control loop.  The result decides
//! whether the HTTP server is started; monitoring runs either way.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via `esp_idf_svc::wifi`.
//! - **all other targets**: a simulated link on the loopback address.
//!
//! Credentials are baked in at build time from `WIFI_SSID` / `WIFI_PASS`.

use std::net::Ipv4Addr;

use log::{info, warn};

use crate::error::NetError;

// ───────────────────────────────────────────────────────────────
// Credentials
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), NetError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(NetError::InvalidCredentials);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), NetError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(NetError::InvalidCredentials);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
}

impl WifiCredentials {
    /// SSID: 1-32 printable ASCII bytes.  Password: empty (open) or 8-64 bytes.
    pub fn new(ssid: &str, password: &str) -> Result<Self, NetError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        let mut creds = Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
        };
        creds.ssid.push_str(ssid).map_err(|()| NetError::InvalidCredentials)?;
        creds
            .password
            .push_str(password)
            .map_err(|()| NetError::InvalidCredentials)?;
        Ok(creds)
    }

    /// Credentials compiled into the image.
    pub fn from_build_env() -> Result<Self, NetError> {
        match option_env!("WIFI_SSID") {
            Some(ssid) => Self::new(ssid, option_env!("WIFI_PASS").unwrap_or("")),
            None => {
                warn!("WiFi: WIFI_SSID was not set at build time");
                Err(NetError::InvalidCredentials)
            }
        }
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

// ───────────────────────────────────────────────────────────────
// Link
// ───────────────────────────────────────────────────────────────

/// Keeps the station associated for as long as it lives.
pub struct WifiLink {
    ip: Ipv4Addr,
    #[cfg(target_os = "espidf")]
    _wifi: esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>,
}

impl WifiLink {
    pub fn ip(&self) -> Ipv4Addr {
        self.ip
    }
}

#[cfg(target_os = "espidf")]
pub fn connect(
    modem: esp_idf_hal::modem::Modem,
    sys_loop: esp_idf_svc::eventloop::EspSystemEventLoop,
    nvs: Option<esp_idf_svc::nvs::EspDefaultNvsPartition>,
    creds: &WifiCredentials,
) -> Result<WifiLink, NetError> {
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};

    let driver = EspWifi::new(modem, sys_loop.clone(), nvs).map_err(|e| {
        warn!("WiFi: driver init failed: {}", e);
        NetError::WifiInitFailed
    })?;
    let mut wifi = BlockingWifi::wrap(driver, sys_loop).map_err(|e| {
        warn!("WiFi: event loop wrap failed: {}", e);
        NetError::WifiInitFailed
    })?;

    let auth_method = if creds.is_open() {
        AuthMethod::None
    } else {
        AuthMethod::WPA2Personal
    };
    let config = Configuration::Client(ClientConfiguration {
        ssid: creds
            .ssid
            .as_str()
            .try_into()
            .map_err(|_| NetError::InvalidCredentials)?,
        password: creds
            .password
            .as_str()
            .try_into()
            .map_err(|_| NetError::InvalidCredentials)?,
        auth_method,
        ..Default::default()
    });
    wifi.set_configuration(&config).map_err(|e| {
        warn!("WiFi: set_configuration failed: {}", e);
        NetError::WifiInitFailed
    })?;
    wifi.start().map_err(|e| {
        warn!("WiFi: start failed: {}", e);
        NetError::WifiInitFailed
    })?;

    info!("WiFi: connecting to '{}'", creds.ssid());
    wifi.connect().map_err(|e| {
        warn!("WiFi: association failed: {}", e);
        NetError::WifiConnectFailed
    })?;
    wifi.wait_netif_up().map_err(|e| {
        warn!("WiFi: netif did not come up: {}", e);
        NetError::WifiConnectFailed
    })?;

    let ip = wifi
        .wifi()
        .sta_netif()
        .get_ip_info()
        .map_err(|e| {
            warn!("WiFi: no IP info: {}", e);
            NetError::WifiConnectFailed
        })?
        .ip;
    info!("WiFi: connected, IP {}", ip);
    Ok(WifiLink { ip, _wifi: wifi })
}

/// Simulated bring-up: always succeeds on loopback.
#[cfg(not(target_os = "espidf"))]
pub fn connect(creds: &WifiCredentials) -> Result<WifiLink, NetError> {
    info!("WiFi(sim): connected to '{}'", creds.ssid());
    Ok(WifiLink {
        ip: Ipv4Addr::LOCALHOST,
    })
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
