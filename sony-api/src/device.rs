//! The Sony device handle.
//!
//! `SonyDevice` owns everything needed to talk to one device: the connection
//! parameters, the pairing credentials, and the data learned from the device
//! at initialization time (metadata, control URLs, command catalog).
//!
//! The handle is cheap to share behind an `Arc`; the mutable interior is
//! guarded so that a polling loop and command senders can use it
//! concurrently.

use std::collections::HashMap;

use parking_lot::RwLock;
use soap_client::{HttpMethod, SoapClient, SoapError};
use xmltree::Element;

use crate::commands::{self, default_code};
use crate::description::{CommandList, DeviceDescription};
use crate::error::{ApiError, Result};
use crate::registration::{basic_auth_header, RegistrationResult};
use crate::wol;

/// Default broadcast address for wake-on-LAN
pub const DEFAULT_BROADCAST_ADDRESS: &str = "255.255.255.255";
/// Default port of the app/registration service
pub const DEFAULT_APP_PORT: u16 = 50202;
/// Default port of the DMR (media renderer) service
pub const DEFAULT_DMR_PORT: u16 = 52323;
/// Default port of the IRCC (remote control) service
pub const DEFAULT_IRCC_PORT: u16 = 50001;

const AV_TRANSPORT_URN: &str = "urn:schemas-upnp-org:service:AVTransport:1";
const RENDERING_CONTROL_URN: &str = "urn:schemas-upnp-org:service:RenderingControl:1";
const IRCC_URN: &str = "urn:schemas-sony-com:serviceId:IRCC";

/// Data learned from the device during `init_device`
#[derive(Debug, Default)]
struct DeviceInterior {
    friendly_name: Option<String>,
    manufacturer: Option<String>,
    model_name: Option<String>,
    av_transport_url: Option<String>,
    rendering_control_url: Option<String>,
    commands: HashMap<String, String>,
}

/// Handle for one Sony networked TV/AV device
///
/// Created once per configured device and shared for the lifetime of the
/// connection. All operations are synchronous blocking HTTP calls.
#[derive(Debug)]
pub struct SonyDevice {
    client: SoapClient,
    host: String,
    nickname: String,
    client_id: String,
    broadcast_address: String,
    app_port: u16,
    dmr_port: u16,
    ircc_port: u16,
    pin: RwLock<String>,
    mac: RwLock<Option<String>>,
    interior: RwLock<DeviceInterior>,
}

impl SonyDevice {
    /// Create a handle with default ports and broadcast address
    ///
    /// `nickname` is the name this client registers itself under on the
    /// device (shown in the device's paired-device list).
    pub fn new(host: impl Into<String>, nickname: impl Into<String>) -> Self {
        let nickname = nickname.into();
        Self {
            client: SoapClient::new(),
            host: host.into(),
            client_id: format!("sony-sdk:{}", nickname),
            nickname,
            broadcast_address: DEFAULT_BROADCAST_ADDRESS.to_string(),
            app_port: DEFAULT_APP_PORT,
            dmr_port: DEFAULT_DMR_PORT,
            ircc_port: DEFAULT_IRCC_PORT,
            pin: RwLock::new(String::new()),
            mac: RwLock::new(None),
            interior: RwLock::new(DeviceInterior::default()),
        }
    }

    /// Override the service ports
    pub fn with_ports(mut self, app_port: u16, dmr_port: u16, ircc_port: u16) -> Self {
        self.app_port = app_port;
        self.dmr_port = dmr_port;
        self.ircc_port = ircc_port;
        self
    }

    /// Override the wake-on-LAN broadcast address
    pub fn with_broadcast_address(mut self, address: impl Into<String>) -> Self {
        self.broadcast_address = address.into();
        self
    }

    // ======================== URLs ========================

    /// URL of the DMR device description, also used as the reachability probe
    pub fn dmr_url(&self) -> String {
        format!("http://{}:{}/dmr.xml", self.host, self.dmr_port)
    }

    fn ircc_url(&self) -> String {
        format!("http://{}:{}/Ircc", self.host, self.ircc_port)
    }

    fn command_list_url(&self) -> String {
        format!(
            "http://{}:{}/appinfo/getRemoteCommandList",
            self.host, self.app_port
        )
    }

    fn register_url(&self) -> String {
        format!(
            "http://{}:{}/register?name={}&registrationType=initial&deviceId={}",
            self.host, self.app_port, self.nickname, self.client_id
        )
    }

    fn service_url(&self, control_path: &str) -> String {
        if control_path.starts_with("http") {
            control_path.to_string()
        } else if control_path.starts_with('/') {
            format!("http://{}:{}{}", self.host, self.dmr_port, control_path)
        } else {
            format!("http://{}:{}/{}", self.host, self.dmr_port, control_path)
        }
    }

    // ======================== Initialization ========================

    /// Lightweight reachability probe
    ///
    /// A plain GET against the DMR description URL. A connection error means
    /// the device is off or still booting.
    pub fn probe(&self) -> Result<()> {
        self.client.send(HttpMethod::Get, &self.dmr_url())?;
        Ok(())
    }

    /// Read the device description and command catalog
    ///
    /// Must complete once before the volume/playback queries work. Safe to
    /// call again after the device rebooted.
    pub fn init_device(&self) -> Result<()> {
        let xml = self.client.send(HttpMethod::Get, &self.dmr_url())?;
        let description = DeviceDescription::from_xml(&xml)?;

        {
            let mut interior = self.interior.write();
            interior.av_transport_url = description
                .control_url("AVTransport")
                .map(|p| self.service_url(p));
            interior.rendering_control_url = description
                .control_url("RenderingControl")
                .map(|p| self.service_url(p));
            interior.friendly_name = Some(description.friendly_name);
            interior.manufacturer = Some(description.manufacturer);
            interior.model_name = Some(description.model_name);
        }

        match self.client.send(HttpMethod::Get, &self.command_list_url()) {
            Ok(body) => match CommandList::from_xml(&body) {
                Ok(entries) => {
                    let mut interior = self.interior.write();
                    interior.commands = entries
                        .into_iter()
                        .map(|entry| (entry.name, entry.value))
                        .collect();
                    tracing::debug!(
                        count = self.interior.read().commands.len(),
                        "Loaded remote command list from device"
                    );
                }
                Err(e) => {
                    tracing::warn!("Ignoring malformed remote command list: {}", e);
                }
            },
            Err(e) => {
                tracing::debug!("Remote command list unavailable, using built-in table: {}", e);
            }
        }

        Ok(())
    }

    // ======================== Registration ========================

    /// Attempt to register this client with the device
    ///
    /// Devices that enforce pairing answer HTTP 401 and display a PIN; that
    /// is reported as `RegistrationResult::PinNeeded`, not an error.
    pub fn register(&self) -> Result<RegistrationResult> {
        match self.client.get_with_auth(&self.register_url(), None) {
            Ok(_) => Ok(RegistrationResult::Success),
            Err(SoapError::Http(401)) => Ok(RegistrationResult::PinNeeded),
            Err(e) => Err(e.into()),
        }
    }

    /// Complete registration with the PIN displayed on the device
    ///
    /// Returns `Ok(false)` when the device rejected the PIN.
    pub fn send_authentication(&self, pin: &str) -> Result<bool> {
        let auth = basic_auth_header(pin);
        match self
            .client
            .get_with_auth(&self.register_url(), Some(&auth))
        {
            Ok(_) => {
                *self.pin.write() = pin.to_string();
                Ok(true)
            }
            Err(SoapError::Http(401)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    // ======================== State queries ========================

    /// Whether the device answers on the network
    ///
    /// Any failure maps to "off"; callers that need the distinction between
    /// off and misbehaving use `probe` directly.
    pub fn get_power_status(&self) -> bool {
        self.probe().is_ok()
    }

    /// Current volume, 0..=100
    pub fn get_volume(&self) -> Result<u8> {
        let url = self.rendering_control_url()?;
        let response = self.client.call(
            &url,
            RENDERING_CONTROL_URN,
            "GetVolume",
            "<InstanceID>0</InstanceID><Channel>Master</Channel>",
        )?;

        let text = child_text(&response, "CurrentVolume")?;
        text.trim()
            .parse::<u8>()
            .map_err(|_| ApiError::ParseError(format!("Invalid volume value: {}", text)))
    }

    /// Current mute state
    pub fn get_mute(&self) -> Result<bool> {
        let url = self.rendering_control_url()?;
        let response = self.client.call(
            &url,
            RENDERING_CONTROL_URN,
            "GetMute",
            "<InstanceID>0</InstanceID><Channel>Master</Channel>",
        )?;

        let text = child_text(&response, "CurrentMute")?;
        match text.trim() {
            "1" | "true" | "True" => Ok(true),
            "0" | "false" | "False" => Ok(false),
            other => Err(ApiError::ParseError(format!(
                "Invalid mute value: {}",
                other
            ))),
        }
    }

    /// Current transport state string ("PLAYING", "PAUSED_PLAYBACK", ...)
    pub fn get_playing_status(&self) -> Result<String> {
        let url = self.av_transport_url()?;
        let response = self.client.call(
            &url,
            AV_TRANSPORT_URN,
            "GetTransportInfo",
            "<InstanceID>0</InstanceID>",
        )?;

        child_text(&response, "CurrentTransportState")
    }

    // ======================== Commands ========================

    /// Send a raw IRCC code, bypassing the command catalog
    pub fn send_ircc(&self, code: &str) -> Result<()> {
        let payload = format!("<IRCCCode>{}</IRCCCode>", code);
        self.client
            .call(&self.ircc_url(), IRCC_URN, "X_SendIRCC", &payload)?;
        Ok(())
    }

    /// Send a named command from the device's catalog
    ///
    /// Falls back to the built-in code table for names the device did not
    /// publish.
    pub fn send_command(&self, name: &str) -> Result<()> {
        let code = self.command_code(name)?;
        tracing::debug!(command = name, "Sending IRCC command");
        self.send_ircc(&code)
    }

    fn command_code(&self, name: &str) -> Result<String> {
        if let Some(code) = self.interior.read().commands.get(name) {
            return Ok(code.clone());
        }
        default_code(name)
            .map(str::to_string)
            .ok_or_else(|| ApiError::UnknownCommand(name.to_string()))
    }

    /// Power the device on or off
    ///
    /// Powering on sends a wake-on-LAN packet first (when a MAC is known);
    /// the follow-up IRCC wake command is allowed to fail with a connection
    /// error, since the device may still be booting.
    pub fn power(&self, on: bool) -> Result<()> {
        if on {
            self.wake_on_lan();
            match self.send_command(commands::CMD_WAKE_UP) {
                Ok(()) => Ok(()),
                Err(e) if e.is_connection_error() => {
                    tracing::debug!("Device not yet reachable after wake: {}", e);
                    Ok(())
                }
                Err(e) => Err(e),
            }
        } else {
            self.send_command(commands::CMD_POWER_OFF)
        }
    }

    fn wake_on_lan(&self) {
        let mac = self.mac.read().clone();
        if let Some(mac) = mac {
            if let Err(e) = wol::wake(&mac, &self.broadcast_address) {
                tracing::debug!("Wake-on-LAN failed: {}", e);
            }
        }
    }

    /// Send the play transport command
    pub fn play(&self) -> Result<()> {
        self.send_command(commands::CMD_PLAY)
    }

    /// Send the pause transport command
    pub fn pause(&self) -> Result<()> {
        self.send_command(commands::CMD_PAUSE)
    }

    /// Send the stop transport command
    pub fn stop(&self) -> Result<()> {
        self.send_command(commands::CMD_STOP)
    }

    /// Skip to the next track/chapter
    pub fn next(&self) -> Result<()> {
        self.send_command(commands::CMD_NEXT)
    }

    /// Skip to the previous track/chapter
    pub fn prev(&self) -> Result<()> {
        self.send_command(commands::CMD_PREV)
    }

    /// Step the volume up
    pub fn volume_up(&self) -> Result<()> {
        self.send_command(commands::CMD_VOLUME_UP)
    }

    /// Step the volume down
    pub fn volume_down(&self) -> Result<()> {
        self.send_command(commands::CMD_VOLUME_DOWN)
    }

    /// Toggle mute
    pub fn mute(&self) -> Result<()> {
        self.send_command(commands::CMD_MUTE)
    }

    /// Low-level escape hatch: send a raw HTTP request and return the body
    pub fn send_http(&self, url: &str, method: HttpMethod) -> Result<String> {
        Ok(self.client.send(method, url)?)
    }

    // ======================== Accessors ========================

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn mac(&self) -> Option<String> {
        self.mac.read().clone()
    }

    pub fn set_mac(&self, mac: impl Into<String>) {
        *self.mac.write() = Some(mac.into());
    }

    pub fn pin(&self) -> String {
        self.pin.read().clone()
    }

    pub fn set_pin(&self, pin: impl Into<String>) {
        *self.pin.write() = pin.into();
    }

    /// Friendly name read from the device, falling back to the host
    pub fn friendly_name(&self) -> String {
        self.interior
            .read()
            .friendly_name
            .clone()
            .unwrap_or_else(|| self.host.clone())
    }

    /// Override the friendly name (configured display name wins over the
    /// device-reported one)
    pub fn set_friendly_name(&self, name: impl Into<String>) {
        self.interior.write().friendly_name = Some(name.into());
    }

    pub fn manufacturer(&self) -> Option<String> {
        self.interior.read().manufacturer.clone()
    }

    pub fn model_name(&self) -> Option<String> {
        self.interior.read().model_name.clone()
    }

    fn rendering_control_url(&self) -> Result<String> {
        self.interior
            .read()
            .rendering_control_url
            .clone()
            .ok_or_else(|| {
                ApiError::NotInitialized("RenderingControl URL not known yet".to_string())
            })
    }

    fn av_transport_url(&self) -> Result<String> {
        self.interior
            .read()
            .av_transport_url
            .clone()
            .ok_or_else(|| ApiError::NotInitialized("AVTransport URL not known yet".to_string()))
    }
}

fn child_text(element: &Element, name: &str) -> Result<String> {
    element
        .get_child(name)
        .and_then(|c| c.get_text())
        .map(|t| t.into_owned())
        .ok_or_else(|| ApiError::ParseError(format!("Missing {} element", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let device = SonyDevice::new("192.168.0.23", "livingroom");
        assert_eq!(device.dmr_url(), "http://192.168.0.23:52323/dmr.xml");
        assert_eq!(device.ircc_url(), "http://192.168.0.23:50001/Ircc");
        assert_eq!(
            device.command_list_url(),
            "http://192.168.0.23:50202/appinfo/getRemoteCommandList"
        );
    }

    #[test]
    fn test_with_ports() {
        let device = SonyDevice::new("192.168.0.23", "tv").with_ports(8001, 8002, 8003);
        assert_eq!(device.dmr_url(), "http://192.168.0.23:8002/dmr.xml");
        assert_eq!(device.ircc_url(), "http://192.168.0.23:8003/Ircc");
    }

    #[test]
    fn test_service_url_resolution() {
        let device = SonyDevice::new("192.168.0.23", "tv");
        assert_eq!(
            device.service_url("/upnp/control/AVTransport"),
            "http://192.168.0.23:52323/upnp/control/AVTransport"
        );
        assert_eq!(
            device.service_url("upnp/control/AVTransport"),
            "http://192.168.0.23:52323/upnp/control/AVTransport"
        );
        assert_eq!(
            device.service_url("http://192.168.0.23:52323/control"),
            "http://192.168.0.23:52323/control"
        );
    }

    #[test]
    fn test_queries_before_init_fail_cleanly() {
        let device = SonyDevice::new("192.168.0.23", "tv");
        assert!(matches!(
            device.get_volume(),
            Err(ApiError::NotInitialized(_))
        ));
        assert!(matches!(
            device.get_playing_status(),
            Err(ApiError::NotInitialized(_))
        ));
    }

    #[test]
    fn test_command_code_fallback_table() {
        let device = SonyDevice::new("192.168.0.23", "tv");
        assert_eq!(
            device.command_code("PowerOff").unwrap(),
            "AAAAAQAAAAEAAAAvAw=="
        );
        assert!(matches!(
            device.command_code("DoesNotExist"),
            Err(ApiError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_device_catalog_wins_over_fallback() {
        let device = SonyDevice::new("192.168.0.23", "tv");
        device
            .interior
            .write()
            .commands
            .insert("PowerOff".to_string(), "CUSTOM==".to_string());
        assert_eq!(device.command_code("PowerOff").unwrap(), "CUSTOM==");
    }

    #[test]
    fn test_friendly_name_fallback_and_override() {
        let device = SonyDevice::new("192.168.0.23", "tv");
        assert_eq!(device.friendly_name(), "192.168.0.23");

        device.set_friendly_name("Living Room TV");
        assert_eq!(device.friendly_name(), "Living Room TV");
    }

    #[test]
    fn test_pin_and_mac_accessors() {
        let device = SonyDevice::new("192.168.0.23", "tv");
        assert_eq!(device.pin(), "");
        assert_eq!(device.mac(), None);

        device.set_pin("1234");
        device.set_mac("00:24:be:4a:bc:de");
        assert_eq!(device.pin(), "1234");
        assert_eq!(device.mac().as_deref(), Some("00:24:be:4a:bc:de"));
    }
}
