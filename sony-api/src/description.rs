//! Device description parsing.
//!
//! Sony DMR devices publish a UPnP device description at
//! `http://<host>:<dmr_port>/dmr.xml`. It carries the device metadata
//! (friendly name, manufacturer, model) and the control URLs for the
//! AVTransport and RenderingControl services the API queries.

use crate::error::{ApiError, Result};
use serde::Deserialize;

/// UPnP device description root element.
#[derive(Debug, Deserialize)]
pub struct Root {
    pub device: DeviceDescription,
}

/// Device description parsed from `dmr.xml`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescription {
    pub device_type: String,
    pub friendly_name: String,
    pub manufacturer: String,
    pub model_name: String,
    #[serde(rename = "UDN")]
    pub udn: Option<String>,
    pub service_list: Option<ServiceList>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceList {
    #[serde(rename = "service", default)]
    pub services: Vec<ServiceEntry>,
}

/// One `<service>` entry from the description's service list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEntry {
    pub service_type: String,
    pub service_id: Option<String>,
    #[serde(rename = "controlURL")]
    pub control_url: String,
}

impl DeviceDescription {
    /// Parse a device description from XML.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ParseError` if the XML is malformed or missing
    /// required fields.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let root: Root = quick_xml::de::from_str(xml)
            .map_err(|e| ApiError::ParseError(format!("Failed to parse device XML: {}", e)))?;

        Ok(root.device)
    }

    /// Find the control URL path for a service whose type contains `needle`
    /// (e.g. "AVTransport", "RenderingControl").
    pub fn control_url(&self, needle: &str) -> Option<&str> {
        self.service_list
            .as_ref()?
            .services
            .iter()
            .find(|s| s.service_type.contains(needle))
            .map(|s| s.control_url.as_str())
    }
}

/// Remote command list published by the device's app service.
///
/// Newer devices answer `getRemoteCommandList` with an XML document mapping
/// command names to base64 IRCC codes:
///
/// ```text
/// <command_list>
///   <command name="PowerOff" type="ircc" value="AAAAAQAAAAEAAAAvAw=="/>
///   ...
/// </command_list>
/// ```
#[derive(Debug, Deserialize)]
pub struct CommandList {
    #[serde(rename = "command", default)]
    pub commands: Vec<CommandEntry>,
}

#[derive(Debug, Deserialize)]
pub struct CommandEntry {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@type")]
    pub command_type: Option<String>,
    #[serde(rename = "@value")]
    pub value: String,
}

impl CommandList {
    /// Parse a remote command list from XML, keeping only IRCC commands.
    pub fn from_xml(xml: &str) -> Result<Vec<CommandEntry>> {
        let list: CommandList = quick_xml::de::from_str(xml)
            .map_err(|e| ApiError::ParseError(format!("Failed to parse command list: {}", e)))?;

        Ok(list
            .commands
            .into_iter()
            .filter(|c| {
                c.command_type
                    .as_deref()
                    .map(|t| t.eq_ignore_ascii_case("ircc"))
                    .unwrap_or(true)
            })
            .collect())
    }
}
