//! Private SOAP/HTTP client for Sony device communication
//!
//! This crate provides a minimal HTTP client for talking to the local control
//! services of Sony networked TV/AV devices: plain GETs against description
//! and registration endpoints, and SOAP calls against the UPnP-style DMR and
//! IRCC services.

mod error;

pub use error::SoapError;

use std::time::Duration;
use xmltree::Element;

/// HTTP method for raw requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A minimal SOAP/HTTP client for Sony device communication
#[derive(Debug, Clone)]
pub struct SoapClient {
    agent: ureq::Agent,
}

impl SoapClient {
    /// Create a new client with default timeouts
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(Duration::from_secs(5))
                .timeout_read(Duration::from_secs(10))
                .build(),
        }
    }

    /// Send a raw request and return the response body
    ///
    /// A `Post` without a payload sends an empty body. Used by callers that
    /// need the low-level escape hatch (reachability probes, description
    /// fetches).
    pub fn send(&self, method: HttpMethod, url: &str) -> Result<String, SoapError> {
        let response = match method {
            HttpMethod::Get => self.agent.get(url).call()?,
            HttpMethod::Post => self.agent.post(url).send_string("")?,
        };

        response
            .into_string()
            .map_err(|e| SoapError::Connection(e.to_string()))
    }

    /// GET a URL, optionally with an `Authorization` header value
    pub fn get_with_auth(&self, url: &str, auth: Option<&str>) -> Result<String, SoapError> {
        let mut request = self.agent.get(url);
        if let Some(value) = auth {
            request = request.set("Authorization", value);
        }

        let response = request.call()?;
        response
            .into_string()
            .map_err(|e| SoapError::Connection(e.to_string()))
    }

    /// Send a SOAP request and return the parsed response element
    ///
    /// The envelope is built inline; Sony devices expect the action both in
    /// the body and in the `SOAPACTION` header.
    pub fn call(
        &self,
        url: &str,
        service_uri: &str,
        action: &str,
        payload: &str,
    ) -> Result<Element, SoapError> {
        let body = format!(
            r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
                <s:Body>
                    <u:{action} xmlns:u="{service_uri}">
                        {payload}
                    </u:{action}>
                </s:Body>
            </s:Envelope>"#,
            action = action,
            service_uri = service_uri,
            payload = payload
        );

        let soap_action = format!("\"{}#{}\"", service_uri, action);

        let response = self
            .agent
            .post(url)
            .set("Content-Type", "text/xml; charset=\"utf-8\"")
            .set("SOAPACTION", &soap_action)
            .send_string(&body)?;

        let xml_text = response
            .into_string()
            .map_err(|e| SoapError::Connection(e.to_string()))?;

        let xml = Element::parse(xml_text.as_bytes())
            .map_err(|e| SoapError::Parse(e.to_string()))?;

        self.extract_response(&xml, action)
    }

    fn extract_response(&self, xml: &Element, action: &str) -> Result<Element, SoapError> {
        let body = xml
            .get_child("Body")
            .ok_or_else(|| SoapError::Parse("Missing SOAP Body".to_string()))?;

        // Check for SOAP fault first
        if let Some(fault) = body.get_child("Fault") {
            let error_code = fault
                .get_child("detail")
                .and_then(|d| d.get_child("UPnPError"))
                .and_then(|e| e.get_child("errorCode"))
                .and_then(|c| c.get_text())
                .and_then(|t| t.parse::<u16>().ok())
                .unwrap_or(500);
            return Err(SoapError::Fault(error_code));
        }

        let response_name = format!("{}Response", action);
        body.get_child(response_name.as_str())
            .cloned()
            .ok_or_else(|| SoapError::Parse(format!("Missing {} element", response_name)))
    }
}

impl Default for SoapClient {
    fn default() -> Self {
        Self::new()
    }
}
