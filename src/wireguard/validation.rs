//! Optional syntax checks for tunnel parameters
//!
//! The formatter embeds fields verbatim. Callers who want to reject obvious
//! mistakes (bad CIDR, missing port, truncated server key) run
//! [`validate_params`] before formatting. All failing fields are reported.

use std::net::{IpAddr, Ipv6Addr};
use std::sync::OnceLock;

use ipnetwork::IpNetwork;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use super::config::TunnelParameters;
use super::encoding::decode_key;

/// Largest keepalive interval WireGuard accepts (seconds)
pub const MAX_PERSISTENT_KEEPALIVE: u32 = 65535;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn hostname_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.?$",
        )
        .expect("hostname pattern compiles")
    })
}

/// Split a comma-separated WireGuard list, dropping surrounding whitespace
fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim)
}

fn is_hostname(host: &str) -> bool {
    // A numeric last label means a malformed IPv4 address, not a name
    let numeric_tld = host
        .trim_end_matches('.')
        .rsplit('.')
        .next()
        .is_some_and(|label| !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit()));

    host.len() <= 253 && !numeric_tld && hostname_regex().is_match(host)
}

/// Fields are written into the file verbatim, so anything that would change
/// the line structure is rejected before the per-field syntax checks.
fn check_raw(field: &'static str, value: &str) -> Option<ValidationError> {
    if value != value.trim() || value.chars().any(char::is_control) {
        Some(ValidationError::new(
            field,
            "must not contain surrounding whitespace or control characters",
        ))
    } else {
        None
    }
}

fn check_cidr_list(field: &'static str, value: &str) -> Option<ValidationError> {
    if value.trim().is_empty() {
        return Some(ValidationError::new(field, "must not be empty"));
    }

    let bad: Vec<&str> = split_list(value)
        .filter(|entry| entry.parse::<IpNetwork>().is_err())
        .collect();

    if bad.is_empty() {
        None
    } else {
        Some(ValidationError::new(
            field,
            format!("invalid network(s): {}", bad.join(", ")),
        ))
    }
}

fn check_dns(value: &str) -> Option<ValidationError> {
    if value.trim().is_empty() {
        return None;
    }

    let bad: Vec<&str> = split_list(value)
        .filter(|entry| entry.parse::<IpAddr>().is_err() && !is_hostname(entry))
        .collect();

    if bad.is_empty() {
        None
    } else {
        Some(ValidationError::new(
            "dns",
            format!("invalid server(s): {}", bad.join(", ")),
        ))
    }
}

fn check_server_public_key(value: &str) -> Option<ValidationError> {
    decode_key(value)
        .err()
        .map(|e| ValidationError::new("server_public_key", e.to_string()))
}

fn check_endpoint(value: &str) -> Option<ValidationError> {
    let (host, port) = if let Some(rest) = value.strip_prefix('[') {
        let Some((host, port)) = rest.split_once("]:") else {
            return Some(ValidationError::new(
                "server_endpoint",
                "expected [ipv6]:port",
            ));
        };
        if host.parse::<Ipv6Addr>().is_err() {
            return Some(ValidationError::new(
                "server_endpoint",
                format!("invalid IPv6 address: {}", host),
            ));
        }
        (host, port)
    } else {
        let Some((host, port)) = value.rsplit_once(':') else {
            return Some(ValidationError::new(
                "server_endpoint",
                "expected host:port",
            ));
        };
        if host.contains(':') {
            return Some(ValidationError::new(
                "server_endpoint",
                "IPv6 endpoints must be written as [address]:port",
            ));
        }
        if host.parse::<IpAddr>().is_err() && !is_hostname(host) {
            return Some(ValidationError::new(
                "server_endpoint",
                format!("invalid host: {}", host),
            ));
        }
        (host, port)
    };

    match port.parse::<u16>() {
        Ok(0) | Err(_) => Some(ValidationError::new(
            "server_endpoint",
            format!("invalid port for {}: {}", host, port),
        )),
        Ok(_) => None,
    }
}

fn check_keepalive(value: u32) -> Option<ValidationError> {
    if value > MAX_PERSISTENT_KEEPALIVE {
        Some(ValidationError::new(
            "persistent_keepalive",
            format!("must be at most {}", MAX_PERSISTENT_KEEPALIVE),
        ))
    } else {
        None
    }
}

/// Check every field of the parameters, collecting all failures
pub fn validate_params(params: &TunnelParameters) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = [
        check_raw("client_address", &params.client_address)
            .or_else(|| check_cidr_list("client_address", &params.client_address)),
        check_raw("dns", &params.dns).or_else(|| check_dns(&params.dns)),
        check_raw("server_public_key", &params.server_public_key)
            .or_else(|| check_server_public_key(&params.server_public_key)),
        check_raw("server_endpoint", &params.server_endpoint)
            .or_else(|| check_endpoint(&params.server_endpoint)),
        check_raw("allowed_ips", &params.allowed_ips)
            .or_else(|| check_cidr_list("allowed_ips", &params.allowed_ips)),
        check_keepalive(params.persistent_keepalive),
    ]
    .into_iter()
    .flatten()
    .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(count = errors.len(), "Tunnel parameters failed validation");
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wireguard::encoding::encode_key;

    fn valid_params() -> TunnelParameters {
        TunnelParameters {
            server_public_key: encode_key(&[4u8; 32]),
            ..TunnelParameters::default()
        }
    }

    fn fields(errors: &[ValidationError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn test_defaults_with_server_key_are_valid() {
        assert_eq!(validate_params(&valid_params()), Ok(()));
    }

    #[test]
    fn test_defaults_without_server_key_fail() {
        let errors = validate_params(&TunnelParameters::default()).unwrap_err();
        assert_eq!(fields(&errors), vec!["server_public_key"]);
    }

    #[test]
    fn test_cidr_lists() {
        let mut params = valid_params();
        params.client_address = "10.0.0.2/32, fd00::2/128".to_string();
        params.allowed_ips = "0.0.0.0/0, ::/0".to_string();
        assert!(validate_params(&params).is_ok());

        params.allowed_ips = "0.0.0.0/0, 10.0.0.0/33".to_string();
        let errors = validate_params(&params).unwrap_err();
        assert_eq!(fields(&errors), vec!["allowed_ips"]);
        assert!(errors[0].message.contains("10.0.0.0/33"));
    }

    #[test]
    fn test_empty_address_rejected() {
        let mut params = valid_params();
        params.client_address = " ".to_string();
        let errors = validate_params(&params).unwrap_err();
        assert_eq!(fields(&errors), vec!["client_address"]);
    }

    #[test]
    fn test_dns_accepts_ips_hostnames_and_empty() {
        let mut params = valid_params();
        params.dns = String::new();
        assert!(validate_params(&params).is_ok());

        params.dns = "1.1.1.1, 2606:4700:4700::1111, corp.internal".to_string();
        assert!(validate_params(&params).is_ok());

        params.dns = "1.1.1.1, bad host".to_string();
        let errors = validate_params(&params).unwrap_err();
        assert_eq!(fields(&errors), vec!["dns"]);
    }

    #[test]
    fn test_endpoints() {
        let valid = [
            "vpn.example.com:51820",
            "203.0.113.1:51820",
            "[2001:db8::1]:51820",
        ];
        for endpoint in valid {
            assert_eq!(check_endpoint(endpoint), None, "{}", endpoint);
        }

        let invalid = [
            "vpn.example.com",
            "vpn.example.com:0",
            "vpn.example.com:70000",
            "2001:db8::1:51820",
            "[2001:db8::1]51820",
            "[not-v6]:51820",
            ":51820",
        ];
        for endpoint in invalid {
            assert!(check_endpoint(endpoint).is_some(), "{}", endpoint);
        }
    }

    #[test]
    fn test_server_key_wrong_length() {
        let mut params = valid_params();
        params.server_public_key = "SERVERKEYBASE64".to_string();
        let errors = validate_params(&params).unwrap_err();
        assert_eq!(fields(&errors), vec!["server_public_key"]);
    }

    #[test]
    fn test_keepalive_bounds() {
        let mut params = valid_params();
        params.persistent_keepalive = 0;
        assert!(validate_params(&params).is_ok());

        params.persistent_keepalive = MAX_PERSISTENT_KEEPALIVE + 1;
        let errors = validate_params(&params).unwrap_err();
        assert_eq!(fields(&errors), vec!["persistent_keepalive"]);
    }

    #[test]
    fn test_collects_all_errors_in_field_order() {
        let params = TunnelParameters {
            client_address: "nope".to_string(),
            dns: "!!".to_string(),
            server_public_key: String::new(),
            server_endpoint: "nowhere".to_string(),
            allowed_ips: String::new(),
            persistent_keepalive: 100_000,
        };
        let errors = validate_params(&params).unwrap_err();
        assert_eq!(
            fields(&errors),
            vec![
                "client_address",
                "dns",
                "server_public_key",
                "server_endpoint",
                "allowed_ips",
                "persistent_keepalive",
            ]
        );
    }

    #[test]
    fn test_line_breaking_values_rejected() {
        let mut params = valid_params();
        params.client_address = "\n10.0.0.2/32".to_string();
        params.server_public_key = format!("{}\n", encode_key(&[4u8; 32]));
        let errors = validate_params(&params).unwrap_err();
        assert_eq!(fields(&errors), vec!["client_address", "server_public_key"]);
        assert!(errors[0].message.contains("control characters"));

        // the same values would otherwise split lines in the rendered file
        let artifact = crate::wireguard::config::format_config(
            crate::wireguard::KeyPair::from_private_key([1u8; 32]),
            &params,
        );
        assert!(artifact.config_text.contains("Address = \n10.0.0.2/32"));
    }

    #[test]
    fn test_surrounding_whitespace_and_tabs_rejected() {
        let cases = [
            ("dns", " 1.1.1.1"),
            ("server_endpoint", "vpn.example.com:51820\r"),
            ("allowed_ips", "0.0.0.0/0\t"),
            ("allowed_ips", "10.0.0.0/8,\n192.168.0.0/16"),
        ];
        for (field, value) in cases {
            let mut params = valid_params();
            match field {
                "dns" => params.dns = value.to_string(),
                "server_endpoint" => params.server_endpoint = value.to_string(),
                _ => params.allowed_ips = value.to_string(),
            }
            let errors = validate_params(&params).unwrap_err();
            assert_eq!(fields(&errors), vec![field], "{:?}", value);
        }

        // spaces after list commas are fine
        let mut params = valid_params();
        params.allowed_ips = "10.0.0.0/8, 192.168.0.0/16".to_string();
        assert!(validate_params(&params).is_ok());
    }

    #[test]
    fn test_numeric_names_are_not_hostnames() {
        assert!(check_endpoint("300.1.1.1:51820").is_some());
        assert!(check_endpoint("999.0.0.1:51820").is_some());
        assert!(check_endpoint("vpn1.example.com:51820").is_none());
        assert!(!is_hostname("999.0.0.1"));
        assert!(!is_hostname("12345"));
        assert!(is_hostname("10.example"));

        let mut params = valid_params();
        params.dns = "1.1.1.1, 999.0.0.1".to_string();
        let errors = validate_params(&params).unwrap_err();
        assert_eq!(fields(&errors), vec!["dns"]);
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::new("dns", "invalid server(s): x");
        assert_eq!(err.to_string(), "dns: invalid server(s): x");
    }
}
