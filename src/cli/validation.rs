//! Value parsers for CLI arguments that clap cannot check on its own.

use std::net::IpAddr;
use std::path::PathBuf;

/// Port in 1..=65535
pub fn validate_port(port_str: &str) -> Result<u16, String> {
    match port_str.trim().parse::<u16>() {
        Ok(0) => Err("Port must be between 1 and 65535. Port 0 is not allowed.".to_string()),
        Ok(port) => Ok(port),
        Err(_) => Err(format!(
            "Port must be a valid number between 1 and 65535, got: '{}'",
            port_str
        )),
    }
}

/// An existing, readable regular file
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.is_file() {
        return Err(if path.exists() {
            format!("Configuration path is not a file: '{}'", path_str)
        } else {
            format!("Configuration file does not exist: '{}'", path_str)
        });
    }

    std::fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("Cannot read configuration file '{}': {}", path_str, e))
}

/// An IP literal or a plausible hostname
///
/// Dotted-decimal strings must be valid IPv4 addresses; anything else is
/// treated as a hostname of at most 253 characters made of letters, digits,
/// `-` and `.`.
pub fn validate_host_address(host_str: &str) -> Result<String, String> {
    let host = host_str.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }

    if host.parse::<IpAddr>().is_ok() {
        return Ok(host.to_string());
    }

    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(format!("Invalid IPv4 address format: '{}'", host_str));
    }

    if host.len() > 253 {
        return Err("Host address is too long (maximum 253 characters)".to_string());
    }

    if let Some(c) = host
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
    {
        return Err(format!("Host address contains invalid character '{}'", c));
    }

    Ok(host.to_string())
}
