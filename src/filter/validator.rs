//! Checks for the values accepted by the filter primitives.
//!
//! Every check comes in two flavours selected by [`Validation`]. `Strict`
//! accepts only the documented tokens. `Permissive` reproduces the legacy
//! behaviour where the direction, protocol and port-range checks never
//! rejected anything; it only exists for callers that depend on it.

use log::warn;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Highest port number a filter may reference
pub const MAX_PORT: u32 = 65535;

/// How strictly primitive arguments are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Validation {
    /// Only `src`/`dst`, `tcp`/`udp` and ports in 0-65535
    #[default]
    Strict,
    /// Any direction or protocol token, any all-digit port
    Permissive,
}

impl Validation {
    pub fn direction(self, s: &str) -> bool {
        match self {
            Validation::Strict => is_valid_direction(s),
            Validation::Permissive => {
                if !is_valid_direction(s) {
                    warn!("Accepting unknown direction '{}' in permissive mode", s);
                }
                true
            }
        }
    }

    pub fn protocol(self, s: &str) -> bool {
        match self {
            Validation::Strict => is_valid_protocol(s),
            Validation::Permissive => {
                if !is_valid_protocol(s) {
                    warn!("Accepting unknown protocol '{}' in permissive mode", s);
                }
                true
            }
        }
    }

    pub fn port(self, s: &str) -> bool {
        match self {
            Validation::Strict => is_valid_port_number(s),
            Validation::Permissive => {
                if !is_digits(s) {
                    return false;
                }
                if !is_valid_port_number(s) {
                    warn!("Accepting out-of-range port {} in permissive mode", s);
                }
                true
            }
        }
    }
}

/// True if `s` is an IPv4 or IPv6 address literal
pub fn is_valid_ip(s: &str) -> bool {
    s.parse::<IpAddr>().is_ok()
}

/// True if `s` is `src`, `dst` or empty
pub fn is_valid_direction(s: &str) -> bool {
    matches!(s, "" | "src" | "dst")
}

/// True if `s` is `tcp`, `udp` or empty
pub fn is_valid_protocol(s: &str) -> bool {
    matches!(s, "" | "tcp" | "udp")
}

/// True if `s` is made of decimal digits and names a port in 0-65535
pub fn is_valid_port_number(s: &str) -> bool {
    if !is_digits(s) {
        return false;
    }
    // Leading zeros are allowed, so compare on the significant digits
    let digits = s.trim_start_matches('0');
    digits.len() <= 5 && digits.parse::<u32>().map_or(true, |p| p <= MAX_PORT)
}

/// Renders an all-digit port string as a plain decimal integer
pub(crate) fn canonical_port(s: &str) -> &str {
    let digits = s.trim_start_matches('0');
    if digits.is_empty() {
        "0"
    } else {
        digits
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
