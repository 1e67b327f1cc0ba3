use reqwest::Url;
use std::net::IpAddr;

/// Lenient boolean env-flag parsing ("true"/"1"/"yes"/"on" and their
/// negations).
pub fn parse_bool_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Whether a URL points at this machine: `localhost`, a loopback address,
/// or the unspecified address. Anything unparseable counts as remote.
pub fn is_local_endpoint_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };

    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    // IPv6 hosts come back bracketed from the URL parser.
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    match bare.parse::<IpAddr>() {
        Ok(addr) => addr.is_loopback() || addr.is_unspecified(),
        Err(_) => false,
    }
}
