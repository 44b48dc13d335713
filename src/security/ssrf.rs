//! SSRF protection for the configured API origin.
//!
//! The base URL comes from the environment in most deployments, so a
//! hostile value could point the server at internal infrastructure or a
//! cloud metadata endpoint. Validation runs once at startup and is fatal.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use url::{Host, Url};

use crate::{Error, Result};

/// Check whether an address is loopback, unspecified, RFC1918 or
/// link-local.
fn is_private_or_reserved(addr: IpAddr) -> bool {
    match addr {
        IpAddr::V4(ipv4) => is_private_ipv4(ipv4),
        IpAddr::V6(ipv6) => is_private_ipv6(ipv6),
    }
}

fn is_private_ipv4(addr: Ipv4Addr) -> bool {
    addr.is_loopback()          // 127.0.0.0/8
    || addr.is_private()        // 10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16
    || addr.is_link_local()     // 169.254.0.0/16 (cloud metadata)
    || addr.is_unspecified() // 0.0.0.0
}

fn is_private_ipv6(addr: Ipv6Addr) -> bool {
    if addr.is_loopback() || addr.is_unspecified() {
        return true;
    }
    // ::ffff:a.b.c.d would otherwise smuggle a private IPv4 target through
    match addr.to_ipv4_mapped() {
        Some(ipv4) => is_private_ipv4(ipv4),
        None => false,
    }
}

fn is_blocked_host(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(domain) => {
            let domain = domain.trim_start_matches('[').trim_end_matches(']');
            if domain.eq_ignore_ascii_case("localhost") {
                return true;
            }
            domain
                .parse::<IpAddr>()
                .is_ok_and(is_private_or_reserved)
        }
        Host::Ipv4(addr) => is_private_ipv4(*addr),
        Host::Ipv6(addr) => is_private_ipv6(*addr),
    }
}

/// Validate the TorrentClaw API base URL.
///
/// Only `http` and `https` are accepted. Unless `allow_private` is set,
/// hosts that resolve syntactically to localhost, loopback, unspecified,
/// RFC1918 or link-local addresses are rejected. Domain names other than
/// `localhost` pass; DNS is not consulted.
///
/// Returns the input unchanged on success.
///
/// # Errors
///
/// Returns `Error::Config` if the URL is unparseable, uses another scheme,
/// or targets a private/reserved address without the override.
pub fn validate_api_url(raw: &str, allow_private: bool) -> Result<String> {
    let parsed = Url::parse(raw)
        .map_err(|_| Error::Config("Invalid TORRENTCLAW_API_URL: not a valid URL".to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::Config(
            "Invalid TORRENTCLAW_API_URL: only http/https protocols allowed".to_string(),
        ));
    }

    if !allow_private {
        let Some(host) = parsed.host() else {
            return Err(Error::Config(
                "Invalid TORRENTCLAW_API_URL: not a valid URL".to_string(),
            ));
        };
        if is_blocked_host(&host) {
            return Err(Error::Config(
                "Invalid TORRENTCLAW_API_URL: private/reserved addresses not allowed. \
                 Set TORRENTCLAW_ALLOW_PRIVATE=true for self-hosted setups."
                    .to_string(),
            ));
        }
    }

    Ok(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(url: &str) -> bool {
        matches!(validate_api_url(url, false), Err(Error::Config(msg)) if msg.contains("private/reserved"))
    }

    // ── is_private_ipv4 ───────────────────────────────────────────────

    #[test]
    fn private_ipv4_ranges() {
        assert!(is_private_ipv4(Ipv4Addr::LOCALHOST));
        assert!(is_private_ipv4(Ipv4Addr::new(127, 255, 255, 255)));
        assert!(is_private_ipv4(Ipv4Addr::new(10, 0, 0, 1)));
        assert!(is_private_ipv4(Ipv4Addr::new(172, 16, 0, 1)));
        assert!(is_private_ipv4(Ipv4Addr::new(172, 31, 255, 255)));
        assert!(is_private_ipv4(Ipv4Addr::new(192, 168, 1, 1)));
        assert!(is_private_ipv4(Ipv4Addr::new(169, 254, 169, 254)));
        assert!(is_private_ipv4(Ipv4Addr::UNSPECIFIED));
    }

    #[test]
    fn public_ipv4_passes() {
        assert!(!is_private_ipv4(Ipv4Addr::new(8, 8, 8, 8)));
        assert!(!is_private_ipv4(Ipv4Addr::new(172, 32, 0, 1)));
        assert!(!is_private_ipv4(Ipv4Addr::new(93, 184, 216, 34)));
    }

    // ── is_private_ipv6 ───────────────────────────────────────────────

    #[test]
    fn private_ipv6_loopback_and_unspecified() {
        assert!(is_private_ipv6(Ipv6Addr::LOCALHOST));
        assert!(is_private_ipv6(Ipv6Addr::UNSPECIFIED));
    }

    #[test]
    fn private_ipv6_ipv4_mapped() {
        let addr: Ipv6Addr = "::ffff:127.0.0.1".parse().unwrap();
        assert!(is_private_ipv6(addr));
        let public: Ipv6Addr = "::ffff:8.8.8.8".parse().unwrap();
        assert!(!is_private_ipv6(public));
    }

    // ── validate_api_url ──────────────────────────────────────────────

    #[test]
    fn accepts_default_origin_unchanged() {
        let url = "https://torrentclaw.com";
        assert_eq!(validate_api_url(url, false).unwrap(), url);
        let with_path = "https://api.example.com/base/?x=1";
        assert_eq!(validate_api_url(with_path, false).unwrap(), with_path);
    }

    #[test]
    fn rejects_unparseable() {
        let err = validate_api_url("not a url", false).unwrap_err();
        assert!(err.to_string().contains("not a valid URL"));
    }

    #[test]
    fn rejects_other_schemes() {
        for url in ["ftp://example.com", "file:///etc/passwd", "javascript:alert(1)"] {
            let err = validate_api_url(url, true).unwrap_err();
            assert!(err.to_string().contains("only http/https"), "{url}");
        }
    }

    #[test]
    fn rejects_loopback_and_localhost() {
        assert!(rejected("http://127.0.0.1"));
        assert!(rejected("http://127.1.2.3:8080/api"));
        assert!(rejected("http://localhost:3000"));
        assert!(rejected("http://LOCALHOST"));
    }

    #[test]
    fn rejects_private_ranges_and_metadata() {
        assert!(rejected("http://10.0.0.1"));
        assert!(rejected("http://172.16.5.4"));
        assert!(rejected("http://192.168.1.1"));
        assert!(rejected("http://169.254.169.254/latest/meta-data"));
        assert!(rejected("http://0.0.0.0"));
    }

    #[test]
    fn rejects_bracketed_ipv6() {
        assert!(rejected("http://[::1]:8080"));
        assert!(rejected("http://[::]"));
        assert!(rejected("http://[::ffff:127.0.0.1]/"));
    }

    #[test]
    fn allows_public_hosts() {
        assert!(validate_api_url("http://8.8.8.8/api", false).is_ok());
        assert!(validate_api_url("http://172.32.0.1", false).is_ok());
        assert!(validate_api_url("http://[2607:f8b0:4004:800::200e]/api", false).is_ok());
    }

    #[test]
    fn override_allows_private() {
        assert_eq!(
            validate_api_url("http://127.0.0.1:8080", true).unwrap(),
            "http://127.0.0.1:8080"
        );
        assert!(validate_api_url("http://localhost", true).is_ok());
    }
}
