//! Browser impersonation profiles.
//!
//! A profile names a browser build; its `Fingerprint` is what the client
//! needs to look like that browser on the wire: TLS cipher order, TLS
//! version window, HTTP version and the default request headers.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported impersonation profile: {0:?}")]
pub struct UnknownProfile(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    Chrome99,
    Chrome100,
    Chrome101,
    Chrome104,
    Chrome107,
    Chrome110,
    Chrome116,
    Chrome119,
    Chrome120,
    Chrome123,
    Chrome124,
    Chrome99Android,
    Edge99,
    Edge101,
    Safari15_3,
    Safari15_5,
    Safari17_0,
    Safari17_2Ios,
    Firefox117,
    Firefox133,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Chrome,
    Edge,
    Safari,
    Firefox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsVersion {
    Tls10,
    Tls12,
}

impl TlsVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            TlsVersion::Tls10 => "1.0",
            TlsVersion::Tls12 => "1.2",
        }
    }
}

/// Wire characteristics the client applies for a profile.
///
/// Every profile offers TLS up to 1.3 and negotiates HTTP/2 over ALPN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    /// OpenSSL-style cipher list, in the browser's ClientHello order.
    pub ciphers: &'static str,
    /// Lowest protocol version offered in the ClientHello.
    pub min_tls: TlsVersion,
    /// Default headers in the order the browser sends them.
    pub headers: Vec<(String, String)>,
}

const ALL: [Profile; 20] = [
    Profile::Chrome99,
    Profile::Chrome100,
    Profile::Chrome101,
    Profile::Chrome104,
    Profile::Chrome107,
    Profile::Chrome110,
    Profile::Chrome116,
    Profile::Chrome119,
    Profile::Chrome120,
    Profile::Chrome123,
    Profile::Chrome124,
    Profile::Chrome99Android,
    Profile::Edge99,
    Profile::Edge101,
    Profile::Safari15_3,
    Profile::Safari15_5,
    Profile::Safari17_0,
    Profile::Safari17_2Ios,
    Profile::Firefox117,
    Profile::Firefox133,
];

const CHROME_CIPHERS: &str = "TLS_AES_128_GCM_SHA256:TLS_AES_256_GCM_SHA384:\
TLS_CHACHA20_POLY1305_SHA256:ECDHE-ECDSA-AES128-GCM-SHA256:ECDHE-RSA-AES128-GCM-SHA256:\
ECDHE-ECDSA-AES256-GCM-SHA384:ECDHE-RSA-AES256-GCM-SHA384:ECDHE-ECDSA-CHACHA20-POLY1305:\
ECDHE-RSA-CHACHA20-POLY1305:ECDHE-RSA-AES128-SHA:ECDHE-RSA-AES256-SHA:AES128-GCM-SHA256:\
AES256-GCM-SHA384:AES128-SHA:AES256-SHA";

const SAFARI_CIPHERS: &str = "TLS_AES_128_GCM_SHA256:TLS_AES_256_GCM_SHA384:\
TLS_CHACHA20_POLY1305_SHA256:ECDHE-ECDSA-AES256-GCM-SHA384:ECDHE-ECDSA-AES128-GCM-SHA256:\
ECDHE-ECDSA-CHACHA20-POLY1305:ECDHE-RSA-AES256-GCM-SHA384:ECDHE-RSA-AES128-GCM-SHA256:\
ECDHE-RSA-CHACHA20-POLY1305:ECDHE-ECDSA-AES256-SHA384:ECDHE-ECDSA-AES128-SHA256:\
ECDHE-ECDSA-AES256-SHA:ECDHE-ECDSA-AES128-SHA:ECDHE-RSA-AES256-SHA384:\
ECDHE-RSA-AES128-SHA256:ECDHE-RSA-AES256-SHA:ECDHE-RSA-AES128-SHA:AES256-GCM-SHA384:\
AES128-GCM-SHA256:AES256-SHA256:AES128-SHA256:AES256-SHA:AES128-SHA:\
ECDHE-ECDSA-DES-CBC3-SHA:ECDHE-RSA-DES-CBC3-SHA:DES-CBC3-SHA";

const FIREFOX_CIPHERS: &str = "TLS_AES_128_GCM_SHA256:TLS_CHACHA20_POLY1305_SHA256:\
TLS_AES_256_GCM_SHA384:ECDHE-ECDSA-AES128-GCM-SHA256:ECDHE-RSA-AES128-GCM-SHA256:\
ECDHE-ECDSA-CHACHA20-POLY1305:ECDHE-RSA-CHACHA20-POLY1305:ECDHE-ECDSA-AES256-GCM-SHA384:\
ECDHE-RSA-AES256-GCM-SHA384:ECDHE-ECDSA-AES256-SHA:ECDHE-ECDSA-AES128-SHA:\
ECDHE-RSA-AES128-SHA:ECDHE-RSA-AES256-SHA:AES128-GCM-SHA256:AES256-GCM-SHA384:\
AES128-SHA:AES256-SHA";

const CHROME_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,\
image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

const SAFARI_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

const FIREFOX_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

impl Profile {
    pub fn all() -> &'static [Profile] {
        &ALL
    }

    /// Canonical identifier, as accepted in request metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Chrome99 => "chrome99",
            Profile::Chrome100 => "chrome100",
            Profile::Chrome101 => "chrome101",
            Profile::Chrome104 => "chrome104",
            Profile::Chrome107 => "chrome107",
            Profile::Chrome110 => "chrome110",
            Profile::Chrome116 => "chrome116",
            Profile::Chrome119 => "chrome119",
            Profile::Chrome120 => "chrome120",
            Profile::Chrome123 => "chrome123",
            Profile::Chrome124 => "chrome124",
            Profile::Chrome99Android => "chrome99_android",
            Profile::Edge99 => "edge99",
            Profile::Edge101 => "edge101",
            Profile::Safari15_3 => "safari15_3",
            Profile::Safari15_5 => "safari15_5",
            Profile::Safari17_0 => "safari17_0",
            Profile::Safari17_2Ios => "safari17_2_ios",
            Profile::Firefox117 => "firefox117",
            Profile::Firefox133 => "firefox133",
        }
    }

    pub fn family(self) -> Family {
        match self {
            Profile::Edge99 | Profile::Edge101 => Family::Edge,
            Profile::Safari15_3 | Profile::Safari15_5 | Profile::Safari17_0 | Profile::Safari17_2Ios => {
                Family::Safari
            }
            Profile::Firefox117 | Profile::Firefox133 => Family::Firefox,
            _ => Family::Chrome,
        }
    }

    /// Major browser version.
    pub fn version(self) -> u32 {
        match self {
            Profile::Chrome99 | Profile::Chrome99Android | Profile::Edge99 => 99,
            Profile::Chrome100 => 100,
            Profile::Chrome101 | Profile::Edge101 => 101,
            Profile::Chrome104 => 104,
            Profile::Chrome107 => 107,
            Profile::Chrome110 => 110,
            Profile::Chrome116 => 116,
            Profile::Chrome119 => 119,
            Profile::Chrome120 => 120,
            Profile::Chrome123 => 123,
            Profile::Chrome124 => 124,
            Profile::Safari15_3 | Profile::Safari15_5 => 15,
            Profile::Safari17_0 | Profile::Safari17_2Ios => 17,
            Profile::Firefox117 => 117,
            Profile::Firefox133 => 133,
        }
    }

    pub fn fingerprint(self) -> Fingerprint {
        let (ciphers, min_tls) = match self.family() {
            Family::Chrome | Family::Edge => (CHROME_CIPHERS, TlsVersion::Tls12),
            // Safari still lists the legacy TLS 1.0 version range.
            Family::Safari => (SAFARI_CIPHERS, TlsVersion::Tls10),
            Family::Firefox => (FIREFOX_CIPHERS, TlsVersion::Tls12),
        };
        Fingerprint {
            ciphers,
            min_tls,
            headers: self.default_headers(),
        }
    }

    fn default_headers(self) -> Vec<(String, String)> {
        let v = self.version();
        let pairs: Vec<(&str, String)> = match self.family() {
            Family::Chrome | Family::Edge => {
                let mobile = self == Profile::Chrome99Android;
                let (brand, platform, ua) = match (self.family(), mobile) {
                    (Family::Edge, _) => (
                        format!(r#"" Not A;Brand";v="99", "Chromium";v="{v}", "Microsoft Edge";v="{v}""#),
                        "\"Windows\"",
                        format!("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{v}.0.0.0 Safari/537.36 Edg/{v}.0.0.0"),
                    ),
                    (_, true) => (
                        format!(r#"" Not A;Brand";v="99", "Chromium";v="{v}", "Google Chrome";v="{v}""#),
                        "\"Android\"",
                        format!("Mozilla/5.0 (Linux; Android 12; Pixel 6) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{v}.0.0.0 Mobile Safari/537.36"),
                    ),
                    _ => (
                        format!(r#""Not_A Brand";v="8", "Chromium";v="{v}", "Google Chrome";v="{v}""#),
                        "\"Windows\"",
                        format!("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{v}.0.0.0 Safari/537.36"),
                    ),
                };
                vec![
                    ("sec-ch-ua", brand),
                    ("sec-ch-ua-mobile", if mobile { "?1" } else { "?0" }.to_string()),
                    ("sec-ch-ua-platform", platform.to_string()),
                    ("Upgrade-Insecure-Requests", "1".to_string()),
                    ("User-Agent", ua),
                    ("Accept", CHROME_ACCEPT.to_string()),
                    ("Sec-Fetch-Site", "none".to_string()),
                    ("Sec-Fetch-Mode", "navigate".to_string()),
                    ("Sec-Fetch-User", "?1".to_string()),
                    ("Sec-Fetch-Dest", "document".to_string()),
                    ("Accept-Encoding", "gzip, deflate, br".to_string()),
                    ("Accept-Language", "en-US,en;q=0.9".to_string()),
                ]
            }
            Family::Safari => {
                let ua = match self {
                    Profile::Safari17_2Ios => "Mozilla/5.0 (iPhone; CPU iPhone OS 17_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Mobile/15E148 Safari/604.1".to_string(),
                    Profile::Safari15_3 => "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.3 Safari/605.1.15".to_string(),
                    Profile::Safari15_5 => "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.5 Safari/605.1.15".to_string(),
                    _ => "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15".to_string(),
                };
                vec![
                    ("User-Agent", ua),
                    ("Accept", SAFARI_ACCEPT.to_string()),
                    ("Accept-Language", "en-US,en;q=0.9".to_string()),
                    ("Accept-Encoding", "gzip, deflate, br".to_string()),
                ]
            }
            Family::Firefox => vec![
                (
                    "User-Agent",
                    format!("Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:{v}.0) Gecko/20100101 Firefox/{v}.0"),
                ),
                ("Accept", FIREFOX_ACCEPT.to_string()),
                ("Accept-Language", "en-US,en;q=0.5".to_string()),
                ("Accept-Encoding", "gzip, deflate, br".to_string()),
                ("Upgrade-Insecure-Requests", "1".to_string()),
                ("Sec-Fetch-Dest", "document".to_string()),
                ("Sec-Fetch-Mode", "navigate".to_string()),
                ("Sec-Fetch-Site", "none".to_string()),
                ("Sec-Fetch-User", "?1".to_string()),
            ],
        };
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        // Family aliases resolve to the newest build of that family.
        let alias = match id.as_str() {
            "chrome" => Some(Profile::Chrome124),
            "chrome_android" => Some(Profile::Chrome99Android),
            "edge" => Some(Profile::Edge101),
            "safari" => Some(Profile::Safari17_0),
            "safari_ios" => Some(Profile::Safari17_2Ios),
            "firefox" => Some(Profile::Firefox133),
            _ => None,
        };
        if let Some(p) = alias {
            return Ok(p);
        }
        ALL.iter()
            .copied()
            .find(|p| p.as_str() == id)
            .ok_or_else(|| UnknownProfile(s.to_string()))
    }
}
