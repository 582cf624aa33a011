//! Client hints derived from a raw `User-Agent` header
//!
//! Classification is coarse on purpose: only the family names end up in
//! presence metadata, never the full version string.

use std::fmt;

/// Device class of a visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    #[default]
    Desktop,
    Bot,
}

impl DeviceClass {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
            Self::Bot => "bot",
        }
    }
}

/// Browser family of a visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BrowserFamily {
    Chrome,
    Firefox,
    Safari,
    Edge,
    Opera,
    #[default]
    Other,
}

impl BrowserFamily {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Safari => "safari",
            Self::Edge => "edge",
            Self::Opera => "opera",
            Self::Other => "other",
        }
    }
}

/// Operating system family of a visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OsFamily {
    Windows,
    MacOs,
    Ios,
    Android,
    Linux,
    #[default]
    Other,
}

impl OsFamily {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Linux => "linux",
            Self::Other => "other",
        }
    }
}

macro_rules! impl_display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

impl_display_as_str!(DeviceClass, BrowserFamily, OsFamily);

/// Coarse client classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientHints {
    pub device: DeviceClass,
    pub browser: BrowserFamily,
    pub os: OsFamily,
}

impl ClientHints {
    /// Classify a raw user-agent string
    #[must_use]
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        Self {
            device: device_class(&ua),
            browser: browser_family(&ua),
            os: os_family(&ua),
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn device_class(ua: &str) -> DeviceClass {
    if contains_any(ua, &["bot", "crawler", "spider", "slurp"]) {
        DeviceClass::Bot
    } else if contains_any(ua, &["ipad", "tablet"]) || (ua.contains("android") && !ua.contains("mobile")) {
        DeviceClass::Tablet
    } else if contains_any(ua, &["mobi", "iphone", "ipod", "android"]) {
        DeviceClass::Mobile
    } else {
        DeviceClass::Desktop
    }
}

// Order matters: Edge and Opera carry "chrome/", Chrome carries "safari/".
fn browser_family(ua: &str) -> BrowserFamily {
    if contains_any(ua, &["edg/", "edge/", "edga/", "edgios/"]) {
        BrowserFamily::Edge
    } else if contains_any(ua, &["opr/", "opera"]) {
        BrowserFamily::Opera
    } else if contains_any(ua, &["chrome/", "crios/", "chromium/"]) {
        BrowserFamily::Chrome
    } else if contains_any(ua, &["firefox/", "fxios/"]) {
        BrowserFamily::Firefox
    } else if ua.contains("safari/") {
        BrowserFamily::Safari
    } else {
        BrowserFamily::Other
    }
}

// iOS agents mention "Mac OS X", Android agents mention "Linux".
fn os_family(ua: &str) -> OsFamily {
    if ua.contains("windows") {
        OsFamily::Windows
    } else if contains_any(ua, &["iphone", "ipad", "ipod"]) {
        OsFamily::Ios
    } else if contains_any(ua, &["mac os x", "macintosh"]) {
        OsFamily::MacOs
    } else if ua.contains("android") {
        OsFamily::Android
    } else if ua.contains("linux") {
        OsFamily::Linux
    } else {
        OsFamily::Other
    }
}
