use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Locale {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "sv-SE")]
    SvSe,
}

impl Locale {
    pub const ALL: [Self; 2] = [Self::EnUs, Self::SvSe];

    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::SvSe => "sv-SE",
        }
    }

    /// Windows language culture identifier.
    #[must_use]
    pub fn lcid(self) -> u32 {
        match self {
            Self::EnUs => 1033,
            Self::SvSe => 1053,
        }
    }

    #[must_use]
    pub fn from_lcid(lcid: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|locale| locale.lcid() == lcid)
    }

    /// Best match for an optional language tag, falling back to `en-US`.
    #[must_use]
    pub fn negotiate(tag: Option<&str>) -> Self {
        tag.and_then(|tag| tag.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let language = value
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();

        match language.as_str() {
            "en" => Ok(Self::EnUs),
            "sv" => Ok(Self::SvSe),
            _ => Err(format!("unsupported locale: {value}")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug)]
pub struct Strings {
    pub admin_name: &'static str,
    pub friendly_name: &'static str,
    pub description: &'static str,
    pub page_title: &'static str,
    pub heading: &'static str,
    pub instructions: &'static str,
    pub open_app: &'static str,
    pub continue_label: &'static str,
    pub error_heading: &'static str,
    pub support_label: &'static str,
}

static EN_US: Strings = Strings {
    admin_name: "Freja eID Authentication Provider",
    friendly_name: "Freja eID",
    description: "Sign in with the Freja eID mobile app",
    page_title: "Freja eID sign in",
    heading: "Confirm the sign in in Freja eID",
    instructions: "Open the Freja eID app on your phone or scan the QR code, approve the request and press Continue.",
    open_app: "Open Freja eID on this device",
    continue_label: "Continue",
    error_heading: "Sign in with Freja eID failed",
    support_label: "Support:",
};

static SV_SE: Strings = Strings {
    admin_name: "Freja eID-autentiseringsprovider",
    friendly_name: "Freja eID",
    description: "Logga in med mobilappen Freja eID",
    page_title: "Inloggning med Freja eID",
    heading: "Bekräfta inloggningen i Freja eID",
    instructions: "Öppna Freja eID-appen i din telefon eller skanna QR-koden, godkänn begäran och tryck på Fortsätt.",
    open_app: "Öppna Freja eID på den här enheten",
    continue_label: "Fortsätt",
    error_heading: "Inloggningen med Freja eID misslyckades",
    support_label: "Support:",
};

#[must_use]
pub fn strings(locale: Locale) -> &'static Strings {
    match locale {
        Locale::EnUs => &EN_US,
        Locale::SvSe => &SV_SE,
    }
}
