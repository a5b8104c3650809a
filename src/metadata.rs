//! What the adapter advertises to the federation host.

use crate::render::{strings, Locale};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

pub const AUTHENTICATION_METHOD: &str = "http://schemas.microsoft.com/ws/2012/12/authmethod/otp";
pub const AUTHENTICATION_METHOD_CLAIM_TYPE: &str =
    "http://schemas.microsoft.com/ws/2008/06/identity/claims/authenticationmethod";
pub const UPN_CLAIM_TYPE: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/upn";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claim {
    #[serde(rename = "type")]
    pub claim_type: String,
    pub value: String,
}

/// The one claim issued when a ceremony completes.
#[must_use]
pub fn authentication_method_claim() -> Claim {
    Claim {
        claim_type: AUTHENTICATION_METHOD_CLAIM_TYPE.to_string(),
        value: AUTHENTICATION_METHOD.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdapterMetadata {
    pub admin_name: String,
    pub authentication_methods: Vec<String>,
    pub identity_claims: Vec<String>,
    /// Language culture identifiers.
    pub available_lcids: Vec<u32>,
    /// Keyed by language tag.
    pub friendly_names: BTreeMap<String, String>,
    pub descriptions: BTreeMap<String, String>,
    pub requires_identity: bool,
}

impl AdapterMetadata {
    #[must_use]
    pub fn new() -> Self {
        let per_locale = |pick: fn(Locale) -> &'static str| {
            Locale::ALL
                .into_iter()
                .map(|locale| (locale.tag().to_string(), pick(locale).to_string()))
                .collect::<BTreeMap<_, _>>()
        };

        Self {
            admin_name: strings(Locale::default()).admin_name.to_string(),
            authentication_methods: vec![AUTHENTICATION_METHOD.to_string()],
            identity_claims: vec![UPN_CLAIM_TYPE.to_string()],
            available_lcids: Locale::ALL.into_iter().map(Locale::lcid).collect(),
            friendly_names: per_locale(|locale| strings(locale).friendly_name),
            descriptions: per_locale(|locale| strings(locale).description),
            requires_identity: true,
        }
    }
}

impl Default for AdapterMetadata {
    fn default() -> Self {
        Self::new()
    }
}
