/// Persisted popup state for storage.local and the rules for using it

use crate::subdomain::{extract_company_subdomain, is_valid_label};
use serde::{Deserialize, Serialize};

pub const LAST_SUBDOMAIN_KEY: &str = "lastBambooSubdomain";

/// Root storage structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredState {
    #[serde(
        rename = "lastBambooSubdomain",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_subdomain: Option<String>,
}

impl StoredState {
    pub fn with_subdomain(subdomain: impl Into<String>) -> Self {
        StoredState {
            last_subdomain: Some(subdomain.into()),
        }
    }

    /// Stored subdomain, ignoring anything that is not a hostname label
    pub fn subdomain(&self) -> Option<&str> {
        self.last_subdomain
            .as_deref()
            .filter(|label| is_valid_label(label))
    }
}

/// Where the popup's company came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanySource {
    /// The active tab is a BambooHR page; the subdomain must be persisted
    ActiveTab,
    /// Recalled from storage
    Stored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupResolution {
    /// The active tab has no readable URL and nothing is stored
    NoPage,
    /// Neither the tab nor storage names a company
    NeedsBambooPage,
    Company {
        subdomain: String,
        source: CompanySource,
    },
}

impl PopupResolution {
    pub fn status_text(&self) -> String {
        match self {
            PopupResolution::NoPage => "Unable to detect current page".to_string(),
            PopupResolution::NeedsBambooPage => {
                "Navigate to a BambooHR page to use this extension.".to_string()
            }
            PopupResolution::Company {
                subdomain,
                source: CompanySource::ActiveTab,
            } => format!("Connected to {}.bamboohr.com", subdomain),
            PopupResolution::Company {
                subdomain,
                source: CompanySource::Stored,
            } => format!("Company: {}.bamboohr.com", subdomain),
        }
    }

    /// State to write back, if the resolution overwrites storage
    pub fn to_persist(&self) -> Option<StoredState> {
        match self {
            PopupResolution::Company {
                subdomain,
                source: CompanySource::ActiveTab,
            } => Some(StoredState::with_subdomain(subdomain.clone())),
            _ => None,
        }
    }

    pub fn subdomain(&self) -> Option<&str> {
        match self {
            PopupResolution::Company { subdomain, .. } => Some(subdomain),
            _ => None,
        }
    }
}

/// Company named by the active tab, if it is a BambooHR page
///
/// Storage only needs reading when this is None.
pub fn tab_company(tab_url: Option<&str>) -> Option<String> {
    tab_url.and_then(extract_company_subdomain)
}

/// Decide which company the popup links to
///
/// The active tab always wins over storage. Storage is consulted when the tab
/// is not a BambooHR page or its URL cannot be read.
pub fn resolve_company(tab_url: Option<&str>, stored: &StoredState) -> PopupResolution {
    if let Some(subdomain) = tab_company(tab_url) {
        return PopupResolution::Company {
            subdomain,
            source: CompanySource::ActiveTab,
        };
    }

    match (stored.subdomain(), tab_url.filter(|u| !u.is_empty())) {
        (Some(subdomain), _) => PopupResolution::Company {
            subdomain: subdomain.to_string(),
            source: CompanySource::Stored,
        },
        (None, Some(_)) => PopupResolution::NeedsBambooPage,
        (None, None) => PopupResolution::NoPage,
    }
}
