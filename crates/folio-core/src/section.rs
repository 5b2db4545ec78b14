#![forbid(unsafe_code)]

//! Section identities.
//!
//! The page is a fixed sequence of sections. [`SectionId`] is the closed set
//! of their names; every navigation target, locator result, and active-tab
//! highlight is one of these values.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named content region of the page.
///
/// Declaration order is registration order: it is the order in which the
/// locator considers anchors and therefore decides exact-distance ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    Home,
    About,
    Resume,
    Portfolio,
    Testimonials,
    Cta,
}

/// Returned when a string does not name a section.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown section: {name:?}")]
pub struct ParseSectionError {
    pub name: String,
}

impl SectionId {
    /// All sections in registration order.
    pub const ALL: [SectionId; 6] = [
        SectionId::Home,
        SectionId::About,
        SectionId::Resume,
        SectionId::Portfolio,
        SectionId::Testimonials,
        SectionId::Cta,
    ];

    /// Stable lowercase name, also used as the `data-section` attribute value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Resume => "resume",
            Self::Portfolio => "portfolio",
            Self::Testimonials => "testimonials",
            Self::Cta => "cta",
        }
    }

    /// Whether the sidebar is shown while this section is active.
    ///
    /// The hero and the call-to-action block are full-bleed, so the sidebar
    /// is hidden for them.
    #[must_use]
    pub const fn shows_sidebar(self) -> bool {
        !matches!(self, Self::Home | Self::Cta)
    }

    /// Parse an in-page hash link such as `#about`.
    pub fn from_hash(href: &str) -> Result<Self, ParseSectionError> {
        match href.strip_prefix('#') {
            Some(name) => name.parse(),
            None => Err(ParseSectionError {
                name: href.to_owned(),
            }),
        }
    }

    /// Position in [`SectionId::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionId {
    type Err = ParseSectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ParseSectionError { name: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for id in SectionId::ALL {
            assert_eq!(id.as_str().parse::<SectionId>(), Ok(id));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "contact".parse::<SectionId>().unwrap_err();
        assert_eq!(err.name, "contact");
        assert_eq!(err.to_string(), "unknown section: \"contact\"");
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert!("About".parse::<SectionId>().is_err());
    }

    #[test]
    fn sidebar_hidden_only_for_full_bleed_sections() {
        let hidden: Vec<_> = SectionId::ALL
            .into_iter()
            .filter(|id| !id.shows_sidebar())
            .collect();
        assert_eq!(hidden, vec![SectionId::Home, SectionId::Cta]);
    }

    #[test]
    fn hash_links_resolve() {
        assert_eq!(SectionId::from_hash("#resume"), Ok(SectionId::Resume));
        assert!(SectionId::from_hash("resume").is_err());
        assert!(SectionId::from_hash("#").is_err());
    }

    #[test]
    fn index_matches_registration_order() {
        for (i, id) in SectionId::ALL.into_iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&SectionId::Testimonials).unwrap();
        assert_eq!(json, "\"testimonials\"");
        let back: SectionId = serde_json::from_str("\"cta\"").unwrap();
        assert_eq!(back, SectionId::Cta);
    }
}
