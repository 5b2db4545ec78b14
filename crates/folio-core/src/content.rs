#![forbid(unsafe_code)]

//! Content registry: the static navigation, portfolio, and testimonial data.
//!
//! Everything here is `'static` and read-only. The presentation shell renders
//! it directly; the runtime only reads [`preload_urls`] to seed the splash
//! screen.

use serde::Serialize;

use crate::section::SectionId;

/// Profile photo shown in the hero and the sidebar header.
pub const HERO_IMAGE: &str = "/hero-face.jpg";
/// Substitute for a portfolio image that failed to load.
pub const PORTFOLIO_FALLBACK_IMAGE: &str =
    "https://images.unsplash.com/photo-1503023345310-bd7c1de61c7d?w=1200&q=80";
/// Substitute for the sidebar profile photo.
pub const PROFILE_FALLBACK_IMAGE: &str =
    "https://images.unsplash.com/photo-1545996124-1b2c89f8b1f1?w=800&q=80";
/// Substitute for a missing or broken testimonial avatar.
pub const AVATAR_PLACEHOLDER: &str = "/placeholder-avatar.png";
/// Downloadable resume page linked from the sidebar and resume section.
pub const RESUME_DOWNLOAD: &str = "/resume-download.html";

/// Upper bound of the testimonial rating scale.
pub const MAX_STARS: u8 = 5;

/// Icon identifiers understood by the shell's icon set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconRef {
    Home,
    User,
    FileText,
    Briefcase,
    MessageSquare,
}

/// One sidebar / mobile-menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub id: SectionId,
    pub label: &'static str,
    pub icon: IconRef,
}

/// One portfolio card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortfolioItem {
    pub id: u32,
    pub title: &'static str,
    pub category: &'static str,
    pub image_url: &'static str,
}

/// One testimonial card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Testimonial {
    pub id: u32,
    pub name: &'static str,
    pub role: &'static str,
    pub text: &'static str,
    pub rating: u8,
    pub avatar_url: Option<&'static str>,
}

impl Testimonial {
    /// Filled stars to draw, clamped to `0..=MAX_STARS`.
    #[must_use]
    pub fn stars(&self) -> u8 {
        self.rating.min(MAX_STARS)
    }

    /// Accessible label for the star row.
    #[must_use]
    pub fn stars_label(&self) -> String {
        format!("{} out of {MAX_STARS} stars", self.stars())
    }

    /// Avatar URL, falling back to the placeholder.
    #[must_use]
    pub fn avatar_or_placeholder(&self) -> &'static str {
        self.avatar_url.unwrap_or(AVATAR_PLACEHOLDER)
    }
}

pub static NAV: [NavEntry; 5] = [
    NavEntry {
        id: SectionId::Home,
        label: "HOME",
        icon: IconRef::Home,
    },
    NavEntry {
        id: SectionId::About,
        label: "ABOUT",
        icon: IconRef::User,
    },
    NavEntry {
        id: SectionId::Resume,
        label: "RESUME",
        icon: IconRef::FileText,
    },
    NavEntry {
        id: SectionId::Portfolio,
        label: "PORTFOLIO",
        icon: IconRef::Briefcase,
    },
    NavEntry {
        id: SectionId::Testimonials,
        label: "TESTIMONIALS",
        icon: IconRef::MessageSquare,
    },
];

const fn item(
    id: u32,
    title: &'static str,
    category: &'static str,
    image_url: &'static str,
) -> PortfolioItem {
    PortfolioItem {
        id,
        title,
        category,
        image_url,
    }
}

pub static PORTFOLIO: [PortfolioItem; 10] = [
    item(1, "Merry Christmas Poster", "Festive Greetings", "/portfolio/1.jpg"),
    item(2, "New Year 2026 Poster", "Festive Greetings", "/portfolio/2.jpg"),
    item(3, "Men\u{2019}s Fashion Brand Poster", "Men's Fashion", "/portfolio/3.jpg"),
    item(4, "Men\u{2019}s New Arrival \u{2013} Beach Shoot", "Men's Fashion", "/portfolio/4.jpg"),
    item(5, "Isla Vidaa \u{2013} Coming Soon", "Women's Fashion", "/portfolio/5.jpg"),
    item(6, "Isla Vidaa \u{2013} Open Now Poster", "Women's Fashion", "/portfolio/6.jpg"),
    item(7, "Isla Vidaa \u{2013} New Arrival", "Women's Fashion", "/portfolio/7.jpg"),
    item(8, "Envisage 2025 \u{2013} Tech Fest Poster", "Event Promotion", "/portfolio/8.jpg"),
    item(9, "Two Dogs \u{2013} Artistic Black & White", "Animal Photography", "/portfolio/9.jpg"),
    item(10, "Paws in Peace \u{2013} Emotional Portrait", "Animal Photography", "/portfolio/10.jpg"),
];

pub static TESTIMONIALS: [Testimonial; 4] = [
    Testimonial {
        id: 1,
        name: "Prince Kumar",
        role: "Founder & CEO of Isla vidaa",
        text: "You\u{2019}re doing amazing work, Poulami! Your ideas, energy, and commitment show in every post. Keep it up \u{2014} the brand shines because of you.",
        rating: 5,
        avatar_url: Some("/prince.jpg"),
    },
    Testimonial {
        id: 2,
        name: "Sumit Yadav",
        role: "Student Co-head of the Media Wing of Ankuran",
        text: "Impressive work, Poulami. Your attention to detail and strong creative direction are clearly visible. Your contributions are shaping the brand in a remarkable way.",
        rating: 5,
        avatar_url: Some("/sumit.jpg"),
    },
    Testimonial {
        id: 3,
        name: "Nandini Ghosh",
        role: "Student Co-head of the Social Media Wing of IIC",
        text: "You have been an outstanding member of our Social Media Team \u{2014} creative and quick with your work. Your contributions consistently improved our content and event coverage. A pleasure to work with.",
        rating: 5,
        avatar_url: Some("/raj.jpg"),
    },
    Testimonial {
        id: 4,
        name: "Subhrajeet Biswas",
        role: "Student Member of the Social Media Wing of IIC",
        text: "Outstanding work in Social Media Team. Glad to have you as a member. Working with you is a great experience  and I believe you can go more further and achieve your ambitions.",
        rating: 5,
        avatar_url: Some("/subh.jpg"),
    },
];

/// Contact channels shown in the call-to-action block, footer, and the
/// floating chat button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContactLinks {
    pub email: &'static str,
    pub phone: &'static str,
    pub whatsapp_number: &'static str,
    pub instagram: &'static str,
    pub linkedin: &'static str,
    pub behance: &'static str,
}

pub static CONTACT: ContactLinks = ContactLinks {
    email: "daspoulami2705@gmail.com",
    phone: "+917439749370",
    whatsapp_number: "917439749370",
    instagram: "https://www.instagram.com/officialpoulamii/",
    linkedin: "https://www.linkedin.com/in/poulami-das-linkdinhere/",
    behance: "https://www.behance.net/poulamidas28",
};

impl ContactLinks {
    #[must_use]
    pub fn mailto(&self) -> String {
        format!("mailto:{}", self.email)
    }

    #[must_use]
    pub fn tel(&self) -> String {
        format!("tel:{}", self.phone)
    }

    #[must_use]
    pub fn whatsapp_url(&self) -> String {
        format!("https://wa.me/{}", self.whatsapp_number)
    }
}

/// In-page links rendered in the footer.
pub static FOOTER_LINKS: [&str; 4] = ["#about", "#resume", "#portfolio", "#testimonials"];

/// Category chips shown first when present, in this order.
pub const PREFERRED_CATEGORIES: [&str; 8] = [
    "Branding",
    "Fashion",
    "Photography",
    "Editorial",
    "Events & Posters",
    "Product / UI",
    "Social Assets",
    "Animal Portraits",
];

/// The chip that disables filtering.
pub const ALL_CATEGORIES: &str = "All";

/// Filter chips for `items`: "All", then preferred categories that occur, then
/// every other category in first-seen order. Duplicates and empty category
/// names are dropped.
#[must_use]
pub fn categories(items: &[PortfolioItem]) -> Vec<&'static str> {
    let mut seen: Vec<&'static str> = Vec::new();
    for it in items {
        if !it.category.is_empty() && !seen.contains(&it.category) {
            seen.push(it.category);
        }
    }
    let mut out = vec![ALL_CATEGORIES];
    out.extend(
        PREFERRED_CATEGORIES
            .iter()
            .copied()
            .filter(|p| seen.contains(p)),
    );
    out.extend(
        seen.into_iter()
            .filter(|c| !PREFERRED_CATEGORIES.contains(c)),
    );
    out
}

/// Unique image URLs to warm before first paint: the hero photo followed by
/// every portfolio image, in first-seen order.
#[must_use]
pub fn preload_urls() -> Vec<String> {
    let mut urls: Vec<String> = vec![HERO_IMAGE.to_owned()];
    for it in &PORTFOLIO {
        if !it.image_url.is_empty() && !urls.iter().any(|u| u == it.image_url) {
            urls.push(it.image_url.to_owned());
        }
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nav_targets_are_unique_sections() {
        let mut ids: Vec<_> = NAV.iter().map(|e| e.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), NAV.len());
        assert!(!ids.contains(&SectionId::Cta));
    }

    #[test]
    fn preload_list_starts_with_hero_and_is_unique() {
        let urls = preload_urls();
        assert_eq!(urls[0], HERO_IMAGE);
        assert_eq!(urls.len(), 1 + PORTFOLIO.len());
        let mut sorted = urls.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), urls.len());
    }

    #[test]
    fn categories_keep_first_seen_order_without_preferred_matches() {
        assert_eq!(
            categories(&PORTFOLIO),
            vec![
                "All",
                "Festive Greetings",
                "Men's Fashion",
                "Women's Fashion",
                "Event Promotion",
                "Animal Photography",
            ]
        );
    }

    #[test]
    fn preferred_categories_come_first() {
        let items = [
            item(1, "a", "Zines", "/a.jpg"),
            item(2, "b", "Photography", "/b.jpg"),
            item(3, "c", "Branding", "/c.jpg"),
            item(4, "d", "", "/d.jpg"),
            item(5, "e", "Zines", "/e.jpg"),
        ];
        assert_eq!(
            categories(&items),
            vec!["All", "Branding", "Photography", "Zines"]
        );
    }

    #[test]
    fn empty_portfolio_still_offers_all() {
        assert_eq!(categories(&[]), vec!["All"]);
    }

    #[test]
    fn stars_are_clamped() {
        let mut t = TESTIMONIALS[0];
        t.rating = 9;
        assert_eq!(t.stars(), MAX_STARS);
        assert_eq!(t.stars_label(), "5 out of 5 stars");
        t.rating = 0;
        assert_eq!(t.stars(), 0);
    }

    #[test]
    fn avatar_falls_back_to_placeholder() {
        let mut t = TESTIMONIALS[1];
        t.avatar_url = None;
        assert_eq!(t.avatar_or_placeholder(), AVATAR_PLACEHOLDER);
    }

    #[test]
    fn footer_links_resolve_to_sections() {
        for href in FOOTER_LINKS {
            assert!(SectionId::from_hash(href).is_ok(), "{href}");
        }
    }

    #[test]
    fn contact_urls() {
        assert_eq!(CONTACT.whatsapp_url(), "https://wa.me/917439749370");
        assert_eq!(CONTACT.mailto(), "mailto:daspoulami2705@gmail.com");
        assert_eq!(CONTACT.tel(), "tel:+917439749370");
    }
}
