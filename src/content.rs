//! Static page copy. Kept as data so the page model is testable without a
//! window or GPU.

#[derive(Debug, Clone, Copy)]
pub struct Feature {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct PageCopy {
    pub hero_title: &'static str,
    pub hero_tagline: &'static str,
    pub call_to_action: &'static str,
    pub features: [Feature; 3],
    pub footer: &'static str,
    pub loading: &'static str,
    pub thank_you_title: &'static str,
    pub thank_you_subtitle: &'static str,
}

pub const PAGE: PageCopy = PageCopy {
    hero_title: "Save Point",
    hero_tagline: "Pioneering the future through innovative technology solutions",
    call_to_action: "Explore Our Solutions",
    features: [
        Feature {
            icon: "🤖",
            title: "AI Innovation",
            description: "Leveraging cutting-edge artificial intelligence to transform businesses",
        },
        Feature {
            icon: "💻",
            title: "Tech Solutions",
            description: "Custom software development tailored to your unique challenges",
        },
        Feature {
            icon: "🚀",
            title: "Future Ready",
            description: "Preparing your business for tomorrow's technological landscape",
        },
    ],
    footer: "© 2024 Save Point Proprietary Limited. All rights reserved.",
    loading: "Loading…",
    thank_you_title: "THANK YOU",
    thank_you_subtitle: "We'll be in touch soon...",
};

/// Page sections, top to bottom, for scrolling and reveal tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Hero,
    Features,
    Footer,
}

impl Section {
    pub const ALL: [Self; 3] = [Self::Hero, Self::Features, Self::Footer];

    /// Top edge of the section in viewport-height units.
    pub fn top_vh(self) -> f32 {
        match self {
            Self::Hero => 0.0,
            Self::Features => 1.0,
            Self::Footer => 1.8,
        }
    }

    /// Height of the section in viewport-height units.
    pub fn height_vh(self) -> f32 {
        match self {
            Self::Hero => 1.0,
            Self::Features => 0.8,
            Self::Footer => 0.25,
        }
    }
}

/// Total scrollable page height in viewport-height units.
pub fn page_height_vh() -> f32 {
    Section::ALL
        .iter()
        .map(|s| s.top_vh() + s.height_vh())
        .fold(0.0, f32::max)
}
