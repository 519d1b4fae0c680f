//! `<meta>` descriptor constructors.
//!
//! ```ignore
//! ctx.meta(meta::description("A small site"));
//! for robot in meta::robots_directive(false, meta::DEFAULT_BOTS) {
//!     ctx.meta(robot);
//! }
//! ```

use crate::html::MetaAttrs;

/// Well-known meta names and properties.
pub mod names {
    pub const DESCRIPTION: &str = "description";
    pub const VIEWPORT: &str = "viewport";
    pub const CHARSET: &str = "charset";
    pub const ROBOTS: &str = "robots";
    pub const AUTHOR: &str = "author";
    pub const OG_TITLE: &str = "og:title";
    pub const OG_DESCRIPTION: &str = "og:description";
    pub const OG_IMAGE: &str = "og:image";
    pub const OG_URL: &str = "og:url";
    pub const TWITTER_CARD: &str = "twitter:card";
    pub const TWITTER_TITLE: &str = "twitter:title";
    pub const TWITTER_DESCRIPTION: &str = "twitter:description";
}

/// Crawlers addressed by [`robots_directive`] when no list is given.
pub const DEFAULT_BOTS: &[&str] = &[
    "slurp",
    "exabot",
    "yandex",
    "bingbot",
    "googlebot",
    "duckduckbot",
    "baiduspider",
    "sogouspider",
];

pub const DEFAULT_CHARSET: &str = "utf-8";
pub const DEFAULT_VIEWPORT: &str = "width=device-width, initial-scale=1";

/// `twitter:card` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwitterCard {
    Summary,
    SummaryLargeImage,
}

impl TwitterCard {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::SummaryLargeImage => "summary_large_image",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "summary" => Some(Self::Summary),
            "summary_large_image" => Some(Self::SummaryLargeImage),
            _ => None,
        }
    }
}

pub fn description(content: impl Into<String>) -> MetaAttrs {
    MetaAttrs::named(names::DESCRIPTION, content)
}

pub fn charset(value: impl Into<String>) -> MetaAttrs {
    MetaAttrs {
        charset: Some(value.into()),
        ..MetaAttrs::default()
    }
}

pub fn viewport(content: impl Into<String>) -> MetaAttrs {
    MetaAttrs::named(names::VIEWPORT, content)
}

pub fn og_title(content: impl Into<String>) -> MetaAttrs {
    MetaAttrs::property(names::OG_TITLE, content)
}

pub fn og_description(content: impl Into<String>) -> MetaAttrs {
    MetaAttrs::property(names::OG_DESCRIPTION, content)
}

pub fn og_image(url: impl Into<String>) -> MetaAttrs {
    MetaAttrs::property(names::OG_IMAGE, url)
}

pub fn twitter_card(card: TwitterCard) -> MetaAttrs {
    MetaAttrs::named(names::TWITTER_CARD, card.as_str())
}

pub fn custom_robot(name: impl Into<String>, content: impl Into<String>) -> MetaAttrs {
    MetaAttrs::named(name, content)
}

/// One descriptor per crawler, all allowing or all denying indexing.
pub fn robots_directive<S: AsRef<str>>(allow: bool, bots: &[S]) -> Vec<MetaAttrs> {
    let content = if allow {
        "index, follow"
    } else {
        "noindex, nofollow"
    };

    bots.iter()
        .map(|bot| MetaAttrs::named(bot.as_ref(), content))
        .collect()
}
