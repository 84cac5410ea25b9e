//! Government scheme directory and the best-effort MSME portal news ticker.

use std::{sync::LazyLock, time::Duration};

use regex::Regex;
use serde::Serialize;

use crate::models::SizeCategory;

pub const MAX_NEWS_ITEMS: usize = 5;
const PORTAL_SOURCE: &str = "Official MSME Portal";
const BROWSER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// Opening or closing tag: slash, name, attributes.
static TAG_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(/?)([A-Za-z][A-Za-z0-9]*)\b([^>]*)>").expect("valid tag token pattern")
});

static CLASS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid class pattern")
});

static HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid href pattern")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub source: String,
}

impl NewsItem {
    fn cached_notice() -> Self {
        Self {
            title: "Could not reach MSME Portal live - showing cached updates.".to_string(),
            link: None,
            source: "System Cache".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsStatus {
    Live,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheme {
    pub id: &'static str,
    pub name: &'static str,
    pub eligibility: &'static str,
    pub benefit: &'static str,
    pub link: &'static str,
    pub is_live: bool,
    pub category: &'static [SizeCategory],
}

const SCHEMES: &[Scheme] = &[
    Scheme {
        id: "SCH001",
        name: "Prime Minister Employment Generation Programme (PMEGP)",
        eligibility: "Any individual above 18 years",
        benefit: "Subsidy up to 35%",
        link: "https://www.kviconline.gov.in/pmegpeportal/pmegphome/index.jsp",
        is_live: true,
        category: &[SizeCategory::Micro],
    },
    Scheme {
        id: "SCH002",
        name: "Credit Guarantee Scheme (CGTMSE)",
        eligibility: "New and existing Micro & Small Enterprises",
        benefit: "Collateral free loan up to ₹200 Lakhs",
        link: "https://www.cgtmse.in/",
        is_live: true,
        category: &[SizeCategory::Micro, SizeCategory::Small],
    },
    Scheme {
        id: "SCH003",
        name: "ZED Certification Scheme",
        eligibility: "All MSMEs with Udyam Registration",
        benefit: "Subsidy on certification cost (80/60/50%)",
        link: "https://zed.msme.gov.in/",
        is_live: true,
        category: &[SizeCategory::Micro, SizeCategory::Small, SizeCategory::Medium],
    },
];

/// Schemes open to `category`. The label is matched exactly ("Micro", not
/// "micro"); an unrecognised label matches nothing.
pub fn schemes_for(category: Option<&str>) -> Vec<Scheme> {
    SCHEMES
        .iter()
        .filter(|scheme| match category {
            None => true,
            Some(label) => scheme.category.iter().any(|c| c.as_str() == label),
        })
        .cloned()
        .collect()
}

/// Pulls ticker links out of the portal's home page: every anchor inside a
/// list item of the first element whose class list holds `scroll-text`.
pub fn parse_ticker(html: &str) -> Vec<NewsItem> {
    let Some(section) = ticker_section(html) else {
        return Vec::new();
    };

    let mut items = Vec::new();
    let mut li_depth = 0usize;
    let mut anchor: Option<(usize, Option<String>)> = None;

    for caps in TAG_TOKEN.captures_iter(section) {
        let Some(tag) = caps.get(0) else {
            continue;
        };
        let closing = &caps[1] == "/";
        match (caps[2].to_ascii_lowercase().as_str(), closing) {
            ("li", false) => li_depth += 1,
            ("li", true) => li_depth = li_depth.saturating_sub(1),
            ("a", false) if li_depth > 0 && anchor.is_none() => {
                anchor = Some((tag.end(), attr_value(&HREF, &caps[3])));
            }
            ("a", true) => {
                if let Some((start, link)) = anchor.take() {
                    let title = clean_text(&section[start..tag.start()]);
                    if !title.is_empty() {
                        items.push(NewsItem {
                            title,
                            link,
                            source: PORTAL_SOURCE.to_string(),
                        });
                    }
                }
            }
            _ => {}
        }
    }
    items
}

/// Inner markup of the ticker element, up to its matching close tag.
fn ticker_section(html: &str) -> Option<&str> {
    let mut tokens = TAG_TOKEN.captures_iter(html);
    let (name, start) = tokens.by_ref().find_map(|caps| {
        let is_ticker = &caps[1] != "/"
            && attr_value(&CLASS_ATTR, &caps[3])
                .is_some_and(|classes| classes.split_whitespace().any(|c| c == "scroll-text"));
        is_ticker.then(|| (caps[2].to_ascii_lowercase(), caps.get(0).map_or(0, |m| m.end())))
    })?;

    let mut depth = 1usize;
    for caps in tokens {
        if !caps[2].eq_ignore_ascii_case(&name) || caps[3].trim_end().ends_with('/') {
            continue;
        }
        if &caps[1] == "/" {
            depth -= 1;
            if depth == 0 {
                return caps.get(0).map(|end| &html[start..end.start()]);
            }
        } else {
            depth += 1;
        }
    }
    Some(&html[start..])
}

/// Attribute value in whichever quote style the page used.
fn attr_value(pattern: &Regex, attrs: &str) -> Option<String> {
    pattern
        .captures(attrs)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|value| value.as_str().to_string())
}

fn clean_text(fragment: &str) -> String {
    let text = TAG.replace_all(fragment, " ");
    let text = text
        .replace("&amp;", "&")
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Clone)]
pub struct SchemeFeed {
    http: reqwest::Client,
    portal_url: String,
}

impl SchemeFeed {
    pub fn new(portal_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_AGENT)
            .build()?;
        Ok(Self {
            http,
            portal_url: portal_url.into(),
        })
    }

    /// Latest ticker headlines, at most [`MAX_NEWS_ITEMS`]. Any failure
    /// yields the single cached notice instead.
    pub async fn latest_news(&self) -> (Vec<NewsItem>, NewsStatus) {
        match self.fetch_ticker().await {
            Ok(mut items) => {
                items.truncate(MAX_NEWS_ITEMS);
                (items, NewsStatus::Live)
            }
            Err(err) => {
                log::info!("scheme news skipped ({}): {}", self.portal_url, err);
                (vec![NewsItem::cached_notice()], NewsStatus::Unavailable)
            }
        }
    }

    async fn fetch_ticker(&self) -> Result<Vec<NewsItem>, reqwest::Error> {
        let html = self
            .http
            .get(&self.portal_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(parse_ticker(&html))
    }
}
