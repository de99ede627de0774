use crate::Page;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub job_title: String,
    pub keywords: Vec<String>,
    pub twitter_handle: String,
    pub og_image: String,
    pub theme_color: String,
    pub same_as: Vec<String>,
    pub knows_about: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://alihassan.dev".to_string(),
            title: "Ali Hassan - AI & IT Solutions Developer".to_string(),
            description: "Turning ideas into secure, privacy-first digital solutions. Specializing in AI, automation, and modern web development.".to_string(),
            author: "Ali Hassan".to_string(),
            job_title: "AI & IT Solutions Developer".to_string(),
            keywords: [
                "AI",
                "IT Solutions",
                "Web Development",
                "Automation",
                "Docker",
                "Python",
                "JavaScript",
                "Ali Hassan",
            ]
            .map(String::from)
            .to_vec(),
            twitter_handle: "@alihassan".to_string(),
            og_image: "/img/og-image.jpg".to_string(),
            theme_color: "#1E90FF".to_string(),
            same_as: vec![
                "https://linkedin.com/in/ali-hassan".to_string(),
                "https://github.com/ali-hassan".to_string(),
            ],
            knows_about: [
                "Artificial Intelligence",
                "Web Development",
                "Automation",
                "Docker",
                "Python",
                "JavaScript",
                "System Integration",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaTag {
    /// `name` or `property`, as the tag would be written in HTML.
    pub attribute: &'static str,
    pub key: String,
    pub content: String,
}

impl MetaTag {
    fn name(key: &str, content: impl Into<String>) -> Self {
        Self {
            attribute: "name",
            key: key.to_string(),
            content: content.into(),
        }
    }

    fn property(key: &str, content: impl Into<String>) -> Self {
        Self {
            attribute: "property",
            key: key.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeoMetadata {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    pub meta: Vec<MetaTag>,
    pub structured_data: serde_json::Value,
}

impl SeoMetadata {
    pub fn for_page(site: &SiteConfig, page: Page) -> Self {
        let base = site.base_url.trim_end_matches('/');
        let canonical_url = format!("{base}{}", page.path());
        let image = format!("{base}{}", site.og_image);

        let meta = vec![
            MetaTag::name("description", site.description.clone()),
            MetaTag::name("keywords", site.keywords.join(", ")),
            MetaTag::name("author", site.author.clone()),
            MetaTag::name("robots", "index, follow"),
            MetaTag::property("og:type", "website"),
            MetaTag::property("og:title", site.title.clone()),
            MetaTag::property("og:description", site.description.clone()),
            MetaTag::property("og:url", canonical_url.clone()),
            MetaTag::property("og:site_name", format!("{} Portfolio", site.author)),
            MetaTag::property("og:image", image.clone()),
            MetaTag::property("og:image:width", "1200"),
            MetaTag::property("og:image:height", "630"),
            MetaTag::name("twitter:card", "summary_large_image"),
            MetaTag::name("twitter:title", site.title.clone()),
            MetaTag::name("twitter:description", site.description.clone()),
            MetaTag::name("twitter:image", image),
            MetaTag::name("twitter:creator", site.twitter_handle.clone()),
            MetaTag::name("theme-color", site.theme_color.clone()),
        ];

        let structured_data = json!({
            "@context": "https://schema.org",
            "@type": "Person",
            "name": site.author,
            "url": site.base_url,
            "jobTitle": site.job_title,
            "description": site.description,
            "sameAs": site.same_as,
            "knowsAbout": site.knows_about,
        });

        Self {
            title: site.title.clone(),
            description: site.description.clone(),
            canonical_url,
            meta,
            structured_data,
        }
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.meta
            .iter()
            .find(|m| m.key == key)
            .map(|m| m.content.as_str())
    }
}
