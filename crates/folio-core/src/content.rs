use crate::{Language, Page, Translator};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const EMBEDDED_PORTFOLIO: &str = include_str!("../content/portfolio.toml");

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("portfolio content is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("portfolio content is missing {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectCategory {
    SystemIntegration,
    WebDevelopment,
    Management,
    AiDevelopment,
    Automation,
}

impl ProjectCategory {
    pub const ALL: [ProjectCategory; 5] = [
        ProjectCategory::SystemIntegration,
        ProjectCategory::WebDevelopment,
        ProjectCategory::Management,
        ProjectCategory::AiDevelopment,
        ProjectCategory::Automation,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Self::SystemIntegration => "system-integration",
            Self::WebDevelopment => "web-development",
            Self::Management => "management",
            Self::AiDevelopment => "ai-development",
            Self::Automation => "automation",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| c.slug() == value)
    }

    pub fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (Self::SystemIntegration, _) => "Systemintegration",
            (Self::WebDevelopment, Language::De) => "Webentwicklung",
            (Self::WebDevelopment, Language::En) => "Web development",
            (Self::Management, _) => "Management",
            (Self::AiDevelopment, Language::De) => "KI-Entwicklung",
            (Self::AiDevelopment, Language::En) => "AI development",
            (Self::Automation, Language::De) => "Automatisierung",
            (Self::Automation, Language::En) => "Automation",
        }
    }

    /// Cycle used by the projects page filter: all → first → … → last → all.
    pub fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Self::ALL[0]),
            Some(category) => {
                let idx = Self::ALL.iter().position(|c| *c == category).unwrap_or(0);
                Self::ALL.get(idx + 1).copied()
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub location: String,
    pub email: String,
    pub phone: String,
    pub github: String,
    pub linkedin: String,
    pub about_de: String,
    pub about_en: String,
    #[serde(default)]
    pub languages: Vec<String>,
}

impl Profile {
    pub fn about(&self, language: Language) -> &str {
        match language {
            Language::De => &self.about_de,
            Language::En => &self.about_en,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub category: ProjectCategory,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    pub title: String,
    pub issuer: String,
    pub date: String,
    #[serde(default)]
    pub verify_url: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub level: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub profile: Profile,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

impl Portfolio {
    pub fn embedded() -> Result<Self, ContentError> {
        Self::from_toml(EMBEDDED_PORTFOLIO)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ContentError> {
        let portfolio: Portfolio = toml::from_str(raw)?;
        if portfolio.profile.name.trim().is_empty() {
            return Err(ContentError::Missing("profile.name"));
        }
        if portfolio.projects.is_empty() {
            return Err(ContentError::Missing("projects"));
        }
        Ok(portfolio)
    }

    pub fn projects_in(&self, filter: Option<ProjectCategory>) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| filter.is_none_or(|c| p.category == c))
            .collect()
    }

    /// Skills grouped by category, in order of first appearance.
    pub fn skill_groups(&self) -> Vec<(&str, Vec<&Skill>)> {
        let mut groups: Vec<(&str, Vec<&Skill>)> = Vec::new();
        for skill in &self.skills {
            match groups.iter_mut().find(|(cat, _)| *cat == skill.category) {
                Some((_, members)) => members.push(skill),
                None => groups.push((skill.category.as_str(), vec![skill])),
            }
        }
        groups
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageLineKind {
    Title,
    Heading,
    Body,
    Item,
    Link,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLine {
    pub kind: PageLineKind,
    pub text: String,
}

impl PageLine {
    fn new(kind: PageLineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    fn blank() -> Self {
        Self::new(PageLineKind::Blank, "")
    }
}

/// Text content of a routed page; the shell styles it by line kind and the
/// binary prints it verbatim.
pub fn render_page(
    page: Page,
    portfolio: &Portfolio,
    t: &Translator,
    filter: Option<ProjectCategory>,
) -> Vec<PageLine> {
    use PageLineKind::*;

    let profile = &portfolio.profile;
    let mut lines = Vec::new();
    match page {
        Page::Home => {
            lines.push(PageLine::new(Title, profile.name.clone()));
            lines.push(PageLine::new(Heading, t.t("home.title")));
            lines.push(PageLine::new(Body, t.t("home.subtitle")));
            lines.push(PageLine::blank());
            lines.push(PageLine::new(Body, format!("📍 {}", profile.location)));
            lines.push(PageLine::blank());
            lines.push(PageLine::new(Item, t.t("home.keys")));
        }
        Page::Projects => {
            lines.push(PageLine::new(Title, t.t("projects.title")));
            let active = filter
                .map(|c| c.label(t.language))
                .unwrap_or_else(|| t.t("projects.all"));
            lines.push(PageLine::new(
                Item,
                format!("{}: {active}", t.t("projects.filter")),
            ));
            lines.push(PageLine::blank());
            for project in portfolio.projects_in(filter) {
                lines.push(PageLine::new(Heading, project.title.clone()));
                lines.push(PageLine::new(Body, project.description.clone()));
                lines.push(PageLine::new(
                    Item,
                    format!(
                        "{}: {}",
                        t.t("projects.technologies"),
                        project.technologies.join(", ")
                    ),
                ));
                if let Some(url) = &project.website {
                    lines.push(PageLine::new(Link, url.clone()));
                }
                if let Some(url) = &project.github {
                    lines.push(PageLine::new(Link, url.clone()));
                }
                lines.push(PageLine::blank());
            }
        }
        Page::Certificates => {
            lines.push(PageLine::new(Title, t.t("certificates.title")));
            lines.push(PageLine::blank());
            for cert in &portfolio.certificates {
                lines.push(PageLine::new(Heading, cert.title.clone()));
                lines.push(PageLine::new(
                    Body,
                    format!("{} · {}", cert.issuer, cert.date),
                ));
                if !cert.skills.is_empty() {
                    lines.push(PageLine::new(
                        Item,
                        format!("{}: {}", t.t("certificates.skills"), cert.skills.join(", ")),
                    ));
                }
                if let Some(url) = &cert.verify_url {
                    lines.push(PageLine::new(Link, url.clone()));
                }
                lines.push(PageLine::blank());
            }
        }
        Page::Skills => {
            lines.push(PageLine::new(Title, t.t("skills.title")));
            lines.push(PageLine::blank());
            for (category, skills) in portfolio.skill_groups() {
                lines.push(PageLine::new(Heading, category));
                for skill in skills {
                    lines.push(PageLine::new(
                        Item,
                        format!("  {:<12} {}", skill.name, skill.level),
                    ));
                }
                lines.push(PageLine::blank());
            }
        }
        Page::About => {
            lines.push(PageLine::new(Title, t.t("about.title")));
            lines.push(PageLine::blank());
            lines.push(PageLine::new(Body, profile.about(t.language)));
            lines.push(PageLine::blank());
            lines.push(PageLine::new(Heading, t.t("about.languages")));
            for language in &profile.languages {
                lines.push(PageLine::new(Item, format!("  {language}")));
            }
        }
        Page::Contact => {
            lines.push(PageLine::new(Title, t.t("contact.title")));
            lines.push(PageLine::new(Body, t.t("contact.subtitle")));
            lines.push(PageLine::blank());
            lines.push(PageLine::new(
                Item,
                format!("{}: {}", t.t("contact.availability"), t.t("contact.availabilityDesc")),
            ));
            lines.push(PageLine::new(
                Item,
                format!("{}: {}", t.t("contact.mobility"), t.t("contact.mobilityDesc")),
            ));
            lines.push(PageLine::blank());
            lines.push(PageLine::new(Link, format!("✉ {}", profile.email)));
            lines.push(PageLine::new(Link, format!("☎ {}", profile.phone)));
            lines.push(PageLine::new(Link, profile.github.clone()));
            lines.push(PageLine::new(Link, profile.linkedin.clone()));
        }
    }
    lines
}
