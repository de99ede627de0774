use folio_core::Translator;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConsoleCommand {
    Help,
    About,
    Ausbildung,
    Skills,
    Projects,
    Contact,
    Motivation,
    Clear,
    Exit,
    /// Anything else; keeps the text exactly as typed.
    Unknown(String),
}

/// Command names with the translation key of their help description, in the
/// order `help` lists them.
pub const COMMAND_CATALOG: &[(&str, &str)] = &[
    ("help", "cli.help"),
    ("about", "cli.aboutAli"),
    ("ausbildung", "cli.trainingGoals"),
    ("skills", "cli.listSkills"),
    ("projects", "cli.showProjects"),
    ("contact", "cli.contactInfo"),
    ("motivation", "cli.motivationForTraining"),
    ("clear", "cli.clearTerminal"),
    ("exit", "cli.closeTerminal"),
];

const ABOUT_BLOCK: &[&str] = &[
    "Ali Hassan - Angehender Fachinformatiker für Systemintegration",
    "Standort: Wiesbaden, Deutschland (65195)",
    "Status: Bereit für Ausbildungsbeginn",
    "Fokus: Systemintegration, Netzwerktechnik, Automatisierung",
    "Sprachen: Arabisch (Muttersprache), Englisch (C1), Deutsch (B2)",
];

const AUSBILDUNG_BLOCK: &[&str] = &[
    "Ausbildungsziel: Fachinformatiker für Systemintegration",
    "Verfügbarkeit: Sofort verfügbar",
    "Mobilität: Deutschlandweit",
    "Dauer: 3 Jahre (verkürzt auf 2,5 Jahre möglich)",
    "Stärken: Selbstständiges Lernen, praktische Erfahrung",
    "Motivation: Strukturierte Vertiefung vorhandener Kenntnisse",
];

const SKILLS_BLOCK: &[&str] = &[
    "Technische Fähigkeiten:",
    "  HTML/CSS: Fortgeschritten - Moderne Webentwicklung",
    "  JavaScript: Fortgeschritten - Frontend & Backend",
    "  Python: Fortgeschritten - Automatisierung & AI",
    "  React: Fortgeschritten - Frontend Framework",
    "  Node.js: Fortgeschritten - Backend Development",
    "  Docker: Fortgeschritten - Containerisierung",
    "  SQL/NoSQL: Fortgeschritten - Datenbankmanagement",
    "  LLMs/AI: Fortgeschritten - KI-Integration",
    "  n8n: Fortgeschritten - Workflow-Automatisierung",
    "  Networking: Grundlagen - Netzwerkgrundlagen",
];

const PROJECTS_BLOCK: &[&str] = &[
    "Ausgewählte Projekte:",
    "  1. Glenn Miller Klavierschule - Musikschul-Website",
    "  2. EA Solutions - Unternehmenswebsite für AI & IT",
    "  3. Falchi Dental Tech - Dentallabor-Automatisierung",
    "  4. Hotel am Kochbrunnen - Digitale Transformation",
    "  5. EA Local AI Assistant - KI-System mit Docker",
    "  6. AI Website Generator - KI-gestützte Entwicklung",
    "  7. Unit Converter - IBM Capstone Projekt",
];

const CONTACT_BLOCK: &[&str] = &[
    "Kontaktinformationen:",
    "  E-Mail: ali.m.g.hassan01@gmail.com",
    "  Telefon: +49 176 63062016",
    "  Standort: Wiesbaden, Deutschland",
    "  LinkedIn: linkedin.com/in/ali-hassan",
    "  GitHub: github.com/ali-hassan",
    "  Portfolio: Diese Website",
    "  Verfügbarkeit: Sofort für Gespräche",
];

const MOTIVATION_BLOCK: &[&str] = &[
    "Motivation für Ausbildung:",
    "  ✓ Strukturierte Vertiefung vorhandener Kenntnisse",
    "  ✓ Praktische Erfahrung in Unternehmen sammeln",
    "  ✓ Offizielle Qualifikation als Fachinformatiker",
    "  ✓ Langfristige Karriere in der IT aufbauen",
    "  ✓ Kontinuierliches Lernen und Weiterentwicklung",
    "",
    "\"Ich bringe Leidenschaft und Grundkenntnisse mit -",
    " die Ausbildung soll mir den professionellen Rahmen geben.\"",
];

impl ConsoleCommand {
    /// Trim and lower-case, then match exactly.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "help" => Self::Help,
            "about" => Self::About,
            "ausbildung" => Self::Ausbildung,
            "skills" => Self::Skills,
            "projects" => Self::Projects,
            "contact" => Self::Contact,
            "motivation" => Self::Motivation,
            "clear" => Self::Clear,
            "exit" => Self::Exit,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    pub fn name(&self) -> Option<&'static str> {
        let name = match self {
            Self::Help => "help",
            Self::About => "about",
            Self::Ausbildung => "ausbildung",
            Self::Skills => "skills",
            Self::Projects => "projects",
            Self::Contact => "contact",
            Self::Motivation => "motivation",
            Self::Clear => "clear",
            Self::Exit => "exit",
            Self::Unknown(_) => return None,
        };
        Some(name)
    }
}

/// What the controller must do with a resolved command. `Clear` and `Exit`
/// bypass the echo/append path entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Lines(Vec<String>),
    Clear,
    Exit,
}

impl Resolution {
    pub fn lines(&self) -> &[String] {
        match self {
            Self::Lines(lines) => lines,
            Self::Clear | Self::Exit => &[],
        }
    }
}

pub fn resolve(raw: &str, t: &Translator) -> Resolution {
    let block = |lines: &[&str]| Resolution::Lines(lines.iter().map(|l| l.to_string()).collect());
    match ConsoleCommand::parse(raw) {
        ConsoleCommand::Help => Resolution::Lines(help_lines(t)),
        ConsoleCommand::About => block(ABOUT_BLOCK),
        ConsoleCommand::Ausbildung => block(AUSBILDUNG_BLOCK),
        ConsoleCommand::Skills => block(SKILLS_BLOCK),
        ConsoleCommand::Projects => block(PROJECTS_BLOCK),
        ConsoleCommand::Contact => block(CONTACT_BLOCK),
        ConsoleCommand::Motivation => block(MOTIVATION_BLOCK),
        ConsoleCommand::Clear => Resolution::Clear,
        ConsoleCommand::Exit => Resolution::Exit,
        ConsoleCommand::Unknown(text) => Resolution::Lines(vec![
            format!("{}: {text}", t.t("cli.commandNotFound")),
            t.t("cli.helpForCommands").to_string(),
        ]),
    }
}

fn help_lines(t: &Translator) -> Vec<String> {
    let mut lines = Vec::with_capacity(COMMAND_CATALOG.len() + 1);
    lines.push(t.t("cli.availableCommands").to_string());
    for (name, key) in COMMAND_CATALOG {
        lines.push(format!("  {name:<12}- {}", t.t(key)));
    }
    lines
}
