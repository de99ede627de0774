//! UI string table for the two supported languages.

use crate::Language;

/// `(key, german, english)`
const STRINGS: &[(&str, &str, &str)] = &[
    // navigation
    ("nav.home", "Start", "Home"),
    ("nav.projects", "Projekte", "Projects"),
    ("nav.certificates", "Zertifikate", "Certificates"),
    ("nav.skills", "Fähigkeiten", "Skills"),
    ("nav.about", "Über mich", "About"),
    ("nav.contact", "Kontakt", "Contact"),
    // cli overlay
    (
        "cli.welcome",
        "Willkommen im Ausbildungs-Terminal von Ali Hassan!",
        "Welcome to Ali Hassan's apprenticeship terminal!",
    ),
    (
        "cli.helpPrompt",
        "Geben Sie 'help' ein, um alle Befehle zu sehen.",
        "Type 'help' to see all commands.",
    ),
    ("cli.availableCommands", "Verfügbare Befehle:", "Available commands:"),
    ("cli.help", "Diese Hilfe anzeigen", "Show this help"),
    ("cli.aboutAli", "Über Ali", "About Ali"),
    ("cli.trainingGoals", "Ausbildungsziele", "Apprenticeship goals"),
    ("cli.listSkills", "Fähigkeiten auflisten", "List skills"),
    ("cli.showProjects", "Projekte anzeigen", "Show projects"),
    ("cli.contactInfo", "Kontaktinformationen", "Contact information"),
    (
        "cli.motivationForTraining",
        "Motivation für die Ausbildung",
        "Motivation for the apprenticeship",
    ),
    ("cli.clearTerminal", "Terminal leeren", "Clear terminal"),
    ("cli.closeTerminal", "Terminal schließen", "Close terminal"),
    ("cli.terminalCleared", "Terminal geleert.", "Terminal cleared."),
    ("cli.commandNotFound", "Befehl nicht gefunden", "Command not found"),
    (
        "cli.helpForCommands",
        "Geben Sie 'help' ein, um verfügbare Befehle zu sehen.",
        "Type 'help' for available commands.",
    ),
    (
        "cli.tipMessage",
        "Tipp: Drücken Sie ~, um das Terminal jederzeit zu öffnen. Esc schließt es.",
        "Tip: press ~ to open the terminal at any time. Esc closes it.",
    ),
    ("cli.placeholder", "Befehl eingeben...", "Enter a command..."),
    // chat widget
    ("chat.title", "Portfolio-Assistent", "Portfolio assistant"),
    ("chat.subtitle", "Ausbildung & Karriere", "Apprenticeship & career"),
    (
        "chat.greeting",
        "Hallo! Ich bin Alis Portfolio-Assistent. Wie kann ich helfen?",
        "Hello! I'm Ali's portfolio assistant. How can I help?",
    ),
    ("chat.placeholder", "Nachricht eingeben...", "Type a message..."),
    (
        "chat.demoMode",
        "Demo-Modus: Antworten sind vorgefertigt.",
        "Demo mode: replies are pre-written.",
    ),
    // cv control
    ("cv.download", "Lebenslauf herunterladen", "Download CV"),
    ("cv.downloading", "Wird heruntergeladen...", "Downloading..."),
    ("cv.downloaded", "Heruntergeladen!", "Downloaded!"),
    ("cv.error", "Fehler beim Herunterladen", "Download failed"),
    // contact page
    ("contact.title", "Kontakt aufnehmen", "Get in touch"),
    (
        "contact.subtitle",
        "Ich freue mich auf Ihre Nachricht zu einem Ausbildungsplatz.",
        "I look forward to hearing from you about an apprenticeship.",
    ),
    ("contact.name", "Name", "Name"),
    ("contact.email", "E-Mail", "Email"),
    ("contact.quickContact", "Schnellkontakt", "Quick contact"),
    ("contact.call", "Anrufen", "Call"),
    ("contact.openForm", "Zum Kontaktformular", "Open contact form"),
    ("contact.company", "Unternehmen", "Company"),
    ("contact.position", "Position", "Position"),
    ("contact.message", "Nachricht", "Message"),
    ("contact.send", "Nachricht senden", "Send message"),
    ("contact.sending", "Wird gesendet...", "Sending..."),
    (
        "contact.success",
        "Vielen Dank! Ihre Nachricht wurde gesendet.",
        "Thank you! Your message has been sent.",
    ),
    ("contact.nameRequired", "Name ist erforderlich", "Name is required"),
    ("contact.emailRequired", "E-Mail ist erforderlich", "Email is required"),
    (
        "contact.invalidEmail",
        "Ungültige E-Mail-Adresse",
        "Invalid email address",
    ),
    (
        "contact.messageRequired",
        "Nachricht ist erforderlich",
        "Message is required",
    ),
    (
        "contact.formHint",
        "Enter: Formular bearbeiten · Tab: nächstes Feld · Enter: senden",
        "Enter: edit form · Tab: next field · Enter: send",
    ),
    ("contact.availability", "Verfügbarkeit", "Availability"),
    (
        "contact.availabilityDesc",
        "Sofort verfügbar für eine Ausbildung",
        "Available immediately for an apprenticeship",
    ),
    ("contact.mobility", "Mobilität", "Mobility"),
    (
        "contact.mobilityDesc",
        "Deutschlandweit flexibel",
        "Flexible across Germany",
    ),
    // pages
    (
        "home.title",
        "Angehender Fachinformatiker für Systemintegration",
        "Aspiring IT specialist for system integration",
    ),
    (
        "home.subtitle",
        "Ideen in sichere, datenschutzfreundliche digitale Lösungen verwandeln.",
        "Turning ideas into secure, privacy-first digital solutions.",
    ),
    (
        "home.keys",
        "Tab: Seiten · ~: Terminal · Strg+T: Chat · F2: Thema · F3: Sprache · F4: Lebenslauf",
        "Tab: pages · ~: terminal · Ctrl+T: chat · F2: theme · F3: language · F4: CV",
    ),
    ("projects.title", "Projekte", "Projects"),
    ("projects.filter", "Filter (f)", "Filter (f)"),
    ("projects.all", "Alle", "All"),
    ("projects.technologies", "Technologien", "Technologies"),
    ("certificates.title", "Zertifikate", "Certificates"),
    ("certificates.skills", "Kompetenzen", "Skills"),
    ("skills.title", "Technische Fähigkeiten", "Technical skills"),
    ("about.title", "Über mich", "About me"),
    ("about.languages", "Sprachen", "Languages"),
    // footer / header
    ("footer.allRightsReserved", "Alle Rechte vorbehalten", "All rights reserved"),
    ("footer.connect", "Vernetzen", "Connect"),
    ("theme.light", "Hell", "Light"),
    ("theme.dark", "Dunkel", "Dark"),
];

pub fn translate(language: Language, key: &str) -> Option<&'static str> {
    STRINGS
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, de, en)| match language {
            Language::De => *de,
            Language::En => *en,
        })
}

/// Language-bound lookup handle; unknown keys echo the key itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Translator {
    pub language: Language,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        translate(self.language, key).unwrap_or(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_unique_and_translated() {
        let mut seen = HashSet::new();
        for (key, de, en) in STRINGS {
            assert!(seen.insert(*key), "duplicate key {key}");
            assert!(!de.is_empty(), "missing german text for {key}");
            assert!(!en.is_empty(), "missing english text for {key}");
        }
    }

    #[test]
    fn lookup_follows_language() {
        assert_eq!(Translator::new(Language::De).t("nav.about"), "Über mich");
        assert_eq!(Translator::new(Language::En).t("nav.about"), "About");
    }

    #[test]
    fn unknown_key_falls_back_to_key() {
        let t = Translator::new(Language::En);
        assert_eq!(t.t("nav.blog"), "nav.blog");
    }

    #[test]
    fn every_page_has_a_nav_label() {
        for page in crate::Page::ALL {
            assert!(translate(Language::De, page.nav_key()).is_some());
            assert!(translate(Language::En, page.nav_key()).is_some());
        }
    }
}
