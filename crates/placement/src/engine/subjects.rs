use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Short uppercase subject identifier such as `ENG` or `MATH`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SubjectCode(String);

impl SubjectCode {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SubjectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SubjectCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SubjectCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SubjectCode {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<SubjectCode> for String {
    fn from(code: SubjectCode) -> Self {
        code.0
    }
}

/// Whether a subject always counts toward the aggregate or competes for an elective slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Core,
    Elective,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectInfo {
    pub code: SubjectCode,
    pub name: String,
    pub kind: SubjectKind,
    /// Alternate column headings seen on imported score sheets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl SubjectInfo {
    pub fn core(code: &str, name: &str) -> Self {
        Self {
            code: SubjectCode::new(code),
            name: name.to_string(),
            kind: SubjectKind::Core,
            aliases: Vec::new(),
        }
    }

    pub fn elective(code: &str, name: &str) -> Self {
        Self {
            code: SubjectCode::new(code),
            name: name.to_string(),
            kind: SubjectKind::Elective,
            aliases: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    fn answers_to(&self, label: &str) -> bool {
        let wanted = normalize_label(label);
        normalize_label(self.code.as_str()) == wanted
            || normalize_label(&self.name) == wanted
            || self
                .aliases
                .iter()
                .any(|alias| normalize_label(alias) == wanted)
    }
}

/// Recognized subjects and their core/elective classification.
///
/// Codes missing from the catalog are treated as electives, so a school can
/// add an extra elective without touching configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectCatalog {
    subjects: Vec<SubjectInfo>,
}

impl SubjectCatalog {
    pub fn new(subjects: Vec<SubjectInfo>) -> Self {
        Self { subjects }
    }

    /// The ten mock subjects written for the BECE.
    pub fn bece() -> Self {
        Self::new(vec![
            SubjectInfo::core("ENG", "English Language"),
            SubjectInfo::core("MATH", "Mathematics"),
            SubjectInfo::core("SCI", "Science"),
            SubjectInfo::core("SOC", "Social Studies"),
            SubjectInfo::elective("COMP", "Computing"),
            SubjectInfo::elective("RME", "Religious and Moral Education"),
            SubjectInfo::elective("CTECH", "Career Technology"),
            SubjectInfo::elective("CAD", "Creative Arts and Design"),
            SubjectInfo::elective("GHL", "Ghanaian Language (Asante Twi)")
                .with_alias("Ghanaian Language"),
            SubjectInfo::elective("FRN", "French"),
        ])
    }

    pub fn subjects(&self) -> &[SubjectInfo] {
        &self.subjects
    }

    pub fn core_codes(&self) -> impl Iterator<Item = &SubjectCode> {
        self.subjects
            .iter()
            .filter(|subject| subject.kind == SubjectKind::Core)
            .map(|subject| &subject.code)
    }

    pub fn kind_of(&self, code: &str) -> SubjectKind {
        self.subjects
            .iter()
            .find(|subject| subject.code.as_str() == code)
            .map(|subject| subject.kind)
            .unwrap_or(SubjectKind::Elective)
    }

    pub fn is_core(&self, code: &str) -> bool {
        self.kind_of(code) == SubjectKind::Core
    }

    /// Finds a subject by code, display name, or alias, ignoring case,
    /// spacing, and `&` versus `and`.
    pub fn lookup(&self, label: &str) -> Option<&SubjectInfo> {
        self.subjects
            .iter()
            .find(|subject| subject.answers_to(label))
    }
}

impl Default for SubjectCatalog {
    fn default() -> Self {
        Self::bece()
    }
}

pub(crate) fn normalize_label(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "").replace('&', " and ");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}
