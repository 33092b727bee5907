//! Rule and gazetteer based entity extraction.
//!
//! Every extractor is deterministic and exact-match. Gazetteer lookups run
//! on the normalized message and return the first entry (in table order)
//! whose pattern is contained in it.

use crate::normalize::normalize;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// `(pattern, canonical value)` pairs, evaluated top to bottom.
type Gazetteer = &'static [(&'static str, &'static str)];

const DEPARTMENTS: Gazetteer = &[
    ("desarrollo", "Desarrollo"),
    ("data", "Data"),
    ("marketing", "Marketing"),
    ("recursos humanos", "Recursos Humanos"),
    ("rrhh", "Recursos Humanos"),
];

const PROJECT_LOCATIONS: Gazetteer = &[
    ("madrid", "madrid"),
    ("barcelona", "barcelona"),
    ("remote", "remote"),
    ("remoto", "remote"),
    ("sevilla", "sevilla"),
];

const CLIENTS: Gazetteer = &[
    ("nike", "nike"),
    ("ibm", "ibm"),
    ("salesforce", "salesforce"),
    ("microsoft", "microsoft"),
    ("accenture", "accenture"),
];

const PROJECT_CODES: Gazetteer = &[
    ("prj001", "PRJ001"),
    ("prj002", "PRJ002"),
    ("prj003", "PRJ003"),
    ("prj004", "PRJ004"),
    ("prj005", "PRJ005"),
    ("prj006", "PRJ006"),
];

const PROJECT_NAMES: Gazetteer = &[
    ("optimizacion de procesos", "optimizacion de procesos"),
    ("desarrollo apis", "desarrollo apis"),
    ("portal web", "portal web corporativo"),
    ("migracion cloud", "migracion cloud"),
    ("sistema rrhh", "sistema rrhh"),
];

const SKILL_TERMS: &[&str] = &["docker", "kubernetes", "java", "spring", "python"];

/// Words that end a location phrase ("ubicación en Madrid y ...").
const LOCATION_STOPWORDS: &[&str] = &["y", "e", "and", "o", "del", "de", "en", "con", "que"];

static EMPLOYEE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"([A-ZÁÉÍÓÚÑ][a-záéíóúñ]+\s+[A-ZÁÉÍÓÚÑ][a-záéíóúñ]+)") {
        Ok(regex) => regex,
        Err(err) => panic!("Employee name regex is invalid: {err}"),
    }
});

static EMPLOYEE_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"ubicacion\s+en\s+([a-z ]+)") {
        Ok(regex) => regex,
        Err(err) => panic!("Employee location regex is invalid: {err}"),
    }
});

fn lookup(gazetteer: Gazetteer, normalized: &str) -> Option<String> {
    gazetteer
        .iter()
        .find(|(pattern, _)| normalized.contains(pattern))
        .map(|(_, canonical)| (*canonical).to_string())
}

/// First `Firstname Lastname` pair in the raw message.
pub fn employee_name(message: &str) -> Option<String> {
    EMPLOYEE_NAME
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// The place named after "ubicación en", up to the first connector word.
pub fn employee_location(message: &str) -> Option<String> {
    let normalized = normalize(message);
    let captured = EMPLOYEE_LOCATION
        .captures(&normalized)
        .and_then(|caps| caps.get(1))?;

    let words: Vec<&str> = captured
        .as_str()
        .split_whitespace()
        .take_while(|word| !LOCATION_STOPWORDS.contains(word))
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

pub fn department(message: &str) -> Option<String> {
    lookup(DEPARTMENTS, &normalize(message))
}

pub fn project_location(message: &str) -> Option<String> {
    lookup(PROJECT_LOCATIONS, &normalize(message))
}

pub fn client(message: &str) -> Option<String> {
    lookup(CLIENTS, &normalize(message))
}

pub fn project_code(message: &str) -> Option<String> {
    lookup(PROJECT_CODES, &normalize(message))
}

pub fn project_name(message: &str) -> Option<String> {
    lookup(PROJECT_NAMES, &normalize(message))
}

pub fn contains_skill_keyword(message: &str) -> bool {
    let normalized = normalize(message);
    SKILL_TERMS.iter().any(|term| normalized.contains(term))
}

/// Every signal extracted from one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entities {
    pub employee_name: Option<String>,
    pub employee_location: Option<String>,
    pub department: Option<String>,
    pub project_name: Option<String>,
    pub project_location: Option<String>,
    pub client: Option<String>,
    pub project_code: Option<String>,
    pub mentions_skill: bool,
}

impl Entities {
    pub fn extract(message: &str) -> Self {
        Self {
            employee_name: employee_name(message),
            employee_location: employee_location(message),
            department: department(message),
            project_name: project_name(message),
            project_location: project_location(message),
            client: client(message),
            project_code: project_code(message),
            mentions_skill: contains_skill_keyword(message),
        }
    }

    /// True when at least one project-qualifying field was found.
    pub fn has_project_filters(&self) -> bool {
        self.project_name.is_some()
            || self.project_location.is_some()
            || self.client.is_some()
            || self.project_code.is_some()
    }
}
