//! Rule-based intent classification.

use crate::extract;
use crate::normalize::normalize;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Coarse category a message is routed to before retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    SmallTalk,
    Aggregation,
    LeaveRequest,
    Project,
    EmployeeByProject,
    Generic,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SmallTalk => "SMALL_TALK",
            Self::Aggregation => "AGGREGATION",
            Self::LeaveRequest => "LEAVE_REQUEST",
            Self::Project => "PROJECT",
            Self::EmployeeByProject => "EMPLOYEE_BY_PROJECT",
            Self::Generic => "GENERIC",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => panic!("Intent rule regex {pattern:?} is invalid: {err}"),
    }
}

static GREETING: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b(hola|buenos dias|buenas|hello|gracias|thanks)\b"));

static COUNT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b(cuantos|cuantas|numero de|total de|how many)\b"));

static LEAVE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b(ausencias?|pendientes?|baja|vacaciones|leave requests?)\b"));

static WHO_WORKS: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"\b(quien(es)?\s+trabajan?|who\s+works?|empleados\s+(de|del|en)\s+(el\s+)?proyecto|employees\s+(of|on))\b",
    )
});

static PROJECT_WORD: LazyLock<Regex> = LazyLock::new(|| compile(r"\b(proyectos?|projects?)\b"));

static INTERROGATIVE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b(quien|quienes|who|que empleados|which employees)\b"));

static STAFFING: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"\b(trabaja\w*|participa\w*|asignad\w*|equipo|works?|working|assigned|team)\b")
});

/// True when the normalized message refers to a project by keyword, name,
/// code or client.
fn mentions_project(normalized: &str) -> bool {
    PROJECT_WORD.is_match(normalized)
        || extract::project_name(normalized).is_some()
        || extract::project_code(normalized).is_some()
        || extract::client(normalized).is_some()
}

/// "Who works on / who is assigned to" phrasing used by the project join.
pub fn is_staffing_question(message: &str) -> bool {
    let normalized = normalize(message);
    INTERROGATIVE.is_match(&normalized) && STAFFING.is_match(&normalized)
}

struct IntentRule {
    intent: Intent,
    matches: fn(&str) -> bool,
}

/// Evaluated top to bottom; first match wins.
const RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::SmallTalk,
        matches: |m| GREETING.is_match(m),
    },
    IntentRule {
        intent: Intent::Aggregation,
        matches: |m| COUNT.is_match(m),
    },
    IntentRule {
        intent: Intent::LeaveRequest,
        matches: |m| LEAVE.is_match(m),
    },
    IntentRule {
        intent: Intent::EmployeeByProject,
        matches: |m| WHO_WORKS.is_match(m) && mentions_project(m),
    },
    IntentRule {
        intent: Intent::Project,
        matches: mentions_project,
    },
];

/// Map a message to exactly one intent. Total: anything unmatched is
/// [`Intent::Generic`].
pub fn classify(message: &str) -> Intent {
    let normalized = normalize(message);
    RULES
        .iter()
        .find(|rule| (rule.matches)(&normalized))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Generic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_talk() {
        assert_eq!(classify("Hola"), Intent::SmallTalk);
        assert_eq!(classify("Buenos días!"), Intent::SmallTalk);
        assert_eq!(classify("muchas GRACIAS"), Intent::SmallTalk);
    }

    #[test]
    fn test_aggregation() {
        assert_eq!(classify("¿Cuántos empleados tenemos?"), Intent::Aggregation);
        assert_eq!(classify("Número de proyectos activos"), Intent::Aggregation);
    }

    #[test]
    fn test_greeting_beats_aggregation() {
        assert_eq!(classify("Hola, ¿cuántos empleados hay?"), Intent::SmallTalk);
    }

    #[test]
    fn test_leave_request() {
        assert_eq!(classify("¿Qué ausencias hay?"), Intent::LeaveRequest);
        assert_eq!(
            classify("Solicitudes pendientes de Ana Pérez"),
            Intent::LeaveRequest
        );
        assert_eq!(classify("vacaciones del proyecto nike"), Intent::LeaveRequest);
    }

    #[test]
    fn test_employee_by_project() {
        assert_eq!(
            classify("¿Quiénes trabajan en el Portal Web?"),
            Intent::EmployeeByProject
        );
        assert_eq!(
            classify("Who works on PRJ002?"),
            Intent::EmployeeByProject
        );
        assert_eq!(
            classify("empleados del proyecto de Nike"),
            Intent::EmployeeByProject
        );
    }

    #[test]
    fn test_project() {
        assert_eq!(classify("Lista de proyectos"), Intent::Project);
        assert_eq!(classify("¿Qué es Migración Cloud?"), Intent::Project);
        assert_eq!(classify("trabajos para Salesforce"), Intent::Project);
    }

    #[test]
    fn test_generic_default() {
        assert_eq!(classify(""), Intent::Generic);
        assert_eq!(classify("¿Quién es Ana Pérez?"), Intent::Generic);
        assert_eq!(classify("¿Quién sabe Docker?"), Intent::Generic);
    }

    #[test]
    fn test_case_insensitive_and_stable() {
        let message = "¿QUIÉNES TRABAJAN EN EL PORTAL WEB?";
        assert_eq!(classify(message), classify(&message.to_lowercase()));
        assert_eq!(classify(message), classify(message));
    }

    #[test]
    fn test_staffing_question() {
        assert!(is_staffing_question("¿Quién está asignado al proyecto PRJ001?"));
        assert!(is_staffing_question("Which employees are on the Nike team?"));
        assert!(!is_staffing_question("¿Dónde está el proyecto PRJ001?"));
    }
}
