//! Synonym expansion of the raw query before embedding search.

use crate::normalize::normalize;

/// `(trigger keywords, appended vocabulary)`; the first rule whose trigger
/// appears in the normalized query wins.
const SYNONYM_RULES: &[(&[&str], &[&str])] = &[
    (
        &["ausencia"],
        &[
            "solicitud", "ausencia", "leave", "request", "sickness", "pending", "approved",
            "vacaciones", "baja", "medica",
        ],
    ),
    (
        &["pendiente"],
        &["pending", "status", "abierto", "no", "aprobado", "solicitud"],
    ),
    (
        &["empleado"],
        &["empleado", "nombre", "departamento", "puesto"],
    ),
    (
        &["habilidad"],
        &[
            "java", "spring", "boot", "docker", "kubernetes", "postgresql", "redis", "git",
            "javascript",
        ],
    ),
    (
        &["salario", "sueldo"],
        &["salario", "sueldo", "pago", "bonus", "contrato", "permanente", "precario"],
    ),
];

/// Append domain synonyms to `query` when a topical keyword is present.
///
/// Returns the query unchanged when nothing triggers. The original text is
/// always kept as the prefix of the result.
pub fn rewrite(query: &str) -> String {
    let normalized = normalize(query);

    let Some((_, vocabulary)) = SYNONYM_RULES
        .iter()
        .find(|(triggers, _)| triggers.iter().any(|t| normalized.contains(t)))
    else {
        return query.to_string();
    };

    let expanded = format!("{} {}", query, vocabulary.join(" "));
    tracing::debug!(original = query, expanded = %expanded, "Rewrote query");
    expanded
}
