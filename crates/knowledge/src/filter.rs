//! Metadata filters for vector search.
//!
//! A filter is a conjunction of equality predicates. Values are compared in
//! normalized form, so "Portal Web Corporativo" matches "portal web corporativo".

use crate::document::{DocumentMetadata, DocumentType, MetadataField};
use crate::normalize::normalize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub field: MetadataField,
    /// Normalized expected value
    pub value: String,
}

impl Predicate {
    pub fn matches(&self, metadata: &DocumentMetadata) -> bool {
        metadata
            .get(self.field)
            .map(|actual| normalize(actual) == self.value)
            .unwrap_or(false)
    }
}

/// Conjunction of metadata equality predicates, always scoped to one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    /// Filter matching every document of `doc_type`.
    pub fn of_type(doc_type: DocumentType) -> Self {
        Self {
            predicates: vec![Predicate {
                field: MetadataField::Type,
                value: normalize(doc_type.as_str()),
            }],
        }
    }

    /// Add `field == value`.
    pub fn and(mut self, field: MetadataField, value: impl AsRef<str>) -> Self {
        self.predicates.push(Predicate {
            field,
            value: normalize(value.as_ref()),
        });
        self
    }

    /// Add `field == value` only when a value is present.
    pub fn and_opt(self, field: MetadataField, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.and(field, v),
            None => self,
        }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn matches(&self, metadata: &DocumentMetadata) -> bool {
        self.predicates.iter().all(|p| p.matches(metadata))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, predicate) in self.predicates.iter().enumerate() {
            if i > 0 {
                f.write_str(" && ")?;
            }
            write!(f, "{} == '{}'", predicate.field, predicate.value)?;
        }
        Ok(())
    }
}
