//! Indexed documents and their typed metadata.
//!
//! A [`Document`] is the unit stored in the vector index. Its metadata is a
//! tagged union keyed by `type`, so the retrieval cascade reads typed
//! fields instead of probing a loose map.

pub mod builders;
pub mod records;

pub use builders::{
    department_document, employee_document, leave_request_document, project_document,
    skill_document, snapshot_documents,
};
pub use records::{
    CompanySnapshot, DepartmentRecord, EmployeeRecord, LeaveRequestRecord, ProjectRecord,
    SkillRecord,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of the `source` tag on every document this crate builds.
pub const SOURCE_TAG: &str = "hrdesk";

/// A record stored in the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Stable `<type>:<naturalKey>` identity, equal to `metadata.entity_id`
    pub id: String,

    pub text: String,

    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn doc_type(&self) -> DocumentType {
        self.metadata.fields.doc_type()
    }
}

/// Metadata shared by all document types plus the type-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub source: String,

    pub entity_id: String,

    #[serde(flatten)]
    pub fields: TypedFields,
}

/// Type-specific metadata, serialized with a `type` discriminator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypedFields {
    #[serde(rename_all = "camelCase")]
    Employee {
        name: String,
        department: String,
        location: String,
        job_position: String,
        #[serde(default)]
        projects: Vec<ProjectRef>,
    },
    #[serde(rename_all = "camelCase")]
    Project {
        project_name: String,
        code: String,
        client: String,
        ubication: String,
    },
    Skill {
        name: String,
    },
    Department {
        name: String,
    },
    #[serde(rename_all = "camelCase")]
    LeaveRequest {
        employee_name: String,
        status: String,
        leave_type: String,
    },
}

impl TypedFields {
    pub fn doc_type(&self) -> DocumentType {
        match self {
            Self::Employee { .. } => DocumentType::Employee,
            Self::Project { .. } => DocumentType::Project,
            Self::Skill { .. } => DocumentType::Skill,
            Self::Department { .. } => DocumentType::Department,
            Self::LeaveRequest { .. } => DocumentType::LeaveRequest,
        }
    }
}

/// Project assignment embedded in employee metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRef {
    pub name: String,
    pub code: String,
    pub client: String,
    pub ubication: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Employee,
    Project,
    Skill,
    Department,
    LeaveRequest,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "EMPLOYEE",
            Self::Project => "PROJECT",
            Self::Skill => "SKILL",
            Self::Department => "DEPARTMENT",
            Self::LeaveRequest => "LEAVE_REQUEST",
        }
    }

    /// Prefix of document ids of this type.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Project => "project",
            Self::Skill => "skill",
            Self::Department => "department",
            Self::LeaveRequest => "leave",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar metadata fields a filter can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    Type,
    Source,
    EntityId,
    Name,
    Department,
    Location,
    JobPosition,
    ProjectName,
    Code,
    Client,
    Ubication,
    EmployeeName,
    Status,
    LeaveType,
}

impl MetadataField {
    /// Serialized key of the field.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Source => "source",
            Self::EntityId => "entityId",
            Self::Name => "name",
            Self::Department => "department",
            Self::Location => "location",
            Self::JobPosition => "jobPosition",
            Self::ProjectName => "projectName",
            Self::Code => "code",
            Self::Client => "client",
            Self::Ubication => "ubication",
            Self::EmployeeName => "employeeName",
            Self::Status => "status",
            Self::LeaveType => "leaveType",
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl DocumentMetadata {
    /// Value of `field`, or `None` when this document type does not carry it.
    pub fn get(&self, field: MetadataField) -> Option<&str> {
        use MetadataField as F;

        match (field, &self.fields) {
            (F::Type, fields) => Some(fields.doc_type().as_str()),
            (F::Source, _) => Some(self.source.as_str()),
            (F::EntityId, _) => Some(self.entity_id.as_str()),

            (F::Name, TypedFields::Employee { name, .. })
            | (F::Name, TypedFields::Skill { name })
            | (F::Name, TypedFields::Department { name }) => Some(name.as_str()),
            (F::Department, TypedFields::Employee { department, .. }) => Some(department.as_str()),
            (F::Location, TypedFields::Employee { location, .. }) => Some(location.as_str()),
            (F::JobPosition, TypedFields::Employee { job_position, .. }) => Some(job_position.as_str()),

            (F::ProjectName, TypedFields::Project { project_name, .. }) => Some(project_name.as_str()),
            (F::Code, TypedFields::Project { code, .. }) => Some(code.as_str()),
            (F::Client, TypedFields::Project { client, .. }) => Some(client.as_str()),
            (F::Ubication, TypedFields::Project { ubication, .. }) => Some(ubication.as_str()),

            (F::EmployeeName, TypedFields::LeaveRequest { employee_name, .. }) => {
                Some(employee_name.as_str())
            }
            (F::Status, TypedFields::LeaveRequest { status, .. }) => Some(status.as_str()),
            (F::LeaveType, TypedFields::LeaveRequest { leave_type, .. }) => Some(leave_type.as_str()),

            _ => None,
        }
    }

    /// Project assignments of an employee document; empty for other types.
    pub fn projects(&self) -> &[ProjectRef] {
        match &self.fields {
            TypedFields::Employee { projects, .. } => projects,
            _ => &[],
        }
    }
}
