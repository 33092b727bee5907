//! Pure functions turning source records into indexable documents.
//!
//! Text is a deterministic function of the record's fields: rebuilding an
//! unchanged record yields byte-identical text and metadata, which keeps
//! re-indexing idempotent.

use super::records::{
    CompanySnapshot, DepartmentRecord, EmployeeRecord, LeaveRequestRecord, ProjectRecord,
    SkillRecord,
};
use super::{Document, DocumentMetadata, DocumentType, ProjectRef, TypedFields, SOURCE_TAG};
use crate::normalize::slug;
use chrono::NaiveDate;

const NOT_SPECIFIED: &str = "not specified";

fn or_unspecified(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_SPECIFIED
    } else {
        value
    }
}

fn date_or_unspecified(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

fn money(amount: f64) -> String {
    format!("{:.2} €", amount)
}

fn document(doc_type: DocumentType, natural_key: &str, text: String, fields: TypedFields) -> Document {
    let id = format!("{}:{}", doc_type.id_prefix(), natural_key);
    Document {
        id: id.clone(),
        text,
        metadata: DocumentMetadata {
            source: SOURCE_TAG.to_string(),
            entity_id: id,
            fields,
        },
    }
}

fn project_period(project: &ProjectRecord) -> String {
    match project.end_date {
        Some(end) => format!("End date: {}", end),
        None => "Currently active".to_string(),
    }
}

fn employee_project_details(projects: &[ProjectRecord]) -> String {
    if projects.is_empty() {
        return "no projects currently assigned".to_string();
    }

    projects
        .iter()
        .map(|p| {
            format!(
                "{} (code {}), client: {}, location: {}, start: {}, {}",
                p.name,
                p.code,
                or_unspecified(&p.client),
                or_unspecified(&p.ubication),
                date_or_unspecified(p.start_date),
                project_period(p)
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn contract_clause(employee: &EmployeeRecord) -> String {
    let contract_type = employee.contract_type.as_deref().unwrap_or(NOT_SPECIFIED);
    let hours = employee
        .weekly_hours
        .map(|h| format!("{} weekly hours", h))
        .unwrap_or_else(|| format!("weekly hours {}", NOT_SPECIFIED));
    let period = match (employee.contract_start_date, employee.contract_end_date) {
        (Some(start), Some(end)) => format!(", running from {} to {}", start, end),
        (Some(start), None) => format!(", running since {}", start),
        (None, Some(end)) => format!(", ending on {}", end),
        (None, None) => String::new(),
    };
    let salary = employee
        .base_salary
        .map(money)
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let bonus = employee
        .bonus
        .map(|b| format!(" and a bonus of {}", money(b)))
        .unwrap_or_default();

    format!(
        "The contract is {} with {}{} and a base salary of {}{}.",
        contract_type, hours, period, salary, bonus
    )
}

pub fn employee_document(employee: &EmployeeRecord) -> Document {
    let skills = if employee.skills.is_empty() {
        "no skills explicitly recorded".to_string()
    } else {
        format!("skills in {}", employee.skills.join(", "))
    };

    let leave = if employee.leave_requests.is_empty() {
        "no leave requests recorded".to_string()
    } else {
        employee.leave_requests.join("; ")
    };

    let text = format!(
        "Company employee named {}.\n\
         Works as {} in the {} department, based in {}, and joined on {}.\n\
         Profile with {} and currently taking part in the projects: {}.\n\
         {}\n\
         Leave requests: {}.",
        employee.name,
        or_unspecified(&employee.job_position),
        or_unspecified(&employee.department),
        or_unspecified(&employee.location),
        date_or_unspecified(employee.hire_date),
        skills,
        employee_project_details(&employee.projects),
        contract_clause(employee),
        leave
    );

    let projects = employee
        .projects
        .iter()
        .map(|p| ProjectRef {
            name: p.name.clone(),
            code: p.code.clone(),
            client: p.client.clone(),
            ubication: p.ubication.clone(),
            start_date: p.start_date.map(|d| d.to_string()),
            end_date: p.end_date.map(|d| d.to_string()),
        })
        .collect();

    document(
        DocumentType::Employee,
        &employee.id.to_string(),
        text,
        TypedFields::Employee {
            name: employee.name.clone(),
            department: employee.department.clone(),
            location: employee.location.clone(),
            job_position: employee.job_position.clone(),
            projects,
        },
    )
}

pub fn project_document(project: &ProjectRecord) -> Document {
    let text = format!(
        "Internal company project named {} (code {}).\n\
         Client: {}. Main location: {}.\n\
         Project start: {}. {}.",
        project.name,
        project.code,
        or_unspecified(&project.client),
        or_unspecified(&project.ubication),
        date_or_unspecified(project.start_date),
        project_period(project)
    );

    document(
        DocumentType::Project,
        &project.code,
        text,
        TypedFields::Project {
            project_name: project.name.clone(),
            code: project.code.clone(),
            client: project.client.clone(),
            ubication: project.ubication.clone(),
        },
    )
}

pub fn skill_document(skill: &SkillRecord) -> Document {
    let text = format!(
        "Technical skill used in the company: {}.\n\
         Skill description: {}.\n\
         This skill may be associated with employees who use it in their projects.",
        skill.name,
        or_unspecified(skill.description.as_deref().unwrap_or_default())
    );

    document(
        DocumentType::Skill,
        &skill.name,
        text,
        TypedFields::Skill {
            name: skill.name.clone(),
        },
    )
}

pub fn department_document(department: &DepartmentRecord) -> Document {
    let text = format!(
        "Internal company department named {}.\n\
         Description: {}.\n\
         Several employees with different positions and skills work in this department.",
        department.name,
        or_unspecified(department.description.as_deref().unwrap_or_default())
    );

    document(
        DocumentType::Department,
        &department.name,
        text,
        TypedFields::Department {
            name: department.name.clone(),
        },
    )
}

pub fn leave_request_document(leave: &LeaveRequestRecord) -> Document {
    let text = format!(
        "Leave request.\n\
         Employee: {}.\n\
         Request status: {}.\n\
         Type: {}.\n\
         Period: {} → {}.\n\
         Comments: {}.",
        leave.employee_name,
        leave.status,
        leave.leave_type,
        leave.start_date,
        date_or_unspecified(leave.end_date),
        or_unspecified(leave.comments.as_deref().unwrap_or_default())
    );

    let natural_key = format!("{}:{}", slug(&leave.employee_name), leave.start_date);
    document(
        DocumentType::LeaveRequest,
        &natural_key,
        text,
        TypedFields::LeaveRequest {
            employee_name: leave.employee_name.clone(),
            status: leave.status.clone(),
            leave_type: leave.leave_type.clone(),
        },
    )
}

/// Build every document of a snapshot, in snapshot order grouped by type.
pub fn snapshot_documents(snapshot: &CompanySnapshot) -> Vec<Document> {
    let mut docs = Vec::with_capacity(snapshot.record_count());
    docs.extend(snapshot.employees.iter().map(employee_document));
    docs.extend(snapshot.projects.iter().map(project_document));
    docs.extend(snapshot.skills.iter().map(skill_document));
    docs.extend(snapshot.departments.iter().map(department_document));
    docs.extend(snapshot.pending_leave_requests.iter().map(leave_request_document));
    docs
}
