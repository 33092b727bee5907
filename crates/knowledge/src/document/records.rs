//! Source-of-truth records as delivered by the upstream snapshot endpoint.
//!
//! Field names follow the upstream camelCase JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub hire_date: Option<NaiveDate>,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub job_position: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, alias = "projectsInfo")]
    pub projects: Vec<ProjectRecord>,
    #[serde(default)]
    pub contract_type: Option<String>,
    #[serde(default)]
    pub weekly_hours: Option<u32>,
    #[serde(default)]
    pub contract_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub contract_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub base_salary: Option<f64>,
    #[serde(default)]
    pub bonus: Option<f64>,
    /// Human-readable summaries of the employee's leave requests
    #[serde(default)]
    pub leave_requests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub client: String,
    #[serde(default, alias = "location")]
    pub ubication: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRecord {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestRecord {
    pub employee_name: String,
    #[serde(default = "default_leave_status")]
    pub status: String,
    #[serde(rename = "type")]
    pub leave_type: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub comments: Option<String>,
}

fn default_leave_status() -> String {
    "PENDING".to_string()
}

/// Full current state of the company, fetched during sync.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySnapshot {
    #[serde(default)]
    pub employees: Vec<EmployeeRecord>,
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
    #[serde(default)]
    pub departments: Vec<DepartmentRecord>,
    #[serde(default)]
    pub skills: Vec<SkillRecord>,
    #[serde(default)]
    pub pending_leave_requests: Vec<LeaveRequestRecord>,
}

impl CompanySnapshot {
    /// Number of source records across all collections.
    pub fn record_count(&self) -> usize {
        self.employees.len()
            + self.projects.len()
            + self.departments.len()
            + self.skills.len()
            + self.pending_leave_requests.len()
    }
}
