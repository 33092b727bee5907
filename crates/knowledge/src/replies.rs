//! Fixed user-facing replies.
//!
//! Every path that does not end in a generated answer ends in one of these.

use crate::cascade::Terminal;
use crate::normalize::normalize;

pub const GREETING: &str = "Hello! I'm the internal HR assistant. I can help you with \
     questions about employees, projects, skills, departments and leave requests.";

pub const NO_DATA: &str = "I don't have enough internal information to answer that question. \
     Please contact Human Resources.";

pub const ASSISTANT_UNAVAILABLE: &str = "The assistant is not available right now. \
     Please try again later or contact Human Resources.";

const AGGREGATION_EMPLOYEES: &str = "I can't calculate the exact number of employees from \
     here. Please contact Human Resources for up-to-date headcount figures.";

const AGGREGATION_GENERIC: &str = "I can't calculate totals or counts from here. \
     Please contact Human Resources for that information.";

const NO_EMPLOYEES_FOR_PROJECT: &str =
    "I couldn't find employees assigned to that project in the company records.";

const NO_LEAVE_REQUESTS: &str = "There are no pending leave requests matching your question.";

const NO_OWN_LEAVE_REQUESTS: &str = "You have no pending leave requests.";

const PROFILE_MISSING: &str = "I couldn't find your employee profile. \
     Please contact Human Resources.";

/// Reply to a count or total question, which retrieval cannot answer.
pub fn aggregation(message: &str) -> &'static str {
    let normalized = normalize(message);
    if normalized.contains("empleados") || normalized.contains("employees") {
        AGGREGATION_EMPLOYEES
    } else {
        AGGREGATION_GENERIC
    }
}

impl Terminal {
    pub fn reply(&self) -> String {
        match self {
            Self::NoData | Self::ProjectNotFound => NO_DATA.to_string(),
            Self::NamedEmployeeNotFound(name) => format!(
                "I don't have information about an employee named {} in the company records.",
                name
            ),
            Self::NoEmployeesForProject => NO_EMPLOYEES_FOR_PROJECT.to_string(),
            Self::NoLeaveRequests => NO_LEAVE_REQUESTS.to_string(),
            Self::NoLeaveRequestsForEmployee(name) => {
                format!("There are no pending leave requests for {}.", name)
            }
            Self::NoOwnLeaveRequests => NO_OWN_LEAVE_REQUESTS.to_string(),
            Self::EmployeeProfileMissing => PROFILE_MISSING.to_string(),
        }
    }
}
