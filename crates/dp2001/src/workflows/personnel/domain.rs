use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the store when an employee record is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PreValidationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionRequestId(pub u64);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PreValidationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ActionRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four personnel actions a DP-2001 filing can cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Hire,
    Transfer,
    TitleChange,
    Termination,
}

impl ActionType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hire => "hire",
            Self::Transfer => "transfer",
            Self::TitleChange => "title_change",
            Self::Termination => "termination",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    Inactive,
}

impl EmployeeStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// Status of the approval gate that must clear before a DP-2001 can be filed.
///
/// `Pending` is the only state with outgoing edges; `Approved` and `Rejected`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreValidationStatus {
    Pending,
    Approved,
    Rejected,
}

impl PreValidationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// One-way edges: `pending -> approved` and `pending -> rejected`.
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }
}

/// Lifecycle of a DP-2001 action request.
///
/// The chain is strictly forward: `submitted -> processing`, then either
/// `processing -> completed` or `processing -> rejected`. Self edges and
/// skips are invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionRequestStatus {
    Submitted,
    Processing,
    Completed,
    Rejected,
}

impl ActionRequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }

    pub const fn can_advance_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Submitted, Self::Processing)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Rejected)
        )
    }
}

/// Personnel record referenced by pre-validations and action requests.
/// Create-once, read-many; the workflow never mutates employees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub title: String,
    pub location: String,
    #[serde(rename = "union")]
    pub union_affiliation: Option<String>,
    pub salary_step: Option<String>,
    pub status: EmployeeStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub title: String,
    pub location: String,
    #[serde(rename = "union")]
    pub union_affiliation: Option<String>,
    pub salary_step: Option<String>,
}

/// Approval gate for one action type against one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreValidation {
    pub id: PreValidationId,
    pub employee_id: EmployeeId,
    pub action_type: ActionType,
    pub status: PreValidationStatus,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPreValidation {
    pub employee_id: EmployeeId,
    pub action_type: ActionType,
    pub comments: Option<String>,
}

/// The DP-2001 filing itself. `prevalidation_id` is an id-based foreign key;
/// the approval precondition is checked at creation time only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub id: ActionRequestId,
    pub employee_id: EmployeeId,
    pub prevalidation_id: PreValidationId,
    pub action_type: ActionType,
    pub status: ActionRequestStatus,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActionRequest {
    pub employee_id: EmployeeId,
    pub prevalidation_id: PreValidationId,
    pub action_type: ActionType,
    pub comments: Option<String>,
}
