//! Role-based access rules for front-office actions.
//!
//! Both roles share patient care chores; the receptionist owns the cash
//! drawer and the queue head, the doctor owns the consulting room.

use thiserror::Error;

use crate::models::Role;

/// A front-office action a signed-in user can attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Register or update patient records
    ManagePatients,
    /// Read and search patient records
    ViewPatients,
    /// Issue a queue token
    IssueToken,
    /// Move a token through its lifecycle
    AdvanceToken,
    /// Read the day's queue
    ViewQueue,
    /// Create or update prescriptions
    WritePrescription,
    /// Read prescriptions
    ViewPrescriptions,
    /// Create bills, settle them, read them, export them
    ManageBilling,
    /// Compile the day sheet
    ExportDaySheet,
}

impl Action {
    fn describe(&self) -> &'static str {
        match self {
            Action::ManagePatients => "manage patient records",
            Action::ViewPatients => "view patient records",
            Action::IssueToken => "issue queue tokens",
            Action::AdvanceToken => "advance queue tokens",
            Action::ViewQueue => "view the queue",
            Action::WritePrescription => "write prescriptions",
            Action::ViewPrescriptions => "view prescriptions",
            Action::ManageBilling => "handle billing",
            Action::ExportDaySheet => "compile the day sheet",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

impl Role {
    /// Whether this role may perform the action.
    pub fn permits(&self, action: Action) -> bool {
        use Action::*;
        match self {
            Role::Doctor => matches!(
                action,
                ManagePatients
                    | ViewPatients
                    | AdvanceToken
                    | ViewQueue
                    | WritePrescription
                    | ViewPrescriptions
                    | ExportDaySheet
            ),
            Role::Receptionist => matches!(
                action,
                ManagePatients
                    | ViewPatients
                    | IssueToken
                    | ViewQueue
                    | ViewPrescriptions
                    | ManageBilling
                    | ExportDaySheet
            ),
        }
    }
}

/// Access errors.
#[derive(Error, Debug)]
pub enum AccessError {
    #[error("A {role} may not {action}")]
    Forbidden { role: Role, action: Action },
}

/// Check an action against a role, erroring on denial.
pub fn authorize(role: Role, action: Action) -> Result<(), AccessError> {
    if role.permits(action) {
        Ok(())
    } else {
        Err(AccessError::Forbidden { role, action })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_actions() {
        for role in [Role::Doctor, Role::Receptionist] {
            assert!(role.permits(Action::ManagePatients));
            assert!(role.permits(Action::ViewPatients));
            assert!(role.permits(Action::ViewQueue));
            assert!(role.permits(Action::ViewPrescriptions));
            assert!(role.permits(Action::ExportDaySheet));
        }
    }

    #[test]
    fn test_receptionist_owns_desk_and_drawer() {
        assert!(Role::Receptionist.permits(Action::IssueToken));
        assert!(Role::Receptionist.permits(Action::ManageBilling));
        assert!(!Role::Doctor.permits(Action::IssueToken));
        assert!(!Role::Doctor.permits(Action::ManageBilling));
    }

    #[test]
    fn test_doctor_owns_consulting_room() {
        assert!(Role::Doctor.permits(Action::AdvanceToken));
        assert!(Role::Doctor.permits(Action::WritePrescription));
        assert!(!Role::Receptionist.permits(Action::AdvanceToken));
        assert!(!Role::Receptionist.permits(Action::WritePrescription));
    }

    #[test]
    fn test_authorize_error_names_both_sides() {
        let err = authorize(Role::Doctor, Action::IssueToken).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("doctor"));
        assert!(message.contains("issue queue tokens"));
    }
}
