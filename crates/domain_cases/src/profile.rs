//! User profiles and roles

use serde::{Deserialize, Serialize};

use core_kernel::ProfileId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Supervisor,
    CaseManager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
            Role::CaseManager => "case_manager",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "supervisor" => Ok(Role::Supervisor),
            "case_manager" => Ok(Role::CaseManager),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

/// Profile of an authenticated user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

impl Profile {
    pub fn new(id: ProfileId, full_name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            email: email.into(),
            role,
        }
    }

    pub fn can_delete_case(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Supervisor)
    }

    pub fn can_write_supervisor_notes(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Supervisor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_manager_cannot_delete() {
        let p = Profile::new(ProfileId::new(), "Jo", "jo@example.com", Role::CaseManager);
        assert!(!p.can_delete_case());
        assert!(!p.can_write_supervisor_notes());
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Supervisor, Role::CaseManager] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }
}
