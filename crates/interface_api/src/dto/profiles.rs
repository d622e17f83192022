//! Profile DTOs

use serde::Deserialize;
use validator::Validate;

use domain_cases::Role;

/// Body of `PUT /me`
#[derive(Debug, Deserialize, Validate)]
pub struct ProvisionProfileRequest {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provision_request_rejects_bad_email() {
        let request: ProvisionProfileRequest =
            serde_json::from_value(json!({ "full_name": "Priya Nair", "email": "not-an-email" })).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_role_uses_snake_case() {
        let request: SetRoleRequest = serde_json::from_value(json!({ "role": "case_manager" })).unwrap();
        assert_eq!(request.role, Role::CaseManager);
    }
}
