use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::AppError;

/// Profile returned to the dashboard after a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub staff_id: String,
    pub position: String,
    pub department: String,
    pub role: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// The single configured administrator account
pub struct AdminAccount {
    user: AdminUser,
    password: String,
}

impl AdminAccount {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            user: AdminUser {
                id: config.admin_username.clone(),
                username: config.admin_username.clone(),
                full_name: "IT Administrator".to_string(),
                staff_id: "EMP001".to_string(),
                position: "Administrator".to_string(),
                department: "IT".to_string(),
                role: "Admin".to_string(),
            },
            password: config.admin_password.clone(),
        }
    }

    pub fn login(&self, request: &LoginRequest) -> Result<&AdminUser, AppError> {
        if request.username.is_empty() || request.password.is_empty() {
            return Err(AppError::bad_request("Username and password are required."));
        }

        if request.username == self.user.username && request.password == self.password {
            Ok(&self.user)
        } else {
            tracing::warn!("Rejected login attempt");
            Err(AppError::unauthorized("Invalid credentials."))
        }
    }
}
