//! Login gate and the single active session record.
//!
//! This is a demo credential scheme, not real authentication: employees
//! log in with the last four characters of their id.

use crate::models::{CurrentUser, Employee, Role};
use crate::store::{Collection, CollectionStore, CollectionStoreExt, StoreResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const EMPLOYEE_PASSWORD_LEN: usize = 4;

/// The one credential the admin role accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCredential {
    pub username: String,
    pub password: String,
}

impl Default for AdminCredential {
    fn default() -> Self {
        AdminCredential {
            username: "admin".into(),
            password: "admin123".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Success(CurrentUser),
    InvalidCredentials { message: String },
}

impl LoginOutcome {
    fn rejected() -> Self {
        LoginOutcome::InvalidCredentials {
            message: INVALID_CREDENTIALS.to_string(),
        }
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        match self {
            LoginOutcome::Success(user) => Some(user),
            LoginOutcome::InvalidCredentials { .. } => None,
        }
    }
}

pub struct SessionGate {
    store: Arc<dyn CollectionStore>,
    admin: AdminCredential,
}

impl SessionGate {
    pub fn new(store: Arc<dyn CollectionStore>, admin: AdminCredential) -> Self {
        SessionGate { store, admin }
    }

    /// Check credentials for `role`. On success the session record is
    /// written and returned; a wrong password is an outcome, not an error.
    pub fn login(&self, role: Role, username: &str, password: &str) -> StoreResult<LoginOutcome> {
        let user = match role {
            Role::Admin => self.admin_login(username, password),
            Role::Employee => self.employee_login(username, password)?,
        };
        let Some(user) = user else {
            tracing::info!(?role, username, "login rejected");
            return Ok(LoginOutcome::rejected());
        };

        self.store.write_one(Collection::CurrentUser, &user)?;
        tracing::info!(user_id = %user.id, ?role, "logged in");
        Ok(LoginOutcome::Success(user))
    }

    fn admin_login(&self, username: &str, password: &str) -> Option<CurrentUser> {
        (username == self.admin.username && password == self.admin.password).then(|| CurrentUser {
            id: "admin".into(),
            name: "Admin User".into(),
            role: Role::Admin,
            email: "admin@smartoffice.com".into(),
        })
    }

    fn employee_login(&self, username: &str, password: &str) -> StoreResult<Option<CurrentUser>> {
        let employees: Vec<Employee> = self.store.read(Collection::Employees)?;
        let Some(employee) = employees.iter().find(|e| e.email == username || e.id == username) else {
            return Ok(None);
        };
        if password != id_suffix(&employee.id) {
            return Ok(None);
        }
        Ok(Some(CurrentUser {
            id: employee.id.clone(),
            name: employee.name.clone(),
            role: Role::Employee,
            email: employee.email.clone(),
        }))
    }

    pub fn logout(&self) -> StoreResult<()> {
        self.store.remove(Collection::CurrentUser.key())
    }

    pub fn current_user(&self) -> StoreResult<Option<CurrentUser>> {
        self.store.read_one(Collection::CurrentUser)
    }

    /// True if someone is logged in and, when `required` is given, holds
    /// that role.
    pub fn authorize(&self, required: Option<Role>) -> StoreResult<bool> {
        Ok(match self.current_user()? {
            None => false,
            Some(user) => required.map_or(true, |role| user.role == role),
        })
    }
}

/// Last four characters of an employee id (the whole id if shorter).
fn id_suffix(id: &str) -> &str {
    let cut = id
        .char_indices()
        .rev()
        .nth(EMPLOYEE_PASSWORD_LEN - 1)
        .map_or(0, |(i, _)| i);
    &id[cut..]
}
