//! Remote backend: the REST server, seen from a client.

use crate::models::*;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Everything that can go wrong talking to the backend. The service
/// logs these and uses the local store, except `Rejected`: the backend
/// was reachable and said no, so there is nothing to fall back from.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("invalid backend url `{0}`")]
    InvalidBaseUrl(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{method} {path} returned {status}")]
    Status {
        method: Method,
        path: String,
        status: StatusCode,
    },

    /// 409 from the backend, with the message from its error body.
    #[error("{path} rejected: {message}")]
    Rejected { path: String, message: String },
}

impl RemoteError {
    pub fn is_rejection(&self) -> bool {
        matches!(self, RemoteError::Rejected { .. })
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub type RemoteResult<T> = Result<T, RemoteError>;

#[async_trait]
pub trait RemoteBackend: Send + Sync {
    async fn health(&self) -> RemoteResult<bool>;
    async fn list_employees(&self) -> RemoteResult<Vec<Employee>>;

    async fn list_tasks(&self, assignee: Option<&str>) -> RemoteResult<Vec<Task>>;
    async fn create_task(&self, draft: &TaskDraft) -> RemoteResult<Task>;
    async fn update_task(&self, id: TaskId, draft: &TaskDraft) -> RemoteResult<Task>;
    async fn set_task_status(&self, id: TaskId, status: TaskStatus) -> RemoteResult<Task>;
    async fn delete_task(&self, id: TaskId) -> RemoteResult<()>;

    async fn list_leaves(&self, employee_id: Option<&str>) -> RemoteResult<Vec<Leave>>;
    async fn apply_leave(&self, draft: &LeaveDraft) -> RemoteResult<Leave>;
    async fn set_leave_status(&self, id: LeaveId, status: LeaveStatus) -> RemoteResult<Leave>;
}

// ── HTTP implementation ───────────────────────────────────────

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: String,
}

impl HttpBackend {
    /// Every request is bounded by `timeout`, connect included.
    pub fn new(base_url: &str, timeout: Duration) -> RemoteResult<Self> {
        let base = base_url.trim().trim_end_matches('/');
        Url::parse(base).map_err(|_| RemoteError::InvalidBaseUrl(base_url.to_string()))?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("smartoffice/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(HttpBackend {
            client,
            base: base.to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base, path))
    }

    async fn send(&self, method: Method, path: &str, build: impl FnOnce(RequestBuilder) -> RequestBuilder) -> RemoteResult<reqwest::Response> {
        let response = build(self.request(method.clone(), path)).send().await?;
        let status = response.status();
        if status == StatusCode::CONFLICT {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status.to_string(),
            };
            return Err(RemoteError::Rejected {
                path: path.to_string(),
                message,
            });
        }
        if !status.is_success() {
            return Err(RemoteError::Status {
                method,
                path: path.to_string(),
                status,
            });
        }
        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> RemoteResult<T> {
        Ok(self.send(method, path, build).await?.json::<T>().await?)
    }
}

fn optional_query<'a>(name: &'a str, value: Option<&'a str>) -> Vec<(&'a str, &'a str)> {
    value.map(|v| vec![(name, v)]).unwrap_or_default()
}

#[async_trait]
impl RemoteBackend for HttpBackend {
    async fn health(&self) -> RemoteResult<bool> {
        #[derive(Deserialize)]
        struct Health {
            ok: bool,
        }
        let health: Health = self.fetch(Method::GET, "/health", |r| r).await?;
        Ok(health.ok)
    }

    async fn list_employees(&self) -> RemoteResult<Vec<Employee>> {
        self.fetch(Method::GET, "/employees", |r| r).await
    }

    async fn list_tasks(&self, assignee: Option<&str>) -> RemoteResult<Vec<Task>> {
        let query = optional_query("userId", assignee);
        self.fetch(Method::GET, "/tasks", |r| r.query(&query)).await
    }

    async fn create_task(&self, draft: &TaskDraft) -> RemoteResult<Task> {
        self.fetch(Method::POST, "/tasks", |r| r.json(draft)).await
    }

    async fn update_task(&self, id: TaskId, draft: &TaskDraft) -> RemoteResult<Task> {
        let path = format!("/tasks/{id}");
        self.fetch(Method::PUT, &path, |r| r.json(draft)).await
    }

    async fn set_task_status(&self, id: TaskId, status: TaskStatus) -> RemoteResult<Task> {
        let path = format!("/tasks/{id}/status");
        self.fetch(Method::PATCH, &path, |r| r.json(&StatusBody { status }))
            .await
    }

    async fn delete_task(&self, id: TaskId) -> RemoteResult<()> {
        let path = format!("/tasks/{id}");
        self.send(Method::DELETE, &path, |r| r).await?;
        Ok(())
    }

    async fn list_leaves(&self, employee_id: Option<&str>) -> RemoteResult<Vec<Leave>> {
        let query = optional_query("employeeId", employee_id);
        self.fetch(Method::GET, "/leaves", |r| r.query(&query)).await
    }

    async fn apply_leave(&self, draft: &LeaveDraft) -> RemoteResult<Leave> {
        self.fetch(Method::POST, "/leaves", |r| r.json(draft)).await
    }

    async fn set_leave_status(&self, id: LeaveId, status: LeaveStatus) -> RemoteResult<Leave> {
        let path = format!("/leaves/{id}/status");
        self.fetch(Method::PATCH, &path, |r| r.json(&StatusBody { status }))
            .await
    }
}
