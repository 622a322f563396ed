// src/api/appwrite.rs
//
// Minimal client for the Appwrite REST API: databases, account/sessions,
// function executions.
// Authorization: X-Appwrite-Project on every request, X-Appwrite-Session
// once the user has signed in.

use std::fmt;
use std::sync::RwLock;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::User;

#[derive(Debug)]
pub enum AppwriteError {
    Http(reqwest::Error),
    NotFound { message: String },
    Unauthorized { message: String },
    Api { status: u16, error_type: String, message: String },
    InvalidResponse(String),
    /// A serverless function ran but reported `failed`.
    Execution(String),
}

impl fmt::Display for AppwriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppwriteError::Http(e) => write!(f, "http error: {e}"),
            AppwriteError::NotFound { message } => write!(f, "not found: {message}"),
            AppwriteError::Unauthorized { message } => write!(f, "unauthorized: {message}"),
            AppwriteError::Api {
                status,
                error_type,
                message,
            } => write!(
                f,
                "appwrite api error status={status} type={error_type} message={message}"
            ),
            AppwriteError::InvalidResponse(e) => write!(f, "invalid response: {e}"),
            AppwriteError::Execution(e) => write!(f, "function execution failed: {e}"),
        }
    }
}

impl std::error::Error for AppwriteError {}

impl From<reqwest::Error> for AppwriteError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Standard error body: `{"message": ..., "code": ..., "type": ...}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(rename = "type", default)]
    error_type: String,
}

fn error_from_response(status: u16, body: &str) -> AppwriteError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = if parsed.message.is_empty() {
        body.trim().to_string()
    } else {
        parsed.message
    };
    match status {
        404 => AppwriteError::NotFound { message },
        401 | 403 => AppwriteError::Unauthorized { message },
        _ => AppwriteError::Api {
            status,
            error_type: parsed.error_type,
            message,
        },
    }
}

#[derive(Debug, Deserialize)]
pub struct DocumentList<T> {
    pub total: u64,
    pub documents: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Session token, sent back as X-Appwrite-Session on later requests.
    #[serde(default)]
    pub secret: String,
}

#[derive(Debug, Deserialize)]
pub struct Execution {
    #[serde(rename = "$id")]
    pub id: String,
    pub status: String, // completed | failed | waiting | processing
    #[serde(rename = "responseBody", default)]
    pub response_body: String,
    #[serde(default)]
    pub errors: String,
}

pub struct AppwriteClient {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    session: RwLock<Option<String>>,
}

impl AppwriteClient {
    pub fn new(endpoint: impl Into<String>, project_id: impl Into<String>) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            session: RwLock::new(None),
        }
    }

    pub fn set_session(&self, secret: String) {
        let mut guard = self.session.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(secret);
    }

    pub fn clear_session(&self) {
        let mut guard = self.session.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    pub fn has_session(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .http
            .request(method, format!("{}{}", self.endpoint, path))
            .header("X-Appwrite-Project", &self.project_id);
        let session = self.session.read().unwrap_or_else(|e| e.into_inner());
        if let Some(secret) = session.as_deref() {
            req = req.header("X-Appwrite-Session", secret);
        }
        req
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, AppwriteError> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(error_from_response(status.as_u16(), &body));
        }

        serde_json::from_str::<T>(&body)
            .map_err(|e| AppwriteError::InvalidResponse(format!("{e}; body={body}")))
    }

    // --- Documents ---

    pub async fn list_documents<T: DeserializeOwned>(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[String],
    ) -> Result<DocumentList<T>, AppwriteError> {
        let mut req = self.request(
            Method::GET,
            &format!("/databases/{database_id}/collections/{collection_id}/documents"),
        );
        for query in queries {
            req = req.query(&[("queries[]", query)]);
        }
        self.send_json(req).await
    }

    pub async fn get_document<T: DeserializeOwned>(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> Result<T, AppwriteError> {
        let req = self.request(
            Method::GET,
            &format!(
                "/databases/{database_id}/collections/{collection_id}/documents/{document_id}"
            ),
        );
        self.send_json(req).await
    }

    /// Pass `"unique()"` as `document_id` to let the backend mint the id.
    pub async fn create_document<T: DeserializeOwned>(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> Result<T, AppwriteError> {
        let req = self
            .request(
                Method::POST,
                &format!("/databases/{database_id}/collections/{collection_id}/documents"),
            )
            .json(&json!({ "documentId": document_id, "data": data }));
        self.send_json(req).await
    }

    pub async fn update_document<T: DeserializeOwned>(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> Result<T, AppwriteError> {
        let req = self
            .request(
                Method::PATCH,
                &format!(
                    "/databases/{database_id}/collections/{collection_id}/documents/{document_id}"
                ),
            )
            .json(&json!({ "data": data }));
        self.send_json(req).await
    }

    // --- Account / sessions ---

    pub async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, AppwriteError> {
        let req = self.request(Method::POST, "/account").json(&json!({
            "userId": "unique()",
            "email": email,
            "password": password,
            "name": name,
        }));
        self.send_json(req).await
    }

    pub async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AppwriteError> {
        let req = self
            .request(Method::POST, "/account/sessions/email")
            .json(&json!({ "email": email, "password": password }));
        self.send_json(req).await
    }

    pub async fn get_account(&self) -> Result<User, AppwriteError> {
        self.send_json(self.request(Method::GET, "/account")).await
    }

    pub async fn delete_current_session(&self) -> Result<(), AppwriteError> {
        let resp = self
            .request(Method::DELETE, "/account/sessions/current")
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(error_from_response(status.as_u16(), &body))
    }

    // --- Functions ---

    pub async fn execute_function(
        &self,
        function_id: &str,
        payload: &Value,
    ) -> Result<Execution, AppwriteError> {
        let req = self
            .request(Method::POST, &format!("/functions/{function_id}/executions"))
            .json(&json!({ "body": payload.to_string(), "async": false }));
        self.send_json(req).await
    }

    /// Executes a function and parses its response body as `T`. A `failed`
    /// execution becomes an error carrying the function's own error detail.
    pub async fn execute_function_json<T: DeserializeOwned>(
        &self,
        function_id: &str,
        payload: &Value,
    ) -> Result<T, AppwriteError> {
        let execution = self.execute_function(function_id, payload).await?;
        if execution.status != "completed" {
            let detail = if execution.errors.is_empty() {
                format!("execution status {}", execution.status)
            } else {
                execution.errors
            };
            return Err(AppwriteError::Execution(detail));
        }
        serde_json::from_str::<T>(&execution.response_body).map_err(|e| {
            AppwriteError::InvalidResponse(format!("{e}; body={}", execution.response_body))
        })
    }
}

impl fmt::Debug for AppwriteClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppwriteClient")
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .field("has_session", &self.has_session())
            .finish()
    }
}
