//! HTTP store backed by the remote backend.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use shared::{
    AccessLogEntry, AccessLogQuery, AccessStatus, Employee, EmployeeCreate, EmployeeSession,
    EmployeeUpdate, LoginRequest, LoginResponse, Page, PortalStart, PortalStartResponse,
    SessionStart,
};

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::store::{RoomStore, SessionOpened, Simulation};

/// Wire response of the simulate endpoint.
#[derive(Debug, Deserialize)]
struct SimulateResponse {
    status: AccessStatus,
    log: AccessLogEntry,
}

/// HTTP/JSON client for the backend, attaching a bearer token when one
/// is set.
pub struct RemoteStore {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl RemoteStore {
    pub fn new(config: &CoreConfig) -> CoreResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoreError::Remote(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(config.token.clone()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn auth_header(&self) -> Option<String> {
        self.token
            .read()
            .await
            .as_ref()
            .map(|t| format!("Bearer {}", t))
    }

    async fn send(&self, mut request: reqwest::RequestBuilder) -> CoreResult<reqwest::Response> {
        if let Some(auth) = self.auth_header().await {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        request
            .send()
            .await
            .map_err(|e| CoreError::Remote(e.to_string()))
    }

    /// Make a GET request.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> CoreResult<T> {
        let response = self.send(self.client.get(self.url(path))).await?;
        Self::handle_response(response).await
    }

    /// Make a GET request with query parameters.
    async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> CoreResult<T> {
        let response = self
            .send(self.client.get(self.url(path)).query(params))
            .await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with a JSON body.
    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> CoreResult<T> {
        let response = self.send(self.client.post(self.url(path)).json(body)).await?;
        Self::handle_response(response).await
    }

    /// Make a POST request without a body, expecting a JSON response.
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> CoreResult<T> {
        let response = self.send(self.client.post(self.url(path))).await?;
        Self::handle_response(response).await
    }

    /// Make a POST request without a body, caring only about the status.
    async fn post_no_content(&self, path: &str) -> CoreResult<()> {
        let response = self.send(self.client.post(self.url(path))).await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// Make a PUT request with a JSON body.
    async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> CoreResult<T> {
        let response = self.send(self.client.put(self.url(path)).json(body)).await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request, caring only about the status.
    async fn delete(&self, path: &str) -> CoreResult<()> {
        let response = self.send(self.client.delete(self.url(path))).await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn check_status(response: reqwest::Response) -> CoreResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                CoreError::InvalidCredentials(text)
            }
            StatusCode::NOT_FOUND => CoreError::NotFound(text),
            StatusCode::CONFLICT => CoreError::AlreadyOpen(text),
            _ => CoreError::Remote(format!("{}: {}", status, text)),
        })
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> CoreResult<T> {
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| CoreError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl RoomStore for RemoteStore {
    // ========== Auth ==========

    async fn admin_login(&self, request: &LoginRequest) -> CoreResult<LoginResponse> {
        self.post("/auth/admin", request).await
    }

    async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    // ========== Employees ==========

    async fn employees_list(&self) -> CoreResult<Vec<Employee>> {
        self.get("/employees").await
    }

    async fn employee_create(&self, data: EmployeeCreate) -> CoreResult<Employee> {
        self.post("/employees", &data).await
    }

    async fn employee_update(&self, id: &str, patch: EmployeeUpdate) -> CoreResult<Employee> {
        self.put(&format!("/employees/{}", id), &patch).await
    }

    async fn employee_delete(&self, id: &str) -> CoreResult<bool> {
        self.delete(&format!("/employees/{}", id)).await?;
        Ok(true)
    }

    // ========== Access simulation ==========

    async fn simulate_access(&self, internal_id: &str) -> CoreResult<Simulation> {
        let response: SimulateResponse = self
            .post_empty(&format!("/access/simulate/{}", internal_id))
            .await?;
        Ok(Simulation {
            status: response.status,
            log: response.log,
            offline: false,
        })
    }

    async fn access_logs(&self, query: &AccessLogQuery) -> CoreResult<Page<AccessLogEntry>> {
        let params: Vec<(&str, &str)> = query.params().collect();
        self.get_with_query("/access/logs", &params).await
    }

    // ========== Sessions ==========

    async fn employee_start(&self, internal_id: &str) -> CoreResult<PortalStart> {
        let response: PortalStartResponse = self
            .post_empty(&format!("/auth/employee/{}", internal_id))
            .await?;

        if !response.ok {
            return Err(match response.reason.as_deref() {
                Some("ALREADY_OPEN") => CoreError::AlreadyOpen(internal_id.to_string()),
                Some("NOT_FOUND") | None => CoreError::NotFound(internal_id.to_string()),
                Some(other) => CoreError::InvalidResponse(format!(
                    "portal start rejected: {}",
                    other
                )),
            });
        }

        let employee = response.employee.ok_or_else(|| {
            CoreError::InvalidResponse("portal start response missing employee".into())
        })?;

        Ok(PortalStart {
            resumed: response.resumed,
            employee,
            session: response.session,
            offline: false,
        })
    }

    async fn employee_end(&self, internal_id: &str) -> CoreResult<bool> {
        self.post_no_content(&format!("/auth/employee/{}/end", internal_id))
            .await?;
        Ok(true)
    }

    async fn sessions_by_employee(&self, employee_id: &str) -> CoreResult<Vec<EmployeeSession>> {
        self.get(&format!("/sessions/by-employee/{}", employee_id))
            .await
    }

    async fn sessions_active(&self) -> CoreResult<Vec<EmployeeSession>> {
        self.get("/sessions/active").await
    }

    async fn sessions_start(&self, data: &SessionStart) -> CoreResult<SessionOpened> {
        let session: EmployeeSession = self.post("/sessions/start", data).await?;
        Ok(SessionOpened {
            session,
            offline: false,
        })
    }

    async fn sessions_end(&self, session_id: &str) -> CoreResult<bool> {
        self.post_no_content(&format!("/sessions/end/{}", session_id))
            .await?;
        Ok(true)
    }
}
