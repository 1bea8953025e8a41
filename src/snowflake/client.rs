// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Authenticated HTTP client for the Snowflake REST APIs

use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use super::errors::PlatformError;
use super::sql::{positional_bindings, StatementRequest, StatementResponse, StatementResult};
use crate::config::{AppConfig, ConnectionConfig};

const STATEMENTS_PATH: &str = "/api/v2/statements";
const POLL_INTERVAL: Duration = Duration::from_millis(250);
const TOKEN_TYPE_HEADER: &str = "X-Snowflake-Authorization-Token-Type";
const TOKEN_TYPE: &str = "PROGRAMMATIC_ACCESS_TOKEN";

/// Live handle to one Snowflake account
pub struct SnowflakeClient {
    http: Client,
    base_url: Url,
    connection: ConnectionConfig,
    request_timeout: Duration,
}

impl SnowflakeClient {
    /// Create a client without contacting the platform
    ///
    /// # Arguments
    /// * `connection` - Account credentials and default context
    /// * `host` - Base URL override, `https://{account}.snowflakecomputing.com` if None
    /// * `request_timeout` - Applied to every HTTP request
    pub fn new(
        connection: ConnectionConfig,
        host: Option<&str>,
        request_timeout: Duration,
    ) -> Result<Self, PlatformError> {
        let base = match host {
            Some(host) => host.to_string(),
            None => format!("https://{}.snowflakecomputing.com", connection.account),
        };
        let base_url = Url::parse(&base)
            .map_err(|e| PlatformError::InvalidEndpoint(format!("{}: {}", base, e)))?;

        let http = Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("cortex-doc-chat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            connection,
            request_timeout,
        })
    }

    /// Create a client and verify the credentials with a probe statement
    pub async fn connect(config: &AppConfig) -> Result<Self, PlatformError> {
        let client = Self::new(
            config.connection.clone(),
            config.host.as_deref(),
            config.request_timeout,
        )?;

        let account = client.connection.account.clone();
        match client.execute("SELECT CURRENT_VERSION()", &[]).await {
            Ok(result) => {
                info!(
                    "Connected to Snowflake account {} as {} (version {})",
                    account,
                    client.connection.user,
                    result.scalar().unwrap_or("unknown")
                );
                Ok(client)
            }
            Err(e) => Err(PlatformError::Connection {
                account,
                message: e.to_string(),
            }),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn account(&self) -> &str {
        &self.connection.account
    }

    pub fn timeout_ms(&self) -> u64 {
        self.request_timeout.as_millis() as u64
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, PlatformError> {
        self.base_url
            .join(path)
            .map_err(|e| PlatformError::InvalidEndpoint(format!("{}: {}", path, e)))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.connection.password)
            .header(TOKEN_TYPE_HEADER, TOKEN_TYPE)
            .header(ACCEPT, "application/json")
    }

    /// POST a JSON body to a REST path and return the raw response
    pub(crate) async fn post_json<T>(&self, path: &str, body: &T) -> Result<Response, PlatformError>
    where
        T: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        self.authorized(self.http.post(url))
            .json(body)
            .send()
            .await
            .map_err(|e| PlatformError::from_reqwest(e, self.timeout_ms()))
    }

    /// Execute one SQL statement through the SQL API
    ///
    /// `bindings` fill the statement's `?` placeholders in order. A statement
    /// that is still running (HTTP 202) is polled until it finishes or the
    /// request timeout elapses.
    pub async fn execute(
        &self,
        statement: &str,
        bindings: &[&str],
    ) -> Result<StatementResult, PlatformError> {
        let request = StatementRequest {
            statement,
            timeout: self.request_timeout.as_secs().max(1),
            warehouse: &self.connection.warehouse,
            database: &self.connection.database,
            schema: &self.connection.schema,
            bindings: positional_bindings(bindings),
        };

        debug!("Executing statement: {}", statement);
        let started = Instant::now();
        let url = self.endpoint(STATEMENTS_PATH)?;
        let mut response = self
            .authorized(self.http.post(url))
            .query(&[("requestId", Uuid::new_v4().to_string())])
            .json(&request)
            .send()
            .await
            .map_err(|e| PlatformError::from_reqwest(e, self.timeout_ms()))?;

        loop {
            match response.status() {
                StatusCode::OK => {
                    let body: StatementResponse = response
                        .json()
                        .await
                        .map_err(|e| PlatformError::Decode(e.to_string()))?;
                    let result = StatementResult::from_response(body)?;
                    debug!(
                        "Statement returned {} rows in {}ms",
                        result.row_count(),
                        started.elapsed().as_millis()
                    );
                    return Ok(result);
                }
                StatusCode::ACCEPTED => {
                    let body: StatementResponse = response
                        .json()
                        .await
                        .map_err(|e| PlatformError::Decode(e.to_string()))?;
                    let handle = body.statement_handle.ok_or_else(|| {
                        PlatformError::Decode("202 response without statementHandle".to_string())
                    })?;

                    if started.elapsed() >= self.request_timeout {
                        return Err(PlatformError::StillRunning {
                            handle,
                            timeout_ms: self.timeout_ms(),
                        });
                    }

                    tokio::time::sleep(POLL_INTERVAL).await;
                    let url = self.endpoint(&format!("{}/{}", STATEMENTS_PATH, handle))?;
                    response = self
                        .authorized(self.http.get(url))
                        .send()
                        .await
                        .map_err(|e| PlatformError::from_reqwest(e, self.timeout_ms()))?;
                }
                _ => return Err(Self::error_from_response(response).await),
            }
        }
    }

    /// Turn a non-success response into a typed error
    pub(crate) async fn error_from_response(response: Response) -> PlatformError {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return PlatformError::Unauthorized {
                status: status.as_u16(),
            };
        }

        let text = response.text().await.unwrap_or_default();
        match serde_json::from_str::<StatementResponse>(&text) {
            Ok(StatementResponse {
                code: Some(code),
                message,
                ..
            }) => PlatformError::Statement {
                code,
                message: message.unwrap_or_default(),
            },
            _ => PlatformError::Http {
                status: status.as_u16(),
                message: text,
            },
        }
    }
}
