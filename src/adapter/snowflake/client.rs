//! Snowflake SQL API Client
//!
//! reqwestによる `/api/v2/statements` 呼び出し

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Response, StatusCode};
use std::time::{Duration, Instant};

#[cfg(test)]
use mockall::automock;

use super::models::{StatementRequest, StatementResponse};
use crate::adapter::retry::retry_transient;

/// 非同期実行中ステートメントのポーリング間隔
pub const POLL_INTERVAL_MS: u64 = 1000;

/// ステートメント実行の抽象
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SnowflakeStatementApi: Send + Sync {
    /// ステートメントを実行し、完了したレスポンスを返す
    async fn execute(&self, request: &StatementRequest) -> Result<StatementResponse>;
}

/// 接続情報
#[derive(Debug, Clone)]
pub struct SnowflakeConnection {
    /// アカウント識別子（`orgname-account` や `xy12345.us-east-1`）
    pub account: String,
    pub token: String,
    /// `OAUTH` / `KEYPAIR_JWT` / `PROGRAMMATIC_ACCESS_TOKEN`
    pub token_type: String,
    /// ポーリングの上限
    pub statement_timeout: Duration,
}

/// SQL APIクライアント
pub struct SqlApiClient {
    http: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
    statement_timeout: Duration,
}

impl SqlApiClient {
    /// 新しいクライアントを作成
    ///
    /// # Errors
    ///
    /// トークンがヘッダーに使えない文字を含む場合、またはHTTPクライアントを作れない場合
    pub fn new(connection: &SnowflakeConnection) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: account_url(&connection.account),
            headers: build_headers(&connection.token, &connection.token_type)?,
            statement_timeout: connection.statement_timeout,
        })
    }

    /// POSTでステートメントを投入
    async fn submit(
        &self,
        request: &StatementRequest,
        request_id: &str,
        retry: bool,
    ) -> Result<(StatusCode, StatementResponse)> {
        let mut url = format!(
            "{}/api/v2/statements?requestId={}",
            self.base_url, request_id
        );
        if retry {
            url.push_str("&retry=true");
        }

        let response = self
            .http
            .post(&url)
            .headers(self.headers.clone())
            .json(request)
            .send()
            .await
            .context("Snowflake statement request failed")?;

        read_response(response).await
    }

    /// 実行中のステートメントを完了までポーリング
    async fn wait_for(&self, handle: &str) -> Result<StatementResponse> {
        let url = format!("{}/api/v2/statements/{}", self.base_url, handle);
        let started = Instant::now();

        loop {
            if started.elapsed() > self.statement_timeout {
                bail!("Timeout waiting for Snowflake statement {}", handle);
            }
            tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;

            let response = self
                .http
                .get(&url)
                .headers(self.headers.clone())
                .send()
                .await
                .context("Snowflake status request failed")?;

            let (status, body) = read_response(response).await?;
            if status != StatusCode::ACCEPTED {
                return Ok(body);
            }
            debug!("Statement {} still running", handle);
        }
    }
}

#[async_trait]
impl SnowflakeStatementApi for SqlApiClient {
    async fn execute(&self, request: &StatementRequest) -> Result<StatementResponse> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let mut attempt = 0u32;

        let (status, body) = retry_transient("Snowflake statement", || {
            attempt += 1;
            self.submit(request, &request_id, attempt > 1)
        })
        .await?;

        if status != StatusCode::ACCEPTED {
            return Ok(body);
        }

        let handle = body
            .statement_handle
            .ok_or_else(|| anyhow!("Snowflake accepted the statement without a handle"))?;
        info!("Statement {} accepted, waiting for completion", handle);
        self.wait_for(&handle).await
    }
}

/// アカウント識別子からAPIのベースURLを作る
pub fn account_url(account: &str) -> String {
    let account = account.trim();
    if account.starts_with("https://") || account.starts_with("http://") {
        account.trim_end_matches('/').to_string()
    } else {
        format!("https://{}.snowflakecomputing.com", account)
    }
}

fn build_headers(token: &str, token_type: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(5);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        AUTHORIZATION,
        format!("Bearer {}", token)
            .parse::<HeaderValue>()
            .context("Snowflake token is not a valid header value")?,
    );
    headers.insert(
        "X-Snowflake-Authorization-Token-Type",
        token_type
            .parse::<HeaderValue>()
            .context("Snowflake token type is not a valid header value")?,
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!(
            env!("CARGO_PKG_NAME"),
            '/',
            env!("CARGO_PKG_VERSION")
        )),
    );
    Ok(headers)
}

/// レスポンスを読み、エラーならメッセージ付きのエラーにする
///
/// エラー文字列にはHTTPステータスを含める（リトライ判定に使う）
async fn read_response(response: Response) -> Result<(StatusCode, StatementResponse)> {
    let status = response.status();
    let text = response
        .text()
        .await
        .context("Failed to read Snowflake response body")?;
    let body: StatementResponse = serde_json::from_str(&text).unwrap_or_default();

    if status.is_success() {
        return Ok((status, body));
    }

    let message = body.message.unwrap_or(text);
    match body.sql_state {
        Some(sql_state) => bail!(
            "Snowflake API error ({}): {} [sqlState {}]",
            status,
            message,
            sql_state
        ),
        None => bail!("Snowflake API error ({}): {}", status, message),
    }
}
