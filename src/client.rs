use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::{
    Asociation, AuthHeader, Credentials, MembershipRequest, NewAsociation, NewFullActivity,
    Session,
};

const API_KEY_HEADER: &str = "X-API-Key";

/// A non-success response. Seeders treat it as "this item failed".
#[derive(Debug)]
pub struct Rejection {
    pub status: StatusCode,
    pub body: String,
}

impl Rejection {
    pub fn reason(&self) -> &str {
        self.status.canonical_reason().unwrap_or("Unknown")
    }
}

/// Outer `Result` of client calls is transport/parse failure, this is the
/// server's answer.
pub type ApiResult<T> = std::result::Result<T, Rejection>;

pub struct DanubitClient {
    client: Client,
    base_url: String,
    auth_header: AuthHeader,
}

impl DanubitClient {
    pub fn new(
        base_url: &str,
        auth_header: AuthHeader,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self, session: Option<&Session>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(session) = session {
            let (name, value) = match self.auth_header {
                AuthHeader::ApiKey => (API_KEY_HEADER, session.token.clone()),
                AuthHeader::Bearer => ("authorization", format!("Bearer {}", session.token)),
            };
            if let Ok(val) = HeaderValue::from_str(&value) {
                headers.insert(name, val);
            }
        }
        headers
    }

    /// Send without parsing: the raw body on success, or the rejection.
    async fn send_raw(&self, req: RequestBuilder, what: &str) -> Result<ApiResult<String>> {
        let resp = req
            .send()
            .await
            .with_context(|| format!("Failed to send {what} request"))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .with_context(|| format!("Failed to read {what} response"))?;
        debug!("{} response (status {}): {}", what, status, text);

        if !status.is_success() {
            return Ok(Err(Rejection { status, body: text }));
        }
        Ok(Ok(text))
    }

    /// Send and split the answer into parsed body or rejection.
    async fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        what: &str,
    ) -> Result<ApiResult<T>> {
        let text = match self.send_raw(req, what).await? {
            Ok(text) => text,
            Err(rejection) => return Ok(Err(rejection)),
        };

        let body: T = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse {what} response: {text}"))?;
        Ok(Ok(body))
    }

    fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        session: Option<&Session>,
        body: &B,
    ) -> RequestBuilder {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .headers(self.headers(session))
            .json(body)
    }

    fn put(&self, path: &str, session: &Session) -> RequestBuilder {
        self.client
            .put(format!("{}{}", self.base_url, path))
            .headers(self.headers(Some(session)))
    }

    /// Log in. A non-success status is logged and yields `None`.
    pub async fn login(&self, credentials: &Credentials) -> Result<Option<Session>> {
        let req = self.post("/auth/login", None, credentials);
        match self.send::<Session>(req, "Login").await? {
            Ok(session) => {
                info!(
                    "Logged in as {} (id: {})",
                    session.username.as_deref().unwrap_or(&credentials.email),
                    session.id
                );
                Ok(Some(session))
            }
            Err(rejection) => {
                warn!(
                    "Login failed for {}: {} {}",
                    credentials.email, rejection.status, rejection.body
                );
                Ok(None)
            }
        }
    }

    /// Public listing, no session needed
    pub async fn list_asociations(&self) -> Result<Vec<Asociation>> {
        let req = self
            .client
            .get(format!("{}/api/asociations", self.base_url))
            .headers(self.headers(None));

        match self.send::<Vec<Asociation>>(req, "Asociations").await? {
            Ok(list) => {
                debug!("Fetched {} asociations", list.len());
                Ok(list)
            }
            Err(r) => anyhow::bail!("Failed to list asociations: {} {}", r.status, r.body),
        }
    }

    pub async fn create_asociation(
        &self,
        session: &Session,
        asociation: &NewAsociation,
    ) -> Result<ApiResult<serde_json::Value>> {
        let req = self.post("/api/asociations", Some(session), asociation);
        self.send(req, "Create asociation").await
    }

    pub async fn create_activity(
        &self,
        session: &Session,
        activity: &NewFullActivity,
    ) -> Result<ApiResult<serde_json::Value>> {
        let req = self.post("/api/activities", Some(session), activity);
        self.send(req, "Create activity").await
    }

    /// Ask to join `asociation_id`. Only the status matters; the body is
    /// returned as text.
    pub async fn request_membership(
        &self,
        session: &Session,
        asociation_id: &str,
    ) -> Result<ApiResult<String>> {
        let body = MembershipRequest {
            user_id: session.id.clone(),
            asociation: asociation_id.to_string(),
        };
        let req = self.post(
            &format!("/api/asociations/{}/membershipRequests", asociation_id),
            Some(session),
            &body,
        );
        self.send_raw(req, "Membership request").await
    }

    /// Approve the pending request of `user_id`; returns the member record.
    pub async fn accept_membership(
        &self,
        session: &Session,
        asociation_id: &str,
        user_id: &str,
    ) -> Result<ApiResult<serde_json::Value>> {
        let req = self.put(
            &format!("/api/asociations/{}/membershipRequests/{}", asociation_id, user_id),
            session,
        );
        self.send(req, "Accept membership").await
    }

    pub async fn update_board_member(
        &self,
        session: &Session,
        asociation_id: &str,
        user_id: &str,
        member: &serde_json::Value,
    ) -> Result<ApiResult<serde_json::Value>> {
        let req = self
            .put(
                &format!("/api/asociations/{}/board/{}", asociation_id, user_id),
                session,
            )
            .json(member);
        self.send(req, "Board update").await
    }
}
