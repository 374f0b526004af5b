use super::QuizApi;
use crate::error::ApiError;
use crate::models::{
    CheckUserBody, CheckUserOutcome, CheckUserRequest, Course, CourseList, FinalizeRequest,
    FinalizeResult, RetakeBody, RetakeOutcome, RetakeRequest,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct HttpQuizApi {
    client: Client,
    base_url: Url,
}

impl HttpQuizApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// `<base>/api/<name>`, or `<base>/api/<course>/<name>` when scoped.
    pub fn endpoint(&self, course: Option<&str>, name: &str) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(course)
            .push(name);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<(StatusCode, T), ApiError> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        read_json(response).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<(StatusCode, T), ApiError> {
        debug!(%url, "POST");
        let response = self.client.post(url).json(body).send().await?;
        read_json(response).await
    }
}

/// Parses the body as JSON whatever the status, since business errors arrive
/// as `{"error": ...}` with 4xx codes.
async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<(StatusCode, T), ApiError> {
    let status = response.status();
    let body = response.text().await?;
    match serde_json::from_str(&body) {
        Ok(value) => Ok((status, value)),
        Err(err) if status.is_success() => Err(ApiError::Decode(err)),
        Err(_) => {
            warn!(%status, "non-JSON error response");
            Err(ApiError::HttpStatus(status))
        }
    }
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        let (status, list): (_, CourseList) = self.get(self.endpoint(None, "courses")?).await?;
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status));
        }
        Ok(list.courses)
    }

    async fn check_user(
        &self,
        course: Option<&str>,
        request: &CheckUserRequest,
    ) -> Result<CheckUserOutcome, ApiError> {
        let url = self.endpoint(course, "check_user")?;
        let (_, body): (_, CheckUserBody) = self.post(url, request).await?;
        CheckUserOutcome::try_from(body)
    }

    async fn finalize(
        &self,
        course: Option<&str>,
        request: &FinalizeRequest,
    ) -> Result<FinalizeResult, ApiError> {
        let url = self.endpoint(course, "finalize")?;
        let (_, body): (_, serde_json::Value) = self.post(url, request).await?;
        if let Some(message) = body.get("error").and_then(|e| e.as_str()) {
            return Err(ApiError::Rejected(message.to_string()));
        }
        Ok(serde_json::from_value(body)?)
    }

    async fn retake(&self, request: &RetakeRequest) -> Result<RetakeOutcome, ApiError> {
        let url = self.endpoint(None, "retake")?;
        let (_, body): (_, RetakeBody) = self.post(url, request).await?;
        RetakeOutcome::try_from(body)
    }
}
