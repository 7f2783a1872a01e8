//! reqwest implementations of the admin and query API seams.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::ResourceKind,
    error::ApiError,
    protocol::{
        ChartPeriod, CreatedResponse, DashboardStats, MessageResponse, NewEntity, QueryRequest,
        QueryResponse, RevenuePoint,
    },
};
use tracing::debug;
use url::Url;

use crate::{
    error::{ClientError, Result},
    AdminApi, Collection, QueryApi,
};

fn build_http(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

fn normalize_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    Url::parse(trimmed).map_err(|source| ClientError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    Ok(trimmed.to_string())
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::from_body(status.as_u16(), &body).into())
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = check_status(response).await?.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub struct HttpAdminClient {
    http: Client,
    base_url: String,
}

impl HttpAdminClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: build_http(timeout)?,
            base_url: normalize_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!(path, "admin api: GET");
        let response = self
            .http
            .get(format!("{}/admin/{path}", self.base_url))
            .send()
            .await?;
        decode(response).await
    }
}

#[async_trait]
impl AdminApi for HttpAdminClient {
    async fn fetch_stats(&self) -> Result<DashboardStats> {
        self.get_json("stats").await
    }

    async fn fetch_revenue_chart(&self, period: ChartPeriod) -> Result<Vec<RevenuePoint>> {
        debug!(days = period.days(), "admin api: GET revenue-chart");
        let response = self
            .http
            .get(format!("{}/admin/revenue-chart", self.base_url))
            .query(&[("days", period.days())])
            .send()
            .await?;
        decode(response).await
    }

    async fn list(&self, kind: ResourceKind) -> Result<Collection> {
        let path = kind.path_segment();
        Ok(match kind {
            ResourceKind::Member => Collection::Members(self.get_json(path).await?),
            ResourceKind::Coach => Collection::Coaches(self.get_json(path).await?),
            ResourceKind::Court => Collection::Courts(self.get_json(path).await?),
            ResourceKind::Booking => Collection::Bookings(self.get_json(path).await?),
        })
    }

    async fn create(&self, entity: &NewEntity) -> Result<CreatedResponse> {
        let kind = entity.kind();
        debug!(%kind, "admin api: POST");
        let response = self
            .http
            .post(format!("{}/admin/{}", self.base_url, kind.path_segment()))
            .json(entity)
            .send()
            .await?;
        decode(response).await
    }

    async fn delete(&self, kind: ResourceKind, id: i64) -> Result<()> {
        debug!(%kind, id, "admin api: DELETE");
        let response = self
            .http
            .delete(format!(
                "{}/admin/{}/{id}",
                self.base_url,
                kind.path_segment()
            ))
            .send()
            .await?;
        let body = check_status(response).await?.bytes().await?;
        // Informational only; a success status with an empty body is still a delete.
        if let Ok(reply) = serde_json::from_slice::<MessageResponse>(&body) {
            debug!(%kind, id, message = %reply.message, "admin api: deleted");
        }
        Ok(())
    }
}

pub struct HttpQueryClient {
    http: Client,
    endpoint: String,
}

impl HttpQueryClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: build_http(timeout)?,
            endpoint: normalize_url(endpoint)?,
        })
    }
}

#[async_trait]
impl QueryApi for HttpQueryClient {
    async fn ask(&self, request: &QueryRequest) -> Result<QueryResponse> {
        debug!(
            history = request.history.len(),
            "query api: POST question"
        );
        let response = self.http.post(&self.endpoint).json(request).send().await?;
        decode(response).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
