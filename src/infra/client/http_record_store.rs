use std::collections::BTreeSet;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::error;
use crate::api::dtos::responses::ConflictsResponse;
use crate::domain::models::{appointment::Appointment, draft::EditDraft, service::Service, technician::Technician};
use crate::domain::ports::RecordStore;
use crate::error::AppError;

/// Record store reached over the JSON API, for edit sessions running outside
/// the server process.
pub struct HttpRecordStore {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpRecordStore {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::InternalWithMsg(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        let res = request.send().await.map_err(|e| {
            let msg = format!("Record store connection error: {}", e);
            error!("{}", msg);
            AppError::InternalWithMsg(msg)
        })?;

        let status = res.status();
        if status.is_success() {
            return res.json::<T>().await
                .map_err(|e| AppError::InternalWithMsg(format!("Malformed record store response: {}", e)));
        }

        let message = res.json::<ErrorBody>().await
            .map(|b| b.error)
            .unwrap_or_else(|_| status.to_string());

        Err(match status {
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AppError::Validation(message),
            StatusCode::CONFLICT => AppError::Conflict(message),
            _ => {
                let msg = format!("Record store failed. Status: {}, Error: {}", status, message);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            }
        })
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn get_appointment(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        let request = self.client.get(self.url(&format!("/appointments/{}", id)));
        match self.send::<Appointment>(request).await {
            Ok(appointment) => Ok(Some(appointment)),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list_services(&self) -> Result<Vec<Service>, AppError> {
        self.send(self.client.get(self.url("/services"))).await
    }

    async fn list_available_technicians(&self) -> Result<Vec<Technician>, AppError> {
        let request = self.client.get(self.url("/technicians")).query(&[("status", "available")]);
        self.send(request).await
    }

    async fn find_conflicting_technician_ids(&self, date: &str, time: &str, exclude_id: &str) -> Result<BTreeSet<String>, AppError> {
        let request = self.client
            .get(self.url(&format!("/appointments/{}/conflicts", exclude_id)))
            .query(&[("date", date), ("time", time)]);
        let body: ConflictsResponse = self.send(request).await?;
        Ok(body.technician_ids)
    }

    async fn update_appointment(&self, id: &str, draft: &EditDraft) -> Result<Appointment, AppError> {
        let request = self.client.put(self.url(&format!("/appointments/{}", id))).json(draft);
        self.send(request).await
    }
}
