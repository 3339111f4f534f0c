/// reqwest-backed implementation of the record service
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

use super::{ApiError, RecordService};
use crate::photo::SelectedPhoto;
use crate::state::data::{
    AggregateStats, ImageUpload, RecordId, TravelRecord, TravelRecordCreate, TravelRecordList,
    TravelRecordUpdate,
};
use crate::state::filter::ListQuery;

const RECORDS_PATH: &str = "travel-records";

/// HTTP client for the travel record REST service
#[derive(Debug, Clone)]
pub struct HttpRecordClient {
    http: reqwest::Client,
    /// Base address without a trailing slash, e.g. "http://localhost:8000/api/v1"
    base_url: String,
}

impl HttpRecordClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// "{base}/travel-records/"; the trailing slash matches the service's route
    fn collection_url(&self) -> String {
        format!("{}/{RECORDS_PATH}/", self.base_url)
    }

    fn record_url(&self, id: RecordId) -> String {
        format!("{}/{RECORDS_PATH}/{id}", self.base_url)
    }

    /// The health endpoint lives at the service root, outside the API prefix
    fn health_url(&self) -> Result<Url, ApiError> {
        Url::parse(&self.base_url)
            .and_then(|base| base.join("/health"))
            .map_err(|e| ApiError::NetworkFailure(format!("invalid base url: {e}")))
    }
}

/// Pass 2xx responses through, turn everything else into an ApiError
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let error = ApiError::from_status(status.as_u16(), &body);
    tracing::warn!(status = status.as_u16(), %error, "record service rejected request");
    Err(error)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = check_status(response).await?;
    Ok(response.json::<T>().await?)
}

#[async_trait]
impl RecordService for HttpRecordClient {
    async fn list_records(&self, query: &ListQuery) -> Result<TravelRecordList, ApiError> {
        let pairs = query.to_pairs();
        tracing::debug!(?pairs, "fetching travel records");
        let response = self
            .http
            .get(self.collection_url())
            .query(&pairs)
            .send()
            .await?;
        read_json(response).await
    }

    async fn get_record(&self, id: RecordId) -> Result<TravelRecord, ApiError> {
        let response = self.http.get(self.record_url(id)).send().await?;
        read_json(response).await
    }

    async fn create_record(&self, record: &TravelRecordCreate) -> Result<TravelRecord, ApiError> {
        tracing::debug!(title = %record.title, "creating travel record");
        let response = self
            .http
            .post(self.collection_url())
            .json(record)
            .send()
            .await?;
        read_json(response).await
    }

    async fn update_record(
        &self,
        id: RecordId,
        changes: &TravelRecordUpdate,
    ) -> Result<TravelRecord, ApiError> {
        tracing::debug!(id, ?changes, "updating travel record");
        let response = self
            .http
            .put(self.record_url(id))
            .json(changes)
            .send()
            .await?;
        read_json(response).await
    }

    async fn delete_record(&self, id: RecordId) -> Result<(), ApiError> {
        tracing::debug!(id, "deleting travel record");
        let response = self.http.delete(self.record_url(id)).send().await?;
        check_status(response).await?;
        Ok(())
    }

    async fn upload_image(
        &self,
        id: RecordId,
        photo: &SelectedPhoto,
    ) -> Result<ImageUpload, ApiError> {
        tracing::debug!(id, file = %photo.file_name, size = photo.size(), "uploading photo");
        let part = Part::bytes(photo.bytes.to_vec())
            .file_name(photo.file_name.clone())
            .mime_str(&photo.mime_type)?;
        let form = Form::new().part("file", part);
        let response = self
            .http
            .post(format!("{}/image", self.record_url(id)))
            .multipart(form)
            .send()
            .await?;
        read_json(response).await
    }

    fn image_url(&self, id: RecordId) -> String {
        format!("{}/image", self.record_url(id))
    }

    async fn fetch_image(&self, id: RecordId) -> Result<Vec<u8>, ApiError> {
        let response = self.http.get(self.image_url(id)).send().await?;
        let response = check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn aggregate_stats(&self) -> Result<AggregateStats, ApiError> {
        let response = self
            .http
            .get(format!("{}/{RECORDS_PATH}/stats/aggregate", self.base_url))
            .send()
            .await?;
        read_json(response).await
    }

    async fn health(&self) -> Result<(), ApiError> {
        let response = self.http.get(self.health_url()?).send().await?;
        check_status(response).await?;
        Ok(())
    }
}
