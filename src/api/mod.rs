/// Travel record service adapter
///
/// The UI talks to the service only through `RecordService`, so components
/// can be driven by a fake in tests:
/// - reqwest implementation (client.rs)
/// - error taxonomy (error.rs)
///
/// Every call is exactly one round trip. Nothing is retried or cached, and
/// errors propagate unchanged to the component that issued the call.

pub mod client;
pub mod error;
#[cfg(test)]
pub mod fake;

use async_trait::async_trait;

pub use client::HttpRecordClient;
pub use error::ApiError;

use crate::photo::SelectedPhoto;
use crate::state::data::{
    AggregateStats, ImageUpload, RecordId, TravelRecord, TravelRecordCreate, TravelRecordList,
    TravelRecordUpdate,
};
use crate::state::filter::ListQuery;

#[async_trait]
pub trait RecordService: Send + Sync {
    /// Filtered, paged listing; only the query's present values are sent
    async fn list_records(&self, query: &ListQuery) -> Result<TravelRecordList, ApiError>;

    async fn get_record(&self, id: RecordId) -> Result<TravelRecord, ApiError>;

    async fn create_record(&self, record: &TravelRecordCreate) -> Result<TravelRecord, ApiError>;

    /// Partial update; fields left unset in `changes` are not touched
    async fn update_record(
        &self,
        id: RecordId,
        changes: &TravelRecordUpdate,
    ) -> Result<TravelRecord, ApiError>;

    async fn delete_record(&self, id: RecordId) -> Result<(), ApiError>;

    /// Multipart upload of the record's photo, sent as the `file` field
    async fn upload_image(
        &self,
        id: RecordId,
        photo: &SelectedPhoto,
    ) -> Result<ImageUpload, ApiError>;

    /// Where the record's photo can be fetched. Pure; does not check existence.
    fn image_url(&self, id: RecordId) -> String;

    async fn fetch_image(&self, id: RecordId) -> Result<Vec<u8>, ApiError>;

    async fn aggregate_stats(&self) -> Result<AggregateStats, ApiError>;

    async fn health(&self) -> Result<(), ApiError>;
}
