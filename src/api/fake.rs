/// In-memory `RecordService` for tests: records every call it receives and
/// answers from a fixed envelope, failing the operations it was told to fail.
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{ApiError, RecordService};
use crate::photo::SelectedPhoto;
use crate::state::data::{
    sample_record, AggregateStats, ImageUpload, RecordId, TravelRecord, TravelRecordCreate,
    TravelRecordList, TravelRecordUpdate,
};
use crate::state::filter::ListQuery;

/// Id handed out to created records
pub const CREATED_ID: RecordId = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
    Upload,
    FetchImage,
    Stats,
    Health,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(ListQuery),
    Get(RecordId),
    Create(TravelRecordCreate),
    Update(RecordId, TravelRecordUpdate),
    Delete(RecordId),
    Upload(RecordId, String),
    FetchImage(RecordId),
    Stats,
    Health,
}

pub struct FakeService {
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<Operation, ApiError>>,
    records: Mutex<Vec<TravelRecord>>,
}

impl FakeService {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn with_records(self, records: Vec<TravelRecord>) -> Self {
        *self.records.lock().unwrap() = records;
        self
    }

    pub fn failing(self, operation: Operation, error: ApiError) -> Self {
        self.failures.lock().unwrap().insert(operation, error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call, operation: Operation) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().get(&operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordService for FakeService {
    async fn list_records(&self, query: &ListQuery) -> Result<TravelRecordList, ApiError> {
        self.record(Call::List(query.clone()), Operation::List)?;
        let records = self.records.lock().unwrap().clone();
        Ok(TravelRecordList {
            total: records.len() as u64,
            records,
            page: 1,
            per_page: 100,
        })
    }

    async fn get_record(&self, id: RecordId) -> Result<TravelRecord, ApiError> {
        self.record(Call::Get(id), Operation::Get)?;
        Ok(sample_record(id))
    }

    async fn create_record(&self, record: &TravelRecordCreate) -> Result<TravelRecord, ApiError> {
        self.record(Call::Create(record.clone()), Operation::Create)?;
        Ok(TravelRecord {
            title: record.title.clone(),
            visit_date: record.visit_date.clone(),
            rating: record.rating,
            ..sample_record(CREATED_ID)
        })
    }

    async fn update_record(
        &self,
        id: RecordId,
        changes: &TravelRecordUpdate,
    ) -> Result<TravelRecord, ApiError> {
        self.record(Call::Update(id, changes.clone()), Operation::Update)?;
        Ok(sample_record(id))
    }

    async fn delete_record(&self, id: RecordId) -> Result<(), ApiError> {
        self.record(Call::Delete(id), Operation::Delete)
    }

    async fn upload_image(
        &self,
        id: RecordId,
        photo: &SelectedPhoto,
    ) -> Result<ImageUpload, ApiError> {
        self.record(Call::Upload(id, photo.file_name.clone()), Operation::Upload)?;
        Ok(ImageUpload {
            message: "Image uploaded successfully".to_string(),
            filename: format!("{id}.jpg"),
        })
    }

    fn image_url(&self, id: RecordId) -> String {
        format!("http://fake/travel-records/{id}/image")
    }

    async fn fetch_image(&self, id: RecordId) -> Result<Vec<u8>, ApiError> {
        self.record(Call::FetchImage(id), Operation::FetchImage)?;
        Ok(Vec::new())
    }

    async fn aggregate_stats(&self) -> Result<AggregateStats, ApiError> {
        self.record(Call::Stats, Operation::Stats)?;
        Ok(AggregateStats::default())
    }

    async fn health(&self) -> Result<(), ApiError> {
        self.record(Call::Health, Operation::Health)
    }
}
