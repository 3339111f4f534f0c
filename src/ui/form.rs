/// Record form: create a new record or edit an existing one
///
/// Submission is create-or-update first, then the optional photo upload.
/// The form only reports `Saved` once every step has succeeded; on any
/// failure it keeps its input so the user can retry.
use iced::widget::{button, column, container, pick_list, row, text, text_input, Column};
use iced::alignment::Horizontal;
use iced::{Alignment, Color, Element, Length};
use std::sync::Arc;

use crate::api::{ApiError, RecordService};
use crate::photo::{PhotoError, SelectedPhoto};
use crate::state::data::{Rating, RecordId, TravelRecord, TravelRecordCreate, TravelRecordUpdate};
use crate::state::dates::{date_portion, to_iso_timestamp};

pub const SAVE_ERROR: &str = "Failed to save record";

#[derive(Debug, Clone)]
pub enum Message {
    TitleChanged(String),
    CountryChanged(String),
    CityChanged(String),
    LatitudeChanged(String),
    LongitudeChanged(String),
    VisitDateChanged(String),
    RatingSelected(Rating),
    CategoryChanged(String),
    NotesChanged(String),
    PickPhoto,
    PhotoPicked(Result<Option<SelectedPhoto>, PhotoError>),
    ClearPhoto,
    Submit,
    Saved(Result<TravelRecord, ApiError>),
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    PickPhoto,
    Submit(Submission),
    /// Every step succeeded; the shell returns to the list and refreshes it
    Saved(TravelRecord),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Create(TravelRecordCreate),
    Update(RecordId, TravelRecordUpdate),
}

/// What a successful validation hands to the service
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub payload: Payload,
    pub photo: Option<SelectedPhoto>,
}

/// Raw input values, exactly as typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields {
    pub title: String,
    pub country: String,
    pub city: String,
    pub latitude: String,
    pub longitude: String,
    /// Calendar date, "YYYY-MM-DD"
    pub visit_date: String,
    pub rating: Rating,
    pub category: String,
    pub notes: String,
}

impl FormFields {
    fn from_record(record: &TravelRecord) -> Self {
        Self {
            title: record.title.clone(),
            country: record.country.clone(),
            city: record.city.clone(),
            latitude: record.latitude.map(|v| v.to_string()).unwrap_or_default(),
            longitude: record.longitude.map(|v| v.to_string()).unwrap_or_default(),
            visit_date: date_portion(&record.visit_date).to_string(),
            rating: record.rating,
            category: record.category.clone(),
            notes: record.notes.clone().unwrap_or_default(),
        }
    }
}

/// Field values after validation
#[derive(Debug, Clone)]
struct Validated {
    title: String,
    country: String,
    city: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    date: String,
    timestamp: String,
    rating: Rating,
    category: String,
    notes: Option<String>,
}

#[derive(Debug, Default)]
pub struct RecordForm {
    fields: FormFields,
    /// The record being edited; `None` when creating
    editing: Option<TravelRecord>,
    photo: Option<SelectedPhoto>,
    loading: bool,
    error: Option<String>,
}

impl RecordForm {
    /// Blank form for a new record
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-populated from an existing record
    pub fn edit(record: TravelRecord) -> Self {
        Self {
            fields: FormFields::from_record(&record),
            editing: Some(record),
            ..Self::default()
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::TitleChanged(value) => self.fields.title = value,
            Message::CountryChanged(value) => self.fields.country = value,
            Message::CityChanged(value) => self.fields.city = value,
            Message::LatitudeChanged(value) => self.fields.latitude = value,
            Message::LongitudeChanged(value) => self.fields.longitude = value,
            Message::VisitDateChanged(value) => self.fields.visit_date = value,
            Message::RatingSelected(rating) => self.fields.rating = rating,
            Message::CategoryChanged(value) => self.fields.category = value,
            Message::NotesChanged(value) => self.fields.notes = value,
            Message::PickPhoto if !self.loading => return Action::PickPhoto,
            Message::PhotoPicked(Ok(Some(photo))) => self.photo = Some(photo),
            Message::PhotoPicked(Ok(None)) => {}
            Message::PhotoPicked(Err(error)) => {
                tracing::warn!(%error, "could not load photo");
                self.error = Some(error.to_string());
            }
            Message::ClearPhoto => self.photo = None,
            Message::Submit if !self.loading => return self.submit(),
            Message::Saved(result) => {
                self.loading = false;
                match result {
                    Ok(record) => {
                        tracing::info!(id = record.id, "✅ travel record saved");
                        return Action::Saved(record);
                    }
                    Err(error) => {
                        tracing::warn!(%error, "failed to save travel record");
                        self.error = Some(error.detail().unwrap_or(SAVE_ERROR).to_string());
                    }
                }
            }
            Message::Cancel if !self.loading => return Action::Cancelled,
            Message::PickPhoto | Message::Submit | Message::Cancel => {}
        }
        Action::None
    }

    fn submit(&mut self) -> Action {
        let validated = match self.validate() {
            Ok(validated) => validated,
            Err(message) => {
                self.error = Some(message);
                return Action::None;
            }
        };

        let payload = match &self.editing {
            Some(original) => Payload::Update(original.id, changes_from(original, &validated)),
            None => Payload::Create(TravelRecordCreate {
                title: validated.title,
                country: validated.country,
                city: validated.city,
                latitude: validated.latitude,
                longitude: validated.longitude,
                visit_date: validated.timestamp,
                rating: validated.rating,
                category: validated.category,
                notes: validated.notes,
            }),
        };

        self.loading = true;
        self.error = None;
        Action::Submit(Submission {
            payload,
            photo: self.photo.clone(),
        })
    }

    fn validate(&self) -> Result<Validated, String> {
        let fields = &self.fields;
        let required = [
            ("Title", &fields.title),
            ("Country", &fields.country),
            ("City", &fields.city),
            ("Visit Date", &fields.visit_date),
            ("Category", &fields.category),
        ];
        if let Some((label, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(format!("{label} is required"));
        }

        let timestamp = to_iso_timestamp(&fields.visit_date).map_err(|e| e.to_string())?;

        Ok(Validated {
            title: fields.title.clone(),
            country: fields.country.clone(),
            city: fields.city.clone(),
            latitude: parse_coordinate("Latitude", &fields.latitude)?,
            longitude: parse_coordinate("Longitude", &fields.longitude)?,
            date: fields.visit_date.trim().to_string(),
            timestamp,
            rating: fields.rating,
            category: fields.category.clone(),
            notes: (!fields.notes.is_empty()).then(|| fields.notes.clone()),
        })
    }

    pub fn view(&self) -> Element<'_, Message> {
        let heading = if self.is_editing() {
            "Edit Travel Record"
        } else {
            "Add New Travel Record"
        };

        let mut content = column![text(heading).size(28)].spacing(16);

        if let Some(error) = &self.error {
            content = content.push(
                container(text(error.as_str()).color(Color::from_rgb(0.45, 0.11, 0.14)))
                    .padding(12)
                    .width(Length::Fill)
                    .style(container::rounded_box),
            );
        }

        let fields = &self.fields;
        let photo_label = match &self.photo {
            Some(photo) => photo.file_name.clone(),
            None => "No photo selected".to_string(),
        };
        let mut photo_row = row![
            button(text("Choose Photo"))
                .on_press_maybe((!self.loading).then_some(Message::PickPhoto))
                .style(button::secondary),
            text(photo_label),
        ]
        .spacing(12)
        .align_y(Alignment::Center);
        if self.photo.is_some() && !self.loading {
            photo_row = photo_row.push(
                button(text("Remove"))
                    .on_press(Message::ClearPhoto)
                    .style(button::text),
            );
        }

        let submit_label = if self.loading {
            "Saving..."
        } else if self.is_editing() {
            "Update"
        } else {
            "Save"
        };

        let actions = row![
            button(text("Cancel"))
                .on_press_maybe((!self.loading).then_some(Message::Cancel))
                .padding([10, 24])
                .style(button::secondary),
            button(text(submit_label))
                .on_press_maybe((!self.loading).then_some(Message::Submit))
                .padding([10, 24])
                .style(button::success),
        ]
        .spacing(12);

        content = content
            .push(labeled(
                "Title *",
                text_input("Beautiful sunset at Santorini", &fields.title)
                    .on_input(Message::TitleChanged),
            ))
            .push(
                row![
                    labeled(
                        "Country *",
                        text_input("Greece", &fields.country).on_input(Message::CountryChanged),
                    ),
                    labeled(
                        "City *",
                        text_input("Santorini", &fields.city).on_input(Message::CityChanged),
                    ),
                ]
                .spacing(16),
            )
            .push(
                row![
                    labeled(
                        "Latitude",
                        text_input("36.3932", &fields.latitude).on_input(Message::LatitudeChanged),
                    ),
                    labeled(
                        "Longitude",
                        text_input("25.4615", &fields.longitude)
                            .on_input(Message::LongitudeChanged),
                    ),
                ]
                .spacing(16),
            )
            .push(
                row![
                    labeled(
                        "Visit Date *",
                        text_input("YYYY-MM-DD", &fields.visit_date)
                            .on_input(Message::VisitDateChanged),
                    ),
                    labeled(
                        "Rating *",
                        pick_list(Rating::ALL, Some(fields.rating), Message::RatingSelected)
                            .width(Length::Fill),
                    ),
                ]
                .spacing(16),
            )
            .push(labeled(
                "Category *",
                text_input("beach, cultural, nature, city, etc.", &fields.category)
                    .on_input(Message::CategoryChanged),
            ))
            .push(labeled(
                "Notes",
                text_input("Share your memories and experiences...", &fields.notes)
                    .on_input(Message::NotesChanged),
            ))
            .push(labeled("Photo", photo_row))
            .push(container(actions).width(Length::Fill).align_x(Horizontal::Right));

        container(content)
            .padding(24)
            .max_width(600.0)
            .style(container::rounded_box)
            .into()
    }
}

fn labeled<'a>(label: &'a str, input: impl Into<Element<'a, Message>>) -> Column<'a, Message> {
    column![text(label), input.into()]
        .spacing(4)
        .width(Length::Fill)
}

/// Empty input means "unset", never zero
fn parse_coordinate(label: &str, value: &str) -> Result<Option<f64>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(format!("{label} must be a number")),
    }
}

/// Only the fields that differ from the record being edited
fn changes_from(original: &TravelRecord, new: &Validated) -> TravelRecordUpdate {
    fn changed(old: &str, new: &str) -> Option<String> {
        (old != new).then(|| new.to_string())
    }

    let old_notes = original.notes.as_deref().filter(|notes| !notes.is_empty());

    TravelRecordUpdate {
        title: changed(&original.title, &new.title),
        country: changed(&original.country, &new.country),
        city: changed(&original.city, &new.city),
        latitude: (original.latitude != new.latitude).then_some(new.latitude),
        longitude: (original.longitude != new.longitude).then_some(new.longitude),
        visit_date: (date_portion(&original.visit_date) != new.date)
            .then(|| new.timestamp.clone()),
        rating: (original.rating != new.rating).then_some(new.rating),
        category: changed(&original.category, &new.category),
        notes: (old_notes != new.notes.as_deref()).then(|| new.notes.clone()),
    }
}

/// Run a submission: create or update, then upload the photo if one was
/// picked. The upload is only attempted after the record call succeeded.
pub async fn save_record(
    service: Arc<dyn RecordService>,
    submission: Submission,
) -> Result<TravelRecord, ApiError> {
    let saved = match &submission.payload {
        Payload::Create(record) => service.create_record(record).await?,
        Payload::Update(id, changes) => {
            if changes.is_empty() {
                tracing::debug!(id, "no field changes, sending empty update");
            }
            service.update_record(*id, changes).await?
        }
    };

    if let Some(photo) = &submission.photo {
        let upload = service.upload_image(saved.id, photo).await?;
        tracing::info!(
            id = saved.id,
            filename = %upload.filename,
            "📷 {}",
            upload.message
        );
    }

    Ok(saved)
}
