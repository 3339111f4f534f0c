/// Record list: filter bar, statistics panel and the card grid
///
/// The list never talks to the service directly. `update` returns an
/// `Action` describing the request to make, and the shell runs it and feeds
/// the response back as a `Message`.
use iced::widget::{
    button, column, container, horizontal_space, pick_list, row, text, text_input, TextInput,
};
use iced::{Color, Element, Length};
use iced_aw::Wrap;
use std::collections::HashMap;
use std::fmt;

use super::card::{self, Thumbnail};
use crate::api::ApiError;
use crate::state::data::{AggregateStats, Rating, RecordId, TravelRecord, TravelRecordList};
use crate::state::filter::{FilterCriteria, FilterField, ListQuery};
use crate::state::request::{RequestSlot, Ticket};

pub const FETCH_ERROR: &str = "Failed to fetch travel records";
pub const DELETE_ERROR: &str = "Failed to delete record";
pub const STATS_ERROR: &str = "Failed to load statistics";
const EMPTY_MESSAGE: &str = "No travel records found. Add your first travel memory!";

#[derive(Debug, Clone)]
pub enum Message {
    FilterChanged(FilterField, String),
    Fetched(Ticket, Result<TravelRecordList, ApiError>),
    EditPressed(TravelRecord),
    DeletePressed(RecordId),
    /// Outcome of the confirmation dialog
    DeleteConfirmed(RecordId, bool),
    Deleted(RecordId, Result<(), ApiError>),
    AlertDismissed,
    ThumbnailLoaded(RecordId, Result<Vec<u8>, ApiError>),
    ToggleStats,
    StatsLoaded(Result<AggregateStats, ApiError>),
}

/// Side effect requested by the list
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    Fetch(Ticket, ListQuery),
    LoadThumbnails(Vec<RecordId>),
    ConfirmDelete(RecordId),
    Delete(RecordId),
    /// Blocking alert; answered with `Message::AlertDismissed`
    Alert(String),
    Edit(TravelRecord),
    LoadStats,
}

/// Everything a fetch depends on. Any change schedules exactly one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FetchKey {
    filters: FilterCriteria,
    refresh: u64,
}

#[derive(Debug, Clone, Default)]
enum StatsPanel {
    #[default]
    Closed,
    Loading,
    Ready(AggregateStats),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MinRatingOption {
    Any,
    AtLeast(Rating),
}

static MIN_RATING_OPTIONS: [MinRatingOption; 6] = [
    MinRatingOption::Any,
    MinRatingOption::AtLeast(Rating::ALL[0]),
    MinRatingOption::AtLeast(Rating::ALL[1]),
    MinRatingOption::AtLeast(Rating::ALL[2]),
    MinRatingOption::AtLeast(Rating::ALL[3]),
    MinRatingOption::AtLeast(Rating::ALL[4]),
];

impl MinRatingOption {
    fn from_criteria(value: &str) -> Self {
        value
            .parse::<u8>()
            .ok()
            .and_then(Rating::new)
            .map_or(Self::Any, Self::AtLeast)
    }

    fn value(self) -> String {
        match self {
            Self::Any => String::new(),
            Self::AtLeast(rating) => rating.get().to_string(),
        }
    }
}

impl fmt::Display for MinRatingOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "Min Rating"),
            Self::AtLeast(rating) if rating.get() == Rating::MAX => write!(f, "{} Stars", rating.get()),
            Self::AtLeast(rating) => write!(f, "{}+ Stars", rating.get()),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordList {
    envelope: Option<TravelRecordList>,
    slot: RequestSlot,
    error: Option<String>,
    filters: FilterCriteria,
    refresh: u64,
    applied: Option<FetchKey>,
    thumbnails: HashMap<RecordId, Thumbnail>,
    stats: StatsPanel,
}

impl RecordList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the shell's refresh counter. Fetches when it (or the filters)
    /// changed since the last fetch; the first call always fetches.
    pub fn sync(&mut self, refresh: u64) -> Action {
        self.refresh = refresh;
        self.reconcile()
    }

    pub fn records(&self) -> &[TravelRecord] {
        self.envelope
            .as_ref()
            .map(|envelope| envelope.records.as_slice())
            .unwrap_or_default()
    }

    pub fn total(&self) -> u64 {
        self.envelope.as_ref().map_or(0, |envelope| envelope.total)
    }

    pub fn is_loading(&self) -> bool {
        self.slot.is_pending()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    fn reconcile(&mut self) -> Action {
        let key = FetchKey {
            filters: self.filters.clone(),
            refresh: self.refresh,
        };
        if self.applied.as_ref() == Some(&key) {
            return Action::None;
        }
        self.applied = Some(key);
        self.fetch()
    }

    fn fetch(&mut self) -> Action {
        let ticket = self.slot.issue();
        Action::Fetch(ticket, self.filters.to_query())
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::FilterChanged(field, value) => {
                self.filters.set(field, value);
                self.reconcile()
            }
            Message::Fetched(ticket, result) => {
                if !self.slot.settle(ticket) {
                    tracing::debug!(?ticket, "discarding superseded list response");
                    return Action::None;
                }
                match result {
                    Ok(envelope) => {
                        let with_photos: Vec<RecordId> = envelope
                            .records
                            .iter()
                            .filter(|record| record.image_filename.is_some())
                            .map(|record| record.id)
                            .collect();
                        tracing::debug!(
                            shown = envelope.records.len(),
                            total = envelope.total,
                            "travel records loaded"
                        );

                        self.thumbnails = with_photos
                            .iter()
                            .map(|id| (*id, Thumbnail::Loading))
                            .collect();
                        self.envelope = Some(envelope);
                        self.error = None;

                        if with_photos.is_empty() {
                            Action::None
                        } else {
                            Action::LoadThumbnails(with_photos)
                        }
                    }
                    Err(error) => {
                        tracing::error!(%error, "failed to fetch travel records");
                        self.error = Some(FETCH_ERROR.to_string());
                        Action::None
                    }
                }
            }
            Message::EditPressed(record) => Action::Edit(record),
            Message::DeletePressed(id) => Action::ConfirmDelete(id),
            Message::DeleteConfirmed(id, true) => Action::Delete(id),
            Message::DeleteConfirmed(id, false) => {
                tracing::debug!(id, "delete declined");
                Action::None
            }
            Message::Deleted(id, Ok(())) => {
                tracing::info!(id, "🗑️ travel record deleted");
                self.fetch()
            }
            Message::Deleted(id, Err(error)) => {
                tracing::error!(id, %error, "failed to delete travel record");
                Action::Alert(DELETE_ERROR.to_string())
            }
            Message::AlertDismissed => self.fetch(),
            Message::ThumbnailLoaded(id, result) => {
                // Responses for records that left the envelope are dropped
                if let Some(thumbnail) = self.thumbnails.get_mut(&id) {
                    *thumbnail = Thumbnail::from_fetch(result);
                }
                Action::None
            }
            Message::ToggleStats => match self.stats {
                StatsPanel::Closed => {
                    self.stats = StatsPanel::Loading;
                    Action::LoadStats
                }
                _ => {
                    self.stats = StatsPanel::Closed;
                    Action::None
                }
            },
            Message::StatsLoaded(result) => {
                if matches!(self.stats, StatsPanel::Closed) {
                    return Action::None;
                }
                self.stats = match result {
                    Ok(stats) => StatsPanel::Ready(stats),
                    Err(error) => {
                        tracing::warn!(%error, "failed to load statistics");
                        StatsPanel::Failed
                    }
                };
                Action::None
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let mut content = column![self.filter_bar()].spacing(16);

        if let Some(panel) = self.stats_panel() {
            content = content.push(panel);
        }

        content
            .push(text(format!("Travel Records ({})", self.total())).size(24))
            .push(self.body())
            .into()
    }

    fn filter_bar(&self) -> Element<'_, Message> {
        let stats_label = match self.stats {
            StatsPanel::Closed => "Show Stats",
            _ => "Hide Stats",
        };

        let controls = row![
            filter_input("Country", &self.filters.country, FilterField::Country),
            filter_input("City", &self.filters.city, FilterField::City),
            filter_input("Category", &self.filters.category, FilterField::Category),
            pick_list(
                &MIN_RATING_OPTIONS[..],
                Some(MinRatingOption::from_criteria(&self.filters.min_rating)),
                |option: MinRatingOption| Message::FilterChanged(FilterField::MinRating, option.value()),
            )
            .padding(8),
            horizontal_space(),
            button(text(stats_label))
                .on_press(Message::ToggleStats)
                .style(button::secondary),
        ]
        .spacing(12);

        container(column![text("Filter Records").size(18), controls].spacing(12))
            .padding(16)
            .width(Length::Fill)
            .style(container::rounded_box)
            .into()
    }

    fn stats_panel(&self) -> Option<Element<'_, Message>> {
        let body: Element<'_, Message> = match &self.stats {
            StatsPanel::Closed => return None,
            StatsPanel::Loading => text("Loading statistics...").into(),
            StatsPanel::Failed => text(STATS_ERROR).color(Color::from_rgb(0.8, 0.1, 0.1)).into(),
            StatsPanel::Ready(stats) => stats_summary(stats),
        };

        Some(
            container(column![text("Statistics").size(18), body].spacing(12))
                .padding(16)
                .width(Length::Fill)
                .style(container::rounded_box)
                .into(),
        )
    }

    fn body(&self) -> Element<'_, Message> {
        if self.is_loading() {
            return text("Loading...").into();
        }
        if let Some(error) = &self.error {
            return text(error.as_str()).color(Color::from_rgb(0.8, 0.1, 0.1)).into();
        }

        let records = self.records();
        if records.is_empty() {
            return text(EMPTY_MESSAGE).color(Color::from_rgb(0.4, 0.4, 0.4)).into();
        }

        let cards: Vec<Element<'_, Message>> = records
            .iter()
            .map(|record| {
                card::view(
                    record,
                    self.thumbnails.get(&record.id),
                    Message::EditPressed(record.clone()),
                    Message::DeletePressed(record.id),
                )
            })
            .collect();

        Wrap::with_elements(cards)
            .spacing(16.0_f32)
            .line_spacing(16.0_f32)
            .into()
    }
}

fn filter_input<'a>(placeholder: &str, value: &str, field: FilterField) -> TextInput<'a, Message> {
    text_input(placeholder, value)
        .on_input(move |value| Message::FilterChanged(field, value))
        .padding(8)
        .width(Length::Fixed(160.0))
}

fn stats_summary(stats: &AggregateStats) -> Element<'_, Message> {
    let mut lines = column![
        text(format!("Countries visited: {}", stats.total_countries_visited)),
        text(format!("Cities visited: {}", stats.total_cities_visited)),
    ]
    .spacing(4);

    if !stats.average_rating_by_country.is_empty() {
        lines = lines.push(text("Average rating by country").size(16));
        for (country, average) in &stats.average_rating_by_country {
            lines = lines.push(text(format!("  {country}: {average:.1}")));
        }
    }
    if !stats.category_distribution.is_empty() {
        lines = lines.push(text("Categories").size(16));
        for (category, count) in &stats.category_distribution {
            lines = lines.push(text(format!("  {category}: {count}")));
        }
    }
    if !stats.top_destinations_by_month.is_empty() {
        lines = lines.push(text("Top destination by month").size(16));
        for (month, title) in &stats.top_destinations_by_month {
            lines = lines.push(text(format!("  {month}: {title}")));
        }
    }

    lines.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::sample_record;

    fn envelope(records: Vec<TravelRecord>) -> TravelRecordList {
        TravelRecordList {
            total: records.len() as u64,
            records,
            page: 1,
            per_page: 100,
        }
    }

    fn expect_fetch(action: Action) -> (Ticket, ListQuery) {
        match action {
            Action::Fetch(ticket, query) => (ticket, query),
            other => panic!("expected a fetch, got {other:?}"),
        }
    }

    /// A list that has completed its first fetch
    fn loaded(records: Vec<TravelRecord>) -> RecordList {
        let mut list = RecordList::new();
        let (ticket, _) = expect_fetch(list.sync(0));
        list.update(Message::Fetched(ticket, Ok(envelope(records))));
        list
    }

    #[test]
    fn first_sync_fetches_with_no_criteria() {
        let mut list = RecordList::new();
        let (_, query) = expect_fetch(list.sync(0));
        assert!(query.to_pairs().is_empty());
        assert!(list.is_loading());
    }

    #[test]
    fn unchanged_key_does_not_refetch() {
        let mut list = loaded(vec![]);
        assert_eq!(list.sync(0), Action::None);
    }

    #[test]
    fn refresh_counter_change_refetches() {
        let mut list = loaded(vec![]);
        expect_fetch(list.sync(1));
    }

    #[test]
    fn country_filter_scenario_renders_one_card() {
        let mut list = loaded(vec![]);
        let (ticket, query) = expect_fetch(list.update(Message::FilterChanged(
            FilterField::Country,
            "Greece".to_string(),
        )));
        assert_eq!(query.to_pairs(), vec![("country", "Greece".to_string())]);

        list.update(Message::Fetched(ticket, Ok(envelope(vec![sample_record(1)]))));
        assert_eq!(list.total(), 1);
        assert_eq!(list.records().len(), 1);
        assert!(!list.is_loading());
        assert_eq!(list.error(), None);
    }

    #[test]
    fn records_keep_server_order() {
        let list = loaded(vec![sample_record(9), sample_record(2), sample_record(5)]);
        let ids: Vec<RecordId> = list.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![9, 2, 5]);
    }

    #[test]
    fn out_of_order_responses_keep_newest() {
        let mut list = loaded(vec![]);
        let (older, _) = expect_fetch(list.update(Message::FilterChanged(
            FilterField::Country,
            "G".to_string(),
        )));
        let (newer, _) = expect_fetch(list.update(Message::FilterChanged(
            FilterField::Country,
            "Greece".to_string(),
        )));

        list.update(Message::Fetched(newer, Ok(envelope(vec![sample_record(1)]))));
        list.update(Message::Fetched(
            older,
            Ok(envelope(vec![sample_record(1), sample_record(2)])),
        ));

        assert_eq!(list.records().len(), 1);
    }

    #[test]
    fn fetch_failure_shows_fixed_message_and_keeps_data() {
        let mut list = loaded(vec![sample_record(1)]);
        let (ticket, _) = expect_fetch(list.sync(1));
        list.update(Message::Fetched(
            ticket,
            Err(ApiError::NetworkFailure("connection refused".to_string())),
        ));

        assert_eq!(list.error(), Some(FETCH_ERROR));
        assert_eq!(list.records().len(), 1);
        assert!(!list.is_loading());
    }

    #[test]
    fn success_clears_previous_error() {
        let mut list = RecordList::new();
        let (ticket, _) = expect_fetch(list.sync(0));
        list.update(Message::Fetched(ticket, Err(ApiError::ServiceError { status: 500, detail: None })));
        let (ticket, _) = expect_fetch(list.sync(1));
        list.update(Message::Fetched(ticket, Ok(envelope(vec![]))));
        assert_eq!(list.error(), None);
    }

    #[test]
    fn declined_confirmation_issues_nothing() {
        let mut list = loaded(vec![sample_record(1)]);
        assert_eq!(list.update(Message::DeletePressed(1)), Action::ConfirmDelete(1));
        assert_eq!(list.update(Message::DeleteConfirmed(1, false)), Action::None);
        assert_eq!(list.records().len(), 1);
        assert!(!list.is_loading());
    }

    #[test]
    fn confirmed_delete_then_refetches() {
        let mut list = loaded(vec![sample_record(1)]);
        assert_eq!(list.update(Message::DeleteConfirmed(1, true)), Action::Delete(1));
        expect_fetch(list.update(Message::Deleted(1, Ok(()))));
        // no optimistic removal
        assert_eq!(list.records().len(), 1);
    }

    #[test]
    fn failed_delete_alerts_without_touching_data_then_refetches() {
        let mut list = loaded(vec![sample_record(1), sample_record(2)]);
        let action = list.update(Message::Deleted(
            2,
            Err(ApiError::NotFound { detail: Some("Travel record not found".to_string()) }),
        ));
        assert_eq!(action, Action::Alert(DELETE_ERROR.to_string()));
        assert_eq!(list.records().len(), 2);
        assert!(!list.is_loading());

        expect_fetch(list.update(Message::AlertDismissed));
    }

    #[test]
    fn edit_is_forwarded_to_shell() {
        let mut list = loaded(vec![sample_record(3)]);
        assert_eq!(
            list.update(Message::EditPressed(sample_record(3))),
            Action::Edit(sample_record(3))
        );
    }

    #[test]
    fn thumbnails_requested_only_for_records_with_photos() {
        let mut with_photo = sample_record(2);
        with_photo.image_filename = Some("abc.jpg".to_string());

        let mut list = RecordList::new();
        let (ticket, _) = expect_fetch(list.sync(0));
        let action = list.update(Message::Fetched(
            ticket,
            Ok(envelope(vec![sample_record(1), with_photo])),
        ));
        assert_eq!(action, Action::LoadThumbnails(vec![2]));

        list.update(Message::ThumbnailLoaded(2, Err(ApiError::NotFound { detail: None })));
        assert!(matches!(list.thumbnails.get(&2), Some(Thumbnail::Hidden)));

        // not part of the envelope
        list.update(Message::ThumbnailLoaded(1, Ok(vec![])));
        assert!(!list.thumbnails.contains_key(&1));
    }

    #[test]
    fn stats_panel_toggles_and_loads() {
        let mut list = loaded(vec![]);
        assert_eq!(list.update(Message::ToggleStats), Action::LoadStats);
        list.update(Message::StatsLoaded(Ok(AggregateStats {
            total_countries_visited: 3,
            ..AggregateStats::default()
        })));
        assert!(matches!(list.stats, StatsPanel::Ready(_)));

        assert_eq!(list.update(Message::ToggleStats), Action::None);
        assert!(matches!(list.stats, StatsPanel::Closed));

        // late answer after closing is ignored
        list.update(Message::StatsLoaded(Err(ApiError::NetworkFailure("x".to_string()))));
        assert!(matches!(list.stats, StatsPanel::Closed));
    }

    #[test]
    fn min_rating_options_round_trip_through_criteria() {
        assert_eq!(MinRatingOption::from_criteria(""), MinRatingOption::Any);
        assert_eq!(MinRatingOption::from_criteria("4").value(), "4");
        assert_eq!(MinRatingOption::from_criteria("4").to_string(), "4+ Stars");
        assert_eq!(MinRatingOption::from_criteria("5").to_string(), "5 Stars");
        assert_eq!(MinRatingOption::Any.value(), "");
    }
}
