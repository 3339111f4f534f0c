use iced::widget::{button, column, container, horizontal_space, row, scrollable, text};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::{AsyncMessageDialog, MessageButtons, MessageDialogResult, MessageLevel};
use std::sync::Arc;

mod api;
mod config;
mod logging;
mod photo;
mod state;
mod ui;

use api::{ApiError, HttpRecordClient, RecordService};
use config::{AppConfig, ConfigError};
use ui::form::{self, RecordForm};
use ui::list::{self, RecordList};

/// Which screen fills the content area
#[derive(Debug)]
enum View {
    List,
    Form(Box<RecordForm>),
}

/// Main application state
struct TravelJournal {
    service: Arc<dyn RecordService>,
    /// Shown in the status line
    base_url: String,
    view: View,
    /// Kept alive while the form is open so filters survive the round trip
    list: RecordList,
    /// Bumped after every successful save; the list re-fetches when it changes
    refresh: u64,
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked "Add New Travel Record"
    AddNew,
    List(list::Message),
    Form(form::Message),
    HealthChecked(Result<(), ApiError>),
}

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("ui failed: {0}")]
    Ui(#[from] iced::Error),
}

impl TravelJournal {
    fn new(config: AppConfig) -> (Self, Task<Message>) {
        let client = HttpRecordClient::new(config.api_base_url);
        tracing::info!(base_url = client.base_url(), "🧳 travel journal starting");
        let base_url = client.base_url().to_string();
        Self::with_service(Arc::new(client), base_url)
    }

    fn with_service(service: Arc<dyn RecordService>, base_url: String) -> (Self, Task<Message>) {
        let mut app = TravelJournal {
            service,
            base_url,
            view: View::List,
            list: RecordList::new(),
            refresh: 0,
            status: "Connecting...".to_string(),
        };

        let first_fetch = app.list.sync(app.refresh);
        let fetch = app.run_list(first_fetch);

        let service = app.service.clone();
        let health = Task::perform(
            async move { service.health().await },
            Message::HealthChecked,
        );

        (app, Task::batch([fetch, health]))
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::AddNew => {
                if matches!(self.view, View::List) {
                    self.view = View::Form(Box::default());
                }
                Task::none()
            }
            Message::List(message) => {
                let action = self.list.update(message);
                self.run_list(action)
            }
            Message::Form(message) => {
                let View::Form(form) = &mut self.view else {
                    tracing::debug!(?message, "form message with no open form");
                    return Task::none();
                };
                let action = form.update(message);
                self.run_form(action)
            }
            Message::HealthChecked(Ok(())) => {
                self.status = format!("Connected to {}", self.base_url);
                Task::none()
            }
            Message::HealthChecked(Err(error)) => {
                tracing::warn!(%error, "health check failed");
                self.status = format!("⚠️ Service unreachable at {}: {error}", self.base_url);
                Task::none()
            }
        }
    }

    /// Turn a list side effect into a task
    fn run_list(&mut self, action: list::Action) -> Task<Message> {
        let service = self.service.clone();
        match action {
            list::Action::None => Task::none(),
            list::Action::Fetch(ticket, query) => Task::perform(
                async move { service.list_records(&query).await },
                move |result| Message::List(list::Message::Fetched(ticket, result)),
            ),
            list::Action::LoadThumbnails(ids) => Task::batch(ids.into_iter().map(|id| {
                let service = service.clone();
                Task::perform(
                    async move { service.fetch_image(id).await },
                    move |result| Message::List(list::Message::ThumbnailLoaded(id, result)),
                )
            })),
            list::Action::ConfirmDelete(id) => Task::perform(confirm_delete(), move |confirmed| {
                Message::List(list::Message::DeleteConfirmed(id, confirmed))
            }),
            list::Action::Delete(id) => Task::perform(
                async move { service.delete_record(id).await },
                move |result| Message::List(list::Message::Deleted(id, result)),
            ),
            list::Action::Alert(message) => {
                Task::perform(alert(message), |()| Message::List(list::Message::AlertDismissed))
            }
            list::Action::Edit(record) => {
                self.view = View::Form(Box::new(RecordForm::edit(record)));
                Task::none()
            }
            list::Action::LoadStats => Task::perform(
                async move { service.aggregate_stats().await },
                |result| Message::List(list::Message::StatsLoaded(result)),
            ),
        }
    }

    /// Turn a form side effect into a task
    fn run_form(&mut self, action: form::Action) -> Task<Message> {
        match action {
            form::Action::None => Task::none(),
            form::Action::PickPhoto => Task::perform(photo::pick_photo(), |result| {
                Message::Form(form::Message::PhotoPicked(result))
            }),
            form::Action::Submit(submission) => Task::perform(
                form::save_record(self.service.clone(), submission),
                |result| Message::Form(form::Message::Saved(result)),
            ),
            form::Action::Saved(record) => {
                self.status = format!("✅ Saved \"{}\"", record.title);
                self.refresh += 1;
                self.show_list()
            }
            form::Action::Cancelled => self.show_list(),
        }
    }

    fn show_list(&mut self) -> Task<Message> {
        self.view = View::List;
        tracing::debug!(refresh = self.refresh, filters = ?self.list.filters(), "back to list");
        let action = self.list.sync(self.refresh);
        self.run_list(action)
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let header = row![
            text("Travel Journal").size(32),
            horizontal_space(),
            button(text("Add New Travel Record"))
                .on_press_maybe(matches!(self.view, View::List).then_some(Message::AddNew))
                .padding([10, 20]),
        ]
        .align_y(Alignment::Center);

        let content = match &self.view {
            View::List => self.list.view().map(Message::List),
            View::Form(form) => container(form.view().map(Message::Form))
                .center_x(Length::Fill)
                .into(),
        };

        let page = column![header, text(&self.status).size(14), content]
            .spacing(20)
            .padding(24)
            .width(Length::Fill);

        scrollable(page).height(Length::Fill).into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn main() -> Result<(), StartupError> {
    logging::init_logging();
    let config = AppConfig::from_env()?;

    iced::application("Travel Journal", TravelJournal::update, TravelJournal::view)
        .theme(TravelJournal::theme)
        .centered()
        .run_with(move || TravelJournal::new(config))?;

    Ok(())
}

/// Ask before deleting; anything but "Yes" declines
async fn confirm_delete() -> bool {
    let answer = AsyncMessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title("Delete travel record")
        .set_description("Are you sure you want to delete this record?")
        .set_buttons(MessageButtons::YesNo)
        .show()
        .await;
    matches!(answer, MessageDialogResult::Yes)
}

async fn alert(message: String) {
    AsyncMessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("Travel Journal")
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show()
        .await;
}
