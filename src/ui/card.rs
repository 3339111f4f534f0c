/// Record card: the summary tile shown in the list grid
use iced::widget::image::{Handle, Image};
use iced::widget::{button, column, container, row, text};
use iced::{Color, ContentFit, Element, Length};

use crate::api::ApiError;
use crate::photo::looks_like_image;
use crate::state::data::{Rating, TravelRecord};
use crate::state::dates::format_display_date;

const CARD_WIDTH: f32 = 320.0;
const THUMBNAIL_SIZE: f32 = 80.0;

/// Load state of a card's photo
#[derive(Debug, Clone)]
pub enum Thumbnail {
    Loading,
    Ready(Handle),
    /// Fetch failed or the bytes are not an image; nothing is drawn
    Hidden,
}

impl Thumbnail {
    pub fn from_fetch(result: Result<Vec<u8>, ApiError>) -> Self {
        match result {
            Ok(bytes) if looks_like_image(&bytes) => Self::Ready(Handle::from_bytes(bytes)),
            Ok(_) => Self::Hidden,
            Err(error) => {
                tracing::debug!(%error, "hiding thumbnail");
                Self::Hidden
            }
        }
    }
}

/// "★★★☆☆" for a rating of 3
pub fn rating_stars(rating: Rating) -> String {
    let filled = rating.get() as usize;
    let empty = Rating::MAX as usize - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

/// Build the card. Edit and delete are reported through the given messages;
/// the card itself holds no state.
pub fn view<'a, Message: Clone + 'a>(
    record: &'a TravelRecord,
    thumbnail: Option<&'a Thumbnail>,
    on_edit: Message,
    on_delete: Message,
) -> Element<'a, Message> {
    let muted = Color::from_rgb(0.4, 0.4, 0.4);

    let mut details = column![
        text(record.title.as_str()).size(20),
        text(format!("📍 {}, {}", record.city, record.country)).color(muted),
        text(format!("📅 {}", format_display_date(&record.visit_date))).color(muted),
        text(format!("🏷️ {}", record.category)).color(muted),
        text(rating_stars(record.rating)).size(18),
    ]
    .spacing(4)
    .width(Length::Fill);

    if let Some(notes) = record.notes.as_deref().filter(|notes| !notes.is_empty()) {
        details = details.push(text(format!("\"{notes}\"")).color(Color::from_rgb(0.33, 0.33, 0.33)));
    }

    let mut summary = row![details].spacing(16);
    if let Some(Thumbnail::Ready(handle)) = thumbnail {
        summary = summary.push(
            Image::<Handle>::new(handle.clone())
                .width(Length::Fixed(THUMBNAIL_SIZE))
                .height(Length::Fixed(THUMBNAIL_SIZE))
                .content_fit(ContentFit::Cover),
        );
    }

    let actions = row![
        button(text("Edit").size(14))
            .on_press(on_edit)
            .style(button::primary),
        button(text("Delete").size(14))
            .on_press(on_delete)
            .style(button::danger),
    ]
    .spacing(8);

    container(column![summary, actions].spacing(12))
        .padding(16)
        .width(Length::Fixed(CARD_WIDTH))
        .style(container::rounded_box)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stars_match_rating() {
        for rating in Rating::ALL {
            let stars = rating_stars(rating);
            let filled = stars.chars().filter(|c| *c == '★').count();
            let empty = stars.chars().filter(|c| *c == '☆').count();
            assert_eq!(filled, rating.get() as usize);
            assert_eq!(empty, 5 - rating.get() as usize);
        }
    }

    #[test]
    fn three_stars_render_filled_then_hollow() {
        assert_eq!(rating_stars(Rating::new(3).unwrap()), "★★★☆☆");
    }

    #[test]
    fn failed_fetch_hides_thumbnail() {
        let thumbnail = Thumbnail::from_fetch(Err(ApiError::NotFound { detail: None }));
        assert!(matches!(thumbnail, Thumbnail::Hidden));
    }

    #[test]
    fn non_image_body_hides_thumbnail() {
        let thumbnail = Thumbnail::from_fetch(Ok(b"{\"detail\":\"nope\"}".to_vec()));
        assert!(matches!(thumbnail, Thumbnail::Hidden));
    }

    #[test]
    fn image_bytes_become_visible_thumbnail() {
        let png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert!(matches!(Thumbnail::from_fetch(Ok(png)), Thumbnail::Ready(_)));
    }
}
