/// Screens and widgets
/// - card.rs: one record's summary tile
/// - list.rs: filters, statistics and the card grid
/// - form.rs: create and edit
pub mod card;
pub mod form;
pub mod list;
