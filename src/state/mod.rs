/// State management module
///
/// This module holds everything the UI reasons about that is not a widget:
/// - Wire data structures (data.rs)
/// - Filter criteria and list queries (filter.rs)
/// - Date conversions between the form and the service (dates.rs)
/// - The single-slot request supervisor for list fetches (request.rs)

pub mod data;
pub mod dates;
pub mod filter;
pub mod request;
