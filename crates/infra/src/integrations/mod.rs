//! External service integrations

pub mod calendar;
pub mod openai;

pub use calendar::CalendarApiClient;
pub use openai::OpenAiExtractionClient;
