mod app;
mod config;
mod http;
mod render;
mod track;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::HttpError;
pub use render::RenderError;
pub use track::TrackError;
pub use validation::ValidationError;
