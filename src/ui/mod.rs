//! Terminal viewer: layout, map canvas and panels drawn from render models.
mod model;
mod render;

#[cfg(test)]
mod tests;

pub use model::UiRenderData;
pub use render::{TerminalGuard, Ui, UiActions, draw_frame};
