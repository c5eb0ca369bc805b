mod app;
mod args;
mod config;
mod entry;
mod error;
mod geo;
mod logger;
mod movebank;
mod playback;
mod render;
mod timestamp;
mod track;
mod ui;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
