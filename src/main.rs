mod app;
mod args;
mod bench;
mod config;
mod entry;
mod error;
mod http;
mod logger;
mod stats;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
