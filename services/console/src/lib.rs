mod cli;
mod console;
mod infra;
mod render;

use rentease::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
