mod cli;
mod infra;
mod schools;
mod score;
mod sheet;

use placement::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
