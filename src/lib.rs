mod cli;
mod report;
pub mod routes;
mod server;

use mindscreen::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
