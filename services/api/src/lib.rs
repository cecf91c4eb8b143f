mod cli;
mod infra;
mod quote;
mod routes;
mod server;

use pricing_engine::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
