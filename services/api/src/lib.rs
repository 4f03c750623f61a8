mod cli;
mod grade;
mod infra;
mod routes;
mod server;

use answer_grader::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
