use crate::grade::{run_batch, run_grade, run_questions, BatchArgs, GradeArgs, QuestionsArgs};
use crate::server;
use answer_grader::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Answer Grader",
    about = "Grade candidate answers against reference answers from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Grade a single candidate answer with the scoring engine
    Grade(GradeArgs),
    /// Grade every row of a CSV file
    Batch(BatchArgs),
    /// List the predefined question bank
    Questions(QuestionsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Grade(args) => run_grade(args),
        Command::Batch(args) => run_batch(args),
        Command::Questions(args) => run_questions(args),
    }
}
