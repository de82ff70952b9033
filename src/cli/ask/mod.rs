//! Ask command - runs a single question to a terminal outcome

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{SessionContext, TurnOutcome};
use crate::infrastructure::observability;

#[derive(Args)]
pub struct AskArgs {
    /// The question to answer
    #[arg(required = true)]
    pub question: Vec<String>,
}

pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    observability::init_tracing(&config.logging);
    config.validate()?;

    let engine = crate::create_engine(&config)?;
    let mut session = SessionContext::new();

    let question = args.question.join(" ");
    let record = session.ask(&engine, question).await?;

    info!(turn = %record.id, "turn recorded");

    match &record.outcome {
        TurnOutcome::Answered { generation } => println!("{generation}"),
        outcome => {
            if let Some(reason) = outcome.failure_reason() {
                eprintln!("{reason}");
            }
        }
    }

    Ok(())
}
