use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use dialoguer::Input;
use tracing::info;

use crate::Config;
use crate::app::status::render_status;
use crate::cli::commands::{Cli, Commands};
use crate::cli::interactive::{ReplCommand, parse_command};
use crate::llm::OpenAiCompatibleClient;
use crate::pipeline::{ResearchPipeline, ResearchQuery, RunOutcome};
use crate::search::TavilyClient;
use crate::session::SessionHistory;
use crate::ui;
use crate::ui::style;

type StockPipeline = ResearchPipeline<TavilyClient, OpenAiCompatibleClient>;

const INTERACTIVE_HELP: &[&str] = &[
    "/history      show the recent drafts panel",
    "/save [PATH]  write the latest draft to a file (default drafted_answer.txt)",
    "/status       show resolved configuration",
    "/quit         leave the loop",
];

pub async fn dispatch(cli: Cli, config: Arc<Config>) -> Result<()> {
    if config.needs_setup()
        && matches!(
            &cli.command,
            Commands::Research { .. } | Commands::Gateway { .. }
        )
    {
        print_setup_hint(&config);
    }

    match cli.command {
        Commands::Research {
            query,
            results,
            temperature,
            save,
        } => {
            let pipeline = StockPipeline::from_config(&config)?;
            match query {
                Some(question) => {
                    run_once(&pipeline, &config, question, results, temperature, save).await
                }
                None => run_interactive(&pipeline, &config, results, temperature).await,
            }
        }

        Commands::Gateway { port, host } => {
            let port = port.unwrap_or(config.gateway.port);
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            if port == 0 {
                info!("Starting DeepDraft gateway on {host} (random port)");
            } else {
                info!("Starting DeepDraft gateway on {host}:{port}");
            }
            crate::gateway::run_gateway(&host, port, Arc::clone(&config)).await
        }

        Commands::Status => {
            println!("{}", render_status(&config));
            Ok(())
        }
    }
}

fn print_setup_hint(config: &Config) {
    println!();
    println!(
        "  {} {}",
        style::accent("*"),
        style::header("Welcome to DeepDraft!")
    );
    println!(
        "  {}",
        style::dim("No API keys configured yet. Set TAVILY_API_KEY and GROQ_API_KEY,")
    );
    println!(
        "  {}",
        style::dim(format!("or add them to {}", config.config_path.display()))
    );
    println!();
}

/// Run a single question through the pipeline and exit.
async fn run_once(
    pipeline: &StockPipeline,
    config: &Config,
    question: String,
    results: Option<u8>,
    temperature: Option<f32>,
    save: Option<String>,
) -> Result<()> {
    let query = ResearchQuery::new(
        question,
        results.unwrap_or(config.search.max_results),
        temperature.unwrap_or(config.drafting.temperature),
    );
    let mut history = SessionHistory::new();
    let outcome = pipeline.run(&query, &mut history).await;
    present_outcome(&query, &config.drafting.model, &outcome);

    match outcome {
        RunOutcome::Drafted { answer, .. } => {
            if let Some(path) = save {
                save_draft(&path, &answer)?;
            }
            Ok(())
        }
        RunOutcome::NoSnippets { error: None } => Ok(()),
        // The cause is already on screen; exit non-zero without printing it twice.
        RunOutcome::NoSnippets { error: Some(_) } => Err(anyhow!("snippet retrieval failed")),
        RunOutcome::DraftFailed { .. } => Err(anyhow!("answer drafting failed")),
    }
}

/// The interactive research loop: questions run the pipeline, slash commands
/// steer the session, a blank line does nothing.
async fn run_interactive(
    pipeline: &StockPipeline,
    config: &Config,
    results: Option<u8>,
    temperature: Option<f32>,
) -> Result<()> {
    println!();
    println!(
        "  {} {}",
        style::accent("*"),
        style::header("DeepDraft research loop")
    );
    println!(
        "  {}",
        style::dim("Type a research question, or /help for commands.")
    );
    println!();

    let mut history = SessionHistory::new();
    loop {
        let line: String = Input::new()
            .with_prompt("  question")
            .allow_empty(true)
            .interact_text()?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if input.starts_with('/') {
            match parse_command(input) {
                Some(ReplCommand::Quit) => break,
                Some(ReplCommand::History) => println!("\n{}\n", ui::render_history(&history)),
                Some(ReplCommand::Status) => println!("\n{}\n", render_status(config)),
                Some(ReplCommand::Save { path }) => match history.latest() {
                    Some(entry) => {
                        let path = path.as_deref().unwrap_or("drafted_answer.txt");
                        if let Err(error) = save_draft(path, &entry.answer) {
                            println!("  {}", style::yellow(format!("Save failed: {error:#}")));
                        }
                    }
                    None => println!("  {}", style::yellow("Nothing drafted yet.")),
                },
                Some(ReplCommand::Help) => {
                    for help_line in INTERACTIVE_HELP {
                        println!("  {}", style::dim(help_line));
                    }
                }
                None => println!("  {}", style::dim("Unknown command. Try /help.")),
            }
            continue;
        }

        let query = ResearchQuery::new(
            input,
            results.unwrap_or(config.search.max_results),
            temperature.unwrap_or(config.drafting.temperature),
        );
        let outcome = pipeline.run(&query, &mut history).await;
        present_outcome(&query, &config.drafting.model, &outcome);
        if !history.is_empty() {
            println!();
            println!("{}", ui::render_history(&history));
        }
        println!();
    }
    Ok(())
}

fn present_outcome(query: &ResearchQuery, model: &str, outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Drafted { snippets, answer } => {
            println!();
            println!("{}", ui::render_snippets(snippets));
            println!();
            println!("{}", ui::render_answer(answer));
            println!();
            println!(
                "  {}",
                style::dim(format!(
                    "model {model} · snippets {} · temperature {:.1}",
                    snippets.len(),
                    query.temperature()
                ))
            );
        }
        RunOutcome::NoSnippets { error } => {
            println!();
            println!("{}", ui::render_no_snippets());
            if let Some(error) = error {
                println!("  {}", style::dim(format!("cause: {error}")));
            }
        }
        RunOutcome::DraftFailed { snippets, error } => {
            println!();
            println!("{}", ui::render_snippets(snippets));
            println!();
            println!("  {}", style::yellow(format!("Drafting failed: {error}")));
        }
    }
}

fn save_draft(path: &str, answer: &str) -> Result<()> {
    let expanded = shellexpand::tilde(path).to_string();
    std::fs::write(&expanded, answer)
        .with_context(|| format!("write drafted answer to {expanded}"))?;
    println!("  {}", style::success(format!("Draft saved to {expanded}")));
    Ok(())
}
