use jeda_core::models::total_pages;

use crate::cli::StatsCommands;
use crate::commands::common::{format_ranking_lines, format_summary_lines, ranking_items, CliContext};
use crate::error::CliError;

pub async fn run_stats(command: StatsCommands, context: &CliContext) -> Result<(), CliError> {
    match command {
        StatsCommands::Summary { json } => run_stats_summary(json, context).await,
        StatsCommands::Rankings { page, limit, json } => {
            run_stats_rankings(page, limit, json, context).await
        }
    }
}

pub async fn run_stats_summary(as_json: bool, context: &CliContext) -> Result<(), CliError> {
    let client = context.signed_in_api_client().await?;
    let summary = client.fetch_summary().await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for line in format_summary_lines(&summary) {
            println!("{line}");
        }
    }
    Ok(())
}

pub async fn run_stats_rankings(
    page: u32,
    limit: u32,
    as_json: bool,
    context: &CliContext,
) -> Result<(), CliError> {
    let client = context.signed_in_api_client().await?;
    let rankings = client.fetch_rankings(page, limit).await?;
    let items = ranking_items(&rankings, page, limit);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No rankings on page {page}.");
        return Ok(());
    }
    for line in format_ranking_lines(&items) {
        println!("{line}");
    }
    println!(
        "Page {} of {}",
        page,
        total_pages(rankings.total, limit).max(1)
    );
    Ok(())
}
