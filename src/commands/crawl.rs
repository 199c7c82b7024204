use anyhow::{Context, Result};

use newsharvest::config::Config;
use newsharvest::job::CrawlJob;
use newsharvest::models::{RunOutcome, RunSummary};

/// Run a single crawl and print its summary
pub async fn crawl(config: Config, json: bool) -> Result<()> {
    let job = CrawlJob::new(&config).context("Failed to set up crawl job")?;
    let summary = job.run().await.context("Crawl run failed")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
    } else {
        print_summary(&config, &summary);
    }

    Ok(())
}

fn print_summary(config: &Config, summary: &RunSummary) {
    println!("\nCrawl Summary");
    println!("=============");
    println!("  Category:        {}", summary.category);
    println!(
        "  Listing pages:   {} fetched, {} failed ({})",
        summary.pages_fetched, summary.pages_failed, summary.stop_reason
    );
    println!("  Links found:     {}", summary.links_discovered);
    println!(
        "  Articles:        {} saved, {} failed",
        summary.articles.succeeded, summary.articles.failed
    );
    println!(
        "  Images:          {} downloaded, {} failed",
        summary.articles.images_downloaded, summary.articles.images_failed
    );
    println!(
        "  Duration:        {}s",
        (summary.finished_at - summary.started_at).num_seconds()
    );

    match summary.outcome() {
        RunOutcome::NoArticles => println!("\nNo articles were collected."),
        RunOutcome::Partial | RunOutcome::Complete => {
            println!("\n  CSV:     {}", config.output.csv_path.display());
            println!("  Gallery: {}", config.output.gallery_path.display());
        }
    }
}
