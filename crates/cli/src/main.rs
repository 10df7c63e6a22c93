mod client;
mod config;
mod error;
mod render;

use feed::{LoadOutcome, TransactionFeed, normalize};

use crate::{
    client::{HttpStore, message_for_error},
    config::{Command, FilterArgs},
    error::{AppError, Result},
};

type Feed = TransactionFeed<HttpStore>;

#[tokio::main]
async fn main() -> Result<()> {
    let (config, command) = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "ledgerline={level},feed={level}",
            level = config.level
        ))
        .init();

    let store = HttpStore::new(&config)?;
    let mut feed = TransactionFeed::new(store, config.loader)?;

    match command {
        Command::List { filters, pages } => {
            load(&mut feed, &filters).await?;
            for _ in 0..pages {
                // Pretend the viewport reached the last materialized row.
                let render_end = feed.state().loaded().saturating_sub(1);
                let outcome = feed.on_viewport(render_end).await;
                if settle(&mut feed, outcome).await? == LoadOutcome::Skipped {
                    break;
                }
            }
            println!("{}", render::list(&feed.state().snapshot()));
        }
        Command::Suggest { filters, prefix } => {
            load(&mut feed, &filters).await?;
            let suggestions = match prefix {
                Some(prefix) => feed.suggestions().matching(&prefix),
                None => feed.suggestions().suggestions(),
            };
            for suggestion in suggestions {
                println!("{suggestion}");
            }
            println!("({} loaded records searched)", feed.state().loaded());
        }
        Command::Delete { id, filters } => {
            load(&mut feed, &filters).await?;
            if let Err(err) = feed.delete(id).await {
                eprintln!("{}", message_for_error(&err));
                return Err(err.into());
            }
            println!("{}", render::status_line(&feed.state().snapshot()));
        }
    }

    Ok(())
}

async fn load(feed: &mut Feed, filters: &FilterArgs) -> Result<()> {
    let query = normalize(&filters.to_form())?;
    let outcome = feed.load_initial(query).await;
    settle(feed, outcome).await?;
    Ok(())
}

/// Turns failures into errors and re-probes once when the total drifted.
async fn settle(feed: &mut Feed, outcome: LoadOutcome) -> Result<LoadOutcome> {
    match outcome {
        LoadOutcome::Failed(err) => {
            eprintln!("{}", message_for_error(&err));
            Err(AppError::Store(err))
        }
        LoadOutcome::Drifted { expected, reported } => {
            tracing::info!(expected, reported, "re-probing after drift");
            match feed.refresh().await {
                LoadOutcome::Failed(err) => Err(AppError::Store(err)),
                other => Ok(other),
            }
        }
        other => Ok(other),
    }
}
