//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::PaginatorConfig;
use crate::error::{Error, Result, ResultExt};
use crate::pagination::{NavigationAction, PageStream, Paginator};
use crate::source::MemorySource;
use crate::types::{FilterEntry, JsonValue, SortDirection, SortEntry};
use futures::StreamExt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// A line of browse input
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseCommand {
    /// Issue a navigation action
    Navigate(NavigationAction),
    /// Stall the paginator
    Stall,
    /// Resume the paginator
    Resume,
    /// Change the page size
    PageSize(usize),
    /// Replace the sort specification with one entry
    Sort(SortEntry),
    /// Replace the filter specification with one entry
    Filter(FilterEntry),
    /// Stop browsing
    Quit,
}

impl BrowseCommand {
    /// Parse a command line such as `next`, `size 3`, `sort rank desc` or
    /// `filter status == "active"`
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let head = parts
            .next()
            .ok_or_else(|| Error::config("Empty command"))?
            .to_ascii_lowercase();

        match head.as_str() {
            "stall" => Ok(Self::Stall),
            "resume" => Ok(Self::Resume),
            "quit" | "exit" => Ok(Self::Quit),
            "size" => {
                let size = parts
                    .next()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| Error::config("Usage: size <n>"))?;
                Ok(Self::PageSize(size))
            }
            "sort" => {
                let field = parts
                    .next()
                    .ok_or_else(|| Error::config("Usage: sort <field> [asc|desc]"))?;
                let direction = match parts.next() {
                    None | Some("asc") => SortDirection::Asc,
                    Some("desc") => SortDirection::Desc,
                    Some(other) => {
                        return Err(Error::config(format!("Unknown sort direction: {other}")))
                    }
                };
                Ok(Self::Sort(SortEntry {
                    field: field.to_string(),
                    direction,
                }))
            }
            "filter" => {
                let (Some(field), Some(operator)) = (parts.next(), parts.next()) else {
                    return Err(Error::config("Usage: filter <field> <operator> <value>"));
                };
                let raw = parts.collect::<Vec<_>>().join(" ");
                let value = serde_json::from_str(&raw).unwrap_or(JsonValue::String(raw));
                Ok(Self::Filter(FilterEntry::new(field, operator.parse()?, value)))
            }
            other => Ok(Self::Navigate(other.parse()?)),
        }
    }
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Browse {
                records,
                id_field,
                page_size,
                actions,
            } => {
                self.browse(records, id_field, *page_size, actions.as_deref())
                    .await
            }
            Commands::Validate => self.validate(),
        }
    }

    /// Load the config file, or defaults when none was given
    fn load_config(&self) -> Result<PaginatorConfig> {
        match &self.cli.config {
            Some(path) => PaginatorConfig::from_file(path),
            None => Ok(PaginatorConfig::default()),
        }
    }

    /// Validate a config file and print it back normalized
    fn validate(&self) -> Result<()> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("Config file not specified (use -C flag)"))?;
        let config = PaginatorConfig::from_file(path)?;
        println!("{}", serde_json::to_string_pretty(&config)?);
        Ok(())
    }

    /// Page through a records file
    async fn browse(
        &self,
        records: &Path,
        id_field: &str,
        page_size: Option<usize>,
        actions: Option<&str>,
    ) -> Result<()> {
        let mut config = self.load_config()?;
        if let Some(size) = page_size {
            config = config.with_page_size(size);
        }

        let content = fs::read_to_string(records)
            .with_context(|| format!("Failed to read records from {}", records.display()))?;
        let value: JsonValue = serde_json::from_str(&content)?;
        let source = Arc::new(MemorySource::from_json_array(value, id_field)?);
        tracing::info!("Loaded {} records", source.len().await);

        let pager = Paginator::new(source, config)?;
        let mut pages = pager.subscribe();
        if !pager.is_stalled() {
            print_next_page(&mut pages).await?;
        }

        if let Some(actions) = actions {
            for line in actions.split(',').filter(|l| !l.trim().is_empty()) {
                if !apply(&pager, &mut pages, BrowseCommand::parse(line)?).await? {
                    break;
                }
            }
            return Ok(());
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let command = match BrowseCommand::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    eprintln!("{e}");
                    continue;
                }
            };
            if !apply(&pager, &mut pages, command).await? {
                break;
            }
        }

        Ok(())
    }
}

/// Apply one command. Returns `false` when browsing should stop.
async fn apply(
    pager: &Paginator<MemorySource>,
    pages: &mut PageStream<JsonValue>,
    command: BrowseCommand,
) -> Result<bool> {
    let issued = match command {
        BrowseCommand::Quit => return Ok(false),
        BrowseCommand::Stall => {
            pager.stall();
            false
        }
        BrowseCommand::Resume => {
            pager.resume();
            true
        }
        BrowseCommand::Navigate(action) => {
            pager.paginate(action);
            true
        }
        BrowseCommand::PageSize(size) => {
            if let Err(e) = pager.set_page_size(size) {
                eprintln!("{e}");
                return Ok(true);
            }
            true
        }
        BrowseCommand::Sort(entry) => {
            pager.set_sort(Some(vec![entry]));
            true
        }
        BrowseCommand::Filter(entry) => {
            pager.set_filter(Some(vec![entry]));
            true
        }
    };

    // Actions reaching a stalled paginator are dropped and produce no page
    if issued && !pager.is_stalled() {
        print_next_page(pages).await?;
    }
    Ok(true)
}

/// Wait for the next page and print it as one JSON line
async fn print_next_page(pages: &mut PageStream<JsonValue>) -> Result<()> {
    let page = pages
        .next()
        .await
        .ok_or_else(|| Error::Other("Page stream ended".to_string()))??;
    println!("{}", serde_json::to_string(&page)?);
    Ok(())
}
