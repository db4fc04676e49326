//! Item command - item management.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use console::Style;
use gorse_client::{GorseClient, Item, ItemPatch, Labels};

use super::{Context, print_done, print_empty, print_header, print_json};

/// Arguments for the item command.
#[derive(Args, Debug)]
pub struct ItemArgs {
    #[command(subcommand)]
    pub command: ItemCommand,
}

#[derive(Subcommand, Debug)]
pub enum ItemCommand {
    /// Show an item
    Get {
        /// Item ID
        item_id: String,
    },

    /// Update some fields of an item
    Update {
        /// Item ID
        item_id: String,

        /// Hide or show the item
        #[arg(long)]
        hidden: Option<bool>,

        /// Comma-separated categories
        #[arg(long, value_delimiter = ',')]
        categories: Option<Vec<String>>,

        /// Comma-separated labels
        #[arg(long, value_delimiter = ',')]
        labels: Option<Vec<String>>,

        /// ISO 8601 timestamp
        #[arg(long)]
        timestamp: Option<String>,

        /// Free-text comment
        #[arg(long)]
        comment: Option<String>,
    },

    /// Delete an item
    Delete {
        /// Item ID
        item_id: String,
    },

    /// List all items
    List {
        /// Items fetched per request
        #[arg(long, default_value = "100")]
        page_size: usize,
    },
}

/// Run the item command.
pub async fn run(args: ItemArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;

    match args.command {
        ItemCommand::Get { item_id } => {
            let item = client.get_item(&item_id).await?;
            if ctx.json_output {
                print_json(&item)?;
            } else {
                print_header("Item");
                print_item(&item);
            }
        }
        ItemCommand::Update {
            item_id,
            hidden,
            categories,
            labels,
            timestamp,
            comment,
        } => {
            let mut patch = ItemPatch::new();
            if let Some(hidden) = hidden {
                patch = patch.is_hidden(hidden);
            }
            if let Some(categories) = categories {
                patch = patch.categories(categories);
            }
            if let Some(labels) = labels {
                patch = patch.labels(labels);
            }
            if let Some(timestamp) = timestamp {
                patch = patch.timestamp(timestamp);
            }
            if let Some(comment) = comment {
                patch = patch.comment(comment);
            }
            if patch.is_empty() {
                bail!("nothing to update for item {}", item_id);
            }

            let rows = client.update_item(&item_id, patch).await?;
            if ctx.json_output {
                print_json(&rows)?;
            } else {
                print_done(&format!("Updated item {}", item_id));
            }
        }
        ItemCommand::Delete { item_id } => {
            let rows = client.delete_item(&item_id).await?;
            if ctx.json_output {
                print_json(&rows)?;
            } else {
                print_done(&format!("Deleted item {} ({} rows)", item_id, rows.row_affected));
            }
        }
        ItemCommand::List { page_size } => {
            let items = list_all(&client, page_size).await?;
            if ctx.json_output {
                print_json(&items)?;
            } else {
                print_header("Items");
                if items.is_empty() {
                    print_empty("items");
                }
                for item in &items {
                    print_item(item);
                }
            }
        }
    }

    Ok(())
}

/// Follow cursors until the server reports the last page.
async fn list_all(client: &GorseClient, page_size: usize) -> Result<Vec<Item>> {
    let mut all = Vec::new();
    let mut cursor = String::new();
    loop {
        let (items, next) = client.get_items(page_size, &cursor).await?.into_parts();
        tracing::debug!(fetched = items.len(), "item page");
        all.extend(items);
        if next.is_empty() {
            return Ok(all);
        }
        cursor = next;
    }
}

fn print_item(item: &Item) {
    let dim = Style::new().dim();
    let mut line = item.item_id.clone();
    if item.is_hidden {
        line.push_str(" (hidden)");
    }
    if !item.categories.is_empty() {
        line.push_str(&format!(" [{}]", item.categories.join(", ")));
    }
    if let Some(labels) = &item.labels {
        line.push_str(&format!(" labels={}", format_labels(labels)));
    }
    if item.comment.is_empty() {
        println!("{}", line);
    } else {
        println!("{} {}", line, dim.apply_to(&item.comment));
    }
}

pub fn format_labels(labels: &Labels) -> String {
    match labels {
        Labels::List(list) => list.join(","),
        Labels::Map(map) => serde_json::Value::Object(map.clone()).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_labels() {
        assert_eq!(format_labels(&Labels::list(["a", "b"])), "a,b");
        let mut map = serde_json::Map::new();
        map.insert("topic".into(), serde_json::json!("rust"));
        assert_eq!(format_labels(&Labels::Map(map)), r#"{"topic":"rust"}"#);
    }
}
