//! User command - user management.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use console::Style;
use gorse_client::{User, UserPatch};

use super::items::format_labels;
use super::{Context, print_done, print_empty, print_header, print_json};

/// Arguments for the user command.
#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Show a user
    Get {
        /// User ID
        user_id: String,
    },

    /// Update some fields of a user
    Update {
        /// User ID
        user_id: String,

        /// Comma-separated labels
        #[arg(long, value_delimiter = ',')]
        labels: Option<Vec<String>>,

        /// Comma-separated subscribed categories
        #[arg(long, value_delimiter = ',')]
        subscribe: Option<Vec<String>>,

        /// Free-text comment
        #[arg(long)]
        comment: Option<String>,
    },

    /// Delete a user
    Delete {
        /// User ID
        user_id: String,
    },

    /// List all users
    List {
        /// Users fetched per request
        #[arg(long, default_value = "100")]
        page_size: usize,
    },
}

/// Run the user command.
pub async fn run(args: UserArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;

    match args.command {
        UserCommand::Get { user_id } => {
            let user = client.get_user(&user_id).await?;
            if ctx.json_output {
                print_json(&user)?;
            } else {
                print_header("User");
                print_user(&user);
            }
        }
        UserCommand::Update {
            user_id,
            labels,
            subscribe,
            comment,
        } => {
            let mut patch = UserPatch::new();
            if let Some(labels) = labels {
                patch = patch.labels(labels);
            }
            if let Some(subscribe) = subscribe {
                patch = patch.subscribe(subscribe);
            }
            if let Some(comment) = comment {
                patch = patch.comment(comment);
            }
            if patch.is_empty() {
                bail!("nothing to update for user {}", user_id);
            }

            let rows = client.update_user(&user_id, patch).await?;
            if ctx.json_output {
                print_json(&rows)?;
            } else {
                print_done(&format!("Updated user {}", user_id));
            }
        }
        UserCommand::Delete { user_id } => {
            let rows = client.delete_user(&user_id).await?;
            if ctx.json_output {
                print_json(&rows)?;
            } else {
                print_done(&format!("Deleted user {} ({} rows)", user_id, rows.row_affected));
            }
        }
        UserCommand::List { page_size } => {
            let mut users = Vec::new();
            let mut cursor = String::new();
            loop {
                let page = client.get_users(page_size, &cursor).await?;
                let last = page.is_last();
                let (batch, next) = page.into_parts();
                users.extend(batch);
                if last {
                    break;
                }
                cursor = next;
            }

            if ctx.json_output {
                print_json(&users)?;
            } else {
                print_header("Users");
                if users.is_empty() {
                    print_empty("users");
                }
                for user in &users {
                    print_user(user);
                }
            }
        }
    }

    Ok(())
}

fn print_user(user: &User) {
    let dim = Style::new().dim();
    let mut line = user.user_id.clone();
    if !user.subscribe.is_empty() {
        line.push_str(&format!(" subscribes [{}]", user.subscribe.join(", ")));
    }
    if let Some(labels) = &user.labels {
        line.push_str(&format!(" labels={}", format_labels(labels)));
    }
    if user.comment.is_empty() {
        println!("{}", line);
    } else {
        println!("{} {}", line, dim.apply_to(&user.comment));
    }
}
