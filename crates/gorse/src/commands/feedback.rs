//! Feedback command - record and inspect user feedback.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;
use gorse_client::Feedback;

use super::{Context, print_done, print_empty, print_header, print_json};

/// Arguments for the feedback command.
#[derive(Args, Debug)]
pub struct FeedbackArgs {
    #[command(subcommand)]
    pub command: FeedbackCommand,
}

#[derive(Subcommand, Debug)]
pub enum FeedbackCommand {
    /// List a user's feedback of one type
    List {
        /// Feedback type (like, read, ...)
        feedback_type: String,
        /// User ID
        user_id: String,
    },

    /// Record one feedback event
    Insert {
        /// Feedback type (like, read, ...)
        feedback_type: String,
        /// User ID
        user_id: String,
        /// Item ID
        item_id: String,

        /// ISO 8601 timestamp
        #[arg(long, default_value = "")]
        timestamp: String,

        /// Numeric strength
        #[arg(long)]
        value: Option<f64>,
    },

    /// Delete a user's feedback of one type on an item
    Delete {
        /// Feedback type (like, read, ...)
        feedback_type: String,
        /// User ID
        user_id: String,
        /// Item ID
        item_id: String,
    },
}

/// Run the feedback command.
pub async fn run(args: FeedbackArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;

    match args.command {
        FeedbackCommand::List {
            feedback_type,
            user_id,
        } => {
            let feedbacks = client.list_feedbacks(&feedback_type, &user_id).await?;
            if ctx.json_output {
                print_json(&feedbacks)?;
            } else {
                print_header(&format!("Feedback: {} by {}", feedback_type, user_id));
                if feedbacks.is_empty() {
                    print_empty("feedback");
                }
                let dim = Style::new().dim();
                for f in &feedbacks {
                    match f.value {
                        Some(value) => {
                            println!("{} {} {}", f.item_id, value, dim.apply_to(&f.timestamp))
                        }
                        None => println!("{} {}", f.item_id, dim.apply_to(&f.timestamp)),
                    }
                }
            }
        }
        FeedbackCommand::Insert {
            feedback_type,
            user_id,
            item_id,
            timestamp,
            value,
        } => {
            let mut feedback = Feedback::new(feedback_type, user_id, item_id, timestamp);
            if let Some(value) = value {
                feedback = feedback.with_value(value);
            }
            let rows = client.insert_feedbacks(vec![feedback]).await?.expect(1)?;
            if ctx.json_output {
                print_json(&rows)?;
            } else {
                print_done("Feedback recorded");
            }
        }
        FeedbackCommand::Delete {
            feedback_type,
            user_id,
            item_id,
        } => {
            let rows = client
                .delete_feedback(&feedback_type, &user_id, &item_id)
                .await?;
            if ctx.json_output {
                print_json(&rows)?;
            } else {
                print_done(&format!(
                    "Deleted {} feedback ({} rows)",
                    feedback_type, rows.row_affected
                ));
            }
        }
    }

    Ok(())
}
