//! Recommend and neighbors commands.

use anyhow::Result;
use clap::Args;
use gorse_client::{GetNeighbors, GetRecommend};

use super::{Context, print_empty, print_header, print_json, print_scores};

/// Arguments for the recommend command.
#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// User ID
    pub user_id: String,

    /// Restrict to one category
    #[arg(long)]
    pub category: Option<String>,

    /// Number of items
    #[arg(short, default_value = "10")]
    pub n: usize,

    /// Skip this many items
    #[arg(long, default_value = "0")]
    pub offset: usize,

    /// Record returned items as feedback of this type
    #[arg(long)]
    pub write_back: Option<String>,

    /// Delay before write-back takes effect (e.g. 10m)
    #[arg(long, requires = "write_back")]
    pub write_back_delay: Option<String>,
}

/// Arguments for the neighbors command.
#[derive(Args, Debug)]
pub struct NeighborsArgs {
    /// Item ID (or user ID with --user)
    pub id: String,

    /// Look up similar users instead of similar items
    #[arg(long)]
    pub user: bool,

    /// Number of neighbors
    #[arg(short, default_value = "10")]
    pub n: usize,

    /// Skip this many neighbors
    #[arg(long, default_value = "0")]
    pub offset: usize,
}

/// Run the recommend command.
pub async fn run(args: RecommendArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;

    let mut query = GetRecommend::new(&args.user_id).n(args.n).offset(args.offset);
    if let Some(category) = args.category {
        query = query.category(category);
    }
    if let Some(feedback_type) = args.write_back {
        query = query.write_back(feedback_type);
    }
    if let Some(delay) = args.write_back_delay {
        query = query.write_back_delay(delay);
    }

    let items = client.get_recommend_with(query).await?;
    if ctx.json_output {
        print_json(&items)?;
    } else {
        print_header(&format!("Recommended for {}", args.user_id));
        if items.is_empty() {
            print_empty("recommendations");
        }
        for item in &items {
            println!("{}", item);
        }
    }

    Ok(())
}

/// Run the neighbors command.
pub async fn run_neighbors(args: NeighborsArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;

    let query = if args.user {
        GetNeighbors::user(&args.id)
    } else {
        GetNeighbors::item(&args.id)
    };
    let scores = client
        .get_neighbors_with(query.n(args.n).offset(args.offset))
        .await?;

    let title = if args.user {
        format!("Users similar to {}", args.id)
    } else {
        format!("Items similar to {}", args.id)
    };
    print_scores(&title, &scores, ctx.json_output)
}
