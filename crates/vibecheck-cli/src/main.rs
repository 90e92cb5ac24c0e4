use clap::{Parser, Subcommand};

use vibecheck_analysis::{AnalysisBackend, DeepInput};
use vibecheck_scraper::{ProfileResolver, ResolveMode, ScraperConfig};

#[derive(Debug, Parser)]
#[command(name = "vibecheck-cli")]
#[command(about = "Resolve and analyze a social profile from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a profile URL or handle and print a snapshot summary.
    Resolve {
        /// Profile URL or bare handle.
        input: String,
        /// Target 3-9 post images plus engagement metadata.
        #[arg(long)]
        deep: bool,
    },
    /// Resolve a profile and run it through the analysis backend.
    Analyze {
        /// Profile URL or bare handle.
        input: String,
        #[arg(long)]
        deep: bool,
        /// Report language tag (e.g. en, tr).
        #[arg(long, default_value = "en")]
        language: String,
        /// Roast tone instead of the friendly quiz tone.
        #[arg(long)]
        roast: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = vibecheck_core::load_app_config()?;
    let resolver = ProfileResolver::new(ScraperConfig::from_app_config(&config))?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Resolve { input, deep } => {
            let profile = resolver.resolve(&input, mode(deep, &config)).await;
            print_summary(&profile);
        }
        Commands::Analyze {
            input,
            deep,
            language,
            roast,
        } => {
            let profile = resolver.resolve(&input, mode(deep, &config)).await;
            if let Some(tag) = profile.failure {
                anyhow::bail!("resolution failed: {tag}");
            }

            let backend = AnalysisBackend::from_app_config(&config)?;
            let report = if deep && profile.post_images.len() >= 3 {
                let input = DeepInput {
                    images: &profile.post_images,
                    captions: &profile.captions,
                    like_counts: &profile.like_counts,
                    comment_counts: &profile.comment_counts,
                    follower_count: profile.follower_count,
                    bio: profile.bio.as_deref(),
                };
                backend.analyze_deep(&input, &language, roast).await?
            } else {
                let image = profile
                    .primary_image()
                    .ok_or_else(|| anyhow::anyhow!("profile has no analyzable image"))?;
                backend.analyze(image, &language, roast).await?
            };

            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn mode(deep: bool, config: &vibecheck_core::AppConfig) -> ResolveMode {
    if deep {
        ResolveMode::Deep {
            max_posts: config.scraper_max_posts,
        }
    } else {
        ResolveMode::Shallow
    }
}

fn print_summary(profile: &vibecheck_scraper::Profile) {
    println!("username:   @{}", profile.username);
    if let Some(tag) = profile.failure {
        println!("failure:    {tag}");
        return;
    }
    if let Some(name) = &profile.full_name {
        println!("name:       {name}");
    }
    if let Some(bio) = &profile.bio {
        println!("bio:        {bio}");
    }
    println!("private:    {}", profile.is_private);
    if let Some(followers) = profile.follower_count {
        println!("followers:  {followers}");
    }
    if let Some(posts) = profile.post_count {
        println!("posts:      {posts}");
    }
    println!(
        "images:     profile pic: {}, post images: {}",
        profile.profile_pic.is_some(),
        profile.post_images.len()
    );
    for (i, caption) in profile.captions.iter().enumerate() {
        let likes = profile.like_counts.get(i).copied().flatten();
        let comments = profile.comment_counts.get(i).copied().flatten();
        println!(
            "post {}:     likes: {}, comments: {}, caption: {}",
            i + 1,
            likes.map_or("?".to_string(), |n| n.to_string()),
            comments.map_or("?".to_string(), |n| n.to_string()),
            caption.as_deref().unwrap_or("(none)")
        );
    }
}
