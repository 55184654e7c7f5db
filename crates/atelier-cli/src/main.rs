mod import;
mod verify_images;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "atelier")]
#[command(about = "Atelier back-office product import tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Import a product CSV (flat template or Shopify export).
    Import(import::ImportArgs),
    /// HEAD-check every stored product image URL.
    VerifyImages {
        /// Concurrent requests.
        #[arg(long, default_value_t = 8)]
        concurrency: usize,
    },
    /// Apply pending database migrations.
    Migrate,
    /// Delete a product image: database row first, then the remote asset
    /// on a best-effort basis.
    DeleteImage {
        /// Image row id.
        image_id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = atelier_core::load_app_config_from_env()?;
    let pool = atelier_db::connect_pool(
        &config.database_url,
        atelier_db::PoolConfig::from_app_config(&config),
    )
    .await?;

    match cli.command {
        Commands::Import(args) => import::run(&pool, &config, args).await,
        Commands::VerifyImages { concurrency } => verify_images::run(&pool, concurrency).await,
        Commands::Migrate => {
            let applied = atelier_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
            Ok(())
        }
        Commands::DeleteImage { image_id } => {
            let media = import::build_media_client(&config)?;
            atelier_import::delete_image(&pool, &media, image_id).await?;
            println!("image {image_id} deleted");
            Ok(())
        }
    }
}
