use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marquee_core::{
    load_config, validate_config, AlwaysConnected, ArtworkLoader, BoundedCache, CatalogClient,
    CatalogController, FavoritesStore, HttpCatalogClient, ListMode, ListSnapshot,
    SqliteFavoritesStore,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("MARQUEE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("marquee.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;
    info!("Configuration loaded successfully");
    debug!("Effective configuration: {:?}", config.redacted());

    // Create the favorites store
    let favorites: Arc<dyn FavoritesStore> = Arc::new(
        SqliteFavoritesStore::new(&config.favorites.path)
            .context("Failed to open favorites store")?,
    );
    info!("Favorites store ready at {:?}", config.favorites.path);

    // Create the catalog client
    let http_client = Arc::new(HttpCatalogClient::new(
        config.api.clone(),
        Arc::new(AlwaysConnected),
    ));

    // Create the shared artwork cache and loader
    let artwork_cache = Arc::new(BoundedCache::new(
        config.artwork.max_images,
        config.artwork.max_image_bytes,
    ));
    let artwork = ArtworkLoader::new(Arc::clone(&artwork_cache));

    let controller = CatalogController::new(
        Arc::clone(&http_client) as Arc<dyn CatalogClient>,
        favorites,
        Duration::from_millis(config.search.debounce_ms),
    );

    // Print list updates as the controller publishes them.
    let mut updates = controller.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snap = updates.borrow_and_update().clone();
            render(&snap);
        }
    });

    println!("marquee - type to search; :more :fav <id> :favs :poster <id> :reset :quit");
    controller.load_initial().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => {
                let Some(line) = line.context("stdin read failed")? else {
                    break;
                };
                let line = line.trim();
                match line {
                    "" => continue,
                    ":quit" | ":q" => break,
                    ":more" => controller.load_more().await,
                    ":reset" => controller.reset_search().await,
                    ":favs" => match controller.favorites() {
                        Ok(items) => {
                            println!("-- {} favorite(s) --", items.len());
                            for item in items {
                                println!("  {:>8}  {}", item.id, item.title);
                            }
                        }
                        Err(e) => println!("favorites unavailable: {}", e),
                    },
                    _ if line.starts_with(":fav ") => {
                        match parse_id(&line[5..]) {
                            Some(id) => {
                                let item = controller
                                    .snapshot()
                                    .items
                                    .iter()
                                    .find(|i| i.id == id)
                                    .cloned();
                                match item {
                                    Some(item) => controller.toggle_favorite(&item).await,
                                    None => println!("no displayed item with id {}", id),
                                }
                            }
                            None => println!("usage: :fav <id>"),
                        }
                    }
                    _ if line.starts_with(":poster ") => {
                        match parse_id(&line[8..]) {
                            Some(id) => {
                                let image_ref = controller
                                    .snapshot()
                                    .items
                                    .iter()
                                    .find(|i| i.id == id)
                                    .and_then(|i| i.image_ref.clone());
                                match image_ref {
                                    Some(image_ref) => {
                                        let url = http_client.poster_url(&image_ref);
                                        match artwork.fetch(&url).await {
                                            Ok(bytes) => {
                                                println!("{} ({} bytes cached)", url, bytes.len())
                                            }
                                            Err(e) => println!("poster fetch failed: {}", e),
                                        }
                                    }
                                    None => println!("no poster for id {}", id),
                                }
                            }
                            None => println!("usage: :poster <id>"),
                        }
                    }
                    query => controller.set_query(query),
                }
            }
        }
    }

    printer.abort();
    info!("Shutting down");
    Ok(())
}

fn parse_id(text: &str) -> Option<u64> {
    text.trim().parse().ok()
}

fn render(snap: &ListSnapshot) {
    let heading = match &snap.mode {
        ListMode::Browse => "popular".to_string(),
        ListMode::Search(q) => format!("search \"{}\"", q),
    };

    let status = if snap.is_loading() {
        " (loading...)"
    } else if !snap.has_more_pages {
        " (end of list)"
    } else {
        ""
    };
    println!("== {} - page {}{} ==", heading, snap.page, status);

    if let Some(e) = &snap.last_error {
        println!("!! {}", e);
    }

    for item in &snap.items {
        let marker = if snap.is_favorite(item.id) { "*" } else { " " };
        println!(
            " {} {:>8}  {}  ({})  {:.1}",
            marker, item.id, item.title, item.release_label, item.rating_average
        );
    }
}
