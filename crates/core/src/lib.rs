pub mod cache;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod favorites;
pub mod testing;

pub use cache::{ArtworkLoader, BoundedCache};
pub use catalog::{
    AlwaysConnected, CatalogClient, CatalogItem, Connectivity, FetchError, HttpCatalogClient,
};
pub use config::{
    load_config, load_config_from_str, validate_config, ApiConfig, ArtworkConfig, Config,
    ConfigError, FavoritesConfig, SearchConfig,
};
pub use controller::{CatalogController, ListMode, ListSnapshot, DEFAULT_DEBOUNCE};
pub use favorites::{FavoriteRecord, FavoritesError, FavoritesStore, SqliteFavoritesStore};
