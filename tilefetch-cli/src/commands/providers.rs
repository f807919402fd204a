//! `tilefetch providers`: list built-in tile providers.

use tilefetch::config::FetcherConfig;
use tilefetch::provider::{presets, TileProvider};

/// Print each preset with its shards and attribution.
pub fn run(config: &FetcherConfig) {
    for provider in presets::all() {
        let marker = if is_selected(&provider, config) { "*" } else { " " };
        let shards = if provider.shards().is_empty() {
            "-".to_string()
        } else {
            provider.shards().join(",")
        };

        println!("{} {:<22} shards: {}", marker, provider.name(), shards);
        println!("    {}", provider.url_template());
        println!("    {}", provider.attribution());
    }
}

/// Whether `provider` is the preset the configuration resolves to.
///
/// A custom `url_template` selects no preset. Aliases and spelling variants
/// (`osm`, `carto_dark`) resolve the same way the fetcher resolves them.
fn is_selected(provider: &TileProvider, config: &FetcherConfig) -> bool {
    if config.provider.url_template.is_some() {
        return false;
    }
    presets::by_name(&config.provider.name)
        .map(|selected| selected.name() == provider.name())
        .unwrap_or(false)
}
