//! Built-in tile providers.
//!
//! Each preset is a well-known public tile server. Respect the usage policy
//! of the server you pick; most require a descriptive User-Agent.

use super::{ProviderError, TileProvider};

/// Names accepted by [`by_name`], in display order.
pub const PRESET_NAMES: &[&str] = &[
    "openstreetmap",
    "opentopomap",
    "carto-light",
    "carto-dark",
    "wikimedia",
    "arcgis-world-imagery",
    "stamen-terrain",
];

fn shards(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

/// OpenStreetMap standard tiles.
pub fn openstreetmap() -> TileProvider {
    TileProvider::new(
        "openstreetmap",
        "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
        shards(&["a", "b", "c"]),
    )
    .with_attribution("Maps and Data (c) openstreetmap.org and contributors, ODbL")
}

/// OpenTopoMap topographic tiles.
pub fn opentopomap() -> TileProvider {
    TileProvider::new(
        "opentopomap",
        "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
        shards(&["a", "b", "c"]),
    )
    .with_attribution(
        "Maps (c) opentopomap.org; Data (c) openstreetmap.org and contributors, ODbL",
    )
}

/// Carto light basemap.
pub fn carto_light() -> TileProvider {
    TileProvider::new(
        "carto-light",
        "https://cartodb-basemaps-{s}.global.ssl.fastly.net/light_all/{z}/{x}/{y}.png",
        shards(&["a", "b", "c", "d"]),
    )
    .with_attribution("Map (c) Carto [CC BY 3.0] Data (c) OSM and contributors, ODbL")
}

/// Carto dark basemap.
pub fn carto_dark() -> TileProvider {
    TileProvider::new(
        "carto-dark",
        "https://cartodb-basemaps-{s}.global.ssl.fastly.net/dark_all/{z}/{x}/{y}.png",
        shards(&["a", "b", "c", "d"]),
    )
    .with_attribution("Map (c) Carto [CC BY 3.0] Data (c) OSM and contributors, ODbL")
}

/// Wikimedia OSM rendering. Single host, no shards.
pub fn wikimedia() -> TileProvider {
    TileProvider::new(
        "wikimedia",
        "https://maps.wikimedia.org/osm-intl/{z}/{x}/{y}.png",
        Vec::new(),
    )
    .with_attribution("Map (c) Wikimedia; Data (c) OSM and contributors, ODbL")
}

/// Esri World Imagery. Serves JPEG and orders the path `z/y/x`.
pub fn arcgis_world_imagery() -> TileProvider {
    TileProvider::new(
        "arcgis-world-imagery",
        "https://server.arcgisonline.com/arcgis/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
        Vec::new(),
    )
    .with_attribution(
        "Source: Esri, Maxar, Earthstar Geographics, and the GIS User Community",
    )
}

/// Stamen terrain tiles.
pub fn stamen_terrain() -> TileProvider {
    TileProvider::new(
        "stamen-terrain",
        "https://{s}.tile.stamen.com/terrain/{z}/{x}/{y}.png",
        shards(&["a", "b", "c", "d"]),
    )
    .with_attribution("Map tiles by Stamen Design, under CC BY 3.0. Data by OpenStreetMap, under ODbL")
}

/// Looks up a preset by name (case-insensitive, `_` and `-` interchangeable).
pub fn by_name(name: &str) -> Result<TileProvider, ProviderError> {
    let normalized = name.trim().to_lowercase().replace('_', "-");
    match normalized.as_str() {
        "openstreetmap" | "osm" => Ok(openstreetmap()),
        "opentopomap" => Ok(opentopomap()),
        "carto-light" => Ok(carto_light()),
        "carto-dark" => Ok(carto_dark()),
        "wikimedia" => Ok(wikimedia()),
        "arcgis-world-imagery" => Ok(arcgis_world_imagery()),
        "stamen-terrain" => Ok(stamen_terrain()),
        _ => Err(ProviderError::Unknown(name.to_string())),
    }
}

/// All presets, in [`PRESET_NAMES`] order.
pub fn all() -> Vec<TileProvider> {
    vec![
        openstreetmap(),
        opentopomap(),
        carto_light(),
        carto_dark(),
        wikimedia(),
        arcgis_world_imagery(),
        stamen_terrain(),
    ]
}
