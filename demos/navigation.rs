//! Headless walk through the dashboard: mounts every chart view in turn and
//! logs each lifecycle call the host sees.
//!
//! RUST_LOG=chart_router=debug cargo run --example navigation

use chart_router::scene::Scene;
use chart_router::surface::{ResourceHandle, ResourceKind};
use chart_router::utils::bounds_from_f32;
use chart_router::{
    AppConfig, Dataset, MountPoint, PanelRegistry, Router, SurfaceHost, SurfaceId,
};
use gpui::{Bounds, Pixels};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

const CONFIG: &str = r#"{
    "routes": [
        {
            "segment": "TimeDV",
            "children": [
                { "segment": "radar", "panel": "radar" },
                { "segment": "bar", "panel": "bar" },
                { "segment": "scatter", "panel": "scatter" }
            ]
        },
        {
            "segment": "SpatialDV",
            "children": [
                { "segment": "sankey", "panel": "sankey" },
                { "segment": "cartogram", "panel": "cartogram" }
            ]
        }
    ],
    "router": { "default_path": "/TimeDV/radar" }
}"#;

const TRACKS: &str = r#"{ "tracks": [
    { "name": "Flowers", "artist": "Miley Cyrus", "region": "us", "date": "2023-01-13", "streams": 2400000,
      "danceability": 0.71, "energy": 0.68, "speechiness": 0.06, "acousticness": 0.06,
      "instrumentalness": 0.0, "liveness": 0.03, "valence": 0.65 },
    { "name": "Flowers", "artist": "Miley Cyrus", "region": "gb", "date": "2023-02-02", "streams": 900000,
      "danceability": 0.71, "energy": 0.68, "speechiness": 0.06, "acousticness": 0.06,
      "instrumentalness": 0.0, "liveness": 0.03, "valence": 0.65 },
    { "name": "TQG", "artist": "Karol G", "region": "mx", "date": "2023-03-01", "streams": 1300000,
      "danceability": 0.72, "energy": 0.63, "speechiness": 0.28, "acousticness": 0.67,
      "instrumentalness": 0.0, "liveness": 0.09, "valence": 0.61 },
    { "name": "TQG", "artist": "Karol G", "region": "co", "date": "2023-03-02", "streams": 800000,
      "danceability": 0.72, "energy": 0.63, "speechiness": 0.28, "acousticness": 0.67,
      "instrumentalness": 0.0, "liveness": 0.09, "valence": 0.61 },
    { "name": "Kill Bill", "artist": "SZA", "region": "au", "date": "2023-04-10", "streams": 600000,
      "danceability": 0.64, "energy": 0.73, "speechiness": 0.04, "acousticness": 0.05,
      "instrumentalness": 0.0, "liveness": 0.16, "valence": 0.42 }
] }"#;

/// Host that only logs what panels ask of it.
#[derive(Default)]
struct LoggingHost {
    next_handle: AtomicU64,
}

impl SurfaceHost for LoggingHost {
    fn mount_bounds(&self, mount: &MountPoint) -> Bounds<Pixels> {
        bounds_from_f32(0.0, 48.0 * mount.depth as f32, 960.0, 540.0)
    }

    fn attach(&self, surface: SurfaceId, mount: &MountPoint) {
        info!(surface = surface.0, mount = %mount.path, "attach");
    }

    fn detach(&self, surface: SurfaceId) {
        info!(surface = surface.0, "detach");
    }

    fn draw(&self, surface: SurfaceId, scene: &Scene) {
        info!(surface = surface.0, primitives = scene.len(), "draw");
    }

    fn acquire(&self, surface: SurfaceId, kind: ResourceKind) -> ResourceHandle {
        let id = self.next_handle.fetch_add(1, Ordering::Relaxed);
        info!(surface = surface.0, ?kind, id, "acquire");
        ResourceHandle { surface, kind, id }
    }

    fn release(&self, handle: ResourceHandle) {
        info!(surface = handle.surface.0, kind = ?handle.kind, id = handle.id, "release");
    }
}

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = AppConfig::from_json(CONFIG)?;
    let data = Arc::new(Dataset::from_json(TRACKS)?);
    let host: Arc<dyn SurfaceHost> = Arc::new(LoggingHost::default());
    let mut router = Router::from_config(&config, PanelRegistry::with_builtin_panels(), host)?
        .with_data(data);

    router.start()?;
    for raw in [
        "/TimeDV/bar",
        "/TimeDV/scatter",
        "/SpatialDV/sankey",
        "/SpatialDV/cartogram",
        "/TimeDV/nowhere",
        "/TimeDV/radar",
    ] {
        match router.navigate_str(raw) {
            Ok(outcome) => {
                let mut turns = 0;
                while router.tick() > 0 {
                    turns += 1;
                }
                info!(path = %outcome.path, kept = outcome.kept, turns, "view ready");
            }
            Err(e) => info!(path = raw, error = %e, "navigation refused"),
        }
    }

    let failures = router.shutdown();
    info!(failures = failures.len(), "done");
    Ok(())
}
