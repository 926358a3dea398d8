// src/main.rs
use std::env;
use std::sync::Arc;

use eframe::egui as eg;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use reelscript::ai::OpenAiGenerator;
use reelscript::app::ReelscriptApp;
use reelscript::config::load_config;
use reelscript::imdb::ImdbScraper;

/// `REELSCRIPT_RENDERER` accepts `glow` or `wgpu` (any case); anything else falls back
/// to the platform default.
fn renderer_from(choice: Option<&str>) -> eframe::Renderer {
    let platform_default = if cfg!(target_os = "windows") {
        eframe::Renderer::Wgpu
    } else {
        eframe::Renderer::Glow
    };
    match choice.map(|c| c.trim().to_ascii_lowercase()).as_deref() {
        Some("glow") => eframe::Renderer::Glow,
        Some("wgpu") => eframe::Renderer::Wgpu,
        Some(other) if !other.is_empty() => {
            warn!("unknown REELSCRIPT_RENDERER {other:?}; using the platform default");
            platform_default
        }
        _ => platform_default,
    }
}

fn main() -> eframe::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let cfg = load_config();

    let scraper = match ImdbScraper::new(cfg.chart_url.clone()) {
        Ok(s) => s,
        Err(e) => {
            error!("could not build HTTP client for IMDb: {e}");
            std::process::exit(1);
        }
    };
    let generator = match OpenAiGenerator::new(&cfg) {
        Ok(g) => g,
        Err(e) => {
            error!("could not build HTTP client for generation: {e}");
            std::process::exit(1);
        }
    };
    info!(
        "chart={} model={} images={} exports={}",
        cfg.chart_url,
        cfg.chat_model,
        cfg.image_dir.display(),
        cfg.export_dir.display()
    );

    let options = eframe::NativeOptions {
        renderer: renderer_from(env::var("REELSCRIPT_RENDERER").ok().as_deref()),
        viewport: eg::ViewportBuilder::default()
            .with_title("IMDb Top 10 Movies")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    let export_dir = cfg.export_dir.clone();
    match eframe::run_native(
        "IMDb Top 10 Movies",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(ReelscriptApp::new(
                Arc::new(scraper),
                Arc::new(generator),
                export_dir,
            )))
        }),
    ) {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("eframe failed to start: {e:?}");
            error!("Hint: try REELSCRIPT_RENDERER=wgpu or glow.");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_choice_is_case_insensitive() {
        assert_eq!(renderer_from(Some("GLOW")), eframe::Renderer::Glow);
        assert_eq!(renderer_from(Some(" wgpu ")), eframe::Renderer::Wgpu);
    }

    #[test]
    fn unknown_or_missing_renderer_uses_platform_default() {
        let expected = renderer_from(None);
        assert_eq!(renderer_from(Some("vulkan")), expected);
        assert_eq!(renderer_from(Some("")), expected);
    }
}
