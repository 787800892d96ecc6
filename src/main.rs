//! Neural Canvas entry point
//!
//! On the web this mounts the backdrop on `#neural-canvas`. Natively it runs
//! the simulation headless against a recording surface and logs frame stats.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    neural_canvas::web::start();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Frames simulated by the headless runner (10 s at 60 Hz)
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_FRAMES: u32 = 600;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use neural_canvas::engine::ManualHost;
    use neural_canvas::{InputEvent, RecordingSurface, Settings, SimulationLoop};

    env_logger::init();
    log::info!("Neural Canvas (native, headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load_from_path(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };
    let seed = settings.seed.unwrap_or(0x5eed);

    let mut sim = SimulationLoop::new(RecordingSurface::new(), ManualHost::new(), settings, seed);
    if let Err(e) = sim.mount(1280, 720) {
        log::error!("{}", e);
        std::process::exit(1);
    }

    // Sweep a pointer across the viewport while frames run
    let frame_ms = 1000.0 / 60.0;
    let mut peak_particles = 0;
    let mut peak_edges = 0;
    for i in 0..HEADLESS_FRAMES {
        let t = i as f32 / HEADLESS_FRAMES as f32;
        let pointer = Vec2::new(1280.0 * t, 360.0 + 200.0 * (t * 12.0).sin());
        sim.host().dispatch(InputEvent::PointerMove(pointer));

        let Some(handle) = sim.host_mut().fire() else {
            log::warn!("No frame scheduled at frame {}", i);
            break;
        };
        sim.frame(handle, f64::from(i + 1) * frame_ms);

        peak_particles = peak_particles.max(sim.spray().len());
        peak_edges = peak_edges.max(sim.field().edges().len());
    }

    let surface = sim.surface().map(|s| (s.glow_count(), s.curve_count(), s.line_count()));
    log::info!(
        "{} frames | fps {} | peak particles {} | peak edges {} | last frame glows/curves/lines {:?}",
        sim.stats().total(),
        sim.stats().fps(),
        peak_particles,
        peak_edges,
        surface
    );

    sim.unmount();
    println!(
        "Simulated {} frames: {} nodes, peak {} particles, peak {} edges",
        HEADLESS_FRAMES,
        sim.field().nodes().len(),
        peak_particles,
        peak_edges
    );
}
