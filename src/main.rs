//! RPS Arena entry point
//!
//! On the web the page drives `rps_arena::web::WebArena` directly; this
//! binary is the native headless runner. It plays one run against a fixed
//! surface with 60 Hz frame timestamps and prints the outcome as JSON.
//!
//! Usage: `rps-arena [CONFIG_JSON] [WIDTHxHEIGHT]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use rps_arena::platform::FixedSurface;
    use rps_arena::{ArenaConfig, Phase, Session};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(json) => match ArenaConfig::from_json(&json) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(2);
            }
        },
        None => ArenaConfig::default(),
    };
    let surface = match args.next().as_deref().map(parse_size) {
        Some(Some((w, h))) => FixedSurface::new(w, h),
        Some(None) => {
            eprintln!("error: surface size must look like 800x500");
            std::process::exit(2);
        }
        None => FixedSurface::new(800.0, 500.0),
    };

    let mut session = match Session::new(config) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: u64 = 10_000_000;

    log::info!("RPS arena (native) starting, surface {}x{}", surface.width, surface.height);
    let mut now = 0.0;
    session.initialize(&surface, now);

    for frame in 0..MAX_FRAMES {
        now += FRAME_MS;
        if let Some(report) = session.frame(&surface, now) {
            if report.tick % 1000 == 0 {
                log::info!(
                    "tick {}: rock {} paper {} scissors {}",
                    report.tick,
                    report.counts.rock,
                    report.counts.paper,
                    report.counts.scissors
                );
            }
        }
        if session.phase() == Phase::Finished {
            log::debug!("Finished after {} frames", frame + 1);
            break;
        }
    }
    session.dispose();

    match session.outcome() {
        Some(outcome) => match serde_json::to_string_pretty(outcome) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("error: {err}"),
        },
        None => {
            eprintln!("no winner after {MAX_FRAMES} frames");
            std::process::exit(1);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_size(arg: &str) -> Option<(f32, f32)> {
    let (w, h) = arg.split_once('x')?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is rps_arena::web::start, this is just to satisfy the compiler
}
