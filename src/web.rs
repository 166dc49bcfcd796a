//! Browser binding
//!
//! The page owns rendering and the animation-frame loop. It constructs a
//! `WebArena` for the arena element, calls `initialize` once and `frame(ts)`
//! from every `requestAnimationFrame`, reading positions and counts back after
//! each frame. `dispose` must be called on unmount or restart.

use wasm_bindgen::prelude::*;

use crate::platform::ElementSurface;
use crate::session::{Phase, Readiness, Session};
use crate::settings::ArenaConfig;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier module instance
        return;
    }
    log::info!("RPS arena module loaded");
}

#[wasm_bindgen]
pub struct WebArena {
    session: Session,
    surface: ElementSurface,
}

#[wasm_bindgen]
impl WebArena {
    /// `config_json` may omit any field, e.g. `{"per_type_count": 50}`
    #[wasm_bindgen(constructor)]
    pub fn new(element_id: &str, config_json: &str) -> Result<WebArena, JsError> {
        let config = ArenaConfig::from_json(config_json)?;
        Ok(WebArena {
            session: Session::new(config)?,
            surface: ElementSurface::new(element_id),
        })
    }

    /// Returns true if the population was created right away
    pub fn initialize(&mut self, now: f64) -> bool {
        self.session.initialize(&self.surface, now) == Readiness::Ready
    }

    /// Returns true while the host should keep requesting frames
    pub fn frame(&mut self, now: f64) -> bool {
        self.session.frame(&self.surface, now);
        !matches!(self.session.phase(), Phase::Finished | Phase::Disposed)
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.session.phase())
    }

    /// Flat `[x0, y0, x1, y1, ...]` in scan order
    pub fn positions(&self) -> js_sys::Float32Array {
        let flat: Vec<f32> = self
            .session
            .simulation()
            .map(|sim| sim.tokens().iter().flat_map(|t| [t.pos.x, t.pos.y]).collect())
            .unwrap_or_default();
        js_sys::Float32Array::from(flat.as_slice())
    }

    /// Kind per token: 0 rock, 1 paper, 2 scissors
    pub fn kinds(&self) -> Vec<u8> {
        self.session
            .simulation()
            .map(|sim| sim.tokens().iter().map(|t| t.kind.index() as u8).collect())
            .unwrap_or_default()
    }

    /// 1 for tokens converted during the last step (for a brief highlight)
    pub fn converted(&self) -> Vec<u8> {
        self.session
            .simulation()
            .map(|sim| sim.tokens().iter().map(|t| t.converted as u8).collect())
            .unwrap_or_default()
    }

    /// Stable ids (`rock-0`, ...) as a JSON array, for keyed rendering
    pub fn ids_json(&self) -> Result<String, JsError> {
        let ids: Vec<String> = self
            .session
            .simulation()
            .map(|sim| sim.tokens().iter().map(|t| t.id.to_string()).collect())
            .unwrap_or_default();
        Ok(serde_json::to_string(&ids)?)
    }

    pub fn counts_json(&self) -> Result<String, JsError> {
        let counts = self.session.simulation().map(|sim| sim.counts()).unwrap_or_default();
        Ok(serde_json::to_string(&counts)?)
    }

    /// `null` until the run has finished
    pub fn outcome_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.session.outcome())?)
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.session.elapsed_secs() as f64
    }

    pub fn set_speed_scale(&mut self, speed_scale: f32) -> Result<(), JsError> {
        self.session.set_speed_scale(speed_scale)?;
        Ok(())
    }

    pub fn dispose(&mut self) {
        self.session.dispose();
    }
}
