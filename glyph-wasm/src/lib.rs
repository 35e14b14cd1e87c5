mod canvas;

pub use canvas::CanvasSurface;

use glyph_core::{
    Bounds, FrameHandle, RenderSurface, SimConfig, Simulation, SpawnLayout, Vector2D,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

type FrameCallback = Closure<dyn FnMut(f64)>;

struct Runtime {
    sim: Simulation,
    surface: CanvasSurface,
    /// Frame the simulation expects next and the browser's callback id for it.
    pending: Option<(FrameHandle, i32)>,
}

impl Runtime {
    fn cancel_pending(&mut self) {
        if let Some((_, id)) = self.pending.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }
}

/// The "Run Code" overlay: owns the simulation and its animation loop.
#[wasm_bindgen]
pub struct GlyphRun {
    runtime: Rc<RefCell<Runtime>>,
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

#[wasm_bindgen]
impl GlyphRun {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<GlyphRun, JsValue> {
        let window = web_sys::window().ok_or("no global window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let surface = CanvasSurface::new(canvas)?;
        let sim = Simulation::new(SimConfig::default()).map_err(|err| err.to_string())?;

        let runtime = Rc::new(RefCell::new(Runtime {
            sim,
            surface,
            pending: None,
        }));
        let callback = Rc::new(RefCell::new(None));
        *callback.borrow_mut() = Some(frame_callback(
            Rc::downgrade(&runtime),
            Rc::downgrade(&callback),
        ));

        console_log!("Glyph run ready on #{}", canvas_id);
        Ok(GlyphRun { runtime, callback })
    }

    /// Turn `text` into runners and start the animation. Restarts any run in
    /// progress.
    pub fn start(
        &mut self,
        text: &str,
        char_width: f32,
        line_height: f32,
        origin_x: f32,
        origin_y: f32,
    ) -> Result<(), JsValue> {
        let now = now_ms();
        let handle = {
            let mut runtime = self.runtime.borrow_mut();
            runtime.cancel_pending();

            let Some(bounds) = runtime.surface.size() else {
                // The previous frame is gone, so the old run cannot continue.
                let Runtime { sim, surface, .. } = &mut *runtime;
                sim.stop(surface);
                return Err("canvas is not mounted".into());
            };
            let layout = SpawnLayout::new(bounds, char_width, line_height)
                .with_origin(Vector2D::new(origin_x, origin_y));
            let agents = runtime.sim.spawn_text(text, &layout, now);
            console_log!("Starting run with {} glyphs", agents.len());
            runtime.sim.start(agents)
        };

        if let Err(err) = request_frame(&self.runtime, &self.callback, handle) {
            self.stop();
            return Err(err);
        }
        Ok(())
    }

    /// Cancel the animation, clear the canvas and drop every entity.
    pub fn stop(&mut self) {
        let mut runtime = self.runtime.borrow_mut();
        runtime.cancel_pending();
        let Runtime { sim, surface, .. } = &mut *runtime;
        sim.stop(surface);
    }

    #[wasm_bindgen(js_name = spawnPredator)]
    pub fn spawn_predator(&mut self) {
        let mut runtime = self.runtime.borrow_mut();
        let Runtime { sim, surface, .. } = &mut *runtime;
        // An unmounted canvas still has attribute dimensions to place bugs on.
        let bounds = surface.size().unwrap_or_else(|| {
            Bounds::new(
                surface.canvas().width() as f32,
                surface.canvas().height() as f32,
            )
        });
        sim.spawn_predator(bounds);
    }

    #[wasm_bindgen(js_name = setLimbs)]
    pub fn set_limbs(&mut self, enabled: bool) {
        self.runtime
            .borrow_mut()
            .sim
            .set_limb_rendering_enabled(enabled);
    }

    #[wasm_bindgen(js_name = setFont)]
    pub fn set_font(&mut self, font: &str) {
        self.runtime.borrow_mut().surface.set_font(font);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.runtime.borrow_mut().surface.resize(width, height);
        console_log!("Resized to {}x{}", width, height);
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.runtime.borrow().sim.is_running()
    }

    #[wasm_bindgen(js_name = agentCount)]
    pub fn agent_count(&self) -> usize {
        self.runtime.borrow().sim.status().remaining()
    }

    #[wasm_bindgen(js_name = predatorCount)]
    pub fn predator_count(&self) -> usize {
        self.runtime.borrow().sim.predators.len()
    }

    #[wasm_bindgen(js_name = eatenCount)]
    pub fn eaten_count(&self) -> usize {
        self.runtime.borrow().sim.status().consumed_total
    }
}

impl Drop for GlyphRun {
    fn drop(&mut self) {
        self.runtime.borrow_mut().cancel_pending();
    }
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|performance| performance.now())
        .unwrap_or_else(js_sys::Date::now)
}

fn request_frame(
    runtime: &Rc<RefCell<Runtime>>,
    callback: &Rc<RefCell<Option<FrameCallback>>>,
    handle: FrameHandle,
) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no global window")?;
    let callback = callback.borrow();
    let callback = callback.as_ref().ok_or("frame callback missing")?;
    let id = window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    runtime.borrow_mut().pending = Some((handle, id));
    Ok(())
}

/// The animation-frame callback. It only holds weak references, so dropping
/// the `GlyphRun` ends the loop.
fn frame_callback(
    runtime: Weak<RefCell<Runtime>>,
    callback: Weak<RefCell<Option<FrameCallback>>>,
) -> FrameCallback {
    Closure::wrap(Box::new(move |timestamp: f64| {
        let (Some(runtime), Some(callback)) = (runtime.upgrade(), callback.upgrade()) else {
            return;
        };

        let next = {
            let mut runtime = runtime.borrow_mut();
            let Some((handle, _)) = runtime.pending.take() else {
                return;
            };
            let Runtime { sim, surface, .. } = &mut *runtime;
            sim.frame(handle, timestamp, surface).next()
        };

        if let Some(next) = next {
            if let Err(err) = request_frame(&runtime, &callback, next) {
                console_log!("Failed to schedule frame: {:?}", err);
            }
        }
    }) as Box<dyn FnMut(f64)>)
}
