//! Traffic dashboard web app.
//!
//! The host page owns the DOM and the callback pumps; this module owns all
//! dashboard state. Two pumps drive it:
//!
//! - `requestAnimationFrame` calls [`advance_frame`] with the frame
//!   timestamp and keeps rescheduling while it returns `true`.
//! - `requestIdleCallback` (or a `setTimeout(0)` fallback where that API is
//!   missing) calls [`idle_pulse`] with a slice budget; only the cadence
//!   differs between the two, never the behavior.
//!
//! Wheel listeners must be registered non-passive and call
//! `preventDefault()`, otherwise the page scrolls under the canvas.

use std::cell::RefCell;
use std::rc::Rc;

use console_error_panic_hook::set_once;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use foundation::math::{GeoPoint, Vec2};
use foundation::time::Time;
use render::renderer::SceneRenderer;
use runtime::animation::{AnimationHandle, FrameLoop};
use runtime::budget::SliceBudget;
use runtime::event_bus::EventBus;
use runtime::frame::Frame;
use runtime::idle::IdleScheduler;
use runtime::metrics::Metrics;
use scene::controller::ViewController;
use scene::frame_input::RenderFrame;
use scene::view_mode::ViewMode;
use telemetry::analysis::{ForecastTask, RouteSearchTask, SummaryTask, TrafficSummary};
use telemetry::filter::FilterCriteria;
use telemetry::network::NetworkInfo;
use telemetry::point::{TrafficPoint, sanitize};
use telemetry::prediction::Prediction;
use telemetry::prefs::{Preferences, PrefsStore, Theme, load_or_default};
use telemetry::route::{Route, RouteKind};
use telemetry::synthetic::{self, SyntheticConfig};

mod canvas;
mod prefs_store;

use prefs_store::LocalStoragePrefsStore;

const FORECAST_HORIZON_HOURS: u32 = 24;
const ROUTE_CANDIDATES_PER_KIND: u32 = 6;

struct DashboardState {
    canvas_id: String,
    width: f64,
    height: f64,
    frame_loop: FrameLoop,
    handle: Option<AnimationHandle>,
    last_frame: Option<Frame>,
    controller: ViewController,
    mode: ViewMode,
    theme: Theme,
    route_kind: RouteKind,
    renderer: SceneRenderer,
    points: Vec<TrafficPoint>,
    filters: FilterCriteria,
    selected_route: Option<Route>,
    predictions: Vec<Prediction>,
    user_location: Option<GeoPoint>,
    network: Option<NetworkInfo>,
    synth: SyntheticConfig,
    idle: IdleScheduler,
    // Completion handoff cells: idle completions land here during a pulse
    // and are folded into the state right after, in the same borrow.
    summary_out: Rc<RefCell<Option<TrafficSummary>>>,
    forecast_out: Rc<RefCell<Option<Vec<Prediction>>>>,
    routes_out: Rc<RefCell<Option<Vec<Route>>>>,
    summary: Option<TrafficSummary>,
    metrics: Metrics,
    bus: EventBus,
}

impl DashboardState {
    fn new() -> Self {
        Self {
            canvas_id: "traffic-canvas".to_string(),
            width: 1280.0,
            height: 720.0,
            frame_loop: FrameLoop::new(),
            handle: None,
            last_frame: None,
            controller: ViewController::new(),
            mode: ViewMode::Points,
            theme: Theme::Light,
            route_kind: RouteKind::Fastest,
            renderer: SceneRenderer::new(Theme::Light),
            points: Vec::new(),
            filters: FilterCriteria::default(),
            selected_route: None,
            predictions: Vec::new(),
            user_location: None,
            network: None,
            synth: SyntheticConfig::default(),
            idle: IdleScheduler::new(),
            summary_out: Rc::new(RefCell::new(None)),
            forecast_out: Rc::new(RefCell::new(None)),
            routes_out: Rc::new(RefCell::new(None)),
            summary: None,
            metrics: Metrics::new(),
            bus: EventBus::new(),
        }
    }

    /// Frame stamp for events emitted outside a tick.
    fn bus_frame(&self) -> Frame {
        self.last_frame.unwrap_or(Frame::first(Time(0.0)))
    }

    fn assemble_frame(&self, frame: Frame) -> RenderFrame {
        RenderFrame {
            mode: self.mode,
            width: self.width,
            height: self.height,
            time_s: frame.time.0,
            viewport: self.controller.viewport(),
            points: self.filters.apply(&self.points),
            selected_route: self.selected_route.clone(),
            predictions: self.predictions.clone(),
            user_location: self.user_location,
            network: self.network,
        }
    }
}

thread_local! {
    static STATE: RefCell<DashboardState> = RefCell::new(DashboardState::new());
}

fn context_2d(canvas_id: &str) -> Option<CanvasRenderingContext2d> {
    let canvas: HtmlCanvasElement = web_sys::window()?
        .document()?
        .get_element_by_id(canvas_id)?
        .dyn_into()
        .ok()?;
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into()
        .ok()
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Binds the dashboard to a canvas element and applies stored preferences.
#[wasm_bindgen]
pub fn init_dashboard(canvas_id: &str) {
    let prefs = load_or_default(&LocalStoragePrefsStore);
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        s.canvas_id = canvas_id.to_string();
        s.theme = prefs.theme;
        s.route_kind = prefs.route_kind;
        s.renderer.set_theme(prefs.theme);
    });
}

#[wasm_bindgen]
pub fn set_canvas_size(width: f64, height: f64) {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        s.width = width;
        s.height = height;
    });
}

/// Ingests a JSON array of traffic points. Malformed (non-finite) records
/// are dropped here, before anything projects them. Returns the kept count.
#[wasm_bindgen]
pub fn set_traffic_data(json: &str) -> Result<u32, JsValue> {
    let raw: Vec<TrafficPoint> =
        serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        let clean = sanitize(&raw);
        let dropped = raw.len() - clean.len();
        if dropped > 0 {
            s.metrics.add("ingest.dropped", dropped as u64);
        }
        s.metrics.add("ingest.points", clean.len() as u64);
        let frame = s.bus_frame();
        s.bus
            .emit(frame, "ingest", format!("{} points ({dropped} dropped)", clean.len()));
        s.points = clean;
        Ok(s.points.len() as u32)
    })
}

/// Regenerates the synthetic feed in-app. Same seed, same data.
#[wasm_bindgen]
pub fn load_synthetic(seed: u32, point_count: u32, now_ms: f64) -> u32 {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        let s = &mut *s;
        s.synth = SyntheticConfig {
            seed: u64::from(seed),
            point_count: point_count as usize,
            now_ms: now_ms.max(0.0) as u64,
            ..s.synth.clone()
        };
        if let Some(here) = s.user_location {
            s.synth.center_lat = here.lat_deg;
            s.synth.center_lng = here.lng_deg;
        }
        s.points = synthetic::traffic_points(&s.synth);
        s.metrics.add("ingest.points", s.points.len() as u64);
        s.points.len() as u32
    })
}

#[wasm_bindgen]
pub fn set_filters(json: &str) -> Result<(), JsValue> {
    let filters: FilterCriteria =
        serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    STATE.with(|state| state.borrow_mut().filters = filters);
    Ok(())
}

#[wasm_bindgen]
pub fn set_route(json: &str) -> Result<(), JsValue> {
    let route: Route =
        serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    STATE.with(|state| state.borrow_mut().selected_route = Some(route));
    Ok(())
}

#[wasm_bindgen]
pub fn clear_route() {
    STATE.with(|state| state.borrow_mut().selected_route = None);
}

#[wasm_bindgen]
pub fn set_predictions(json: &str) -> Result<(), JsValue> {
    let predictions: Vec<Prediction> =
        serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    STATE.with(|state| state.borrow_mut().predictions = predictions);
    Ok(())
}

#[wasm_bindgen]
pub fn set_user_location(lat_deg: f64, lng_deg: f64) {
    STATE.with(|state| {
        state.borrow_mut().user_location = Some(GeoPoint::new(lat_deg, lng_deg));
    });
}

#[wasm_bindgen]
pub fn clear_user_location() {
    STATE.with(|state| state.borrow_mut().user_location = None);
}

#[wasm_bindgen]
pub fn set_network_info(json: &str) -> Result<(), JsValue> {
    let info: NetworkInfo =
        serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    STATE.with(|state| state.borrow_mut().network = Some(info));
    Ok(())
}

/// Switches the active layer. Takes effect on the next scheduled frame;
/// the in-flight frame keeps the snapshot it was assembled with.
#[wasm_bindgen]
pub fn set_view_mode(mode: &str) {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        let next = ViewMode::from_str(mode);
        if next != s.mode {
            s.mode = next;
            let frame = s.bus_frame();
            s.bus.emit(frame, "mode", next.as_str());
        }
    });
}

#[wasm_bindgen]
pub fn set_theme(theme: &str) {
    let theme = match theme.trim().to_ascii_lowercase().as_str() {
        "dark" => Theme::Dark,
        _ => Theme::Light,
    };
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        s.theme = theme;
        s.renderer.set_theme(theme);
        let prefs = Preferences {
            theme,
            route_kind: s.route_kind,
        };
        // Preference loss is cosmetic; never surface storage errors.
        let _ = LocalStoragePrefsStore.save(prefs);
    });
}

#[wasm_bindgen]
pub fn set_route_kind(kind: &str) {
    let kind = match kind.trim().to_ascii_lowercase().as_str() {
        "eco" => RouteKind::Eco,
        "scenic" => RouteKind::Scenic,
        _ => RouteKind::Fastest,
    };
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        s.route_kind = kind;
        let prefs = Preferences {
            theme: s.theme,
            route_kind: kind,
        };
        let _ = LocalStoragePrefsStore.save(prefs);
    });
}

#[wasm_bindgen]
pub fn start_animation() {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        let handle = s.frame_loop.start();
        s.handle = Some(handle);
        let frame = s.bus_frame();
        s.bus.emit(frame, "loop", "start");
    });
}

#[wasm_bindgen]
pub fn stop_animation() {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        s.frame_loop.stop();
        let frame = s.bus_frame();
        s.bus.emit(frame, "loop", "stop");
    });
}

#[wasm_bindgen]
pub fn is_animating() -> bool {
    STATE.with(|state| state.borrow().frame_loop.is_running())
}

/// Must run on teardown so no redraw loop outlives the view.
#[wasm_bindgen]
pub fn dispose() {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        s.frame_loop.stop();
        s.handle = None;
    });
}

#[wasm_bindgen]
pub fn on_pointer_down(x: f64, y: f64) {
    STATE.with(|state| state.borrow_mut().controller.on_pointer_down(Vec2::new(x, y)));
}

#[wasm_bindgen]
pub fn on_pointer_move(x: f64, y: f64) {
    STATE.with(|state| state.borrow_mut().controller.on_pointer_move(Vec2::new(x, y)));
}

#[wasm_bindgen]
pub fn on_pointer_up() {
    STATE.with(|state| state.borrow_mut().controller.on_pointer_up());
}

#[wasm_bindgen]
pub fn on_pointer_leave() {
    STATE.with(|state| state.borrow_mut().controller.on_pointer_leave());
}

#[wasm_bindgen]
pub fn on_wheel(delta_y: f64) {
    STATE.with(|state| state.borrow_mut().controller.on_wheel(delta_y));
}

#[wasm_bindgen]
pub fn reset_view() {
    STATE.with(|state| state.borrow_mut().controller.reset_view());
}

/// One animation tick at host time `now_ms`. Returns whether the host pump
/// should reschedule itself. A missing or zero-sized surface skips the
/// paint for this tick and tries again on the next one.
#[wasm_bindgen]
pub fn advance_frame(now_ms: f64) -> bool {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        let s = &mut *s;
        let Some(handle) = s.handle else {
            return false;
        };
        let Some(frame) = s.frame_loop.tick(handle, Time(now_ms / 1000.0)) else {
            return false;
        };
        s.last_frame = Some(frame);

        s.metrics.inc("frames");
        if frame.index > 0 {
            s.metrics.observe("frame.dt_ms", frame.dt_s * 1000.0);
        }
        s.metrics
            .set_gauge("viewport.zoom", s.controller.viewport().zoom());

        let input = s.assemble_frame(frame);
        let output = s.renderer.render(&input);
        s.metrics.add("points.drawn", output.stats.points_drawn as u64);
        s.metrics.add("points.culled", output.stats.points_culled as u64);

        if let Some(ctx) = context_2d(&s.canvas_id) {
            let _ = canvas::execute(&ctx, s.width, s.height, &output.commands);
        } else {
            s.metrics.inc("frames.skipped_no_surface");
        }

        s.frame_loop.is_running()
    })
}

/// Queues the three synthetic analysis producers on the idle scheduler.
/// Results fold back into dashboard state as their tasks complete.
#[wasm_bindgen]
pub fn refresh_analytics() {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        let s = &mut *s;

        let summary_out = s.summary_out.clone();
        let points = s.points.clone();
        let _ = s
            .idle
            .schedule(0, "traffic-summary", SummaryTask::new(points), move |out| {
                *summary_out.borrow_mut() = Some(out);
            });

        let forecast_out = s.forecast_out.clone();
        let _ = s.idle.schedule(
            1,
            "forecast",
            ForecastTask::new(s.synth.clone(), FORECAST_HORIZON_HOURS),
            move |out| {
                *forecast_out.borrow_mut() = Some(out);
            },
        );

        let routes_out = s.routes_out.clone();
        let _ = s.idle.schedule(
            2,
            "route-search",
            RouteSearchTask::new(s.synth.clone(), ROUTE_CANDIDATES_PER_KIND),
            move |out| {
                *routes_out.borrow_mut() = Some(out);
            },
        );
    });
}

/// One idle slice of at most `max_items` items. Returns a JSON progress
/// report for the page's progress indicators.
#[wasm_bindgen]
pub fn idle_pulse(max_items: u32) -> String {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        let s = &mut *s;
        let mut budget = SliceBudget::new(max_items);
        let outcome = s.idle.pulse(&mut budget);

        if let Some(summary) = s.summary_out.borrow_mut().take() {
            s.summary = Some(summary);
            s.metrics.inc("idle.summaries");
        }
        if let Some(horizon) = s.forecast_out.borrow_mut().take() {
            s.predictions = horizon;
            s.metrics.inc("idle.forecasts");
        }
        if let Some(routes) = s.routes_out.borrow_mut().take() {
            let kind = s.route_kind;
            s.selected_route = routes.into_iter().find(|r| r.kind == kind);
            s.metrics.inc("idle.route_searches");
        }
        if outcome.completed {
            let frame = s.bus_frame();
            s.bus.emit(frame, "idle", "task complete");
        }

        serde_json::json!({
            "active": outcome.task.is_some(),
            "itemsProcessed": outcome.items_processed,
            "percent": outcome.percent,
            "completed": outcome.completed,
            "pending": s.idle.has_work(),
        })
        .to_string()
    })
}

#[wasm_bindgen]
pub fn summary_json() -> String {
    STATE.with(|state| {
        let s = state.borrow();
        match &s.summary {
            Some(summary) => serde_json::to_string(summary).unwrap_or_else(|_| "null".to_string()),
            None => "null".to_string(),
        }
    })
}

#[wasm_bindgen]
pub fn metrics_json() -> String {
    STATE.with(|state| {
        let snap = state.borrow().metrics.snapshot();
        serde_json::json!({
            "counters": snap
                .counters
                .iter()
                .map(|(k, v)| serde_json::json!({"name": k, "value": v}))
                .collect::<Vec<_>>(),
            "gauges": snap
                .gauges
                .iter()
                .map(|(k, v)| serde_json::json!({"name": k, "value": v}))
                .collect::<Vec<_>>(),
            "histograms": snap
                .histograms
                .iter()
                .map(|(k, h)| {
                    serde_json::json!({
                        "name": k,
                        "count": h.count,
                        "mean": h.mean(),
                        "min": h.min,
                        "max": h.max,
                    })
                })
                .collect::<Vec<_>>(),
        })
        .to_string()
    })
}

/// Drains buffered trace events as JSON.
#[wasm_bindgen]
pub fn events_json() -> String {
    STATE.with(|state| {
        let events = state.borrow_mut().bus.drain();
        serde_json::json!(
            events
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "frame": e.frame_index,
                        "kind": e.kind,
                        "message": e.message,
                    })
                })
                .collect::<Vec<_>>()
        )
        .to_string()
    })
}

#[wasm_bindgen]
pub fn debug_info() -> String {
    STATE.with(|state| {
        let s = state.borrow();
        format!(
            "mode: {}\nzoom: {:.2}\npoints: {}\nanimating: {}\nidle work: {}",
            s.mode.as_str(),
            s.controller.viewport().zoom(),
            s.points.len(),
            s.frame_loop.is_running(),
            s.idle.has_work(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::DashboardState;
    use foundation::time::Time;
    use runtime::frame::Frame;
    use scene::view_mode::ViewMode;
    use telemetry::synthetic::{self, SyntheticConfig};

    // State assembly is pure Rust; it must work without a browser.
    #[test]
    fn assemble_frame_applies_filters_and_snapshot() {
        let mut s = DashboardState::new();
        s.points = synthetic::traffic_points(&SyntheticConfig::default());
        s.filters.congestion = telemetry::filter::CongestionBand::High;
        s.mode = ViewMode::Heatmap;

        let input = s.assemble_frame(Frame::first(Time(2.0)));
        assert_eq!(input.mode, ViewMode::Heatmap);
        assert!(input.points.iter().all(|p| p.congestion > 0.7));
        assert_eq!(input.time_s, 2.0);
    }

    #[test]
    fn loop_state_round_trip_without_a_canvas() {
        let mut s = DashboardState::new();
        let handle = s.frame_loop.start();
        assert!(s.frame_loop.tick(handle, Time(0.0)).is_some());
        s.frame_loop.stop();
        assert!(s.frame_loop.tick(handle, Time(0.1)).is_none());
    }
}
