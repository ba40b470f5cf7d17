use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use js_sys::Array;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use mapview::{
    ANALYSIS_INFO, AnalysisKind, MapButton, MapSequencer, SequencerTask, SiteProfile, TaskOutcome,
};
use runtime::Scheduler;

mod dom;
mod js;
mod providers;
mod timers;

use dom::{DomContainer, DomStatus};
use timers::BrowserScheduler;

struct Host {
    sequencer: MapSequencer,
    scheduler: BrowserScheduler,
}

impl Host {
    fn run_task(&mut self, task: SequencerTask) {
        let now = self.scheduler.now();
        match self.sequencer.run_task(task, now) {
            TaskOutcome::AnalysisComplete(stats) => dom::render_stats(&stats),
            TaskOutcome::Mounted(backend) => js::log(&format!("map backend: {}", backend.label())),
            TaskOutcome::Ignored => {}
        }
        self.report_failure();
    }

    fn report_failure(&mut self) {
        if let Some(message) = self.sequencer.take_failure_report() {
            js::error(&message);
        }
    }
}

thread_local! {
    static HOST: RefCell<Option<Host>> = const { RefCell::new(None) };
}

fn with_host<R>(f: impl FnOnce(&mut Host) -> R) -> Option<R> {
    HOST.with(|cell| {
        let mut host = cell.try_borrow_mut().ok()?;
        host.as_mut().map(f)
    })
}

pub(crate) fn fire_task(task: SequencerTask) {
    if with_host(|host| host.run_task(task)).is_none() {
        js::warn("map task fired with no mounted map section");
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Wires the map section using a JSON site profile, or the default profile.
#[wasm_bindgen]
pub fn mount_map_section(profile_json: Option<String>) -> Result<(), JsValue> {
    let profile = match profile_json {
        Some(json) => SiteProfile::from_json(&json).map_err(to_js)?,
        None => SiteProfile::mapmitra(),
    };
    mount_with_profile(profile)
}

/// Wires the map section with a built-in profile (`mapmitra` or `legacy`).
#[wasm_bindgen]
pub fn mount_builtin(name: &str) -> Result<(), JsValue> {
    let profile = SiteProfile::builtin(name)
        .ok_or_else(|| JsValue::from_str(&format!("unknown site profile: {name}")))?;
    mount_with_profile(profile)
}

#[wasm_bindgen]
pub fn load_profile(url: String) {
    spawn_local(async move {
        let profile = match fetch_profile(&url).await {
            Ok(p) => p,
            Err(err) => {
                js::error(&format!("Failed to fetch site profile: {}", js::describe(&err)));
                return;
            }
        };
        if let Err(err) = mount_with_profile(profile) {
            js::error(&format!("Failed to mount map section: {}", js::describe(&err)));
        }
    });
}

/// Current view state as JSON, for debugging from the console.
#[wasm_bindgen]
pub fn map_state() -> Result<String, JsValue> {
    with_host(|host| serde_json::to_string(host.sequencer.state()).map_err(to_js))
        .unwrap_or_else(|| Err(JsValue::from_str("map section not mounted")))
}

fn mount_with_profile(profile: SiteProfile) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    if document.get_element_by_id(dom::MAP_CONTAINER_ID).is_none() {
        return Err(JsValue::from_str("map container not found"));
    }
    if HOST.with(|cell| cell.borrow().is_some()) {
        return Err(JsValue::from_str("map section already mounted"));
    }

    let threshold = profile.visibility_threshold;
    let analysis = profile.analysis_controls;
    let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let sequencer = MapSequencer::new(
        profile,
        providers::detect(&window),
        Box::new(DomContainer::new(dom::MAP_CONTAINER_ID, dom::MAP_OVERLAY_ID)),
        Box::new(DomStatus::new(dom::MAP_STATUS_ID)),
    )
    .with_seed(seed);

    HOST.with(|cell| {
        *cell.borrow_mut() = Some(Host {
            sequencer,
            scheduler: BrowserScheduler::new(),
        });
    });

    bind_map_controls(&document)?;
    if analysis {
        bind_analysis_controls(&document)?;
    }
    observe_section(&document, threshold)
}

fn observe_section(document: &web_sys::Document, threshold: f64) -> Result<(), JsValue> {
    // No section: the trigger never fires and the map stays unmounted.
    let Some(section) = document.query_selector(dom::MAP_SECTION_SELECTOR)? else {
        return Ok(());
    };

    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            let Ok(entry) = entries.get(0).dyn_into::<IntersectionObserverEntry>() else {
                return;
            };
            let ratio = if entry.is_intersecting() {
                entry.intersection_ratio()
            } else {
                0.0
            };
            let keep_observing = with_host(|host| {
                host.sequencer.on_visibility(ratio, &mut host.scheduler);
                host.report_failure();
                host.sequencer.wants_visibility()
            })
            .unwrap_or(false);
            if !keep_observing {
                observer.unobserve(&entry.target());
            }
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(threshold));
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    observer.observe(&section);
    callback.forget();
    Ok(())
}

fn on_click(
    document: &web_sys::Document,
    id: &str,
    handler: impl FnMut() + 'static,
) -> Result<(), JsValue> {
    let Some(el) = document.get_element_by_id(id) else {
        return Ok(());
    };
    let mut handler = handler;
    let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| handler());
    el.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

fn bind_map_controls(document: &web_sys::Document) -> Result<(), JsValue> {
    for button in MapButton::ALL {
        on_click(document, button.element_id(), move || {
            let active = with_host(|host| {
                host.sequencer
                    .press(button)
                    .then(|| host.sequencer.controls().highlight_after(button))
            })
            .flatten()
            .flatten();
            if let Some(active) = active {
                dom::highlight_button(active);
            }
        })?;
    }
    Ok(())
}

fn bind_analysis_controls(document: &web_sys::Document) -> Result<(), JsValue> {
    on_click(document, dom::ANALYZE_BUTTON_ID, || {
        let kind = dom::selected_analysis()
            .and_then(|v| v.parse::<AnalysisKind>().ok())
            .unwrap_or_default();
        with_host(|host| host.sequencer.analyze(kind, &mut host.scheduler));
    })?;
    on_click(document, dom::INFO_BUTTON_ID, || dom::alert(ANALYSIS_INFO))
}

async fn fetch_profile(url: &str) -> Result<SiteProfile, JsValue> {
    let resp = Request::get(url).send().await.map_err(to_js)?;
    let text = resp.text().await.map_err(to_js)?;
    SiteProfile::from_json(&text).map_err(to_js)
}
