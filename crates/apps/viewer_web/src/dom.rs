use mapview::{MapButton, MapContainer, MockStats, StatusSink};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::js;

pub const MAP_CONTAINER_ID: &str = "google-earth-map";
pub const MAP_STATUS_ID: &str = "map-status";
pub const MAP_OVERLAY_ID: &str = "map-overlay";
pub const MAP_SECTION_SELECTOR: &str = ".map-section";
pub const MAP_BUTTON_SELECTOR: &str = ".map-btn";
pub const ANALYZE_BUTTON_ID: &str = "analyze-btn";
pub const ANALYSIS_TYPE_ID: &str = "analysis-type";
pub const INFO_BUTTON_ID: &str = "ee-info-btn";

pub fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

pub fn element(id: &str) -> Option<Element> {
    document().and_then(|d| d.get_element_by_id(id))
}

/// The map container element, rewritten wholesale when a backend mounts.
pub struct DomContainer {
    id: String,
    overlay_id: String,
}

impl DomContainer {
    pub fn new(id: impl Into<String>, overlay_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            overlay_id: overlay_id.into(),
        }
    }
}

impl MapContainer for DomContainer {
    fn id(&self) -> &str {
        &self.id
    }

    fn clear(&mut self) {
        if let Some(el) = element(&self.id) {
            el.set_inner_html("");
        }
    }

    fn replace_with_host(&mut self, child_id: &str) {
        if let Some(el) = element(&self.id) {
            el.set_inner_html(&format!(
                r#"<div id="{child_id}" style="width:100%;height:100%;"></div>"#
            ));
        }
    }

    fn hide_overlay(&mut self) {
        let Some(el) = element(&self.overlay_id) else {
            return;
        };
        let _ = el.class_list().add_1("hidden");
        if let Some(html) = el.dyn_ref::<HtmlElement>() {
            let _ = html.style().set_property("display", "none");
        }
    }
}

/// Writes status text into the status element, if the page has one.
pub struct DomStatus {
    id: String,
}

impl DomStatus {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl StatusSink for DomStatus {
    fn set_status(&mut self, message: &str) {
        if let Some(el) = element(&self.id) {
            el.set_text_content(Some(message));
        }
    }
}

/// Moves the `active` class onto `active`'s element, off every other button.
pub fn highlight_button(active: MapButton) {
    let Some(doc) = document() else {
        return;
    };
    if let Ok(buttons) = doc.query_selector_all(MAP_BUTTON_SELECTOR) {
        for i in 0..buttons.length() {
            if let Some(btn) = buttons.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                let _ = btn.class_list().remove_1("active");
            }
        }
    }
    if let Some(btn) = element(active.element_id()) {
        let _ = btn.class_list().add_1("active");
    }
}

pub fn render_stats(stats: &MockStats) {
    let fields = [
        ("cloud-coverage", stats.cloud_coverage_label()),
        ("mean-ndvi", stats.mean_ndvi_label()),
        ("scene-count", stats.scene_count.to_string()),
    ];
    for (id, text) in fields {
        if let Some(el) = element(id) {
            el.set_text_content(Some(&text));
        }
    }
}

pub fn selected_analysis() -> Option<String> {
    element(ANALYSIS_TYPE_ID)
        .and_then(|el| el.dyn_into::<web_sys::HtmlSelectElement>().ok())
        .map(|select| select.value())
        .filter(|v| !v.is_empty())
}

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window()
        && let Err(err) = window.alert_with_message(message)
    {
        js::warn(&format!("alert failed: {}", js::describe(&err)));
    }
}
