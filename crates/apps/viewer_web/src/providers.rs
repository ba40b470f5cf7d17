//! Google Maps, Leaflet and Earth Engine behind the `mapview` capability traits.
//!
//! Each SDK is looked up once on `window`; an absent global means the provider
//! is simply not injected.

use foundation::geo::LatLng;
use js_sys::Object;
use mapview::{
    EarthEngine, FallbackMapHandle, FallbackProvider, MapContainer, MapLibraries, Marker,
    PrimaryMapHandle, PrimaryMapOptions, PrimaryProvider, ProviderError, ViewMode,
};
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;

use crate::js;

const DARK_STYLE: &str = r##"[
    {"elementType": "geometry", "stylers": [{"color": "#1a1a1a"}]},
    {"elementType": "labels.text.stroke", "stylers": [{"color": "#1a1a1a"}]},
    {"elementType": "labels.text.fill", "stylers": [{"color": "#00f2fe"}]}
]"##;

const MARKER_COLOR: &str = "#00f2fe";

/// Looks up every supported SDK on `window`.
pub fn detect(window: &web_sys::Window) -> MapLibraries {
    let global: &JsValue = window.as_ref();
    let mut libraries = MapLibraries::none();

    if let Some(maps) = js::lookup(global, "google").and_then(|g| js::lookup(&g, "maps")) {
        libraries = libraries.with_primary(GoogleMaps { maps });
    }
    if let Some(leaflet) = js::lookup(global, "L") {
        libraries = libraries.with_fallback(Leaflet { leaflet });
    }
    if let Some(ee) = js::lookup(global, "ee") {
        libraries = libraries.with_earth_engine(EarthEngineJs { ee });
    }
    libraries
}

pub struct GoogleMaps {
    maps: JsValue,
}

impl GoogleMaps {
    fn map_options(&self, options: &PrimaryMapOptions) -> Object {
        let obj = Object::new();
        js::set(&obj, "zoom", options.zoom);
        js::set(
            &obj,
            "center",
            js::lat_lng(options.center.lat, options.center.lng),
        );
        js::set(&obj, "mapTypeId", options.view_mode.map_type_id());
        js::set(&obj, "tilt", options.tilt);
        js::set(&obj, "heading", options.heading);
        if options.dark_style
            && let Ok(styles) = js_sys::JSON::parse(DARK_STYLE)
        {
            js::set(&obj, "styles", styles);
        }
        obj
    }
}

impl PrimaryProvider for GoogleMaps {
    fn create_map(
        &mut self,
        container: &mut dyn MapContainer,
        options: &PrimaryMapOptions,
    ) -> Result<Box<dyn PrimaryMapHandle>, ProviderError> {
        let element = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(container.id()))
            .ok_or_else(|| ProviderError::new(format!("no element #{}", container.id())))?;

        let opts = self.map_options(options);
        let map = js::construct(&self.maps, "Map", &[element.into(), opts.into()])
            .map_err(|e| js::provider_error("google.maps.Map", &e))?;

        Ok(Box::new(GoogleMap {
            maps: self.maps.clone(),
            map,
            zoom: options.zoom,
        }))
    }
}

pub struct GoogleMap {
    maps: JsValue,
    map: JsValue,
    /// Last zoom we set; used when `getZoom` is unavailable.
    zoom: f64,
}

impl GoogleMap {
    fn invoke(&self, method: &str, args: &[JsValue]) {
        if let Err(err) = js::call(&self.map, method, args) {
            js::warn(&format!("google map {method} failed: {}", js::describe(&err)));
        }
    }
}

impl PrimaryMapHandle for GoogleMap {
    fn set_view_mode(&mut self, mode: ViewMode) {
        self.invoke("setMapTypeId", &[JsValue::from_str(mode.map_type_id())]);
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
        self.invoke("setZoom", &[JsValue::from_f64(zoom)]);
    }

    fn zoom(&self) -> f64 {
        js::call(&self.map, "getZoom", &[])
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(self.zoom)
    }

    fn set_tilt(&mut self, degrees: f64) {
        self.invoke("setTilt", &[JsValue::from_f64(degrees)]);
    }

    fn set_heading(&mut self, degrees: f64) {
        self.invoke("setHeading", &[JsValue::from_f64(degrees)]);
    }

    fn set_center(&mut self, center: LatLng) {
        self.invoke("setCenter", &[js::lat_lng(center.lat, center.lng).into()]);
    }

    fn add_marker(&mut self, marker: &Marker) {
        let icon = Object::new();
        if let Some(circle) =
            js::lookup(&self.maps, "SymbolPath").and_then(|p| js::lookup(&p, "CIRCLE"))
        {
            js::set(&icon, "path", circle);
        }
        js::set(&icon, "scale", 8.0);
        js::set(&icon, "fillColor", MARKER_COLOR);
        js::set(&icon, "fillOpacity", 0.8);
        js::set(&icon, "strokeColor", "#ffffff");
        js::set(&icon, "strokeWeight", 2.0);

        let opts = Object::new();
        js::set(
            &opts,
            "position",
            js::lat_lng(marker.position.lat, marker.position.lng),
        );
        js::set(&opts, "map", self.map.clone());
        js::set(&opts, "title", marker.title.as_str());
        js::set(&opts, "icon", icon);

        if let Err(err) = js::construct(&self.maps, "Marker", &[opts.into()]) {
            js::warn(&format!("google marker failed: {}", js::describe(&err)));
        }
    }
}

pub struct Leaflet {
    leaflet: JsValue,
}

impl FallbackProvider for Leaflet {
    fn create_map(
        &mut self,
        container_id: &str,
        center: LatLng,
        zoom: u8,
    ) -> Result<Box<dyn FallbackMapHandle>, ProviderError> {
        let map = js::call(&self.leaflet, "map", &[JsValue::from_str(container_id)])
            .map_err(|e| js::provider_error("L.map", &e))?;
        let view = js::lat_lng_pair(center);
        js::call(&map, "setView", &[view.into(), JsValue::from(zoom)])
            .map_err(|e| js::provider_error("L.map.setView", &e))?;

        Ok(Box::new(LeafletMap {
            leaflet: self.leaflet.clone(),
            map,
        }))
    }
}

pub struct LeafletMap {
    leaflet: JsValue,
    map: JsValue,
}

impl LeafletMap {
    fn add_layer(&self, layer: Result<JsValue, JsValue>, what: &str) {
        let added = layer.and_then(|l| js::call(&l, "addTo", &[self.map.clone()]));
        if let Err(err) = added {
            js::warn(&format!("leaflet {what} failed: {}", js::describe(&err)));
        }
    }
}

impl FallbackMapHandle for LeafletMap {
    fn add_tile_layer(&mut self, url_template: &str, attribution: &str) {
        let opts = Object::new();
        js::set(&opts, "attribution", attribution);
        let layer = js::call(
            &self.leaflet,
            "tileLayer",
            &[JsValue::from_str(url_template), opts.into()],
        );
        self.add_layer(layer, "tileLayer");
    }

    fn add_marker(&mut self, marker: &Marker) {
        let opts = Object::new();
        js::set(&opts, "title", marker.title.as_str());
        let pos = js::lat_lng_pair(marker.position);
        let layer = js::call(&self.leaflet, "marker", &[pos.into(), opts.into()]);
        self.add_layer(layer, "marker");
    }
}

pub struct EarthEngineJs {
    ee: JsValue,
}

impl EarthEngine for EarthEngineJs {
    /// Registers completion callbacks; the SDK reports the outcome later.
    fn initialize(&mut self) -> Result<(), ProviderError> {
        let on_ready = Closure::once_into_js(|| js::log("Earth Engine initialized successfully"));
        let on_error = Closure::once_into_js(|err: JsValue| {
            js::warn(&format!(
                "Earth Engine initialization notice: {}",
                js::describe(&err)
            ));
        });
        let requested = if js::lookup(&self.ee, "onInitialized").is_some() {
            js::call(&self.ee, "onInitialized", &[on_ready, on_error])
        } else {
            js::call(
                &self.ee,
                "initialize",
                &[JsValue::NULL, JsValue::NULL, on_ready, on_error],
            )
        };
        requested
            .map(|_| ())
            .map_err(|e| js::provider_error("ee.initialize", &e))
    }
}
