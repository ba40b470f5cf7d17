//! Thin `Reflect` helpers for SDKs that ship no Rust bindings.

use foundation::geo::LatLng;
use js_sys::{Array, Function, Object, Reflect};
use mapview::ProviderError;
use wasm_bindgen::{JsCast, JsValue};

pub fn get(target: &JsValue, key: &str) -> Result<JsValue, JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
}

/// `target[key]`, or `None` when missing, `undefined` or `null`.
pub fn lookup(target: &JsValue, key: &str) -> Option<JsValue> {
    get(target, key)
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

pub fn set(target: &Object, key: &str, value: impl Into<JsValue>) {
    // Only fails on frozen objects, which we never build.
    let _ = Reflect::set(target, &JsValue::from_str(key), &value.into());
}

pub fn call(target: &JsValue, method: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let func: Function = get(target, method)?.dyn_into()?;
    let args: Array = args.iter().collect();
    Reflect::apply(&func, target, &args)
}

/// `new namespace[ctor](...args)`.
pub fn construct(namespace: &JsValue, ctor: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let func: Function = get(namespace, ctor)?.dyn_into()?;
    let args: Array = args.iter().collect();
    Reflect::construct(&func, &args)
}

pub fn lat_lng(lat: f64, lng: f64) -> Object {
    let obj = Object::new();
    set(&obj, "lat", lat);
    set(&obj, "lng", lng);
    obj
}

/// `[lat, lng]`, the form Leaflet takes.
pub fn lat_lng_pair(p: LatLng) -> Array {
    p.to_array().iter().map(|v| JsValue::from_f64(*v)).collect()
}

pub fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{err:?}"))
}

pub fn provider_error(context: &str, err: &JsValue) -> ProviderError {
    ProviderError::new(format!("{context}: {}", describe(err)))
}

pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

pub fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

pub fn error(message: &str) {
    web_sys::console::error_1(&JsValue::from_str(message));
}
