//! WASM bindings for Composite Solver
//!
//! Each function takes a JSON request string and returns a JSON response
//! string of the form `{ "success": bool, "error"?: string, "results"?: ..., "ms_elapsed": number }`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::analysis::ApiVersion;
use crate::error::CompositeResult;
use crate::model::{
    compute_lamina_engineering_constants, compute_laminate_3d_properties,
    compute_laminate_plate_properties, compute_udfrc_models, LaminaInput, StackInput, UdfrcInput,
};

// Use wee_alloc for smaller WASM binary
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[derive(Debug, Serialize)]
struct Response<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<T>,
    ms_elapsed: f64,
}

fn respond<I, T, F>(request_json: &str, version: &str, compute: F) -> String
where
    I: DeserializeOwned,
    T: Serialize,
    F: FnOnce(&I, ApiVersion) -> CompositeResult<T>,
{
    let start = js_sys::Date::now();

    let outcome = version.parse::<ApiVersion>().and_then(|version| {
        let input: I = serde_json::from_str(request_json)?;
        compute(&input, version)
    });

    let response = match outcome {
        Ok(results) => Response {
            success: true,
            error: None,
            results: Some(results),
            ms_elapsed: js_sys::Date::now() - start,
        },
        Err(e) => {
            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
            Response {
                success: false,
                error: Some(e.to_string()),
                results: None,
                ms_elapsed: js_sys::Date::now() - start,
            }
        }
    };

    serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(r#"{{"success":false,"error":"Serialization failed: {}"}}"#, e)
    })
}

/// Off-axis lamina constants; `version` is `"v1"` or `"v2"`
#[wasm_bindgen]
pub fn lamina_engineering_constants(request_json: &str, version: &str) -> String {
    respond(request_json, version, |input: &LaminaInput, v| {
        compute_lamina_engineering_constants(input, &v.conventions())
    })
}

#[wasm_bindgen]
pub fn laminate_plate_properties(request_json: &str, version: &str) -> String {
    respond(request_json, version, |input: &StackInput, v| {
        compute_laminate_plate_properties(input, &v.conventions())
    })
}

#[wasm_bindgen]
pub fn laminate_3d_properties(request_json: &str, version: &str) -> String {
    respond(request_json, version, |input: &StackInput, v| {
        compute_laminate_3d_properties(input, &v.conventions())
    })
}

/// UDFRC properties under every model of the API generation
#[wasm_bindgen]
pub fn udfrc_properties(request_json: &str, version: &str) -> String {
    respond(request_json, version, |input: &UdfrcInput, v| {
        compute_udfrc_models(
            input,
            &v.micromechanics_models(),
            v.conventions().conditioning_tolerance,
        )
    })
}

#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
