// Copyright 2025 Contributors to the approovtoken project.
// SPDX-License-Identifier: Apache-2.0

//! HTTP endpoint handlers

use super::AppState;
use axum::extract::State;
use axum::Json;
use rand::seq::SliceRandom;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

pub const SHAPES: [&str; 4] = ["Circle", "Triangle", "Square", "Rectangle"];
pub const FORMS: [&str; 4] = ["Sphere", "Cone", "Cube", "Box"];

fn pick(items: &'static [&'static str]) -> &'static str {
    items.choose(&mut rand::thread_rng()).copied().unwrap_or(items[0])
}

/// Links to the protected endpoints
pub async fn index(State(state): State<Arc<AppState>>) -> Json<Value> {
    let url = &state.full_url;

    Json(json!({
        "hello": format!("{url}/v2/hello"),
        "shapes": format!("{url}/v2/shapes"),
        "forms": format!("{url}/v2/forms"),
    }))
}

pub async fn hello() -> Json<Value> {
    Json(json!({ "text": "Hello, World!" }))
}

/// A random 2D shape
pub async fn shapes() -> Json<Value> {
    let shape = pick(&SHAPES);
    debug!("shape: {}", shape);

    Json(json!({ "shape": shape }))
}

/// A random 3D form
pub async fn forms() -> Json<Value> {
    let form = pick(&FORMS);
    debug!("form: {}", form);

    Json(json!({ "form": form }))
}
