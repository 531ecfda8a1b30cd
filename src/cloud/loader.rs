//! Async image decode with a resolve-once timeout race
//!
//! Races {onload, onerror, timeout}; whichever fires first wins and later
//! callbacks are no-ops. Every failure path (load error, timeout, tainted
//! canvas read) is handled locally by building the procedural fallback, so
//! callers only ever observe a successful build.

use std::cell::Cell;
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::builder::{self, PixelGrid, PointCloud, PARTICLE_COUNT};

/// A hung fetch must not stall startup past this bound
const LOAD_TIMEOUT_MS: i32 = 3000;

/// Internal failure taxonomy; never escapes this module
enum BuildError {
    ImageLoadFailure,
    ImageTimeout,
    CanvasReadFailure,
}

impl BuildError {
    fn describe(&self) -> &'static str {
        match self {
            BuildError::ImageLoadFailure => "image failed to load",
            BuildError::ImageTimeout => "image load timed out",
            BuildError::CanvasReadFailure => "pixel data unreadable",
        }
    }
}

/// Race outcome codes passed through the settle promise
const OUTCOME_LOADED: f64 = 0.0;
const OUTCOME_ERROR: f64 = 1.0;
const OUTCOME_TIMEOUT: f64 = 2.0;

/// Build a point cloud from an image URL. Resolves exactly once and never
/// fails: any decode problem falls back to the procedural shape.
pub async fn build_from_url(url: &str) -> PointCloud {
    let mut rng = SmallRng::seed_from_u64(js_sys::Date::now() as u64);
    match decode_pixels(url).await {
        Ok(pixels) => builder::build_from_pixels(&pixels, &mut rng),
        Err(err) => {
            web_sys::console::warn_1(
                &format!("Falling back to procedural shape: {}", err.describe()).into(),
            );
            builder::build_fallback(PARTICLE_COUNT, &mut rng)
        }
    }
}

async fn decode_pixels(url: &str) -> Result<PixelGrid, BuildError> {
    let image = HtmlImageElement::new().map_err(|_| BuildError::ImageLoadFailure)?;
    // Allow pixel reads for CORS-enabled hosts; tainted reads still fail
    // and are caught at get_image_data below.
    image.set_cross_origin(Some("anonymous"));

    await_load(&image, url).await?;
    rasterize(&image)
}

/// Wait for the first of {load, error, timeout} on the image
async fn await_load(image: &HtmlImageElement, url: &str) -> Result<(), BuildError> {
    let image = image.clone();
    let url = url.to_owned();

    let promise = js_sys::Promise::new(&mut |resolve: js_sys::Function, _reject| {
        let settled = Rc::new(Cell::new(false));

        let settle = |outcome: f64| {
            let resolve = resolve.clone();
            let settled = settled.clone();
            Closure::wrap(Box::new(move || {
                // First completion wins; later callbacks are no-ops.
                if !settled.replace(true) {
                    let _ = resolve.call1(&JsValue::NULL, &JsValue::from_f64(outcome));
                }
            }) as Box<dyn FnMut()>)
        };

        let onload = settle(OUTCOME_LOADED);
        let onerror = settle(OUTCOME_ERROR);
        let ontimeout = settle(OUTCOME_TIMEOUT);

        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                ontimeout.as_ref().unchecked_ref(),
                LOAD_TIMEOUT_MS,
            );
        }

        // Handlers stay alive for the page lifetime; image loads are rare.
        onload.forget();
        onerror.forget();
        ontimeout.forget();

        image.set_src(&url);
    });

    let outcome = JsFuture::from(promise)
        .await
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(OUTCOME_ERROR);

    if outcome == OUTCOME_LOADED {
        Ok(())
    } else if outcome == OUTCOME_TIMEOUT {
        Err(BuildError::ImageTimeout)
    } else {
        Err(BuildError::ImageLoadFailure)
    }
}

/// Draw the image into an offscreen canvas at grid resolution and read
/// back one RGBA pixel per particle.
fn rasterize(image: &HtmlImageElement) -> Result<PixelGrid, BuildError> {
    let (cols, rows) = builder::fit_grid(
        image.natural_width(),
        image.natural_height(),
        PARTICLE_COUNT,
    );

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or(BuildError::CanvasReadFailure)?;
    let canvas = document
        .create_element("canvas")
        .map_err(|_| BuildError::CanvasReadFailure)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| BuildError::CanvasReadFailure)?;
    canvas.set_width(cols as u32);
    canvas.set_height(rows as u32);

    let context = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
        .ok_or(BuildError::CanvasReadFailure)?;

    context
        .draw_image_with_html_image_element_and_dw_and_dh(
            image,
            0.0,
            0.0,
            cols as f64,
            rows as f64,
        )
        .map_err(|_| BuildError::CanvasReadFailure)?;

    // Throws on cross-origin tainted canvases.
    let data = context
        .get_image_data(0.0, 0.0, cols as f64, rows as f64)
        .map_err(|_| BuildError::CanvasReadFailure)?
        .data();

    Ok(PixelGrid {
        cols,
        rows,
        rgba: data.0,
    })
}
