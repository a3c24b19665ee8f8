//! Browser tests, run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use video_matte::{
    MatteConfig, MatteError, TransparentVideo,
    lifecycle::{MountedMatte, observer_options},
    rendering::Canvas2dMatteRenderer,
    rendering_gpu::{
        DynamicRenderer, MatteRenderer,
        webgl1::WebGL1MattePipeline,
        webgl2::{MatteProgram, MattePipeline, WebGL2Context},
    },
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::{
    CanvasRenderingContext2d, Event, HtmlCanvasElement, HtmlElement, HtmlVideoElement,
    WebGlRenderingContext,
};

wasm_bindgen_test_configure!(run_in_browser);

fn create<T: JsCast>(tag: &str) -> T {
    web_sys::window()
        .unwrap()
        .document()
        .unwrap()
        .create_element(tag)
        .unwrap()
        .dyn_into::<T>()
        .unwrap()
}

fn options(json: &str) -> JsValue {
    js_sys::JSON::parse(json).unwrap()
}

#[wasm_bindgen_test]
fn matte_program_compiles_and_exposes_uniforms() {
    let canvas: HtmlCanvasElement = create("canvas");
    let context = match WebGL2Context::from_canvas(&canvas) {
        Ok(context) => context,
        // Headless runners without a GPU
        Err(MatteError::ContextUnavailable) => return,
        Err(err) => panic!("unexpected error: {}", err),
    };

    let program = MatteProgram::new(&context).unwrap();
    assert!(program.u_substitute_color.is_some());
    assert!(program.u_threshold.is_some());
    assert!(program.u_transparent.is_some());
}

#[wasm_bindgen_test]
fn pipeline_viewport_starts_at_canvas_size() {
    let canvas: HtmlCanvasElement = create("canvas");
    canvas.set_width(64);
    canvas.set_height(32);
    let Ok(pipeline) = MattePipeline::new(&canvas) else {
        return;
    };
    assert_eq!(pipeline.texture_size(), (0, 0));
    assert!(!pipeline.context().is_lost());
}

#[wasm_bindgen_test]
fn invalid_options_throw() {
    let result = TransparentVideo::new(
        create::<HtmlElement>("div"),
        create::<HtmlVideoElement>("video"),
        create::<HtmlCanvasElement>("canvas"),
        options(r#"{ "src": "" }"#),
    );
    assert!(result.is_err());
}

#[wasm_bindgen_test]
fn dropped_pipeline_deletes_its_program() {
    let canvas: HtmlCanvasElement = create("canvas");
    let Ok(pipeline) = MattePipeline::new(&canvas) else {
        return;
    };
    let gl = pipeline.context().gl().clone();
    let program = pipeline.program().program.clone();
    assert!(gl.is_program(Some(&program)));

    drop(pipeline);
    assert!(!gl.is_program(Some(&program)));
}

#[wasm_bindgen_test]
fn canvas2d_discard_frame_clears_the_canvas() {
    let canvas: HtmlCanvasElement = create("canvas");
    canvas.set_width(4);
    canvas.set_height(4);
    let renderer = Canvas2dMatteRenderer::new(&canvas, MatteConfig::new("/clip.mp4")).unwrap();

    // Same context object the renderer draws through
    let ctx = canvas
        .get_context("2d")
        .unwrap()
        .unwrap()
        .dyn_into::<CanvasRenderingContext2d>()
        .unwrap();
    ctx.set_fill_style_str("#fff");
    ctx.fill_rect(0.0, 0.0, 4.0, 4.0);

    renderer.discard_frame();

    let pixels = ctx.get_image_data(0.0, 0.0, 4.0, 4.0).unwrap().data().0;
    assert!(pixels.iter().all(|&byte| byte == 0));
}

#[wasm_bindgen_test]
fn webgl1_is_used_when_webgl2_is_refused() {
    let canvas: HtmlCanvasElement = create("canvas");
    // A canvas holding a WebGL1 context returns null for "webgl2"
    let Some(gl) = canvas.get_context("webgl").unwrap() else {
        return;
    };
    assert!(gl.dyn_into::<WebGlRenderingContext>().is_ok());

    let renderer = DynamicRenderer::create(&canvas, &MatteConfig::new("/clip.mp4")).unwrap();
    assert_eq!(renderer.backend_name(), "webgl1");
}

#[wasm_bindgen_test]
fn webgl1_program_compiles_and_exposes_uniforms() {
    let canvas: HtmlCanvasElement = create("canvas");
    let pipeline = match WebGL1MattePipeline::new(&canvas) {
        Ok(pipeline) => pipeline,
        Err(MatteError::ContextUnavailable) => return,
        Err(err) => panic!("unexpected error: {}", err),
    };
    assert!(pipeline.has_uniforms());

    let gl = pipeline.gl().clone();
    let program = pipeline.program().clone();
    drop(pipeline);
    assert!(!gl.is_program(Some(&program)));
}

#[wasm_bindgen_test]
fn observer_fires_on_any_overlap() {
    let threshold = js_sys::Reflect::get(&observer_options(), &JsValue::from_str("threshold")).unwrap();
    assert_eq!(threshold.as_f64(), Some(0.0));
}

fn mount(video: &HtmlVideoElement) -> MountedMatte {
    MountedMatte::mount(
        create::<HtmlElement>("div"),
        video.clone(),
        create::<HtmlCanvasElement>("canvas"),
        MatteConfig::from_js(&options(
            r#"{ "src": "/clip.mp4", "keyColor": [34, 34, 34], "threshold": 30 }"#,
        ))
        .unwrap(),
    )
    .unwrap()
}

#[wasm_bindgen_test]
fn play_event_starts_the_loop() {
    let video: HtmlVideoElement = create("video");
    let mut matte = mount(&video);
    // No source loaded yet: nothing starts until an event arrives
    assert!(!matte.is_running());

    video.dispatch_event(&Event::new("play").unwrap()).unwrap();
    assert!(matte.is_running());
    assert!(!matte.is_stopped());

    matte.unmount();
    assert!(!matte.is_running());
}

#[wasm_bindgen_test]
fn unmount_is_idempotent_and_silences_events() {
    let video: HtmlVideoElement = create("video");
    let mut matte = mount(&video);
    video.dispatch_event(&Event::new("loadeddata").unwrap()).unwrap();
    assert!(matte.is_running());

    matte.unmount();
    matte.unmount();
    assert!(matte.is_stopped());

    video.dispatch_event(&Event::new("play").unwrap()).unwrap();
    video.dispatch_event(&Event::new("loadeddata").unwrap()).unwrap();
    assert!(matte.is_stopped());
    assert!(!matte.is_running());
    assert!(!matte.is_rendering());
}

#[wasm_bindgen_test]
fn dispose_can_be_called_twice() {
    let mut matte = TransparentVideo::new(
        create::<HtmlElement>("div"),
        create::<HtmlVideoElement>("video"),
        create::<HtmlCanvasElement>("canvas"),
        options(r#"{ "src": "/clip.mp4" }"#),
    )
    .unwrap();

    matte.set_playing(Some(false));
    matte.dispose();
    matte.dispose();
    assert!(!matte.is_rendering());
}
