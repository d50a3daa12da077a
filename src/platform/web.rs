//! Browser wiring: canvas 2D surface, keyboard and mouse listeners, asset
//! loading, audio elements, loop scheduling and the page utilities.
//!
//! Every page carries a `data-app` attribute on `<body>` naming what to
//! run; [`run`] looks it up and wires the matching app to `#gameCanvas` (or
//! to the form elements of the utility pages).

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlAudioElement, HtmlCanvasElement, HtmlImageElement,
    HtmlInputElement, KeyboardEvent, MouseEvent, Response, Window,
};

use crate::assets::{AssetId, AssetKind};
use crate::audio::{AudioMixer, AudioSink, SoundEffect};
use crate::driver::{LoopHandle, Session, TickSource};
use crate::games::hex_guess::{DIFFICULTY_LEVELS, HexGuess};
use crate::games::lights_out::{self, Difficulty, LightsOut};
use crate::games::{GameKind, hex_guess};
use crate::renderer::{Color, Surface, TextStyle};
use crate::settings::Settings;
use crate::sim::{Game, Rect};
use crate::tools::base_converter::BaseConverter;
use crate::tools::code_viewer::{CodeView, FetchError, check_status};

const CANVAS_ID: &str = "gameCanvas";

fn js_err(msg: &str) -> JsValue {
    JsValue::from_str(msg)
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| js_err("no window"))
}

fn document() -> Result<Document, JsValue> {
    window()?.document().ok_or_else(|| js_err("no document"))
}

/// Route console output through `log` and report panics to the console
pub fn init_logging() {
    console_error_panic_hook::set_once();
    // A second init (page re-entry) keeps the existing logger
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Canvas 2D implementation of [`Surface`]
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    size: Vec2,
    images: HashMap<AssetId, HtmlImageElement>,
}

impl CanvasSurface {
    pub fn new(canvas: &HtmlCanvasElement, size: Vec2) -> Result<Self, JsValue> {
        canvas.set_width(size.x as u32);
        canvas.set_height(size.y as u32);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| js_err("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            ctx,
            size,
            images: HashMap::new(),
        })
    }

    fn fill(&self, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, color: Color) {
        self.fill(color);
        self.ctx
            .fill_rect(0.0, 0.0, f64::from(self.size.x), f64::from(self.size.y));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fill(color);
        self.ctx.fill_rect(
            f64::from(rect.pos.x),
            f64::from(rect.pos.y),
            f64::from(rect.size.x),
            f64::from(rect.size.y),
        );
    }

    fn draw_image(&mut self, image: AssetId, rect: Rect) {
        if let Some(img) = self.images.get(&image) {
            let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                img,
                f64::from(rect.pos.x),
                f64::from(rect.pos.y),
                f64::from(rect.size.x),
                f64::from(rect.size.y),
            );
        }
    }

    fn draw_text(&mut self, text: &str, at: Vec2, style: TextStyle) {
        self.fill(style.color);
        self.ctx.set_font(&style.font.to_string());
        self.ctx.set_text_align(style.align.as_str());
        let _ = self.ctx.fill_text(text, f64::from(at.x), f64::from(at.y));
    }
}

/// Sound effects played through `<audio>` elements
#[derive(Default)]
pub struct WebAudio {
    clips: HashMap<AssetId, HtmlAudioElement>,
}

impl AudioSink for WebAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        let Some(clip) = self.clips.get(&effect.asset()) else {
            return;
        };
        clip.set_current_time(0.0);
        clip.set_volume(f64::from(volume));
        // Autoplay policies may reject until the first user gesture
        if let Err(err) = clip.play() {
            log::debug!("sound {:?} not played: {:?}", effect, err);
        }
    }
}

struct App {
    session: Session<Box<dyn Game>>,
    surface: CanvasSurface,
}

/// Handle returned to the page for stopping a running game
#[wasm_bindgen]
pub struct GameHandle {
    handle: LoopHandle,
}

#[wasm_bindgen]
impl GameHandle {
    pub fn stop(&self) {
        self.handle.stop();
    }
}

fn canvas() -> Result<HtmlCanvasElement, JsValue> {
    document()?
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| js_err("missing #gameCanvas"))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| js_err("#gameCanvas is not a canvas"))
}

fn field_size(kind: GameKind) -> Vec2 {
    match kind {
        GameKind::DiscoJump => Vec2::new(
            crate::games::disco_jump::consts::FIELD_WIDTH,
            crate::games::disco_jump::consts::FIELD_HEIGHT,
        ),
        _ => Vec2::new(
            crate::games::brick_breaker::consts::FIELD_WIDTH,
            crate::games::brick_breaker::consts::FIELD_HEIGHT,
        ),
    }
}

/// Start a loop-driven game on `#gameCanvas`
#[wasm_bindgen]
pub fn start_game(name: &str, settings_json: Option<String>) -> Result<GameHandle, JsValue> {
    let kind: GameKind = name.parse().map_err(|e: crate::error::ArcadeError| js_err(&e.to_string()))?;
    let settings = match settings_json {
        Some(json) => Settings::from_json(&json).map_err(|e| js_err(&e.to_string()))?,
        None => Settings::default(),
    };
    settings
        .validate_players(kind.players())
        .map_err(|e| js_err(&e.to_string()))?;

    let game = kind.build(settings.seed);
    let manifest = game.assets();
    let mut surface = CanvasSurface::new(&canvas()?, field_size(kind))?;

    // Sounds are usable as soon as the element exists; images report back
    let mut audio_sink = WebAudio::default();
    let mut images = Vec::new();
    for spec in manifest.iter() {
        match spec.kind {
            AssetKind::Image => {
                let img = HtmlImageElement::new()?;
                surface.images.insert(spec.id, img.clone());
                images.push((spec.id, spec.url, img));
            }
            AssetKind::Sound => {
                let clip = HtmlAudioElement::new_with_src(spec.url)?;
                audio_sink.clips.insert(spec.id, clip);
            }
        }
    }

    let mut audio = AudioMixer::new(Box::new(audio_sink));
    settings.configure_audio(&mut audio);
    let mut session = Session::new(game, kind.bindings(), audio, &settings);
    for spec in manifest.iter().filter(|s| s.kind == AssetKind::Sound) {
        session
            .assets_mut()
            .mark_ready(spec.id)
            .map_err(|e| js_err(&e.to_string()))?;
    }

    let handle = session.handle();
    let app = Rc::new(RefCell::new(App { session, surface }));

    for (id, url, img) in images {
        watch_image(&app, id, &img);
        img.set_src(url);
    }
    setup_keyboard(&app)?;

    let source = app.borrow().session.game().tick_source();
    match source {
        TickSource::AnimationFrame => request_animation_frame(app.clone()),
        TickSource::FixedInterval { period_ms } => start_interval(app.clone(), period_ms)?,
    }

    log::info!("{} running", kind);
    Ok(GameHandle { handle })
}

fn watch_image(app: &Rc<RefCell<App>>, id: AssetId, img: &HtmlImageElement) {
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let _ = app.borrow_mut().session.assets_mut().mark_ready(id);
        });
        img.set_onload(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
    }
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let _ = app
                .borrow_mut()
                .session
                .assets_mut()
                .mark_failed(id, "image failed to load");
        });
        img.set_onerror(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
    }
}

fn setup_keyboard(app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let document = document()?;
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let code = event.code();
            // Keep arrows and space from scrolling the page
            if matches!(code.as_str(), "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | "Space") {
                event.prevent_default();
            }
            app.borrow_mut().session.key_down(&code);
        });
        document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            app.borrow_mut().session.key_up(&event.code());
        });
        document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        // Keys released while the window is unfocused never report keyup
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            app.borrow_mut().session.release_all();
        });
        window()?.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn run_frame(app: &Rc<RefCell<App>>, now_ms: f64) {
    let mut app = app.borrow_mut();
    let App { session, surface } = &mut *app;
    session.frame(now_ms, surface);
}

fn request_animation_frame(app: Rc<RefCell<App>>) {
    let Ok(window) = window() else { return };
    let closure = Closure::once(move |time: f64| {
        run_frame(&app, time);
        if app.borrow().session.handle().is_running() {
            request_animation_frame(app);
        }
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn start_interval(app: Rc<RefCell<App>>, period_ms: u32) -> Result<(), JsValue> {
    app.borrow_mut().session.set_paced(true);
    let window = window()?;
    let performance = window.performance().ok_or_else(|| js_err("no performance"))?;
    let interval_id = Rc::new(Cell::new(None::<i32>));

    let closure = {
        let interval_id = interval_id.clone();
        Closure::<dyn FnMut()>::new(move || {
            if !app.borrow().session.handle().is_running() {
                if let (Some(id), Some(window)) = (interval_id.take(), web_sys::window()) {
                    window.clear_interval_with_handle(id);
                }
                return;
            }
            run_frame(&app, performance.now());
        })
    };
    let id = window.set_interval_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        period_ms as i32,
    )?;
    interval_id.set(Some(id));
    closure.forget();
    Ok(())
}

/// Click position in canvas pixels
fn canvas_point(event: &MouseEvent) -> Vec2 {
    Vec2::new(event.offset_x() as f32, event.offset_y() as f32)
}

fn digit_key(code: &str) -> Option<usize> {
    code.strip_prefix("Digit")?.parse().ok()
}

/// Lights Out on `#gameCanvas`: digits 1-3 pick a difficulty, clicks press
#[wasm_bindgen]
pub fn start_lights_out(seed: u64) -> Result<(), JsValue> {
    let canvas = canvas()?;
    let surface = CanvasSurface::new(
        &canvas,
        Vec2::new(lights_out::layout::WIDTH, lights_out::layout::HEIGHT),
    )?;
    let state = Rc::new(RefCell::new((LightsOut::new(seed), surface)));
    {
        let mut guard = state.borrow_mut();
        let (game, surface) = &mut *guard;
        game.render(surface);
    }

    {
        let state = state.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let mut guard = state.borrow_mut();
            let (game, surface) = &mut *guard;
            if let Some((row, col)) = LightsOut::cell_at(canvas_point(&event)) {
                game.click(row, col);
                game.render(surface);
            }
        });
        canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let difficulty = match digit_key(&event.code()) {
                Some(1) => Difficulty::Easy,
                Some(2) => Difficulty::Medium,
                Some(3) => Difficulty::Hard,
                _ => return,
            };
            let mut guard = state.borrow_mut();
            let (game, surface) = &mut *guard;
            game.choose(difficulty);
            game.render(surface);
        });
        document()?.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

/// What The Hex on `#gameCanvas`: digits 1-8 pick a difficulty level,
/// clicks guess, rounds restart on a timer
#[wasm_bindgen]
pub fn start_hex_guess(seed: u64) -> Result<(), JsValue> {
    let canvas = canvas()?;
    let surface = CanvasSurface::new(
        &canvas,
        Vec2::new(hex_guess::layout::WIDTH, hex_guess::layout::HEIGHT),
    )?;
    let state = Rc::new(RefCell::new((HexGuess::new(seed), surface, None::<f64>)));

    {
        let state = state.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let mut guard = state.borrow_mut();
            let (game, _, _) = &mut *guard;
            if let Some(index) = game.swatch_at(canvas_point(&event)) {
                game.guess(index);
            }
        });
        canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let state = state.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let Some(level) = digit_key(&event.code())
                .and_then(|d| d.checked_sub(1))
                .and_then(|i| DIFFICULTY_LEVELS.get(i).copied())
            else {
                return;
            };
            if let Err(err) = state.borrow_mut().0.set_difficulty(level) {
                log::warn!("{}", err);
            }
        });
        document()?.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    hex_frame(state);
    Ok(())
}

type HexState = Rc<RefCell<(HexGuess, CanvasSurface, Option<f64>)>>;

fn hex_frame(state: HexState) {
    let Ok(window) = window() else { return };
    let closure = Closure::once(move |time: f64| {
        {
            let mut guard = state.borrow_mut();
            let (game, surface, last) = &mut *guard;
            if let Some(last) = last.replace(time) {
                game.advance(time - last);
            }
            game.render(surface);
        }
        hex_frame(state);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn input_value(document: &Document, id: &str) -> String {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

/// Number base converter form
#[wasm_bindgen]
pub fn start_base_converter() -> Result<(), JsValue> {
    let document = document()?;
    let button = document
        .get_element_by_id("convertBtn")
        .ok_or_else(|| js_err("missing #convertBtn"))?;
    let converter = Rc::new(RefCell::new(BaseConverter::new()));

    let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
        let Ok(document) = self::document() else { return };
        let mut converter = converter.borrow_mut();
        let _ = converter.submit(
            &input_value(&document, "numberInput"),
            &input_value(&document, "fromBaseInput"),
            &input_value(&document, "toBaseInput"),
        );
        if let Some(result) = document.get_element_by_id("result") {
            result.set_text_content(Some(&converter.result_text()));
            result.set_class_name(if converter.is_error() { "error" } else { "" });
        }
    });
    button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

async fn fetch_text(src: &str) -> Result<String, FetchError> {
    let network = |err: JsValue| match err.dyn_into::<js_sys::Error>() {
        Ok(e) => FetchError::Network {
            name: String::from(e.name()),
            message: String::from(e.message()),
        },
        Err(other) => FetchError::Network {
            name: "Error".to_owned(),
            message: format!("{:?}", other),
        },
    };
    let window = window().map_err(network)?;
    let response: Response = JsFuture::from(window.fetch_with_str(src))
        .await
        .map_err(network)?
        .dyn_into()
        .map_err(network)?;
    check_status(response.status())?;
    let text = JsFuture::from(response.text().map_err(network)?)
        .await
        .map_err(network)?;
    Ok(text.as_string().unwrap_or_default())
}

/// Fill `#code-display` with the file named by its `data-src`
pub async fn show_code() -> Result<(), JsValue> {
    let Some(block) = document()?.get_element_by_id("code-display") else {
        return Ok(());
    };
    let Some(src) = block.get_attribute("data-src") else {
        return Ok(());
    };

    let mut view = CodeView::new(src.clone());
    block.set_text_content(Some(&view.text()));
    view.finish(fetch_text(&src).await);
    block.set_text_content(Some(&view.text()));
    Ok(())
}

/// Page entry point: dispatch on `<body data-app="...">`
pub async fn run() -> Result<(), JsValue> {
    init_logging();
    let app = document()?
        .body()
        .and_then(|body| body.get_attribute("data-app"))
        .unwrap_or_default();
    let seed = js_sys::Date::now() as u64;
    log::info!("Starting {}", app);

    match app.as_str() {
        "lights-out" => start_lights_out(seed),
        "what-the-hex" => start_hex_guess(seed),
        "base-converter" => start_base_converter(),
        "code-viewer" => show_code().await,
        "" => Ok(()),
        name => {
            let settings = format!("{{ \"seed\": {} }}", seed);
            start_game(name, Some(settings)).map(|handle| {
                // Runs for the lifetime of the page
                std::mem::forget(handle);
            })
        }
    }
}
