//! Flappy Canvas entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

    use flappy_canvas::audio::web::WebMedia;
    use flappy_canvas::renderer::RenderSurface;
    use flappy_canvas::renderer::canvas::CanvasSurface;
    use flappy_canvas::sim::{AvatarSkin, GamePhase};
    use flappy_canvas::{Driver, FrameRequest, InputEvent, InputOutcome, Settings};

    const CANVAS_ID: &str = "game";
    const MENU_ID: &str = "menu";
    const BACKGROUND_IMAGE: &str = "cute.png";

    /// Game instance holding all state
    struct Game {
        driver: Driver<WebMedia>,
        surface: CanvasSurface,
        settings: Settings,
        /// A requestAnimationFrame callback is pending
        frame_scheduled: bool,
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Flappy Canvas starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or("no #game canvas")?
            .dyn_into()?;

        let mut surface = CanvasSurface::new(canvas.clone())?;
        surface.resize_to_window();
        surface.preload(BACKGROUND_IMAGE);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let viewport = surface.viewport();
        let driver = Driver::new(
            seed,
            settings.tuning.clone(),
            viewport,
            WebMedia::new(&settings),
        )
        .with_background(BACKGROUND_IMAGE);
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            driver,
            surface,
            settings,
            frame_scheduled: false,
        }));

        set_display(&document, CANVAS_ID, "none");
        set_display(&document, MENU_ID, "block");

        setup_resize_handler(game.clone());
        setup_skin_menu(&document, game.clone())?;
        setup_input_handlers(&document, &canvas, game);

        log::info!("Flappy Canvas running!");
        Ok(())
    }

    fn set_display(document: &Document, id: &str, display: &str) {
        match document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            Some(el) => {
                let _ = el.style().set_property("display", display);
            }
            None => log::warn!("Missing #{} element", id),
        }
    }

    fn setup_resize_handler(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow().surface.resize_to_window();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Every `[data-skin]` element in the menu starts a round with that image
    fn setup_skin_menu(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let options = document.query_selector_all("[data-skin]")?;
        if options.length() == 0 {
            log::warn!("No [data-skin] options in the menu");
        }

        for i in 0..options.length() {
            let Some(option) = options
                .item(i)
                .and_then(|node| node.dyn_into::<web_sys::Element>().ok())
            else {
                continue;
            };
            let Some(skin) = option.get_attribute("data-skin") else {
                continue;
            };

            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                // Keep the menu click from also counting as a flap
                event.stop_propagation();
                start_round(&game, &skin);
            });
            option.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn start_round(game: &Rc<RefCell<Game>>, skin: &str) {
        {
            let mut g = game.borrow_mut();
            g.surface.preload(skin);
            let viewport = g.surface.viewport();
            if !g.driver.start(AvatarSkin::new(skin), viewport) {
                return;
            }
        }

        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            set_display(&document, MENU_ID, "none");
            set_display(&document, CANVAS_ID, "block");
        }
        request_animation_frame(game.clone());
    }

    /// Installed once; the driver ignores events that do not fit the phase
    fn setup_input_handlers(
        document: &Document,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) {
        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if event.code() == "Space" {
                    event.prevent_default();
                    let viewport = g.surface.viewport();
                    g.driver.handle_input(InputEvent::Flap, viewport);
                } else if matches!(event.key().as_str(), "i" | "I") {
                    g.driver.toggle_idle_mode();
                } else if matches!(event.key().as_str(), "m" | "M") {
                    let muted = g.settings.toggle_mute();
                    log::info!("Muted: {}", muted);
                    g.settings.save();
                    let Game {
                        driver, settings, ..
                    } = &mut *g;
                    driver.media_mut().apply_settings(settings);
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click anywhere - flap while playing
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let viewport = g.surface.viewport();
                g.driver.handle_input(InputEvent::Flap, viewport);
            });
            let _ = document
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click on the canvas - restart button after game over
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let x = (event.client_x() as f64 - rect.left()) as f32;
                let y = (event.client_y() as f64 - rect.top()) as f32;

                let outcome = {
                    let mut g = game.borrow_mut();
                    if g.driver.phase() != GamePhase::GameOver {
                        return;
                    }
                    let viewport = g.surface.viewport();
                    g.driver.handle_input(InputEvent::Activate { x, y }, viewport)
                };

                if outcome == InputOutcome::ReturnedToMenu {
                    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                        set_display(&document, CANVAS_ID, "none");
                        set_display(&document, MENU_ID, "block");
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.frame_scheduled {
                return;
            }
            g.frame_scheduled = true;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let request = {
            let mut g = game.borrow_mut();
            g.frame_scheduled = false;
            let Game {
                driver, surface, ..
            } = &mut *g;
            driver.frame(surface)
        };

        if request == FrameRequest::Continue {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flappy_canvas::audio::SilentMedia;
    use flappy_canvas::renderer::{DisplayList, DrawCommand, Snapshot};
    use flappy_canvas::sim::{AvatarSkin, Viewport};
    use flappy_canvas::{Driver, FrameRequest, Settings};
    use serde::Serialize;

    /// Frames in the headless demo (one minute at 60 Hz)
    const DEMO_FRAMES: u32 = 3600;

    /// Final state plus the draw calls of the last frame
    #[derive(Serialize)]
    struct DemoDump<'a> {
        snapshot: Snapshot,
        last_frame: &'a [DrawCommand],
    }

    env_logger::init();
    log::info!("Flappy Canvas (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - build for wasm32 to play");

    let settings = Settings::load();
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0x5eed);
    let viewport = Viewport::new(800.0, 600.0);

    let mut surface = DisplayList::new(viewport);
    let mut driver = Driver::new(seed, settings.tuning, viewport, SilentMedia);
    driver.set_idle_mode(true);
    if !driver.start(AvatarSkin::new("player1.png"), viewport) {
        log::warn!("Demo round did not start");
        return;
    }

    let mut frames = 0;
    let mut last_frame = Vec::new();
    while frames < DEMO_FRAMES {
        frames += 1;
        let request = driver.frame(&mut surface);
        last_frame = surface.take();
        if request == FrameRequest::Halt {
            break;
        }
    }

    log::info!(
        "Seed {}: {} frames, score {}, phase {:?}",
        seed,
        frames,
        driver.state().score,
        driver.phase()
    );

    let dump = DemoDump {
        snapshot: driver.snapshot(),
        last_frame: &last_frame,
    };
    match serde_json::to_string_pretty(&dump) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize final frame: {}", e),
    }
}
