//! Clean the Park entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::{Rc, Weak};

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        AddEventListenerOptions, Document, Element, Event, HtmlElement, MouseEvent, TouchEvent,
    };

    use clean_the_park::audio::AudioManager;
    use clean_the_park::consts::SIM_DT;
    use clean_the_park::sim::{
        Entity, EntityId, FrameScheduler, GameEvent, GamePhase, GameState, PawId, PointerEvent,
        PointerId, Rect,
    };
    use clean_the_park::{GameConfig, Hud, Settings};

    /// Window events listened to only while a drag is live
    const GESTURE_EVENTS: [&str; 6] = [
        "mouseup",
        "pointerup",
        "pointercancel",
        "touchend",
        "touchcancel",
        "touchmove",
    ];

    /// Events on a trash element that can begin a drag
    const PRESS_EVENTS: [&str; 3] = ["pointerdown", "mousedown", "touchstart"];

    /// Page elements the game writes to
    struct Dom {
        document: Document,
        play_area: HtmlElement,
        bin: Element,
        message: Option<HtmlElement>,
        level: Option<Element>,
        recycled: Option<Element>,
    }

    /// A trash element and the press listeners bound to it
    struct ItemView {
        el: HtmlElement,
        _listeners: Vec<Closure<dyn FnMut(Event)>>,
    }

    /// Game instance holding all state
    struct App {
        state: GameState,
        scheduler: FrameScheduler,
        hud: Hud,
        audio: AudioManager,
        dom: Dom,
        items: HashMap<EntityId, ItemView>,
        paws: HashMap<PawId, HtmlElement>,
        /// Shared callback for every gesture event
        gesture: Option<js_sys::Function>,
        gesture_attached: bool,
        last_time: f64,
        this: Weak<RefCell<App>>,
    }

    impl App {
        /// Convert a client position to play-area coordinates
        fn to_local(&self, client: Vec2) -> Vec2 {
            let rect = self.dom.play_area.get_bounding_client_rect();
            client - Vec2::new(rect.left() as f32, rect.top() as f32)
        }

        /// Push the live play area, bin and viewport into the simulation
        fn refresh_layout(&mut self) {
            let area = self.dom.play_area.get_bounding_client_rect();
            let origin = Vec2::new(area.left() as f32, area.top() as f32);
            let bin = self.dom.bin.get_bounding_client_rect();
            let bin = Rect::from_origin_size(
                bin.left() as f32,
                bin.top() as f32,
                bin.width() as f32,
                bin.height() as f32,
            )
            .relative_to(origin);
            let viewport_width = web_sys::window()
                .and_then(|w| w.inner_width().ok())
                .and_then(|v| v.as_f64())
                .unwrap_or(area.width()) as f32;
            self.state.set_layout(
                Vec2::new(area.width() as f32, area.height() as f32),
                bin,
                viewport_width,
            );
        }

        /// First tap anywhere: start the run and the audio
        fn begin(&mut self) {
            if self.state.phase != GamePhase::Waiting {
                return;
            }
            self.refresh_layout();
            self.state.start();
            self.process_events();
        }

        fn process_events(&mut self) {
            let now = self.state.time_ticks;
            for event in self.state.drain_events() {
                self.hud.observe(&event, now);
                match event {
                    GameEvent::Started => {
                        self.audio.resume();
                        self.audio.start_ambient();
                    }
                    GameEvent::DragStarted(_) => self.set_gesture_listeners(true),
                    GameEvent::DragEnded(_) => self.set_gesture_listeners(false),
                    GameEvent::Caught(_) => self.audio.play_catch(),
                    GameEvent::Completed => log::info!("All levels cleared"),
                    _ => {}
                }
            }
        }

        fn set_gesture_listeners(&mut self, on: bool) {
            if self.gesture_attached == on {
                return;
            }
            let Some(window) = web_sys::window() else { return };
            let Some(callback) = &self.gesture else { return };
            for name in GESTURE_EVENTS {
                if on {
                    let options = AddEventListenerOptions::new();
                    options.set_passive(false);
                    let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
                        name, callback, &options,
                    );
                } else {
                    let _ = window.remove_event_listener_with_callback(name, callback);
                }
            }
            self.gesture_attached = on;
        }

        /// Run simulation ticks
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            self.refresh_layout();
            self.scheduler.advance(&mut self.state, dt);
            self.process_events();
        }

        /// Mirror the simulation into the DOM
        fn render(&mut self) {
            self.sync_items();
            self.sync_paws();

            let _ = self
                .dom
                .bin
                .class_list()
                .toggle_with_force("pop", self.state.bin_popping);
            self.update_hud();
        }

        fn sync_items(&mut self) {
            let entities = &self.state.entities;
            self.items.retain(|id, view| {
                let alive = entities.contains(*id);
                if !alive {
                    view.el.remove();
                }
                alive
            });

            let viewport_width = self.state.viewport_width;
            for entity in self.state.entities.iter() {
                if !self.items.contains_key(&entity.id) {
                    match self.create_item(entity) {
                        Some(view) => {
                            self.items.insert(entity.id, view);
                        }
                        None => continue,
                    }
                }
                let Some(view) = self.items.get(&entity.id) else { continue };

                let width = entity.width(viewport_width);
                let corner = entity.pos - Vec2::splat(width / 2.0);
                let style = view.el.style();
                let _ = style.set_property("left", &format!("{}px", corner.x));
                let _ = style.set_property("top", &format!("{}px", corner.y));
                let _ = style.set_property("width", &format!("{width}px"));
                let _ = style.set_property("height", &format!("{width}px"));
                let _ = style.set_property("font-size", &format!("{}vw", entity.size_vw));

                let classes = view.el.class_list();
                let _ = classes.toggle_with_force("wiggle", entity.wiggle);
                let _ = classes.toggle_with_force("dragging", entity.held);
                let _ = classes.toggle_with_force("settle", entity.settling_ticks > 0);
            }
        }

        fn create_item(&self, entity: &Entity) -> Option<ItemView> {
            let el: HtmlElement = self
                .dom
                .document
                .create_element("div")
                .ok()?
                .dyn_into()
                .ok()?;
            el.set_class_name("trash");
            el.set_id(&entity.id.to_string());
            el.set_text_content(Some(&entity.glyph));
            let _ = el.set_attribute("role", "button");
            let _ = el.style().set_property("touch-action", "none");

            let mut listeners = Vec::with_capacity(PRESS_EVENTS.len());
            for name in PRESS_EVENTS {
                let this = self.this.clone();
                let id = entity.id;
                let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
                    // No native drag, text selection or scrolling
                    event.prevent_default();
                    if let Some((pointer, client)) = sample(&event) {
                        dispatch(&this, |app| {
                            PointerEvent::start(pointer, app.to_local(client), id)
                        });
                    }
                });
                let options = AddEventListenerOptions::new();
                options.set_passive(false);
                let _ = el.add_event_listener_with_callback_and_add_event_listener_options(
                    name,
                    closure.as_ref().unchecked_ref(),
                    &options,
                );
                listeners.push(closure);
            }

            self.dom.play_area.append_child(&el).ok()?;
            Some(ItemView {
                el,
                _listeners: listeners,
            })
        }

        fn sync_paws(&mut self) {
            let paws = &self.state.paws;
            self.paws.retain(|id, el| {
                let alive = paws.iter().any(|p| p.id == *id);
                if !alive {
                    el.remove();
                }
                alive
            });

            for paw in &self.state.paws {
                if self.paws.contains_key(&paw.id) {
                    continue;
                }
                let Some(el) = self
                    .dom
                    .document
                    .create_element("div")
                    .ok()
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                else {
                    continue;
                };
                el.set_class_name("paw");
                el.set_text_content(Some("🐾"));
                let style = el.style();
                let _ = style.set_property("left", &format!("{}px", paw.pos.x));
                let _ = style.set_property("top", &format!("{}px", paw.pos.y));
                if self.dom.play_area.append_child(&el).is_ok() {
                    self.paws.insert(paw.id, el);
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let progression = &self.state.progression;
            let now = self.state.time_ticks;

            if let Some(el) = &self.dom.level {
                el.set_text_content(Some(&Hud::level_text(progression)));
            }
            if let Some(el) = &self.dom.recycled {
                el.set_text_content(Some(&Hud::recycled_text(progression)));
            }
            if let Some(el) = &self.dom.message {
                let text = self.hud.status_text(progression, now);
                if el.text_content().as_deref() != Some(text.as_str()) {
                    el.set_text_content(Some(&text));
                }
                let _ = el
                    .style()
                    .set_property("opacity", &self.hud.status_opacity(now).to_string());
            }
        }
    }

    /// Pointer identity and client position carried by a DOM event
    fn sample(event: &Event) -> Option<(PointerId, Vec2)> {
        let kind = event.type_();
        if kind.starts_with("pointer") {
            let e: &web_sys::PointerEvent = event.unchecked_ref();
            let pos = Vec2::new(e.client_x() as f32, e.client_y() as f32);
            Some((PointerId::Pointer(e.pointer_id()), pos))
        } else if kind.starts_with("touch") {
            let e: &TouchEvent = event.unchecked_ref();
            let touch = e.changed_touches().get(0)?;
            let pos = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
            Some((PointerId::Touch(touch.identifier()), pos))
        } else {
            let e = event.dyn_ref::<MouseEvent>()?;
            let pos = Vec2::new(e.client_x() as f32, e.client_y() as f32);
            Some((PointerId::Mouse, pos))
        }
    }

    /// Feed one pointer event to the game and react to what it caused
    fn dispatch(this: &Weak<RefCell<App>>, build: impl FnOnce(&App) -> PointerEvent) {
        let Some(app) = this.upgrade() else { return };
        let Ok(mut app) = app.try_borrow_mut() else {
            log::debug!("Input dropped, game busy");
            return;
        };
        app.refresh_layout();
        let event = build(&app);
        app.state.handle_pointer(&event);
        app.process_events();
    }

    /// Text of an optional `<script type="application/json">` block
    fn json_script(document: &Document, id: &str) -> Option<String> {
        document.get_element_by_id(id).and_then(|el| el.text_content())
    }

    /// Gameplay override from `<script id="game-config">`
    fn load_config(document: &Document) -> GameConfig {
        let Some(json) = json_script(document, "game-config") else {
            return GameConfig::default();
        };
        match GameConfig::from_json(&json) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Rejected game config, using defaults: {e}");
                GameConfig::default()
            }
        }
    }

    /// Volume and mute preferences from `<script id="audio-settings">`
    fn load_settings(document: &Document) -> Settings {
        let Some(json) = json_script(document, "audio-settings") else {
            return Settings::default();
        };
        match Settings::from_json(&json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Rejected audio settings, using defaults: {e}");
                Settings::default()
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Clean the Park starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let play_area: HtmlElement = document
            .get_element_by_id("play-area")
            .expect("no play area")
            .dyn_into()
            .expect("play area is not an HTML element");
        let bin = document.get_element_by_id("bin").expect("no bin");
        let dom = Dom {
            message: document
                .get_element_by_id("message")
                .and_then(|el| el.dyn_into().ok()),
            level: document.get_element_by_id("level"),
            recycled: document.get_element_by_id("recycled"),
            play_area,
            bin,
            document: document.clone(),
        };

        let seed = js_sys::Date::now() as u64;
        let config = load_config(&document);
        let app = Rc::new(RefCell::new(App {
            state: GameState::new(seed, config),
            scheduler: FrameScheduler::new(),
            hud: Hud::new(),
            audio: AudioManager::new(load_settings(&document)),
            dom,
            items: HashMap::new(),
            paws: HashMap::new(),
            gesture: None,
            gesture_attached: false,
            last_time: 0.0,
            this: Weak::new(),
        }));
        {
            let mut a = app.borrow_mut();
            a.this = Rc::downgrade(&app);
            a.refresh_layout();
            a.process_events();
        }

        log::info!("Game initialized with seed: {}", seed);

        setup_gesture_callback(&app);
        setup_input_handlers(&app);
        setup_mute_button(&app, &document);
        setup_page_hide(&app);

        // Start game loop
        request_animation_frame(app);

        log::info!("Clean the Park running!");
    }

    /// Build the shared end/cancel handler; attached per drag
    fn setup_gesture_callback(app: &Rc<RefCell<App>>) {
        let this = Rc::downgrade(app);
        let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
            let kind = event.type_();
            if kind == "touchmove" {
                // Moves arrive through the window listeners; this one only blocks scrolling
                event.prevent_default();
                return;
            }
            let cancelled = kind.ends_with("cancel");
            if let Some((pointer, client)) = sample(&event) {
                dispatch(&this, |app| {
                    if cancelled {
                        PointerEvent::cancel(pointer)
                    } else {
                        PointerEvent::end(pointer, Some(app.to_local(client)))
                    }
                });
            }
        });
        let callback: &js_sys::Function = closure.as_ref().unchecked_ref();
        app.borrow_mut().gesture = Some(callback.clone());
        closure.forget();
    }

    fn setup_input_handlers(app: &Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };

        // Moves anywhere feed the pointer tracker and any live drag
        for name in ["pointermove", "mousemove", "touchmove"] {
            let this = Rc::downgrade(app);
            let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
                if let Some((pointer, client)) = sample(&event) {
                    dispatch(&this, |app| PointerEvent::moved(pointer, app.to_local(client)));
                }
            });
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // First tap or click anywhere starts the game
        for name in ["pointerdown", "mousedown", "touchstart"] {
            let this = Rc::downgrade(app);
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                let Some(app) = this.upgrade() else { return };
                if let Ok(mut app) = app.try_borrow_mut() {
                    app.begin();
                }
            });
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_mute_button(app: &Rc<RefCell<App>>, document: &Document) {
        let Some(btn) = document.get_element_by_id("muteBtn") else {
            return;
        };
        let (icon, muted) = {
            let settings = app.borrow().audio.settings().clone();
            (settings.mute_icon(), settings.muted)
        };
        btn.set_text_content(Some(icon));
        let _ = btn.set_attribute("aria-pressed", if muted { "true" } else { "false" });

        let game = app.clone();
        let btn_clone = btn.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let mut g = game.borrow_mut();
            let muted = g.audio.toggle_mute();
            btn_clone.set_text_content(Some(g.audio.settings().mute_icon()));
            let _ = btn_clone.set_attribute("aria-pressed", if muted { "true" } else { "false" });
            log::info!("Muted: {}", muted);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Stop the loop when the page goes away
    fn setup_page_hide(app: &Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let handle = app.borrow().scheduler.handle();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
            handle.stop();
            log::info!("Page hidden, loop stopped");
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let running = {
            let mut a = app.borrow_mut();
            a.update(time);
            a.render();
            a.scheduler.handle().is_running()
        };

        if running {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Clean the Park (native) starting...");
    log::info!("The playable game is the web build - run with `trunk serve`");

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(&path),
        None => clean_the_park::GameConfig::default(),
    };
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    autoplay(seed, config);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config(path: &str) -> clean_the_park::GameConfig {
    use clean_the_park::GameConfig;

    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Could not read {path}: {e}, using defaults");
            return GameConfig::default();
        }
    };
    match GameConfig::from_json(&json) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Rejected game config, using defaults: {e}");
            GameConfig::default()
        }
    }
}

/// Headless run: a bot drags one item per half second into the bin
#[cfg(not(target_arch = "wasm32"))]
fn autoplay(seed: u64, config: clean_the_park::GameConfig) -> clean_the_park::sim::GameState {
    use clean_the_park::Hud;
    use clean_the_park::sim::{GameEvent, GamePhase, GameState, PointerEvent, PointerId, tick};

    const TICKS_PER_CATCH: u32 = 30;
    const MAX_TICKS: u64 = 60 * 60 * 10;

    let mut state = GameState::new(seed, config);
    let mut hud = Hud::new();
    state.start();

    while state.phase != GamePhase::Complete && state.time_ticks < MAX_TICKS {
        for _ in 0..TICKS_PER_CATCH {
            tick(&mut state);
        }

        let target = state.bin.center();
        let next = state
            .entities
            .iter()
            .find(|e| !e.held)
            .map(|e| (e.id, e.pos));
        if let Some((id, pos)) = next {
            state.handle_pointer(&PointerEvent::start(PointerId::Mouse, pos, id));
            state.handle_pointer(&PointerEvent::moved(PointerId::Mouse, target));
            state.handle_pointer(&PointerEvent::end(PointerId::Mouse, Some(target)));
        }

        let now = state.time_ticks;
        for event in state.drain_events() {
            hud.observe(&event, now);
            match event {
                GameEvent::PawShuffled { moved, .. } => {
                    log::info!("Paw shuffled {} items", moved.len());
                }
                GameEvent::Status { text, .. } => log::info!("{text}"),
                _ => {}
            }
        }
    }

    println!(
        "{}  {}  ({} ticks, seed {})",
        Hud::level_text(&state.progression),
        Hud::recycled_text(&state.progression),
        state.time_ticks,
        seed
    );
    println!("{}", hud.status_text(&state.progression, state.time_ticks));
    state
}
