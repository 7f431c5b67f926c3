//! Brake Sim entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlButtonElement, HtmlCanvasElement, HtmlElement};

    use brake_sim::consts::SIM_DT;
    use brake_sim::renderer::{RenderState, TextItem, text_items};
    use brake_sim::sim::SimCommand;
    use brake_sim::{FrameDriver, LabelKey, Labels, Settings, SimConfig, ViewConfig};

    /// App instance holding all state
    struct App {
        driver: FrameDriver,
        render_state: Option<RenderState>,
        labels: Labels,
        canvas: HtmlCanvasElement,
        /// Absolutely positioned container laid over the canvas
        overlay: Option<HtmlElement>,
        text_nodes: Vec<HtmlElement>,
        last_time: f64,
        /// Fallback surface size (CSS pixels)
        default_size: (f32, f32),
    }

    impl App {
        /// Surface size in CSS pixels
        fn css_size(&self) -> (f32, f32) {
            let w = self.canvas.client_width();
            let h = self.canvas.client_height();
            if w > 0 && h > 0 {
                (w as f32, h as f32)
            } else {
                self.default_size
            }
        }

        /// Keep the canvas backing store in sync with its CSS size
        fn sync_surface_size(&mut self, css: (f32, f32)) {
            let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
            let width = (css.0 as f64 * dpr) as u32;
            let height = (css.1 as f64 * dpr) as u32;
            if let Some(ref mut render_state) = self.render_state {
                if render_state.size != (width, height) {
                    self.canvas.set_width(width);
                    self.canvas.set_height(height);
                    render_state.resize(width, height);
                    log::info!("Surface resized to {}x{}", width, height);
                }
            }
        }

        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time) / 1000.0
            } else {
                SIM_DT
            };
            self.last_time = time;

            self.driver.update(dt);

            let css = self.css_size();
            self.sync_surface_size(css);
            let list = self.driver.render(css.0, css.1);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&list) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }

            let items = text_items(&list, &self.labels);
            self.update_overlay(&items);
            self.update_controls();
        }

        /// Sync the overlay spans with this frame's text
        fn update_overlay(&mut self, items: &[TextItem]) {
            let Some(ref overlay) = self.overlay else {
                return;
            };
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            while self.text_nodes.len() < items.len() {
                let Some(node) = document
                    .create_element("span")
                    .ok()
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                else {
                    return;
                };
                let _ = node.style().set_property("position", "absolute");
                let _ = node.style().set_property("white-space", "nowrap");
                let _ = overlay.append_child(&node);
                self.text_nodes.push(node);
            }

            for (i, node) in self.text_nodes.iter().enumerate() {
                match items.get(i) {
                    Some(item) => {
                        let style = node.style();
                        let _ = style.set_property("display", "block");
                        let _ = style.set_property("left", &format!("{}px", item.pos.x));
                        // Items are baseline-anchored
                        let _ = style.set_property("top", &format!("{}px", item.pos.y - item.size));
                        let _ = style.set_property("font-size", &format!("{}px", item.size));
                        let _ = style.set_property("color", &item.css_color());
                        if node.text_content().as_deref() != Some(item.text.as_str()) {
                            node.set_text_content(Some(&item.text));
                        }
                    }
                    None => {
                        let _ = node.style().set_property("display", "none");
                    }
                }
            }
        }

        /// Show, hide and disable the buttons for the current phase
        fn update_controls(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let controls = self.driver.controls();

            set_visible(&document, "start-btn", controls.start_visible);
            set_visible(&document, "brake-btn", controls.brake_visible);
            set_visible(&document, "restart-btn", controls.restart_visible);

            if let Some(btn) = document
                .get_element_by_id("brake-btn")
                .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
            {
                btn.set_disabled(!controls.brake_enabled);
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Read a JSON config block embedded in the page, if any
    fn embedded_json(document: &Document, id: &str) -> Option<String> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.text_content())
            .filter(|text| !text.trim().is_empty())
    }

    fn load_sim_config(document: &Document) -> SimConfig {
        match embedded_json(document, "sim-config").map(|json| SimConfig::from_json(&json)) {
            Some(Ok(config)) => {
                log::info!("Using page config: {:?}", config);
                config
            }
            Some(Err(e)) => {
                log::warn!("Invalid page config ({}), using defaults", e);
                SimConfig::default()
            }
            None => SimConfig::default(),
        }
    }

    fn load_view_config(document: &Document) -> ViewConfig {
        match embedded_json(document, "view-config").map(|json| ViewConfig::from_json(&json)) {
            Some(Ok(view)) => view,
            Some(Err(e)) => {
                log::warn!("Invalid view config ({}), using defaults", e);
                ViewConfig::default()
            }
            None => ViewConfig::default(),
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Brake Sim starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let mut settings = Settings::load();
        let query = window.location().search().unwrap_or_default();
        if settings.apply_query(&query) {
            settings.save();
        }
        let route = window.location().pathname().unwrap_or_default();
        let locale = settings.effective_locale(&route);
        let labels = Labels::for_locale(locale);
        if let Some(root) = document.document_element() {
            let _ = root.set_attribute("lang", locale.as_tag());
        }
        log::info!("Locale: {} (route {:?})", locale.as_tag(), route);

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let config = load_sim_config(&document);
        let view = load_view_config(&document);
        let default_size = (view.default_width as f32, view.default_height as f32);

        let dpr = window.device_pixel_ratio();
        let client_w = match canvas.client_width() {
            0 => view.default_width as i32,
            w => w,
        };
        let client_h = match canvas.client_height() {
            0 => view.default_height as i32,
            h => h,
        };
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let overlay = document
            .get_element_by_id("overlay")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());

        let driver =
            FrameDriver::new(config, view, settings.camera).with_step_mode(settings.step_mode);
        let app = Rc::new(RefCell::new(App {
            driver,
            render_state: None,
            labels,
            canvas: canvas.clone(),
            overlay,
            text_nodes: Vec::new(),
            last_time: 0.0,
            default_size,
        }));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await;
        app.borrow_mut().render_state = Some(render_state);

        setup_buttons(&document, &labels, app.clone());

        request_animation_frame(app);

        log::info!("Brake Sim running!");
    }

    fn setup_buttons(document: &Document, labels: &Labels, app: Rc<RefCell<App>>) {
        let buttons = [
            ("start-btn", LabelKey::StartButton, SimCommand::Start),
            ("brake-btn", LabelKey::BrakeButton, SimCommand::Brake),
            ("restart-btn", LabelKey::RestartButton, SimCommand::Restart),
        ];

        for (id, key, command) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing button #{}", id);
                continue;
            };
            btn.set_text_content(Some(labels.get(key)));

            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().driver.queue(command);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use brake_sim::{Locale, Settings};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let locale = args
        .next()
        .and_then(|tag| Locale::from_tag(&tag))
        .unwrap_or_default();
    let brake_after: f64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .filter(|secs: &f64| secs.is_finite() && *secs >= 0.0)
        .unwrap_or(2.0);

    // Optional preferences in query form, e.g. `camera=follow&step=variable`
    let mut settings = Settings::load();
    if let Some(query) = args.next() {
        if settings.apply_query(&query) {
            settings.save();
        }
    }

    log::info!("Brake Sim (native) starting...");
    log::info!("Headless run: locale {}, brake after {:.2} s", locale.as_tag(), brake_after);
    log::info!("Browser version: build for wasm32 and serve the page with `trunk serve`");

    run_headless(&settings, locale, brake_after);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive a full run without a display and print the readout once per
/// simulated second
#[cfg(not(target_arch = "wasm32"))]
fn run_headless(settings: &brake_sim::Settings, locale: brake_sim::Locale, brake_after: f64) {
    use brake_sim::consts::SIM_DT;
    use brake_sim::renderer::text_items;
    use brake_sim::sim::{Phase, SimCommand};
    use brake_sim::{FrameDriver, Labels, SimConfig, ViewConfig};

    let labels = Labels::for_locale(locale);
    let mut driver = FrameDriver::new(SimConfig::default(), ViewConfig::default(), settings.camera)
        .with_step_mode(settings.step_mode);
    let (width, height) = {
        let view = driver.projector().view();
        (view.default_width as f32, view.default_height as f32)
    };
    let ticks_per_second = (1.0 / SIM_DT).round() as u64;
    let brake_frame = (brake_after / SIM_DT).round() as u64;

    driver.queue(SimCommand::Start);
    let mut frame: u64 = 0;
    loop {
        if frame == brake_frame {
            driver.queue(SimCommand::Brake);
        }
        driver.update(SIM_DT);
        frame += 1;

        let stopped = driver.state().phase == Phase::Stopped;
        if frame % ticks_per_second == 0 || stopped {
            let list = driver.render(width, height);
            let lines: Vec<String> = text_items(&list, &labels)
                .into_iter()
                .map(|item| item.text)
                .collect();
            println!("t={:>6.2}s  {}", frame as f64 * SIM_DT, lines.join(" | "));
        }
        if stopped {
            break;
        }
    }
}
