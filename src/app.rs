//! Window and event-loop driver: owns the GPU surface, the page lifecycle,
//! input routing for the contact modal, and the per-frame composition of
//! backdrop, glass overlay and 2D page layers.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use crossbeam_channel as xchan;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::runtime::Handle;
use tracing::{info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, ModifiersState, NamedKey};
use winit::window::{Fullscreen, Window, WindowAttributes};

use crate::backdrop::Backdrop;
use crate::boundary::{Boundary, LogFallback};
use crate::config::{BackdropPreset, Configuration};
use crate::contact::{ContactForm, SubmitOutcome, Submitter};
use crate::content::Section;
use crate::error::Error;
use crate::lifecycle::{Lifecycle, RevealTracker, Scroll};
use crate::overlay::GlassOverlay;
use crate::page::{compose_scene, PageRenderer, PageView, ThemePalette};
use crate::retro_tv::RetroTv;

/// Scroll wheel line-to-page ratio.
const LINE_SCROLL_VH: f32 = 0.1;

/// Apply queued submission results: an accepted message closes the modal and
/// starts the exit sequence, a rejected one unlocks the form for another try.
fn drain_submit_outcomes(
    outcomes: &xchan::Receiver<SubmitOutcome>,
    form: &mut Option<ContactForm>,
    tv: &mut RetroTv,
    now: Instant,
) {
    while let Ok(outcome) = outcomes.try_recv() {
        match outcome {
            SubmitOutcome::Accepted => {
                info!("contact message accepted");
                if let Some(form) = form.as_mut() {
                    form.reset();
                }
                *form = None;
                tv.trigger(now);
            }
            SubmitOutcome::Rejected(err) => {
                warn!("contact message rejected: {err}");
                if let Some(form) = form.as_mut() {
                    form.set_submitting(false);
                }
            }
        }
    }
}

pub fn run(config: Configuration, runtime: Handle) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut app = KioskApp::new(config, runtime);
    event_loop.run_app(&mut app).context("event loop failed")
}

struct KioskApp {
    config: Configuration,
    runtime: Handle,
    state: Option<AppState>,
}

impl KioskApp {
    fn new(config: Configuration, runtime: Handle) -> Self {
        Self {
            config,
            runtime,
            state: None,
        }
    }
}

impl ApplicationHandler for KioskApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match AppState::new(event_loop, self.config.clone(), self.runtime.clone()) {
            Ok(state) => {
                info!(backdrop = %self.config.backdrop, "kiosk window ready");
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(err) => {
                warn!("failed to initialize window: {err:?}");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.as_mut() {
            state.advance_model(Instant::now());
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if state.window.id() != window_id {
            return;
        }
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::ModifiersChanged(modifiers) => {
                state.modifiers = modifiers.state();
            }
            WindowEvent::MouseWheel { delta, .. } => state.handle_scroll(delta),
            WindowEvent::KeyboardInput { event, .. } => {
                if state.handle_key(event) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(size) => {
                state.resize(size);
                state.window.request_redraw();
            }
            WindowEvent::ScaleFactorChanged {
                mut inner_size_writer,
                ..
            } => {
                let size = state.window.inner_size();
                let _ = inner_size_writer.request_inner_size(size);
                state.resize(size);
                state.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = state.render() {
                    match err {
                        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                            state.resize(state.window.inner_size());
                        }
                        wgpu::SurfaceError::OutOfMemory => {
                            warn!("surface out of memory; exiting");
                            event_loop.exit();
                        }
                        other => warn!("surface error: {other:?}"),
                    }
                }
            }
            _ => {}
        }
    }
}

struct AppState {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,

    config: Configuration,
    palette: ThemePalette,
    backdrop: Backdrop,
    overlay: Option<GlassOverlay>,
    page: PageRenderer,
    boundary: Boundary<LogFallback>,

    lifecycle: Lifecycle,
    reveal: RevealTracker,
    scroll: Scroll,
    tv: RetroTv,
    form: Option<ContactForm>,
    submitter: Submitter,
    outcomes: xchan::Receiver<SubmitOutcome>,

    started: Instant,
    loaded_at: Option<Instant>,
    modifiers: ModifiersState,
    rng: StdRng,
}

impl AppState {
    fn new(event_loop: &ActiveEventLoop, config: Configuration, runtime: Handle) -> Result<Self> {
        let attrs = WindowAttributes::default()
            .with_title(config.window_title.clone())
            .with_fullscreen(Some(Fullscreen::Borderless(None)));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("failed to request adapter")?;
        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("kiosk-device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::default(),
        }))
        .context("failed to request device")?;

        let capabilities = surface.get_capabilities(&adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(capabilities.formats[0]);
        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let palette = ThemePalette::from_config(&config.theme);
        let mut rng = StdRng::from_os_rng();
        let backdrop = Backdrop::new(
            &device,
            format,
            &config.theme,
            config.particle_count,
            config.backdrop == BackdropPreset::Orbs,
            surface_config.width,
            surface_config.height,
            &mut rng,
        );
        let overlay = if config.backdrop == BackdropPreset::Hexagons {
            Some(GlassOverlay::new(&device, format, &config.overlay)?)
        } else {
            None
        };
        let page = match PageRenderer::new(&device, format) {
            Ok(page) => page,
            Err(err) => return Err(err).context("failed to build page renderer"),
        };

        let now = Instant::now();
        let (submitter, outcomes) = Submitter::new(config.contact.clone(), runtime);
        Ok(Self {
            window,
            surface,
            device,
            queue,
            surface_config,
            lifecycle: Lifecycle::new(config.load_delay, now),
            config,
            palette,
            backdrop,
            overlay,
            page,
            boundary: Boundary::new(LogFallback),
            reveal: RevealTracker::new(),
            scroll: Scroll::new(),
            tv: RetroTv::new(),
            form: None,
            submitter,
            outcomes,
            started: now,
            loaded_at: None,
            modifiers: ModifiersState::default(),
            rng,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.backdrop
            .reseed(&self.queue, size.width, size.height, &mut self.rng);
    }

    /// Non-render model step, run once per event-loop turn.
    fn advance_model(&mut self, now: Instant) {
        drain_submit_outcomes(&self.outcomes, &mut self.form, &mut self.tv, now);

        if self.lifecycle.tick(now) {
            info!(
                delay = ?self.config.load_delay,
                "page mounted after loading delay"
            );
            self.loaded_at = Some(now);
        }

        if self.tv.tick(now) {
            info!("exit sequence finished");
        }
        self.scroll.set_locked(self.tv.is_active());

        if self.lifecycle.is_loaded() {
            for section in Section::ALL {
                self.reveal
                    .observe(section, self.scroll.section_in_view(section), now);
            }
        }
    }

    fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        if self.form.is_some() || self.boundary.is_tripped() {
            return;
        }
        let delta_vh = match delta {
            MouseScrollDelta::LineDelta(_, y) => -y * LINE_SCROLL_VH,
            MouseScrollDelta::PixelDelta(pos) => {
                -(pos.y as f32) / self.surface_config.height.max(1) as f32
            }
        };
        self.scroll.scroll_by(delta_vh);
    }

    /// Returns true when the app should exit.
    fn handle_key(&mut self, event: KeyEvent) -> bool {
        if event.state != ElementState::Pressed {
            return false;
        }

        if self.boundary.is_tripped() {
            match event.logical_key {
                Key::Character(ref c) if c.eq_ignore_ascii_case("r") => self.boundary.reset(),
                Key::Character(ref c) if c.eq_ignore_ascii_case("t") => self.reload(),
                _ => {}
            }
            return false;
        }

        if self.form.is_some() {
            self.handle_form_key(event);
            return false;
        }

        match event.logical_key {
            Key::Named(NamedKey::Escape) => return true,
            Key::Character(ref c) if c.eq_ignore_ascii_case("q") => return true,
            Key::Named(NamedKey::Enter) if self.lifecycle.is_loaded() && !self.tv.is_active() => {
                self.form = Some(ContactForm::new());
            }
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, event: KeyEvent) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match event.logical_key {
            Key::Named(NamedKey::Escape) => {
                if !form.is_submitting() {
                    self.form = None;
                }
            }
            Key::Named(NamedKey::Tab) => {
                if self.modifiers.shift_key() {
                    form.focus_prev();
                } else {
                    form.focus_next();
                }
            }
            Key::Named(NamedKey::Backspace) => form.backspace(),
            Key::Named(NamedKey::Enter) => {
                if form.can_submit() {
                    form.set_submitting(true);
                    self.submitter.submit(form.body(&self.config.contact));
                }
            }
            Key::Named(NamedKey::Space) => form.insert(" "),
            _ => {
                if let Some(text) = event.text.as_ref() {
                    form.insert(text.as_str());
                }
            }
        }
    }

    /// Drop and rebuild every GPU-side layer, keeping the page model.
    fn reload(&mut self) {
        self.boundary.reset();
        let format = self.surface_config.format;
        self.backdrop = Backdrop::new(
            &self.device,
            format,
            &self.config.theme,
            self.config.particle_count,
            self.config.backdrop == BackdropPreset::Orbs,
            self.surface_config.width,
            self.surface_config.height,
            &mut self.rng,
        );
        match self.config.backdrop {
            BackdropPreset::Hexagons => {
                match GlassOverlay::new(&self.device, format, &self.config.overlay) {
                    Ok(overlay) => self.overlay = Some(overlay),
                    Err(err) => {
                        self.boundary
                            .guard::<()>("rebuild overlay", Err(Error::Render(err)));
                    }
                }
            }
            _ => self.overlay = None,
        }
        match PageRenderer::new(&self.device, format) {
            Ok(page) => self.page = page,
            Err(err) => {
                self.boundary.guard::<()>("rebuild page renderer", Err(err));
            }
        }
        info!("render layers rebuilt");
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let now = Instant::now();
        let elapsed = now.duration_since(self.started).as_secs_f32();
        let width = self.surface_config.width;
        let height = self.surface_config.height;

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("kiosk-frame"),
            });

        self.backdrop.advance(&self.queue, elapsed, width, height);
        self.backdrop
            .render(&mut encoder, &view, self.palette.clear_color());

        if !self.boundary.is_tripped() {
            if let (Some(overlay), Some(loaded_at)) = (self.overlay.as_mut(), self.loaded_at) {
                let mounted = now.duration_since(loaded_at).as_secs_f32();
                overlay.advance(&self.queue, mounted, width, height);
                overlay.render(&mut encoder, &view);
            }
        }

        let reveal = if self.boundary.is_tripped() {
            [0.0; 3]
        } else {
            let mut alphas = [0.0; 3];
            for (slot, section) in alphas.iter_mut().zip(Section::ALL) {
                *slot = self
                    .reveal
                    .progress(section, now, self.config.reveal_fade);
            }
            alphas
        };
        let page_view = PageView {
            phase: self.lifecycle.phase(),
            scroll_vh: self.scroll.offset_vh(),
            reveal,
            form: self.form.as_ref(),
            tv: self.tv.phase(now),
            error: self.boundary.panel(),
        };
        let scene = compose_scene(&page_view, &self.palette, width as f32, height as f32);
        let drawn = self
            .page
            .draw(&self.device, &mut encoder, &view, width, height, &scene);
        self.boundary.guard("draw page", drawn);

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        self.page.after_submit();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_submission_closes_the_form_and_starts_the_exit() {
        let (tx, rx) = xchan::unbounded();
        let mut form = Some(ContactForm::new());
        let mut tv = RetroTv::new();
        let now = Instant::now();

        tx.send(SubmitOutcome::Accepted).unwrap();
        drain_submit_outcomes(&rx, &mut form, &mut tv, now);

        assert!(form.is_none());
        assert!(tv.is_active());
    }

    #[test]
    fn rejected_submission_keeps_the_form_open_for_another_try() {
        let (tx, rx) = xchan::unbounded();
        let mut submitting = ContactForm::new();
        submitting.insert("Alex");
        submitting.set_submitting(true);
        let mut form = Some(submitting);
        let mut tv = RetroTv::new();
        let now = Instant::now();

        tx.send(SubmitOutcome::Rejected(Error::Render(anyhow::anyhow!(
            "relay refused the message"
        ))))
        .unwrap();
        drain_submit_outcomes(&rx, &mut form, &mut tv, now);

        let form = form.expect("form stays open");
        assert!(!form.is_submitting());
        assert_eq!(form.name, "Alex");
        assert!(!tv.is_active());
    }

    #[test]
    fn empty_outcome_queue_changes_nothing() {
        let (_tx, rx) = xchan::unbounded::<SubmitOutcome>();
        let mut form = None;
        let mut tv = RetroTv::new();

        drain_submit_outcomes(&rx, &mut form, &mut tv, Instant::now());

        assert!(form.is_none());
        assert!(!tv.is_active());
    }
}
