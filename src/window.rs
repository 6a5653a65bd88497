//! winit host: mounts the backdrop in a window and drives it per redraw.

use std::sync::Arc;

use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::config::BackdropConfig;
use crate::cursor::{Cursor, CursorVariant};
use crate::engine::ParticleEngine;
use crate::error::RunError;
use crate::gpu::GpuState;
use crate::layout::OrbField;
use crate::surface::DrawList;
use crate::time::FrameClock;

/// How often the fps readout in the title is refreshed, in frames.
const TITLE_INTERVAL: u64 = 30;

pub(crate) struct App {
    config: BackdropConfig,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    engine: Option<ParticleEngine>,
    orbs: OrbField,
    cursor: Cursor,
    clock: FrameClock,
    draw_list: DrawList,
    error: Option<RunError>,
}

impl App {
    pub(crate) fn new(config: BackdropConfig) -> Self {
        let orbs = OrbField::new(config.skills.clone(), config.placement);
        Self {
            config,
            window: None,
            gpu_state: None,
            engine: None,
            orbs,
            cursor: Cursor::new(),
            clock: FrameClock::new(),
            draw_list: DrawList::default(),
            error: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub(crate) fn take_error(&mut self) -> Option<RunError> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: RunError) {
        log::error!("{error}");
        self.error = Some(error);
        self.unmount();
        event_loop.exit();
    }

    fn mount(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RunError> {
        let window_config = &self.config.window;
        let window_attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(window_config.width, window_config.height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        if self.config.window.cursor {
            window.set_cursor_visible(false);
        }

        let gpu_state = pollster::block_on(GpuState::new(
            window.clone(),
            self.config.engine.visuals.background,
        ))?;

        let size = gpu_state.size();
        let (width, height) = (size.width as f32, size.height as f32);
        self.engine = Some(ParticleEngine::with_config(width, height, &self.config.engine));
        self.orbs.mount(width, height);
        self.draw_list.resize(width, height);
        self.clock = FrameClock::new();

        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    fn unmount(&mut self) {
        if let Some(engine) = &mut self.engine {
            engine.teardown();
        }
    }

    fn is_running(&self) -> bool {
        self.engine.as_ref().is_some_and(ParticleEngine::is_running)
    }

    fn pointer_moved(&mut self, position: Vec2) {
        self.cursor.move_to(position);
        let variant = match self.orbs.hover_at(Some(position)) {
            Some(_) => CursorVariant::Button,
            None => CursorVariant::Default,
        };
        if variant != self.cursor.variant() {
            self.cursor.set_variant(variant);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.clock.tick();

        self.draw_list.clear();
        if let Some(engine) = &mut self.engine {
            if self.clock.is_paused() {
                engine.render(&mut self.draw_list);
            } else {
                engine.frame(&mut self.draw_list);
            }
        }
        self.orbs.update(dt);
        self.orbs.render(&mut self.draw_list);
        if self.config.window.cursor {
            self.cursor.update(dt);
            self.cursor.render(&mut self.draw_list);
        }

        if let Some(gpu_state) = &mut self.gpu_state {
            match gpu_state.render(&self.draw_list) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu_state.reconfigure(),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory, closing");
                    self.unmount();
                    event_loop.exit();
                    return;
                }
                Err(e) => log::warn!("render error: {e:?}"),
            }
        }

        if let Some(window) = &self.window {
            if self.clock.frame() % TITLE_INTERVAL == 0 {
                let hovered = self
                    .orbs
                    .hovered()
                    .map(|s| format!(" - {} {}%", s.name, s.level))
                    .unwrap_or_default();
                window.set_title(&format!(
                    "{} - {:.0} fps{}",
                    self.config.window.title,
                    self.clock.fps(),
                    hovered
                ));
            }
            if self.is_running() {
                window.request_redraw();
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.mount(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.unmount();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
                let (width, height) = (physical_size.width as f32, physical_size.height as f32);
                if let Some(engine) = &mut self.engine {
                    engine.resize(width, height);
                }
                // Only places the orbs if the window started out empty.
                self.orbs.mount(width, height);
                self.draw_list.resize(width, height);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor.hide();
                self.orbs.hover_at(None);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match logical_key {
                Key::Named(NamedKey::Escape) => {
                    self.unmount();
                    event_loop.exit();
                }
                Key::Named(NamedKey::Space) => {
                    self.clock.toggle_pause();
                    log::info!("animation {}", if self.clock.is_paused() { "paused" } else { "resumed" });
                }
                _ => {}
            },
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
