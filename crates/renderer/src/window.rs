use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use catalog::Artwork;
use tracing::{error, info, warn};
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use crate::canvas::{CanvasCallbacks, WatercolorCanvas};
use crate::gpu::GpuState;
use crate::input::{CanvasEvent, CanvasRect};
use crate::textures::{ImageSource, PlaceholderOnlySource, RemoteImageSource};
use crate::types::RendererConfig;
use crate::viewport::DisplayMetrics;

/// Key presses forwarded to the gallery owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    Character(String),
    Escape,
}

/// What the owner wants the window to do after a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum DelegateAction {
    None,
    /// Rebuild the canvas over a new artwork list.
    ReplaceArtworks(Vec<Artwork>),
    Close,
}

/// Receives gallery events on the event-loop thread.
pub trait GalleryDelegate {
    fn capability_changed(&mut self, available: bool);
    fn artwork_selected(&mut self, artwork: &Artwork);
    fn key_pressed(&mut self, key: KeyInput) -> DelegateAction;
}

/// How the window run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowOutcome {
    Closed,
    /// No drawing context could be created; nothing was rendered.
    Unavailable,
}

/// Opens the gallery window and drives the watercolor canvas until the
/// window closes.
pub fn run_gallery<D>(
    config: RendererConfig,
    artworks: Vec<Artwork>,
    delegate: Rc<RefCell<D>>,
) -> Result<WindowOutcome>
where
    D: GalleryDelegate + 'static,
{
    // Without a display there is no drawing context either.
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            warn!(error = %err, "no display available for the gallery window");
            delegate.borrow_mut().capability_changed(false);
            return Ok(WindowOutcome::Unavailable);
        }
    };
    let (width, height) = config.surface_size;
    let window = match WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(LogicalSize::new(width.max(1), height.max(1)))
        .build(&event_loop)
    {
        Ok(window) => Arc::new(window),
        Err(err) => {
            warn!(error = %err, "failed to create gallery window");
            delegate.borrow_mut().capability_changed(false);
            return Ok(WindowOutcome::Unavailable);
        }
    };

    let source: Arc<dyn ImageSource> = if config.placeholder_only {
        Arc::new(PlaceholderOnlySource)
    } else {
        Arc::new(RemoteImageSource::new()?)
    };

    let unavailable = Rc::new(Cell::new(false));
    let callbacks = {
        let on_capability = {
            let delegate = Rc::clone(&delegate);
            let unavailable = Rc::clone(&unavailable);
            move |available: bool| {
                unavailable.set(!available);
                delegate.borrow_mut().capability_changed(available);
            }
        };
        let on_select = {
            let delegate = Rc::clone(&delegate);
            move |artwork: &Artwork| delegate.borrow_mut().artwork_selected(artwork)
        };
        CanvasCallbacks::new(on_capability, on_select)
    };

    let acquire = {
        let window = Arc::clone(&window);
        move || GpuState::new(Arc::clone(&window))
    };
    let mut canvas: WatercolorCanvas<GpuState> =
        WatercolorCanvas::new(acquire, source, callbacks);
    canvas.mount(artworks);
    if unavailable.get() {
        return Ok(WindowOutcome::Unavailable);
    }
    if canvas.take_frame_request() {
        window.request_redraw();
    }

    let lost_context = Rc::clone(&unavailable);
    let mut cursor: Option<PhysicalPosition<f64>> = None;
    let run_result = event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Wait);
        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                    canvas.unmount();
                    elwt.exit();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    cursor = Some(position);
                    let (x, y) = to_logical(&window, position);
                    canvas.handle_event(CanvasEvent::PointerMoved { x, y }, &canvas_rect(&window));
                }
                WindowEvent::CursorLeft { .. } => {
                    cursor = None;
                    canvas.handle_event(CanvasEvent::PointerLeft, &canvas_rect(&window));
                }
                WindowEvent::MouseInput {
                    state: ElementState::Released,
                    button: MouseButton::Left,
                    ..
                } => {
                    if let Some(position) = cursor {
                        let (x, y) = to_logical(&window, position);
                        canvas.handle_event(CanvasEvent::Click { x, y }, &canvas_rect(&window));
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.state != ElementState::Pressed || event.repeat {
                        return;
                    }
                    let key = match event.logical_key {
                        Key::Named(NamedKey::Escape) => KeyInput::Escape,
                        Key::Character(ref value) => KeyInput::Character(value.to_string()),
                        _ => return,
                    };
                    let action = delegate.borrow_mut().key_pressed(key);
                    match action {
                        DelegateAction::None => {}
                        DelegateAction::ReplaceArtworks(artworks) => {
                            info!(artworks = artworks.len(), "rebuilding watercolor canvas");
                            canvas.set_artworks(artworks);
                            if unavailable.get() {
                                canvas.unmount();
                                elwt.exit();
                            }
                        }
                        DelegateAction::Close => {
                            canvas.unmount();
                            elwt.exit();
                        }
                    }
                }
                WindowEvent::RedrawRequested => {
                    let display = DisplayMetrics::new(canvas_rect(&window), window.scale_factor());
                    if let Err(err) = canvas.frame(&display) {
                        match err {
                            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                                canvas.recover_surface();
                            }
                            wgpu::SurfaceError::OutOfMemory => {
                                error!("surface out of memory; closing gallery");
                                canvas.unmount();
                                elwt.exit();
                            }
                            wgpu::SurfaceError::Timeout => {
                                warn!("surface timeout; retrying next frame");
                            }
                            other => {
                                warn!(error = ?other, "surface error; retrying next frame");
                            }
                        }
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if canvas.take_frame_request() {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    });

    run_result.map_err(|err| anyhow!("window event loop error: {err}"))?;
    // A rebuild can lose the context after the initial mount succeeded.
    if lost_context.get() {
        return Ok(WindowOutcome::Unavailable);
    }
    Ok(WindowOutcome::Closed)
}

/// The canvas fills the window's client area.
fn canvas_rect(window: &Window) -> CanvasRect {
    let size: LogicalSize<f64> = window.inner_size().to_logical(window.scale_factor());
    CanvasRect::filling(size.width, size.height)
}

fn to_logical(window: &Window, position: PhysicalPosition<f64>) -> (f64, f64) {
    let logical = position.to_logical::<f64>(window.scale_factor());
    (logical.x, logical.y)
}
