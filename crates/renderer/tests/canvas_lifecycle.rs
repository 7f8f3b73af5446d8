use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use catalog::{Artwork, ArtworkCategory};
use crossbeam_channel::{unbounded, Receiver, Sender};
use renderer::{
    CanvasCallbacks, CanvasEvent, CanvasRect, DecodedImage, DisplayMetrics, FixedTimeSource,
    FrameStatus, ImageSource, ProgramError, RenderBackend, SetupError, ShaderStageKind,
    WatercolorCanvas, WatercolorUniforms, TEXTURE_SLOT_CAPACITY,
};
use winit::dpi::PhysicalSize;

#[derive(Default)]
struct Recorder {
    acquired: usize,
    slots: usize,
    uploads: Vec<(usize, u32)>,
    resizes: Vec<PhysicalSize<u32>>,
    draws: Vec<WatercolorUniforms>,
}

struct FakeBackend {
    recorder: Rc<RefCell<Recorder>>,
    size: PhysicalSize<u32>,
    max_dimension: u32,
}

impl RenderBackend for FakeBackend {
    fn backing_size(&self) -> PhysicalSize<u32> {
        self.size
    }

    fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.size = size;
        self.recorder.borrow_mut().resizes.push(size);
    }

    fn allocate_slots(&mut self, count: usize) {
        self.recorder.borrow_mut().slots = count;
    }

    fn upload(&mut self, slot: usize, image: &DecodedImage) {
        self.recorder.borrow_mut().uploads.push((slot, image.width));
    }

    fn draw(&mut self, uniforms: &WatercolorUniforms) -> Result<(), wgpu::SurfaceError> {
        self.recorder.borrow_mut().draws.push(*uniforms);
        Ok(())
    }
}

/// Encodes the artwork id from `art/<id>.png` as the image width.
struct IdImageSource {
    gate: Option<Receiver<()>>,
}

impl IdImageSource {
    fn immediate() -> Arc<Self> {
        Arc::new(Self { gate: None })
    }

    fn gated() -> (Arc<Self>, Sender<()>) {
        let (sender, receiver) = unbounded();
        (
            Arc::new(Self {
                gate: Some(receiver),
            }),
            sender,
        )
    }
}

impl ImageSource for IdImageSource {
    fn fetch(&self, url: &str) -> Result<DecodedImage> {
        if let Some(gate) = &self.gate {
            gate.recv_timeout(Duration::from_secs(5))?;
        }
        if url.contains("missing") {
            bail!("404 for {url}");
        }
        let id: u32 = url
            .trim_start_matches("art/")
            .trim_end_matches(".png")
            .parse()?;
        DecodedImage::new(id, 1, vec![200; id as usize * 4])
    }
}

#[derive(Default)]
struct Events {
    capability: Vec<bool>,
    selected: Vec<u32>,
}

struct Harness {
    canvas: WatercolorCanvas<FakeBackend>,
    recorder: Rc<RefCell<Recorder>>,
    events: Rc<RefCell<Events>>,
}

fn artwork(id: u32) -> Artwork {
    Artwork {
        id,
        title: format!("Work {id}"),
        year: 2024,
        category: ArtworkCategory::Handmade,
        medium: "Cotton pulp".into(),
        size: "40 x 40 cm".into(),
        price: Some(100 * id),
        image_url: format!("art/{id}.png"),
        description: String::new(),
    }
}

fn artworks(ids: std::ops::RangeInclusive<u32>) -> Vec<Artwork> {
    ids.map(artwork).collect()
}

fn harness_with(
    acquire: impl FnMut(Rc<RefCell<Recorder>>) -> Result<FakeBackend, SetupError> + 'static,
    source: Arc<dyn ImageSource>,
) -> Harness {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    let events = Rc::new(RefCell::new(Events::default()));
    let callbacks = {
        let on_capability = {
            let events = Rc::clone(&events);
            move |available| events.borrow_mut().capability.push(available)
        };
        let on_select = {
            let events = Rc::clone(&events);
            move |artwork: &Artwork| events.borrow_mut().selected.push(artwork.id)
        };
        CanvasCallbacks::new(on_capability, on_select)
    };
    let mut acquire = acquire;
    let acquire_recorder = Rc::clone(&recorder);
    let canvas = WatercolorCanvas::new(
        move || {
            acquire_recorder.borrow_mut().acquired += 1;
            acquire(Rc::clone(&acquire_recorder))
        },
        source,
        callbacks,
    )
    .with_time_source(FixedTimeSource::new(1.25));
    Harness {
        canvas,
        recorder,
        events,
    }
}

fn harness(source: Arc<dyn ImageSource>) -> Harness {
    harness_limited(source, u32::MAX)
}

fn harness_limited(source: Arc<dyn ImageSource>, max_dimension: u32) -> Harness {
    harness_with(
        move |recorder| {
            Ok(FakeBackend {
                recorder,
                size: PhysicalSize::new(1, 1),
                max_dimension,
            })
        },
        source,
    )
}

fn rect() -> CanvasRect {
    CanvasRect::filling(300.0, 200.0)
}

fn display() -> DisplayMetrics {
    DisplayMetrics::new(rect(), 2.0)
}

fn frame_until_uploads(harness: &mut Harness, expected: usize) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while harness.recorder.borrow().uploads.len() < expected && Instant::now() < deadline {
        harness.canvas.frame(&display()).unwrap();
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn missing_context_reports_capability_once_and_never_draws() {
    let mut harness = harness_with(
        |_| Err(SetupError::ContextUnavailable("no adapter".into())),
        IdImageSource::immediate(),
    );

    harness.canvas.mount(artworks(1..=3));
    assert!(!harness.canvas.is_mounted());
    assert_eq!(harness.events.borrow().capability, vec![false]);
    assert!(!harness.canvas.take_frame_request());

    for _ in 0..3 {
        assert_eq!(harness.canvas.frame(&display()), Ok(FrameStatus::Idle));
    }
    harness.canvas.set_artworks(artworks(1..=2));

    assert_eq!(harness.recorder.borrow().acquired, 2);
    assert!(harness.recorder.borrow().draws.is_empty());
    assert_eq!(harness.events.borrow().capability, vec![false]);
}

#[test]
fn program_failure_stays_inert_without_capability_report() {
    let mut harness = harness_with(
        |_| {
            Err(SetupError::Program(ProgramError::Compile {
                stage: ShaderStageKind::Fragment,
                diagnostic: "unexpected token".into(),
            }))
        },
        IdImageSource::immediate(),
    );

    harness.canvas.mount(artworks(1..=3));
    assert!(!harness.canvas.is_mounted());
    assert_eq!(harness.canvas.frame(&display()), Ok(FrameStatus::Idle));
    assert!(harness.events.borrow().capability.is_empty());
    assert!(harness.recorder.borrow().draws.is_empty());
}

#[test]
fn click_selects_artwork_under_pointer() {
    let mut harness = harness(IdImageSource::immediate());
    harness.canvas.mount(artworks(1..=6));

    harness
        .canvas
        .handle_event(CanvasEvent::Click { x: 250.0, y: 150.0 }, &rect());
    harness
        .canvas
        .handle_event(CanvasEvent::Click { x: 10.0, y: 10.0 }, &rect());

    assert_eq!(harness.events.borrow().selected, vec![6, 1]);
}

#[test]
fn click_on_empty_cell_is_ignored() {
    let mut harness = harness(IdImageSource::immediate());
    harness.canvas.mount(artworks(1..=4));

    harness
        .canvas
        .handle_event(CanvasEvent::Click { x: 250.0, y: 150.0 }, &rect());
    harness
        .canvas
        .handle_event(CanvasEvent::Click { x: 350.0, y: 10.0 }, &rect());

    assert!(harness.events.borrow().selected.is_empty());
}

#[test]
fn only_six_slots_are_textured() {
    let mut harness = harness(IdImageSource::immediate());
    harness.canvas.mount(artworks(1..=8));
    frame_until_uploads(&mut harness, TEXTURE_SLOT_CAPACITY);
    thread::sleep(Duration::from_millis(50));
    harness.canvas.frame(&display()).unwrap();

    let recorder = harness.recorder.borrow();
    assert_eq!(recorder.slots, TEXTURE_SLOT_CAPACITY);
    let mut uploaded: Vec<_> = recorder.uploads.iter().map(|(slot, _)| *slot).collect();
    uploaded.sort_unstable();
    assert_eq!(uploaded, vec![0, 1, 2, 3, 4, 5]);
    for (slot, width) in &recorder.uploads {
        assert_eq!(*width, *slot as u32 + 1, "slot {slot} holds the wrong artwork");
    }

    let last = recorder.draws.last().unwrap();
    assert_eq!(last.grid_dims, [3.0, 3.0]);
    assert_eq!(last.slot_count, 6.0);
}

#[test]
fn unchanged_display_resizes_once() {
    let mut harness = harness(IdImageSource::immediate());
    harness.canvas.mount(artworks(1..=3));

    for _ in 0..4 {
        assert_eq!(harness.canvas.frame(&display()), Ok(FrameStatus::Drawn));
    }
    assert_eq!(
        harness.recorder.borrow().resizes,
        vec![PhysicalSize::new(600, 400)]
    );

    let wider = DisplayMetrics::new(CanvasRect::filling(400.0, 200.0), 2.0);
    harness.canvas.frame(&wider).unwrap();
    assert_eq!(harness.recorder.borrow().resizes.len(), 2);
    assert_eq!(harness.recorder.borrow().draws.last().unwrap().resolution, [800.0, 400.0]);
}

#[test]
fn oversized_display_resizes_once_to_device_limit() {
    let mut harness = harness_limited(IdImageSource::immediate(), 500);
    harness.canvas.mount(artworks(1..=3));

    for _ in 0..4 {
        harness.canvas.frame(&display()).unwrap();
    }
    let recorder = harness.recorder.borrow();
    assert_eq!(recorder.resizes, vec![PhysicalSize::new(500, 400)]);
    assert_eq!(recorder.draws.last().unwrap().resolution, [500.0, 400.0]);
}

#[test]
fn frame_writes_pointer_time_and_grid() {
    let mut harness = harness(IdImageSource::immediate());
    harness.canvas.mount(artworks(1..=6));
    assert!(harness.canvas.take_frame_request());
    assert!(!harness.canvas.take_frame_request());

    harness.canvas.frame(&display()).unwrap();
    let untouched = *harness.recorder.borrow().draws.last().unwrap();
    assert!(untouched.mouse[0] < 0.0, "pointer starts off canvas");

    harness
        .canvas
        .handle_event(CanvasEvent::PointerMoved { x: 100.0, y: 50.0 }, &rect());
    harness.canvas.frame(&display()).unwrap();
    assert!(harness.canvas.take_frame_request());

    let uniforms = *harness.recorder.borrow().draws.last().unwrap();
    assert_eq!(uniforms.resolution, [600.0, 400.0]);
    assert_eq!(uniforms.mouse, [200.0, 300.0]);
    assert_eq!(uniforms.time, 1.25);
    assert_eq!(uniforms.aspect, 1.5);
    assert_eq!(uniforms.grid_dims, [3.0, 2.0]);

    harness
        .canvas
        .handle_event(CanvasEvent::PointerLeft, &rect());
    harness.canvas.frame(&display()).unwrap();
    assert_eq!(harness.recorder.borrow().draws.last().unwrap().mouse, untouched.mouse);
}

#[test]
fn unmount_stops_drawing_and_input() {
    let mut harness = harness(IdImageSource::immediate());
    harness.canvas.mount(artworks(1..=6));
    harness.canvas.frame(&display()).unwrap();
    let draws = harness.recorder.borrow().draws.len();

    harness.canvas.unmount();
    harness.canvas.unmount();
    assert!(!harness.canvas.take_frame_request());
    assert_eq!(harness.canvas.frame(&display()), Ok(FrameStatus::Idle));

    harness
        .canvas
        .handle_event(CanvasEvent::PointerMoved { x: 10.0, y: 10.0 }, &rect());
    harness
        .canvas
        .handle_event(CanvasEvent::Click { x: 10.0, y: 10.0 }, &rect());

    assert_eq!(harness.recorder.borrow().draws.len(), draws);
    assert!(harness.events.borrow().selected.is_empty());
    assert!(!harness.canvas.pointer().is_tracking());
}

#[test]
fn failed_load_keeps_placeholder() {
    let mut list = artworks(1..=3);
    list[1].image_url = "art/missing.png".into();
    let mut harness = harness(IdImageSource::immediate());
    harness.canvas.mount(list);
    frame_until_uploads(&mut harness, 2);
    thread::sleep(Duration::from_millis(50));
    harness.canvas.frame(&display()).unwrap();

    let mut slots: Vec<_> = harness
        .recorder
        .borrow()
        .uploads
        .iter()
        .map(|(slot, _)| *slot)
        .collect();
    slots.sort_unstable();
    assert_eq!(slots, vec![0, 2]);
}

#[test]
fn loads_from_a_replaced_list_are_dropped() {
    let (source, gate) = IdImageSource::gated();
    let mut harness = harness(source);
    harness.canvas.mount(artworks(1..=2));
    harness.canvas.set_artworks(artworks(11..=12));
    assert_eq!(harness.recorder.borrow().acquired, 2);

    for _ in 0..4 {
        gate.send(()).unwrap();
    }
    frame_until_uploads(&mut harness, 2);
    thread::sleep(Duration::from_millis(50));
    harness.canvas.frame(&display()).unwrap();

    let mut widths: Vec<_> = harness
        .recorder
        .borrow()
        .uploads
        .iter()
        .map(|(_, width)| *width)
        .collect();
    widths.sort_unstable();
    assert_eq!(widths, vec![11, 12]);
}
