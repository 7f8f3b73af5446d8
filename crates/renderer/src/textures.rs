use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use catalog::Artwork;
use crossbeam_channel::{unbounded, Receiver, Sender};
use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::types::{PLACEHOLDER_RGBA, TEXTURE_SLOT_CAPACITY};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Tightly packed RGBA8 pixels, top row first.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            bail!(
                "{width}x{height} image needs {expected} RGBA bytes, got {}",
                rgba.len()
            );
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: PLACEHOLDER_RGBA.to_vec(),
        }
    }

    pub fn from_dynamic(image: image::DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            rgba: rgba.into_raw(),
        }
    }
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// Where artwork pixels come from.
pub trait ImageSource: Send + Sync {
    fn fetch(&self, url: &str) -> Result<DecodedImage>;
}

/// Fetches `http(s)` URLs over the network and treats anything else as a
/// local path (an optional `file://` prefix is stripped).
#[derive(Debug, Clone)]
pub struct RemoteImageSource {
    http: Client,
}

impl RemoteImageSource {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("failed to build image HTTP client")?;
        Ok(Self { http })
    }

    fn fetch_remote(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(url)
            .send()
            .with_context(|| format!("requesting image {url}"))?
            .error_for_status()
            .context("image request failed")?;
        Ok(response.bytes()?.to_vec())
    }
}

impl ImageSource for RemoteImageSource {
    fn fetch(&self, url: &str) -> Result<DecodedImage> {
        let image = if url.starts_with("http://") || url.starts_with("https://") {
            let bytes = self.fetch_remote(url)?;
            image::load_from_memory(&bytes)
                .with_context(|| format!("decoding image from {url}"))?
        } else {
            let path = url.strip_prefix("file://").unwrap_or(url);
            image::open(path).with_context(|| format!("opening image at {path}"))?
        };
        Ok(DecodedImage::from_dynamic(image))
    }
}

/// Source that never produces pixels, leaving every slot on its placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderOnlySource;

impl ImageSource for PlaceholderOnlySource {
    fn fetch(&self, url: &str) -> Result<DecodedImage> {
        bail!("image loading disabled; keeping placeholder for {url}")
    }
}

/// A finished load, tagged with the mount generation that requested it.
#[derive(Debug)]
pub struct TextureLoad {
    pub generation: u64,
    pub slot: usize,
    pub image: DecodedImage,
}

/// Background image loading for the texture slots.
///
/// Each load runs on its own thread and reports over a channel; the render
/// thread drains it between frames. Loads belong to a mount generation:
/// starting a new generation cancels the previous one, and anything that
/// still arrives from it is discarded.
pub struct TextureLoader {
    sender: Sender<TextureLoad>,
    receiver: Receiver<TextureLoad>,
    generation: u64,
    cancel: Arc<AtomicBool>,
}

impl TextureLoader {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            generation: 0,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cancels outstanding loads and starts fetching the first
    /// [`TEXTURE_SLOT_CAPACITY`] artworks under a fresh generation.
    /// Returns the number of loads started.
    pub fn spawn(&mut self, artworks: &[Artwork], source: Arc<dyn ImageSource>) -> usize {
        self.cancel();
        self.generation = self.generation.wrapping_add(1);
        self.cancel = Arc::new(AtomicBool::new(false));

        let mut started = 0;
        for (slot, artwork) in artworks.iter().take(TEXTURE_SLOT_CAPACITY).enumerate() {
            let url = artwork.image_url.clone();
            let generation = self.generation;
            let sender = self.sender.clone();
            let cancel = Arc::clone(&self.cancel);
            let source = Arc::clone(&source);
            let spawned = thread::Builder::new()
                .name(format!("haizor-texture-{slot}"))
                .spawn(move || load_slot(generation, slot, &url, source.as_ref(), &cancel, &sender));
            match spawned {
                Ok(_) => started += 1,
                Err(err) => {
                    warn!(slot, error = %err, "failed to spawn texture loader; keeping placeholder");
                }
            }
        }
        started
    }

    /// Completed loads for the current generation, in arrival order.
    pub fn drain(&self) -> Vec<TextureLoad> {
        self.receiver
            .try_iter()
            .filter(|load| {
                let current = load.generation == self.generation;
                if !current {
                    debug!(
                        slot = load.slot,
                        generation = load.generation,
                        "discarding texture load from a previous mount"
                    );
                }
                current
            })
            .collect()
    }

    /// Signals in-flight loads to drop their results.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }
}

impl Default for TextureLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TextureLoader {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn load_slot(
    generation: u64,
    slot: usize,
    url: &str,
    source: &dyn ImageSource,
    cancel: &AtomicBool,
    sender: &Sender<TextureLoad>,
) {
    if cancel.load(Ordering::SeqCst) {
        return;
    }
    match source.fetch(url) {
        Ok(image) => {
            if cancel.load(Ordering::SeqCst) {
                debug!(slot, url, "texture load finished after teardown");
                return;
            }
            debug!(slot, url, width = image.width, height = image.height, "texture loaded");
            let _ = sender.send(TextureLoad {
                generation,
                slot,
                image,
            });
        }
        Err(err) => {
            debug!(slot, url, error = %format!("{err:#}"), "texture load failed; keeping placeholder");
        }
    }
}
