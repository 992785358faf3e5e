use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::foundation::error::{PaperdanceError, PaperdanceResult};
use crate::job::request::RenderRequest;
use crate::providers::{
    BackgroundProvider, DecodedCutout, ImageFileBackground, SolidBackground, SpriteProvider,
};
use crate::render::sprite::Sprite;
use crate::settings::sprite::SpriteSettings;

/// Where the scene background comes from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundSource {
    /// Image file, resized to the output resolution.
    Image(PathBuf),
    /// Flat RGB colour.
    Solid([u8; 3]),
}

/// One sprite entry of a job file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpriteEntry {
    /// Cut-out image with transparency.
    pub image: PathBuf,
    /// Settings saved with the character, overridden by `settings`.
    #[serde(default)]
    pub stored: SpriteSettings,
    /// Per-request overrides.
    #[serde(default)]
    pub settings: SpriteSettings,
}

/// A render job described as JSON: request fields, a background source and the sprite list.
///
/// Relative image paths resolve against the manifest's directory when loaded with
/// [`JobManifest::from_path`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobManifest {
    pub duration_seconds: u32,
    #[serde(default)]
    pub fps: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub prompt: String,
    pub background: BackgroundSource,
    pub sprites: Vec<SpriteEntry>,
}

impl JobManifest {
    /// Parse a manifest from JSON. Paths are kept as written.
    pub fn from_reader<R: std::io::Read>(r: R) -> PaperdanceResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| PaperdanceError::validation(format!("parse job manifest JSON: {e}")))
    }

    /// Parse a manifest file, resolving relative paths against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> PaperdanceResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PaperdanceError::io(format!("open job manifest '{}': {e}", path.display()))
        })?;
        let mut manifest = Self::from_reader(BufReader::new(f))?;
        if let Some(dir) = path.parent() {
            manifest.resolve_relative_to(dir);
        }
        Ok(manifest)
    }

    /// Rebase relative image paths onto `dir`.
    pub fn resolve_relative_to(&mut self, dir: &Path) {
        if let BackgroundSource::Image(p) = &mut self.background {
            rebase(p, dir);
        }
        for s in &mut self.sprites {
            rebase(&mut s.image, dir);
        }
    }

    /// The render request, with per-sprite overrides keyed by sprite index.
    pub fn request(&self) -> RenderRequest {
        let mut req = RenderRequest::new(self.duration_seconds);
        if let Some(fps) = self.fps {
            req.fps = fps;
        }
        if let Some(w) = self.width {
            req.width = w;
        }
        if let Some(h) = self.height {
            req.height = h;
        }
        req.seed = self.seed;
        req.prompt = self.prompt.clone();
        req.settings = self
            .sprites
            .iter()
            .enumerate()
            .filter(|(_, s)| s.settings != SpriteSettings::default())
            .map(|(i, s)| (i, s.settings.clone()))
            .collect::<BTreeMap<_, _>>();
        req
    }

    /// Stored settings in sprite order.
    pub fn stored_settings(&self) -> Vec<SpriteSettings> {
        self.sprites.iter().map(|s| s.stored.clone()).collect()
    }

    pub fn background_provider(&self) -> Box<dyn BackgroundProvider> {
        match &self.background {
            BackgroundSource::Image(p) => Box::new(ImageFileBackground::new(p)),
            BackgroundSource::Solid(rgb) => Box::new(SolidBackground { rgb: *rgb }),
        }
    }

    /// Produce the background at the request's resolution.
    pub fn load_background(&self) -> PaperdanceResult<RgbImage> {
        let req = self.request();
        self.background_provider()
            .background(&req.prompt, req.width, req.height, req.seed)
    }

    /// Decode every sprite image.
    pub fn load_sprites(&self) -> PaperdanceResult<Vec<Sprite>> {
        let cutouts = DecodedCutout;
        self.sprites
            .iter()
            .map(|s| {
                let bytes = std::fs::read(&s.image).map_err(|e| {
                    PaperdanceError::io(format!("read sprite '{}': {e}", s.image.display()))
                })?;
                Sprite::from_rgba(cutouts.cutout(&bytes)?)
            })
            .collect()
    }
}

fn rebase(p: &mut PathBuf, dir: &Path) {
    if p.is_relative() {
        *p = dir.join(&*p);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/job/manifest.rs"]
mod tests;
