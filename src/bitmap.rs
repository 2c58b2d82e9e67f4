use crate::error::KeyplateError;
use base64::Engine;
use image::GenericImageView;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

/// A decoded raster image as the compositor sees it: dimensions plus the
/// resource id a renderer uses to locate the pixels. The pixel data itself
/// stays with the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub resource_id: String,
}

impl Bitmap {
    pub fn from_dimensions(resource_id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            resource_id: resource_id.into(),
        }
    }

    /// Probes encoded image bytes for their dimensions. The bytes are not
    /// retained; the renderer resolves `resource_id` to the same payload.
    pub fn decode(resource_id: impl Into<String>, bytes: &[u8]) -> Result<Bitmap, KeyplateError> {
        let resource_id = resource_id.into();
        let decoded = image::load_from_memory(bytes)
            .map_err(|err| KeyplateError::ImageUnavailable(format!("{resource_id}: {err}")))?;
        let (width, height) = decoded.dimensions();
        Ok(Bitmap {
            width,
            height,
            resource_id,
        })
    }

    /// The host application hands generated images around as base64 data
    /// URIs (`data:image/png;base64,...`).
    pub fn from_data_uri(resource_id: impl Into<String>, uri: &str) -> Result<Bitmap, KeyplateError> {
        let resource_id = resource_id.into();
        let payload = uri
            .split_once(',')
            .map(|(_, payload)| payload)
            .ok_or_else(|| {
                KeyplateError::ImageUnavailable(format!("{resource_id}: not a data uri"))
            })?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|err| KeyplateError::ImageUnavailable(format!("{resource_id}: {err}")))?;
        Bitmap::decode(resource_id, &bytes)
    }

    pub fn aspect_ratio(&self) -> Result<f32, KeyplateError> {
        if self.width == 0 || self.height == 0 {
            return Err(KeyplateError::InvalidGeometry(format!(
                "bitmap {} is {}x{}px",
                self.resource_id, self.width, self.height
            )));
        }
        Ok(self.width as f32 / self.height as f32)
    }
}

/// Handle for a bitmap still decoding elsewhere. The single suspension point
/// before composition: `wait` blocks with a caller-supplied bound and maps
/// an elapsed bound to `DecodeTimeout`.
pub struct PendingBitmap {
    rx: mpsc::Receiver<Result<Bitmap, KeyplateError>>,
}

impl PendingBitmap {
    /// Adopts a caller-owned decode pipeline.
    pub fn from_receiver(rx: mpsc::Receiver<Result<Bitmap, KeyplateError>>) -> Self {
        Self { rx }
    }

    /// Decodes on a worker thread and returns immediately.
    pub fn decode_in_background(resource_id: impl Into<String>, bytes: Vec<u8>) -> Self {
        let (tx, rx) = mpsc::channel();
        let resource_id = resource_id.into();
        std::thread::spawn(move || {
            let _ = tx.send(Bitmap::decode(resource_id, &bytes));
        });
        Self { rx }
    }

    pub fn wait(self, timeout: Duration) -> Result<Bitmap, KeyplateError> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(KeyplateError::DecodeTimeout),
            Err(RecvTimeoutError::Disconnected) => Err(KeyplateError::ImageUnavailable(
                "decode worker exited without a result".to_string(),
            )),
        }
    }
}
