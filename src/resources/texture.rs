use std::path::{Path, PathBuf};

use crate::resources::LoadError;

/// Where assets are looked up, relative to the working directory.
pub const ASSET_DIR: &str = "assets";

/// `./assets/<file_name>`, or the copy the build script placed in the build
/// output when the working directory has none.
pub fn asset_path(file_name: &str) -> PathBuf {
    let local = Path::new("./").join(ASSET_DIR).join(file_name);
    if local.exists() {
        return local;
    }
    let bundled = Path::new(env!("OUT_DIR")).join(ASSET_DIR).join(file_name);
    if bundled.exists() { bundled } else { local }
}

fn io_error(path: PathBuf, source: std::io::Error) -> LoadError {
    if source.kind() == std::io::ErrorKind::NotFound {
        LoadError::NotFound(path)
    } else {
        LoadError::Io { path, source }
    }
}

pub async fn load_string(file_name: &str) -> Result<String, LoadError> {
    let path = asset_path(file_name);
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| io_error(path, source))
}

pub async fn load_binary(file_name: &str) -> Result<Vec<u8>, LoadError> {
    let path = asset_path(file_name);
    tokio::fs::read(&path)
        .await
        .map_err(|source| io_error(path, source))
}

/// Decodes an encoded image. The format is guessed from the bytes.
pub fn decode_image(name: &str, bytes: &[u8]) -> Result<image::DynamicImage, LoadError> {
    image::load_from_memory(bytes).map_err(|source| LoadError::Decode {
        name: name.to_string(),
        source,
    })
}

/// Reads and decodes `<name>.png`.
pub async fn load_image(name: &str) -> Result<image::DynamicImage, LoadError> {
    let file_name = format!("{name}.png");
    let bytes = load_binary(&file_name).await?;
    decode_image(&file_name, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_assets_are_reported_as_not_found() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let err = runtime
            .block_on(load_binary("definitely-not-here.bin"))
            .unwrap_err();
        assert!(matches!(err, LoadError::NotFound(path) if path.ends_with("definitely-not-here.bin")));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = decode_image("broken.png", b"not an image").unwrap_err();
        assert!(matches!(err, LoadError::Decode { name, .. } if name == "broken.png"));
    }

    #[test]
    fn encoded_png_decodes() {
        let mut bytes = Vec::new();
        image::RgbaImage::from_pixel(2, 3, image::Rgba([255, 0, 0, 255]))
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let img = decode_image("red.png", &bytes).unwrap();
        assert_eq!((img.width(), img.height()), (2, 3));
    }
}
