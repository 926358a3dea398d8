use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use image::ImageFormat;
use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::error::{AppError, Result};

pub fn url_to_cache_key(url: &str) -> String {
    format!("{:x}", md5::compute(url.as_bytes()))
}

/// Download a generated image and store it as `<dir>/<md5(url)>.png`, replacing
/// any file already there. Every failure is a generation failure.
pub fn download_and_store(client: &Client, url: &str, dir: &Path) -> Result<PathBuf> {
    let resp = client
        .get(url)
        .send()
        .map_err(|e| AppError::Generation(format!("image download: {e}")))?;
    if !resp.status().is_success() {
        return Err(AppError::Generation(format!(
            "image download: HTTP {}",
            resp.status()
        )));
    }
    let body = resp
        .bytes()
        .map_err(|e| AppError::Generation(format!("image download: {e}")))?;
    debug!("downloaded {} image bytes", body.len());

    store_image_bytes(&body, dir, &url_to_cache_key(url))
}

/// Decode `bytes`, re-encode as PNG and write `<dir>/<key>.png` through a temp file.
pub fn store_image_bytes(bytes: &[u8], dir: &Path, key: &str) -> Result<PathBuf> {
    let img = image::load_from_memory(bytes).map_err(|e| {
        warn!("generated image did not decode: {e}");
        AppError::Generation(format!("image decode: {e}"))
    })?;

    let mut png_bytes: Vec<u8> = Vec::new();
    img.write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| AppError::Generation(format!("encode png: {e}")))?;

    fs::create_dir_all(dir)
        .map_err(|e| AppError::File(format!("create {}: {e}", dir.display())))?;
    let dest = dir.join(format!("{key}.png"));
    let tmp = dest.with_extension("png.part");

    let written = write_then_rename(&tmp, &dest, &png_bytes);
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written.map(|()| dest)
}

fn write_then_rename(tmp: &Path, dest: &Path, bytes: &[u8]) -> Result<()> {
    let mut f = fs::File::create(tmp)
        .map_err(|e| AppError::File(format!("create {}: {e}", tmp.display())))?;
    f.write_all(bytes)
        .map_err(|e| AppError::File(format!("write {}: {e}", tmp.display())))?;
    drop(f);
    fs::rename(tmp, dest).map_err(|e| AppError::File(format!("rename {}: {e}", dest.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{closed_port_url, Canned, TestServer};
    use image::{DynamicImage, ImageBuffer, Rgb};

    fn encoded(w: u32, h: u32, format: ImageFormat) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(w, h, Rgb([200u8, 10, 10]));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), format)
            .unwrap();
        out
    }

    fn tiny_jpeg() -> Vec<u8> {
        encoded(4, 2, ImageFormat::Jpeg)
    }

    #[test]
    fn cache_key_is_stable_md5() {
        assert_eq!(url_to_cache_key("abc"), "900150983cd24fb0d6963f7d28e17f72");
        assert_ne!(url_to_cache_key("a"), url_to_cache_key("b"));
    }

    #[test]
    fn stores_png_under_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = store_image_bytes(&tiny_jpeg(), dir.path(), "k1").unwrap();

        assert_eq!(path, dir.path().join("k1.png"));
        let reread = image::open(&path).unwrap();
        assert_eq!((reread.width(), reread.height()), (4, 2));
        assert!(!dir.path().join("k1.png.part").exists());
    }

    #[test]
    fn creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let path = store_image_bytes(&tiny_jpeg(), &nested, "k").unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn garbage_bytes_are_generation_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = store_image_bytes(b"<html>rate limited</html>", dir.path(), "k").unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
        assert!(!dir.path().join("k.png").exists());
    }

    #[test]
    fn failed_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in the way makes the final rename fail.
        fs::create_dir(dir.path().join("k.png")).unwrap();

        let err = store_image_bytes(&tiny_jpeg(), dir.path(), "k").unwrap_err();
        assert!(matches!(err, AppError::File(_)), "{err:?}");
        assert!(!dir.path().join("k.png.part").exists());
    }

    #[test]
    fn download_replaces_file_from_an_earlier_run() {
        let dir = tempfile::tempdir().unwrap();
        let server = TestServer::bind();
        let url = format!("{}/generated.png", server.url);
        let stale = dir.path().join(format!("{}.png", url_to_cache_key(&url)));
        fs::write(&stale, encoded(1, 1, ImageFormat::Png)).unwrap();

        let handle = server.serve(vec![Canned::new(
            "200 OK",
            "image/png",
            encoded(6, 3, ImageFormat::Png),
        )]);
        let path = download_and_store(&Client::new(), &url, dir.path()).unwrap();
        let heads = handle.join().unwrap();

        assert_eq!(path, stale);
        assert!(heads[0].starts_with("GET /generated.png "), "{}", heads[0]);
        let reread = image::open(&path).unwrap();
        assert_eq!((reread.width(), reread.height()), (6, 3));
    }

    #[test]
    fn unreachable_image_host_fails_even_with_old_file() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("{}/generated.png", closed_port_url());
        fs::write(
            dir.path().join(format!("{}.png", url_to_cache_key(&url))),
            encoded(1, 1, ImageFormat::Png),
        )
        .unwrap();

        let err = download_and_store(&Client::new(), &url, dir.path()).unwrap_err();
        assert!(matches!(err, AppError::Generation(_)), "{err:?}");
    }

    #[test]
    fn image_http_error_is_generation_error() {
        let dir = tempfile::tempdir().unwrap();
        let server = TestServer::bind();
        let url = format!("{}/expired.png", server.url);
        let handle = server.serve(vec![Canned::html("403 Forbidden", "AuthenticationFailed")]);

        let err = download_and_store(&Client::new(), &url, dir.path()).unwrap_err();
        handle.join().unwrap();
        match err {
            AppError::Generation(msg) => assert!(msg.contains("403"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
