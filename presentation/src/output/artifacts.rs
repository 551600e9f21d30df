//! Saving generated artifacts and reading image attachments.
//!
//! Image-generation results are decoded from base64 and written under the
//! artifacts directory; scene and app documents land there as `.html`
//! files ready to open in a browser.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use palaver_application::TurnOutcome;
use palaver_domain::{GenerationMode, InlineImage};
use std::fs;
use std::path::{Path, PathBuf};

/// Write whatever a settled turn produced to disk.
///
/// Returns the path written for image/scene/app turns, `None` for chat
/// turns (their text already went to the console) and for errored turns.
pub fn persist_outcome(outcome: &TurnOutcome, dir: &Path) -> std::io::Result<Option<PathBuf>> {
    if outcome.errored {
        return Ok(None);
    }
    match outcome.mode {
        GenerationMode::Chat => Ok(None),
        GenerationMode::Image => match &outcome.message.image {
            Some(image) => save_image(image, dir).map(Some),
            // The model answered in prose; nothing to save
            None => Ok(None),
        },
        GenerationMode::Scene => save_document(&outcome.message.content, dir, "scene").map(Some),
        GenerationMode::App => save_document(&outcome.message.content, dir, "app").map(Some),
    }
}

fn save_image(image: &InlineImage, dir: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let bytes = BASE64
        .decode(image.data.as_bytes())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    let path = dir.join(format!("imagine-{}.{}", stamp(), extension(&image.mime_type)));
    fs::write(&path, bytes)?;
    Ok(path)
}

fn save_document(content: &str, dir: &Path, kind: &str) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{kind}-{}.html", stamp()));
    fs::write(&path, strip_code_fences(content))?;
    Ok(path)
}

fn stamp() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S").to_string()
}

fn extension(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "bin",
    }
}

/// Models sometimes wrap documents in markdown fences despite being told
/// not to; unwrap a single outer fence.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line
    match body.split_once('\n') {
        Some((_, doc)) => doc.trim(),
        None => body.trim(),
    }
}

/// Read an image file as a base64 inline attachment.
pub fn read_image_attachment(path: &Path) -> Result<InlineImage, String> {
    let mime_type = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => return Err(format!("unsupported image type: {}", path.display())),
    };
    let bytes = fs::read(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Ok(InlineImage {
        data: BASE64.encode(bytes),
        mime_type: mime_type.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("<html></html>"), "<html></html>");
        assert_eq!(
            strip_code_fences("```html\n<html></html>\n```"),
            "<html></html>"
        );
        assert_eq!(strip_code_fences("```\n<p>x</p>\n```"), "<p>x</p>");
        // Unbalanced fences are left alone
        assert_eq!(strip_code_fences("```html\n<p>x</p>"), "```html\n<p>x</p>");
    }

    #[test]
    fn test_attachment_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.png");
        std::fs::write(&path, b"not really a png").unwrap();

        let image = read_image_attachment(&path).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(BASE64.decode(image.data).unwrap(), b"not really a png");
    }

    #[test]
    fn test_attachment_rejects_unknown_extension() {
        assert!(read_image_attachment(Path::new("notes.txt")).is_err());
    }

    #[test]
    fn test_save_image_decodes_base64() {
        let dir = tempfile::tempdir().unwrap();
        let image = InlineImage {
            data: BASE64.encode(b"pixels"),
            mime_type: "image/png".to_string(),
        };
        let path = save_image(&image, dir.path()).unwrap();
        assert_eq!(path.extension().unwrap(), "png");
        assert_eq!(std::fs::read(path).unwrap(), b"pixels");
    }
}
