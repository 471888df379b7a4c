use std::fmt::Write;
use std::path::{Component, Path, PathBuf};

use sha2::{Digest, Sha256};
use uuid::Uuid;

pub fn sanitize_filename(name: &str) -> String {
    let mut s = name.trim().to_string();
    let invalid = ['/', '\\', ':', '*', '?', '"', '<', '>', '|', '\0'];
    for ch in invalid {
        s = s.replace(ch, "-");
    }
    s = s.replace(' ', "_");
    if s.len() > 100 {
        let mut cut = 100;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
    }
    if s.is_empty() {
        s = "image".into();
    }
    s
}

/// Splits a sanitized name into a non-empty stem and a possibly empty extension.
fn stem_and_ext(name: &str) -> (String, String) {
    let p = Path::new(name);
    let stem = p
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("image")
        .to_string();
    let ext = p
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string();
    (stem, ext)
}

/// `<stem>_<YYYYmmdd-HHMMSS>[-<n>].<ext>`; `attempt` 0 carries no counter.
pub fn timestamped_name(original: Option<&str>, stamp: &str, attempt: u32) -> String {
    let safe = sanitize_filename(original.unwrap_or("image.bin"));
    let (stem, ext) = stem_and_ext(&safe);
    let stem = if attempt == 0 {
        format!("{stem}_{stamp}")
    } else {
        format!("{stem}_{stamp}-{attempt}")
    };
    if ext.is_empty() {
        stem
    } else {
        format!("{stem}.{ext}")
    }
}

pub fn blob_key(area: &str, owner_id: Uuid, filename: &str) -> String {
    format!("{area}/{owner_id}/{filename}")
}

/// Normalises a client-supplied key, rejecting anything that could escape the root.
pub fn checked_relative(key: &str) -> anyhow::Result<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(key).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => continue,
            _ => anyhow::bail!("forbidden"),
        }
    }
    if relative.as_os_str().is_empty() {
        anyhow::bail!("forbidden");
    }
    Ok(relative)
}

pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(64);
    for byte in digest {
        let _ = write!(&mut out, "{:02x}", byte);
    }
    out
}

pub fn timestamp_now() -> String {
    chrono::Utc::now().format("%Y%m%d-%H%M%S").to_string()
}
