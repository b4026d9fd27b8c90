//! Filesystem export of a finished launch kit.
//!
//! Two layouts are supported:
//!
//! ```text
//! <site_dir>/                    (site export)
//! ├── index.html
//! ├── about.html
//! ├── pricing.html               (only when pricing was available)
//! ├── contact.html
//! ├── styles.css
//! ├── README_deploy.txt
//! └── assets/PLACEHOLDERS.txt
//!
//! <export_dir>/                  (full export)
//! ├── <every .html/.css/.md/.txt/.csv entry of the files map>
//! ├── export_manifest.json
//! └── site/                      (the site export, byte for byte)
//! ```
//!
//! Both layouts render the site from the same [`SiteBundle`], so `site/`
//! never holds a page the site export would leave out: a missing pricing
//! page is absent in both. The files map at the export root keeps every key,
//! including unavailable notices. Without a rendered site, `site/` is not
//! written at all.
//!
//! Every file is written atomically (temp file, then rename) and existing
//! files are overwritten.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use launchkit_artifacts::{LAYOUT_MANIFEST, render_assets_prompts};
use launchkit_shared::{ExportBundle, LaunchKitError, Result, SiteBundle};

/// Name of the manifest written at the root of a full export.
pub const MANIFEST_FILE: &str = "export_manifest.json";

/// Extensions copied from the files map into a full export.
const EXPORTABLE_EXTENSIONS: [&str; 5] = ["html", "css", "md", "txt", "csv"];

const PLACEHOLDERS: &str = "assets/PLACEHOLDERS.txt";

/// One file written by an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedFile {
    /// Path relative to the export root, `/`-separated.
    pub path: String,
    pub sha256: String,
    pub size_bytes: usize,
}

/// Contents of `export_manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportManifest {
    pub generated_at: DateTime<Utc>,
    pub files: Vec<ExportedFile>,
}

/// Output from a successful export.
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// Directory the export was written to.
    pub root: PathBuf,
    pub files: Vec<ExportedFile>,
}

/// Write the static site from a rendered [`SiteBundle`].
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn write_site(dir: &Path, site: &SiteBundle) -> Result<ExportReport> {
    let files = write_site_pages(dir, "", site)?;
    info!(count = files.len(), path = %dir.display(), "site export complete");
    Ok(ExportReport {
        root: dir.to_path_buf(),
        files,
    })
}

/// Write the site pages under `root/prefix`. Pages the bundle did not
/// render are skipped.
fn write_site_pages(root: &Path, prefix: &str, site: &SiteBundle) -> Result<Vec<ExportedFile>> {
    let mut pages: Vec<(&str, &str)> = vec![("index.html", site.index_html.as_str())];
    for (name, page) in [
        ("about.html", &site.about_html),
        ("pricing.html", &site.pricing_html),
        ("contact.html", &site.contact_html),
    ] {
        match page {
            Some(html) => pages.push((name, html.as_str())),
            None => debug!(page = name, "page not rendered, skipping"),
        }
    }
    pages.push(("styles.css", site.styles_css.as_str()));
    pages.push(("README_deploy.txt", site.deploy_instructions.as_str()));

    let mut files = Vec::with_capacity(pages.len() + 1);
    for (name, content) in pages {
        files.push(write_atomic(root, &format!("{prefix}{name}"), content)?);
    }
    let placeholders = with_trailing_newline(render_assets_prompts(&site.assets));
    files.push(write_atomic(
        root,
        &format!("{prefix}{PLACEHOLDERS}"),
        &placeholders,
    )?);
    Ok(files)
}

/// Write every exportable entry of the files map, the site under `site/`,
/// and `export_manifest.json`.
///
/// `site` is the rendered website, or `None` when that stage fell back.
#[instrument(skip_all, fields(dir = %dir.display(), entries = bundle.files.len()))]
pub fn write_full_export(
    dir: &Path,
    bundle: &ExportBundle,
    site: Option<&SiteBundle>,
) -> Result<ExportReport> {
    let mut files = Vec::new();

    for (name, content) in &bundle.files {
        if !is_exportable(name) {
            debug!(file = %name, "not an exportable file type, skipping");
            continue;
        }
        ensure_plain_name(name)?;
        files.push(write_atomic(dir, name, content)?);
    }

    if !bundle.files.contains_key("zip_structure.txt") {
        files.push(write_atomic(dir, "zip_structure.txt", LAYOUT_MANIFEST)?);
    }

    match site {
        Some(site) => files.extend(write_site_pages(dir, "site/", site)?),
        None => warn!("website unavailable, site/ not written"),
    }

    let manifest = ExportManifest {
        generated_at: Utc::now(),
        files: files.clone(),
    };
    let json = serde_json::to_string_pretty(&manifest)?;
    write_atomic(dir, MANIFEST_FILE, &json)?;

    info!(count = files.len(), path = %dir.display(), "full export complete");
    Ok(ExportReport {
        root: dir.to_path_buf(),
        files,
    })
}

/// Verify that a full export directory matches its manifest.
pub fn validate_export(dir: &Path) -> Result<ExportManifest> {
    let manifest_path = dir.join(MANIFEST_FILE);
    if !manifest_path.exists() {
        return Err(LaunchKitError::validation(format!("missing {MANIFEST_FILE}")));
    }

    let content = std::fs::read_to_string(&manifest_path)
        .map_err(|e| LaunchKitError::io(&manifest_path, e))?;
    let manifest: ExportManifest = serde_json::from_str(&content)
        .map_err(|e| LaunchKitError::validation(format!("invalid {MANIFEST_FILE}: {e}")))?;

    for file in &manifest.files {
        let path = dir.join(&file.path);
        let bytes = std::fs::read(&path).map_err(|e| LaunchKitError::io(&path, e))?;
        if sha256_hex(&bytes) != file.sha256 {
            return Err(LaunchKitError::validation(format!(
                "checksum mismatch for {}",
                file.path
            )));
        }
    }

    Ok(manifest)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn is_exportable(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXPORTABLE_EXTENSIONS.contains(&ext))
}

/// Files map keys must be bare file names.
fn ensure_plain_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(LaunchKitError::Export(format!(
            "refusing to write file map entry {name:?}"
        )));
    }
    Ok(())
}

fn with_trailing_newline(mut text: String) -> String {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Write `content` to `root/relative` via a temp file and rename.
fn write_atomic(root: &Path, relative: &str, content: &str) -> Result<ExportedFile> {
    let target = root.join(relative);
    let parent = target.parent().unwrap_or(root);
    std::fs::create_dir_all(parent).map_err(|e| LaunchKitError::io(parent, e))?;

    let file_name = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LaunchKitError::Export(format!("invalid export path {relative:?}")))?;
    let temp = parent.join(format!(".{file_name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| LaunchKitError::io(&temp, e))?;
    std::fs::rename(&temp, &target).map_err(|e| LaunchKitError::io(&target, e))?;

    debug!(file = %relative, size = content.len(), "wrote file");

    Ok(ExportedFile {
        path: relative.to_string(),
        sha256: sha256_hex(content.as_bytes()),
        size_bytes: content.len(),
    })
}
