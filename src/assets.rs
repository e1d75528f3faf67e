//! Front-end asset wiring for the HTML shell.
//!
//! In production the Vite build writes `.vite/manifest.json` next to the
//! hashed bundles, and the page head links the entry scripts and their
//! stylesheets from it. Without a manifest the app is in dev mode: the
//! head points at the Vite dev server and asset requests are redirected
//! there.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, Result};

/// URL prefix under which built assets are served.
pub const PUBLIC_PATH: &str = "/assets/";

/// Manifest location relative to the assets directory.
pub const MANIFEST_PATH: &str = ".vite/manifest.json";

/// Default Vite dev server port.
pub const DEFAULT_VITE_PORT: u16 = 3000;

/// One chunk of a Vite build manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViteManifestItem {
    pub file: String,
    pub name: String,
    pub src: String,
    pub is_entry: bool,
    pub css: Vec<String>,
}

/// Build manifest keyed by source path. Ordered so the rendered head is stable.
pub type ViteManifest = BTreeMap<String, ViteManifestItem>;

/// Assets directory plus its manifest, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ViteAssets {
    dir: PathBuf,
    vite_port: u16,
    manifest: Option<ViteManifest>,
}

impl ViteAssets {
    /// Load the manifest from `<dir>/.vite/manifest.json`.
    ///
    /// A missing or unreadable manifest is not an error: it switches to
    /// dev mode.
    pub fn load(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let manifest = match read_manifest(&dir.join(MANIFEST_PATH)) {
            Ok(manifest) => {
                tracing::debug!(entries = manifest.len(), dir = %dir.display(), "asset manifest loaded");
                Some(manifest)
            }
            Err(AppError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(dir = %dir.display(), "no asset manifest, using Vite dev server");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "asset manifest unusable, using Vite dev server");
                None
            }
        };
        Self {
            dir,
            vite_port: DEFAULT_VITE_PORT,
            manifest,
        }
    }

    /// Use `port` for the Vite dev server.
    pub fn with_vite_port(mut self, port: u16) -> Self {
        self.vite_port = port;
        self
    }

    /// Whether a build manifest was found.
    pub fn is_production(&self) -> bool {
        self.manifest.is_some()
    }

    pub fn vite_port(&self) -> u16 {
        self.vite_port
    }

    /// Script and stylesheet tags for the page head.
    pub fn head_html(&self) -> String {
        let Some(manifest) = &self.manifest else {
            return format!(
                r#"<script type="module" src="http://localhost:{port}/@vite/client"></script><script type="module" src="http://localhost:{port}/assets/main.tsx"></script>"#,
                port = self.vite_port
            );
        };

        let mut html = String::new();
        for item in manifest.values().filter(|item| item.is_entry) {
            let _ = write!(
                html,
                r#"<script type="module" src="{PUBLIC_PATH}{}"></script>"#,
                item.file
            );
            for css in &item.css {
                let _ = write!(html, r#"<link rel="stylesheet" href="{PUBLIC_PATH}{css}">"#);
            }
        }
        html
    }

    /// File under the assets directory for a request path.
    ///
    /// Returns `None` for absolute paths, any `..` component, or a path
    /// that is not an existing file.
    pub fn resolve_asset(&self, request_path: &str) -> Option<PathBuf> {
        let relative = Path::new(request_path.trim_start_matches('/'));
        if relative.as_os_str().is_empty()
            || !relative.components().all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }
        let path = self.dir.join(relative);
        path.is_file().then_some(path)
    }
}

fn read_manifest(path: &Path) -> Result<ViteManifest> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| AppError::Manifest(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
      "src/main.tsx": {
        "file": "main-4f2a.js",
        "name": "main",
        "src": "src/main.tsx",
        "isEntry": true,
        "css": ["main-91bc.css"]
      },
      "src/admin.tsx": {
        "file": "admin-77aa.js",
        "src": "src/admin.tsx",
        "isEntry": true
      },
      "_shared-1234.js": {
        "file": "shared-1234.js"
      }
    }"#;

    fn production_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join(".vite")).expect("mkdir");
        std::fs::write(dir.path().join(MANIFEST_PATH), MANIFEST).expect("write manifest");
        std::fs::write(dir.path().join("main-4f2a.js"), "console.log(1)").expect("write js");
        dir
    }

    #[test]
    fn manifest_item_reads_camel_case() {
        let manifest: ViteManifest = serde_json::from_str(MANIFEST).expect("parse");
        let main = &manifest["src/main.tsx"];
        assert!(main.is_entry);
        assert_eq!(main.css, ["main-91bc.css"]);
        assert!(!manifest["_shared-1234.js"].is_entry);
    }

    #[test]
    fn production_head_lists_entries_in_key_order() {
        let dir = production_dir();
        let assets = ViteAssets::load(dir.path());
        assert!(assets.is_production());
        assert_eq!(
            assets.head_html(),
            concat!(
                r#"<script type="module" src="/assets/admin-77aa.js"></script>"#,
                r#"<script type="module" src="/assets/main-4f2a.js"></script>"#,
                r#"<link rel="stylesheet" href="/assets/main-91bc.css">"#,
            )
        );
    }

    #[test]
    fn missing_manifest_is_dev_mode() {
        let dir = tempfile::tempdir().expect("tempdir");
        let assets = ViteAssets::load(dir.path()).with_vite_port(5173);
        assert!(!assets.is_production());
        let head = assets.head_html();
        assert!(head.contains(r#"src="http://localhost:5173/@vite/client""#));
        assert!(head.contains(r#"src="http://localhost:5173/assets/main.tsx""#));
    }

    #[test]
    fn malformed_manifest_is_dev_mode() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join(".vite")).expect("mkdir");
        std::fs::write(dir.path().join(MANIFEST_PATH), "{not json").expect("write");
        assert!(!ViteAssets::load(dir.path()).is_production());
    }

    #[test]
    fn resolve_asset_finds_existing_files() {
        let dir = production_dir();
        let assets = ViteAssets::load(dir.path());
        assert_eq!(
            assets.resolve_asset("main-4f2a.js"),
            Some(dir.path().join("main-4f2a.js"))
        );
        assert_eq!(
            assets.resolve_asset("/main-4f2a.js"),
            Some(dir.path().join("main-4f2a.js"))
        );
        assert!(assets.resolve_asset("missing.js").is_none());
        assert!(assets.resolve_asset(".vite").is_none());
    }

    #[test]
    fn resolve_asset_refuses_traversal() {
        let dir = production_dir();
        let assets = ViteAssets::load(dir.path().join(".vite"));
        assert!(assets.resolve_asset("../main-4f2a.js").is_none());
        assert!(assets.resolve_asset("a/../../main-4f2a.js").is_none());
        assert!(assets.resolve_asset("").is_none());
    }
}
