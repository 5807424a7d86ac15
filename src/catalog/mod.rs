//! Sample catalog loaded from a JSON manifest.
//!
//! The manifest groups samples under categories and may also list
//! uncategorised samples at the top level:
//!
//! ```json
//! {
//!   "categories": [
//!     { "name": "Maps", "samples": [ { "name": "Display a map", "id": "display-map" } ] }
//!   ],
//!   "samples": [
//!     { "name": "Offline geocode", "id": "offline-geocode",
//!       "dependencies": ["locator"], "readme": "readmes/offline-geocode.md" }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::state::Sample;

mod manifest;

use manifest::{RawManifest, RawSample};

/// Why a manifest could not be turned into a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid manifest JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid sample entry #{index}: {reason}")]
    Invalid { index: usize, reason: String },
    #[error("duplicate sample id '{0}'")]
    DuplicateId(String),
}

/// Immutable, ordered collection of samples plus the directory readmes resolve against.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    samples: Vec<Sample>,
    base_dir: PathBuf,
}

impl Catalog {
    /// What: Read and validate a manifest file.
    ///
    /// Inputs:
    /// - `path`: Manifest location; its parent directory becomes the readme base.
    ///
    /// Output:
    /// - `Ok(Catalog)` or a `CatalogError` describing the first problem found.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let body = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let catalog = Self::from_json_str(&body, base_dir)?;
        tracing::info!(
            path = %path.display(),
            samples = catalog.samples.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// What: Build a catalog from manifest text.
    ///
    /// Inputs:
    /// - `body`: Manifest JSON.
    /// - `base_dir`: Directory readme references are relative to.
    ///
    /// Output:
    /// - Samples ordered by category (manifest order) then top-level entries.
    ///
    /// Details:
    /// - `name` and `id` are required and must be non-blank; ids must be unique.
    /// - Dependency tags are trimmed, blanks dropped, duplicates removed keeping the first.
    pub fn from_json_str(body: &str, base_dir: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let raw: RawManifest = serde_json::from_str(body)?;
        let mut entries: Vec<(Option<String>, RawSample)> = Vec::new();
        for cat in raw.categories {
            let cat_name = Some(cat.name.trim().to_string()).filter(|n| !n.is_empty());
            entries.extend(cat.samples.into_iter().map(|s| (cat_name.clone(), s)));
        }
        entries.extend(raw.samples.into_iter().map(|s| (None, s)));

        let mut seen_ids = HashSet::new();
        let mut samples = Vec::with_capacity(entries.len());
        for (index, (category, rs)) in entries.into_iter().enumerate() {
            let sample = into_sample(index, category, rs)?;
            if !seen_ids.insert(sample.id.clone()) {
                return Err(CatalogError::DuplicateId(sample.id));
            }
            samples.push(sample);
        }
        if samples.is_empty() {
            tracing::warn!("manifest lists no samples");
        }
        Ok(Self {
            samples,
            base_dir: base_dir.into(),
        })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Resolve a sample's readme reference against `base_dir`.
pub fn readme_path(base_dir: &Path, sample: &Sample) -> Option<PathBuf> {
    sample.readme.as_ref().map(|r| base_dir.join(r))
}

fn into_sample(
    index: usize,
    category: Option<String>,
    rs: RawSample,
) -> Result<Sample, CatalogError> {
    let name = rs.name.trim().to_string();
    if name.is_empty() {
        return Err(CatalogError::Invalid {
            index,
            reason: "missing name".into(),
        });
    }
    let id = rs.id.trim().to_string();
    if id.is_empty() {
        return Err(CatalogError::Invalid {
            index,
            reason: format!("sample '{name}' has no id"),
        });
    }
    let mut seen = HashSet::new();
    let dependencies = rs
        .dependencies
        .into_iter()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty() && seen.insert(d.clone()))
        .collect();
    Ok(Sample {
        name,
        description: rs.description.trim().to_string(),
        id,
        dependencies,
        readme: rs.readme.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()),
        category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "categories": [
            { "name": "Maps", "samples": [
                { "name": "Display a map", "id": "display-map", "readme": "readmes/map.md" },
                { "name": "Offline basemap", "id": "offline-basemap",
                  "description": " Use a local tile package ",
                  "dependencies": ["tpk", " tpk", "", "style", "tpk"] }
            ]},
            { "name": "  ", "samples": [ { "name": "Scene", "id": "scene" } ] }
        ],
        "samples": [ { "name": "KML layer", "id": "kml", "dependencies": ["kmz"] } ]
    }"#;

    #[test]
    /// What: Flatten categories and top-level entries in manifest order.
    ///
    /// Inputs:
    /// - Manifest with two categories (one blank-named) and one top-level sample.
    ///
    /// Output:
    /// - Four samples in order; categories attached; dependency tags deduplicated.
    fn manifest_flattens_in_order_and_normalises_fields() {
        let c = Catalog::from_json_str(MANIFEST, "/data").unwrap();
        let ids: Vec<&str> = c.samples().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["display-map", "offline-basemap", "scene", "kml"]);
        let offline = &c.samples()[1];
        assert_eq!(offline.dependencies, vec!["tpk", "style"]);
        assert_eq!(offline.description, "Use a local tile package");
        assert_eq!(offline.category.as_deref(), Some("Maps"));
        assert_eq!(c.samples()[2].category, None);
        assert_eq!(c.samples()[3].category, None);
        assert_eq!(
            readme_path(c.base_dir(), &c.samples()[0]),
            Some(PathBuf::from("/data/readmes/map.md"))
        );
        assert_eq!(readme_path(c.base_dir(), &c.samples()[3]), None);
    }

    #[test]
    fn missing_id_and_duplicates_are_rejected() {
        let err = Catalog::from_json_str(r#"{"samples":[{"name":"A","id":" "}]}"#, ".").unwrap_err();
        assert!(matches!(err, CatalogError::Invalid { index: 0, .. }));
        let err = Catalog::from_json_str(
            r#"{"samples":[{"name":"A","id":"a"},{"name":"B","id":"a"}]}"#,
            ".",
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(ref id) if id == "a"));
        let err = Catalog::from_json_str("{ not json", ".").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn load_reports_io_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("catalog.json");
        let err = Catalog::load(&missing).unwrap_err();
        assert!(err.to_string().contains("catalog.json"));

        std::fs::write(&missing, r#"{"samples":[{"name":"A","id":"a"}]}"#).unwrap();
        let c = Catalog::load(&missing).unwrap();
        assert_eq!(c.len(), 1);
        assert_eq!(c.base_dir(), dir.path());
        assert!(Catalog::from_json_str("{}", ".").unwrap().is_empty());
    }
}
