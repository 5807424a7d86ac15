//! Serde shapes of the manifest file.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawManifest {
    #[serde(default)]
    pub categories: Vec<RawCategory>,
    #[serde(default)]
    pub samples: Vec<RawSample>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawCategory {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub samples: Vec<RawSample>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawSample {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "storyboard")]
    pub id: String,
    #[serde(default, alias = "tags")]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub readme: Option<String>,
}
