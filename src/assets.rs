//! Asset declarations and load tracking
//!
//! Games declare the images and sounds they want; the platform layer loads
//! them and reports back. A session only starts ticking once every declared
//! asset has settled (ready or failed). Failed assets are skipped at draw
//! time instead of stalling the game.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::ArcadeError;

/// Logical asset name, resolved by the platform to a drawable or playable resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AssetId(pub &'static str);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// What kind of resource an asset is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Sound,
}

/// A single declared asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetSpec {
    pub id: AssetId,
    pub url: &'static str,
    pub kind: AssetKind,
}

/// The list of assets a game needs before it can start
#[derive(Debug, Clone, Default)]
pub struct AssetManifest {
    specs: Vec<AssetSpec>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(mut self, id: AssetId, url: &'static str) -> Self {
        self.specs.push(AssetSpec {
            id,
            url,
            kind: AssetKind::Image,
        });
        self
    }

    pub fn sound(mut self, id: AssetId, url: &'static str) -> Self {
        self.specs.push(AssetSpec {
            id,
            url,
            kind: AssetKind::Sound,
        });
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Load status of one asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetStatus {
    Pending,
    Ready,
    Failed(String),
}

/// Load bookkeeping for every declared asset
#[derive(Debug, Clone, Default)]
pub struct Assets {
    status: BTreeMap<AssetId, AssetStatus>,
}

impl Assets {
    /// Start tracking a manifest; everything begins pending
    pub fn declare(manifest: &AssetManifest) -> Self {
        let status = manifest
            .iter()
            .map(|spec| (spec.id, AssetStatus::Pending))
            .collect();
        Self { status }
    }

    /// Every asset in the manifest marked ready (headless runs and tests)
    pub fn preloaded(manifest: &AssetManifest) -> Self {
        let status = manifest
            .iter()
            .map(|spec| (spec.id, AssetStatus::Ready))
            .collect();
        Self { status }
    }

    pub fn mark_ready(&mut self, id: AssetId) -> Result<(), ArcadeError> {
        let slot = self
            .status
            .get_mut(&id)
            .ok_or_else(|| ArcadeError::UnknownAsset(id.to_string()))?;
        *slot = AssetStatus::Ready;
        log::debug!("Asset ready: {}", id);
        Ok(())
    }

    pub fn mark_failed(&mut self, id: AssetId, reason: impl Into<String>) -> Result<(), ArcadeError> {
        let slot = self
            .status
            .get_mut(&id)
            .ok_or_else(|| ArcadeError::UnknownAsset(id.to_string()))?;
        let reason = reason.into();
        log::warn!("Asset {} failed to load ({}), drawing without it", id, reason);
        *slot = AssetStatus::Failed(reason);
        Ok(())
    }

    pub fn status(&self, id: AssetId) -> Option<&AssetStatus> {
        self.status.get(&id)
    }

    /// True if the asset loaded and can be drawn or played
    pub fn is_ready(&self, id: AssetId) -> bool {
        matches!(self.status.get(&id), Some(AssetStatus::Ready))
    }

    /// True once nothing is pending
    pub fn is_settled(&self) -> bool {
        self.status.values().all(|s| *s != AssetStatus::Pending)
    }

    pub fn pending(&self) -> impl Iterator<Item = AssetId> + '_ {
        self.status
            .iter()
            .filter(|(_, s)| **s == AssetStatus::Pending)
            .map(|(id, _)| *id)
    }

    pub fn failed(&self) -> impl Iterator<Item = (AssetId, &str)> + '_ {
        self.status.iter().filter_map(|(id, s)| match s {
            AssetStatus::Failed(reason) => Some((*id, reason.as_str())),
            _ => None,
        })
    }
}
