use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{RetrofxError, RetrofxResult};
use crate::layer::kind::{EffectKind, OptionValue};
use crate::layer::options::EffectOptions;

/// Stack-unique layer identifier; allocated monotonically and never reused within one stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub u64);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

/// One entry in the effect stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectLayer {
    /// Identifier.
    pub id: LayerId,
    /// Disabled layers are skipped entirely.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Strength multiplier in `[0, 1]`, interpreted per kind.
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    /// Position in the stack; dense `0..k` after every mutation.
    #[serde(default)]
    pub order: u32,
    /// Kind-specific options; the variant determines the kind.
    pub options: EffectOptions,
}

fn default_enabled() -> bool {
    true
}

fn default_intensity() -> f32 {
    1.0
}

impl EffectLayer {
    /// A detached, enabled layer at full intensity.
    pub fn new(id: LayerId, options: EffectOptions) -> Self {
        Self {
            id,
            enabled: true,
            intensity: 1.0,
            order: 0,
            options,
        }
    }

    /// Kind, derived from the options variant.
    pub fn kind(&self) -> EffectKind {
        self.options.kind()
    }

    /// Builder-style intensity setter (clamped to `[0, 1]`).
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = clamp_intensity(intensity);
        self
    }

    /// Builder-style enabled setter.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder-style option setter.
    pub fn with_option(mut self, key: &str, value: impl Into<OptionValue>) -> RetrofxResult<Self> {
        self.options.set(key, &value.into())?;
        Ok(self)
    }
}

fn clamp_intensity(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

/// Result of [`EffectStack::remove`].
#[derive(Clone, Debug, PartialEq)]
pub struct Removed {
    /// The layer that left the stack.
    pub layer: EffectLayer,
    /// `true` when the removed layer was the one being edited; the caller should close any
    /// editor bound to it.
    pub cleared_editing: bool,
}

/// Ordered, mutable list of effect layers.
///
/// Layers are kept sorted by `order` and every mutator re-numbers `order` to `0..len`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectStack {
    layers: Vec<EffectLayer>,
    #[serde(default)]
    next_id: u64,
    #[serde(skip)]
    editing: Option<LayerId>,
}

impl EffectStack {
    /// Empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer of `kind` with its default options; returns the new id.
    pub fn append(&mut self, kind: EffectKind) -> LayerId {
        self.append_with(EffectOptions::defaults_of(kind))
    }

    /// Append a layer with explicit options.
    pub fn append_with(&mut self, options: EffectOptions) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.layers.push(EffectLayer::new(id, options));
        self.renumber();
        id
    }

    /// Remove a layer.
    pub fn remove(&mut self, id: LayerId) -> RetrofxResult<Removed> {
        let idx = self.position(id)?;
        let layer = self.layers.remove(idx);
        let cleared_editing = self.editing == Some(id);
        if cleared_editing {
            self.editing = None;
        }
        self.renumber();
        Ok(Removed {
            layer,
            cleared_editing,
        })
    }

    /// Enable or disable a layer.
    pub fn set_enabled(&mut self, id: LayerId, enabled: bool) -> RetrofxResult<()> {
        self.get_mut(id)?.enabled = enabled;
        Ok(())
    }

    /// Set intensity; values outside `[0, 1]` are clamped and non-finite values become 0.
    pub fn set_intensity(&mut self, id: LayerId, intensity: f32) -> RetrofxResult<()> {
        self.get_mut(id)?.intensity = clamp_intensity(intensity);
        Ok(())
    }

    /// Set one kind-specific option.
    pub fn set_option(&mut self, id: LayerId, key: &str, value: impl Into<OptionValue>) -> RetrofxResult<()> {
        self.get_mut(id)?.options.set(key, &value.into())
    }

    /// Move a layer one position earlier in application order. Returns `false` at the top.
    pub fn move_up(&mut self, id: LayerId) -> RetrofxResult<bool> {
        let idx = self.position(id)?;
        if idx == 0 {
            return Ok(false);
        }
        self.layers.swap(idx, idx - 1);
        self.renumber();
        Ok(true)
    }

    /// Move a layer one position later in application order. Returns `false` at the bottom.
    pub fn move_down(&mut self, id: LayerId) -> RetrofxResult<bool> {
        let idx = self.position(id)?;
        if idx + 1 >= self.layers.len() {
            return Ok(false);
        }
        self.layers.swap(idx, idx + 1);
        self.renumber();
        Ok(true)
    }

    /// Layers in ascending `order`.
    pub fn sorted_layers(&self) -> &[EffectLayer] {
        &self.layers
    }

    /// Enabled layers in ascending `order`.
    pub fn enabled_layers(&self) -> impl Iterator<Item = &EffectLayer> {
        self.layers.iter().filter(|l| l.enabled)
    }

    /// Look up a layer.
    pub fn get(&self, id: LayerId) -> Option<&EffectLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// `true` when the stack has no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Mark a layer as the one currently open in an editor.
    pub fn begin_editing(&mut self, id: LayerId) -> RetrofxResult<()> {
        self.position(id)?;
        self.editing = Some(id);
        Ok(())
    }

    /// Clear the editing reference.
    pub fn end_editing(&mut self) {
        self.editing = None;
    }

    /// The layer currently open in an editor, if any.
    pub fn editing(&self) -> Option<LayerId> {
        self.editing
    }

    /// Parse a stack from JSON, validating ids and re-normalizing `order`.
    pub fn from_json(json: &str) -> RetrofxResult<Self> {
        let mut stack: Self = serde_json::from_str(json)
            .map_err(|e| RetrofxError::validation(format!("invalid effect stack json: {e}")))?;
        stack.layers.sort_by_key(|l| l.order);
        let mut ids: Vec<u64> = stack.layers.iter().map(|l| l.id.0).collect();
        ids.sort_unstable();
        if ids.windows(2).any(|w| w[0] == w[1]) {
            return Err(RetrofxError::validation("effect stack has duplicate layer ids"));
        }
        let min_next = ids.last().map_or(0, |m| m + 1);
        stack.next_id = stack.next_id.max(min_next);
        for l in &mut stack.layers {
            l.intensity = clamp_intensity(l.intensity);
        }
        stack.renumber();
        Ok(stack)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> RetrofxResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| RetrofxError::Other(e.into()))
    }

    fn position(&self, id: LayerId) -> RetrofxResult<usize> {
        self.layers
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| RetrofxError::validation(format!("unknown {id}")))
    }

    fn get_mut(&mut self, id: LayerId) -> RetrofxResult<&mut EffectLayer> {
        let idx = self.position(id)?;
        Ok(&mut self.layers[idx])
    }

    fn renumber(&mut self) {
        for (i, l) in self.layers.iter_mut().enumerate() {
            l.order = i as u32;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/stack.rs"]
mod tests;
