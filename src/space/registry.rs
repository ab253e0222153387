//! Pre-finalization bookkeeping for declared configuration fields. The
//! registry records name/width pairs and rejects misuse early; it holds no
//! layout information and triggers no backend activity.

use ahash::AHashMap;

use super::error::{ConfigError, ConfigResult};

/// Declared-but-unpacked configuration fields, keyed by name.
///
/// Iteration order over the backing map is irrelevant: the bin packer sorts
/// names before packing, so the final layout depends only on the set of
/// `(name, width)` pairs.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    fields: AHashMap<String, u32>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Record one field. Width bounds are validated here so callers hear
    /// about an unpackable field at the declaration site, not at finalize.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        width: u32,
        data_width: u32,
    ) -> ConfigResult<()> {
        let name = name.into();
        if width == 0 {
            return Err(ConfigError::ZeroWidthField { name });
        }
        if width > data_width {
            return Err(ConfigError::FieldTooWide {
                name,
                width,
                data_width,
            });
        }
        if self.fields.contains_key(&name) {
            return Err(ConfigError::DuplicateField { name });
        }
        self.fields.insert(name, width);
        Ok(())
    }

    /// Consume all declarations, handing them to the packer exactly once.
    pub fn drain(&mut self) -> Vec<(String, u32)> {
        self.fields.drain().collect()
    }
}
