//! Table storage and persistence
//!
//! Save and load reconstruction tables using the safetensors format.
//!
//! ## Layout
//!
//! ```text
//! <base>/<key digest prefix>.safetensors
//!     tensor  "pointers"  f64 [W·H, d]
//!     header  dimension, width, height, delta, samples_per_axis,
//!             basis_fingerprint, created_at
//! ```

use super::registry::TableKey;
use super::{ReconstructionTable, TableParams};
use crate::algebra::SemanticPointer;
use crate::basis::BasisPair;
use crate::{Result, SspError};
use chrono::Utc;
use safetensors::tensor::TensorView;
use safetensors::SafeTensors;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

const POINTERS_TENSOR: &str = "pointers";

/// Store for persisting and loading reconstruction tables
pub struct TableStore {
    /// Base directory for table files
    base_path: PathBuf,
}

impl TableStore {
    /// Create a new table store at the given base path
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// File that holds the table for `key`
    pub fn path_for(&self, key: &TableKey) -> PathBuf {
        self.base_path
            .join(format!("{}.safetensors", &key.digest()[..16]))
    }

    pub fn contains(&self, basis: &BasisPair, params: &TableParams) -> bool {
        self.path_for(&TableKey::new(basis, params)).exists()
    }

    /// Save a table, returning the file it was written to
    pub fn save(&self, table: &ReconstructionTable) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.base_path).map_err(SspError::Io)?;

        let key = TableKey::of_table(table);
        let path = self.path_for(&key);
        let params = table.params();

        let data: Vec<f64> = table
            .pointers()
            .iter()
            .flat_map(|p| p.as_slice().iter().copied())
            .collect();
        let view = TensorView::new(
            safetensors::tensor::Dtype::F64,
            vec![params.cell_count(), table.dimension()],
            bytemuck::cast_slice(&data),
        )
        .map_err(|e| SspError::Serialization(e.to_string()))?;

        let metadata: HashMap<String, String> = [
            ("dimension", table.dimension().to_string()),
            ("width", params.width.to_string()),
            ("height", params.height.to_string()),
            ("delta", params.delta.to_string()),
            ("samples_per_axis", params.samples_per_axis.to_string()),
            ("basis_fingerprint", table.basis_fingerprint().to_string()),
            ("created_at", Utc::now().to_rfc3339()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let tensors: HashMap<String, TensorView> = [(POINTERS_TENSOR.to_string(), view)].into();
        safetensors::serialize_to_file(tensors, &Some(metadata), &path)
            .map_err(|e| SspError::Serialization(e.to_string()))?;

        debug!("Saved reconstruction table to {}", path.display());
        Ok(path)
    }

    /// Load the table for `(basis, params)` if one has been saved
    pub fn load(
        &self,
        basis: &BasisPair,
        params: &TableParams,
    ) -> Result<Option<ReconstructionTable>> {
        let key = TableKey::new(basis, params);
        let path = self.path_for(&key);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = std::fs::read(&path).map_err(SspError::Io)?;
        let (_, header) = SafeTensors::read_metadata(&bytes)
            .map_err(|e| SspError::Serialization(e.to_string()))?;
        let metadata = header
            .metadata()
            .as_ref()
            .ok_or_else(|| SspError::Serialization(format!("{}: missing metadata", path.display())))?;

        let field = |name: &str| {
            metadata.get(name).map(String::as_str).ok_or_else(|| {
                SspError::Serialization(format!("{}: missing '{}'", path.display(), name))
            })
        };
        if field("basis_fingerprint")? != basis.fingerprint()
            || field("dimension")? != basis.dimension().to_string()
        {
            return Err(SspError::Serialization(format!(
                "{} does not belong to this basis",
                path.display()
            )));
        }

        let tensors = SafeTensors::deserialize(&bytes)
            .map_err(|e| SspError::Serialization(e.to_string()))?;
        let view = tensors
            .tensor(POINTERS_TENSOR)
            .map_err(|e| SspError::Serialization(e.to_string()))?;

        let dimension = basis.dimension();
        if view.shape() != [params.cell_count(), dimension] {
            return Err(SspError::Serialization(format!(
                "{}: unexpected shape {:?}",
                path.display(),
                view.shape()
            )));
        }

        // The buffer carries no alignment guarantee, so decode bytewise
        let values: Vec<f64> = view
            .data()
            .chunks_exact(8)
            .map(|chunk| {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(chunk);
                f64::from_le_bytes(raw)
            })
            .collect();
        let pointers = values
            .chunks_exact(dimension)
            .map(|row| SemanticPointer::from_raw(row.to_vec()))
            .collect();

        debug!("Loaded reconstruction table from {}", path.display());
        ReconstructionTable::from_parts(*params, dimension, basis.fingerprint().to_string(), pointers)
            .map(Some)
    }

    /// Load a saved table, or build and save it
    pub fn load_or_build(
        &self,
        basis: &BasisPair,
        params: &TableParams,
    ) -> Result<ReconstructionTable> {
        if let Some(table) = self.load(basis, params)? {
            return Ok(table);
        }
        let table = ReconstructionTable::build(basis, *params)?;
        self.save(&table)?;
        Ok(table)
    }
}
