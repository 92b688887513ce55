//! Object-presence encoder
//!
//! Every visible object category becomes one bound term:
//!
//! ```text
//! M = Σ_obj  normalize( Σ_{(i,j) holds obj} T[i,j] )  ⊛  vocab[OBJ]
//! ```
//!
//! Cells are grouped by object id first, so the cost is one accumulation per
//! qualifying cell plus one bind per category present.

use super::{check_basis, EncodedObservation, ObservationEncoder};
use crate::algebra::{bind, normalize, similarity, superpose_all, SemanticPointer};
use crate::basis::BasisPair;
use crate::config::EncoderConfig;
use crate::grid::{GridState, ObservationGrid, RawObservation, SymbolTable, SymbolTables};
use crate::reconstruction::{ReconstructionTable, TableRegistry};
use crate::space::SspSpace;
use crate::vocab::Vocabulary;
use crate::{Result, SspError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Categories that carry no information about the scene
const IGNORED_OBJECTS: [&str; 3] = ["unseen", "empty", "floor"];

pub struct ObjectPresenceEncoder {
    basis: Arc<BasisPair>,
    table: Arc<ReconstructionTable>,
    vocab: Vocabulary,
    objects: SymbolTable,
    ignored: Vec<u8>,
    space_radius: f64,
}

impl ObjectPresenceEncoder {
    /// Build an encoder, sharing the reconstruction table through the
    /// process-wide [`TableRegistry`]
    pub fn new(config: &EncoderConfig, basis: Arc<BasisPair>, symbols: &SymbolTables) -> Result<Self> {
        check_basis(config, &basis)?;
        let table = TableRegistry::global().get_or_build(&basis, config.table_params())?;
        Self::with_table(config, basis, table, symbols)
    }

    /// Build an encoder around an existing table
    pub fn with_table(
        config: &EncoderConfig,
        basis: Arc<BasisPair>,
        table: Arc<ReconstructionTable>,
        symbols: &SymbolTables,
    ) -> Result<Self> {
        check_basis(config, &basis)?;
        if !table.matches(&basis, &config.table_params()) {
            return Err(SspError::Configuration(
                "Reconstruction table was built for a different basis or view".into(),
            ));
        }

        let mut vocab = Vocabulary::new(config.dimension, config.seed.wrapping_add(1))?;
        vocab.populate(
            symbols
                .colors
                .names()
                .chain(symbols.objects.names())
                .map(str::to_uppercase),
        )?;
        let vocab = vocab.with_specials()?;

        let ignored = IGNORED_OBJECTS
            .iter()
            .filter_map(|name| symbols.objects.id(name).ok())
            .collect();

        Ok(Self {
            basis,
            table,
            vocab,
            objects: symbols.objects.clone(),
            ignored,
            space_radius: config.space_radius,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn table(&self) -> &Arc<ReconstructionTable> {
        &self.table
    }

    pub fn basis(&self) -> &Arc<BasisPair> {
        &self.basis
    }

    /// Encode the view grid into one pointer; the zero vector when no
    /// qualifying object is visible
    pub fn encode_image(&self, image: &ObservationGrid) -> Result<SemanticPointer> {
        if image.width() != self.table.width() {
            return Err(SspError::DimensionMismatch {
                expected: self.table.width(),
                actual: image.width(),
            });
        }
        if image.height() != self.table.height() {
            return Err(SspError::DimensionMismatch {
                expected: self.table.height(),
                actual: image.height(),
            });
        }

        let dim = self.table.dimension();
        let mut sums: BTreeMap<u8, Vec<f64>> = BTreeMap::new();
        for (i, j, [object, _, _]) in image.iter() {
            if self.ignored.contains(&object) {
                continue;
            }
            let Some(cell) = self.table.get(i, j) else {
                continue;
            };
            let sum = sums.entry(object).or_insert_with(|| vec![0.0; dim]);
            for (acc, v) in sum.iter_mut().zip(cell.as_slice()) {
                *acc += v;
            }
        }

        let mut terms = Vec::with_capacity(sums.len());
        for (object, sum) in sums {
            let name = self.objects.name(object)?.to_uppercase();
            let spatial = normalize(&SemanticPointer::from_raw(sum));
            terms.push(bind(&spatial, self.vocab.lookup(&name)?)?);
        }
        superpose_all(terms.iter(), dim)
    }

    /// Rank every vocabulary symbol by how strongly `image` holds it at
    /// relative cell `(i, j)`, best first
    pub fn decode_cell(&self, image: &SemanticPointer, i: usize, j: usize) -> Result<Vec<(String, f64)>> {
        let cell = self.table.get(i, j).ok_or_else(|| {
            SspError::Configuration(format!(
                "Cell ({}, {}) outside {}x{} view",
                i,
                j,
                self.table.width(),
                self.table.height()
            ))
        })?;

        let mut ranked = self
            .vocab
            .iter()
            .map(|(symbol, vector)| -> Result<(String, f64)> {
                let query = bind(cell, vector)?;
                Ok((symbol.to_string(), similarity(image, &query)?))
            })
            .collect::<Result<Vec<_>>>()?;
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(ranked)
    }
}

impl ObservationEncoder for ObjectPresenceEncoder {
    fn encode(&mut self, raw: &RawObservation, _state: &dyn GridState) -> Result<EncodedObservation> {
        let image = self.encode_image(&raw.image)?;
        Ok(EncodedObservation::new(raw.mission.clone(), image))
    }

    fn dimension(&self) -> usize {
        self.table.dimension()
    }

    fn observation_space(&self) -> Result<SspSpace> {
        SspSpace::new(Arc::clone(&self.basis), self.space_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::superpose;
    use crate::grid::OBJECT_NAMES;

    const EMPTY: [u8; 3] = [1, 0, 0];
    const KEY: u8 = 5;
    const BALL: u8 = 6;
    const WALL: u8 = 2;

    fn small_encoder(seed: u64) -> ObjectPresenceEncoder {
        let config = EncoderConfig::default()
            .with_dimension(128)
            .with_view(5, 5)
            .with_samples_per_axis(10)
            .with_seed(seed);
        let basis = Arc::new(BasisPair::from_seed(128, seed).unwrap());
        ObjectPresenceEncoder::new(&config, basis, &SymbolTables::minigrid()).unwrap()
    }

    #[test]
    fn test_vocabulary_contents() {
        let encoder = small_encoder(1);
        let vocab = encoder.vocabulary();
        for name in ["RED", "GREY", "KEY", "GOAL", "AGENT", "NULL", "OPEN"] {
            assert!(vocab.contains(name), "missing {}", name);
        }
        assert_eq!(vocab.len(), 6 + OBJECT_NAMES.len() + 2);
    }

    #[test]
    fn test_empty_grid_is_zero() {
        let encoder = small_encoder(2);
        let empty = ObservationGrid::filled(5, 5, EMPTY);
        assert!(encoder.encode_image(&empty).unwrap().is_zero());

        let mut mixed = ObservationGrid::filled(5, 5, [0, 0, 0]);
        mixed.set(1, 1, EMPTY).unwrap();
        mixed.set(2, 2, [3, 0, 0]).unwrap();
        assert!(encoder.encode_image(&mixed).unwrap().is_zero());
    }

    #[test]
    fn test_single_object_matches_bound_cell() {
        let encoder = small_encoder(3);
        let mut grid = ObservationGrid::filled(5, 5, EMPTY);
        grid.set(1, 3, [KEY, 2, 0]).unwrap();

        let image = encoder.encode_image(&grid).unwrap();
        let expected = bind(
            encoder.table().get(1, 3).unwrap(),
            encoder.vocabulary().lookup("KEY").unwrap(),
        )
        .unwrap();
        assert!((similarity(&image, &expected).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_object_outranks_every_other_symbol() {
        let encoder = small_encoder(4);
        let mut grid = ObservationGrid::filled(5, 5, EMPTY);
        grid.set(2, 2, [BALL, 0, 0]).unwrap();

        let image = encoder.encode_image(&grid).unwrap();
        let ranked = encoder.decode_cell(&image, 2, 2).unwrap();
        assert_eq!(ranked[0].0, "BALL");
        assert!(ranked[1..].iter().all(|(_, s)| *s < ranked[0].1));
    }

    #[test]
    fn test_objects_grouped_by_category() {
        let encoder = small_encoder(5);
        let mut grid = ObservationGrid::filled(5, 5, EMPTY);
        grid.set(0, 0, [WALL, 5, 0]).unwrap();
        grid.set(0, 1, [WALL, 5, 0]).unwrap();
        grid.set(4, 4, [KEY, 0, 0]).unwrap();

        let image = encoder.encode_image(&grid).unwrap();

        let table = encoder.table();
        let mut walls = table.get(0, 0).unwrap().as_slice().to_vec();
        for (w, v) in walls.iter_mut().zip(table.get(0, 1).unwrap().as_slice()) {
            *w += v;
        }
        let vocab = encoder.vocabulary();
        let wall_term = bind(
            &normalize(&SemanticPointer::new(walls).unwrap()),
            vocab.lookup("WALL").unwrap(),
        )
        .unwrap();
        let key_term = bind(table.get(4, 4).unwrap(), vocab.lookup("KEY").unwrap()).unwrap();
        let expected = superpose(&wall_term, &key_term).unwrap();

        for (a, b) in image.as_slice().iter().zip(expected.as_slice()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_wrong_grid_size_rejected() {
        let encoder = small_encoder(6);
        let grid = ObservationGrid::filled(7, 5, EMPTY);
        assert!(matches!(
            encoder.encode_image(&grid),
            Err(SspError::DimensionMismatch { expected: 5, actual: 7 })
        ));
    }

    #[test]
    fn test_unknown_object_id_surfaces() {
        let encoder = small_encoder(7);
        let mut grid = ObservationGrid::filled(5, 5, EMPTY);
        grid.set(0, 0, [42, 0, 0]).unwrap();
        assert!(matches!(
            encoder.encode_image(&grid),
            Err(SspError::UnknownSymbol(_))
        ));
    }

    #[test]
    fn test_decode_cell_out_of_view() {
        let encoder = small_encoder(8);
        let image = SemanticPointer::zeros(128);
        assert!(encoder.decode_cell(&image, 5, 0).is_err());
    }

    #[test]
    fn test_shared_table_across_encoders() {
        let a = small_encoder(9);
        let b = small_encoder(9);
        assert!(Arc::ptr_eq(a.table(), b.table()));
    }

    #[test]
    fn test_with_table_rejects_foreign_table() {
        let config = EncoderConfig::default()
            .with_dimension(32)
            .with_view(3, 3)
            .with_samples_per_axis(4);
        let basis = Arc::new(BasisPair::from_seed(32, 1).unwrap());
        let other = BasisPair::from_seed(32, 2).unwrap();
        let table = Arc::new(ReconstructionTable::build(&other, config.table_params()).unwrap());

        assert!(matches!(
            ObjectPresenceEncoder::with_table(&config, basis, table, &SymbolTables::minigrid()),
            Err(SspError::Configuration(_))
        ));
    }

    /// d = 256, 7×7 view, one key at (3, 3), everything else empty
    #[test]
    fn test_key_decodes_with_clear_margin() {
        let config = EncoderConfig::default().with_seed(42);
        let basis = Arc::new(BasisPair::from_seed(config.dimension, config.seed).unwrap());
        let encoder = ObjectPresenceEncoder::new(&config, basis, &SymbolTables::minigrid()).unwrap();

        let mut grid = ObservationGrid::filled(7, 7, EMPTY);
        grid.set(3, 3, [KEY, 0, 0]).unwrap();

        let image = encoder.encode_image(&grid).unwrap();
        assert_eq!(image.dimension(), 256);

        let ranked = encoder.decode_cell(&image, 3, 3).unwrap();
        let (top, top_score) = &ranked[0];
        let (_, runner_up) = &ranked[1];
        assert_eq!(top, "KEY");
        assert!(
            *top_score >= 2.0 * runner_up,
            "KEY {} vs next {}",
            top_score,
            runner_up
        );
    }
}
