//! # Semantic Vocabulary
//!
//! Named symbols mapped to semantic pointers. Populated symbols receive
//! independent random unit-norm vectors, so distinct symbols are only
//! approximately orthogonal and decoding is probabilistic.
//!
//! Two special entries are conventionally added explicitly:
//!
//! - `NULL`: the zero vector, "nothing here"
//! - `OPEN`: the binding identity, bind-neutral
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut vocab = Vocabulary::new(256, 0)?;
//! vocab.populate(["KEY", "BALL", "DOOR"])?;
//! vocab.add("NULL", SemanticPointer::zeros(256))?;
//!
//! let ranked = vocab.decode(&noisy_key)?;
//! assert_eq!(ranked[0].0, "KEY");
//! ```

use crate::algebra::{normalize, similarity, Algebra, HrrAlgebra, SemanticPointer};
use crate::basis::unitary_vector;
use crate::primitives::rows_to_tensor;
use crate::{Device, Result, SspError, Tensor};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name of the zero-vector entry
pub const NULL: &str = "NULL";

/// Name of the identity entry
pub const OPEN: &str = "OPEN";

/// How populated symbols get their vectors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerGen {
    /// Random unitary vectors (unit Fourier magnitude)
    #[default]
    Unitary,
    /// Normalized isotropic Gaussian vectors
    Gaussian,
}

impl PointerGen {
    fn draw(&self, dim: usize, rng: &mut ChaCha8Rng) -> SemanticPointer {
        match self {
            Self::Unitary => unitary_vector(dim, rng),
            Self::Gaussian => {
                let data: Vec<f64> = (0..dim)
                    .map(|_| -> f64 { StandardNormal.sample(&mut *rng) })
                    .collect();
                normalize(&SemanticPointer::from_raw(data))
            }
        }
    }
}

/// Symbol names are uppercase identifiers: `KEY`, `GOAL_2`, `NULL`
fn validate_symbol(symbol: &str) -> Result<()> {
    let mut chars = symbol.chars();
    let valid_start = chars.next().is_some_and(|c| c.is_ascii_uppercase());
    let valid_rest = chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');

    if valid_start && valid_rest {
        Ok(())
    } else {
        Err(SspError::Configuration(format!(
            "Invalid symbol name '{}': expected an uppercase identifier",
            symbol
        )))
    }
}

/// Ordered symbol → pointer mapping
#[derive(Debug, Clone)]
pub struct Vocabulary {
    dimension: usize,
    generator: PointerGen,
    rng: ChaCha8Rng,
    keys: Vec<String>,
    vectors: Vec<SemanticPointer>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Create an empty vocabulary of the given dimension
    pub fn new(dimension: usize, seed: u64) -> Result<Self> {
        if dimension == 0 {
            return Err(SspError::Configuration(
                "Vocabulary dimension must be positive".into(),
            ));
        }
        Ok(Self {
            dimension,
            generator: PointerGen::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            keys: Vec::new(),
            vectors: Vec::new(),
            index: HashMap::new(),
        })
    }

    /// Use a different pointer generator for subsequent `populate` calls
    pub fn with_generator(mut self, generator: PointerGen) -> Self {
        self.generator = generator;
        self
    }

    /// Add the conventional `NULL` (zero) and `OPEN` (identity) entries
    pub fn with_specials(mut self) -> Result<Self> {
        let alg = HrrAlgebra;
        self.add(NULL, alg.zero_element(self.dimension))?;
        self.add(OPEN, alg.identity_element(self.dimension))?;
        Ok(self)
    }

    /// Assign each symbol an independently drawn unit-norm vector
    pub fn populate<I, S>(&mut self, symbols: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for symbol in symbols {
            let vector = self.generator.draw(self.dimension, &mut self.rng);
            self.insert(symbol.as_ref(), vector)?;
        }
        Ok(())
    }

    /// Insert an explicit vector under `symbol`
    pub fn add(&mut self, symbol: &str, vector: SemanticPointer) -> Result<()> {
        if vector.dimension() != self.dimension {
            return Err(SspError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.dimension(),
            });
        }
        self.insert(symbol, vector)
    }

    fn insert(&mut self, symbol: &str, vector: SemanticPointer) -> Result<()> {
        validate_symbol(symbol)?;
        if self.index.contains_key(symbol) {
            return Err(SspError::Configuration(format!(
                "Symbol '{}' is already in the vocabulary",
                symbol
            )));
        }
        self.index.insert(symbol.to_string(), self.keys.len());
        self.keys.push(symbol.to_string());
        self.vectors.push(vector);
        Ok(())
    }

    /// Vector for `symbol`; absence is always an error
    pub fn lookup(&self, symbol: &str) -> Result<&SemanticPointer> {
        self.index
            .get(symbol)
            .map(|&i| &self.vectors[i])
            .ok_or_else(|| SspError::UnknownSymbol(symbol.to_string()))
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SemanticPointer)> {
        self.keys.iter().map(String::as_str).zip(self.vectors.iter())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Rank every entry by similarity to `pointer`, best first
    pub fn decode(&self, pointer: &SemanticPointer) -> Result<Vec<(String, f64)>> {
        let mut ranked = self
            .iter()
            .map(|(key, vector)| -> Result<(String, f64)> {
                Ok((key.to_string(), similarity(pointer, vector)?))
            })
            .collect::<Result<Vec<_>>>()?;
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(ranked)
    }

    /// All entries as an `(n, d)` matrix, in insertion order
    pub fn to_tensor(&self, device: &Device) -> Result<Tensor> {
        rows_to_tensor(self.vectors.iter().map(SemanticPointer::as_slice), self.dimension, device)
    }
}
