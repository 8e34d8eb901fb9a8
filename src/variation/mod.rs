//! Variation operators.
//!
//! Every operator implements [`Variation`]: it borrows its parents and
//! returns freshly cloned, modified children. Operators are composed into
//! pipelines with [`CompoundVariation`] or into a self-tuning portfolio with
//! [`AdaptiveMultimethodVariation`].
//!
//! # Primitives
//!
//! | name | type | encoding |
//! |------|------|----------|
//! | [`Sbx`] | crossover | real |
//! | [`PolynomialMutation`] | mutation | real |
//! | [`UniformMutation`] | mutation | real, integer |
//! | [`Pcx`], [`Undx`], [`Spx`] | multi-parent crossover | real |
//! | [`DifferentialEvolution`] | 4-parent crossover | real |
//! | [`Hux`] | crossover | binary |
//! | [`BitFlip`] | mutation | binary |
//! | [`Pmx`] | crossover | permutation |
//! | [`SwapMutation`] | mutation | permutation |
//! | [`InsertionMutation`] | mutation | permutation |
//! | [`SubsetCrossover`] | crossover | subset |
//! | [`ReplaceMutation`] | mutation | subset |
//! | [`OnePointCrossover`], [`TwoPointCrossover`], [`UniformCrossover`] | crossover | any |
//!
//! Operators skip loci whose encoding they do not handle.
//!
//! # Building from names
//!
//! [`OperatorRegistry`] builds operators from names such as `"sbx+pm"` and
//! [`Properties`](crate::config::Properties) such as `sbx.rate=0.9`.
//!
//! # References
//!
//! - Deb & Agrawal (1995), "Simulated Binary Crossover for Continuous Search Space"
//! - Eshelman (1991), "The CHC Adaptive Search Algorithm"
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"
//! - Deb, Anand & Joshi (2002), "A Computationally Efficient Evolutionary
//!   Algorithm for Real-Parameter Optimization"

mod adaptive;
mod binary;
mod compound;
mod generic;
mod multiparent;
mod permutation;
mod real;
mod registry;
mod subset;
mod types;

pub use adaptive::{AdaptiveConfig, AdaptiveMultimethodVariation, DEFAULT_UPDATE_WINDOW};
pub use binary::{BitFlip, Hux};
pub use compound::CompoundVariation;
pub use generic::{OnePointCrossover, TwoPointCrossover, UniformCrossover};
pub use multiparent::{DifferentialEvolution, Pcx, Spx, Undx};
pub use permutation::{InsertionMutation, Pmx, SwapMutation};
pub use real::{PolynomialMutation, Sbx, UniformMutation};
pub use registry::{OperatorFactory, OperatorRegistry};
pub use subset::{ReplaceMutation, SubsetCrossover};
pub use types::{Variation, VariationKind};
