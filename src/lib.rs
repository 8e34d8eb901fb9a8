//! Multi-objective evolutionary algorithm core.
//!
//! Provides the two pieces every MOEA main loop is built around:
//!
//! - **Variation**: crossover and mutation operators behind one
//!   [`Variation`](variation::Variation) trait, composed into pipelines
//!   ([`CompoundVariation`](variation::CompoundVariation)) or into a
//!   self-tuning operator portfolio
//!   ([`AdaptiveMultimethodVariation`](variation::AdaptiveMultimethodVariation)).
//! - **Archives**: incrementally maintained Pareto fronts
//!   ([`NondominatedPopulation`](archive::NondominatedPopulation)) and
//!   epsilon-box archives
//!   ([`EpsilonBoxDominanceArchive`](archive::EpsilonBoxDominanceArchive)).
//!
//! Operators can be built by name (`"sbx+pm"`) from
//! [`Properties`](config::Properties) through the
//! [`OperatorRegistry`](variation::OperatorRegistry).
//!
//! # Architecture
//!
//! All objectives are minimized. Randomness is always injected as
//! `&mut dyn RngCore`, so every run is reproducible from a seed
//! ([`random::create_rng`]). The search loop itself (selection,
//! termination, restarts) is left to the caller.
//!
//! # Example
//!
//! ```
//! use u_moea::archive::NondominatedPopulation;
//! use u_moea::config::Properties;
//! use u_moea::random::create_rng;
//! use u_moea::solution::{Solution, Variable};
//! use u_moea::variation::OperatorRegistry;
//!
//! let mut rng = create_rng(42);
//! let variation = OperatorRegistry::default()
//!     .build("sbx+pm", &Properties::new(), 2)
//!     .unwrap();
//!
//! let parent = |x: f64| Solution::new(vec![Variable::real(x, 0.0, 1.0); 2], 2, 0);
//! let mut children = variation.evolve(&[parent(0.2), parent(0.8)], &mut rng).unwrap();
//!
//! let mut archive = NondominatedPopulation::new();
//! for child in &mut children {
//!     let x = child.variable(0).as_real().unwrap();
//!     child.set_objective(0, x);
//!     child.set_objective(1, 1.0 - x);
//! }
//! archive.add_all(children);
//! assert!(!archive.is_empty());
//! ```

pub mod archive;
pub mod config;
pub mod dominance;
pub mod error;
pub mod problem;
pub mod random;
pub mod solution;
pub mod variation;

pub use error::{MoeaError, Result};
