//! Builds operators from names and [`Properties`].
//!
//! A name is either a single operator (`"pm"`) or a `+`-separated pipeline
//! (`"sbx+pm"`), which yields a [`CompoundVariation`]. Parameters are read
//! from keys prefixed with the operator name, e.g. `sbx.rate`.

use super::binary::{BitFlip, Hux};
use super::compound::CompoundVariation;
use super::generic::{OnePointCrossover, TwoPointCrossover, UniformCrossover};
use super::multiparent::{DifferentialEvolution, Pcx, Spx, Undx};
use super::permutation::{InsertionMutation, Pmx, SwapMutation};
use super::real::{PolynomialMutation, Sbx, UniformMutation};
use super::subset::{ReplaceMutation, SubsetCrossover};
use super::types::Variation;
use crate::config::Properties;
use crate::error::{MoeaError, Result};
use crate::solution::{Solution, VariableKind};
use log::debug;
use std::collections::BTreeMap;

/// Constructs one operator from the properties and the number of decision
/// variables.
pub type OperatorFactory = fn(&Properties, usize) -> Result<Box<dyn Variation>>;

/// Name-to-factory table of variation operators.
///
/// [`OperatorRegistry::default`] knows every built-in operator:
///
/// | name        | keys (default)                                                  |
/// |-------------|-----------------------------------------------------------------|
/// | `sbx`       | `sbx.rate` (1.0), `sbx.distributionIndex` (15.0), `sbx.swap` (true) |
/// | `pm`        | `pm.rate` (1/n), `pm.distributionIndex` (20.0)                  |
/// | `um`        | `um.rate` (1/n)                                                 |
/// | `pcx`       | `pcx.parents` (10), `pcx.offspring` (2), `pcx.eta` (0.1), `pcx.zeta` (0.1) |
/// | `undx`      | `undx.parents` (10), `undx.offspring` (2), `undx.zeta` (0.5), `undx.eta` (0.35) |
/// | `spx`       | `spx.parents` (10), `spx.offspring` (2), `spx.epsilon` (3.0)    |
/// | `de`        | `de.crossoverRate` (0.1), `de.stepSize` (0.5)                   |
/// | `hux`       | `hux.rate` (1.0)                                                |
/// | `bf`        | `bf.rate` (0.01)                                                |
/// | `pmx`       | `pmx.rate` (1.0)                                                |
/// | `swap`      | `swap.rate` (0.3)                                               |
/// | `insertion` | `insertion.rate` (0.3)                                          |
/// | `ssx`       | `ssx.rate` (0.3)                                                |
/// | `replace`   | `replace.rate` (0.9)                                            |
/// | `1x` `2x` `ux` | `<name>.rate` (1.0)                                          |
///
/// `n` is the number of decision variables.
///
/// # Examples
///
/// ```
/// use u_moea::config::Properties;
/// use u_moea::variation::OperatorRegistry;
///
/// let registry = OperatorRegistry::default();
/// let props = Properties::new().with("pm.rate", 0.2);
/// let op = registry.build("sbx+pm", &props, 10).unwrap();
/// assert_eq!(op.name(), "sbx+pm");
/// assert_eq!(op.arity(), 2);
/// ```
#[derive(Clone)]
pub struct OperatorRegistry {
    factories: BTreeMap<String, OperatorFactory>,
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("sbx", build_sbx);
        registry.register("pm", build_pm);
        registry.register("um", build_um);
        registry.register("pcx", build_pcx);
        registry.register("undx", build_undx);
        registry.register("spx", build_spx);
        registry.register("de", build_de);
        registry.register("hux", build_hux);
        registry.register("bf", build_bf);
        registry.register("pmx", build_pmx);
        registry.register("swap", build_swap);
        registry.register("insertion", build_insertion);
        registry.register("ssx", build_ssx);
        registry.register("replace", build_replace);
        registry.register("1x", build_one_point);
        registry.register("2x", build_two_point);
        registry.register("ux", build_uniform);
        registry
    }
}

impl std::fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}

impl OperatorRegistry {
    /// A registry with no operators.
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registers `factory` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, factory: OperatorFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered operator names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Builds the operator or `+`-separated pipeline called `name`.
    ///
    /// Names are case-insensitive and surrounding whitespace is ignored.
    pub fn build(
        &self,
        name: &str,
        properties: &Properties,
        number_of_variables: usize,
    ) -> Result<Box<dyn Variation>> {
        let parts: Vec<String> = name
            .split('+')
            .map(|part| part.trim().to_ascii_lowercase())
            .collect();

        let mut operators = parts
            .iter()
            .map(|part| self.build_one(part, properties, number_of_variables))
            .collect::<Result<Vec<_>>>()?;

        debug!("built variation '{}' for {} variables", parts.join("+"), number_of_variables);

        if operators.len() == 1 {
            return Ok(operators.remove(0));
        }
        Ok(Box::new(CompoundVariation::new(operators)?))
    }

    fn build_one(
        &self,
        name: &str,
        properties: &Properties,
        number_of_variables: usize,
    ) -> Result<Box<dyn Variation>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| MoeaError::UnknownOperator(name.to_string()))?;
        factory(properties, number_of_variables)
    }

    /// Default crossover-plus-mutation pipeline for a variable encoding.
    pub fn hint(kind: VariableKind) -> &'static str {
        match kind {
            VariableKind::Real => "sbx+pm",
            VariableKind::Integer => "ux+um",
            VariableKind::Binary => "hux+bf",
            VariableKind::Permutation => "pmx+insertion+swap",
            VariableKind::Subset => "ssx+replace",
        }
    }

    /// Default mutation-only pipeline for a variable encoding.
    pub fn mutation_hint(kind: VariableKind) -> &'static str {
        match kind {
            VariableKind::Real => "pm",
            VariableKind::Integer => "um",
            VariableKind::Binary => "bf",
            VariableKind::Permutation => "insertion+swap",
            VariableKind::Subset => "replace",
        }
    }

    /// [`hint`](Self::hint) for solutions shaped like `prototype`.
    ///
    /// Returns `None` for mixed encodings or an empty solution.
    pub fn hint_for(prototype: &Solution) -> Option<&'static str> {
        single_kind(prototype).map(Self::hint)
    }

    /// [`mutation_hint`](Self::mutation_hint) for solutions shaped like
    /// `prototype`; `None` for mixed encodings or an empty solution.
    pub fn mutation_hint_for(prototype: &Solution) -> Option<&'static str> {
        single_kind(prototype).map(Self::mutation_hint)
    }
}

/// The encoding shared by every variable of `prototype`, if there is one.
fn single_kind(prototype: &Solution) -> Option<VariableKind> {
    let mut kinds = prototype.variables().iter().map(|v| v.kind());
    let first = kinds.next()?;
    kinds.all(|k| k == first).then_some(first)
}

fn per_variable(number_of_variables: usize) -> f64 {
    1.0 / number_of_variables.max(1) as f64
}

fn build_sbx(props: &Properties, _n: usize) -> Result<Box<dyn Variation>> {
    let sbx = Sbx::new(
        props.get_f64_or("sbx.rate", 1.0)?,
        props.get_f64_or("sbx.distributionIndex", 15.0)?,
    )?
    .with_swap(props.get_bool_or("sbx.swap", true)?);
    Ok(Box::new(sbx))
}

fn build_pm(props: &Properties, n: usize) -> Result<Box<dyn Variation>> {
    Ok(Box::new(PolynomialMutation::new(
        props.get_f64_or("pm.rate", per_variable(n))?,
        props.get_f64_or("pm.distributionIndex", 20.0)?,
    )?))
}

fn build_um(props: &Properties, n: usize) -> Result<Box<dyn Variation>> {
    Ok(Box::new(UniformMutation::new(
        props.get_f64_or("um.rate", per_variable(n))?,
    )?))
}

fn build_pcx(props: &Properties, _n: usize) -> Result<Box<dyn Variation>> {
    Ok(Box::new(Pcx::with_spread(
        props.get_usize_or("pcx.parents", 10)?,
        props.get_usize_or("pcx.offspring", 2)?,
        props.get_f64_or("pcx.eta", 0.1)?,
        props.get_f64_or("pcx.zeta", 0.1)?,
    )?))
}

fn build_undx(props: &Properties, _n: usize) -> Result<Box<dyn Variation>> {
    Ok(Box::new(Undx::with_spread(
        props.get_usize_or("undx.parents", 10)?,
        props.get_usize_or("undx.offspring", 2)?,
        props.get_f64_or("undx.zeta", 0.5)?,
        props.get_f64_or("undx.eta", 0.35)?,
    )?))
}

fn build_spx(props: &Properties, _n: usize) -> Result<Box<dyn Variation>> {
    Ok(Box::new(Spx::with_epsilon(
        props.get_usize_or("spx.parents", 10)?,
        props.get_usize_or("spx.offspring", 2)?,
        props.get_f64_or("spx.epsilon", 3.0)?,
    )?))
}

fn build_de(props: &Properties, _n: usize) -> Result<Box<dyn Variation>> {
    Ok(Box::new(DifferentialEvolution::new(
        props.get_f64_or("de.crossoverRate", 0.1)?,
        props.get_f64_or("de.stepSize", 0.5)?,
    )?))
}

fn build_hux(props: &Properties, _n: usize) -> Result<Box<dyn Variation>> {
    Ok(Box::new(Hux::new(props.get_f64_or("hux.rate", 1.0)?)?))
}

fn build_bf(props: &Properties, _n: usize) -> Result<Box<dyn Variation>> {
    Ok(Box::new(BitFlip::new(props.get_f64_or("bf.rate", 0.01)?)?))
}

fn build_pmx(props: &Properties, _n: usize) -> Result<Box<dyn Variation>> {
    Ok(Box::new(Pmx::new(props.get_f64_or("pmx.rate", 1.0)?)?))
}

fn build_swap(props: &Properties, _n: usize) -> Result<Box<dyn Variation>> {
    Ok(Box::new(SwapMutation::new(props.get_f64_or("swap.rate", 0.3)?)?))
}

fn build_insertion(props: &Properties, _n: usize) -> Result<Box<dyn Variation>> {
    Ok(Box::new(InsertionMutation::new(
        props.get_f64_or("insertion.rate", 0.3)?,
    )?))
}

fn build_ssx(props: &Properties, _n: usize) -> Result<Box<dyn Variation>> {
    Ok(Box::new(SubsetCrossover::new(props.get_f64_or("ssx.rate", 0.3)?)?))
}

fn build_replace(props: &Properties, _n: usize) -> Result<Box<dyn Variation>> {
    Ok(Box::new(ReplaceMutation::new(
        props.get_f64_or("replace.rate", 0.9)?,
    )?))
}

fn build_one_point(props: &Properties, _n: usize) -> Result<Box<dyn Variation>> {
    Ok(Box::new(OnePointCrossover::new(props.get_f64_or("1x.rate", 1.0)?)?))
}

fn build_two_point(props: &Properties, _n: usize) -> Result<Box<dyn Variation>> {
    Ok(Box::new(TwoPointCrossover::new(props.get_f64_or("2x.rate", 1.0)?)?))
}

fn build_uniform(props: &Properties, _n: usize) -> Result<Box<dyn Variation>> {
    Ok(Box::new(UniformCrossover::new(props.get_f64_or("ux.rate", 1.0)?)?))
}
