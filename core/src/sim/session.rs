//! Simulation sessions: a population, its rule, and a bounded history of
//! past generations.

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::borrow::Cow;

use super::history::{History, DEFAULT_HISTORY_CAPACITY};
use super::rule::Rule;
use super::stability::{self, Stability};
use crate::config::{NeighborhoodSpec, SessionConfig};
use crate::errors::{EngineError, EngineResult};
use crate::io::Snapshot;
use crate::nbhd::{Neighborhood, Topology, MAX_OFFSET_AXES};
use crate::population::{self, Population, DEFAULT_DENSITY};
use crate::shape::Shape;

/// A cellular automaton simulation with a bounded, seekable history.
///
/// A session starts out unseeded. Seeding sets the shape and records the
/// initial generation; each [`Session::step()`] then either replays a
/// generation already in the history (if the cursor is behind the newest one)
/// or computes and records a new one.
///
/// Every fallible method either fully succeeds or leaves the session exactly
/// as it was.
#[derive(Debug)]
pub struct Session {
    shape: Option<Shape>,
    /// Whether `shape` has changed since `population` was last computed.
    reshape_pending: bool,
    population: Option<Population>,
    history: History,

    rule: Rule,
    /// Explicitly configured neighborhood. If `None`, a Moore neighborhood
    /// matching the population is used.
    neighborhood: Option<Neighborhood>,
    moore_radius: usize,
    density: f64,
    rng: StdRng,
}
impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Constructs an unseeded session using Conway's Game of Life on a Moore
    /// neighborhood, seeding its random number generator from the operating
    /// system.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Constructs an unseeded session with a deterministic random number
    /// generator.
    pub fn with_rng_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            shape: None,
            reshape_pending: false,
            population: None,
            history: History::with_capacity(DEFAULT_HISTORY_CAPACITY),

            rule: Rule::default(),
            neighborhood: None,
            moore_radius: 1,
            density: DEFAULT_DENSITY,
            rng,
        }
    }

    /// Constructs a session from a configuration, seeding it if the
    /// configuration includes a shape.
    pub fn from_config(config: &SessionConfig) -> EngineResult<Self> {
        population::check_density(config.density)?;
        let rule = config.rule.build()?;
        let neighborhood = config.neighborhood.build()?;

        let mut ret = match config.rng_seed {
            Some(seed) => Self::with_rng_seed(seed),
            None => Self::new(),
        };
        ret.history = History::with_capacity(config.history_capacity);
        ret.rule = rule;
        ret.neighborhood = neighborhood;
        if let NeighborhoodSpec::Moore { radius } = config.neighborhood {
            ret.moore_radius = radius;
        }
        ret.density = config.density;
        debug!(
            "Configured session with rule {} and history capacity {}",
            ret.rule,
            ret.history.capacity()
        );

        if let Some(shape) = &config.shape {
            ret.active_neighborhood(shape.ndim())?
                .check_ndim(shape.ndim())?;
            ret.seed(shape.clone(), config.density)?;
        }
        ret.warn_on_rule_mismatch();
        Ok(ret)
    }

    /// Seeds a new population with the given shape, in which each cell is
    /// independently alive with probability `density`. The history is
    /// replaced by this single generation.
    pub fn seed(&mut self, shape: Shape, density: f64) -> EngineResult<&Population> {
        let population = population::seed(&shape, density, &mut self.rng)?;
        debug!(
            "Seeded population {} with density {} ({} live)",
            shape,
            density,
            population.live_count()
        );
        self.shape = Some(shape);
        Ok(self.restart_from(population))
    }

    /// Seeds a new population with the configured shape.
    pub fn reseed(&mut self, density: f64) -> EngineResult<&Population> {
        let shape = self.shape.clone().ok_or(EngineError::NotInitialized("shape"))?;
        self.seed(shape, density)
    }

    /// Seeds the session with an existing population, adopting its shape.
    pub fn seed_with_population(&mut self, population: Population) -> &Population {
        debug!(
            "Seeded population {} from cells ({} live)",
            population.shape(),
            population.live_count()
        );
        self.shape = Some(population.shape().clone());
        self.restart_from(population)
    }

    /// Seeds the session from a snapshot, which must match the configured
    /// shape.
    pub fn seed_from_snapshot(&mut self, snapshot: Snapshot) -> EngineResult<&Population> {
        let shape = self.shape.as_ref().ok_or(EngineError::NotInitialized("shape"))?;
        let population = snapshot.unpack(shape)?;
        debug!("Seeded population {} from snapshot", shape);
        self.reshape_pending = false;
        self.history.reset(snapshot);
        Ok(self.population.insert(population))
    }

    fn restart_from(&mut self, population: Population) -> &Population {
        self.reshape_pending = false;
        self.history.reset(Snapshot::pack(&population));
        self.population.insert(population)
    }

    /// Changes the shape of the population. The live population is resized
    /// (padding with dead cells or truncating) at the start of the next step.
    ///
    /// If the session already has a shape, the new one must have the same
    /// axes.
    pub fn reshape(&mut self, new_shape: Shape) -> EngineResult<()> {
        if let Some(shape) = &self.shape {
            shape.check_same_axes(&new_shape)?;
            if *shape == new_shape {
                return Ok(());
            }
        }
        debug!("Reshaping population to {}", new_shape);
        self.reshape_pending = self.population.is_some();
        self.shape = Some(new_shape);
        Ok(())
    }

    /// Advances to the next generation and returns it.
    ///
    /// If the cursor is behind the newest generation, the next one is
    /// restored from the history instead of being recomputed. After a
    /// [`Session::reshape()`], the population is resized first and a fresh
    /// generation is computed, discarding any history after the cursor.
    pub fn step(&mut self) -> EngineResult<&Population> {
        let shape = self.shape.as_ref().ok_or(EngineError::NotInitialized("shape"))?;
        let current = self
            .population
            .as_ref()
            .ok_or(EngineError::NotInitialized("population"))?;

        if !self.reshape_pending && !self.history.is_at_newest() {
            let index = self.history.cursor() + 1;
            let next = self
                .history
                .get(index)
                .ok_or(EngineError::NotInitialized("history"))?
                .unpack(shape)?;
            trace!("Replaying generation {} from history", index);
            self.history.set_cursor(index);
            return Ok(self.population.insert(next));
        }

        let resized;
        let current = if self.reshape_pending {
            resized = population::resize(current, shape)?;
            &resized
        } else {
            current
        };
        let nbhd = self.active_neighborhood(shape.ndim())?;
        nbhd.check_ndim(shape.ndim())?;
        let next = population::step(current, self.rule.transition_function(&nbhd));
        let snapshot = Snapshot::pack(&next);

        if self.reshape_pending {
            self.history.truncate_after_cursor();
            self.reshape_pending = false;
        }
        let evicted = self.history.push(snapshot);
        if evicted > 0 {
            debug!("Evicted {} generation(s) from history", evicted);
        }
        trace!(
            "Computed generation {} ({} live)",
            self.history.cursor(),
            next.live_count()
        );
        Ok(self.population.insert(next))
    }

    /// Moves the cursor to a retained generation and restores it as the live
    /// population. Out-of-range indices are clamped.
    pub fn seek_to(&mut self, index: usize) -> EngineResult<&Population> {
        let shape = self.shape.as_ref().ok_or(EngineError::NotInitialized("shape"))?;
        if self.history.is_empty() {
            return Err(EngineError::NotInitialized("history"));
        }
        let clamped = index.min(self.history.len() - 1);
        let population = self
            .history
            .get(clamped)
            .ok_or(EngineError::NotInitialized("history"))?
            .unpack(shape)?;
        trace!("Seeking to generation {}", clamped);
        self.history.set_cursor(clamped);
        self.reshape_pending = false;
        Ok(self.population.insert(population))
    }

    /// Reconstructs a retained generation without moving the cursor. Returns
    /// `Ok(None)` if `index` is out of range.
    pub fn population_at(&self, index: usize) -> EngineResult<Option<Population>> {
        let shape = self.shape.as_ref().ok_or(EngineError::NotInitialized("shape"))?;
        self.history
            .get(index)
            .map(|snapshot| snapshot.unpack(shape))
            .transpose()
    }

    /// Sets the maximum number of retained generations, evicting the oldest
    /// immediately if necessary. If the generation being viewed is evicted,
    /// the oldest retained generation becomes the live population.
    pub fn set_history_capacity(&mut self, capacity: usize) {
        let viewed = self.history.cursor();
        let evicted = self.history.set_capacity(capacity);
        debug!(
            "Set history capacity to {} (evicted {})",
            self.history.capacity(),
            evicted
        );
        if evicted > viewed {
            self.restore_current_generation();
        }
    }

    fn restore_current_generation(&mut self) {
        let restored = match (&self.population, self.history.current()) {
            (Some(population), Some(snapshot)) => snapshot.unpack(population.shape()),
            _ => return,
        };
        match restored {
            Ok(population) => self.population = Some(population),
            Err(e) => warn!(
                "Unable to restore generation {}: {}",
                self.history.cursor(),
                e
            ),
        }
    }

    /// Sets the transition rule.
    pub fn set_rule(&mut self, rule: impl Into<Rule>) {
        self.rule = rule.into();
        debug!("Set rule to {}", self.rule);
        self.warn_on_rule_mismatch();
    }

    /// Sets the neighborhood from offset strings such as `x-1|y+1`.
    pub fn set_neighbors<S: AsRef<str>>(&mut self, offsets: &[S]) -> EngineResult<()> {
        let nbhd = Neighborhood::from_strings(offsets)?;
        self.set_neighborhood(nbhd)
    }

    /// Sets the neighborhood to that of a lattice topology.
    pub fn set_lattice(&mut self, topology: Topology, radius: usize) -> EngineResult<()> {
        debug!("Using {} lattice with radius {}", topology, radius);
        self.set_neighborhood(topology.neighborhood(radius))
    }

    /// Sets the neighborhood. It must not span more axes than the population.
    pub fn set_neighborhood(&mut self, nbhd: Neighborhood) -> EngineResult<()> {
        if let Some(shape) = &self.shape {
            nbhd.check_ndim(shape.ndim())?;
        }
        debug!("Set neighborhood with {} neighbors", nbhd.max_len());
        self.neighborhood = Some(nbhd);
        self.warn_on_rule_mismatch();
        Ok(())
    }

    /// Uses a Moore neighborhood matching the dimensionality of the
    /// population (up to three axes).
    pub fn set_moore(&mut self, radius: usize) {
        debug!("Using Moore neighborhood with radius {}", radius);
        self.neighborhood = None;
        self.moore_radius = radius;
        self.warn_on_rule_mismatch();
    }

    /// Sets the default seeding density.
    pub fn set_density(&mut self, density: f64) -> EngineResult<()> {
        population::check_density(density)?;
        self.density = density;
        Ok(())
    }

    /// Returns the live population, if the session has been seeded.
    pub fn current_population(&self) -> Option<&Population> {
        self.population.as_ref()
    }
    /// Returns the number of retained generations.
    pub fn total_generations(&self) -> usize {
        self.history.len()
    }
    /// Returns the index of the generation being viewed, if the session has
    /// been seeded.
    pub fn current_generation_index(&self) -> Option<usize> {
        if self.history.is_empty() {
            None
        } else {
            Some(self.history.cursor())
        }
    }
    /// Returns the configured shape.
    pub fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }
    /// Returns whether a reshape will be applied on the next step.
    pub fn is_reshape_pending(&self) -> bool {
        self.reshape_pending
    }
    /// Returns the transition rule.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }
    /// Returns the neighborhood used for the configured shape.
    pub fn neighborhood(&self) -> EngineResult<Cow<'_, Neighborhood>> {
        match &self.shape {
            Some(shape) => self.active_neighborhood(shape.ndim()),
            None => self
                .neighborhood
                .as_ref()
                .map(Cow::Borrowed)
                .ok_or(EngineError::NotInitialized("shape")),
        }
    }
    /// Returns the maximum number of retained generations.
    pub fn history_capacity(&self) -> usize {
        self.history.capacity()
    }
    /// Returns the default seeding density.
    pub fn density(&self) -> f64 {
        self.density
    }
    /// Returns a retained snapshot.
    pub fn snapshot(&self, index: usize) -> Option<&Snapshot> {
        self.history.get(index)
    }

    /// Classifies the newest generation against up to `lookback` generations
    /// before it.
    pub fn check_stability(&self, lookback: usize) -> Stability {
        stability::check_stability(&self.history, lookback)
    }

    fn active_neighborhood(&self, ndim: usize) -> EngineResult<Cow<'_, Neighborhood>> {
        match &self.neighborhood {
            Some(nbhd) => Ok(Cow::Borrowed(nbhd)),
            None => Neighborhood::moore(ndim.min(MAX_OFFSET_AXES), self.moore_radius).map(Cow::Owned),
        }
    }

    fn warn_on_rule_mismatch(&self) {
        if let Ok(nbhd) = self.neighborhood() {
            if let Some(msg) = self.rule.neighborhood_mismatch(&nbhd) {
                warn!("{}", msg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::{X, Y, Z};
    use crate::sim::rule::{LifeLikeRule, RULE_110};

    fn blinker_session() -> Session {
        let shape = Shape::with_extents(&[5, 5]).unwrap();
        let mut session = Session::with_rng_seed(1);
        session.seed_with_population(Population::with_live_cells(
            shape,
            vec![&[2, 1][..], &[2, 2][..], &[2, 3][..]],
        ));
        session
    }

    #[test]
    fn test_not_initialized() {
        let mut session = Session::with_rng_seed(0);
        assert_eq!(Err(EngineError::NotInitialized("shape")), session.step().map(|_| ()));
        assert!(session.reseed(0.5).is_err());
        assert!(session.seek_to(0).is_err());
        assert!(session.population_at(0).is_err());
        assert_eq!(None, session.current_generation_index());
        assert_eq!(0, session.total_generations());
        // A shape alone is not enough to step.
        session.reshape(Shape::with_extents(&[4, 4]).unwrap()).unwrap();
        assert!(!session.is_reshape_pending());
        assert_eq!(
            Err(EngineError::NotInitialized("population")),
            session.step().map(|_| ()),
        );
        assert_eq!(16, session.reseed(1.0).unwrap().live_count());
    }

    #[test]
    fn test_replay_does_not_recompute() {
        let mut session = blinker_session();
        for _ in 0..4 {
            session.step().unwrap();
        }
        let newest = session.current_population().unwrap().clone();
        session.seek_to(1).unwrap();
        // Changing the rule does not affect generations already recorded.
        session.set_rule(LifeLikeRule::new(&[], &[]));
        session.step().unwrap();
        session.step().unwrap();
        session.step().unwrap();
        assert_eq!(Some(4), session.current_generation_index());
        assert_eq!(Some(&newest), session.current_population());
        // At the newest generation, the new rule kills everything.
        assert_eq!(0, session.step().unwrap().live_count());
        assert_eq!(6, session.total_generations());
    }

    #[test]
    fn test_seek_clamps() {
        let mut session = blinker_session();
        session.step().unwrap();
        session.step().unwrap();
        let gen_0 = session.population_at(0).unwrap().unwrap();
        assert_eq!(None, session.population_at(3).unwrap());
        assert_eq!(Some(2), session.current_generation_index());
        let gen_2 = session.population_at(2).unwrap().unwrap();
        assert_eq!(&gen_0, session.seek_to(0).unwrap());
        assert_eq!(&gen_2, session.seek_to(99).unwrap());
        assert_eq!(Some(2), session.current_generation_index());
    }

    #[test]
    fn test_reshape() {
        let mut session = blinker_session();
        session.step().unwrap();
        session.step().unwrap();
        session.seek_to(0).unwrap();
        assert!(matches!(
            session.reshape(Shape::new(vec![(X, 5), (Z, 5)]).unwrap()),
            Err(EngineError::AxisMismatch { .. }),
        ));
        session
            .reshape(Shape::new(vec![(X, 7), (Y, 6)]).unwrap())
            .unwrap();
        assert!(session.is_reshape_pending());
        // The live population keeps its shape until the next step.
        assert_eq!(vec![5, 5], session.current_population().unwrap().shape().extents());
        let next = session.step().unwrap();
        assert_eq!(vec![7, 6], next.shape().extents());
        assert_eq!(3, next.live_count());
        // The stale future was discarded.
        assert_eq!(2, session.total_generations());
        assert_eq!(Some(1), session.current_generation_index());
        assert!(!session.is_reshape_pending());
    }

    #[test]
    fn test_snapshot_size_mismatch_on_seek() {
        let mut session = blinker_session();
        session.step().unwrap();
        session
            .reshape(Shape::new(vec![(X, 6), (Y, 6)]).unwrap())
            .unwrap();
        assert!(matches!(
            session.seek_to(0),
            Err(EngineError::SnapshotSizeMismatch {
                snapshot_cells: 25,
                shape_cells: 36,
            }),
        ));
        // Nothing changed.
        assert_eq!(Some(1), session.current_generation_index());
        assert!(session.is_reshape_pending());
    }

    #[test]
    fn test_seed_from_snapshot() {
        let mut session = blinker_session();
        let snapshot = session.step().unwrap().clone();
        let snapshot = Snapshot::pack(&snapshot);
        let mut other = Session::with_rng_seed(2);
        assert!(other.seed_from_snapshot(snapshot.clone()).is_err());
        other.seed(Shape::with_extents(&[5, 5]).unwrap(), 0.0).unwrap();
        other.seed_from_snapshot(snapshot.clone()).unwrap();
        assert_eq!(session.current_population(), other.current_population());
        assert_eq!(1, other.total_generations());
        assert_eq!(Some(&snapshot), other.snapshot(0));
    }

    #[test]
    fn test_configuration_errors_leave_session_untouched() {
        let mut session = Session::with_rng_seed(3);
        session.seed(Shape::with_extents(&[8]).unwrap(), 0.5).unwrap();
        let before = session.current_population().cloned();
        assert!(matches!(
            session.set_neighbors(&["y+1"]),
            Err(EngineError::MalformedOffset { .. }),
        ));
        assert!(session.set_lattice(Topology::Triangular, 1).is_err());
        assert_eq!(
            Err(EngineError::InvalidDensity(-0.1)),
            session.seed(Shape::with_extents(&[9]).unwrap(), -0.1).map(|_| ()),
        );
        assert!(session.set_density(f64::NAN).is_err());
        assert_eq!(before.as_ref(), session.current_population());
        assert_eq!(vec![8], session.shape().unwrap().extents());
        assert_eq!(2, session.neighborhood().unwrap().max_len());

        session.set_rule(RULE_110.clone());
        session.set_neighbors(&["x-1", "x+1"]).unwrap();
        session.step().unwrap();
        assert_eq!(2, session.total_generations());
    }
}
