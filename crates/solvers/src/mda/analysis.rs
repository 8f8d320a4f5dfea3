use std::cell::RefCell;

use mdo_core::{
    Block, CouplingGraph, CouplingVars, ExplicitDiscipline, ImplicitDiscipline, Model, Observer,
    Ports,
};

use super::{Action, Config, Coupled, Error, Event, Solution};

/// A registered discipline.
pub(super) enum Node<D, C: CouplingVars> {
    Explicit(Box<dyn ExplicitDiscipline<D, C>>),
    Implicit(Box<dyn ImplicitDiscipline<D, C>>),
}

impl<D, C: CouplingVars> Node<D, C> {
    pub(super) fn name(&self) -> &str {
        match self {
            Self::Explicit(d) => d.name(),
            Self::Implicit(d) => d.name(),
        }
    }

    fn ports(&self) -> Ports<'_> {
        match self {
            Self::Explicit(d) => Ports {
                name: d.name(),
                reads: d.reads(),
                writes: d.writes(),
            },
            Self::Implicit(d) => Ports {
                name: d.name(),
                reads: d.reads(),
                writes: d.writes(),
            },
        }
    }
}

/// A coupled multidisciplinary analysis.
///
/// An `Analysis` owns its disciplines, the schedule derived from their
/// coupling graph, its configuration, and its warm-start state. Solving it
/// for a design `D` resolves the coupling variables `C` to a fixed point.
///
/// It implements [`Model`] with `Input = D` and `Output = Coupled<C>`, so it
/// can be handed to any solver that evaluates models. Called as a model it:
///
/// - starts from the last converged state (when warm starting is enabled);
/// - returns the previous output unchanged when called again with the same
///   design;
/// - fails with [`Error::ConvergenceFailure`] when the sweep budget runs out
///   (unless convergence is not required).
pub struct Analysis<D, C: CouplingVars> {
    pub(super) nodes: Vec<Node<D, C>>,
    pub(super) owned: Vec<Vec<usize>>,
    pub(super) config: Config,
    graph: CouplingGraph,
    schedule: Vec<Block>,
    warm: RefCell<Option<C>>,
    last: RefCell<Option<(D, Coupled<C>)>>,
}

/// Collects disciplines and builds an [`Analysis`].
pub struct AnalysisBuilder<D, C: CouplingVars> {
    nodes: Vec<Node<D, C>>,
    config: Config,
}

impl<D, C: CouplingVars> Analysis<D, C> {
    /// Starts a builder with the default [`Config`].
    #[must_use]
    pub fn builder() -> AnalysisBuilder<D, C> {
        AnalysisBuilder {
            nodes: Vec::new(),
            config: Config::default(),
        }
    }

    /// The execution schedule, in order.
    #[must_use]
    pub fn schedule(&self) -> &[Block] {
        &self.schedule
    }

    /// The coupling graph the schedule was derived from.
    #[must_use]
    pub fn graph(&self) -> &CouplingGraph {
        &self.graph
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Discipline names, in registration order.
    pub fn discipline_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(Node::name)
    }

    /// Replaces the warm-start state.
    pub fn seed(&self, vars: C) {
        *self.warm.borrow_mut() = Some(vars);
        self.last.borrow_mut().take();
    }

    /// Forgets the warm-start state and any remembered output.
    pub fn reset(&self) {
        self.warm.borrow_mut().take();
        self.last.borrow_mut().take();
    }

    /// The state the next solve will start from.
    #[must_use]
    pub fn initial_guess(&self) -> C {
        if self.config.warm_start() {
            if let Some(vars) = self.warm.borrow().as_ref() {
                return vars.clone();
            }
        }
        C::default()
    }

    /// Resolves the coupling for `design`, starting from
    /// [`initial_guess`](Self::initial_guess).
    ///
    /// The observer receives an [`Event`] after every sweep of a cyclic
    /// block.
    ///
    /// # Errors
    ///
    /// Returns an error if a discipline fails, breaks ownership, produces a
    /// non-finite value, or has an unrepairable domain violation. Running out
    /// of sweeps is not an error here; it is reported through the status.
    pub fn solve<Obs>(&self, design: &D, observer: Obs) -> Result<Solution<C>, Error>
    where
        Obs: for<'a> Observer<Event<'a, C>, Action>,
    {
        self.solve_from(design, self.initial_guess(), observer)
    }

    /// Resolves the coupling for `design` without observer support.
    ///
    /// # Errors
    ///
    /// See [`solve`](Self::solve).
    pub fn solve_unobserved(&self, design: &D) -> Result<Solution<C>, Error> {
        self.solve(design, ())
    }

    /// Resolves the coupling for `design`, starting from `start`.
    ///
    /// A converged result becomes the next warm start.
    ///
    /// # Errors
    ///
    /// See [`solve`](Self::solve).
    pub fn solve_from<Obs>(
        &self,
        design: &D,
        start: C,
        mut observer: Obs,
    ) -> Result<Solution<C>, Error>
    where
        Obs: for<'a> Observer<Event<'a, C>, Action>,
    {
        let solution = self.run(design, start, &mut observer)?;
        if solution.is_converged() {
            *self.warm.borrow_mut() = Some(solution.vars.clone());
        }
        Ok(solution)
    }
}

impl<D, C: CouplingVars> AnalysisBuilder<D, C> {
    /// Registers an explicit discipline.
    #[must_use]
    pub fn explicit(mut self, discipline: impl ExplicitDiscipline<D, C> + 'static) -> Self {
        self.nodes.push(Node::Explicit(Box::new(discipline)));
        self
    }

    /// Registers an implicit discipline.
    #[must_use]
    pub fn implicit(mut self, discipline: impl ImplicitDiscipline<D, C> + 'static) -> Self {
        self.nodes.push(Node::Implicit(Box::new(discipline)));
        self
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Validates ownership and builds the schedule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Graph`] if the declared ports are inconsistent.
    pub fn build(self) -> Result<Analysis<D, C>, Error> {
        let ports: Vec<Ports<'_>> = self.nodes.iter().map(Node::ports).collect();
        let graph = CouplingGraph::new(C::NAMES, &ports)?;
        let schedule = graph.schedule();

        // Validated by the graph, every written name has a slot.
        let owned: Vec<Vec<usize>> = ports
            .iter()
            .map(|p| p.writes.iter().filter_map(|name| C::slot(name)).collect())
            .collect();
        drop(ports);

        for (index, block) in schedule.iter().enumerate() {
            let names: Vec<&str> = block.members.iter().map(|&m| self.nodes[m].name()).collect();
            log::debug!(
                "block {index}: [{}]{}",
                names.join(", "),
                if block.cyclic { " (cyclic)" } else { "" }
            );
        }

        Ok(Analysis {
            nodes: self.nodes,
            owned,
            config: self.config,
            graph,
            schedule,
            warm: RefCell::new(None),
            last: RefCell::new(None),
        })
    }
}

impl<D, C> Model for Analysis<D, C>
where
    D: Clone + PartialEq,
    C: CouplingVars,
{
    type Input = D;
    type Output = Coupled<C>;
    type Error = Error;

    fn call(&self, design: &D) -> Result<Coupled<C>, Error> {
        if let Some((previous, output)) = self.last.borrow().as_ref() {
            if previous == design {
                return Ok(output.clone());
            }
        }

        let solution = self.solve_unobserved(design)?;
        if !solution.is_converged() && self.config.require_convergence() {
            return Err(Error::ConvergenceFailure {
                sweeps: solution.sweeps,
                delta: solution.delta,
            });
        }

        let output = Coupled::from(solution);
        *self.last.borrow_mut() = Some((design.clone(), output.clone()));
        Ok(output)
    }
}
