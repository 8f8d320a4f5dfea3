use std::{cell::RefCell, collections::HashMap};

use mdo_core::{
    Block, Correction, CouplingVars, DomainGuard, ExplicitDiscipline, ImplicitDiscipline, Observer,
};

use crate::equation::newton::{
    self,
    iterate::{Failure, iterate},
};

use super::{
    Action, Error, Event, Method, Solution, Status,
    analysis::{Analysis, Node},
};

/// Running totals across the blocks of one solve.
#[derive(Default)]
struct Tally {
    sweeps: usize,
    delta: f64,
    corrections: usize,
    active: Vec<Correction>,
}

impl Tally {
    /// Closes a block, keeping the corrections still applied at its end.
    fn close(&mut self, delta: f64, active: Vec<Correction>) {
        self.delta = self.delta.max(delta);
        self.active.extend(active);
    }
}

impl<D, C: CouplingVars> Analysis<D, C> {
    /// Walks the schedule once, resolving each block in turn.
    ///
    /// An unconverged block does not stop the walk; downstream blocks still
    /// run on its latest values and the overall status records the failure.
    pub(super) fn run<Obs>(&self, design: &D, start: C, observer: &mut Obs) -> Result<Solution<C>, Error>
    where
        Obs: for<'a> Observer<Event<'a, C>, Action>,
    {
        let mut vars = start;
        let mut tally = Tally::default();
        let mut status = Status::Converged;

        for (index, block) in self.schedule().iter().enumerate() {
            let outcome = if !block.cyclic {
                self.single(block.members[0], design, &mut vars, &mut tally)?
            } else {
                match self.config.method() {
                    Method::GaussSeidel => {
                        self.gauss_seidel(index, block, design, &mut vars, &mut tally, observer)?
                    }
                    Method::Newton => {
                        self.newton(index, block, design, &mut vars, &mut tally, observer)?
                    }
                }
            };

            match outcome {
                Status::Converged => {}
                Status::MaxSweeps => {
                    log::warn!(
                        "block {index} [{}] did not converge (last change {:e})",
                        self.names(block),
                        tally.delta
                    );
                    status = Status::MaxSweeps;
                }
                Status::StoppedByObserver => {
                    status = Status::StoppedByObserver;
                    break;
                }
            }
        }

        for c in &tally.active {
            log::warn!(
                "`{}` in `{}` corrected from {} to {} at the reported state",
                c.quantity,
                c.discipline,
                c.original,
                c.corrected
            );
        }

        Ok(Solution {
            status,
            vars,
            sweeps: tally.sweeps,
            delta: tally.delta,
            corrections: tally.corrections,
            active_corrections: tally.active,
        })
    }

    /// Runs a block with one member and no self-coupling.
    fn single(&self, member: usize, design: &D, vars: &mut C, tally: &mut Tally) -> Result<Status, Error> {
        let mut guard = DomainGuard::new();
        let status = self.run_member(member, design, vars, &mut guard)?;

        let corrections = guard.take();
        tally.sweeps += 1;
        tally.corrections += corrections.len();
        tally.close(0.0, corrections);
        Ok(status)
    }

    fn gauss_seidel<Obs>(
        &self,
        index: usize,
        block: &Block,
        design: &D,
        vars: &mut C,
        tally: &mut Tally,
        observer: &mut Obs,
    ) -> Result<Status, Error>
    where
        Obs: for<'a> Observer<Event<'a, C>, Action>,
    {
        let slots = self.block_slots(block);
        let mut delta = f64::INFINITY;
        let mut corrections = Vec::new();

        for sweep in 1..=self.config.max_sweeps() {
            let previous = vars.clone();
            let mut guard = DomainGuard::new();
            for &member in &block.members {
                // Inner implicit solves need not settle; the sweep decides.
                self.run_member(member, design, vars, &mut guard)?;
            }

            corrections = guard.take();
            tally.sweeps += 1;
            tally.corrections += corrections.len();

            let (change, settled) = self.change(&previous, vars, &slots);
            delta = change;
            log::trace!("block {index} sweep {sweep}: change {delta:.3e}");

            let action = observer.observe(&Event {
                block: index,
                sweep,
                delta,
                vars: &*vars,
            });

            if settled {
                log::debug!("block {index} converged after {sweep} sweeps");
                tally.close(delta, corrections);
                return Ok(Status::Converged);
            }
            if matches!(action, Some(Action::StopEarly)) {
                tally.close(delta, corrections);
                return Ok(Status::StoppedByObserver);
            }
        }

        tally.close(delta, corrections);
        Ok(Status::MaxSweeps)
    }

    /// Solves `y - f(y) = 0` over the whole block, with implicit members
    /// contributing their residuals directly.
    fn newton<Obs>(
        &self,
        index: usize,
        block: &Block,
        design: &D,
        vars: &mut C,
        tally: &mut Tally,
        observer: &mut Obs,
    ) -> Result<Status, Error>
    where
        Obs: for<'a> Observer<Event<'a, C>, Action>,
    {
        let slots = self.block_slots(block);
        let base = vars.clone();

        // Corrections per evaluated point; only accepted iterates are tallied.
        let seen: RefCell<HashMap<Vec<u64>, usize>> = RefCell::new(HashMap::new());
        let residual = |y: &[f64]| -> Result<Vec<f64>, Error> {
            let mut trial = base.clone();
            assign(&mut trial, &slots, y);
            let mut guard = DomainGuard::new();
            let residuals = self.block_residuals(block, design, &trial, &mut guard)?;
            seen.borrow_mut().insert(key(y), guard.corrections().len());
            Ok(residuals)
        };
        let corrections_at = |y: &[f64]| seen.borrow().get(&key(y)).copied().unwrap_or(0);

        let x0: Vec<f64> = slots.iter().map(|&slot| vars.get(slot)).collect();
        let mut corrections = 0;
        let outcome = iterate(&residual, x0.clone(), self.config.newton(), |progress| {
            corrections += corrections_at(progress.x);
            let mut current = base.clone();
            assign(&mut current, &slots, progress.x);
            observer
                .observe(&Event {
                    block: index,
                    sweep: progress.iter,
                    delta: progress.step_norm,
                    vars: &current,
                })
                .map(|Action::StopEarly| newton::Action::StopEarly)
        })
        .map_err(|failure| self.failure(block, failure))?;
        corrections += corrections_at(x0.as_slice());

        assign(vars, &slots, &outcome.x);

        let mut guard = DomainGuard::new();
        self.block_residuals(block, design, vars, &mut guard)?;

        tally.sweeps += outcome.iters;
        tally.corrections += corrections;
        tally.close(outcome.step_norm, guard.take());

        if outcome.status == newton::Status::Converged {
            log::debug!("block {index} converged after {} Newton iterations", outcome.iters);
        }
        Ok(status_of(outcome.status))
    }

    fn run_member(&self, member: usize, design: &D, vars: &mut C, guard: &mut DomainGuard) -> Result<Status, Error> {
        let node = &self.nodes[member];
        guard.enter(node.name());
        match node {
            Node::Explicit(d) => {
                self.compute(member, &**d, design, vars, guard)?;
                Ok(Status::Converged)
            }
            Node::Implicit(d) => self.solve_implicit(member, &**d, design, vars, guard),
        }
    }

    /// Calls an explicit discipline and enforces single ownership.
    fn compute(
        &self,
        member: usize,
        discipline: &dyn ExplicitDiscipline<D, C>,
        design: &D,
        vars: &mut C,
        guard: &mut DomainGuard,
    ) -> Result<(), Error> {
        let before = vars.clone();
        discipline
            .compute(design, vars, guard)
            .map_err(|e| Error::discipline(discipline.name(), e))?;

        let owned = &self.owned[member];
        for (slot, &variable) in C::NAMES.iter().enumerate() {
            let after = vars.get(slot);
            if owned.contains(&slot) {
                if !after.is_finite() {
                    return Err(Error::NonFinite {
                        discipline: discipline.name().to_owned(),
                        variable,
                    });
                }
            } else if after.to_bits() != before.get(slot).to_bits() {
                return Err(Error::Ownership {
                    discipline: discipline.name().to_owned(),
                    variable,
                });
            }
        }
        Ok(())
    }

    fn implicit_residuals(
        &self,
        member: usize,
        discipline: &dyn ImplicitDiscipline<D, C>,
        design: &D,
        vars: &C,
        guard: &mut DomainGuard,
    ) -> Result<Vec<f64>, Error> {
        let residuals = discipline
            .residuals(design, vars, guard)
            .map_err(|e| Error::discipline(discipline.name(), e))?;

        let expected = self.owned[member].len();
        if residuals.len() != expected {
            return Err(Error::ResidualCount {
                discipline: discipline.name().to_owned(),
                expected,
                actual: residuals.len(),
            });
        }
        Ok(residuals)
    }

    /// Drives an implicit discipline's residuals to zero over its own slots.
    ///
    /// Corrections made while probing are discarded; only those applied at
    /// the final state are recorded in `guard`.
    fn solve_implicit(
        &self,
        member: usize,
        discipline: &dyn ImplicitDiscipline<D, C>,
        design: &D,
        vars: &mut C,
        guard: &mut DomainGuard,
    ) -> Result<Status, Error> {
        let slots = &self.owned[member];
        let probe = RefCell::new(DomainGuard::new());
        probe.borrow_mut().enter(discipline.name());
        let base = vars.clone();

        let residual = |y: &[f64]| -> Result<Vec<f64>, Error> {
            let mut trial = base.clone();
            assign(&mut trial, slots, y);
            self.implicit_residuals(member, discipline, design, &trial, &mut probe.borrow_mut())
        };

        let x0 = slots.iter().map(|&slot| vars.get(slot)).collect();
        let outcome = iterate(&residual, x0, self.config.newton(), |_| None).map_err(|failure| {
            match failure {
                Failure::Residual(e) => e,
                Failure::Singular { .. } => Error::SingularJacobian {
                    disciplines: discipline.name().to_owned(),
                },
                Failure::NonFinite { .. } => Error::NonFinite {
                    discipline: discipline.name().to_owned(),
                    variable: "residual",
                },
            }
        })?;

        assign(vars, slots, &outcome.x);
        self.implicit_residuals(member, discipline, design, vars, guard)?;
        Ok(status_of(outcome.status))
    }

    /// Residuals of a whole block: `y - f(y)` for explicit members and the
    /// declared residuals for implicit ones, in member order.
    fn block_residuals(&self, block: &Block, design: &D, vars: &C, guard: &mut DomainGuard) -> Result<Vec<f64>, Error> {
        let mut residuals = Vec::new();
        for &member in &block.members {
            let node = &self.nodes[member];
            guard.enter(node.name());
            match node {
                Node::Explicit(d) => {
                    let mut next = vars.clone();
                    self.compute(member, &**d, design, &mut next, guard)?;
                    residuals.extend(
                        self.owned[member]
                            .iter()
                            .map(|&slot| vars.get(slot) - next.get(slot)),
                    );
                }
                Node::Implicit(d) => {
                    residuals.extend(self.implicit_residuals(member, &**d, design, vars, guard)?);
                }
            }
        }
        Ok(residuals)
    }

    /// Largest change over `slots` and whether every slot is within tolerance.
    fn change(&self, previous: &C, current: &C, slots: &[usize]) -> (f64, bool) {
        slots.iter().fold((0.0_f64, true), |(delta, settled), &slot| {
            let value = current.get(slot);
            let change = (value - previous.get(slot)).abs();
            (delta.max(change), settled && self.config.is_settled(change, value))
        })
    }

    fn block_slots(&self, block: &Block) -> Vec<usize> {
        block
            .members
            .iter()
            .flat_map(|&member| self.owned[member].iter().copied())
            .collect()
    }

    fn names(&self, block: &Block) -> String {
        block
            .members
            .iter()
            .map(|&member| self.nodes[member].name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn failure(&self, block: &Block, failure: Failure<Error>) -> Error {
        match failure {
            Failure::Residual(e) => e,
            Failure::Singular { .. } => Error::SingularJacobian {
                disciplines: self.names(block),
            },
            Failure::NonFinite { .. } => Error::NonFinite {
                discipline: self.names(block),
                variable: "residual",
            },
        }
    }
}

fn assign<C: CouplingVars>(vars: &mut C, slots: &[usize], values: &[f64]) {
    for (&slot, &value) in slots.iter().zip(values) {
        vars.set(slot, value);
    }
}

fn key(y: &[f64]) -> Vec<u64> {
    y.iter().map(|v| v.to_bits()).collect()
}

fn status_of(status: newton::Status) -> Status {
    match status {
        newton::Status::Converged => Status::Converged,
        newton::Status::MaxIters => Status::MaxSweeps,
        newton::Status::StoppedByObserver => Status::StoppedByObserver,
    }
}
