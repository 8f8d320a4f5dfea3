use std::collections::{BTreeSet, HashMap};

use petgraph::{
    Direction,
    algo::tarjan_scc,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use thiserror::Error;

/// A directed graph of data flow between disciplines.
///
/// Node `i` is the `i`-th registered discipline. An edge `a -> b` labelled
/// `v` means discipline `b` reads coupling variable `v`, which `a` owns.
/// Building the graph enforces single ownership: every coupling variable is
/// written by exactly one discipline.
#[derive(Debug)]
pub struct CouplingGraph {
    graph: DiGraph<String, Link>,
    owners: Vec<usize>,
}

/// The coupling variable carried by an edge of a [`CouplingGraph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub slot: usize,
    pub variable: String,
}

/// The ports one discipline declares.
#[derive(Debug, Clone, Copy)]
pub struct Ports<'a> {
    pub name: &'a str,
    pub reads: &'a [&'static str],
    pub writes: &'a [&'static str],
}

/// A group of disciplines solved together.
///
/// A block is either a single discipline with no self-dependency, evaluated
/// once, or a strongly connected component iterated to a fixed point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Discipline indices, in registration order.
    pub members: Vec<usize>,

    /// Whether the members feed back into one another.
    pub cyclic: bool,
}

impl CouplingGraph {
    /// Builds the graph for `variables` (slot names, in slot order) and the
    /// given disciplines, in registration order.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] if a discipline name repeats, a port names an
    /// unknown variable, a variable has more than one owner, or a variable has
    /// no owner.
    pub fn new(variables: &[&str], disciplines: &[Ports<'_>]) -> Result<Self, GraphError> {
        let slot_of: HashMap<&str, usize> = variables
            .iter()
            .enumerate()
            .map(|(slot, name)| (*name, slot))
            .collect();

        let mut graph = DiGraph::new();
        let mut owners: Vec<Option<usize>> = vec![None; variables.len()];

        for (index, ports) in disciplines.iter().enumerate() {
            if disciplines[..index].iter().any(|p| p.name == ports.name) {
                return Err(GraphError::DuplicateDiscipline(ports.name.to_owned()));
            }
            graph.add_node(ports.name.to_owned());

            for &variable in ports.writes {
                let slot = lookup(&slot_of, ports.name, variable)?;
                if let Some(first) = owners[slot] {
                    return Err(GraphError::MultipleOwners {
                        variable: variable.to_owned(),
                        first: disciplines[first].name.to_owned(),
                        second: ports.name.to_owned(),
                    });
                }
                owners[slot] = Some(index);
            }
            for &variable in ports.reads {
                lookup(&slot_of, ports.name, variable)?;
            }
        }

        let owners = owners
            .into_iter()
            .enumerate()
            .map(|(slot, owner)| {
                owner.ok_or_else(|| GraphError::NoOwner(variables[slot].to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (reader, ports) in disciplines.iter().enumerate() {
            for &variable in ports.reads {
                let slot = lookup(&slot_of, ports.name, variable)?;
                graph.add_edge(
                    NodeIndex::new(owners[slot]),
                    NodeIndex::new(reader),
                    Link {
                        slot,
                        variable: variable.to_owned(),
                    },
                );
            }
        }

        Ok(Self { graph, owners })
    }

    /// The discipline that owns `slot`.
    #[must_use]
    pub fn owner(&self, slot: usize) -> Option<usize> {
        self.owners.get(slot).copied()
    }

    /// Slots owned by `discipline`, in slot order.
    #[must_use]
    pub fn owned(&self, discipline: usize) -> Vec<usize> {
        (0..self.owners.len())
            .filter(|&slot| self.owners[slot] == discipline)
            .collect()
    }

    /// The name of discipline `index`.
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.graph
            .node_weight(NodeIndex::new(index))
            .map(String::as_str)
    }

    /// Returns the number of disciplines in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of variable links in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Links feeding discipline `index`.
    pub fn incoming(&self, index: usize) -> impl Iterator<Item = &Link> {
        self.graph
            .edges_directed(NodeIndex::new(index), Direction::Incoming)
            .map(|edge| edge.weight())
    }

    /// Returns the execution schedule: blocks in dependency order.
    ///
    /// Each strongly connected component becomes one block. Blocks are
    /// emitted in topological order; when several are ready at once, the one
    /// holding the earliest-registered discipline goes first. The result
    /// depends only on the registration order and the declared ports.
    #[must_use]
    pub fn schedule(&self) -> Vec<Block> {
        let components = tarjan_scc(&self.graph);

        let mut component_of = vec![0; self.graph.node_count()];
        let blocks: Vec<Block> = components
            .iter()
            .enumerate()
            .map(|(id, nodes)| {
                for node in nodes {
                    component_of[node.index()] = id;
                }
                let mut members: Vec<usize> = nodes.iter().map(|n| n.index()).collect();
                members.sort_unstable();
                let cyclic = members.len() > 1 || self.graph.contains_edge(nodes[0], nodes[0]);
                Block { members, cyclic }
            })
            .collect();

        let dependencies: BTreeSet<(usize, usize)> = self
            .graph
            .edge_references()
            .map(|edge| {
                (
                    component_of[edge.source().index()],
                    component_of[edge.target().index()],
                )
            })
            .filter(|(from, to)| from != to)
            .collect();

        let mut waiting_on = vec![0_usize; blocks.len()];
        for &(_, to) in &dependencies {
            waiting_on[to] += 1;
        }

        let mut ready: BTreeSet<(usize, usize)> = (0..blocks.len())
            .filter(|&id| waiting_on[id] == 0)
            .map(|id| (blocks[id].members[0], id))
            .collect();

        let mut order = Vec::with_capacity(blocks.len());
        while let Some((_, id)) = ready.pop_first() {
            order.push(id);
            for &(_, to) in dependencies.range((id, 0)..=(id, usize::MAX)) {
                waiting_on[to] -= 1;
                if waiting_on[to] == 0 {
                    ready.insert((blocks[to].members[0], to));
                }
            }
        }

        order.into_iter().map(|id| blocks[id].clone()).collect()
    }
}

fn lookup(
    slot_of: &HashMap<&str, usize>,
    discipline: &str,
    variable: &str,
) -> Result<usize, GraphError> {
    slot_of
        .get(variable)
        .copied()
        .ok_or_else(|| GraphError::UnknownVariable {
            discipline: discipline.to_owned(),
            variable: variable.to_owned(),
        })
}

/// Errors raised while building a [`CouplingGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("discipline `{0}` is registered more than once")]
    DuplicateDiscipline(String),

    #[error("discipline `{discipline}` refers to unknown coupling variable `{variable}`")]
    UnknownVariable {
        discipline: String,
        variable: String,
    },

    #[error("coupling variable `{variable}` is written by both `{first}` and `{second}`")]
    MultipleOwners {
        variable: String,
        first: String,
        second: String,
    },

    #[error("coupling variable `{0}` is not written by any discipline")]
    NoOwner(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ports<'a>(
        name: &'a str,
        reads: &'a [&'static str],
        writes: &'a [&'static str],
    ) -> Ports<'a> {
        Ports {
            name,
            reads,
            writes,
        }
    }

    #[test]
    fn two_discipline_cycle_is_one_block() {
        let graph = CouplingGraph::new(
            &["y1", "y2"],
            &[ports("d1", &["y2"], &["y1"]), ports("d2", &["y1"], &["y2"])],
        )
        .expect("valid graph");

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(
            graph.schedule(),
            vec![Block {
                members: vec![0, 1],
                cyclic: true
            }]
        );
    }

    #[test]
    fn chain_runs_in_dependency_order() {
        // Registered backwards: c reads b, b reads a.
        let graph = CouplingGraph::new(
            &["a", "b", "c"],
            &[
                ports("last", &["b"], &["c"]),
                ports("middle", &["a"], &["b"]),
                ports("first", &[], &["a"]),
            ],
        )
        .expect("valid graph");

        let order: Vec<Vec<usize>> = graph.schedule().into_iter().map(|b| b.members).collect();
        assert_eq!(order, vec![vec![2], vec![1], vec![0]]);
        assert!(graph.schedule().iter().all(|block| !block.cyclic));
    }

    #[test]
    fn independent_blocks_keep_registration_order() {
        let graph = CouplingGraph::new(
            &["p", "q", "r"],
            &[
                ports("p", &[], &["p"]),
                ports("q", &[], &["q"]),
                ports("r", &["p", "q"], &["r"]),
            ],
        )
        .expect("valid graph");

        let order: Vec<Vec<usize>> = graph.schedule().into_iter().map(|b| b.members).collect();
        assert_eq!(order, vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn self_dependency_is_cyclic() {
        let graph = CouplingGraph::new(&["theta"], &[ports("structures", &["theta"], &["theta"])])
            .expect("valid graph");

        assert_eq!(
            graph.schedule(),
            vec![Block {
                members: vec![0],
                cyclic: true
            }]
        );
    }

    #[test]
    fn cycle_between_upstream_and_downstream_blocks() {
        let graph = CouplingGraph::new(
            &["a", "b", "c", "d"],
            &[
                ports("sink", &["c"], &["d"]),
                ports("loop_b", &["a", "c"], &["b"]),
                ports("loop_c", &["b"], &["c"]),
                ports("source", &[], &["a"]),
            ],
        )
        .expect("valid graph");

        assert_eq!(
            graph.schedule(),
            vec![
                Block {
                    members: vec![3],
                    cyclic: false
                },
                Block {
                    members: vec![1, 2],
                    cyclic: true
                },
                Block {
                    members: vec![0],
                    cyclic: false
                },
            ]
        );
        assert_eq!(graph.owned(1), vec![1]);
        assert_eq!(graph.owner(3), Some(0));
        assert_eq!(graph.incoming(1).count(), 2);
    }

    #[test]
    fn schedule_is_stable_across_calls() {
        let graph = CouplingGraph::new(
            &["y1", "y2", "g"],
            &[
                ports("d1", &["y2"], &["y1"]),
                ports("d2", &["y1"], &["y2"]),
                ports("con", &["y1", "y2"], &["g"]),
            ],
        )
        .expect("valid graph");

        assert_eq!(graph.schedule(), graph.schedule());
    }

    #[test]
    fn rejects_ownership_errors() {
        let unknown = CouplingGraph::new(&["y1"], &[ports("d1", &["y9"], &["y1"])]);
        assert!(matches!(
            unknown.unwrap_err(),
            GraphError::UnknownVariable { variable, .. } if variable == "y9"
        ));

        let shared = CouplingGraph::new(
            &["y1"],
            &[ports("d1", &[], &["y1"]), ports("d2", &[], &["y1"])],
        );
        assert_eq!(
            shared.unwrap_err(),
            GraphError::MultipleOwners {
                variable: "y1".into(),
                first: "d1".into(),
                second: "d2".into(),
            }
        );

        let orphan = CouplingGraph::new(&["y1", "y2"], &[ports("d1", &["y2"], &["y1"])]);
        assert_eq!(orphan.unwrap_err(), GraphError::NoOwner("y2".into()));

        let twice = CouplingGraph::new(
            &["a", "b"],
            &[ports("d", &[], &["a"]), ports("d", &[], &["b"])],
        );
        assert_eq!(
            twice.unwrap_err(),
            GraphError::DuplicateDiscipline("d".into())
        );
    }
}
