use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::ops::Index;

use arrayvec::ArrayVec;
use log::debug;

use crate::heuristic::Manhattan;
use crate::{Direction, Fingerprint, Puzzle, State};

type IndexMap<K, V> = indexmap::IndexMap<K, V, fxhash::FxBuildHasher>;

/// Position of a node in its [`Arena`], which is also its creation order.
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub state: State,
    /// Number of slides from the root.
    pub depth: u32,
    /// Frontier ordering key.
    pub cost: u32,
    pub parent: Option<(NodeId, Direction)>,
    /// Set once the node is expanded. A closed node is never reached by a shorter path when the
    /// heuristic is consistent.
    pub closed: bool,
}

impl Node {
    pub fn root(state: State) -> Self {
        Self {
            state,
            depth: 0,
            cost: 0,
            parent: None,
            closed: false,
        }
    }

    /// Every node one slide away, in generation order. `id` is this node's own id.
    pub fn expand(&self, id: NodeId) -> impl Iterator<Item = Node> + '_ {
        let depth = self.depth + 1;
        self.state.successors().map(move |(dir, state)| Node {
            state,
            depth,
            cost: depth,
            parent: Some((id, dir)),
            closed: false,
        })
    }
}

/// Every node created during one search, keyed by the fingerprint of its board.
///
/// The key set doubles as the visited set: a board is recorded when its node enters the
/// frontier and never again. Links only ever point at earlier, shallower nodes.
#[derive(Debug, Default)]
pub struct Arena {
    nodes: IndexMap<Fingerprint, Node>,
}

impl Index<NodeId> for Arena {
    type Output = Node;
    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id]
    }
}

impl Arena {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn id_of(&self, fingerprint: Fingerprint) -> Option<NodeId> {
        self.nodes.get_index_of(&fingerprint)
    }

    /// Records `node` unless its board is already known.
    pub fn insert(&mut self, node: Node) -> Option<NodeId> {
        let fingerprint = node.state.fingerprint();
        if self.nodes.contains_key(&fingerprint) {
            return None;
        }
        Some(self.nodes.insert_full(fingerprint, node).0)
    }

    fn close(&mut self, id: NodeId) {
        self.nodes[id].closed = true;
    }

    /// Moves an open node onto a shorter path. Open nodes have no children yet, so no link
    /// goes stale.
    fn reroute(&mut self, id: NodeId, node: Node) {
        let old = &mut self.nodes[id];
        debug_assert!(!old.closed && node.depth < old.depth);
        debug_assert_eq!(old.state, node.state);
        *old = node;
    }

    fn chain(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        std::iter::successors(Some(&self.nodes[id]), |node| {
            node.parent.map(|(parent, _)| &self.nodes[parent])
        })
    }

    /// States from the root to `goal`.
    pub fn path(&self, goal: NodeId) -> Vec<State> {
        let mut states = self
            .chain(goal)
            .map(|node| node.state.clone())
            .collect::<Vec<_>>();
        states.reverse();
        states
    }

    /// Slides leading from the root to `goal`.
    pub fn moves(&self, goal: NodeId) -> Vec<Direction> {
        let mut moves = self
            .chain(goal)
            .filter_map(|node| node.parent.map(|(_, dir)| dir))
            .collect::<Vec<_>>();
        moves.reverse();
        moves
    }
}

/// Pending nodes of a search. Only ids are stored, the nodes live in the [`Arena`].
///
/// An id may be pushed again after its node was rerouted. The search skips ids popped after
/// their node was closed.
pub trait Frontier {
    const NAME: &'static str;

    /// Ordering key of a node about to be pushed.
    fn cost(&self, node: &Node) -> u32 {
        node.depth
    }

    fn push(&mut self, id: NodeId, node: &Node);

    fn pop(&mut self) -> Option<NodeId>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// First in, first out.
#[derive(Debug, Default)]
pub struct Fifo(VecDeque<NodeId>);

impl Frontier for Fifo {
    const NAME: &'static str = "bfs";

    fn push(&mut self, id: NodeId, _: &Node) {
        self.0.push_back(id);
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.0.pop_front()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Lowest `depth + heuristic` first. Ties go to the node created first.
#[derive(Debug)]
pub struct BestFirst {
    heuristic: Manhattan,
    heap: BinaryHeap<Reverse<(u32, NodeId)>>,
}

impl BestFirst {
    pub fn new(heuristic: Manhattan) -> Self {
        Self {
            heuristic,
            heap: BinaryHeap::new(),
        }
    }
}

impl Frontier for BestFirst {
    const NAME: &'static str = "astar";

    fn cost(&self, node: &Node) -> u32 {
        node.depth + self.heuristic.estimate(&node.state)
    }

    fn push(&mut self, id: NodeId, node: &Node) {
        self.heap.push(Reverse((node.cost, id)));
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|Reverse((_, id))| id)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Give up after expanding this many nodes.
    pub max_expansions: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub expanded: usize,
    pub visited: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub depth: u32,
    /// From the initial state to the goal, both included.
    pub states: Vec<State>,
    pub moves: Vec<Direction>,
    pub stats: Stats,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Solved(Solution),
    /// Every board reachable from the initial one was visited.
    NoSolution(Stats),
    /// The expansion budget ran out.
    Interrupted(Stats),
}

impl Outcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Outcome::Solved(solution) => Some(solution),
            Outcome::NoSolution(_) | Outcome::Interrupted(_) => None,
        }
    }

    pub fn stats(&self) -> Stats {
        match self {
            Outcome::Solved(solution) => solution.stats,
            Outcome::NoSolution(stats) | Outcome::Interrupted(stats) => *stats,
        }
    }
}

pub fn search<F: Frontier>(
    puzzle: &Puzzle,
    mut frontier: F,
    config: &SearchConfig,
    mut on_step: impl FnMut(),
) -> Outcome {
    debug!(
        "{}: searching from {:?}",
        F::NAME,
        puzzle.initial().fingerprint()
    );

    let mut arena = Arena::default();
    let mut root = Node::root(puzzle.initial().clone());
    root.cost = frontier.cost(&root);
    let root_id = arena.insert(root).expect("Arena starts empty");
    frontier.push(root_id, &arena[root_id]);

    let mut expanded = 0;
    let stats = |expanded, arena: &Arena| Stats {
        expanded,
        visited: arena.len(),
    };

    let goal_id = loop {
        #[cfg(feature = "coz")]
        coz::scope!("Expand");

        let Some(id) = frontier.pop() else {
            debug!("{}: exhausted after {expanded} expansions", F::NAME);
            return Outcome::NoSolution(stats(expanded, &arena));
        };
        if arena[id].closed {
            continue;
        }
        if arena[id].state.is_goal(puzzle.goal()) {
            break id;
        }
        if config.max_expansions.map_or(false, |max| expanded >= max) {
            debug!("{}: gave up after {expanded} expansions", F::NAME);
            return Outcome::Interrupted(stats(expanded, &arena));
        }

        on_step();
        #[cfg(feature = "coz")]
        coz::progress!("Step");
        expanded += 1;
        arena.close(id);

        let children = arena[id].expand(id).collect::<ArrayVec<_, 4>>();
        for mut child in children {
            let child_id = match arena.id_of(child.state.fingerprint()) {
                None => {
                    child.cost = frontier.cost(&child);
                    let Some(child_id) = arena.insert(child) else {
                        continue;
                    };
                    child_id
                }
                // Only A* can reach a queued board again with fewer slides.
                Some(known) if !arena[known].closed && child.depth < arena[known].depth => {
                    child.cost = frontier.cost(&child);
                    arena.reroute(known, child);
                    known
                }
                Some(_) => continue,
            };
            frontier.push(child_id, &arena[child_id]);
        }
    };

    let solution = Solution {
        depth: arena[goal_id].depth,
        states: arena.path(goal_id),
        moves: arena.moves(goal_id),
        stats: stats(expanded, &arena),
    };
    debug!(
        "{}: {} moves, {} expanded, {} visited",
        F::NAME,
        solution.depth,
        expanded,
        arena.len(),
    );
    Outcome::Solved(solution)
}

pub fn bfs(puzzle: &Puzzle, config: &SearchConfig, on_step: impl FnMut()) -> Outcome {
    search(puzzle, Fifo::default(), config, on_step)
}

pub fn astar(puzzle: &Puzzle, config: &SearchConfig, on_step: impl FnMut()) -> Outcome {
    let frontier = BestFirst::new(Manhattan::new(puzzle.goal()));
    search(puzzle, frontier, config, on_step)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Bfs,
    AStar,
}

impl Strategy {
    pub const ALL: [Self; 2] = [Self::Bfs, Self::AStar];

    pub fn run(self, puzzle: &Puzzle, config: &SearchConfig, on_step: impl FnMut()) -> Outcome {
        match self {
            Strategy::Bfs => bfs(puzzle, config, on_step),
            Strategy::AStar => astar(puzzle, config, on_step),
        }
    }
}
