//! Strongly connected components via Tarjan's algorithm.
//!
//! # Algorithm
//!
//! A single depth-first search assigns each vertex a discovery index and a
//! low-link (the smallest discovery index reachable through tree edges plus
//! at most one back edge to a vertex still on the membership stack). A
//! vertex whose low-link equals its own index roots a component: everything
//! above it on the membership stack, itself included, is popped into that
//! component.
//!
//! The search runs on an explicit, heap-allocated frame stack. Each frame is
//! a vertex plus the cursor into its successor list, so depth is bounded by
//! memory rather than by the thread's call stack.
//!
//! # Determinism
//!
//! Roots are tried in ascending vertex id and successors in adjacency-list
//! order. Components are numbered in the order they are emitted (which is a
//! reverse topological order of the condensation) and members are listed in
//! the order they come off the membership stack.

use serde::Serialize;
use tracing::{debug, instrument};

use sccdag_core::{Adjacency, Metrics};

const UNVISITED: usize = usize::MAX;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One strongly connected component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    /// Component id in `[0, k)`.
    pub id: usize,
    /// Member vertices in membership-stack pop order.
    pub members: Vec<usize>,
}

impl Component {
    /// Return `true` if this component contains more than one vertex.
    #[must_use]
    pub fn is_cycle(&self) -> bool {
        self.members.len() > 1
    }
}

/// A partition of the vertices `0..n` into strongly connected components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Components {
    components: Vec<Component>,
    #[serde(skip)]
    component_of: Vec<usize>,
}

impl Components {
    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Components in id order.
    #[must_use]
    pub fn as_slice(&self) -> &[Component] {
        &self.components
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    /// Component id of `vertex`.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is not a vertex of the decomposed graph.
    #[must_use]
    pub fn component_of(&self, vertex: usize) -> usize {
        self.component_of[vertex]
    }

    /// Vertex → component lookup table.
    #[must_use]
    pub fn lookup(&self) -> &[usize] {
        &self.component_of
    }

    /// Number of components with more than one member.
    #[must_use]
    pub fn cycle_count(&self) -> usize {
        self.components.iter().filter(|c| c.is_cycle()).count()
    }

    /// Expand an order over component ids into an order over vertices,
    /// listing each component's members in place.
    #[must_use]
    pub fn expand_order(&self, order: &[usize]) -> Vec<usize> {
        order
            .iter()
            .flat_map(|&id| self.components[id].members.iter().copied())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tarjan
// ---------------------------------------------------------------------------

/// One suspended call of the depth-first search.
struct Frame<I> {
    vertex: usize,
    successors: I,
}

/// Per-vertex search state.
struct Search {
    index: Vec<usize>,
    low_link: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next_index: usize,
    components: Vec<Component>,
    component_of: Vec<usize>,
}

impl Search {
    fn new(n: usize) -> Self {
        Self {
            index: vec![UNVISITED; n],
            low_link: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            next_index: 0,
            components: Vec::new(),
            component_of: vec![0; n],
        }
    }

    fn discover(&mut self, v: usize, metrics: &mut Metrics) {
        metrics.inc_dfs();
        self.index[v] = self.next_index;
        self.low_link[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
    }

    fn emit_component(&mut self, root: usize) {
        let id = self.components.len();
        let mut members = Vec::new();
        while let Some(x) = self.stack.pop() {
            self.on_stack[x] = false;
            self.component_of[x] = id;
            members.push(x);
            if x == root {
                break;
            }
        }
        self.components.push(Component { id, members });
    }
}

/// Partition the vertices of `graph` into strongly connected components.
///
/// `metrics` is timed over the whole search and receives one `dfs_ops`
/// increment per vertex discovery.
#[instrument(skip_all, fields(vertices = graph.node_count()))]
pub fn tarjan(graph: &impl Adjacency, metrics: &mut Metrics) -> Components {
    metrics.start();

    let n = graph.node_count();
    let mut search = Search::new(n);
    let mut frames = Vec::new();

    for root in 0..n {
        if search.index[root] != UNVISITED {
            continue;
        }
        search.discover(root, metrics);
        frames.push(Frame {
            vertex: root,
            successors: graph.successors(root),
        });

        while let Some(frame) = frames.last_mut() {
            let v = frame.vertex;
            if let Some(w) = frame.successors.next() {
                if search.index[w] == UNVISITED {
                    search.discover(w, metrics);
                    frames.push(Frame {
                        vertex: w,
                        successors: graph.successors(w),
                    });
                } else if search.on_stack[w] {
                    search.low_link[v] = search.low_link[v].min(search.index[w]);
                }
                continue;
            }

            // All successors of v explored: return to the caller frame.
            frames.pop();
            if let Some(parent) = frames.last() {
                let p = parent.vertex;
                search.low_link[p] = search.low_link[p].min(search.low_link[v]);
            }
            if search.low_link[v] == search.index[v] {
                search.emit_component(v);
            }
        }
    }

    metrics.stop();
    debug!(
        components = search.components.len(),
        visits = metrics.dfs_ops(),
        "strongly connected components computed"
    );

    Components {
        components: search.components,
        component_of: search.component_of,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
