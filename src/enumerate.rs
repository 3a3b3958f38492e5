//! Exhaustive enumeration of closed families on `n` points.
//!
//! The enumerator walks every family `F ⊆ P({1..n})` that contains `∅` and
//! the universe and is closed under union (and, in topology mode, under
//! intersection). In topology mode the number of such families is the number
//! of topologies on `n` labelled points (OEIS A000798).
//!
//! # Search
//!
//! A candidate family is a bit vector of width `2^n` (see [`FamilyMask`]).
//! The subsets are decided one by one in increasing order of their masks,
//! each one first excluded and then included:
//!
//! - Including `s` requires `t ∩ s` to be a member for every member `t`
//!   (topology mode). Since `t ∩ s < s`, that subset is already decided.
//! - Including `s` makes every union `t ∪ s > s` *required*: it can no
//!   longer be excluded when its turn comes.
//! - `∅`, the universe and required subsets cannot be excluded.
//!
//! With this propagation every branch of the search ends in a closed
//! family, so the number of leaves is the number of families.
//!
//! # Parallelism and cancellation
//!
//! The first [`split_depth`][EnumeratorConfig::split_depth] decisions are
//! expanded into a frontier of independent subtrees that are searched with
//! `rayon`. Each worker polls the [`CancelToken`] every
//! [`check_interval`][EnumeratorConfig::check_interval] nodes; a cancelled
//! run reports the families found so far and is marked
//! [`Completion::Cancelled`].
//!
//! # Examples
//!
//! ```
//! use finite_topology::cancel::CancelToken;
//! use finite_topology::enumerate::{Enumerator, EnumeratorConfig};
//! use num_bigint::BigUint;
//!
//! let enumeration = Enumerator::new(EnumeratorConfig::default())
//!     .run(3, &CancelToken::never())
//!     .unwrap();
//! assert!(enumeration.is_complete());
//! assert_eq!(enumeration.count, BigUint::from(29u32));
//! assert_eq!(enumeration.verified, Some(true));
//! ```

use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::time::Instant;

use log::{debug, error, info, warn};
use num_bigint::BigUint;
use rayon::prelude::*;

use crate::cancel::{CancelToken, Ticker, DEFAULT_CHECK_INTERVAL};
use crate::element::Point;
use crate::error::{Error, Result};
use crate::family::Family;
use crate::mask::FamilyMask;

/// Hard ceiling on the number of points, whatever the configuration says.
pub const MAX_CARDINALITY: usize = 16;

/// Number of topologies on `n` labelled points (OEIS A000798).
const TOPOLOGY_COUNTS: [u64; 11] = [1, 1, 4, 29, 355, 6942, 209527, 9535241, 642779354, 63260289423, 8977053873043];

/// Known number of topologies on `n` points, for `n <= 10`.
pub fn reference_count(n: usize) -> Option<BigUint> {
    TOPOLOGY_COUNTS.get(n).map(|&count| BigUint::from(count))
}

/// Closure condition of the enumerated families.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Closure {
    /// Contains `∅` and the universe, closed under union.
    Union,
    /// Contains `∅` and the universe, closed under union and intersection.
    #[default]
    Topology,
}

impl Display for Closure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Closure::Union => write!(f, "union"),
            Closure::Topology => write!(f, "topology"),
        }
    }
}

/// Configuration of an [`Enumerator`]. Use `EnumeratorConfig::default()` for standard settings.
#[derive(Debug, Clone)]
pub struct EnumeratorConfig {
    pub closure: Closure,
    /// Largest accepted `n`; capped by [`MAX_CARDINALITY`].
    pub max_cardinality: usize,
    /// Keep every family found, not only the count.
    pub collect_families: bool,
    /// Search the frontier with `rayon`.
    pub parallel: bool,
    /// Number of decisions expanded into the parallel frontier.
    pub split_depth: usize,
    /// Size of a dedicated worker pool; `None` uses the global pool.
    pub threads: Option<usize>,
    /// Search nodes between two polls of the cancellation token.
    pub check_interval: u32,
}

impl Default for EnumeratorConfig {
    fn default() -> Self {
        Self {
            closure: Closure::Topology,
            max_cardinality: 7,
            collect_families: false,
            parallel: true,
            split_depth: 10,
            threads: None,
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }
}

/// Whether an enumeration ran to the end.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Completion {
    Finished,
    /// The token fired; the count is a lower bound.
    Cancelled,
}

/// Result of [`Enumerator::run`].
#[derive(Debug, Clone)]
pub struct Enumeration {
    /// Number of points `n`.
    pub cardinality: usize,
    pub closure: Closure,
    /// Number of families found.
    pub count: BigUint,
    /// The families found, if collected.
    pub families: BTreeSet<Family<Point>>,
    pub completion: Completion,
    /// Agreement with [`reference_count`] for finished topology runs with a known count.
    pub verified: Option<bool>,
    /// Number of search nodes visited.
    pub nodes: u64,
}

impl Enumeration {
    pub fn is_complete(&self) -> bool {
        self.completion == Completion::Finished
    }
}

/// Backtracking enumerator of closed families.
#[derive(Debug, Clone, Default)]
pub struct Enumerator {
    config: EnumeratorConfig,
}

impl Enumerator {
    pub fn new(config: EnumeratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EnumeratorConfig {
        &self.config
    }

    /// Enumerates the closed families on `n` points.
    ///
    /// Fails with [`Error::CardinalityTooLarge`] if `n` exceeds the configured
    /// ceiling. Cancellation is not an error: the result is marked
    /// [`Completion::Cancelled`] and carries what was found so far.
    pub fn run(&self, n: usize, token: &CancelToken) -> Result<Enumeration> {
        let max = self.config.max_cardinality.min(MAX_CARDINALITY);
        if n > max {
            return Err(Error::CardinalityTooLarge { cardinality: n, max });
        }
        info!("Enumerating {} families on {} points", self.config.closure, n);
        let start = Instant::now();

        let outcome = match self.config.threads {
            Some(threads) if self.config.parallel => {
                let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
                pool.install(|| self.dispatch(n, token))
            }
            _ => self.dispatch(n, token),
        }?;

        let completion = if outcome.cancelled {
            warn!("Enumeration on {} points cancelled after {} nodes", n, outcome.nodes);
            Completion::Cancelled
        } else {
            Completion::Finished
        };

        let verified = match (completion, self.config.closure, reference_count(n)) {
            (Completion::Finished, Closure::Topology, Some(expected)) => {
                let ok = outcome.count == expected;
                if !ok {
                    error!(
                        "Self-check failed: found {} topologies on {} points, expected {}",
                        outcome.count, n, expected
                    );
                }
                Some(ok)
            }
            _ => None,
        };

        info!(
            "Found {} families on {} points ({} nodes) in {:.3?}",
            outcome.count, n, outcome.nodes, start.elapsed()
        );

        Ok(Enumeration {
            cardinality: n,
            closure: self.config.closure,
            count: outcome.count,
            families: outcome.families.into_iter().collect(),
            completion,
            verified,
            nodes: outcome.nodes,
        })
    }

    fn dispatch(&self, n: usize, token: &CancelToken) -> Result<Partial> {
        if n <= 6 {
            self.run_with::<u64>(n, token)
        } else if n == 7 {
            self.run_with::<u128>(n, token)
        } else {
            self.run_with::<BigUint>(n, token)
        }
    }

    fn run_with<M: FamilyMask>(&self, n: usize, token: &CancelToken) -> Result<Partial> {
        debug_assert!(M::MAX_POINTS.map_or(true, |max| n <= max));
        let root = State::<M>::root(n, self.config.closure);

        let mut frontier = Vec::new();
        if self.config.parallel {
            root.expand(self.config.split_depth, &mut frontier);
        } else {
            frontier.push(root);
        }
        debug!("Frontier of {} subtrees at depth {}", frontier.len(), self.config.split_depth);

        let search = |state: State<M>| state.search(token, &self.config);
        let partials: Vec<Result<Partial>> = if self.config.parallel {
            frontier.into_par_iter().map(search).collect()
        } else {
            frontier.into_iter().map(search).collect()
        };

        let mut total = Partial::default();
        for partial in partials {
            total.merge(partial?);
        }
        Ok(total)
    }
}

/// Counts and families found in one or more subtrees.
#[derive(Debug, Default)]
struct Partial {
    count: BigUint,
    families: Vec<Family<Point>>,
    nodes: u64,
    cancelled: bool,
}

impl Partial {
    fn merge(&mut self, other: Partial) {
        self.count += other.count;
        self.families.extend(other.families);
        self.nodes += other.nodes;
        self.cancelled |= other.cancelled;
    }
}

/// One decision on the search stack.
#[derive(Debug, Copy, Clone)]
struct Frame {
    subset: u32,
    included: bool,
    /// Length of the newly-required log before this decision.
    mark: usize,
}

/// A partial assignment: subsets `0..next` are decided.
#[derive(Debug, Clone)]
struct State<M> {
    n: usize,
    closure: Closure,
    universe: u32,
    width: u32,
    next: u32,
    included: M,
    required: M,
    members: Vec<u32>,
}

impl<M: FamilyMask> State<M> {
    fn root(n: usize, closure: Closure) -> Self {
        let width = 1u32 << n;
        Self {
            n,
            closure,
            universe: width - 1,
            width,
            next: 0,
            included: M::zero(),
            required: M::zero(),
            members: Vec::with_capacity(width as usize),
        }
    }

    fn can_exclude(&self, s: u32) -> bool {
        s != 0 && s != self.universe && !self.required.get(s)
    }

    /// Includes `s` if the intersection condition allows it, logging new requirements into `log`.
    fn include(&mut self, s: u32, log: &mut Vec<u32>) -> bool {
        if self.closure == Closure::Topology && !self.members.iter().all(|&t| self.included.get(t & s)) {
            return false;
        }
        for &t in &self.members {
            let union = t | s;
            if union != s && !self.required.get(union) {
                self.required.set(union);
                log.push(union);
            }
        }
        self.included.set(s);
        self.members.push(s);
        true
    }

    fn undo_include(&mut self, s: u32, mark: usize, log: &mut Vec<u32>) {
        self.members.pop();
        self.included.clear(s);
        for union in log.drain(mark..) {
            self.required.clear(union);
        }
    }

    fn is_complete(&self) -> bool {
        self.next == self.width
    }

    fn is_valid_leaf(&self) -> bool {
        self.included.get(0) && self.included.get(self.universe)
    }

    fn family(&self) -> Result<Family<Point>> {
        Family::from_code(self.n, &self.included.to_code())
    }

    /// Expands the first `depth` decisions below `self` into independent states.
    fn expand(self, depth: usize, out: &mut Vec<Self>) {
        if depth == 0 || self.is_complete() {
            out.push(self);
            return;
        }
        let s = self.next;
        if self.can_exclude(s) {
            let mut excluded = self.clone();
            excluded.next += 1;
            excluded.expand(depth - 1, out);
        }
        let mut included = self;
        if included.include(s, &mut Vec::new()) {
            included.next += 1;
            included.expand(depth - 1, out);
        }
    }

    /// Depth-first search of the subtree below `self`.
    fn search(mut self, token: &CancelToken, config: &EnumeratorConfig) -> Result<Partial> {
        let mut partial = Partial::default();
        if token.is_cancelled() {
            partial.cancelled = true;
            return Ok(partial);
        }

        let mut ticker = Ticker::new(token, config.check_interval);
        let mut frames: Vec<Frame> = Vec::with_capacity((self.width - self.next) as usize);
        let mut log: Vec<u32> = Vec::new();

        'descend: loop {
            if ticker.tick() {
                partial.cancelled = true;
                break;
            }
            partial.nodes += 1;

            if self.is_complete() {
                debug_assert!(self.is_valid_leaf(), "leaf without ∅ or universe");
                if self.is_valid_leaf() {
                    partial.count += 1u32;
                    if config.collect_families {
                        partial.families.push(self.family()?);
                    }
                }
            } else {
                let s = self.next;
                let mark = log.len();
                if self.can_exclude(s) {
                    frames.push(Frame {
                        subset: s,
                        included: false,
                        mark,
                    });
                    self.next += 1;
                    continue;
                }
                if self.include(s, &mut log) {
                    frames.push(Frame {
                        subset: s,
                        included: true,
                        mark,
                    });
                    self.next += 1;
                    continue;
                }
            }

            // Backtrack to the deepest exclusion whose inclusion is still open.
            loop {
                let Some(frame) = frames.pop() else {
                    break 'descend;
                };
                if frame.included {
                    self.undo_include(frame.subset, frame.mark, &mut log);
                    continue;
                }
                if self.include(frame.subset, &mut log) {
                    frames.push(Frame { included: true, ..frame });
                    self.next = frame.subset + 1;
                    continue 'descend;
                }
            }
        }

        debug!(
            "Subtree at {}/{} on {} points: {} families, {} nodes",
            self.next, self.width, self.n, partial.count, partial.nodes
        );
        Ok(partial)
    }
}

/// Enumerates the topologies on `n` points, keeping every family.
pub fn enumerate_union_closed_families(n: usize) -> Result<Enumeration> {
    let config = EnumeratorConfig {
        collect_families: true,
        ..Default::default()
    };
    Enumerator::new(config).run(n, &CancelToken::never())
}

/// Counts the topologies on `n` points.
pub fn count_topologies(n: usize) -> Result<BigUint> {
    Ok(Enumerator::default().run(n, &CancelToken::never())?.count)
}
