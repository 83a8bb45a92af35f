//! A* search over the tile grid.
//!
//! The search is fully deterministic: the open set is ordered by `f`, then by the
//! heuristic `h`, then by insertion order, and neighbors are expanded right, down,
//! left, up. Equal-cost paths therefore always resolve the same way.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::IVec2;
use tracing::trace;

use crate::constants::SEARCH_BUDGET_FACTOR;
use crate::map::grid::Grid;

/// Manhattan distance between two tiles.
pub fn manhattan(a: IVec2, b: IVec2) -> u32 {
    (a - b).abs().element_sum() as u32
}

struct Node {
    tile: IVec2,
    g: u32,
    h: u32,
    parent: Option<usize>,
}

impl Node {
    fn f(&self) -> u32 {
        self.g + self.h
    }
}

/// A heap key for a node. Keys are never updated; a node whose cost improves gets a
/// fresh key and the old one is skipped when it surfaces.
#[derive(Debug, PartialEq, Eq)]
struct OpenEntry {
    f: u32,
    h: u32,
    seq: u64,
    node: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so that `BinaryHeap` pops the smallest (f, h, seq) first.
        (other.f, other.h, other.seq).cmp(&(self.f, self.h, self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds a shortest 4-directional path from `start` to `goal`, both inclusive.
///
/// Returns `None` if either end is a wall or out of bounds, if the goal is unreachable,
/// or if the search exceeds its budget of `rows * cols * SEARCH_BUDGET_FACTOR` expansions.
pub fn find_path(grid: &Grid, start: IVec2, goal: IVec2) -> Option<Vec<IVec2>> {
    if !grid.is_walkable(start) || !grid.is_walkable(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let cols = grid.cols();
    let slot = |tile: IVec2| tile.y as usize * cols + tile.x as usize;
    let area = grid.rows() * cols;
    let budget = area * SEARCH_BUDGET_FACTOR;

    let mut nodes = vec![Node {
        tile: start,
        g: 0,
        h: manhattan(start, goal),
        parent: None,
    }];
    let mut open_index: Vec<Option<usize>> = vec![None; area];
    let mut closed = vec![false; area];
    let mut open = BinaryHeap::new();
    let mut seq = 0u64;

    open_index[slot(start)] = Some(0);
    open.push(OpenEntry {
        f: nodes[0].f(),
        h: nodes[0].h,
        seq,
        node: 0,
    });

    let mut expansions = 0usize;
    while let Some(entry) = open.pop() {
        let current = entry.node;
        let tile = nodes[current].tile;
        if closed[slot(tile)] || entry.f != nodes[current].f() {
            continue;
        }

        expansions += 1;
        if expansions > budget {
            trace!(?start, ?goal, expansions, "Path search exceeded its budget");
            return None;
        }

        if tile == goal {
            return Some(reconstruct(&nodes, current));
        }
        closed[slot(tile)] = true;

        let g = nodes[current].g + 1;
        for next in grid.neighbors(tile) {
            if closed[slot(next)] {
                continue;
            }

            let index = match open_index[slot(next)] {
                Some(existing) if nodes[existing].g <= g => continue,
                Some(existing) => {
                    let node = &mut nodes[existing];
                    node.g = g;
                    node.parent = Some(current);
                    existing
                }
                None => {
                    nodes.push(Node {
                        tile: next,
                        g,
                        h: manhattan(next, goal),
                        parent: Some(current),
                    });
                    open_index[slot(next)] = Some(nodes.len() - 1);
                    nodes.len() - 1
                }
            };

            seq += 1;
            open.push(OpenEntry {
                f: nodes[index].f(),
                h: nodes[index].h,
                seq,
                node: index,
            });
        }
    }

    trace!(?start, ?goal, "No path between tiles");
    None
}

fn reconstruct(nodes: &[Node], goal: usize) -> Vec<IVec2> {
    let mut path = Vec::new();
    let mut cursor = Some(goal);
    while let Some(index) = cursor {
        path.push(nodes[index].tile);
        cursor = nodes[index].parent;
    }
    path.reverse();
    path
}
