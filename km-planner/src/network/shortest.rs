//! Dijkstra over the undirected distance graph.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::domain::Station;

use super::DistanceGraph;

/// Frontier entry. Ordered so that `BinaryHeap` pops the smallest cost
/// first, and among equal costs the entry discovered first.
#[derive(Debug, Clone, Copy)]
struct Frontier<'a> {
    cost: f64,
    seq: u64,
    station: &'a Station,
}

impl Ord for Frontier<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Frontier<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier<'_> {}

/// Shortest path from `start` to `goal`, as the list of visited stations
/// (both ends included) and its total length.
///
/// Returns `None` if either station is unknown or no path exists.
pub(crate) fn shortest_path(
    graph: &DistanceGraph,
    start: &Station,
    goal: &Station,
) -> Option<(Vec<Station>, f64)> {
    if !graph.contains(start) || !graph.contains(goal) {
        return None;
    }

    let mut dist: HashMap<&Station, f64> = HashMap::new();
    let mut parent: HashMap<&Station, &Station> = HashMap::new();
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;

    dist.insert(start, 0.0);
    heap.push(Frontier {
        cost: 0.0,
        seq,
        station: start,
    });

    while let Some(Frontier { cost, station, .. }) = heap.pop() {
        if station == goal {
            return Some((reconstruct(&parent, start, goal), cost));
        }

        if dist.get(station).is_some_and(|&best| cost > best) {
            continue;
        }

        for (next, km) in graph.neighbours(station) {
            let candidate = cost + km;
            if dist.get(next).is_none_or(|&known| candidate < known) {
                dist.insert(next, candidate);
                parent.insert(next, station);
                seq += 1;
                heap.push(Frontier {
                    cost: candidate,
                    seq,
                    station: next,
                });
            }
        }
    }

    None
}

/// Walk parent links back from `goal` to `start`.
fn reconstruct(
    parent: &HashMap<&Station, &Station>,
    start: &Station,
    goal: &Station,
) -> Vec<Station> {
    let mut path = vec![goal.clone()];
    let mut current = goal;
    while current != start {
        match parent.get(current) {
            Some(prev) => {
                path.push((*prev).clone());
                current = *prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
