// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A stable topological sort over index-based dependency graphs.
//!
//! Used by the render manager to turn declared producer/consumer resource
//! relationships between passes into an execution order, while preserving
//! registration order among passes with no ordering constraint between
//! them (so an already-correctly-ordered pass list is left untouched).

use std::fmt;

/// An error indicating that the dependency graph contains a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError;

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dependency graph contains a cycle")
    }
}

impl std::error::Error for CycleError {}

/// Topologically sorts the nodes `0..node_count` under `edges`.
///
/// Each edge `(parent, child)` requires `parent` to appear before `child`.
/// Among nodes that are mutually unordered, the lowest index is emitted
/// first, making the result deterministic and stable with respect to the
/// callers' insertion order.
///
/// # Errors
///
/// Returns [`CycleError`] when the edges form at least one cycle.
pub fn topological_sort_stable(
    node_count: usize,
    edges: &[(usize, usize)],
) -> Result<Vec<usize>, CycleError> {
    let mut in_degree = vec![0usize; node_count];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    for &(parent, child) in edges {
        debug_assert!(parent < node_count && child < node_count);
        children[parent].push(child);
        in_degree[child] += 1;
    }

    let mut emitted = vec![false; node_count];
    let mut sorted = Vec::with_capacity(node_count);

    // Repeatedly pick the lowest-index ready node. Quadratic in the node
    // count, which stays in the single digits for a pass list.
    while sorted.len() < node_count {
        let next = (0..node_count).find(|&n| !emitted[n] && in_degree[n] == 0);
        let Some(node) = next else {
            return Err(CycleError);
        };
        emitted[node] = true;
        sorted.push(node);
        for &child in &children[node] {
            in_degree[child] -= 1;
        }
    }
    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_edges_preserves_insertion_order() {
        assert_eq!(topological_sort_stable(4, &[]).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn edges_reorder_only_where_required() {
        // 3 must precede 0; everything else keeps its position.
        let order = topological_sort_stable(4, &[(3, 0)]).unwrap();
        assert_eq!(order, vec![1, 2, 3, 0]);
    }

    #[test]
    fn chain_is_fully_ordered() {
        let order = topological_sort_stable(3, &[(2, 1), (1, 0)]).unwrap();
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn already_sorted_input_is_untouched() {
        let order = topological_sort_stable(3, &[(0, 1), (1, 2)]).unwrap();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn cycle_is_detected() {
        assert_eq!(
            topological_sort_stable(2, &[(0, 1), (1, 0)]),
            Err(CycleError)
        );
    }
}
