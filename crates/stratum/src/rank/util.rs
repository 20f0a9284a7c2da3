//! Rank helpers (longest path).

use super::RankGraph;

/// Ranks every node as high as its descendants allow: sinks get 0, every other node sits
/// `minlen` above its closest successor. Iterative post-order DFS.
pub fn longest_path(rg: &RankGraph) -> Vec<i32> {
    let n = rg.node_count();
    let mut ranks: Vec<i32> = vec![0; n];
    let mut done: Vec<bool> = vec![false; n];
    let mut on_stack: Vec<bool> = vec![false; n];

    for start in 0..n {
        if done[start] {
            continue;
        }
        on_stack[start] = true;
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        while let Some(frame) = stack.last_mut() {
            let v = frame.0;
            if let Some(&e) = rg.out_edges[v].get(frame.1) {
                frame.1 += 1;
                let w = rg.edges[e].w;
                if !done[w] && !on_stack[w] {
                    on_stack[w] = true;
                    stack.push((w, 0));
                }
                continue;
            }
            stack.pop();
            on_stack[v] = false;
            done[v] = true;
            ranks[v] = rg.out_edges[v]
                .iter()
                .filter(|&&e| done[rg.edges[e].w])
                .map(|&e| ranks[rg.edges[e].w] - rg.edges[e].minlen)
                .min()
                .unwrap_or(0);
        }
    }
    ranks
}
