use super::Layers;

/// Initial order: a depth-first walk along successors, started from every node in rank order
/// (pinned nodes first by pin when `keep_node_order` is active). Each node is appended to its
/// layer when first visited.
pub fn init_order(layers: &Layers) -> Vec<Vec<usize>> {
    let n = layers.node_count();
    let mut starts: Vec<usize> = (0..n).collect();
    starts.sort_by_key(|&v| (layers.pin[v].unwrap_or(usize::MAX), layers.rank[v], v));

    let mut out: Vec<Vec<usize>> = vec![Vec::new(); layers.layers.len()];
    let mut visited: Vec<bool> = vec![false; n];
    for start in starts {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        out[layers.rank[start]].push(start);
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        while let Some(frame) = stack.last_mut() {
            let v = frame.0;
            let Some(&(w, _)) = layers.succs[v].get(frame.1) else {
                stack.pop();
                continue;
            };
            frame.1 += 1;
            if !visited[w] {
                visited[w] = true;
                out[layers.rank[w]].push(w);
                stack.push((w, 0));
            }
        }
    }
    out
}
