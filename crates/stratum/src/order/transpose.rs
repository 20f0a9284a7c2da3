use super::Layers;

/// Upper bound on full passes over all layers.
pub const MAX_TRANSPOSE_PASSES: usize = 8;

/// Swaps adjacent siblings whenever that strictly lowers the crossings they take part in,
/// repeating until a pass changes nothing. Borders never move and two pinned nodes never trade
/// places. Returns the number of swaps.
pub fn transpose(layers: &mut Layers) -> usize {
    let mut swaps = 0usize;
    for _ in 0..MAX_TRANSPOSE_PASSES {
        let mut improved = false;
        for r in 0..layers.layers.len() {
            for i in 1..layers.layers[r].len() {
                let u = layers.layers[r][i - 1];
                let v = layers.layers[r][i];
                if !swappable(layers, u, v) {
                    continue;
                }
                if pair_crossings(layers, v, u) < pair_crossings(layers, u, v) {
                    layers.layers[r].swap(i - 1, i);
                    layers.pos[u] = i;
                    layers.pos[v] = i - 1;
                    improved = true;
                    swaps += 1;
                }
            }
        }
        if !improved {
            break;
        }
    }
    swaps
}

fn swappable(layers: &Layers, u: usize, v: usize) -> bool {
    layers.parent(u) == layers.parent(v)
        && layers.border[u].is_none()
        && layers.border[v].is_none()
        && !(layers.pin[u].is_some() && layers.pin[v].is_some())
}

/// Weighted crossings between the edges of `left` and `right` if `left` sits before `right`.
fn pair_crossings(layers: &Layers, left: usize, right: usize) -> f64 {
    let side = |a: &[(usize, f64)], b: &[(usize, f64)]| -> f64 {
        let mut c = 0.0;
        for &(x, wx) in a {
            for &(y, wy) in b {
                if layers.pos[x] > layers.pos[y] {
                    c += wx * wy;
                }
            }
        }
        c
    };
    side(&layers.preds[left], &layers.preds[right])
        + side(&layers.succs[left], &layers.succs[right])
}
