use super::Layers;

/// Weighted crossings of the current order, summed over every pair of adjacent layers.
pub fn cross_count(layers: &Layers) -> f64 {
    layers
        .layers
        .windows(2)
        .map(|pair| two_layer_cross_count(layers, &pair[0], &pair[1]))
        .sum()
}

/// Bilayer crossing count with an accumulator tree (Barth, Jünger, Mutzel): edges are visited
/// in north order, and each one crosses every already-inserted edge that ends further right in
/// the south layer.
fn two_layer_cross_count(layers: &Layers, north: &[usize], south: &[usize]) -> f64 {
    if south.is_empty() {
        return 0.0;
    }
    let mut first_index = 1usize;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let mut tree: Vec<f64> = vec![0.0; 2 * first_index - 1];
    first_index -= 1;

    let mut cc = 0.0;
    for &v in north {
        let mut targets: Vec<(usize, f64)> = layers.succs[v]
            .iter()
            .map(|&(w, weight)| (layers.pos[w], weight))
            .collect();
        targets.sort_by_key(|&(pos, _)| pos);

        for (pos, weight) in targets {
            let mut index = pos + first_index;
            tree[index] += weight;
            let mut weight_sum = 0.0;
            while index > 0 {
                if index % 2 == 1 {
                    weight_sum += tree[index + 1];
                }
                index = (index - 1) >> 1;
                tree[index] += weight;
            }
            cc += weight * weight_sum;
        }
    }
    cc
}
