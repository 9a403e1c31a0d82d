//! Ordered Cartesian product over swept dimensions.

use sweep_types::Dimension;

/// One swept dimension and its values, in source order.
pub type Axis = (Dimension, Vec<String>);

/// One point of the grid: a value per dimension, in axis order.
pub type Combination = Vec<(Dimension, String)>;

/// Number of grid points, or `None` on overflow.
pub fn grid_size(axes: &[Axis]) -> Option<usize> {
    axes.iter()
        .try_fold(1usize, |total, (_, values)| total.checked_mul(values.len()))
}

/// Expand `axes` into every combination. The first axis is the outermost
/// loop; within an axis values keep their given order, duplicates included.
pub fn expand_grid(axes: &[Axis]) -> Vec<Combination> {
    let mut result: Vec<Combination> = vec![Vec::with_capacity(axes.len())];
    for (dim, values) in axes {
        let mut next = Vec::with_capacity(result.len() * values.len());
        for existing in &result {
            for value in values {
                let mut combo = existing.clone();
                combo.push((*dim, value.clone()));
                next.push(combo);
            }
        }
        result = next;
    }
    result
}
