/// Number of weekday columns in the menu table.
pub const DAY_COUNT: usize = 5;

/// Column boundaries `0 = b0 < b1 < ... < b5` splitting an image into five days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundarySet {
    points: [u32; DAY_COUNT + 1],
}

impl BoundarySet {
    /// Equal-width columns of `floor(width / 5)`; the last column absorbs the remainder.
    pub fn fixed(width: u32) -> Self {
        let col_width = width / DAY_COUNT as u32;
        let mut points = [0u32; DAY_COUNT + 1];
        for (i, point) in points.iter_mut().enumerate() {
            *point = if i < DAY_COUNT {
                i as u32 * col_width
            } else {
                width
            };
        }
        Self { points }
    }

    /// Builds a set from detected boundary points.
    ///
    /// Returns `None` when fewer than six points are available or the points do
    /// not start at zero and strictly increase. Points past the sixth are ignored,
    /// so extra detected columns are dropped rather than merged.
    pub fn from_points(points: &[u32]) -> Option<Self> {
        if points.len() < DAY_COUNT + 1 {
            return None;
        }
        let mut set = [0u32; DAY_COUNT + 1];
        set.copy_from_slice(&points[..DAY_COUNT + 1]);
        if set[0] != 0 || set.windows(2).any(|w| w[0] >= w[1]) {
            return None;
        }
        Some(Self { points: set })
    }

    pub fn points(&self) -> &[u32] {
        &self.points
    }

    /// `(start_x, end_x)` of each day column, Monday first.
    pub fn segments(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Merges near-vertical line spans into boundary points.
///
/// Spans are `(x_min, x_max)` pairs. Each span's midpoint is accepted only when it
/// lies more than `merge_ratio * width` to the right of the last accepted point,
/// which collapses repeated detections of the same table line. The result always
/// starts with `0` and ends with `width`.
pub fn merge_boundaries(spans: &[(u32, u32)], width: u32, merge_ratio: f32) -> Vec<u32> {
    let mut sorted = spans.to_vec();
    sorted.sort_unstable();

    let min_spacing = width as f64 * merge_ratio as f64;
    let mut boundaries = vec![0u32];

    for &(x_min, x_max) in &sorted {
        let x_avg = (x_min + x_max) / 2;
        let last = *boundaries.last().unwrap_or(&0);
        if (x_avg as f64 - last as f64) > min_spacing {
            boundaries.push(x_avg);
        }
    }

    boundaries.push(width);
    boundaries
}
