#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

pub fn calculate_stats(data: &[usize]) -> Stats {
    if data.is_empty() {
        return Stats {
            min: 0,
            max: 0,
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
        };
    }
    let mut sorted = data.to_vec();
    sorted.sort_unstable();
    let len = sorted.len();
    let median = if len % 2 == 0 {
        (sorted[len / 2 - 1] + sorted[len / 2]) as f64 / 2.0
    } else {
        sorted[len / 2] as f64
    };
    let sum: usize = sorted.iter().sum();
    let mean = sum as f64 / len as f64;
    let std_dev = (sorted
        .iter()
        .map(|&x| (x as f64 - mean).powi(2))
        .sum::<f64>()
        / len as f64)
        .sqrt();
    Stats {
        min: sorted[0],
        max: sorted[len - 1],
        mean,
        median,
        std_dev,
    }
}
