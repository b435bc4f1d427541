//! Small utilities to manage bounded history buffers for charts.

use std::collections::VecDeque;

pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    if cap == 0 {
        return;
    }
    while dq.len() >= cap {
        dq.pop_front();
    }
    dq.push_back(v);
}

/// One labelled point on a chart series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// A chart series that only ever holds the newest `cap` points.
#[derive(Debug, Clone)]
pub struct Series {
    pub name: &'static str,
    points: VecDeque<ChartPoint>,
    cap: usize,
}

impl Series {
    pub fn new(name: &'static str, cap: usize) -> Self {
        Self {
            name,
            points: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn push(&mut self, label: String, value: f64) {
        push_capped(&mut self.points, ChartPoint { label, value }, self.cap);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = &ChartPoint> {
        self.points.iter()
    }

    pub fn last(&self) -> Option<&ChartPoint> {
        self.points.back()
    }

    /// (x, y) pairs for plotting, x being the point's position in the series.
    pub fn xy(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_capped_drops_oldest() {
        let mut dq = VecDeque::new();
        for i in 0..5 {
            push_capped(&mut dq, i, 3);
        }
        assert_eq!(dq, VecDeque::from(vec![2, 3, 4]));
    }

    #[test]
    fn series_keeps_newest_points() {
        let mut s = Series::new("cpu", 2);
        s.push("a".into(), 1.0);
        s.push("b".into(), 2.0);
        s.push("c".into(), 3.0);
        let labels: Vec<_> = s.points().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["b", "c"]);
        assert_eq!(s.xy(), vec![(0.0, 2.0), (1.0, 3.0)]);
    }
}
