//! Axis scaling: nice-number linear ticks, categorical positions, and the
//! data-to-pixel mapping.

/// Axis configuration with precomputed tick positions and labels.
#[derive(Clone, Debug)]
pub struct Axis {
    min: f64,
    max: f64,
    label: String,
    ticks: Vec<(f64, String)>,
}

impl Axis {
    /// Auto-scaled linear axis with "nice number" ticks.
    pub fn auto_linear(data_min: f64, data_max: f64, target_ticks: usize) -> Self {
        let (data_min, data_max) = widen_degenerate(data_min, data_max);
        let (nice_min, nice_max, step) = nice_range(data_min, data_max, target_ticks);

        let mut ticks = Vec::new();
        let mut v = nice_min;
        while v <= nice_max + step * 0.01 {
            ticks.push((v, format_tick(v, step)));
            v += step;
        }

        Self {
            min: nice_min,
            max: nice_max,
            label: String::new(),
            ticks,
        }
    }

    /// Categorical axis: positions `0..n` evenly spaced, one tick per
    /// category label, half a slot of padding on each side.
    pub fn categorical(labels: &[String]) -> Self {
        let n = labels.len().max(1) as f64;
        let ticks = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (i as f64, label.clone()))
            .collect();
        Self {
            min: -0.5,
            max: n - 0.5,
            label: String::new(),
            ticks,
        }
    }

    /// Sets the axis label and returns the updated axis.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Returns the axis label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the tick `(position, label)` pairs.
    pub fn ticks(&self) -> &[(f64, String)] {
        &self.ticks
    }

    /// Maps a data value to a pixel coordinate in `[px_min, px_max]`.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let frac = (value - self.min) / (self.max - self.min);
        px_min + frac * (px_max - px_min)
    }
}

fn widen_degenerate(min: f64, max: f64) -> (f64, f64) {
    if (max - min).abs() < f64::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        (min.min(max), max.max(min))
    }
}

/// Computes a (min, max, step) triple covering the data with round
/// numbers.
fn nice_range(min: f64, max: f64, target_ticks: usize) -> (f64, f64, f64) {
    let span = nice_num(max - min, false);
    let step = nice_num(span / (target_ticks.max(2) - 1) as f64, true);
    let nice_min = (min / step).floor() * step;
    let nice_max = (max / step).ceil() * step;
    (nice_min, nice_max, step)
}

fn nice_num(value: f64, round: bool) -> f64 {
    let exp = value.log10().floor();
    let frac = value / 10f64.powf(exp);
    let nice = if round {
        if frac < 1.5 {
            1.0
        } else if frac < 3.0 {
            2.0
        } else if frac < 7.0 {
            5.0
        } else {
            10.0
        }
    } else if frac <= 1.0 {
        1.0
    } else if frac <= 2.0 {
        2.0
    } else if frac <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * 10f64.powf(exp)
}

fn format_tick(value: f64, step: f64) -> String {
    if step >= 1.0 {
        format!("{value:.0}")
    } else {
        let decimals = (-step.log10().floor()) as usize;
        format!("{value:.decimals$}")
    }
}
