//! Bounded Nelder-Mead simplex search used for parameter estimation.

/// Result of Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// The optimal point found.
    pub optimal_point: Vec<f64>,
    /// The objective function value at the optimal point.
    pub optimal_value: f64,
    /// Iterations performed across all restarts.
    pub iterations: usize,
    /// Number of restarts used.
    pub restarts: usize,
    /// Whether the final run converged.
    pub converged: bool,
}

/// Configuration for Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Maximum number of iterations per run.
    pub max_iter: usize,
    /// Convergence tolerance on the spread of objective values.
    pub tolerance: f64,
    /// Reflection coefficient (default: 1.0).
    pub alpha: f64,
    /// Expansion coefficient (default: 2.0).
    pub gamma: f64,
    /// Contraction coefficient (default: 0.5).
    pub rho: f64,
    /// Shrinkage coefficient (default: 0.5).
    pub sigma: f64,
    /// Initial simplex step size (default: 0.05).
    pub initial_step: f64,
    /// Restarts from the best vertex when a run hits `max_iter` (default: 1).
    pub max_restarts: usize,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 2000,
            tolerance: 1e-10,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
            max_restarts: 1,
        }
    }
}

impl NelderMeadConfig {
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_restarts(mut self, max_restarts: usize) -> Self {
        self.max_restarts = max_restarts;
        self
    }
}

/// Minimize `objective` starting at `initial`, optionally clamped to `bounds`.
///
/// A run that exhausts `max_iter` is restarted from its best vertex with a
/// fresh simplex, up to `max_restarts` times. `converged` reports whether the
/// last run met the tolerance.
///
/// # Example
/// ```
/// use hw_forecast::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// // Minimize (x-2)^2 + (y-3)^2
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     &NelderMeadConfig::default(),
/// );
///
/// assert!(result.converged);
/// assert!((result.optimal_point[0] - 2.0).abs() < 0.01);
/// assert!((result.optimal_point[1] - 3.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: &NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    if initial.is_empty() {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            restarts: 0,
            converged: false,
        };
    }

    let mut start = clamp(initial, bounds);
    let mut iterations = 0;
    let mut restarts = 0;

    loop {
        let run = Simplex::around(&start, bounds, config, &objective).minimize(
            &objective,
            bounds,
            config,
        );
        iterations += run.iterations;

        if run.converged || restarts >= config.max_restarts {
            return NelderMeadResult {
                optimal_point: run.best,
                optimal_value: run.best_value,
                iterations,
                restarts,
                converged: run.converged,
            };
        }

        restarts += 1;
        start = run.best;
    }
}

struct RunOutcome {
    best: Vec<f64>,
    best_value: f64,
    iterations: usize,
    converged: bool,
}

/// Vertices kept sorted by objective value, best first.
struct Simplex {
    vertices: Vec<(Vec<f64>, f64)>,
}

impl Simplex {
    fn around<F>(
        start: &[f64],
        bounds: Option<&[(f64, f64)]>,
        config: &NelderMeadConfig,
        objective: &F,
    ) -> Self
    where
        F: Fn(&[f64]) -> f64,
    {
        let mut vertices = Vec::with_capacity(start.len() + 1);
        vertices.push((start.to_vec(), sanitize(objective(start))));

        for i in 0..start.len() {
            let mut vertex = start.to_vec();
            let step = if start[i].abs() > 1e-10 {
                config.initial_step * start[i].abs()
            } else {
                config.initial_step
            };
            vertex[i] += step;
            // A step pushed onto a bound would collapse the simplex; go the other way.
            let mut vertex = clamp(&vertex, bounds);
            if (vertex[i] - start[i]).abs() < f64::EPSILON {
                vertex[i] = start[i] - step;
                vertex = clamp(&vertex, bounds);
            }
            let value = sanitize(objective(&vertex));
            vertices.push((vertex, value));
        }

        let mut simplex = Self { vertices };
        simplex.sort();
        simplex
    }

    fn sort(&mut self) {
        self.vertices
            .sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    }

    fn spread(&self) -> f64 {
        let best = self.vertices[0].1;
        let worst = self.vertices[self.vertices.len() - 1].1;
        worst - best
    }

    /// Centroid of every vertex except the worst.
    fn centroid(&self) -> Vec<f64> {
        let n = self.vertices[0].0.len();
        let kept = &self.vertices[..self.vertices.len() - 1];
        let mut centroid = vec![0.0; n];
        for (point, _) in kept {
            for (c, x) in centroid.iter_mut().zip(point) {
                *c += x;
            }
        }
        for c in &mut centroid {
            *c /= kept.len() as f64;
        }
        centroid
    }

    fn diameter(&self, centroid: &[f64]) -> f64 {
        self.vertices
            .iter()
            .map(|(point, _)| distance(point, centroid))
            .fold(0.0, f64::max)
    }

    fn replace_worst(&mut self, point: Vec<f64>, value: f64) {
        let last = self.vertices.len() - 1;
        self.vertices[last] = (point, value);
    }

    fn minimize<F>(
        mut self,
        objective: &F,
        bounds: Option<&[(f64, f64)]>,
        config: &NelderMeadConfig,
    ) -> RunOutcome
    where
        F: Fn(&[f64]) -> f64,
    {
        let mut iterations = 0;
        let mut converged = false;
        let last = self.vertices.len() - 1;

        while iterations < config.max_iter {
            let centroid = self.centroid();
            if self.spread() < config.tolerance || self.diameter(&centroid) < config.tolerance {
                converged = true;
                break;
            }
            iterations += 1;

            let best_value = self.vertices[0].1;
            let second_worst_value = self.vertices[last - 1].1;
            let (worst, worst_value) = self.vertices[last].clone();

            let reflected = clamp(&towards(&centroid, &worst, -config.alpha), bounds);
            let reflected_value = sanitize(objective(&reflected));

            if reflected_value < best_value {
                let expanded = clamp(&towards(&centroid, &reflected, config.gamma), bounds);
                let expanded_value = sanitize(objective(&expanded));
                if expanded_value < reflected_value {
                    self.replace_worst(expanded, expanded_value);
                } else {
                    self.replace_worst(reflected, reflected_value);
                }
            } else if reflected_value < second_worst_value {
                self.replace_worst(reflected, reflected_value);
            } else {
                // Contract towards whichever of reflected/worst is better.
                let (anchor, anchor_value) = if reflected_value < worst_value {
                    (&reflected, reflected_value)
                } else {
                    (&worst, worst_value)
                };
                let contracted = clamp(&towards(&centroid, anchor, config.rho), bounds);
                let contracted_value = sanitize(objective(&contracted));

                if contracted_value < anchor_value {
                    self.replace_worst(contracted, contracted_value);
                } else {
                    let best = self.vertices[0].0.clone();
                    for (point, value) in self.vertices.iter_mut().skip(1) {
                        let shrunk = towards(&best, point.as_slice(), config.sigma);
                        *point = clamp(&shrunk, bounds);
                        *value = sanitize(objective(point.as_slice()));
                    }
                }
            }

            self.sort();
        }

        let (best, best_value) = self.vertices.swap_remove(0);
        RunOutcome {
            best,
            best_value,
            iterations,
            converged,
        }
    }
}

/// `origin + coef * (point - origin)`.
fn towards(origin: &[f64], point: &[f64], coef: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(point)
        .map(|(o, p)| o + coef * (p - o))
        .collect()
}

fn clamp(point: &[f64], bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    match bounds {
        None => point.to_vec(),
        Some(b) => point
            .iter()
            .enumerate()
            .map(|(i, &x)| match b.get(i) {
                Some(&(lo, hi)) => x.clamp(lo, hi),
                None => x,
            })
            .collect(),
    }
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Treat NaN objective values as the worst possible.
fn sanitize(value: f64) -> f64 {
    if value.is_nan() {
        f64::INFINITY
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn nelder_mead_quadratic_2d() {
        let result = nelder_mead(
            |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
            &[0.0, 0.0],
            None,
            &NelderMeadConfig::default(),
        );

        assert!(result.converged);
        assert_relative_eq!(result.optimal_point[0], 2.0, epsilon = 1e-4);
        assert_relative_eq!(result.optimal_point[1], 3.0, epsilon = 1e-4);
        assert_relative_eq!(result.optimal_value, 0.0, epsilon = 1e-8);
    }

    #[test]
    fn nelder_mead_respects_bounds() {
        // Unconstrained optimum at 5, box limits it to 3.
        let result = nelder_mead(
            |x| (x[0] - 5.0).powi(2),
            &[1.0],
            Some(&[(0.0, 3.0)]),
            &NelderMeadConfig::default(),
        );

        assert_relative_eq!(result.optimal_point[0], 3.0, epsilon = 1e-4);
    }

    #[test]
    fn nelder_mead_starts_on_upper_bound() {
        let result = nelder_mead(
            |x| (x[0] - 0.5).powi(2),
            &[1.0],
            Some(&[(0.0, 1.0)]),
            &NelderMeadConfig::default(),
        );

        assert!(result.converged);
        assert_relative_eq!(result.optimal_point[0], 0.5, epsilon = 1e-4);
    }

    #[test]
    fn nelder_mead_smoothing_sse() {
        // Simple exponential smoothing SSE over alpha.
        let data: [f64; 8] = [10.0, 12.0, 11.0, 13.0, 14.0, 13.0, 15.0, 16.0];
        let sse = |params: &[f64]| {
            let alpha = params[0];
            let mut level = data[0];
            let mut total = 0.0;
            for &y in &data[1..] {
                total += (y - level).powi(2);
                level = alpha * y + (1.0 - alpha) * level;
            }
            total
        };

        let result = nelder_mead(
            sse,
            &[0.3],
            Some(&[(0.0001, 0.9999)]),
            &NelderMeadConfig::default(),
        );

        assert!(result.converged);
        assert!(result.optimal_point[0] > 0.0001 && result.optimal_point[0] < 0.9999);
        assert!(result.optimal_value <= sse(&[0.3]));
    }

    #[test]
    fn nelder_mead_restarts_when_iterations_run_out() {
        let config = NelderMeadConfig::default()
            .with_max_iter(5)
            .with_max_restarts(3);
        let result = nelder_mead(
            |x| x[0].powi(2) + x[1].powi(2) + x[2].powi(2),
            &[1.0, 2.0, 3.0],
            None,
            &config,
        );

        assert_eq!(result.restarts, 3);
        assert!(!result.converged);
        assert!(result.iterations <= 20);
        assert!(result.optimal_value < 14.0);
    }

    #[test]
    fn nelder_mead_nan_objective_is_avoided() {
        let result = nelder_mead(
            |x| if x[0] < 0.0 { f64::NAN } else { (x[0] - 1.0).powi(2) },
            &[0.5],
            None,
            &NelderMeadConfig::default(),
        );

        assert!(result.optimal_value.is_finite());
        assert_relative_eq!(result.optimal_point[0], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn nelder_mead_empty_initial() {
        let result = nelder_mead(|_| 0.0, &[], None, &NelderMeadConfig::default());

        assert!(!result.converged);
        assert!(result.optimal_value.is_nan());
    }

    #[test]
    fn nelder_mead_already_optimal() {
        let result = nelder_mead(
            |x| (x[0] - 2.0).powi(2),
            &[2.0],
            None,
            &NelderMeadConfig::default(),
        );

        assert!(result.converged);
        assert_relative_eq!(result.optimal_point[0], 2.0, epsilon = 1e-4);
    }
}
