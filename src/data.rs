use crate::error::{ChartError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Benchmark results to plot, indexed by configuration then benchmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Benchmark categories, in x-axis order
    pub benchmarks: Vec<String>,
    /// Configuration series, in legend and color order
    pub configs: Vec<String>,
    /// Execution time in seconds, `results[config][benchmark]`
    pub results: Vec<Vec<f64>>,
}

impl ResultSet {
    pub fn new(benchmarks: Vec<String>, configs: Vec<String>, results: Vec<Vec<f64>>) -> Self {
        Self {
            benchmarks,
            configs,
            results,
        }
    }

    /// Serial base and tuned runs over four grid sizes
    pub fn builtin() -> Self {
        Self {
            benchmarks: vec!["base serial".to_string(), "tuned serial".to_string()],
            configs: vec![
                "200x200".to_string(),
                "400x400".to_string(),
                "800x800".to_string(),
                "1600x1600".to_string(),
            ],
            results: vec![
                // base    tuned
                vec![2.355, 1.224416017532349],
                vec![14.962, 9.824005842208862],
                vec![120.285, 82.19018602371216],
                vec![929.226, 765.4277429580688],
            ],
        }
    }

    /// Load a result set from a JSON document. Does not validate.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ChartError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ChartError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn num_benchmarks(&self) -> usize {
        self.benchmarks.len()
    }

    pub fn num_configs(&self) -> usize {
        self.configs.len()
    }

    /// Check that the table shape matches the labels and every value is a
    /// finite, non-negative number of seconds.
    pub fn validate(&self) -> Result<()> {
        if self.benchmarks.is_empty() {
            return Err(ChartError::DimensionMismatch {
                what: "benchmarks".to_string(),
                expected: 1,
                actual: 0,
            });
        }
        if self.configs.is_empty() {
            return Err(ChartError::DimensionMismatch {
                what: "configurations".to_string(),
                expected: 1,
                actual: 0,
            });
        }
        if self.results.len() != self.configs.len() {
            return Err(ChartError::DimensionMismatch {
                what: "result rows".to_string(),
                expected: self.configs.len(),
                actual: self.results.len(),
            });
        }

        for (config, row) in self.configs.iter().zip(&self.results) {
            if row.len() != self.benchmarks.len() {
                return Err(ChartError::DimensionMismatch {
                    what: format!("results for '{}'", config),
                    expected: self.benchmarks.len(),
                    actual: row.len(),
                });
            }
            for (benchmark, &value) in self.benchmarks.iter().zip(row) {
                if !value.is_finite() || value < 0.0 {
                    return Err(ChartError::InvalidValue {
                        config: config.clone(),
                        benchmark: benchmark.clone(),
                        value,
                    });
                }
            }
        }

        Ok(())
    }

    /// Speedup of every configuration relative to the first one.
    pub fn normalized(&self) -> Result<Self> {
        self.validate()?;

        let baseline = &self.results[0];
        let mut results = Vec::with_capacity(self.results.len());
        for (config, row) in self.configs.iter().zip(&self.results) {
            let mut speedups = Vec::with_capacity(row.len());
            for ((benchmark, &base), &value) in self.benchmarks.iter().zip(baseline).zip(row) {
                if value == 0.0 {
                    return Err(ChartError::InvalidValue {
                        config: config.clone(),
                        benchmark: benchmark.clone(),
                        value,
                    });
                }
                speedups.push(base / value);
            }
            results.push(speedups);
        }

        Ok(Self {
            benchmarks: self.benchmarks.clone(),
            configs: self.configs.clone(),
            results,
        })
    }

    /// Largest value in the table, 0 when empty
    pub fn max_value(&self) -> f64 {
        self.results
            .iter()
            .flatten()
            .fold(0.0_f64, |a, &b| a.max(b))
    }
}

impl Default for ResultSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Print the result table to the console
pub fn print_results(data: &ResultSet) {
    println!("\n{:=<80}", "");
    println!("Benchmark Results");
    println!("{:=<80}\n", "");

    print!("  {:>12}", "Config");
    for benchmark in &data.benchmarks {
        print!(" {:>14}", benchmark);
    }
    println!();
    println!("  {:-<1$}", "", 12 + 15 * data.benchmarks.len());

    for (config, row) in data.configs.iter().zip(&data.results) {
        print!("  {:>12}", config);
        for value in row {
            print!(" {:>14.3}", value);
        }
        println!();
    }
    println!();
}
