use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Result, Write};
use std::path::Path;
use std::time::Duration;

/// Summary of the trials measured at one leaf count, in milliseconds.
#[derive(Debug, Clone)]
pub struct Stat {
  pub count: usize,
  pub mean: f64,
  pub median: f64,
  pub std_dev: f64,
  pub min: f64,
  pub max: f64,
}

impl Stat {
  pub fn from_vec(mut data: Vec<f64>) -> Stat {
    if data.is_empty() {
      return Stat { count: 0, mean: f64::NAN, median: f64::NAN, std_dev: f64::NAN, min: f64::NAN, max: f64::NAN };
    }
    data.sort_by(f64::total_cmp);
    let count = data.len();
    let min = data[0];
    let max = data[count - 1];
    let mean = data.iter().sum::<f64>() / count as f64;
    let median = if count % 2 == 0 { (data[count / 2 - 1] + data[count / 2]) / 2.0 } else { data[count / 2] };
    let variance = data.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / count as f64;
    let std_dev = variance.sqrt();
    Stat { count, mean, median, std_dev, min, max }
  }
}

impl Display for Stat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    // 2σ (equivalent to 95.4% confidence interval) calculated as a percentage
    let two_sigma_percent = if self.mean > 0.0 { (2.0 * self.std_dev / self.mean) * 100.0 } else { 0.0 };
    write!(
      f,
      "{}: {:.3}ms ±{:.1}% [{:.3}|{:.3}|{:.3}]",
      self.count, self.mean, two_sigma_percent, self.min, self.median, self.max
    )
  }
}

/// Elapsed times per leaf count for one experiment.
#[derive(Default)]
pub struct Report {
  data_set: BTreeMap<u64, Vec<f64>>,
}

impl Report {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, n: u64, elapsed: Duration) {
    self.data_set.entry(n).or_default().push(elapsed.as_secs_f64() * 1000.0);
  }

  pub fn single(&self, n: u64) -> Stat {
    Stat::from_vec(self.data_set.get(&n).cloned().unwrap_or_default())
  }

  pub fn save_to_csv(&self, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "N,COUNT,MEAN,MEDIAN,STDDEV,MIN,MAX")?;
    for (n, ys) in self.data_set.iter() {
      let y = Stat::from_vec(ys.clone());
      writeln!(writer, "{},{},{:.3},{:.3},{:.3},{:.3},{:.3}", n, y.count, y.mean, y.median, y.std_dev, y.min, y.max)?;
    }
    writer.flush()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn summary_of_odd_and_even_counts() {
    let s = Stat::from_vec(vec![3.0, 1.0, 2.0]);
    assert_eq!((3, 1.0, 2.0, 3.0, 2.0), (s.count, s.min, s.median, s.max, s.mean));
    let s = Stat::from_vec(vec![4.0, 1.0, 2.0, 3.0]);
    assert_eq!(2.5, s.median);
    assert!(Stat::from_vec(Vec::new()).mean.is_nan());
  }

  #[test]
  fn csv_has_one_row_per_n() {
    let mut report = Report::new();
    report.add(8, Duration::from_millis(2));
    report.add(8, Duration::from_millis(4));
    report.add(1, Duration::from_millis(1));
    let file = tempfile::NamedTempFile::new().unwrap();
    report.save_to_csv(file.path()).unwrap();
    let csv = std::fs::read_to_string(file.path()).unwrap();
    let lines = csv.lines().collect::<Vec<_>>();
    assert_eq!(3, lines.len());
    assert!(lines[1].starts_with("1,1,"));
    assert!(lines[2].starts_with("8,2,3.000,"));
  }
}
