use std::io::Write;

use clap::Args;
use eyre::Result;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::io;
use crate::series::{self, Filtered, ToleranceOpts};

#[derive(Args, Debug)]
pub struct Opts {
    #[command(flatten)]
    pub tolerance: ToleranceOpts,

    /// Report type (text, json)
    #[clap(long, name = "type", default_value = "text")]
    pub report_type: String,

    /// Output file [default: stdout]
    #[clap(long, default_value = "stdout")]
    pub output: String,

    /// Number of series filtered concurrently
    #[clap(long, default_value_t = num_cpus::get())]
    pub workers: usize,

    /// Input files, one series each [default: stdin]
    pub files: Vec<String>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct Stats {
    pub series: String,
    pub points: usize,
    pub kept: usize,
    /// Share of points dropped, 0 for an empty series.
    pub reduction: f64,
}

impl From<&Filtered> for Stats {
    fn from(f: &Filtered) -> Self {
        let points = f.series.samples.len();
        let kept = f.kept.len();
        let reduction = if points > 0 {
            1.0 - kept as f64 / points as f64
        } else {
            0.0
        };
        Stats {
            series: f.series.name.clone(),
            points,
            kept,
            reduction,
        }
    }
}

pub async fn stats(opts: &Opts) -> Result<()> {
    let tolerance = opts.tolerance.tolerance()?;

    let mut all = Vec::new();
    for source in series::sources(&opts.files) {
        all.push(series::read(&source).await?);
    }
    let filtered = series::filter_all(all, tolerance, opts.workers).await?;
    let stats: Vec<Stats> = filtered.iter().map(Stats::from).collect();

    let mut buf = Vec::new();
    match opts.report_type.as_str() {
        "text" => report_text(&stats, &mut buf)?,
        "json" => report_json(&stats, &mut buf)?,
        other => eyre::bail!("unknown report type: {}", other),
    }

    let mut output = io::create(&opts.output).await?;
    output.write_all(&buf).await?;
    output.flush().await?;
    Ok(())
}

fn report_text(stats: &[Stats], w: &mut dyn Write) -> Result<()> {
    let width = stats
        .iter()
        .map(|s| s.series.len())
        .chain(["Series".len()])
        .max()
        .unwrap_or_default();

    writeln!(w, "{:<width$}  {:>10}  {:>10}  {:>9}", "Series", "Points", "Kept", "Reduction")?;
    for s in stats {
        writeln!(
            w,
            "{:<width$}  {:>10}  {:>10}  {:>8.2}%",
            s.series,
            s.points,
            s.kept,
            s.reduction * 100.0
        )?;
    }
    Ok(())
}

fn report_json(stats: &[Stats], w: &mut dyn Write) -> Result<()> {
    for s in stats {
        serde_json::to_writer(&mut *w, s)?;
        w.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Sample;
    use crate::series::Series;

    fn filtered(name: &str, points: usize, kept: Vec<usize>) -> Filtered {
        Filtered {
            series: Series {
                name: name.to_string(),
                samples: vec![Sample { x: None, y: 0.0 }; points],
            },
            kept,
        }
    }

    #[test]
    fn reduction_ratio() {
        let s = Stats::from(&filtered("a", 4, vec![0, 3]));
        assert_eq!(s.points, 4);
        assert_eq!(s.kept, 2);
        assert_eq!(s.reduction, 0.5);

        let s = Stats::from(&filtered("empty", 0, vec![]));
        assert_eq!(s.reduction, 0.0);
    }

    #[test]
    fn text_report() {
        let stats = vec![Stats::from(&filtered("data.csv", 4, vec![0, 3]))];
        let mut buf = Vec::new();
        report_text(&stats, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Series        Points        Kept  Reduction\n\
             data.csv           4           2     50.00%\n"
        );
    }

    #[test]
    fn json_report() {
        let stats = vec![Stats::from(&filtered("a", 4, vec![0, 3]))];
        let mut buf = Vec::new();
        report_json(&stats, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "{\"series\":\"a\",\"points\":4,\"kept\":2,\"reduction\":0.5}\n"
        );
    }
}
