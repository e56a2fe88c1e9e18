use std::sync::Arc;

use clap::Args;
use eyre::{Result, WrapErr};
use ffp::Tolerance;
use futures::StreamExt as _;
use tracing::{debug, info};

use crate::io;
use crate::sample::{self, Record, Sample};

/// Tolerance flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct ToleranceOpts {
    /// Maximum admissible Y deviation of a dropped point
    #[clap(long, env = "FFP_MAX_DELTA_Y", default_value_t = ffp::DEFAULT_MAX_DELTA_Y)]
    pub max_delta_y: f64,

    /// Slack for slope comparisons
    #[clap(long, env = "FFP_EPSILON", default_value_t = ffp::DEFAULT_EPSILON)]
    pub epsilon: f64,
}

impl ToleranceOpts {
    pub fn tolerance(&self) -> Result<Tolerance> {
        let tolerance = Tolerance::new(self.max_delta_y, self.epsilon);
        tolerance.validate()?;
        Ok(tolerance)
    }
}

// Series is one decoded input source.
#[derive(Debug)]
pub struct Series {
    pub name: String,
    pub samples: Vec<Sample>,
}

#[derive(Debug)]
pub struct Filtered {
    pub series: Series,
    pub kept: Vec<usize>,
}

impl Filtered {
    pub fn records(&self) -> impl Iterator<Item = Record> + '_ {
        self.kept
            .iter()
            .map(|&i| Record::new(&self.series.name, i, &self.series.samples[i]))
    }
}

pub fn sources(files: &[String]) -> Vec<String> {
    if files.is_empty() {
        vec!["stdin".to_string()]
    } else {
        files.to_vec()
    }
}

pub async fn read(source: &str) -> Result<Series> {
    let mut input = io::open(source)
        .await
        .wrap_err_with(|| format!("opening {}", source))?;
    let samples = match io::detect_format(&mut input).await? {
        Some(format) => format
            .codec()
            .decode(&mut *input)
            .await
            .wrap_err_with(|| format!("decoding {}", source))?,
        None => Vec::new(),
    };
    debug!(source, samples = samples.len(), "decoded");
    Ok(Series {
        name: source.to_string(),
        samples,
    })
}

/// Filters every series on blocking tasks, at most `workers` at a time.
/// Results come back in input order.
pub async fn filter_all(
    series: Vec<Series>,
    tolerance: Tolerance,
    workers: usize,
) -> Result<Vec<Filtered>> {
    let ffp = Arc::new(sample::filter_for(tolerance));
    info!(%tolerance, workers, series = series.len(), "filtering");

    let mut tasks = futures::stream::iter(series.into_iter().map(|series| {
        let ffp = ffp.clone();
        tokio::task::spawn_blocking(move || {
            let kept = ffp.keep(&series.samples);
            (series, kept)
        })
    }))
    .buffered(workers.max(1));

    let mut filtered = Vec::new();
    while let Some(joined) = tasks.next().await {
        let (series, kept) = joined?;
        let kept = kept.wrap_err_with(|| format!("filtering {}", series.name))?;
        debug!(
            series = %series.name,
            points = series.samples.len(),
            kept = kept.len(),
            "filtered"
        );
        filtered.push(Filtered { series, kept });
    }
    Ok(filtered)
}
