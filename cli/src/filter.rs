use clap::Args;
use eyre::Result;

use crate::io;
use crate::sample::{Format, Record};
use crate::series::{self, ToleranceOpts};

#[derive(Args, Debug)]
pub struct Opts {
    #[command(flatten)]
    pub tolerance: ToleranceOpts,

    /// Output encoding (json, csv)
    #[clap(long, default_value = "json")]
    pub to: Format,

    /// Output file [default: stdout]
    #[clap(long, default_value = "stdout")]
    pub output: String,

    /// Number of series filtered concurrently
    #[clap(long, default_value_t = num_cpus::get())]
    pub workers: usize,

    /// Input files, one series each [default: stdin]
    pub files: Vec<String>,
}

pub async fn filter(opts: &Opts) -> Result<()> {
    let tolerance = opts.tolerance.tolerance()?;

    let mut all = Vec::new();
    for source in series::sources(&opts.files) {
        all.push(series::read(&source).await?);
    }

    let filtered = series::filter_all(all, tolerance, opts.workers).await?;
    let records: Vec<Record> = filtered.iter().flat_map(|f| f.records()).collect();

    let mut output = io::create(&opts.output).await?;
    opts.to.codec().encode(&mut *output, &records).await
}
