use async_trait::async_trait;
use eyre::{Result, WrapErr};
use ffp::{Accessor, Ffp, Raw, Tolerance};
use serde::{Deserialize, Serialize};
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt as _, AsyncReadExt as _, AsyncWrite, AsyncWriteExt as _,
};

// Sample is a single observation of a series. Without an explicit x the
// position in the series is used.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Sample {
    pub x: Option<f64>,
    pub y: f64,
}

impl Sample {
    pub fn x_at(&self, index: usize) -> f64 {
        self.x.unwrap_or(index as f64)
    }
}

fn sample_x(sample: &Sample, index: usize) -> f64 {
    sample.x_at(index)
}

fn sample_y(sample: &Sample, _index: usize) -> f64 {
    sample.y
}

/// Builds the filter used for decoded series.
pub fn filter_for(
    tolerance: Tolerance,
) -> Ffp<
    Sample,
    impl Accessor<Sample> + Send + Sync + 'static,
    impl Accessor<Sample> + Send + Sync + 'static,
    Raw,
> {
    Ffp::new()
        .with_x(sample_x)
        .with_y(sample_y)
        .with_tolerance(tolerance)
}

// Record is a kept sample as written to the output.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Record {
    pub series: String,
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

impl Record {
    pub fn new(series: &str, index: usize, sample: &Sample) -> Self {
        Record {
            series: series.to_string(),
            index,
            x: sample.x_at(index),
            y: sample.y,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Format {
    Json,
    Csv,
}

impl Format {
    /// Objects and arrays are JSON lines. Anything else, bare numbers
    /// included, is read as CSV.
    pub fn sniff(first: u8) -> Self {
        match first {
            b'{' | b'[' => Format::Json,
            _ => Format::Csv,
        }
    }

    pub fn codec(self) -> &'static (dyn Codec + Sync) {
        match self {
            Format::Json => &JsonCodec,
            Format::Csv => &CsvCodec,
        }
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s {
            "json" => Ok(Format::Json),
            "csv" => Ok(Format::Csv),
            other => Err(format!("unknown encoding: {}", other)),
        }
    }
}

#[async_trait]
pub trait Codec {
    async fn decode(&self, reader: &mut (dyn AsyncBufRead + Unpin + Send)) -> Result<Vec<Sample>>;
    async fn encode(
        &self,
        writer: &mut (dyn AsyncWrite + Unpin + Send),
        records: &[Record],
    ) -> Result<()>;
}

pub struct JsonCodec;

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonSample {
    Value(f64),
    Pair(f64, f64),
    Record { x: Option<f64>, y: f64 },
}

impl From<JsonSample> for Sample {
    fn from(s: JsonSample) -> Self {
        match s {
            JsonSample::Value(y) => Sample { x: None, y },
            JsonSample::Pair(x, y) => Sample { x: Some(x), y },
            JsonSample::Record { x, y } => Sample { x, y },
        }
    }
}

#[async_trait]
impl Codec for JsonCodec {
    async fn decode(&self, reader: &mut (dyn AsyncBufRead + Unpin + Send)) -> Result<Vec<Sample>> {
        let mut samples = Vec::new();
        let mut line = String::new();
        let mut lineno = 0;
        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                break;
            }
            lineno += 1;
            if line.trim().is_empty() {
                continue;
            }
            let sample: JsonSample = serde_json::from_str(&line)
                .wrap_err_with(|| format!("bad sample on line {}", lineno))?;
            samples.push(sample.into());
        }
        Ok(samples)
    }

    async fn encode(
        &self,
        writer: &mut (dyn AsyncWrite + Unpin + Send),
        records: &[Record],
    ) -> Result<()> {
        for record in records {
            writer.write_all(&serde_json::to_vec(record)?).await?;
            writer.write_all(b"\n").await?;
        }
        writer.flush().await?;
        Ok(())
    }
}

pub struct CsvCodec;

#[async_trait]
impl Codec for CsvCodec {
    async fn decode(&self, reader: &mut (dyn AsyncBufRead + Unpin + Send)) -> Result<Vec<Sample>> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        decode_csv(&buf)
    }

    async fn encode(
        &self,
        writer: &mut (dyn AsyncWrite + Unpin + Send),
        records: &[Record],
    ) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for record in records {
            wtr.serialize(record)?;
        }
        let buf = wtr.into_inner().map_err(|e| eyre::eyre!(e.to_string()))?;
        writer.write_all(&buf).await?;
        writer.flush().await?;
        Ok(())
    }
}

// Rows are `y` or `x,y`. A first row that does not parse is a header.
fn decode_csv(buf: &[u8]) -> Result<Vec<Sample>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(buf);

    let mut samples = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let row = row?;
        let fields: Vec<&str> = row.iter().filter(|f| !f.is_empty()).collect();
        let parsed: std::result::Result<Vec<f64>, _> =
            fields.iter().map(|f| f.parse::<f64>()).collect();
        let values = match parsed {
            Ok(values) => values,
            Err(_) if i == 0 => continue,
            Err(e) => return Err(e).wrap_err_with(|| format!("bad sample on row {}", i + 1)),
        };
        match values.as_slice() {
            [] => continue,
            [y] => samples.push(Sample { x: None, y: *y }),
            [x, y] => samples.push(Sample { x: Some(*x), y: *y }),
            _ => eyre::bail!("row {} has {} columns, want 1 or 2", i + 1, values.len()),
        }
    }
    Ok(samples)
}
