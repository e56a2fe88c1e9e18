use eyre::Result;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, BufReader, BufWriter};

use crate::sample::Format;

pub type Reader = Box<dyn AsyncBufRead + Unpin + Send>;
pub type Writer = Box<dyn AsyncWrite + Unpin + Send>;

/// Opens a named input. `stdin` and `-` read standard input.
pub async fn open(name: &str) -> Result<Reader> {
    Ok(match name {
        "stdin" | "-" => Box::new(BufReader::new(tokio::io::stdin())),
        _ => Box::new(BufReader::new(File::open(name).await?)),
    })
}

/// Creates a named output. `stdout` and `-` write standard output.
pub async fn create(name: &str) -> Result<Writer> {
    Ok(match name {
        "stdout" | "-" => Box::new(BufWriter::new(tokio::io::stdout())),
        _ => Box::new(BufWriter::new(File::create(name).await?)),
    })
}

/// Consumes leading blanks and picks a decoder from the first byte left.
/// `None` on blank input.
pub async fn detect_format(reader: &mut Reader) -> Result<Option<Format>> {
    loop {
        let buf = reader.fill_buf().await?;
        if buf.is_empty() {
            return Ok(None);
        }
        let blank = buf.iter().take_while(|b| b.is_ascii_whitespace()).count();
        let first = buf.get(blank).copied();
        AsyncBufReadExt::consume(&mut *reader, blank);
        if let Some(first) = first {
            return Ok(Some(Format::sniff(first)));
        }
    }
}
