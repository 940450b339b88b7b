//! Stdin/stdout JSON bridge for search requests.
//!
//! Reads newline-delimited JSON `SearchRequest` messages from stdin, runs
//! each through the [`Aggregator`], and writes one `ResponseEnvelope` per
//! request as newline-delimited JSON to stdout.
//!
//! Stdout is exclusively reserved for the JSON protocol; all diagnostic
//! output (tracing, logs) must be routed to stderr.

use crate::error::{HostError, Result};
use crate::host::contract::{ResponseEnvelope, SearchRequest};
use materials_search::{Aggregator, MaterialsProvider};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

/// Request id used when a line cannot be parsed into a request.
pub const PARSE_ERROR_ID: &str = "parse-error";

/// Run the stdin/stdout JSON bridge until stdin closes.
pub async fn run_stdio_bridge(aggregator: Aggregator) -> Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let mut writer = BufWriter::new(tokio::io::stdout());
    serve(&aggregator, reader, &mut writer).await
}

/// Serve requests from `input` until EOF, writing responses to `output`.
///
/// Requests are handled one at a time, so responses come back in request
/// order. Blank lines are skipped.
pub async fn serve<L, R, I, O>(aggregator: &Aggregator<L, R>, input: I, output: &mut O) -> Result<()>
where
    L: MaterialsProvider + 'static,
    R: MaterialsProvider + 'static,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| HostError::Channel(format!("failed to read from stdin: {e}")))?
    {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = handle_line(aggregator, trimmed).await;
        let json = serde_json::to_string(&response).map_err(|e| {
            HostError::Channel(format!("failed to serialize response envelope: {e}"))
        })?;
        write_line(output, &json).await?;
    }

    tracing::info!("stdin closed (EOF); shutting down stdio bridge");
    Ok(())
}

/// Turn one raw request line into its response.
pub async fn handle_line<L, R>(aggregator: &Aggregator<L, R>, line: &str) -> ResponseEnvelope
where
    L: MaterialsProvider + 'static,
    R: MaterialsProvider + 'static,
{
    let request: SearchRequest = match serde_json::from_str(line) {
        Ok(req) => req,
        Err(e) => {
            tracing::warn!(error = %e, raw_line = %line, "failed to parse search request");
            return ResponseEnvelope::error(
                PARSE_ERROR_ID,
                format!("failed to parse search request: {e}"),
            );
        }
    };

    if let Err(e) = request.validate() {
        tracing::warn!(request_id = %request.request_id, error = %e, "rejected search request");
        return ResponseEnvelope::error(request.request_id, e.to_string());
    }

    match aggregator.search_params(&request.params).await {
        Ok(result) => match serde_json::to_value(&result) {
            Ok(payload) => ResponseEnvelope::ok(request.request_id, payload),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize search result");
                ResponseEnvelope::error(request.request_id, format!("serialization failed: {e}"))
            }
        },
        Err(e) => {
            tracing::debug!(request_id = %request.request_id, error = %e, "invalid search input");
            ResponseEnvelope::error(request.request_id, e.to_string())
        }
    }
}

/// Write a single JSON line to `writer` and flush.
async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, json: &str) -> Result<()> {
    writer
        .write_all(json.as_bytes())
        .await
        .map_err(|e| HostError::Channel(format!("failed to write to stdout: {e}")))?;
    writer
        .write_all(b"\n")
        .await
        .map_err(|e| HostError::Channel(format!("failed to write newline to stdout: {e}")))?;
    writer
        .flush()
        .await
        .map_err(|e| HostError::Channel(format!("failed to flush stdout: {e}")))?;
    Ok(())
}
