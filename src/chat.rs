//! Accumulated streaming for AI summaries.
//!
//! Opens one `/api/chat` request and reads the plain-text body as it
//! arrives. Delivery is accumulated, not per-delta: every sink invocation
//! receives the full text seen so far, so a renderer can simply replace its
//! display with the latest value. Bytes are decoded with a stateful UTF-8
//! decoder, so multi-byte characters split across chunk boundaries survive.
//!
//! A fresh `consume` call always starts a new stream from scratch — no
//! retry, no backoff, no partial-result caching across calls.

use anyhow::Result;
use encoding_rs::{CoderResult, Decoder, UTF_8};
use futures_util::{pin_mut, Stream, StreamExt};
use std::io::Write;

use crate::api::{ApiClient, ChatRequest};
use crate::config::Config;

/// Prompt sent for per-result summaries.
pub const SUMMARY_PROMPT: &str = "Write a summary paragraph";

/// Streams the chat response into `on_chunk`, then fires `on_done`.
///
/// `on_chunk` sees the accumulated text once per received chunk. A setup or
/// mid-stream failure is surfaced as error text through `on_chunk` in place
/// of the summary; `on_done` fires exactly once on every path, after the
/// last `on_chunk`.
pub async fn consume<F, D>(api: &ApiClient, request: &ChatRequest, mut on_chunk: F, on_done: D)
where
    F: FnMut(&str),
    D: FnOnce(),
{
    let result = open_and_accumulate(api, request, &mut on_chunk).await;
    if let Err(err) = result {
        tracing::error!(error = %err, "Error in chat stream");
        on_chunk(&format!("{:#}", err));
    }
    on_done();
}

async fn open_and_accumulate<F>(
    api: &ApiClient,
    request: &ChatRequest,
    on_chunk: &mut F,
) -> Result<String>
where
    F: FnMut(&str),
{
    let response = api.open_chat_stream(request).await?;
    accumulate(response.bytes_stream(), on_chunk).await
}

/// Core read loop, independent of the transport: decode each chunk into the
/// running accumulation and hand the whole text to the sink. Exactly one
/// sink call per chunk; accumulated length never decreases.
async fn accumulate<S, B, E, F>(stream: S, on_chunk: &mut F) -> Result<String>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::error::Error + Send + Sync + 'static,
    F: FnMut(&str),
{
    pin_mut!(stream);
    let mut decoder = UTF_8.new_decoder();
    let mut accumulated = String::new();

    while let Some(next) = stream.next().await {
        let bytes = next.map_err(anyhow::Error::new)?;
        decode_append(&mut decoder, bytes.as_ref(), &mut accumulated);
        on_chunk(&accumulated);
    }

    Ok(accumulated)
}

/// Feed one chunk through the stateful decoder. Incomplete trailing bytes
/// stay buffered in the decoder until the next chunk; invalid sequences are
/// replaced, never dropped silently.
fn decode_append(decoder: &mut Decoder, mut src: &[u8], dst: &mut String) {
    loop {
        if let Some(capacity) = decoder.max_utf8_buffer_length(src.len()) {
            dst.reserve(capacity);
        }
        let (result, read, _replaced) = decoder.decode_to_string(src, dst, false);
        src = &src[read..];
        match result {
            CoderResult::InputEmpty => break,
            CoderResult::OutputFull => continue,
        }
    }
}

/// Render a chat stream to stdout as it arrives and return the final text.
/// Tracks how much is already on screen and prints only the new suffix of
/// the accumulated text; if the sink value shrinks (error text replacing a
/// partial summary), starts a fresh line with the replacement.
pub(crate) async fn print_streamed(api: &ApiClient, request: &ChatRequest) -> String {
    let mut shown = String::new();
    consume(
        api,
        request,
        |accumulated| {
            match accumulated.strip_prefix(shown.as_str()) {
                Some(suffix) => print!("{}", suffix),
                None => {
                    println!();
                    print!("{}", accumulated);
                }
            }
            shown.clear();
            shown.push_str(accumulated);
            let _ = std::io::stdout().flush();
        },
        || {},
    )
    .await;
    println!();
    shown
}

pub async fn run_summarize(config: &Config, document_id: u64, prompt: Option<String>) -> Result<()> {
    let api = ApiClient::new(&config.api)?;
    let request = ChatRequest {
        text: prompt.unwrap_or_else(|| SUMMARY_PROMPT.to_string()),
        document_ids: Some(vec![document_id]),
        ..Default::default()
    };
    print_streamed(&api, &request).await;
    Ok(())
}
