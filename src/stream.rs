//! Streaming transport: bounded-memory chunked copy.
//!
//! [`copy_chunked`] moves a byte source of unknown length into a
//! [`ChunkSink`] chunk by chunk. Memory use is bounded by the chunk size,
//! independent of payload size; each push may block until the sink accepts
//! the chunk (synchronous back-pressure). A source or sink error aborts the
//! loop immediately — chunks already delivered stay delivered, so a failed
//! stream leaves the sink holding a truncated prefix.
//!
//! [`chunk_pipe`] is the producer/consumer form used for HTTP responses:
//! a rendezvous channel (capacity 1) ties a producing thread to a consumer
//! implementing [`Read`], so at most two chunks are in flight per request.

use std::io::{self, Read, Write};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

use crate::errors::{Result, StoreError};
use crate::metrics;

/// Accepts bounded-size chunks; `accept` may block until there is room.
pub trait ChunkSink {
    fn accept(&mut self, chunk: &[u8]) -> Result<()>;
}

/// Copy `src` into `sink` in chunks of at most `chunk_size` bytes.
///
/// Pushes only non-empty chunks: a source of N bytes yields ceil(N/S)
/// pushes, zero pushes for an empty source. Returns total bytes moved.
pub fn copy_chunked(
    src: &mut dyn Read,
    sink: &mut dyn ChunkSink,
    chunk_size: usize,
) -> Result<u64> {
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total: u64 = 0;
    loop {
        let n = match src.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(StoreError::io("read source", e)),
        };
        sink.accept(&buf[..n])?;
        total += n as u64;
    }
    Ok(total)
}

/// Adapts any writer into a sink (uploads, CLI output).
pub struct WriteSink {
    out: Box<dyn Write + Send>,
    op: String,
}

impl WriteSink {
    pub fn new(out: Box<dyn Write + Send>, op: impl Into<String>) -> Self {
        WriteSink {
            out,
            op: op.into(),
        }
    }

    /// Flush and release the writer.
    pub fn finish(mut self) -> Result<()> {
        self.out
            .flush()
            .map_err(|e| StoreError::io(self.op.clone(), e))
    }
}

impl ChunkSink for WriteSink {
    fn accept(&mut self, chunk: &[u8]) -> Result<()> {
        self.out
            .write_all(chunk)
            .map_err(|e| StoreError::io(self.op.clone(), e))
    }
}

type PipeItem = io::Result<Vec<u8>>;

/// Producer half of [`chunk_pipe`]: a sink feeding the paired [`ChunkStream`].
pub struct ChannelSink {
    tx: SyncSender<PipeItem>,
}

/// Consumer half of [`chunk_pipe`]: a reader suitable as a response body.
pub struct ChunkStream {
    rx: Receiver<PipeItem>,
    cur: Vec<u8>,
    pos: usize,
}

/// Rendezvous pipe between a producing thread and a reading consumer.
///
/// Capacity is one chunk; with the chunk the producer is filling that
/// bounds the pipe at two chunks in flight. Dropping the sink ends the
/// stream normally; [`ChannelSink::fail`] ends it with an error, which
/// surfaces from the consumer's `read` and aborts the response mid-body.
pub fn chunk_pipe() -> (ChannelSink, ChunkStream) {
    let (tx, rx) = sync_channel::<PipeItem>(1);
    (
        ChannelSink { tx },
        ChunkStream {
            rx,
            cur: Vec::new(),
            pos: 0,
        },
    )
}

impl ChannelSink {
    /// Deliver a terminal error to the consumer and close the pipe.
    pub fn fail(self, err: &StoreError) {
        // consumer may already be gone; nothing to report then
        let _ = self
            .tx
            .send(Err(io::Error::new(io::ErrorKind::Other, err.to_string())));
    }
}

impl ChunkSink for ChannelSink {
    fn accept(&mut self, chunk: &[u8]) -> Result<()> {
        metrics::record_chunk_out(chunk.len());
        self.tx.send(Ok(chunk.to_vec())).map_err(|_| {
            StoreError::io(
                "push chunk",
                io::Error::new(io::ErrorKind::BrokenPipe, "consumer dropped"),
            )
        })
    }
}

impl Read for ChunkStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while self.pos >= self.cur.len() {
            match self.rx.recv() {
                Ok(Ok(chunk)) => {
                    self.cur = chunk;
                    self.pos = 0;
                }
                Ok(Err(e)) => return Err(e),
                // producer dropped the sink: normal end of stream
                Err(_) => return Ok(0),
            }
        }
        let n = (self.cur.len() - self.pos).min(buf.len());
        buf[..n].copy_from_slice(&self.cur[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
