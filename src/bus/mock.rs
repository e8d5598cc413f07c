// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted in-memory line for tests.

use std::{collections::VecDeque, sync::Arc};

use parking_lot::Mutex;

use super::*;

type Responder = Box<dyn FnMut(&[u8]) -> Vec<u8> + Send>;

#[derive(Default)]
struct State {
    written: Vec<u8>,
    input: VecDeque<u8>,
    bytes_read: usize,
    chunk_size: Option<usize>,
    closed: bool,
    responder: Option<Responder>,
}

/// Records everything written and replays queued input.
///
/// Running out of input reads `0` bytes like a silent serial line, or
/// fails with `UnexpectedEof` once the line has been closed.
#[derive(Clone, Default)]
pub(crate) struct MockLine {
    state: Arc<Mutex<State>>,
}

impl MockLine {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Deliver at most `size` bytes per read.
    pub(crate) fn with_chunk_size(self, size: usize) -> Self {
        self.state.lock().chunk_size = Some(size);
        self
    }

    /// Answer every write with the bytes returned by `f`.
    pub(crate) fn with_responder(self, f: impl FnMut(&[u8]) -> Vec<u8> + Send + 'static) -> Self {
        self.state.lock().responder = Some(Box::new(f));
        self
    }

    /// Echo every write back.
    pub(crate) fn echo(self) -> Self {
        self.with_responder(<[u8]>::to_vec)
    }

    pub(crate) fn push_reply(&self, bytes: &[u8]) {
        self.state.lock().input.extend(bytes);
    }

    pub(crate) fn close_after_input(&self) {
        self.state.lock().closed = true;
    }

    pub(crate) fn written(&self) -> Vec<u8> {
        self.state.lock().written.clone()
    }

    pub(crate) fn bytes_read(&self) -> usize {
        self.state.lock().bytes_read
    }

    pub(crate) fn pending(&self) -> usize {
        self.state.lock().input.len()
    }
}

impl Read for MockLine {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.state.lock();
        if state.input.is_empty() {
            if state.closed {
                return Err(io::ErrorKind::UnexpectedEof.into());
            }
            return Ok(0);
        }
        let limit = state.chunk_size.unwrap_or(usize::MAX);
        let n = buf.len().min(state.input.len()).min(limit);
        for (dst, src) in buf.iter_mut().zip(state.input.drain(..n)) {
            *dst = src;
        }
        state.bytes_read += n;
        Ok(n)
    }
}

impl Write for MockLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock();
        state.written.extend_from_slice(buf);
        if let Some(mut responder) = state.responder.take() {
            let reply = responder(buf);
            state.input.extend(reply);
            state.responder = Some(responder);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Connection for MockLine {
    fn discard_input(&mut self) -> io::Result<()> {
        self.state.lock().input.clear();
        Ok(())
    }
}
