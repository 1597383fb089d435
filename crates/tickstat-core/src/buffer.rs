//! Shared, append-only tick buffer.
//!
//! The ingestion side appends; the analytics side reads point-in-time
//! snapshots. A batch passed to [`TickBuffer::extend`] becomes visible to
//! readers all at once.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::{Symbol, Tick};

#[derive(Debug, Default)]
struct BufferInner {
    ticks: Vec<Tick>,
    symbols: Vec<Symbol>,
}

impl BufferInner {
    fn push(&mut self, tick: Tick) {
        if !self.symbols.contains(&tick.symbol) {
            self.symbols.push(tick.symbol.clone());
        }
        self.ticks.push(tick);
    }
}

/// Thread-safe tick buffer. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct TickBuffer {
    inner: Arc<RwLock<BufferInner>>,
}

impl TickBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single tick.
    pub fn push(&self, tick: Tick) {
        self.inner.write().push(tick);
    }

    /// Append a batch under one write lock and return how many ticks were added.
    pub fn extend(&self, ticks: impl IntoIterator<Item = Tick>) -> usize {
        let batch: Vec<Tick> = ticks.into_iter().collect();
        let added = batch.len();

        let mut inner = self.inner.write();
        inner.ticks.reserve(added);
        for tick in batch {
            inner.push(tick);
        }
        added
    }

    /// Copy of every tick appended so far, in arrival order.
    pub fn snapshot(&self) -> Vec<Tick> {
        self.inner.read().ticks.clone()
    }

    /// Copy of the ticks for one symbol, in arrival order.
    pub fn snapshot_symbol(&self, symbol: &Symbol) -> Vec<Tick> {
        self.inner
            .read()
            .ticks
            .iter()
            .filter(|tick| &tick.symbol == symbol)
            .cloned()
            .collect()
    }

    /// Symbols in first-seen order.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.inner.read().symbols.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().ticks.is_empty()
    }
}
