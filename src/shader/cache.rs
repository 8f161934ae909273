//! Program cache keyed by shader source.

use std::collections::HashMap;

use super::ShaderSource;
use crate::backend::{BackendResult, GpuBackend, ProgramHandle};

#[derive(Debug)]
struct CacheEntry {
    program: ProgramHandle,
    last_used: u64,
}

/// Linked programs keyed by their `(vertex, fragment)` source pair.
///
/// The cache holds at most `capacity` programs. Readying a new source when
/// full deletes the least recently used program through the backend; callers
/// holding that handle notice via [`ShaderCache::ready_program`] returning
/// `false`.
#[derive(Debug)]
pub struct ShaderCache {
    capacity: usize,
    entries: HashMap<ShaderSource, CacheEntry>,
    tick: u64,
    evictions: u64,
}

impl ShaderCache {
    /// Create a cache holding at most `capacity` programs (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            tick: 0,
            evictions: 0,
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Bind the program for `source`, compiling it on a miss.
    pub fn ready_shader<B: GpuBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        source: &ShaderSource,
    ) -> BackendResult<ProgramHandle> {
        let tick = self.next_tick();
        if let Some(entry) = self.entries.get_mut(source) {
            entry.last_used = tick;
            let program = entry.program;
            backend.use_program(program);
            return Ok(program);
        }

        if self.entries.len() >= self.capacity {
            self.evict_lru(backend);
        }

        let program = backend.compile_program(source)?;
        log::debug!(
            "ShaderCache: compiled program {:?} ({} cached)",
            program,
            self.entries.len() + 1
        );
        self.entries.insert(
            source.clone(),
            CacheEntry {
                program,
                last_used: tick,
            },
        );
        backend.use_program(program);
        Ok(program)
    }

    /// Bind an already cached program.
    ///
    /// Returns `false` without binding anything if the program was evicted.
    pub fn ready_program<B: GpuBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        program: ProgramHandle,
    ) -> bool {
        let tick = self.next_tick();
        match self.entries.values_mut().find(|e| e.program == program) {
            Some(entry) => {
                entry.last_used = tick;
                backend.use_program(program);
                true
            }
            None => false,
        }
    }

    /// Whether a program is still cached.
    pub fn contains_program(&self, program: ProgramHandle) -> bool {
        self.entries.values().any(|e| e.program == program)
    }

    fn evict_lru<B: GpuBackend + ?Sized>(&mut self, backend: &mut B) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_used)
            .map(|(source, _)| source.clone());
        if let Some(entry) = oldest.and_then(|source| self.entries.remove(&source)) {
            log::debug!("ShaderCache: evicting program {:?}", entry.program);
            backend.delete_program(entry.program);
            self.evictions += 1;
        }
    }

    /// Delete every cached program.
    pub fn clear<B: GpuBackend + ?Sized>(&mut self, backend: &mut B) {
        for (_, entry) in self.entries.drain() {
            backend.delete_program(entry.program);
        }
    }

    /// Number of cached programs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no program is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of cached programs.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of programs evicted so far.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }
}

impl Default for ShaderCache {
    fn default() -> Self {
        Self::new(crate::config::ContextConfig::default().shader_cache_capacity)
    }
}
