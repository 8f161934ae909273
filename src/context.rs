//! Rendering context shared by every mapper drawing into it.

use crate::backend::GpuBackend;
use crate::config::ContextConfig;
use crate::shader::ShaderCache;

/// Owns the GPU backend and the program cache.
///
/// All mappers drawing through the same context share linked programs.
pub struct GraphicsContext<B: GpuBackend> {
    backend: B,
    shader_cache: ShaderCache,
}

impl<B: GpuBackend> GraphicsContext<B> {
    /// Create a context with the default configuration.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, ContextConfig::default())
    }

    /// Create a context with an explicit configuration.
    pub fn with_config(backend: B, config: ContextConfig) -> Self {
        log::info!(
            "GraphicsContext: using {} (shader cache capacity {})",
            backend.name(),
            config.shader_cache_capacity
        );
        Self {
            backend,
            shader_cache: ShaderCache::new(config.shader_cache_capacity),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn shader_cache(&self) -> &ShaderCache {
        &self.shader_cache
    }

    /// Borrow the backend and the cache at the same time.
    pub fn split_mut(&mut self) -> (&mut B, &mut ShaderCache) {
        (&mut self.backend, &mut self.shader_cache)
    }

    /// Delete every cached program.
    pub fn release_programs(&mut self) {
        self.shader_cache.clear(&mut self.backend);
    }
}
