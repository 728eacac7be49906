use crate::models::ModelRegistry;
use crate::traits::{Output, TerminalOutput};
#[cfg(test)]
use crate::traits::MockOutput;
use std::sync::Arc;

/// Application context that holds all dependencies for dependency injection
pub struct Context {
    pub output: Arc<dyn Output>,
    pub registry: Arc<ModelRegistry>,
}

impl Context {
    /// Create a new context with real implementations (for production use)
    pub fn new() -> Self {
        Self {
            output: Arc::new(TerminalOutput),
            registry: Arc::new(ModelRegistry::with_defaults()),
        }
    }

    /// Create a new context with mock output (for testing)
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            output: Arc::new(MockOutput::new()),
            registry: Arc::new(ModelRegistry::with_defaults()),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Context {
    fn clone(&self) -> Self {
        Self {
            output: Arc::clone(&self.output),
            registry: Arc::clone(&self.registry),
        }
    }
}
