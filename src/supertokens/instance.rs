//! Process-wide instance with init-once semantics.

use std::sync::{Arc, OnceLock};

use super::{SuperTokens, TypeInput};
use crate::error::{ConfigError, SuperTokensError, SuperTokensResult};

/// Holds at most one [`SuperTokens`].
///
/// The first successful `init` wins. Later calls return the stored instance
/// and drop their configuration without building it.
#[derive(Debug, Default)]
pub struct Instance {
    cell: OnceLock<Arc<SuperTokens>>,
}

impl Instance {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    pub fn init(&self, config: TypeInput) -> Result<Arc<SuperTokens>, ConfigError> {
        if let Some(existing) = self.cell.get() {
            tracing::debug!("SuperTokens already initialised; ignoring init call");
            return Ok(existing.clone());
        }
        let built = Arc::new(SuperTokens::new(config)?);
        // A concurrent init may have won the race; keep whichever landed first.
        Ok(self.cell.get_or_init(|| built).clone())
    }

    pub fn get(&self) -> SuperTokensResult<Arc<SuperTokens>> {
        self.cell.get().cloned().ok_or_else(|| {
            SuperTokensError::General(
                "initialisation not done. Did you forget to call the SuperTokens.init function?"
                    .to_string(),
            )
        })
    }
}

static INSTANCE: Instance = Instance::new();

/// Initialise the process-wide instance. Only the first call has an effect.
pub fn init(config: TypeInput) -> Result<Arc<SuperTokens>, ConfigError> {
    INSTANCE.init(config)
}

pub fn get_instance() -> SuperTokensResult<Arc<SuperTokens>> {
    INSTANCE.get()
}
