use shared::{domain::Theme, error::ForumError};
use storage::Storage;
use tracing::{info, warn};

use crate::storage_error;

/// Holds the page-wide theme. `None` means the environment default is in
/// effect and nothing has been persisted yet.
pub struct ThemeSwitcher {
    storage: Storage,
    applied: Option<Theme>,
}

impl ThemeSwitcher {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            applied: None,
        }
    }

    pub fn applied(&self) -> Option<Theme> {
        self.applied
    }

    pub fn set_theme(&mut self, name: &str) -> Result<Theme, ForumError> {
        let theme = name
            .parse::<Theme>()
            .map_err(|err| ForumError::validation(err.to_string()))?;
        self.apply(theme)?;
        Ok(theme)
    }

    pub fn apply(&mut self, theme: Theme) -> Result<(), ForumError> {
        self.storage.save_theme(theme).map_err(storage_error)?;
        self.applied = Some(theme);
        info!(%theme, "theme applied");
        Ok(())
    }

    /// Applies the persisted theme, if any, and returns it so a theme
    /// selector can be synchronised.
    pub fn load_theme(&mut self) -> Result<Option<Theme>, ForumError> {
        let Some(raw) = self.storage.load_theme().map_err(storage_error)? else {
            return Ok(None);
        };

        match raw.parse::<Theme>() {
            Ok(theme) => {
                self.applied = Some(theme);
                Ok(Some(theme))
            }
            Err(error) => {
                warn!(%error, "ignoring persisted theme");
                Ok(None)
            }
        }
    }
}
