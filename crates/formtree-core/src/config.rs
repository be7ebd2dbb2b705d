#![forbid(unsafe_code)]

//! Behaviour switches for event handling and submission.

/// Configuration for [`Form`](crate::Form) and [`handle_event`](crate::handle_event).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormConfig {
    /// Revalidate a field after its value changes.
    pub revalidate_on_change: bool,
    /// Mark every field touched before validating on submit.
    pub touch_on_submit: bool,
    /// Refuse adds past `repeatable_max` and removes below `repeatable_min`.
    pub enforce_repeatable_bounds: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            revalidate_on_change: true,
            touch_on_submit: true,
            enforce_repeatable_bounds: true,
        }
    }
}

impl FormConfig {
    #[must_use]
    pub fn with_revalidate_on_change(mut self, enabled: bool) -> Self {
        self.revalidate_on_change = enabled;
        self
    }

    #[must_use]
    pub fn with_touch_on_submit(mut self, enabled: bool) -> Self {
        self.touch_on_submit = enabled;
        self
    }

    /// Let the host manage repeatable lengths itself.
    #[must_use]
    pub fn with_enforce_repeatable_bounds(mut self, enabled: bool) -> Self {
        self.enforce_repeatable_bounds = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_everything() {
        let config = FormConfig::default();
        assert!(config.revalidate_on_change);
        assert!(config.touch_on_submit);
        assert!(config.enforce_repeatable_bounds);
    }

    #[test]
    fn builders_override() {
        let config = FormConfig::default()
            .with_revalidate_on_change(false)
            .with_enforce_repeatable_bounds(false);
        assert!(!config.revalidate_on_change);
        assert!(config.touch_on_submit);
        assert!(!config.enforce_repeatable_bounds);
    }
}
