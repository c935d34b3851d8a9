/// Process-wide notifier configuration
///
/// The slot starts empty and is filled with defaults on first read.
/// Readers get an `Arc` snapshot; writers swap the whole instance.
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::Configuration;

static CONFIGURATION: RwLock<Option<Arc<Configuration>>> = RwLock::new(None);

/// Current configuration, created with defaults if none is set
pub fn configuration() -> Arc<Configuration> {
    if let Some(config) = CONFIGURATION
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
    {
        return Arc::clone(config);
    }

    let mut slot = CONFIGURATION
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    Arc::clone(slot.get_or_insert_with(|| {
        tracing::debug!("Creating default notifier configuration");
        Arc::new(Configuration::default())
    }))
}

/// Replace the configuration; `None` makes the next read start over from
/// defaults.
pub fn set_configuration(config: Option<Configuration>) {
    *CONFIGURATION
        .write()
        .unwrap_or_else(PoisonError::into_inner) = config.map(Arc::new);
}

pub fn reset_configuration() {
    set_configuration(None);
}

/// Block-style configuration.
///
/// `f` edits a copy of the current configuration, which then replaces it.
/// No lock is held while `f` runs, so it may call `configuration()` itself
/// (and sees the pre-edit values). Concurrent `configure` calls are last
/// writer wins. Snapshots handed out earlier keep the old values.
pub fn configure<F>(f: F) -> Arc<Configuration>
where
    F: FnOnce(&mut Configuration),
{
    let mut config = Configuration::clone(&configuration());
    f(&mut config);

    let config = Arc::new(config);
    *CONFIGURATION
        .write()
        .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&config));

    tracing::debug!(
        host = %config.host,
        environment = ?config.environment_name,
        "Notifier configured"
    );
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, mpsc};
    use std::thread;
    use std::time::Duration;

    // The slot is process-global; keep these tests from interleaving
    static GUARD: Mutex<()> = Mutex::new(());

    #[test]
    fn test_new_instance_if_none_defined() {
        let _guard = GUARD.lock().unwrap_or_else(PoisonError::into_inner);

        set_configuration(None);
        let config = configuration();
        assert_eq!(config.host, "api.honeybadger.io");
        assert!(Arc::ptr_eq(&config, &configuration()));
    }

    #[test]
    fn test_reset_gives_fresh_defaults() {
        let _guard = GUARD.lock().unwrap_or_else(PoisonError::into_inner);

        let mut custom = Configuration::new();
        custom.host = "collector.local".to_string();
        set_configuration(Some(custom));
        let before = configuration();
        assert_eq!(before.host, "collector.local");

        reset_configuration();
        let after = configuration();
        assert_eq!(after.host, "api.honeybadger.io");
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_configure_block() {
        let _guard = GUARD.lock().unwrap_or_else(PoisonError::into_inner);

        reset_configuration();
        let snapshot = configuration();

        let updated = configure(|config| {
            config.api_key = Some("abc123".to_string());
            config.params_filters.push("credit_card".into());
        });

        assert_eq!(updated.api_key.as_deref(), Some("abc123"));
        assert!(updated.is_filtered_param("credit_card"));
        assert_eq!(configuration().api_key.as_deref(), Some("abc123"));
        assert_eq!(snapshot.api_key, None);

        // Later blocks build on earlier ones
        configure(|config| config.debug = true);
        let current = configuration();
        assert!(current.debug);
        assert_eq!(current.api_key.as_deref(), Some("abc123"));

        reset_configuration();
    }

    #[test]
    fn test_configure_can_read_current_configuration() {
        let _guard = GUARD.lock().unwrap_or_else(PoisonError::into_inner);

        let mut custom = Configuration::new();
        custom.host = "collector.local".to_string();
        set_configuration(Some(custom));

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let updated = configure(|config| {
                let current = configuration();
                config.host = format!("{}-eu", current.host);
            });
            let _ = tx.send(updated.host.clone());
        });

        let host = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("configure blocked while reading the current configuration");
        assert_eq!(host, "collector.local-eu");
        assert_eq!(configuration().host, "collector.local-eu");

        reset_configuration();
    }
}
