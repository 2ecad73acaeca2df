//! planner init command implementation
//!
//! Creates the data directory, a default `planner.toml` and an empty store.

use std::path::PathBuf;

use serde::Serialize;

use super::task::GlobalOptions;
use crate::config::{self, Config, StorageKind, CONFIG_FILENAME};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::storage;

#[derive(Serialize)]
struct InitReport {
    data_dir: PathBuf,
    backend: StorageKind,
    store: PathBuf,
    created: InitCreated,
}

#[derive(Serialize)]
struct InitCreated {
    data_dir: bool,
    config: bool,
    store: bool,
}

pub fn run(global: GlobalOptions) -> Result<()> {
    let data_dir = config::resolve_data_dir(global.data_dir.as_deref());
    let created_dir = config::ensure_data_dir(&data_dir)?;

    let config_path = Config::path_in(&data_dir);
    let created_config = !config_path.exists();
    let config = if created_config {
        let mut config = Config::default();
        if let Some(kind) = global.backend {
            config.storage.backend = kind;
        }
        config.save(&config_path)?;
        config
    } else {
        Config::load(&config_path)?
    };

    let kind = global.backend.unwrap_or(config.storage.backend);
    let backend = storage::open(kind, &data_dir, &config.storage);
    let created_store = !backend.location().exists();
    backend.ensure_initialized()?;

    let report = InitReport {
        data_dir: data_dir.clone(),
        backend: kind,
        store: backend.location().to_path_buf(),
        created: InitCreated {
            data_dir: created_dir,
            config: created_config,
            store: created_store,
        },
    };

    let mut created_items = Vec::new();
    if created_dir {
        created_items.push("data dir".to_string());
    }
    if created_config {
        created_items.push(CONFIG_FILENAME.to_string());
    }
    if created_store {
        created_items.push(format!("{} store", kind.as_str()));
    }

    let header = if created_items.is_empty() {
        "planner init: nothing to do".to_string()
    } else {
        "planner init: initialized".to_string()
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("data dir", data_dir.display().to_string());
    human.push_summary("backend", kind.as_str());
    human.push_summary("store", backend.location().display().to_string());
    human.push_summary(
        "created",
        if created_items.is_empty() {
            "none".to_string()
        } else {
            created_items.join(", ")
        },
    );
    human.push_next_step("planner add <DESCRIPTION> --time HH:MM");

    emit_success(global.output(), "init", &report, Some(&human))
}
