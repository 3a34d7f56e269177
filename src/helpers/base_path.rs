use std::{env, path::PathBuf};

use crate::constants::envvars;

const DEFAULT_DATA_DIR: &str = "data";
const KVS_REL_PATH: &str = "kvs-db/kvstore.db";
const PORTAL_REL_PATH: &str = "portal";

pub fn data_dir() -> PathBuf {
    match env::var(envvars::DATA_DIR) {
        Ok(dir) if !dir.is_empty() => dir.into(),
        _ => PathBuf::from(".").join(DEFAULT_DATA_DIR),
    }
}

pub fn kvs_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join(KVS_REL_PATH)
}

pub fn portal_dir(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join(PORTAL_REL_PATH)
}
