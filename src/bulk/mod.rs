//! On-demand dependency and environment data for a set of targets
//!
//! Every call re-reads the files from disk; nothing is cached between calls.

mod deps;
mod env_file;

pub use deps::{parser_for, DependencyParser, DependencyTable, ParsedDependencies};
pub use env_file::parse_env_names;

use crate::error::{Error, Result};
use crate::targets::TargetInfo;
use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetData {
    pub dependencies: DependencyTable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<DependencyTable>,
    /// Names declared in the target's env files; values are never read out
    pub env_names: Vec<String>,
}

/// Address to data
pub type BulkTargetData = BTreeMap<String, TargetData>;

/// Fetch data for every target concurrently. Any failure fails the whole call.
pub async fn get_bulk_data(targets: &[TargetInfo], repo_path: &Path) -> Result<BulkTargetData> {
    let fetches = targets.iter().map(|target| async move {
        let data = target_data(target, repo_path).await?;
        Ok::<_, Error>((target.address(), data))
    });

    let data: BulkTargetData = try_join_all(fetches).await?.into_iter().collect();
    info!(targets = data.len(), "Collected bulk target data");
    Ok(data)
}

async fn target_data(target: &TargetInfo, repo_path: &Path) -> Result<TargetData> {
    let mut data = TargetData::default();

    let manifest = target.dependency_files.iter().find_map(|file| {
        let file_name = file.rsplit('/').next().unwrap_or(file);
        parser_for(file_name).map(|parser| (repo_path.join(file), parser))
    });

    if let Some((path, parser)) = manifest {
        let content = read(&path).await?;
        let parsed = parser.parse(&content).map_err(|message| Error::parse(&path, message))?;
        debug!(
            address = %target.address(),
            manifest = %path.display(),
            dependencies = parsed.dependencies.len(),
            "Parsed dependencies"
        );
        data.dependencies = parsed.dependencies;
        data.dev_dependencies = parsed.dev_dependencies;
    }

    for env_file in &target.env_files {
        let content = read(&repo_path.join(env_file)).await?;
        for name in parse_env_names(&content) {
            if !data.env_names.contains(&name) {
                data.env_names.push(name);
            }
        }
    }

    Ok(data)
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(path, e))
}
