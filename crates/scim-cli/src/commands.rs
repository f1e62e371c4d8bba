//! Dispatches parsed commands to a user directory.

use crate::cli::Command;
use anyhow::Context;
use scim_core::DirectoryResult;
use scim_directory::{PatchRequest, UserDirectory, UserEntity};
use serde_json::{json, Value};
use std::path::Path;

/// Runs `command` and returns the JSON document to print.
pub async fn execute(directory: &dyn UserDirectory, command: Command) -> DirectoryResult<Value> {
    match command {
        Command::Me => Ok(serde_json::to_value(directory.me().await?)?),
        Command::Get { id } => Ok(serde_json::to_value(directory.read(&id).await?)?),
        Command::List { filter } => Ok(serde_json::to_value(directory.filter(&filter).await?)?),
        Command::Create(args) => {
            let entity = UserEntity::from(args);
            Ok(serde_json::to_value(directory.create(&entity).await?)?)
        }
        Command::Update { id, user } => {
            directory.update(&id, &UserEntity::from(user)).await?;
            Ok(json!({ "id": id, "result": "updated" }))
        }
        Command::Patch { id, file } => {
            let request = read_patch_file(&file)?;
            directory.patch(&id, &request).await?;
            Ok(json!({ "id": id, "result": "patched" }))
        }
        Command::Delete { id } => {
            directory.delete(&id).await?;
            Ok(json!({ "id": id, "result": "deleted" }))
        }
    }
}

fn read_patch_file(file: &Path) -> DirectoryResult<PatchRequest> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read patch file {}", file.display()))?;
    let value: Value = serde_json::from_str(&contents)?;
    Ok(PatchRequest::from_value(value))
}
