use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What a generated world was built from, recorded next to it.
pub struct Payload {
    pub params: Value,
    pub inputs: Vec<String>,
    pub fingerprint: Option<u64>,
}

impl Payload {
    pub fn new(params: Value) -> Self {
        Self {
            params,
            inputs: Vec::new(),
            fingerprint: None,
        }
    }

    pub fn input<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.inputs
            .push(path.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn fingerprint(mut self, fp: u64) -> Self {
        self.fingerprint = Some(fp);
        self
    }
}

/// Write `<stem>.provenance.json` beside `artifact`: code revision, library
/// version, callsite, graph fingerprint, params, inputs and outputs.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let sidecar = provenance_path(artifact);
    if let Some(parent) = sidecar.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let callsite = Location::caller();
    let doc = json!({
        "code_rev": current_git_rev(),
        "roadworld_version": roadworld::VERSION,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        // Hex keeps the full u64 exact for JSON readers that parse doubles.
        "fingerprint": payload.fingerprint.map(|fp| format!("{fp:016x}")),
        "params": payload.params,
        "inputs": payload.inputs,
        "outputs": [artifact.to_string_lossy()]
    });
    fs::write(&sidecar, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", sidecar.display()))?;
    Ok(sidecar)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("world"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Commit the binary was built from: `GIT_COMMIT` at build or run time, then
/// `git rev-parse HEAD`, else "unknown".
pub fn current_git_rev() -> String {
    if let Some(built) = option_env!("GIT_COMMIT").filter(|s| !s.is_empty()) {
        return built.to_string();
    }
    if let Ok(runtime) = std::env::var("GIT_COMMIT") {
        if !runtime.is_empty() {
            return runtime;
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn sidecar_sits_beside_artifact() {
        let derived = provenance_path(Path::new("/tmp/worlds/town.json"));
        assert_eq!(derived, Path::new("/tmp/worlds/town.provenance.json"));
    }

    #[test]
    fn sidecar_records_inputs_and_fingerprint() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("nested").join("w.json");
        let payload = Payload::new(json!({"seed": 3}))
            .input("in.json")
            .fingerprint(0xabc);
        let path = write_sidecar(&artifact, payload).unwrap();
        assert!(path.exists());
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["inputs"][0], "in.json");
        assert_eq!(parsed["fingerprint"], "0000000000000abc");
        assert_eq!(parsed["params"]["seed"], 3);
    }
}
