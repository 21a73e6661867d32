//! Кладёт config.toml из корня workspace рядом с собранным бинарником
//! (target/debug или target/release), где его ищет `load_config`.

use std::env;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

fn profile_dir() -> Result<PathBuf, Box<dyn Error>> {
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let profile = env::var("PROFILE")?;
    // OUT_DIR = target/<profile>/build/backend-<hash>/out
    out_dir
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .map(Path::to_path_buf)
        .ok_or_else(|| format!("no {} directory above {}", profile, out_dir.display()).into())
}

fn main() -> Result<(), Box<dyn Error>> {
    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .ok_or("workspace root not found")?;
    let source = workspace_root.join("config.toml");
    println!("cargo:rerun-if-changed={}", source.display());

    if !source.exists() {
        println!("cargo:warning=config.toml not found, the embedded default will be used (see config.example.toml)");
        return Ok(());
    }

    let dest = profile_dir()?.join("config.toml");
    fs::copy(&source, &dest).map_err(|e| format!("copy {} failed: {}", source.display(), e))?;
    println!("cargo:warning=Copied config.toml to {}", dest.display());
    Ok(())
}
