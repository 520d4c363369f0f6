//! Embeds the bundled SQL scripts into the binary.
//!
//! Every `*.sql` file directly inside `sql/` (or the directory named by
//! `COMMANDER_BUNDLED_SQL`) becomes one `(file name, contents)` entry of
//! `BUNDLED_SCRIPTS`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    println!("cargo:rerun-if-env-changed=COMMANDER_BUNDLED_SQL");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let sql_dir = env::var_os("COMMANDER_BUNDLED_SQL")
        .map(PathBuf::from)
        .unwrap_or_else(|| manifest_dir.join("sql"));
    println!("cargo:rerun-if-changed={}", sql_dir.display());

    let entries = collect_scripts(&sql_dir);
    for (_, path) in &entries {
        println!("cargo:rerun-if-changed={}", path.display());
    }

    let mut code = String::from(
        "/// Scripts embedded from the bundled SQL directory at build time.\n\
         pub static BUNDLED_SCRIPTS: &[(&str, &str)] = &[\n",
    );
    for (name, path) in &entries {
        let absolute = fs::canonicalize(path).unwrap();
        code.push_str(&format!(
            "    ({name:?}, include_str!({:?})),\n",
            absolute.display().to_string()
        ));
    }
    code.push_str("];\n");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("bundled.rs"), code).unwrap();
}

fn collect_scripts(dir: &Path) -> Vec<(String, PathBuf)> {
    let Ok(read_dir) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut entries: Vec<(String, PathBuf)> = read_dir
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("sql"))
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?.to_string();
            Some((name, path))
        })
        .collect();
    entries.sort();
    entries
}
