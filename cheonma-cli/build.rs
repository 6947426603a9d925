use std::path::Path;
use std::process::Command;

const SHA_VAR: &str = "CHEONMA_BUILD_SHA";

/// Stdout of `git -C <repo> <args>`, trimmed; `None` if git fails or prints nothing.
fn git(repo: &Path, args: &[&str]) -> Option<String> {
    let out = Command::new("git").arg("-C").arg(repo).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Short HEAD sha, suffixed `-dirty` when tracked files have local edits.
fn build_stamp(repo: &Path) -> Option<String> {
    let sha = git(repo, &["rev-parse", "--short", "HEAD"])?;
    let dirty = git(repo, &["status", "--porcelain", "--untracked-files=no"]).is_some();
    Some(if dirty { format!("{sha}-dirty") } else { sha })
}

fn main() {
    println!("cargo:rerun-if-env-changed={SHA_VAR}");

    // Packagers building from a tarball set the stamp themselves.
    let stamp = match std::env::var(SHA_VAR) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => {
            let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
            let repo = Path::new(&manifest_dir).join("..");
            println!("cargo:rerun-if-changed={}", repo.join(".git/HEAD").display());
            println!("cargo:rerun-if-changed={}", repo.join(".git/index").display());
            build_stamp(&repo).unwrap_or_else(|| "unknown".to_string())
        }
    };

    println!("cargo:rustc-env={SHA_VAR}={stamp}");
}
