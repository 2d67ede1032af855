use crate::errors::AppError;
use crate::prefs::Preferences;
use std::path::Path;
use tokio::fs;
use tracing::error;

pub async fn load_prefs(path: &Path) -> Preferences {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(prefs) => prefs,
            Err(err) => {
                error!("failed to parse preferences file: {err}");
                Preferences::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Preferences::default(),
        Err(err) => {
            error!("failed to read preferences file: {err}");
            Preferences::default()
        }
    }
}

pub async fn persist_prefs(path: &Path, prefs: &Preferences) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(prefs).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::KeyValueStore;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("mooniform_prefs_{}_{name}.json", std::process::id()));
        path
    }

    #[tokio::test]
    async fn missing_or_corrupt_file_loads_defaults() {
        let path = temp_path("corrupt");
        assert_eq!(load_prefs(&path).await, Preferences::default());

        fs::write(&path, b"{ not json").await.unwrap();
        assert_eq!(load_prefs(&path).await, Preferences::default());
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn persisted_prefs_load_back() {
        let path = temp_path("roundtrip");
        let mut prefs = Preferences::default();
        prefs.set_tint("200,40,40");
        prefs.set_flag("mooniform_muted", true);
        persist_prefs(&path, &prefs).await.unwrap();

        let loaded = load_prefs(&path).await;
        assert_eq!(loaded.tint().as_deref(), Some("200,40,40"));
        assert!(loaded.flag("mooniform_muted"));
        let _ = fs::remove_file(&path).await;
    }
}
