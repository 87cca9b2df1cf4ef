use crate::api::CodedropApi;
use crate::config::CodedropConfig;
use crate::registry::FileRegistry;
use crate::store::fs::JsonFileBackend;
use crate::uploads::UploadDir;
use directories::ProjectDirs;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the upload directory.
pub const HOME_ENV: &str = "CODEDROP_HOME";

const DEFAULT_DIR_NAME: &str = "file-storage";

pub struct CodedropContext {
    pub api: CodedropApi<JsonFileBackend>,
    pub config: CodedropConfig,
}

/// Pick the upload directory: explicit flag, then `CODEDROP_HOME`, then the
/// platform data directory, then `./file-storage`.
pub fn resolve_home(
    cwd: &Path,
    explicit: Option<PathBuf>,
    env_home: Option<OsString>,
) -> PathBuf {
    let chosen = explicit
        .or_else(|| env_home.filter(|v| !v.is_empty()).map(PathBuf::from))
        .or_else(|| {
            ProjectDirs::from("com", "codedrop", "codedrop")
                .map(|dirs| dirs.data_dir().join(DEFAULT_DIR_NAME))
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR_NAME));

    if chosen.is_absolute() {
        chosen
    } else {
        cwd.join(chosen)
    }
}

/// Load configuration and open the registry for `home`.
pub fn initialize(home: PathBuf) -> CodedropContext {
    let config = CodedropConfig::load(&home).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config, using defaults");
        CodedropConfig::default()
    });
    debug!(home = %home.display(), mapping_file = %config.mapping_file, "opening registry");

    let backend = JsonFileBackend::in_dir(&home, &config.mapping_file);
    let registry = FileRegistry::open(UploadDir::new(&home), backend);
    let api = CodedropApi::new(registry, home);

    CodedropContext { api, config }
}
