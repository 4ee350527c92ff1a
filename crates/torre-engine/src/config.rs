//! Engine configuration from environment.

use std::env;
use std::io;
use std::path::PathBuf;

use torre_core::QueueKind;

/// Filesystem layout under the base directory: `dados/` holds registry and
/// queue files, `logs/` the audit history, `relatorios/` period reports.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_dir: PathBuf,
}

impl Config {
    /// Resolve the base directory from `TORRE_BASE_DIR`, defaulting to
    /// `aero70` under the user's home (or the working directory when no
    /// home is known).
    pub fn from_env() -> Self {
        let base_dir = env::var("TORRE_BASE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("aero70")
            });
        Self { base_dir }
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("dados")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    pub fn report_dir(&self) -> PathBuf {
        self.base_dir.join("relatorios")
    }

    pub fn flight_plans_path(&self) -> PathBuf {
        self.data_dir().join("planos_voo.csv")
    }

    pub fn runways_path(&self) -> PathBuf {
        self.data_dir().join("pistas.txt")
    }

    pub fn fleet_path(&self) -> PathBuf {
        self.data_dir().join("frota.csv")
    }

    pub fn pilots_path(&self) -> PathBuf {
        self.data_dir().join("pilotos.csv")
    }

    pub fn weather_path(&self) -> PathBuf {
        self.data_dir().join("metar.txt")
    }

    pub fn advisories_path(&self) -> PathBuf {
        self.data_dir().join("notam.txt")
    }

    pub fn queue_path(&self, kind: QueueKind) -> PathBuf {
        match kind {
            QueueKind::Departure => self.data_dir().join("fila_decolagem.txt"),
            QueueKind::Arrival => self.data_dir().join("fila_pouso.txt"),
        }
    }

    pub fn audit_log_path(&self) -> PathBuf {
        self.log_dir().join("audit.log")
    }

    /// Create the directory layout. Registry files are never created here.
    pub fn ensure_dirs(&self) -> io::Result<()> {
        for dir in [self.data_dir(), self.log_dir(), self.report_dir()] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_hang_off_the_base_dir() {
        let config = Config::with_base_dir("/tmp/torre-test");
        assert_eq!(
            config.flight_plans_path(),
            PathBuf::from("/tmp/torre-test/dados/planos_voo.csv")
        );
        assert_eq!(
            config.queue_path(QueueKind::Departure),
            PathBuf::from("/tmp/torre-test/dados/fila_decolagem.txt")
        );
        assert_eq!(
            config.queue_path(QueueKind::Arrival),
            PathBuf::from("/tmp/torre-test/dados/fila_pouso.txt")
        );
        assert_eq!(
            config.audit_log_path(),
            PathBuf::from("/tmp/torre-test/logs/audit.log")
        );
        assert_eq!(
            config.report_dir(),
            PathBuf::from("/tmp/torre-test/relatorios")
        );
    }

    #[test]
    fn ensure_dirs_builds_the_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::with_base_dir(tmp.path().join("base"));
        config.ensure_dirs().unwrap();
        assert!(config.data_dir().is_dir());
        assert!(config.log_dir().is_dir());
        assert!(config.report_dir().is_dir());
    }
}
