use anyhow::{Context, Result, bail};
use folio_core::{CvConfig, Language};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Performs the actual save of the CV asset.
pub trait Downloader: Send {
    fn save(&mut self, language: Language) -> Result<PathBuf>;
}

/// Copies the static asset into the download directory under the
/// language-specific file name.
#[derive(Debug, Clone)]
pub struct FileDownloader {
    asset: PathBuf,
    dest_dir: PathBuf,
    cfg: CvConfig,
}

impl FileDownloader {
    pub fn from_config(cfg: &CvConfig, workspace: &Path) -> Self {
        Self {
            asset: cfg.resolve_asset_path(workspace),
            dest_dir: cfg.resolve_download_dir(workspace),
            cfg: cfg.clone(),
        }
    }

    pub fn with_dest_dir(mut self, dest_dir: PathBuf) -> Self {
        self.dest_dir = dest_dir;
        self
    }

    pub fn target_path(&self, language: Language) -> PathBuf {
        self.dest_dir.join(self.cfg.file_name(language))
    }
}

impl Downloader for FileDownloader {
    fn save(&mut self, language: Language) -> Result<PathBuf> {
        if !self.asset.is_file() {
            bail!("CV asset not found at {}", self.asset.display());
        }
        fs::create_dir_all(&self.dest_dir).with_context(|| {
            format!("failed to create download directory {}", self.dest_dir.display())
        })?;
        let target = self.target_path(language);
        fs::copy(&self.asset, &target)
            .with_context(|| format!("failed to write {}", target.display()))?;
        Ok(target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvState {
    Idle,
    Downloading,
    Success,
    Error,
}

impl CvState {
    pub fn label_key(self) -> &'static str {
        match self {
            CvState::Idle => "cv.download",
            CvState::Downloading => "cv.downloading",
            CvState::Success => "cv.downloaded",
            CvState::Error => "cv.error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CvOutcome {
    Saved(PathBuf),
    Failed(String),
}

/// `idle -> downloading -> success|error -> idle`, driven by deadlines.
pub struct CvDownload {
    state: CvState,
    deadline: Option<Instant>,
    language: Language,
    prepare: Duration,
    reset: Duration,
    downloader: Box<dyn Downloader>,
}

impl std::fmt::Debug for CvDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CvDownload")
            .field("state", &self.state)
            .field("deadline", &self.deadline)
            .field("language", &self.language)
            .finish()
    }
}

impl CvDownload {
    pub fn new(cfg: &CvConfig, downloader: Box<dyn Downloader>) -> Self {
        Self {
            state: CvState::Idle,
            deadline: None,
            language: Language::default(),
            prepare: Duration::from_millis(cfg.prepare_delay_ms),
            reset: Duration::from_millis(cfg.reset_delay_ms),
            downloader,
        }
    }

    pub fn state(&self) -> CvState {
        self.state
    }

    /// Refused only while a download is already being prepared. Starting
    /// from `success` or `error` cuts the feedback period short.
    pub fn start(&mut self, now: Instant, language: Language) -> bool {
        if self.state == CvState::Downloading {
            return false;
        }
        self.state = CvState::Downloading;
        self.language = language;
        self.deadline = Some(now + self.prepare);
        true
    }

    /// Advance the machine. Returns the save result on the tick that
    /// performs it.
    pub fn poll(&mut self, now: Instant) -> Option<CvOutcome> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        match self.state {
            CvState::Downloading => {
                let outcome = match self.downloader.save(self.language) {
                    Ok(path) => {
                        info!(path = %path.display(), "cv saved");
                        self.state = CvState::Success;
                        CvOutcome::Saved(path)
                    }
                    Err(err) => {
                        warn!(error = %format!("{err:#}"), "cv download failed");
                        self.state = CvState::Error;
                        CvOutcome::Failed(format!("{err:#}"))
                    }
                };
                self.deadline = Some(now + self.reset);
                Some(outcome)
            }
            CvState::Success | CvState::Error => {
                self.state = CvState::Idle;
                self.deadline = None;
                None
            }
            CvState::Idle => {
                self.deadline = None;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingDownloader {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl Downloader for CountingDownloader {
        fn save(&mut self, language: Language) -> Result<PathBuf> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                bail!("disk full");
            }
            Ok(PathBuf::from(format!("CV-{}.pdf", language.cv_label())))
        }
    }

    fn machine(fail: bool) -> (CvDownload, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let download = CvDownload::new(
            &CvConfig::default(),
            Box::new(CountingDownloader {
                calls: Arc::clone(&calls),
                fail,
            }),
        );
        (download, calls)
    }

    #[test]
    fn full_cycle_saves_exactly_once() {
        let (mut cv, calls) = machine(false);
        let t0 = Instant::now();
        assert_eq!(cv.state(), CvState::Idle);
        assert!(cv.start(t0, Language::De));
        assert_eq!(cv.state(), CvState::Downloading);

        assert_eq!(cv.poll(t0 + Duration::from_millis(500)), None);
        let outcome = cv.poll(t0 + Duration::from_millis(1000));
        assert_eq!(outcome, Some(CvOutcome::Saved(PathBuf::from("CV-Deutsch.pdf"))));
        assert_eq!(cv.state(), CvState::Success);

        assert_eq!(cv.poll(t0 + Duration::from_millis(3999)), None);
        assert_eq!(cv.state(), CvState::Success);
        cv.poll(t0 + Duration::from_millis(4000));
        assert_eq!(cv.state(), CvState::Idle);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn start_is_refused_while_downloading() {
        let (mut cv, calls) = machine(false);
        let t0 = Instant::now();
        assert!(cv.start(t0, Language::En));
        assert!(!cv.start(t0 + Duration::from_millis(10), Language::De));
        cv.poll(t0 + Duration::from_secs(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cv.start(t0 + Duration::from_secs(2), Language::De));
    }

    #[test]
    fn failure_enters_error_then_recovers() {
        let (mut cv, _) = machine(true);
        let t0 = Instant::now();
        cv.start(t0, Language::De);
        let outcome = cv.poll(t0 + Duration::from_secs(1));
        assert!(matches!(outcome, Some(CvOutcome::Failed(msg)) if msg.contains("disk full")));
        assert_eq!(cv.state(), CvState::Error);
        cv.poll(t0 + Duration::from_secs(4));
        assert_eq!(cv.state(), CvState::Idle);
    }

    #[test]
    fn file_downloader_uses_language_file_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let asset = dir.path().join("public/cv-ali-hassan.pdf");
        fs::create_dir_all(asset.parent().expect("parent")).expect("mkdir");
        fs::write(&asset, b"%PDF-1.4").expect("write asset");

        let cfg = CvConfig {
            download_dir: "out".to_string(),
            ..CvConfig::default()
        };
        let mut downloader = FileDownloader::from_config(&cfg, dir.path());
        let saved = downloader.save(Language::En).expect("save");
        assert_eq!(saved, dir.path().join("out/CV-Ali-Hassan-English.pdf"));
        assert_eq!(fs::read(&saved).expect("read"), b"%PDF-1.4");
    }

    #[test]
    fn file_downloader_reports_missing_asset() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut downloader = FileDownloader::from_config(&CvConfig::default(), dir.path())
            .with_dest_dir(dir.path().join("out"));
        let err = downloader.save(Language::De).expect_err("missing asset");
        assert!(err.to_string().contains("not found"));
    }
}
