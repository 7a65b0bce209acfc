//! PDF study assistant: per-document AI analysis, cross-document topic
//! aggregation, a generated study roadmap and an offline HTML report.

pub mod aggregate;
pub mod ai;
pub mod collation;
pub mod config;
pub mod encoding;
pub mod error;
pub mod ids;
pub mod lifecycle;
pub mod model;
pub mod report;
pub mod secrets;
pub mod session;
pub mod storage;
pub mod telemetry;

pub use aggregate::TopicIndex;
pub use ai::{AiError, AnalysisClient, GeminiBackend, GenerativeBackend, RoadmapClient};
pub use config::{load_config, load_config_or_default, Config};
pub use error::{ConfigError, Result, SessionError, StorageError, StudyplanError};
pub use model::{AnalysisResult, FileStatus, Priority, RawFile, RoadmapStep, StudyItem, TrackedFile};
pub use secrets::{resolve_api_key, resolve_secret, resolve_secret_optional, SecretError};
pub use session::{Confirm, Session, SessionDeps, SessionEvent, SessionHandle, SessionSnapshot};
pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use telemetry::{init_logging, LogFormat};
