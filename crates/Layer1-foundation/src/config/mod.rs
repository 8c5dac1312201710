//! Config - 연결 설정 관리
//!
//! - `unify.rs` - UnifyConfig 연결 설정과 계층 로드

mod unify;

pub use unify::{
    normalize_base_path, UnifyConfig, DEFAULT_BASE_PATH, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_PROTOCOL, DEFAULT_TIMEOUT_SECS, UNIFY_CONFIG_DIR, UNIFY_CONFIG_FILE, UNIFY_PROJECT_DIR,
};
