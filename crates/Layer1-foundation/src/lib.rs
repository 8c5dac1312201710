//! # unify-foundation
//!
//! Foundation layer for the Unify client:
//! - Error: 공통 에러 타입 (Error, Result)
//! - Config: 연결 설정 (UnifyConfig)
//! - Auth: 인증 헤더 (UsernamePasswordAuth)

pub mod auth;
pub mod config;
pub mod error;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{
    normalize_base_path, UnifyConfig, DEFAULT_BASE_PATH, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_PROTOCOL, DEFAULT_TIMEOUT_SECS, UNIFY_CONFIG_DIR, UNIFY_CONFIG_FILE,
    UNIFY_PROJECT_DIR,
};

// ============================================================================
// Auth (인증)
// ============================================================================
pub use auth::{UsernamePasswordAuth, AUTH_SCHEME};
