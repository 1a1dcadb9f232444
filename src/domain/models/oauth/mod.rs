//! 외부 OAuth 프로바이더 통합 모델

pub mod attribute_mapping;
pub mod canonical_identity;

pub use attribute_mapping::{normalize, normalize_for, AttributeMapping};
pub use canonical_identity::CanonicalIdentity;
