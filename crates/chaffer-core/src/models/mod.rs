//! 도메인 모델.

pub mod observation;
pub mod profile;
pub mod summary;
