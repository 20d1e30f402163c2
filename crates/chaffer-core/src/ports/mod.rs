//! 포트 인터페이스.
//!
//! 어댑터 crate가 구현하고, 상위 계층은 `Arc<dyn ...>`으로 주입받는다.

pub mod entropy;
