//! OS CSPRNG 난수원 어댑터.

use chaffer_core::error::CoreError;
use chaffer_core::ports::entropy::EntropySource;
use tracing::error;

/// 운영체제 보안 난수원 (`getrandom`)
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl OsEntropy {
    pub fn new() -> Self {
        Self
    }

    /// 시작 시 난수원 사용 가능 여부 확인
    pub fn probe(&self) -> Result<(), CoreError> {
        let mut buf = [0u8; 16];
        self.fill_bytes(&mut buf)
    }
}

impl EntropySource for OsEntropy {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), CoreError> {
        getrandom::getrandom(dest).map_err(|e| {
            error!("OS 난수원 실패: {e}");
            CoreError::RandomSourceFailure(e.to_string())
        })
    }
}
