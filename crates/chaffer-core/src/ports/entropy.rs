//! 보안 난수원 포트.
//!
//! 패딩 지연/크기는 트래픽 분석 공격자가 예측할 수 없어야 하므로
//! 구현체는 반드시 암호학적으로 안전한 난수원이어야 한다.
//! 실패 시 `CoreError::RandomSourceFailure`를 반환하고, 호출자는 약한 난수로 대체하지 않는다.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::CoreError;

/// 암호학적 보안 난수원
pub trait EntropySource: Send + Sync {
    /// 버퍼를 난수 바이트로 채운다
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), CoreError>;

    /// 난수원 바이트로 시드한 ChaCha 기반 `StdRng`
    ///
    /// 추출마다 새로 시드하므로 난수원이 실패하면 해당 추출도 실패한다.
    fn seeded_rng(&self) -> Result<StdRng, CoreError> {
        let mut seed = <StdRng as SeedableRng>::Seed::default();
        self.fill_bytes(seed.as_mut())?;
        Ok(StdRng::from_seed(seed))
    }

    /// `[low, high]` 균등 정수 (양 끝 포함)
    fn uniform_inclusive(&self, low: u64, high: u64) -> Result<u64, CoreError> {
        if high <= low {
            return Ok(low);
        }
        Ok(self.seeded_rng()?.random_range(low..=high))
    }
}
