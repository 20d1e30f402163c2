//! 분포 샘플링.

use chaffer_core::error::CoreError;
use chaffer_core::models::profile::{DistributionKind, FittedDistribution};
use chaffer_core::ports::entropy::EntropySource;
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// 절단 정규 분포 거절 샘플링 최대 횟수. 초과 시 구간 균등 분포로 대체.
const MAX_REJECTION_ROUNDS: usize = 32;

/// 분포에서 `[min, max]` 범위의 음이 아닌 값 하나를 뽑는다
pub(crate) fn sample(
    entropy: &dyn EntropySource,
    dist: &FittedDistribution,
) -> Result<f64, CoreError> {
    if dist.is_degenerate() {
        return Ok(dist.mean);
    }
    let mut rng = entropy.seeded_rng()?;
    match dist.kind {
        DistributionKind::Uniform => Ok(uniform(&mut rng, dist)),
        DistributionKind::TruncatedNormal => {
            let normal = Normal::new(dist.mean, dist.std_dev)
                .map_err(|e| CoreError::Config(format!("정규 분포 파라미터 오류: {e}")))?;
            for _ in 0..MAX_REJECTION_ROUNDS {
                let x = normal.sample(&mut rng);
                if x >= dist.min && x <= dist.max {
                    return Ok(x);
                }
            }
            Ok(uniform(&mut rng, dist))
        }
    }
}

fn uniform(rng: &mut StdRng, dist: &FittedDistribution) -> f64 {
    rng.random_range(dist.min..=dist.max)
}
