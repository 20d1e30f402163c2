//! Welford 온라인 통계.
//!
//! 샘플당 O(1) 메모리/연산으로 평균, 분산, 최소/최대를 갱신한다.
//! 원시 값은 보관하지 않는다.

/// 단일 변량 온라인 누적기
#[derive(Debug, Clone, Copy, Default)]
pub struct OnlineStats {
    count: u64,
    mean: f64,
    /// 평균으로부터의 편차 제곱합
    m2: f64,
    min: u64,
    max: u64,
}

impl OnlineStats {
    /// 빈 누적기
    pub fn new() -> Self {
        Self::default()
    }

    /// 샘플 추가
    pub fn update(&mut self, x: u64) {
        self.count += 1;
        if self.count == 1 {
            self.min = x;
            self.max = x;
        } else {
            self.min = self.min.min(x);
            self.max = self.max.max(x);
        }

        let x = x as f64;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = x - self.mean;
        self.m2 += delta * delta2;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// 표본 분산. 샘플 2개 미만이면 0.
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        (self.m2 / (self.count - 1) as f64).max(0.0)
    }

    /// 최소값 (빈 경우 0)
    pub fn min(&self) -> u64 {
        self.min
    }

    /// 최대값 (빈 경우 0)
    pub fn max(&self) -> u64 {
        self.max
    }
}
