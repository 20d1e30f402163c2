//! 지연 후 패딩 응답 생성.
//!
//! 실제 트래픽과 디코이가 같은 함수를 거쳐 형식이 구분되지 않게 한다.

use axum::http::header;
use axum::response::{IntoResponse, Response};
use std::time::Duration;

/// 패딩 채움 문자
const FILLER: u8 = b'a';

/// 정확히 `size` 바이트인 본문 생성
///
/// `"slept N ms\n"` 머리줄 뒤를 채움 문자로 채운다. 머리줄이 `size`보다 길면 잘라낸다.
pub fn padded_body(delay: Duration, size: usize) -> Vec<u8> {
    let mut body = format!("slept {} ms\n", delay.as_millis()).into_bytes();
    body.resize(size, FILLER);
    body
}

/// 스케줄러 수준에서 대기한 뒤 본문 생성
///
/// 반환 전에 future가 드롭되면(클라이언트 연결 종료, 서버 종료) 대기가 취소된다.
pub async fn delayed_body(delay: Duration, size: usize) -> Vec<u8> {
    tokio::time::sleep(delay).await;
    padded_body(delay, size)
}

/// 본문을 평문 응답으로 변환
pub fn into_response(body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn body_has_exact_size() {
        for size in [0usize, 1, 5, 14, 15, 100, 4_096] {
            assert_eq!(padded_body(Duration::from_millis(321), size).len(), size);
        }
    }

    #[test]
    fn body_starts_with_delay_line() {
        let body = padded_body(Duration::from_millis(250), 64);
        assert!(body.starts_with(b"slept 250 ms\n"));
        assert!(body[13..].iter().all(|&b| b == FILLER));
    }

    #[test]
    fn short_body_truncates_header() {
        let body = padded_body(Duration::from_millis(250), 5);
        assert_eq!(body, b"slept");
    }

    #[tokio::test]
    async fn delayed_body_waits() {
        let started = Instant::now();
        let body = delayed_body(Duration::from_millis(30), 20).await;
        assert!(started.elapsed() >= Duration::from_millis(30));
        assert_eq!(body.len(), 20);
    }
}
