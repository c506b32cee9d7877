use bytes::Bytes;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

/// 본문을 gzip으로 압축합니다.
///
/// 같은 입력과 레벨에 대해 항상 원본으로 복원 가능한 스트림을 생성하는
/// 순수 변환입니다. 레벨 검증은 호출 측에서 수행합니다.
pub fn gzip_compress(data: &[u8], level: u32) -> std::io::Result<Bytes> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;
    Ok(Bytes::from(compressed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_gzip_roundtrip() {
        let data = "h".repeat(501);
        let compressed = gzip_compress(data.as_bytes(), 6).unwrap();
        assert!(compressed.len() < data.len());

        let mut decoder = GzDecoder::new(&compressed[..]);
        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_levels_never_increase_size() {
        let data = "compressible payload with repetition ".repeat(100);
        let mut prev = usize::MAX;

        for level in 1..=9 {
            let compressed = gzip_compress(data.as_bytes(), level).unwrap();
            assert!(
                compressed.len() <= prev,
                "level {} produced {} bytes, larger than previous {}",
                level,
                compressed.len(),
                prev
            );
            prev = compressed.len();
        }
    }
}
