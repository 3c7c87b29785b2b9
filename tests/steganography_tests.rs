use lsb_stash::bits::{bits, pack};
use lsb_stash::constants::{HEADER_BITS, MAGIC};
use lsb_stash::steganography::{Header, capacity, embed, extract};
use lsb_stash::StegoError;
use rand::{Rng, RngCore};

/// 生成指定长度的随机字节
fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    bytes
}

/// 直接把给定容器字节写入一个全零缓冲区的 LSB，用于构造损坏的输入
fn buffer_with_lsbs(container: &[u8], size: usize) -> Vec<u8> {
    let mut buffer = vec![0u8; size];
    buffer.iter_mut().zip(bits(container)).for_each(|(byte, bit)| *byte = bit);
    buffer
}

/// 对随机缓冲区和随机载荷验证嵌入后可以逐字节还原
#[test]
fn round_trip_random_buffers() {
    let mut rng = rand::rng();
    for _ in 0..50 {
        let payload = random_bytes(rng.random_range(0..300));
        let min_size = HEADER_BITS + payload.len() * 8;
        let mut buffer = random_bytes(min_size + rng.random_range(0..64));

        embed(&mut buffer, &payload).expect("payload fits");
        assert_eq!(extract(&buffer).expect("container is valid"), payload);
    }
}

/// 恰好填满缓冲区时也能往返
#[test]
fn round_trip_at_exact_capacity() {
    let mut buffer = random_bytes(HEADER_BITS + 8 * 37 + 7);
    let max = capacity(buffer.len());
    assert_eq!(max, 37);

    let payload = random_bytes(max);
    assert_eq!(embed(&mut buffer, &payload), Ok(HEADER_BITS + 8 * 37));
    assert_eq!(extract(&buffer).unwrap(), payload);
}

#[test]
fn empty_payload_round_trips() {
    let mut buffer = random_bytes(HEADER_BITS);
    assert_eq!(embed(&mut buffer, &[]), Ok(HEADER_BITS));
    assert!(extract(&buffer).unwrap().is_empty());
}

/// 容量不足时返回错误且缓冲区保持不变
#[test]
fn overflow_leaves_buffer_untouched() {
    let mut rng = rand::rng();
    for _ in 0..20 {
        let payload = random_bytes(rng.random_range(1..100));
        let needed = HEADER_BITS + payload.len() * 8;
        let mut buffer = random_bytes(rng.random_range(0..needed));
        let original = buffer.clone();

        assert_eq!(
            embed(&mut buffer, &payload),
            Err(StegoError::CapacityExceeded {
                needed_bits: needed,
                available_bits: original.len(),
            })
        );
        assert_eq!(buffer, original);
    }
}

/// 嵌入后每个字节的高 7 位都保持原样，超出容器范围的字节完全不变
#[test]
fn embed_only_touches_low_bits() {
    let original = random_bytes(1000);
    let mut buffer = original.clone();
    let payload = random_bytes(50);
    let written = embed(&mut buffer, &payload).unwrap();

    for (before, after) in original.iter().zip(&buffer) {
        assert_eq!(before & 0xFE, after & 0xFE);
    }
    assert_eq!(&buffer[written..], &original[written..]);
}

#[test]
fn wrong_magic_is_rejected() {
    let mut container = b"STEG2".to_vec();
    container.extend_from_slice(&0u32.to_be_bytes());
    let buffer = buffer_with_lsbs(&container, 200);

    assert_eq!(extract(&buffer), Err(StegoError::InvalidMagic));
}

/// 魔数错误时即使长度字段很大也不会进入容量检查
#[test]
fn magic_is_checked_before_length() {
    let mut container = b"xTEG1".to_vec();
    container.extend_from_slice(&u32::MAX.to_be_bytes());
    let buffer = buffer_with_lsbs(&container, HEADER_BITS);

    assert_eq!(extract(&buffer), Err(StegoError::InvalidMagic));
}

#[test]
fn short_buffer_is_truncated_header() {
    let buffer = vec![1u8; 71];
    assert_eq!(
        extract(&buffer),
        Err(StegoError::TruncatedHeader { available_bits: 71 })
    );
}

#[test]
fn declared_length_beyond_buffer_is_truncated_payload() {
    let header = Header { length: 100 }.to_bytes();
    let buffer = buffer_with_lsbs(&header, HEADER_BITS + 8 * 50);

    assert_eq!(
        extract(&buffer),
        Err(StegoError::TruncatedPayload {
            declared_bytes: 100,
            needed_bits: HEADER_BITS + 800,
            available_bits: HEADER_BITS + 400,
        })
    );
}

#[test]
fn header_layout_is_magic_then_big_endian_length() {
    let header = Header { length: 0x0102_0304 }.to_bytes();
    assert_eq!(&header[..5], MAGIC);
    assert_eq!(&header[5..], &[1, 2, 3, 4]);
    assert_eq!(Header::parse(&header), Ok(Header { length: 0x0102_0304 }));
}

/// 100 字节全零缓冲区中隐藏 0xDE 0xAD 的具体场景
#[test]
fn concrete_dead_scenario() {
    let mut buffer = vec![0u8; 100];
    assert_eq!(embed(&mut buffer, &[0xDE, 0xAD]), Ok(88));

    let header = pack(buffer[..72].iter().copied(), 9).unwrap();
    assert_eq!(&header[..], b"STEG1\x00\x00\x00\x02");

    let payload_bits: Vec<u8> = buffer[72..88].to_vec();
    assert_eq!(payload_bits, bits(&[0xDE, 0xAD]).collect::<Vec<_>>());
    assert!(buffer[88..].iter().all(|&b| b == 0));

    assert_eq!(extract(&buffer).unwrap(), [0xDE, 0xAD]);

    let mut small = vec![0u8; 80];
    assert_eq!(
        embed(&mut small, &[0xDE, 0xAD]),
        Err(StegoError::CapacityExceeded {
            needed_bits: 88,
            available_bits: 80,
        })
    );
    assert!(small.iter().all(|&b| b == 0));
}

#[test]
fn capacity_saturates_for_tiny_buffers() {
    assert_eq!(capacity(0), 0);
    assert_eq!(capacity(HEADER_BITS + 7), 0);
    assert_eq!(capacity(HEADER_BITS + 8), 1);
}

#[test]
fn error_messages_report_sizes() {
    let err = StegoError::CapacityExceeded {
        needed_bits: 88,
        available_bits: 80,
    };
    assert!(err.to_string().contains("need 88 bits, have 80 bits"));
}
