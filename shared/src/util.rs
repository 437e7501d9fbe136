use rand::Rng;

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Booking reference: `BK` + last six digits of the given millis.
///
/// Short enough to read over the phone; uniqueness is only needed within a
/// single session.
pub fn booking_reference(now: i64) -> String {
    format!("BK{:06}", now.rem_euclid(1_000_000))
}

/// Order reference: `LEG-<base36 millis>-<4 random base36 chars>`, upper-case.
pub fn order_reference(now: i64) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..4)
        .map(|_| base36_digit(rng.gen_range(0..36)))
        .collect();
    format!("LEG-{}-{}", to_base36(now.max(0) as u64), suffix).to_uppercase()
}

/// Encode an unsigned integer in lower-case base36
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(base36_digit((value % 36) as u8));
        value /= 36;
    }
    digits.iter().rev().collect()
}

fn base36_digit(d: u8) -> char {
    match d {
        0..=9 => (b'0' + d) as char,
        _ => (b'a' + d - 10) as char,
    }
}
