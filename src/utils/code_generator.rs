use rand::Rng;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// 生成 XXXX-XXXX 形式的兑换码（去掉易混淆字符 I/O/0/1）
pub fn generate_artifact_code() -> String {
    let mut rng = rand::thread_rng();
    let mut code = String::with_capacity(9);
    for i in 0..8 {
        if i == 4 {
            code.push('-');
        }
        let idx = rng.gen_range(0..CODE_ALPHABET.len());
        code.push(CODE_ALPHABET[idx] as char);
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_code_shape() {
        let code = generate_artifact_code();
        assert_eq!(code.len(), 9);
        assert_eq!(code.chars().nth(4), Some('-'));
        assert!(
            code.chars()
                .filter(|c| *c != '-')
                .all(|c| CODE_ALPHABET.contains(&(c as u8)))
        );
    }

    #[test]
    fn test_artifact_code_avoids_ambiguous_chars() {
        for _ in 0..100 {
            let code = generate_artifact_code();
            assert!(!code.contains('I'));
            assert!(!code.contains('O'));
            assert!(!code.contains('0'));
            assert!(!code.contains('1'));
        }
    }
}
