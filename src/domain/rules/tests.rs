// Unit tests for business rules

#[cfg(test)]
mod tests {
    use crate::domain::model::*;
    use crate::domain::rules::*;

    #[test]
    fn test_zero_bits_stay_zero() {
        for t in [PictureType::I, PictureType::P, PictureType::B] {
            assert_eq!(BitWeighting::apply(t, 0), 0);
        }
    }

    #[test]
    fn test_b_weight_is_identity() {
        assert_eq!(BitWeighting::apply(PictureType::B, 1), 1);
        assert_eq!(BitWeighting::apply(PictureType::B, 12345), 12345);
    }

    #[test]
    fn test_i_weight_rounding() {
        // 282 * 255 + 128 = 72038, 72038 / 256 = 281.39
        assert_eq!(BitWeighting::apply(PictureType::I, 255), 281);
        // 282 * 1 + 128 = 410 -> 1
        assert_eq!(BitWeighting::apply(PictureType::I, 1), 1);
        // 282 * 1000 + 128 = 282128 -> 1102
        assert_eq!(BitWeighting::apply(PictureType::I, 1000), 1102);
    }

    #[test]
    fn test_p_weight_rounds_half_up() {
        // 269 * 128 + 128 = 34560 = 135 * 256 exactly
        assert_eq!(BitWeighting::apply(PictureType::P, 128), 135);
        // 269 * 2 + 128 = 666 -> 2
        assert_eq!(BitWeighting::apply(PictureType::P, 2), 2);
    }

    #[test]
    fn test_weight_ordering() {
        let raw = 10_000;
        let i = BitWeighting::apply(PictureType::I, raw);
        let p = BitWeighting::apply(PictureType::P, raw);
        let b = BitWeighting::apply(PictureType::B, raw);
        assert!(i > p && p > b);
    }

    #[test]
    fn test_gop_rules() {
        assert!(GopRules::validate(0, 0).is_err());
        assert!(GopRules::validate(1, 0).is_ok());
        assert_eq!(GopRules::sub_gop_size(2), 3);
        assert_eq!(GopRules::pool_size(2), 4);
        assert_eq!(GopRules::pool_size(0), 2);
        assert!(GopRules::is_gop_start(0, 4));
        assert!(!GopRules::is_gop_start(3, 4));
        assert!(GopRules::is_gop_start(8, 4));
    }
}
