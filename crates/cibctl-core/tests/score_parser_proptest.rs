use cibctl_core::parse::{is_score, is_score_or_opt, parse_score_options, DEFAULT_SCORE};
use proptest::prelude::*;

proptest! {
    #[test]
    fn integers_are_scores(n in any::<i64>()) {
        prop_assert!(is_score(&n.to_string()));
    }

    #[test]
    fn infinity_with_any_sign_is_a_score(sign in prop::sample::select(vec!["", "+", "-"])) {
        let score = format!("{}INFINITY", sign);
        prop_assert!(is_score(&score));
    }

    #[test]
    fn words_are_not_scores(word in "[a-z][a-z0-9]{0,10}") {
        prop_assert!(!is_score(&word));
        prop_assert!(!is_score_or_opt(&word));
    }

    #[test]
    fn options_without_score_default_to_infinity(
        pairs in prop::collection::vec(("[a-z]{1,6}", "[a-z0-9]{1,6}"), 1..5)
    ) {
        let tokens: Vec<String> = pairs.iter().map(|(n, v)| format!("{}={}", n, v)).collect();
        let (score, parsed) = parse_score_options(&tokens);
        prop_assert_eq!(score, DEFAULT_SCORE);
        prop_assert_eq!(parsed, pairs);
    }

    #[test]
    fn leading_token_is_the_score(n in any::<i32>(), name in "[a-z]{1,6}") {
        let tokens = vec![n.to_string(), format!("{}=v", name)];
        let (score, parsed) = parse_score_options(&tokens);
        prop_assert_eq!(score, n.to_string());
        prop_assert_eq!(parsed, vec![(name, "v".to_string())]);
    }
}
