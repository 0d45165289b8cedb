use myshell::{MAX_STAGES, ParseError, tokenize};
use proptest::prelude::*;

fn token() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./=+-]{1,8}"
}

fn stage() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(token(), 1..5)
}

fn pipeline() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(stage(), 1..=MAX_STAGES)
}

fn spacing() -> impl Strategy<Value = String> {
    "[ \t]{0,3}"
}

proptest! {
    #[test]
    fn normalized_lines_reconstruct_exactly(stages in pipeline()) {
        let line = stages
            .iter()
            .map(|tokens| tokens.join(" "))
            .collect::<Vec<_>>()
            .join(" | ");
        let parsed = tokenize(&line).unwrap();
        prop_assert_eq!(parsed.to_string(), line);
    }

    #[test]
    fn extra_whitespace_does_not_change_tokens(stages in pipeline(), pad in spacing()) {
        let normalized = stages
            .iter()
            .map(|tokens| tokens.join(" "))
            .collect::<Vec<_>>()
            .join(" | ");
        let padded = stages
            .iter()
            .map(|tokens| format!("{pad}{}{pad}", tokens.join(&format!(" {pad}"))))
            .collect::<Vec<_>>()
            .join("|");

        let parsed = tokenize(padded.trim()).unwrap();
        prop_assert_eq!(parsed.len(), stages.len());
        prop_assert_eq!(parsed.to_string(), normalized);
    }

    #[test]
    fn any_blank_segment_is_rejected(stages in pipeline(), at in any::<prop::sample::Index>()) {
        let mut segments: Vec<String> = stages.iter().map(|tokens| tokens.join(" ")).collect();
        let index = at.index(segments.len());
        segments[index] = " ".to_string();
        let line = segments.join("|");
        prop_assert_eq!(tokenize(&line), Err(ParseError::EmptyStage { index }));
    }
}
