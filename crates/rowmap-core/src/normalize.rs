//! Identifier → column-name normalization.

/// Convert an identifier into a lower-case, underscore-delimited column name.
///
/// An underscore goes in front of an uppercase letter when it is not the
/// first character and either follows a non-uppercase character or starts a
/// new word after an acronym (the next character is lowercase). Acronym runs
/// are otherwise kept together: `VerifySSLExpiry` → `verify_ssl_expiry`.
#[must_use]
pub fn snake_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev_upper = false;

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_uppercase() {
            prev_upper = false;
            out.push(c);
            continue;
        }

        let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
        let boundary = i > 0 && (!prev_upper || next_lower);

        if boundary {
            out.push('_');
        }

        out.extend(c.to_lowercase());
        prev_upper = true;
    }

    out
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::snake_case;
    use proptest::prelude::*;

    #[test]
    fn splits_words_and_keeps_acronyms_together() {
        let cases = [
            ("ID", "id"),
            ("UserID", "user_id"),
            ("VerifySSLExpiry", "verify_ssl_expiry"),
            ("camelCaseABCdef", "camel_case_ab_cdef"),
            ("CreatedAt", "created_at"),
            ("TempTable", "temp_table"),
            ("A", "a"),
            ("HTTPServer", "http_server"),
            ("", ""),
        ];

        for (input, expected) in cases {
            assert_eq!(snake_case(input), expected, "input: {input}");
        }
    }

    #[test]
    fn snake_case_identifiers_pass_through() {
        assert_eq!(snake_case("user_id"), "user_id");
        assert_eq!(snake_case("created_at"), "created_at");
        assert_eq!(snake_case("v"), "v");
    }

    #[test]
    fn uppercase_after_separator_gets_its_own_underscore() {
        assert_eq!(snake_case("user_ID"), "user__id");
        assert_eq!(snake_case("Audit_Log"), "audit__log");
    }

    proptest! {
        #[test]
        fn output_is_lowercase_and_idempotent(input in "[A-Za-z]{0,24}") {
            let once = snake_case(&input);

            prop_assert!(!once.chars().any(char::is_uppercase));
            prop_assert_eq!(snake_case(&once), once.clone());
        }

        #[test]
        fn only_underscores_are_inserted(input in "[A-Za-z]{0,24}") {
            let stripped: String = snake_case(&input).chars().filter(|c| *c != '_').collect();

            prop_assert_eq!(stripped, input.to_lowercase());
        }
    }
}
